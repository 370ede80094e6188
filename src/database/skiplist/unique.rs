use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use skipshard_error::IndexResult;

use super::{
    Comparator, Equivalence, Iter, LevelGenerator, NaturalEq, NaturalOrder, Range, SkipList,
    SkipListConfig, SkipListStatistics, ValidationError,
};

/// SkipList с уникальными ключами.
///
/// Ключ определяется компаратором: два значения, равные по порядку,
/// не могут одновременно жить в списке. Проверка повторяется атомарно
/// при вставке на нулевой уровень, поэтому из двух гонящихся `add`
/// одного ключа успешен ровно один.
pub struct UniqueSkipList<T, C = NaturalOrder, E = NaturalEq> {
    inner: SkipList<T, C, E>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<T> UniqueSkipList<T>
where
    T: Ord + Clone,
{
    pub fn new() -> Self {
        Self {
            inner: SkipList::new(),
        }
    }

    pub fn with_config(config: SkipListConfig) -> IndexResult<Self> {
        Ok(Self {
            inner: SkipList::with_config(config)?,
        })
    }
}

impl<T, C, E> UniqueSkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    pub fn with_rules(
        comparator: C,
        equivalence: E,
    ) -> Self {
        Self {
            inner: SkipList::with_rules(comparator, equivalence),
        }
    }

    pub fn with_rules_and_config(
        comparator: C,
        equivalence: E,
        config: SkipListConfig,
    ) -> IndexResult<Self> {
        Ok(Self {
            inner: SkipList::with_rules_and_config(comparator, equivalence, config)?,
        })
    }

    pub fn with_level_generator(
        self,
        generator: impl LevelGenerator + 'static,
    ) -> Self {
        Self {
            inner: self.inner.with_level_generator(generator),
        }
    }

    /// Вставляет значение или возвращает `DuplicateKey` без мутации.
    pub fn add(
        &self,
        value: T,
    ) -> IndexResult<()> {
        self.inner.add_unique(value)
    }

    /// Перезаписывает на месте все живые узлы, равные `value` по порядку.
    ///
    /// Меняется полезная нагрузка, позиция и количество остаются прежними.
    pub fn update(
        &self,
        value: T,
    ) -> bool {
        self.inner.update_equal_run(value)
    }

    pub fn find(
        &self,
        value: &T,
    ) -> IndexResult<T> {
        self.inner.find(value)
    }

    pub fn find_or(
        &self,
        value: &T,
        default: T,
    ) -> T {
        self.inner.find_or(value, default)
    }

    pub fn find_or_default(
        &self,
        value: &T,
    ) -> T
    where
        T: Default,
    {
        self.inner.find_or_default(value)
    }

    pub fn contains(
        &self,
        value: &T,
    ) -> bool {
        self.inner.contains(value)
    }

    /// Есть ли значение с тем же ключом (по компаратору).
    pub fn contains_key(
        &self,
        value: &T,
    ) -> bool {
        self.inner.contains_key(value)
    }

    pub fn remove(
        &self,
        value: &T,
    ) -> bool {
        self.inner.remove(value)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn retired(&self) -> usize {
        self.inner.retired()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn compact(&mut self) -> usize {
        self.inner.compact()
    }

    pub fn iter(&self) -> Iter<'_, T, C, E> {
        self.inner.iter()
    }

    pub fn range<'a>(
        &'a self,
        start: &T,
        end: &'a T,
    ) -> Range<'a, T, C, E> {
        self.inner.range(start, end)
    }

    pub fn first(&self) -> Option<T> {
        self.inner.first()
    }

    pub fn last(&self) -> Option<T> {
        self.inner.last()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.inner.to_vec()
    }

    pub fn copy_to(
        &self,
        dest: &mut [T],
        offset: usize,
    ) -> IndexResult<()> {
        self.inner.copy_to(dest, offset)
    }

    pub fn statistics(&self) -> SkipListStatistics {
        self.inner.statistics()
    }

    /// Как у [`SkipList`], но порядок на каждом уровне строгий.
    pub fn validate_invariants(&self) -> Result<(), ValidationError> {
        self.inner.validate_with(true)
    }

    /// Базовый список только для чтения.
    pub fn as_list(&self) -> &SkipList<T, C, E> {
        &self.inner
    }
}

impl<T, C, E> UniqueSkipList<T, C, E>
where
    T: Clone + Send + Sync,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    /// Массовая вставка. Вся партия проверяется на дубликаты (внутри
    /// себя и с содержимым) до первой вставки.
    pub fn add_range<I>(
        &self,
        values: I,
    ) -> IndexResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.inner
            .add_range_unique(values.into_iter().collect())
    }
}

impl<T> UniqueSkipList<T>
where
    T: Ord + Clone + Send + Sync,
{
    /// Строит список из коллекции; дубликат во входе даёт `DuplicateKey`.
    pub fn from_values<I>(values: I) -> IndexResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let list = Self::new();
        list.add_range(values)?;
        Ok(list)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для UniqueSkipList
////////////////////////////////////////////////////////////////////////////////

impl<T> Default for UniqueSkipList<T>
where
    T: Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, E> fmt::Debug for UniqueSkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("UniqueSkipList")
            .field("len", &self.len())
            .field("level", &self.inner.level())
            .finish()
    }
}

impl<'a, T, C, E> IntoIterator for &'a UniqueSkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    type Item = T;
    type IntoIter = Iter<'a, T, C, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C, E> Serialize for UniqueSkipList<T, C, E>
where
    T: Serialize + Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for UniqueSkipList<T>
where
    T: Deserialize<'de> + Ord + Clone + Send + Sync,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values: Vec<T> = Vec::deserialize(deserializer)?;
        Self::from_values(values).map_err(de::Error::custom)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
