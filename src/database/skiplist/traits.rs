use skipshard_error::IndexResult;

use super::{
    Comparator, Equivalence, ShardedSkipList, SkipList, UniqueShardedSkipList, UniqueSkipList,
};

/// Общий интерфейс упорядоченных индексов: одиночного и шардированного,
/// с уникальными ключами и без.
pub trait OrderedIndex<T> {
    /// Вставка. Ошибка означает, что индекс не изменился.
    fn add(
        &self,
        value: T,
    ) -> IndexResult<()>;

    fn remove(
        &self,
        value: &T,
    ) -> bool;

    fn contains(
        &self,
        value: &T,
    ) -> bool;

    fn find(
        &self,
        value: &T,
    ) -> IndexResult<T>;

    fn find_or(
        &self,
        value: &T,
        default: T,
    ) -> T {
        self.find(value).unwrap_or(default)
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Снимок содержимого в порядке перечисления индекса.
    fn to_vec(&self) -> Vec<T>;

    fn copy_to(
        &self,
        dest: &mut [T],
        offset: usize,
    ) -> IndexResult<()>;
}

/// Индекс с уникальными ключами и обновлением на месте.
pub trait UniqueIndex<T>: OrderedIndex<T> {
    fn update(
        &self,
        value: T,
    ) -> bool;
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl<T, C, E> OrderedIndex<T> for SkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    fn add(
        &self,
        value: T,
    ) -> IndexResult<()> {
        SkipList::add(self, value);
        Ok(())
    }

    fn remove(
        &self,
        value: &T,
    ) -> bool {
        SkipList::remove(self, value)
    }

    fn contains(
        &self,
        value: &T,
    ) -> bool {
        SkipList::contains(self, value)
    }

    fn find(
        &self,
        value: &T,
    ) -> IndexResult<T> {
        SkipList::find(self, value)
    }

    fn len(&self) -> usize {
        SkipList::len(self)
    }

    fn to_vec(&self) -> Vec<T> {
        SkipList::to_vec(self)
    }

    fn copy_to(
        &self,
        dest: &mut [T],
        offset: usize,
    ) -> IndexResult<()> {
        SkipList::copy_to(self, dest, offset)
    }
}

impl<T, C, E> OrderedIndex<T> for UniqueSkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    fn add(
        &self,
        value: T,
    ) -> IndexResult<()> {
        UniqueSkipList::add(self, value)
    }

    fn remove(
        &self,
        value: &T,
    ) -> bool {
        UniqueSkipList::remove(self, value)
    }

    fn contains(
        &self,
        value: &T,
    ) -> bool {
        UniqueSkipList::contains(self, value)
    }

    fn find(
        &self,
        value: &T,
    ) -> IndexResult<T> {
        UniqueSkipList::find(self, value)
    }

    fn len(&self) -> usize {
        UniqueSkipList::len(self)
    }

    fn to_vec(&self) -> Vec<T> {
        UniqueSkipList::to_vec(self)
    }

    fn copy_to(
        &self,
        dest: &mut [T],
        offset: usize,
    ) -> IndexResult<()> {
        UniqueSkipList::copy_to(self, dest, offset)
    }
}

impl<T, C, E> UniqueIndex<T> for UniqueSkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    fn update(
        &self,
        value: T,
    ) -> bool {
        UniqueSkipList::update(self, value)
    }
}

impl<T, C, E> OrderedIndex<T> for ShardedSkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    fn add(
        &self,
        value: T,
    ) -> IndexResult<()> {
        ShardedSkipList::add(self, value)
    }

    fn remove(
        &self,
        value: &T,
    ) -> bool {
        ShardedSkipList::remove(self, value)
    }

    fn contains(
        &self,
        value: &T,
    ) -> bool {
        ShardedSkipList::contains(self, value)
    }

    fn find(
        &self,
        value: &T,
    ) -> IndexResult<T> {
        ShardedSkipList::find(self, value)
    }

    fn len(&self) -> usize {
        ShardedSkipList::len(self)
    }

    fn to_vec(&self) -> Vec<T> {
        ShardedSkipList::to_vec(self)
    }

    fn copy_to(
        &self,
        dest: &mut [T],
        offset: usize,
    ) -> IndexResult<()> {
        ShardedSkipList::copy_to(self, dest, offset)
    }
}

impl<T, C, E> OrderedIndex<T> for UniqueShardedSkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    fn add(
        &self,
        value: T,
    ) -> IndexResult<()> {
        UniqueShardedSkipList::add(self, value)
    }

    fn remove(
        &self,
        value: &T,
    ) -> bool {
        UniqueShardedSkipList::remove(self, value)
    }

    fn contains(
        &self,
        value: &T,
    ) -> bool {
        UniqueShardedSkipList::contains(self, value)
    }

    fn find(
        &self,
        value: &T,
    ) -> IndexResult<T> {
        UniqueShardedSkipList::find(self, value)
    }

    fn len(&self) -> usize {
        UniqueShardedSkipList::len(self)
    }

    fn to_vec(&self) -> Vec<T> {
        UniqueShardedSkipList::to_vec(self)
    }

    fn copy_to(
        &self,
        dest: &mut [T],
        offset: usize,
    ) -> IndexResult<()> {
        UniqueShardedSkipList::copy_to(self, dest, offset)
    }
}

impl<T, C, E> UniqueIndex<T> for UniqueShardedSkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    fn update(
        &self,
        value: T,
    ) -> bool {
        UniqueShardedSkipList::update(self, value)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
