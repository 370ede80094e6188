use std::{fmt, hash::Hash, thread};

use skipshard_error::{IndexError, IndexResult};
use tracing::debug;

use super::{
    sharded::hash_shard, Comparator, Equivalence, NaturalEq, NaturalOrder, ShardMetricsSnapshot,
    ShardedSkipList, SkipList, SkipListConfig, SkipListStatistics, SortedIter, ValidationError,
};

/// Шардированный индекс с уникальными ключами.
///
/// Уникальность действует внутри шарда, поэтому функция шардирования
/// обязана отправлять равные по ключу значения в один и тот же шард.
pub struct UniqueShardedSkipList<T, C = NaturalOrder, E = NaturalEq> {
    inner: ShardedSkipList<T, C, E>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<T> UniqueShardedSkipList<T>
where
    T: Ord + Clone,
{
    pub fn new<F>(
        shard_count: usize,
        shard_fn: F,
    ) -> IndexResult<Self>
    where
        F: Fn(&T) -> usize + Send + Sync + 'static,
    {
        Ok(Self {
            inner: ShardedSkipList::new(shard_count, shard_fn)?,
        })
    }

    pub fn with_config<F>(
        shard_count: usize,
        shard_fn: F,
        config: SkipListConfig,
    ) -> IndexResult<Self>
    where
        F: Fn(&T) -> usize + Send + Sync + 'static,
    {
        Ok(Self {
            inner: ShardedSkipList::with_config(shard_count, shard_fn, config)?,
        })
    }
}

impl<T> UniqueShardedSkipList<T>
where
    T: Ord + Clone + Hash + 'static,
{
    pub fn hashed(shard_count: usize) -> IndexResult<Self> {
        Self::new(shard_count, move |value: &T| {
            hash_shard(value, shard_count)
        })
    }
}

impl<T, C, E> UniqueShardedSkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    pub fn with_rules<F>(
        shard_count: usize,
        shard_fn: F,
        comparator: C,
        equivalence: E,
        config: SkipListConfig,
    ) -> IndexResult<Self>
    where
        F: Fn(&T) -> usize + Send + Sync + 'static,
        C: Clone,
        E: Clone,
    {
        Ok(Self {
            inner: ShardedSkipList::with_rules(
                shard_count,
                shard_fn,
                comparator,
                equivalence,
                config,
            )?,
        })
    }

    /// `DuplicateKey`, если ключ уже живёт в шарде-владельце.
    pub fn add(
        &self,
        value: T,
    ) -> IndexResult<()> {
        let (index, shard) = self.inner.owning_shard(&value)?;
        self.inner.record_insert(index);
        shard.add_unique(value)
    }

    /// Обновление на месте в шарде-владельце. `false`, если ключа нет
    /// или шард вне диапазона.
    pub fn update(
        &self,
        value: T,
    ) -> bool {
        match self.inner.owning_shard(&value) {
            Ok((_, shard)) => shard.update_equal_run(value),
            Err(_) => false,
        }
    }

    pub fn remove(
        &self,
        value: &T,
    ) -> bool {
        self.inner.remove(value)
    }

    pub fn contains(
        &self,
        value: &T,
    ) -> bool {
        self.inner.contains(value)
    }

    pub fn contains_key(
        &self,
        value: &T,
    ) -> bool {
        self.inner
            .owning_shard(value)
            .is_ok_and(|(_, shard)| shard.contains_key(value))
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

    pub fn shard_count(&self) -> usize {
        self.inner.shard_count()
    }

    pub fn shard(
        &self,
        index: usize,
    ) -> Option<&SkipList<T, C, E>> {
        self.inner.shard(index)
    }

    pub fn shard_of(
        &self,
        value: &T,
    ) -> IndexResult<usize> {
        self.inner.shard_of(value)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn compact(&mut self) -> usize {
        self.inner.compact()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.inner.iter()
    }

    pub fn iter_sorted(&self) -> SortedIter<'_, T, C, E> {
        self.inner.iter_sorted()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.inner.to_vec()
    }

    pub fn to_sorted_vec(&self) -> Vec<T> {
        self.inner.to_sorted_vec()
    }

    pub fn copy_to(
        &self,
        dest: &mut [T],
        offset: usize,
    ) -> IndexResult<()> {
        self.inner.copy_to(dest, offset)
    }

    pub fn first(&self) -> Option<T> {
        self.inner.first()
    }

    pub fn last(&self) -> Option<T> {
        self.inner.last()
    }

    pub fn shard_distribution(&self) -> Vec<usize> {
        self.inner.shard_distribution()
    }

    pub fn load_balance_score(&self) -> f64 {
        self.inner.load_balance_score()
    }

    pub fn shard_metrics(&self) -> Vec<ShardMetricsSnapshot> {
        self.inner.shard_metrics()
    }

    pub fn statistics(&self) -> SkipListStatistics {
        self.inner.statistics()
    }

    pub fn validate_invariants(&self) -> Result<(), ValidationError> {
        self.inner.validate_with(true)
    }

    pub fn format_report(&self) -> String {
        self.inner.format_report()
    }
}

impl<T, C, E> UniqueShardedSkipList<T, C, E>
where
    T: Clone + Send + Sync,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    /// Сначала каждая группа проверяется на дубликаты внутри себя и с
    /// содержимым шарда; только после этого шарды грузятся параллельно.
    pub fn add_range<I>(
        &self,
        values: I,
    ) -> IndexResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let mut groups = self.inner.group_by_shard(values)?;
        let shards = self.inner.shards();

        for (group, shard) in groups.iter_mut().zip(shards) {
            shard.sort_values(group);
            let has_inner_duplicate = group.windows(2).any(|pair| {
                shard.comparator().compare(&pair[0], &pair[1]) == std::cmp::Ordering::Equal
            });
            if has_inner_duplicate || group.iter().any(|value| shard.contains_key(value)) {
                return Err(IndexError::DuplicateKey);
            }
        }

        debug!(shards = groups.len(), "unique sharded bulk load fan-out");

        thread::scope(|scope| {
            let handles: Vec<_> = groups
                .into_iter()
                .zip(shards)
                .enumerate()
                .filter(|(_, (group, _))| !group.is_empty())
                .map(|(index, (group, shard))| {
                    let loaded = group.len();
                    let handle = scope.spawn(move || shard.add_range_unique(group));
                    (index, loaded, handle)
                })
                .collect();

            let mut outcome = Ok(());
            for (index, loaded, handle) in handles {
                let result = handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
                match result {
                    Ok(()) => self.inner.record_inserts(index, loaded),
                    Err(err) if outcome.is_ok() => outcome = Err(err),
                    Err(_) => {}
                }
            }
            outcome
        })
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для UniqueShardedSkipList
////////////////////////////////////////////////////////////////////////////////

impl<T, C, E> fmt::Debug for UniqueShardedSkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("UniqueShardedSkipList")
            .field("shards", &self.shard_count())
            .field("distribution", &self.shard_distribution())
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    fn modulo(shards: usize) -> UniqueShardedSkipList<u32> {
        UniqueShardedSkipList::new(shards, move |v: &u32| *v as usize % shards).unwrap()
    }

    #[test]
    fn test_duplicates_within_owning_shard() {
        let list = modulo(3);

        assert_eq!(list.add(4), Ok(()));
        assert_eq!(list.add(4), Err(IndexError::DuplicateKey));
        assert_eq!(list.len(), 1);
        assert!(list.contains_key(&4));
        assert!(list.validate_invariants().is_ok());
    }

    #[test]
    fn test_update_routes_to_owner() {
        let list = UniqueShardedSkipList::with_rules(
            2,
            |pair: &(u32, char)| pair.0 as usize % 2,
            crate::database::skiplist::OrderByKey(|pair: &(u32, char)| pair.0),
            NaturalEq,
            SkipListConfig::default(),
        )
        .unwrap();

        list.add((1, 'a')).unwrap();
        list.add((2, 'b')).unwrap();

        assert!(list.update((1, 'z')));
        assert!(!list.update((3, 'c')));
        assert_eq!(list.to_sorted_vec(), vec![(1, 'z'), (2, 'b')]);
    }

    #[test]
    fn test_update_out_of_range_shard() {
        let list = UniqueShardedSkipList::new(2, |v: &u32| *v as usize).unwrap();
        list.add(1).unwrap();
        assert!(!list.update(9));
        assert!(!list.contains_key(&9));
    }

    #[test]
    fn test_add_range_is_all_or_nothing() {
        let list = modulo(4);
        list.add(7).unwrap();

        assert_eq!(list.add_range(vec![1, 2, 7]), Err(IndexError::DuplicateKey));
        assert_eq!(list.add_range(vec![5, 9, 5]), Err(IndexError::DuplicateKey));
        assert_eq!(list.len(), 1);

        assert_eq!(list.add_range(0..7), Ok(()));
        assert_eq!(list.to_sorted_vec(), (0..8).collect::<Vec<_>>());
        assert!(list.validate_invariants().is_ok());
    }

    #[test]
    fn test_hashed_racing_adds() {
        let list = Arc::new(UniqueShardedSkipList::hashed(4).unwrap());
        let mut handles = vec![];

        for _ in 0..4 {
            let list = Arc::clone(&list);
            handles.push(thread::spawn(move || {
                (0..500u64).filter(|v| list.add(*v).is_ok()).count()
            }));
        }

        let inserted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(inserted, 500);
        assert_eq!(list.len(), 500);
        assert_eq!(list.shard_metrics().iter().map(|m| m.inserts).sum::<usize>(), 2000);
    }
}
