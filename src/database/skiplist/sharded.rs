use std::{
    cmp::Ordering as CmpOrdering,
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{Hash, Hasher},
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};

use skipshard_error::{IndexError, IndexResult};
use tracing::debug;

use super::{
    skiplist_base::copy_snapshot, Comparator, Equivalence, Iter, NaturalEq, NaturalOrder,
    SkipList, SkipListConfig, SkipListStatistics, ValidationError,
};

/// Функция шардирования: значение → индекс шарда в `[0, shard_count)`.
pub type ShardFn<T> = dyn Fn(&T) -> usize + Send + Sync;

/// Одно логическое упорядоченное множество поверх `shard_count` независимых
/// SkipList.
///
/// Одиночные операции уходят в шард, выбранный функцией шардирования;
/// массовая загрузка группирует вход по шардам и грузит их параллельно.
pub struct ShardedSkipList<T, C = NaturalOrder, E = NaturalEq> {
    shards: Vec<SkipList<T, C, E>>,
    shard_fn: Box<ShardFn<T>>,
    shard_metrics: Vec<ShardMetrics>,
}

#[derive(Debug, Default)]
struct ShardMetrics {
    inserts: AtomicUsize,
    searches: AtomicUsize,
    removes: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardMetricsSnapshot {
    pub shard_index: usize,
    pub inserts: usize,
    pub searches: usize,
    pub removes: usize,
}

/// K-путевое слияние шардов: глобально упорядоченный обход.
pub struct SortedIter<'a, T, C, E> {
    heads: Vec<Iter<'a, T, C, E>>,
    fronts: Vec<Option<T>>,
    comparator: &'a C,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<T> ShardedSkipList<T>
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
        Self::with_config(shard_count, shard_fn, SkipListConfig::default())
    }

    pub fn with_config<F>(
        shard_count: usize,
        shard_fn: F,
        config: SkipListConfig,
    ) -> IndexResult<Self>
    where
        F: Fn(&T) -> usize + Send + Sync + 'static,
    {
        Self::with_rules(shard_count, shard_fn, NaturalOrder, NaturalEq, config)
    }
}

impl<T> ShardedSkipList<T>
where
    T: Ord + Clone + Hash + 'static,
{
    /// Шардирование по хешу значения.
    pub fn hashed(shard_count: usize) -> IndexResult<Self> {
        Self::new(shard_count, move |value: &T| {
            hash_shard(value, shard_count)
        })
    }
}

impl<T, C, E> ShardedSkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    /// Каждый шард получает копию правил и собственное зерно высот.
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
        if shard_count < 1 {
            return Err(IndexError::InvalidShardCount { count: shard_count });
        }

        let shards = (0..shard_count)
            .map(|i| {
                SkipList::with_rules_and_config(
                    comparator.clone(),
                    equivalence.clone(),
                    config.salted(i as u64),
                )
            })
            .collect::<IndexResult<Vec<_>>>()?;

        debug!(shard_count, "sharded skiplist created");

        Ok(Self {
            shards,
            shard_fn: Box::new(shard_fn),
            shard_metrics: (0..shard_count).map(|_| ShardMetrics::default()).collect(),
        })
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Шард по индексу.
    pub fn shard(
        &self,
        index: usize,
    ) -> Option<&SkipList<T, C, E>> {
        self.shards.get(index)
    }

    /// Индекс шарда-владельца значения.
    pub fn shard_of(
        &self,
        value: &T,
    ) -> IndexResult<usize> {
        let index = (self.shard_fn)(value);
        if index < self.shards.len() {
            Ok(index)
        } else {
            Err(IndexError::ShardOutOfRange {
                index,
                shard_count: self.shards.len(),
            })
        }
    }

    pub(crate) fn owning_shard(
        &self,
        value: &T,
    ) -> IndexResult<(usize, &SkipList<T, C, E>)> {
        let index = self.shard_of(value)?;
        Ok((index, &self.shards[index]))
    }

    pub(crate) fn shards(&self) -> &[SkipList<T, C, E>] {
        &self.shards
    }

    pub(crate) fn record_insert(
        &self,
        shard: usize,
    ) {
        self.record_inserts(shard, 1);
    }

    pub(crate) fn record_inserts(
        &self,
        shard: usize,
        count: usize,
    ) {
        self.shard_metrics[shard]
            .inserts
            .fetch_add(count, Ordering::Relaxed);
    }

    fn record_search(
        &self,
        shard: usize,
    ) {
        self.shard_metrics[shard]
            .searches
            .fetch_add(1, Ordering::Relaxed);
    }

    fn record_remove(
        &self,
        shard: usize,
    ) {
        self.shard_metrics[shard]
            .removes
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(
        &self,
        value: T,
    ) -> IndexResult<()> {
        let (index, shard) = self.owning_shard(&value)?;
        self.record_insert(index);
        shard.add(value);
        Ok(())
    }

    /// `false` и для отсутствующего значения, и для шарда вне диапазона.
    pub fn remove(
        &self,
        value: &T,
    ) -> bool {
        let Ok((index, shard)) = self.owning_shard(value) else {
            return false;
        };
        self.record_remove(index);
        shard.remove(value)
    }

    pub fn contains(
        &self,
        value: &T,
    ) -> bool {
        let Ok((index, shard)) = self.owning_shard(value) else {
            return false;
        };
        self.record_search(index);
        shard.contains(value)
    }

    pub fn find(
        &self,
        value: &T,
    ) -> IndexResult<T> {
        let (index, shard) = self.owning_shard(value)?;
        self.record_search(index);
        shard.find(value)
    }

    pub fn find_or(
        &self,
        value: &T,
        default: T,
    ) -> T {
        self.find(value).unwrap_or(default)
    }

    pub fn find_or_default(
        &self,
        value: &T,
    ) -> T
    where
        T: Default,
    {
        self.find(value).unwrap_or_default()
    }

    /// Сумма длин шардов.
    pub fn len(&self) -> usize {
        self.shards.iter().map(SkipList::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(SkipList::is_empty)
    }

    pub fn clear(&mut self) {
        for shard in &mut self.shards {
            shard.clear();
        }
    }

    pub fn compact(&mut self) -> usize {
        self.shards.iter_mut().map(SkipList::compact).sum()
    }

    /// Конкатенация шардов в порядке их индексов.
    ///
    /// Глобально упорядочена только если функция шардирования согласована
    /// с порядком (диапазонное шардирование); иначе см. [`Self::iter_sorted`].
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.shards.iter().flat_map(SkipList::iter)
    }

    /// Глобально упорядоченный обход слиянием шардов.
    pub fn iter_sorted(&self) -> SortedIter<'_, T, C, E> {
        let mut heads: Vec<_> = self.shards.iter().map(SkipList::iter).collect();
        let fronts = heads.iter_mut().map(Iterator::next).collect();

        SortedIter {
            heads,
            fronts,
            comparator: self.shards[0].comparator(),
        }
    }

    /// Снимок в порядке [`Self::iter`].
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    pub fn to_sorted_vec(&self) -> Vec<T> {
        self.iter_sorted().collect()
    }

    /// Собирает все шарды, сортирует глобально и копирует в `dest[offset..]`.
    pub fn copy_to(
        &self,
        dest: &mut [T],
        offset: usize,
    ) -> IndexResult<()> {
        let mut snapshot = self.to_vec();
        let comparator = self.shards[0].comparator();
        snapshot.sort_by(|a, b| comparator.compare(a, b));

        copy_snapshot(snapshot, dest, offset)
    }

    pub fn first(&self) -> Option<T> {
        self.extreme(SkipList::first, CmpOrdering::Less)
    }

    pub fn last(&self) -> Option<T> {
        self.extreme(SkipList::last, CmpOrdering::Greater)
    }

    fn extreme(
        &self,
        pick: fn(&SkipList<T, C, E>) -> Option<T>,
        wanted: CmpOrdering,
    ) -> Option<T> {
        let comparator = self.shards[0].comparator();

        self.shards
            .iter()
            .filter_map(pick)
            .reduce(|best, candidate| {
                if comparator.compare(&candidate, &best) == wanted {
                    candidate
                } else {
                    best
                }
            })
    }

    pub fn shard_distribution(&self) -> Vec<usize> {
        self.shards.iter().map(SkipList::len).collect()
    }

    /// 1.0: идеально ровное распределение; 0.0: всё в одном шарде.
    pub fn load_balance_score(&self) -> f64 {
        let distribution = self.shard_distribution();
        let total: usize = distribution.iter().sum();

        if total == 0 {
            return 1.0;
        }

        let shard_count = distribution.len() as f64;
        let ideal_per_shard = total as f64 / shard_count;

        let variance: f64 = distribution
            .iter()
            .map(|&count| {
                let diff = count as f64 - ideal_per_shard;
                diff * diff
            })
            .sum();

        let stddev = (variance / shard_count).sqrt();
        let score = 1.0 - (stddev / ideal_per_shard);

        score.clamp(0.0, 1.0)
    }

    pub fn shard_metrics(&self) -> Vec<ShardMetricsSnapshot> {
        self.shard_metrics
            .iter()
            .enumerate()
            .map(|(idx, metrics)| ShardMetricsSnapshot {
                shard_index: idx,
                inserts: metrics.inserts.load(Ordering::Relaxed),
                searches: metrics.searches.load(Ordering::Relaxed),
                removes: metrics.removes.load(Ordering::Relaxed),
            })
            .collect()
    }

    /// Статистика, объединённая по всем шардам.
    pub fn statistics(&self) -> SkipListStatistics {
        let mut stats = self.shards[0].statistics();
        for shard in &self.shards[1..] {
            stats.merge(&shard.statistics());
        }
        stats
    }

    pub fn validate_invariants(&self) -> Result<(), ValidationError> {
        self.validate_with(false)
    }

    pub(crate) fn validate_with(
        &self,
        strict: bool,
    ) -> Result<(), ValidationError> {
        for (idx, shard) in self.shards.iter().enumerate() {
            shard
                .validate_with(strict)
                .map_err(|e| ValidationError::ShardViolation {
                    shard: idx,
                    source: Box::new(e),
                })?;

            if let Some(misplaced) = shard.iter().find(|v| (self.shard_fn)(v) != idx) {
                return Err(ValidationError::WrongShard {
                    shard: idx,
                    expected: (self.shard_fn)(&misplaced),
                });
            }
        }

        Ok(())
    }

    pub fn format_report(&self) -> String {
        let mut report = format!(
            "Sharded SkipList: {} shards, {} values, balance {:.3}\n",
            self.shard_count(),
            self.len(),
            self.load_balance_score()
        );

        for (metrics, len) in self.shard_metrics().iter().zip(self.shard_distribution()) {
            report.push_str(&format!(
                "  Shard {}: {} values, {} inserts, {} searches, {} removes\n",
                metrics.shard_index, len, metrics.inserts, metrics.searches, metrics.removes
            ));
        }

        report
    }
}

impl<T, C, E> ShardedSkipList<T, C, E>
where
    T: Clone + Send + Sync,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    /// Раскладывает вход по шардам за один проход. Ни одна вставка не
    /// выполняется, если хоть одно значение попало вне диапазона.
    pub(crate) fn group_by_shard<I>(
        &self,
        values: I,
    ) -> IndexResult<Vec<Vec<T>>>
    where
        I: IntoIterator<Item = T>,
    {
        let mut groups: Vec<Vec<T>> = (0..self.shards.len()).map(|_| Vec::new()).collect();

        for value in values {
            let index = self.shard_of(&value)?;
            groups[index].push(value);
        }

        Ok(groups)
    }

    /// Массовая загрузка: группировка по шардам, затем параллельная
    /// загрузка каждой группы в свой шард.
    pub fn add_range<I>(
        &self,
        values: I,
    ) -> IndexResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let groups = self.group_by_shard(values)?;

        debug!(
            shards = groups.len(),
            total = groups.iter().map(Vec::len).sum::<usize>(),
            "sharded bulk load fan-out"
        );

        thread::scope(|scope| {
            for (index, group) in groups.into_iter().enumerate() {
                if group.is_empty() {
                    continue;
                }
                let shard = &self.shards[index];
                let metrics = &self.shard_metrics[index];
                scope.spawn(move || {
                    metrics.inserts.fetch_add(group.len(), Ordering::Relaxed);
                    shard.add_range(group);
                });
            }
        });

        Ok(())
    }
}

/// Индекс шарда по `DefaultHasher`.
pub fn hash_shard<T: Hash + ?Sized>(
    value: &T,
    shard_count: usize,
) -> usize {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    (hasher.finish() as usize) % shard_count.max(1)
}

impl ShardMetricsSnapshot {
    pub fn total_operations(&self) -> usize {
        self.inserts + self.searches + self.removes
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для ShardedSkipList
////////////////////////////////////////////////////////////////////////////////

impl<'a, T, C, E> Iterator for SortedIter<'a, T, C, E>
where
    T: Clone,
    C: Comparator<T>,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let mut best: Option<(usize, &T)> = None;

        for (idx, front) in self.fronts.iter().enumerate() {
            let Some(candidate) = front else {
                continue;
            };
            // Строго меньше: при равенстве побеждает младший шард
            let better = match best {
                None => true,
                Some((_, leader)) => {
                    self.comparator.compare(candidate, leader) == CmpOrdering::Less
                }
            };
            if better {
                best = Some((idx, candidate));
            }
        }

        let (idx, _) = best?;
        let refill = self.heads[idx].next();
        std::mem::replace(&mut self.fronts[idx], refill)
    }
}

impl<T, C, E> fmt::Debug for ShardedSkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ShardedSkipList")
            .field("shards", &self.shard_count())
            .field("distribution", &self.shard_distribution())
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
