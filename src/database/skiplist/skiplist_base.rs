use std::{
    cmp::Ordering as CmpOrdering,
    collections::HashSet,
    convert::Infallible,
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    thread,
};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use skipshard_error::{IndexError, IndexResult};
use tracing::{debug, trace};

use super::{
    arena::Arena,
    bulk::{self, BulkPlan},
    level::thread_local_level,
    CoinFlip, Comparator, Equivalence, LevelGenerator, NaturalEq, NaturalOrder,
    SkipListStatistics, ValidationError, MAX_LEVEL,
};
use crate::{debug_assert_invariant, validate};

/// Пустая ссылка в forward-таблице.
const NIL: usize = usize::MAX;

/// Размер порции параллельной загрузки по умолчанию.
pub const DEFAULT_BULK_BATCH: usize = 10_000;

/// Параметры построения списка.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipListConfig {
    /// Верхняя граница размера порции при `add_range`.
    pub bulk_batch_size: usize,
    /// Число потоков загрузки; `None` означает по числу ядер.
    pub bulk_workers: Option<usize>,
    /// Зерно генератора высот для воспроизводимой структуры.
    pub level_seed: Option<u64>,
}

/// Forward-таблица узла или головы вместе с её блокировкой.
struct Tower {
    forward: Box<[AtomicUsize]>,
    lock: Mutex<()>,
}

struct Node<T> {
    value: RwLock<Arc<T>>,
    tower: Tower,
    marked: AtomicBool,
    fully_linked: AtomicBool,
}

/// Позиция обхода: голова или узел арены.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Head,
    Node(usize),
}

/// Конкурентный пропускной список.
///
/// Вставка и удаление блокируют только одну forward-таблицу
/// предшественника за раз; чтение идёт без блокировок по атомарным
/// указателям и видит слабо согласованный снимок.
///
/// Удалённые узлы отвязываются сразу, а их слоты в арене освобождаются
/// только `clear` или `compact`.
pub struct SkipList<T, C = NaturalOrder, E = NaturalEq> {
    arena: Arena<Node<T>>,
    head: Tower,
    level: AtomicUsize,
    level_lock: Mutex<()>,
    /// `None`: потоковая монета без общей блокировки.
    levels: Option<Mutex<Box<dyn LevelGenerator>>>,
    length: AtomicUsize,
    retired: AtomicUsize,
    comparator: C,
    equivalence: E,
    config: SkipListConfig,
}

/// Итератор по живым значениям в порядке возрастания.
pub struct Iter<'a, T, C, E> {
    list: &'a SkipList<T, C, E>,
    next: usize,
}

/// Итератор по полуинтервалу `[start, end)`.
pub struct Range<'a, T, C, E> {
    list: &'a SkipList<T, C, E>,
    next: usize,
    end: &'a T,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl SkipListConfig {
    pub fn validate(&self) -> IndexResult<()> {
        if self.bulk_batch_size == 0 {
            return Err(IndexError::invalid_argument(
                "bulk batch size must be at least 1",
            ));
        }
        if self.bulk_workers == Some(0) {
            return Err(IndexError::invalid_argument(
                "bulk worker count must be at least 1",
            ));
        }
        Ok(())
    }

    /// Тот же конфиг с зерном, сдвинутым на `salt` (по одному на шард).
    pub(crate) fn salted(
        &self,
        salt: u64,
    ) -> Self {
        Self {
            level_seed: self.level_seed.map(|seed| seed.wrapping_add(salt)),
            ..self.clone()
        }
    }
}

impl Tower {
    fn new(height: usize) -> Self {
        Self {
            forward: (0..height).map(|_| AtomicUsize::new(NIL)).collect(),
            lock: Mutex::new(()),
        }
    }

    #[inline]
    fn height(&self) -> usize {
        self.forward.len()
    }

    #[inline]
    fn next(
        &self,
        lvl: usize,
    ) -> usize {
        self.forward
            .get(lvl)
            .map_or(NIL, |slot| slot.load(Ordering::Acquire))
    }

    #[inline]
    fn set(
        &self,
        lvl: usize,
        idx: usize,
    ) {
        if let Some(slot) = self.forward.get(lvl) {
            slot.store(idx, Ordering::Release);
        }
    }
}

impl<T> Node<T> {
    fn new(
        value: Arc<T>,
        height: usize,
    ) -> Self {
        Self {
            value: RwLock::new(value),
            tower: Tower::new(height),
            marked: AtomicBool::new(false),
            fully_linked: AtomicBool::new(false),
        }
    }

    /// Снимок значения; блокировка держится только на время клона `Arc`.
    #[inline]
    fn load(&self) -> Arc<T> {
        Arc::clone(&self.value.read())
    }

    #[inline]
    fn is_live(&self) -> bool {
        !self.marked.load(Ordering::Acquire)
    }
}

impl<T> SkipList<T>
where
    T: Ord + Clone,
{
    /// Создаёт новый пустой SkipList с естественным порядком.
    pub fn new() -> Self {
        Self::with_rules(NaturalOrder, NaturalEq)
    }

    pub fn with_config(config: SkipListConfig) -> IndexResult<Self> {
        Self::with_rules_and_config(NaturalOrder, NaturalEq, config)
    }
}

impl<T, C, E> SkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    /// Список с заданными правилами порядка и равенства.
    pub fn with_rules(
        comparator: C,
        equivalence: E,
    ) -> Self {
        Self::build(comparator, equivalence, SkipListConfig::default(), None)
    }

    pub fn with_rules_and_config(
        comparator: C,
        equivalence: E,
        config: SkipListConfig,
    ) -> IndexResult<Self> {
        config.validate()?;

        // Общий генератор только при заданном зерне
        let levels = config
            .level_seed
            .map(|seed| Box::new(CoinFlip::with_seed(seed)) as Box<dyn LevelGenerator>);

        Ok(Self::build(comparator, equivalence, config, levels))
    }

    /// Заменяет генератор высот.
    pub fn with_level_generator(
        mut self,
        generator: impl LevelGenerator + 'static,
    ) -> Self {
        self.levels = Some(Mutex::new(Box::new(generator)));
        self
    }

    fn build(
        comparator: C,
        equivalence: E,
        config: SkipListConfig,
        levels: Option<Box<dyn LevelGenerator>>,
    ) -> Self {
        Self {
            arena: Arena::new(),
            head: Tower::new(MAX_LEVEL),
            level: AtomicUsize::new(1),
            level_lock: Mutex::new(()),
            levels: levels.map(Mutex::new),
            length: AtomicUsize::new(0),
            retired: AtomicUsize::new(0),
            comparator,
            equivalence,
            config,
        }
    }

    /// Количество живых элементов.
    pub fn len(&self) -> usize {
        self.length.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Текущее число активных уровней (не меньше 1).
    pub fn level(&self) -> usize {
        self.level.load(Ordering::Acquire)
    }

    /// Слоты арены, занятые отвязанными узлами.
    pub fn retired(&self) -> usize {
        self.retired.load(Ordering::Relaxed)
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn config(&self) -> &SkipListConfig {
        &self.config
    }

    /// Вставляет значение. Равные по порядку значения хранятся рядом.
    pub fn add(
        &self,
        value: T,
    ) {
        self.insert(value, false);
    }

    /// Вставка с отказом при наличии живого равного по порядку значения.
    pub(crate) fn add_unique(
        &self,
        value: T,
    ) -> IndexResult<()> {
        if self.insert(value, true) {
            Ok(())
        } else {
            Err(IndexError::DuplicateKey)
        }
    }

    /// Возвращает хранящееся значение, равное `value`.
    pub fn find(
        &self,
        value: &T,
    ) -> IndexResult<T> {
        self.find_live_match(value)
            .map(|(_, node)| (*node.load()).clone())
            .ok_or(IndexError::NotFound)
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

    pub fn contains(
        &self,
        value: &T,
    ) -> bool {
        self.find_live_match(value).is_some()
    }

    /// Есть ли живое значение, равное `value` по порядку.
    pub(crate) fn contains_key(
        &self,
        value: &T,
    ) -> bool {
        self.has_live_equal_from(self.first_candidate(value), value)
    }

    /// Удаляет одно совпадение. `false`, если совпадений нет.
    pub fn remove(
        &self,
        value: &T,
    ) -> bool {
        let (idx, node) = loop {
            let Some((idx, node)) = self.find_live_match(value) else {
                return false;
            };

            while !node.fully_linked.load(Ordering::Acquire) {
                thread::yield_now();
            }

            let _guard = node.tower.lock.lock();
            if node.marked.swap(true, Ordering::AcqRel) {
                // Узел забрал конкурирующий remove
                continue;
            }
            break (idx, node);
        };

        let key = node.load();
        for lvl in (0..node.tower.height()).rev() {
            self.unlink_level(idx, node, &key, lvl);
        }

        self.length.fetch_sub(1, Ordering::AcqRel);
        self.retired.fetch_add(1, Ordering::Relaxed);
        self.shrink_level();

        true
    }

    /// Заменяет каждое живое значение, равное `value` по порядку.
    pub(crate) fn update_equal_run(
        &self,
        value: T,
    ) -> bool {
        let replacement = Arc::new(value);
        let mut updated = false;

        for (_, node) in self.equal_run(&replacement) {
            if node.is_live() {
                *node.value.write() = Arc::clone(&replacement);
                updated = true;
            }
        }

        updated
    }

    /// Полный сброс: новая голова, уровень 1, пустая арена.
    pub fn clear(&mut self) {
        self.arena = Arena::new();
        self.head = Tower::new(MAX_LEVEL);
        *self.level.get_mut() = 1;
        *self.length.get_mut() = 0;
        *self.retired.get_mut() = 0;

        debug!("skiplist cleared");
    }

    /// Перестраивает список из живых значений, освобождая слоты удалённых
    /// узлов. Возвращает число освобождённых слотов.
    pub fn compact(&mut self) -> usize {
        let reclaimed = self.arena.len() - self.len();
        if reclaimed == 0 {
            return 0;
        }

        let mut live = Vec::with_capacity(self.len());
        let mut next = self.head.next(0);
        while let Some(node) = self.node(next) {
            if node.is_live() {
                live.push(node.load());
            }
            next = node.tower.next(0);
        }

        self.clear();
        self.append_sorted(live);

        debug!(reclaimed, len = self.len(), "skiplist compacted");
        reclaimed
    }

    /// Ленивая последовательность значений по возрастанию.
    pub fn iter(&self) -> Iter<'_, T, C, E> {
        Iter {
            list: self,
            next: self.head.next(0),
        }
    }

    /// Значения из полуинтервала `[start, end)`.
    pub fn range<'a>(
        &'a self,
        start: &T,
        end: &'a T,
    ) -> Range<'a, T, C, E> {
        Range {
            list: self,
            next: self.first_candidate(start),
            end,
        }
    }

    pub fn first(&self) -> Option<T> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<T> {
        let mut cursor = Cursor::Head;

        for lvl in (0..self.level()).rev() {
            loop {
                let next = self.tower(cursor).next(lvl);
                if self.node(next).is_none() {
                    break;
                }
                cursor = Cursor::Node(next);
            }
        }

        if let Cursor::Node(idx) = cursor {
            if let Some(node) = self.node(idx).filter(|node| node.is_live()) {
                return Some((*node.load()).clone());
            }
        }

        // Хвост удалён, но ещё не отвязан: полный проход
        self.iter().last()
    }

    /// Снимок содержимого по возрастанию.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Копирует значения по возрастанию в `dest[offset..]`.
    ///
    /// При ошибке `dest` не изменяется.
    pub fn copy_to(
        &self,
        dest: &mut [T],
        offset: usize,
    ) -> IndexResult<()> {
        copy_snapshot(self.to_vec(), dest, offset)
    }

    pub fn statistics(&self) -> SkipListStatistics {
        let mut stats = SkipListStatistics::empty(MAX_LEVEL);
        stats.current_max_level = self.level();
        stats.retired_slots = self.retired();

        let mut next = self.head.next(0);
        while let Some(node) = self.node(next) {
            if node.is_live() {
                stats.node_count += 1;
                stats.level_distribution[node.tower.height() - 1] += 1;
            }
            next = node.tower.next(0);
        }

        stats.compute_average_level();
        stats
    }

    /// Проверяет структурные инварианты. Рассчитана на состояние покоя.
    pub fn validate_invariants(&self) -> Result<(), ValidationError> {
        self.validate_with(false)
    }

    pub(crate) fn validate_with(
        &self,
        strict: bool,
    ) -> Result<(), ValidationError> {
        let level = self.level();
        let mut below: Option<HashSet<usize>> = None;

        for lvl in 0..MAX_LEVEL {
            if lvl >= level {
                validate!(
                    self.head.next(lvl) == NIL,
                    ValidationError::DanglingHeadLink { level: lvl }
                );
                continue;
            }

            let mut seen = HashSet::new();
            let mut prev: Option<Arc<T>> = None;
            let mut next = self.head.next(lvl);

            while let Some(node) = self.node(next) {
                let height = node.tower.height();

                validate!(
                    seen.insert(next),
                    ValidationError::CyclicReference { level: lvl }
                );
                validate!(
                    height > lvl,
                    ValidationError::ForwardVectorMismatch { level: lvl, height }
                );
                validate!(
                    height <= level,
                    ValidationError::InvalidLevel {
                        node_level: height,
                        max_level: level,
                    }
                );
                validate!(
                    node.is_live(),
                    ValidationError::MarkedNodeReachable {
                        level: lvl,
                        node: next,
                    }
                );
                if let Some(below) = &below {
                    validate!(
                        below.contains(&next),
                        ValidationError::TowerGap {
                            level: lvl,
                            node: next,
                        }
                    );
                }

                let current = node.load();
                if let Some(prev) = &prev {
                    let ord = self.comparator.compare(prev, &current);
                    let in_order = if strict {
                        ord == CmpOrdering::Less
                    } else {
                        ord != CmpOrdering::Greater
                    };
                    validate!(
                        in_order,
                        ValidationError::SortOrderViolation {
                            level: lvl,
                            message: format!("node {next} breaks the order ({ord:?} to its predecessor)"),
                        }
                    );
                }

                prev = Some(current);
                next = node.tower.next(lvl);
            }

            if lvl == 0 {
                validate!(
                    seen.len() == self.len(),
                    ValidationError::LengthMismatch {
                        expected: self.len(),
                        actual: seen.len(),
                    }
                );
            }
            below = Some(seen);
        }

        Ok(())
    }

    pub(crate) fn bulk_plan(&self) -> BulkPlan {
        BulkPlan::new(self.config.bulk_batch_size, self.config.bulk_workers)
    }

    pub(crate) fn sort_values(
        &self,
        values: &mut [T],
    ) {
        values.sort_by(|a, b| self.comparator.compare(a, b));
    }

    /// Добавляет `values`, уже отсортированные, в хвост пустого списка.
    fn append_sorted(
        &mut self,
        values: Vec<Arc<T>>,
    ) {
        let mut tails = [Cursor::Head; MAX_LEVEL];

        for value in values {
            let height = self.draw_level();
            let (idx, node) = self.arena.push(Node::new(value, height));

            for (lvl, tail) in tails.iter_mut().enumerate().take(height) {
                self.tower(*tail).set(lvl, idx);
                *tail = Cursor::Node(idx);
            }

            node.fully_linked.store(true, Ordering::Release);
            self.length.fetch_add(1, Ordering::AcqRel);
        }
    }

    // --- навигация ---

    #[inline]
    fn node(
        &self,
        idx: usize,
    ) -> Option<&Node<T>> {
        if idx == NIL {
            None
        } else {
            self.arena.get(idx)
        }
    }

    /// Forward-таблица позиции. Опубликованный индекс всегда заполнен,
    /// поэтому возврат к голове на практике не происходит.
    #[inline]
    fn tower(
        &self,
        cursor: Cursor,
    ) -> &Tower {
        match cursor {
            Cursor::Head => &self.head,
            Cursor::Node(idx) => self.node(idx).map_or(&self.head, |node| &node.tower),
        }
    }

    #[inline]
    fn is_marked(
        &self,
        cursor: Cursor,
    ) -> bool {
        match cursor {
            Cursor::Head => false,
            Cursor::Node(idx) => self.node(idx).is_some_and(|node| !node.is_live()),
        }
    }

    #[inline]
    fn compare_to(
        &self,
        node: &Node<T>,
        value: &T,
    ) -> CmpOrdering {
        let current = node.load();
        self.comparator.compare(&current, value)
    }

    /// Идёт вперёд по уровню, пока следующий узел строго меньше `value`.
    fn advance_while_less(
        &self,
        mut cursor: Cursor,
        value: &T,
        lvl: usize,
    ) -> Cursor {
        loop {
            let next = self.tower(cursor).next(lvl);
            match self.node(next) {
                Some(node) if self.compare_to(node, value) == CmpOrdering::Less => {
                    cursor = Cursor::Node(next);
                }
                _ => return cursor,
            }
        }
    }

    /// Предшественники `value` на каждом активном уровне.
    fn find_predecessors(
        &self,
        value: &T,
    ) -> [Cursor; MAX_LEVEL] {
        let mut preds = [Cursor::Head; MAX_LEVEL];
        let mut cursor = Cursor::Head;

        for lvl in (0..self.level()).rev() {
            cursor = self.advance_while_less(cursor, value, lvl);
            preds[lvl] = cursor;
        }

        preds
    }

    /// Предшественник `value` на уровне `target`, найденный спуском от головы.
    fn predecessor_at(
        &self,
        value: &T,
        target: usize,
    ) -> Cursor {
        let top = self.level().max(target + 1);
        let mut cursor = Cursor::Head;

        for lvl in (target..top).rev() {
            cursor = self.advance_while_less(cursor, value, lvl);
        }

        cursor
    }

    /// Первый узел уровня 0, не меньший `value`.
    fn first_candidate(
        &self,
        value: &T,
    ) -> usize {
        self.tower(self.predecessor_at(value, 0)).next(0)
    }

    /// Серия узлов уровня 0, равных `value` по порядку, начиная с `start`.
    fn equal_run_from<'a>(
        &'a self,
        start: usize,
        value: &'a T,
    ) -> impl Iterator<Item = (usize, &'a Node<T>)> + 'a {
        let mut next = start;
        std::iter::from_fn(move || {
            let idx = next;
            let node = self.node(idx)?;
            if self.compare_to(node, value) != CmpOrdering::Equal {
                return None;
            }
            next = node.tower.next(0);
            Some((idx, node))
        })
    }

    fn equal_run<'a>(
        &'a self,
        value: &'a T,
    ) -> impl Iterator<Item = (usize, &'a Node<T>)> + 'a {
        self.equal_run_from(self.first_candidate(value), value)
    }

    fn has_live_equal_from(
        &self,
        start: usize,
        value: &T,
    ) -> bool {
        self.equal_run_from(start, value)
            .any(|(_, node)| node.is_live())
    }

    /// Первый живой узел, равный `value` по порядку и по равенству.
    fn find_live_match<'a>(
        &'a self,
        value: &'a T,
    ) -> Option<(usize, &'a Node<T>)> {
        self.equal_run(value).find(|(_, node)| {
            node.is_live() && self.equivalence.equivalent(&node.load(), value)
        })
    }

    // --- уровни ---

    fn draw_level(&self) -> usize {
        let ceiling = (self.level() + 1).min(MAX_LEVEL);
        let drawn = match &self.levels {
            Some(levels) => levels.lock().random_level(ceiling),
            None => thread_local_level(ceiling),
        };
        let height = drawn.clamp(1, ceiling);

        if height > self.level() {
            self.raise_level(height);
        }

        height
    }

    fn raise_level(
        &self,
        height: usize,
    ) {
        let _guard = self.level_lock.lock();
        let current = self.level.load(Ordering::Acquire);

        if height > current {
            self.level.store(height, Ordering::Release);
            trace!(from = current, to = height, "skiplist level raised");
        }
    }

    /// Опускает уровень, пока верхний указатель головы пуст.
    fn shrink_level(&self) {
        let _guard = self.level_lock.lock();
        let current = self.level.load(Ordering::Acquire);
        let mut lvl = current;

        while lvl > 1 && self.head.next(lvl - 1) == NIL {
            lvl -= 1;
        }

        if lvl < current {
            self.level.store(lvl, Ordering::Release);
            trace!(from = current, to = lvl, "skiplist level lowered");
        }
    }

    // --- мутации ---

    /// `false` только при `unique` и живом равном значении.
    fn insert(
        &self,
        value: T,
        unique: bool,
    ) -> bool {
        let preds = self.find_predecessors(&value);
        if unique && self.has_live_equal_from(self.tower(preds[0]).next(0), &value) {
            return false;
        }

        let height = self.draw_level();
        let value = Arc::new(value);
        let (idx, node) = self.arena.push(Node::new(Arc::clone(&value), height));

        for (lvl, &pred) in preds.iter().enumerate().take(height) {
            if !self.link_level(idx, node, &value, lvl, pred, unique && lvl == 0) {
                // Равное значение успело встать раньше; слот остаётся пустым.
                self.retired.fetch_add(1, Ordering::Relaxed);
                return false;
            }
        }

        if height > 1 {
            // Повтор подъёма: конкурентный shrink мог опустить уровень,
            // пока верхние этажи ещё не были связаны.
            self.raise_level(height);
        }
        debug_assert_invariant!(
            height <= self.level(),
            "node {idx} of height {height} is above list level {}",
            self.level()
        );

        self.length.fetch_add(1, Ordering::AcqRel);
        node.fully_linked.store(true, Ordering::Release);
        true
    }

    /// Вставляет узел `idx` на уровне `lvl`, держа блокировку только
    /// предшественника.
    fn link_level(
        &self,
        idx: usize,
        node: &Node<T>,
        value: &T,
        lvl: usize,
        mut pred: Cursor,
        unique: bool,
    ) -> bool {
        loop {
            let tower = self.tower(pred);
            let guard = tower.lock.lock();

            if self.is_marked(pred) {
                drop(guard);
                thread::yield_now();
                pred = self.predecessor_at(value, lvl);
                continue;
            }

            let succ = tower.next(lvl);
            if let Some(succ_node) = self.node(succ) {
                if self.compare_to(succ_node, value) == CmpOrdering::Less {
                    drop(guard);
                    pred = Cursor::Node(succ);
                    continue;
                }
            }

            if unique && self.has_live_equal_from(succ, value) {
                return false;
            }

            node.tower.set(lvl, succ);
            tower.set(lvl, idx);
            return true;
        }
    }

    /// Снимает помеченный узел `idx` с уровня `lvl`.
    fn unlink_level(
        &self,
        idx: usize,
        victim: &Node<T>,
        key: &T,
        lvl: usize,
    ) {
        let mut pred = self.predecessor_at(key, lvl);

        loop {
            let tower = self.tower(pred);
            let guard = tower.lock.lock();

            if self.is_marked(pred) {
                drop(guard);
                thread::yield_now();
                pred = self.predecessor_at(key, lvl);
                continue;
            }

            let next = tower.next(lvl);
            if next == idx {
                debug_assert_invariant!(
                    !victim.is_live(),
                    "unlinking live node {idx} at level {lvl}"
                );
                tower.set(lvl, victim.tower.next(lvl));
                return;
            }

            match self.node(next) {
                Some(node) if self.compare_to(node, key) != CmpOrdering::Greater => {
                    drop(guard);
                    pred = Cursor::Node(next);
                }
                // На этом уровне узла нет
                _ => return,
            }
        }
    }
}

impl<T, C, E> SkipList<T, C, E>
where
    T: Clone + Send + Sync,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    /// Массовая вставка: сортировка, разбиение на порции, параллельная
    /// вставка обычным путём.
    pub fn add_range<I>(
        &self,
        values: I,
    ) where
        I: IntoIterator<Item = T>,
    {
        let mut values: Vec<T> = values.into_iter().collect();
        self.sort_values(&mut values);

        let loaded = bulk::run(values, self.bulk_plan(), |value| {
            self.add(value);
            Ok::<(), Infallible>(())
        });

        if let Err(never) = loaded {
            match never {}
        }
    }

    /// Массовая вставка с проверкой уникальности всей партии до первой
    /// мутации.
    pub(crate) fn add_range_unique(
        &self,
        values: Vec<T>,
    ) -> IndexResult<()> {
        let mut values = values;
        self.sort_values(&mut values);

        let has_inner_duplicate = values
            .windows(2)
            .any(|pair| self.comparator.compare(&pair[0], &pair[1]) == CmpOrdering::Equal);
        if has_inner_duplicate || values.iter().any(|value| self.contains_key(value)) {
            return Err(IndexError::DuplicateKey);
        }

        bulk::run(values, self.bulk_plan(), |value| self.add_unique(value))
    }
}

/// Копирует готовый снимок в `dest[offset..]` с проверкой границ.
pub(crate) fn copy_snapshot<T>(
    snapshot: Vec<T>,
    dest: &mut [T],
    offset: usize,
) -> IndexResult<()> {
    if offset > dest.len() {
        return Err(IndexError::OutOfRange {
            offset,
            len: dest.len(),
        });
    }

    let available = dest.len() - offset;
    if available < snapshot.len() {
        return Err(IndexError::BufferTooSmall {
            available,
            required: snapshot.len(),
        });
    }

    for (slot, value) in dest[offset..].iter_mut().zip(snapshot) {
        *slot = value;
    }

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для SkipList
////////////////////////////////////////////////////////////////////////////////

impl Default for SkipListConfig {
    fn default() -> Self {
        Self {
            bulk_batch_size: DEFAULT_BULK_BATCH,
            bulk_workers: None,
            level_seed: None,
        }
    }
}

impl<T> Default for SkipList<T>
where
    T: Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, E> fmt::Debug for SkipList<T, C, E>
where
    T: Clone,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("SkipList")
            .field("len", &self.len())
            .field("level", &self.level())
            .field("retired", &self.retired())
            .finish()
    }
}

impl<'a, T, C, E> Iterator for Iter<'a, T, C, E>
where
    T: Clone,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next != NIL {
            let node = self.list.arena.get(self.next)?;
            self.next = node.tower.next(0);
            if node.is_live() {
                return Some((*node.load()).clone());
            }
        }
        None
    }
}

impl<'a, T, C, E> Iterator for Range<'a, T, C, E>
where
    T: Clone,
    C: Comparator<T>,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next != NIL {
            let node = self.list.arena.get(self.next)?;
            let current = node.load();

            if self.list.comparator.compare(&current, self.end) != CmpOrdering::Less {
                self.next = NIL;
                return None;
            }

            self.next = node.tower.next(0);
            if node.is_live() {
                return Some((*current).clone());
            }
        }
        None
    }
}

impl<'a, T, C, E> IntoIterator for &'a SkipList<T, C, E>
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

impl<T> FromIterator<T> for SkipList<T>
where
    T: Ord + Clone + Send + Sync,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let list = SkipList::new();
        list.add_range(iter);
        list
    }
}

impl<T, C, E> Extend<T> for SkipList<T, C, E>
where
    T: Clone + Send + Sync,
    C: Comparator<T>,
    E: Equivalence<T>,
{
    fn extend<I: IntoIterator<Item = T>>(
        &mut self,
        iter: I,
    ) {
        self.add_range(iter);
    }
}

impl<T, C, E> Serialize for SkipList<T, C, E>
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
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T> Deserialize<'de> for SkipList<T>
where
    T: Deserialize<'de> + Ord + Clone + Send + Sync,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values: Vec<T> = Vec::deserialize(deserializer)?;
        Ok(values.into_iter().collect())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
