//! Append-only арена узлов.
//!
//! Слоты адресуются индексом `usize` и никогда не освобождаются, пока арена
//! используется совместно (`&self`). Освобождение возможно только через
//! `&mut self` (замена арены в `clear`), поэтому индекс, однажды опубликованный
//! в forward-указателе, остаётся валидным всё время жизни заимствования.
//!
//! Корзины растут геометрически: корзина `b` содержит `32 << b` слотов.

use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;

const FIRST_BUCKET_SHIFT: u32 = 5;
const BUCKETS: usize = (usize::BITS - FIRST_BUCKET_SHIFT) as usize;

type Bucket<T> = Box<[OnceCell<T>]>;

pub(crate) struct Arena<T> {
    buckets: Box<[OnceCell<Bucket<T>>]>,
    len: AtomicUsize,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self {
            buckets: (0..BUCKETS).map(|_| OnceCell::new()).collect(),
            len: AtomicUsize::new(0),
        }
    }

    /// Резервирует слот, записывает значение и возвращает его индекс.
    pub(crate) fn push(
        &self,
        value: T,
    ) -> (usize, &T) {
        let idx = self.len.fetch_add(1, Ordering::AcqRel);
        let (bucket, offset) = locate(idx);

        let slots = self.buckets[bucket].get_or_init(|| {
            let size = 1usize << (bucket as u32 + FIRST_BUCKET_SHIFT);
            (0..size).map(|_| OnceCell::new()).collect()
        });

        (idx, slots[offset].get_or_init(|| value))
    }

    /// Возвращает элемент по индексу, если слот уже заполнен.
    pub(crate) fn get(
        &self,
        idx: usize,
    ) -> Option<&T> {
        if idx >= self.len.load(Ordering::Acquire) {
            return None;
        }
        let (bucket, offset) = locate(idx);
        self.buckets.get(bucket)?.get()?.get(offset)?.get()
    }

    /// Количество зарезервированных слотов.
    pub(crate) fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }
}

/// Переводит индекс в пару (корзина, смещение).
#[inline]
fn locate(idx: usize) -> (usize, usize) {
    let biased = idx + (1 << FIRST_BUCKET_SHIFT);
    let bucket = (usize::BITS - 1 - biased.leading_zeros() - FIRST_BUCKET_SHIFT) as usize;
    let offset = biased - (1 << (bucket as u32 + FIRST_BUCKET_SHIFT));
    (bucket, offset)
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
