//! Параллельная загрузка заранее отсортированных значений.
//!
//! Вход режется на порции не больше `batch_cap`, порции раздаются
//! пулу потоков через общую очередь. Каждая вставка идёт обычным путём
//! с поуровневыми блокировками, поэтому итоговая структура совпадает с
//! последовательной вставкой.

use std::thread;

use parking_lot::Mutex;
use tracing::debug;

/// Параметры разбиения входа на порции.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BulkPlan {
    pub batch_cap: usize,
    pub workers: usize,
}

impl BulkPlan {
    pub(crate) fn new(
        batch_cap: usize,
        workers: Option<usize>,
    ) -> Self {
        Self {
            batch_cap: batch_cap.max(1),
            workers: workers.unwrap_or_else(num_cpus::get).max(1),
        }
    }

    /// `ceil(len / workers)`, ограниченное сверху `batch_cap`.
    pub(crate) fn batch_size(
        &self,
        len: usize,
    ) -> usize {
        len.div_ceil(self.workers).clamp(1, self.batch_cap)
    }
}

/// Режет вход на порции по `batch` элементов с сохранением порядка.
pub(crate) fn partition<T>(
    items: Vec<T>,
    batch: usize,
) -> Vec<Vec<T>> {
    let batch = batch.max(1);
    let mut chunks = Vec::with_capacity(items.len().div_ceil(batch));
    let mut iter = items.into_iter();

    loop {
        let chunk: Vec<T> = iter.by_ref().take(batch).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(chunk);
    }

    chunks
}

/// Вставляет все элементы через `insert`, распределяя порции по потокам.
///
/// Первая ошибка останавливает раздачу оставшихся порций; уже вставленные
/// элементы остаются в индексе.
pub(crate) fn run<T, F, R>(
    items: Vec<T>,
    plan: BulkPlan,
    insert: F,
) -> Result<(), R>
where
    T: Send,
    F: Fn(T) -> Result<(), R> + Sync,
    R: Send,
{
    if items.is_empty() {
        return Ok(());
    }

    let total = items.len();
    let batch = plan.batch_size(total);
    let mut chunks = partition(items, batch);
    let workers = plan.workers.clamp(1, chunks.len());

    debug!(
        total,
        batch,
        chunks = chunks.len(),
        workers,
        "bulk load partitioned"
    );

    if workers == 1 {
        for chunk in chunks {
            for item in chunk {
                insert(item)?;
            }
        }
        return Ok(());
    }

    // pop() снимает с конца
    chunks.reverse();
    let queue = Mutex::new(chunks);
    let failure: Mutex<Option<R>> = Mutex::new(None);

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let Some(chunk) = queue.lock().pop() else {
                    break;
                };

                for item in chunk {
                    if let Err(err) = insert(item) {
                        let mut slot = failure.lock();
                        if slot.is_none() {
                            *slot = Some(err);
                        }
                        drop(slot);
                        queue.lock().clear();
                        return;
                    }
                }
            });
        }
    });

    match failure.into_inner() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
