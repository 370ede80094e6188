use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Результат операций упорядоченного индекса.
pub type IndexResult<T> = Result<T, IndexError>;

/// Ошибки упорядоченного индекса (skip list) и его шардированной версии.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Недопустимый параметр конструктора или операции.
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },
    /// Смещение за пределами буфера назначения.
    #[error("Offset {offset} is out of range for buffer of length {len}")]
    OutOfRange { offset: usize, len: usize },
    /// Буфер назначения слишком мал для всех элементов.
    #[error("Destination has room for {available} elements, {required} required")]
    BufferTooSmall { available: usize, required: usize },
    /// Функция шардирования вернула индекс вне `[0, shard_count)`.
    #[error("Shard function returned {index}, but only {shard_count} shards exist")]
    ShardOutOfRange { index: usize, shard_count: usize },
    /// Значение не найдено.
    #[error("Value not found")]
    NotFound,
    /// Ключ уже присутствует в индексе с уникальными ключами.
    #[error("Duplicate key")]
    DuplicateKey,
    /// Количество шардов должно быть не меньше единицы.
    #[error("Invalid shard count: {count}")]
    InvalidShardCount { count: usize },
}

impl IndexError {
    /// Ошибка относится к категории `InvalidArgument`: неверные параметры
    /// вызова (размер буфера, шард, количество шардов).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. }
                | Self::BufferTooSmall { .. }
                | Self::ShardOutOfRange { .. }
                | Self::InvalidShardCount { .. }
        )
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl ErrorExt for IndexError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument { .. } | Self::BufferTooSmall { .. } => StatusCode::InvalidArgs,
            Self::OutOfRange { .. } => StatusCode::IndexOutOfBounds,
            Self::ShardOutOfRange { .. } | Self::InvalidShardCount { .. } => {
                StatusCode::InvalidShard
            }
            Self::NotFound => StatusCode::NotFound,
            Self::DuplicateKey => StatusCode::AlreadyExists,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "index".to_string()),
            ("status_code", self.status_code().to_string()),
        ];

        match self {
            Self::ShardOutOfRange { index, .. } => tags.push(("shard", index.to_string())),
            Self::InvalidShardCount { count } => tags.push(("shard_count", count.to_string())),
            _ => {}
        }

        tags
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
