use std::fmt;

use num_enum::TryFromPrimitive;

/// Коды статуса для категоризации ошибок.
///
/// # Диапазоны:
/// - 0xxx: Успех
/// - 1xxx: Общие ошибки
/// - 2xxx: Ошибки данных
/// - 5xxx: Индекс / шардирование
///
/// `num_enum::TryFromPrimitive` даёт нативную реализацию `TryFrom<u32>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Успех ===
    Success = 0,

    // === 1xxx: Общие ошибки ===
    Unknown = 1000,
    Internal = 1003,
    InvalidArgs = 1004,

    // === 2xxx: Ошибки данных ===
    NotFound = 2000,
    AlreadyExists = 2001,
    IndexOutOfBounds = 2006,
    InvalidData = 2009,

    // === 5xxx: Индекс / шардирование ===
    InvalidShard = 5006,
    LockError = 5007,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Пытается получить вариант `StatusCode` из `u32`.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// Вернёт `true`, если переданный `code` означает успешный результат.
    pub fn is_success(code: u32) -> bool {
        Self::Success as u32 == code
    }

    /// Ошибка на стороне вызывающего: неверные аргументы или данные.
    ///
    /// Диапазон `2xxx` плюс `InvalidArgs` и `InvalidShard`.
    pub fn is_client_error(&self) -> bool {
        if (2000..=2999).contains(&self.code()) {
            return true;
        }
        matches!(self, Self::InvalidArgs | Self::InvalidShard)
    }

    /// Требуется ли логировать как критическую ошибку.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Internal | Self::LockError)
    }

    /// Рекомендуемый уровень логирования для данного кода.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::NotFound | Self::AlreadyExists => LogLevel::Debug,
            Self::InvalidArgs | Self::IndexOutOfBounds | Self::InvalidData | Self::InvalidShard => {
                LogLevel::Info
            }
            Self::Internal | Self::LockError => LogLevel::Error,
            Self::Unknown => LogLevel::Warn,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip_through_u32() {
        for code in [
            StatusCode::Success,
            StatusCode::InvalidArgs,
            StatusCode::NotFound,
            StatusCode::AlreadyExists,
            StatusCode::IndexOutOfBounds,
            StatusCode::InvalidShard,
        ] {
            assert_eq!(StatusCode::from_u32(code.code()), Some(code));
        }
        assert_eq!(StatusCode::from_u32(4242), None);
    }

    #[test]
    fn test_client_error_classification() {
        assert!(StatusCode::NotFound.is_client_error());
        assert!(StatusCode::AlreadyExists.is_client_error());
        assert!(StatusCode::InvalidArgs.is_client_error());
        assert!(StatusCode::InvalidShard.is_client_error());
        assert!(!StatusCode::Internal.is_client_error());
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(StatusCode::NotFound.log_level(), LogLevel::Debug);
        assert_eq!(StatusCode::InvalidArgs.log_level(), LogLevel::Info);
        assert_eq!(StatusCode::Internal.log_level(), LogLevel::Error);
        assert!(StatusCode::is_success(0));
    }

    #[test]
    fn test_display_contains_numeric_code() {
        assert_eq!(StatusCode::NotFound.to_string(), "NotFound (2000)");
    }
}
