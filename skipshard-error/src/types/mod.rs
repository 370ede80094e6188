pub mod index;

pub use index::*;

use crate::{ErrorExt, StatusCode};

/// Универсальная ошибка с кодом и сообщением.
#[derive(Debug, Clone)]
pub struct GenericError {
    code: StatusCode,
    message: String,
}

impl GenericError {
    pub fn new(
        code: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for GenericError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for GenericError {}

impl ErrorExt for GenericError {
    fn status_code(&self) -> StatusCode {
        self.code
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Конвертация из std::io::Error (чтение файла со словами в демо).
impl From<std::io::Error> for crate::StackError {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => StatusCode::NotFound,
            std::io::ErrorKind::InvalidInput => StatusCode::InvalidArgs,
            std::io::ErrorKind::InvalidData => StatusCode::InvalidData,
            _ => StatusCode::Internal,
        };

        crate::StackError::new(GenericError::new(code, err.to_string()))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_generic_error() {
        let err = GenericError::new(StatusCode::InvalidArgs, "test message");
        assert_eq!(err.status_code(), StatusCode::InvalidArgs);
        assert_eq!(err.to_string(), "test message");
    }

    /// Тест проверяет, что as_any() позволяет сделать downcast_ref к
    /// GenericError.
    #[test]
    fn test_generic_error_as_any_downcast() {
        let err = GenericError::new(StatusCode::NotFound, "not found");
        let down = err.as_any().downcast_ref::<GenericError>();
        assert!(down.is_some());
        assert_eq!(down.unwrap().to_string(), "not found");
    }

    #[test]
    fn test_io_error_kind_mapping() {
        let cases = vec![
            (io::ErrorKind::NotFound, StatusCode::NotFound, "no words file"),
            (io::ErrorKind::InvalidData, StatusCode::InvalidData, "bad utf-8"),
            (io::ErrorKind::Other, StatusCode::Internal, "other"),
        ];

        for (kind, expected_code, msg) in cases {
            let stack: crate::StackError = io::Error::new(kind, msg).into();
            assert_eq!(stack.status_code(), expected_code, "kind={kind:?}");
            assert!(stack.to_string().contains(msg));
        }
    }
}
