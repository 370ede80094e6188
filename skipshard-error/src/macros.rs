/// Немедленно возвращает ошибку (аналогично `anyhow::bail!`).
///
/// Формы:
/// - `bail!(err)`: готовая ошибка или `StackError`-совместимый тип;
/// - `bail!(code, "msg")`: `GenericError` с кодом и сообщением;
/// - `bail!(code, "fmt {}", arg)`: форматированное сообщение.
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::StackError::from($err))
    };
    ($code:expr, $msg:expr) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, $msg)
        ))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, format!($fmt, $($arg)*))
        ))
    };
}

/// Проверяет условие и вызывает `bail!`, если условие ложно.
///
/// ```ignore
/// use skipshard_error::{ensure, StatusCode};
///
/// fn parse_shards(n: usize) -> skipshard_error::SkipShardResult<usize> {
///     ensure!(n > 0, StatusCode::InvalidArgs, "shard count must be positive");
///     Ok(n)
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            $crate::bail!($err);
        }
    };
    ($cond:expr, $code:expr, $msg:expr) => {
        if !($cond) {
            $crate::bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($code, $fmt, $($arg)*);
        }
    };
}

/// Трейт-расширение для `Result`: `.context(...)` и `.with_context(...)`
/// превращают ошибку в [`StackError`](crate::StackError) и приклеивают
/// контекст.
pub trait ResultExt<T> {
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>;

    /// Ленивый контекст: строка строится только в случае ошибки.
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<crate::StackError>,
{
    #[track_caller]
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
    {
        self.map_err(|e| e.into().context(ctx))
    }

    #[track_caller]
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.into().context(f()))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IndexError, SkipShardResult, StatusCode};

    #[test]
    fn test_bail_with_format() {
        fn example(value: usize) -> SkipShardResult<()> {
            bail!(StatusCode::InvalidArgs, "bad shard count: {}", value);
        }

        let err = example(0).unwrap_err();
        assert!(err.to_string().contains("bad shard count: 0"));
        assert_eq!(err.status_code(), StatusCode::InvalidArgs);
    }

    #[test]
    fn test_ensure() {
        fn validate(x: usize) -> SkipShardResult<()> {
            ensure!(x > 0, StatusCode::InvalidArgs, "must be positive");
            ensure!(x <= 64, IndexError::InvalidShardCount { count: x });
            Ok(())
        }

        assert!(validate(8).is_ok());
        assert!(validate(0).is_err());
        assert_eq!(
            validate(65).unwrap_err().downcast_ref::<IndexError>(),
            Some(&IndexError::InvalidShardCount { count: 65 })
        );
    }

    #[test]
    fn test_result_ext_context() {
        fn inner() -> Result<(), IndexError> {
            Err(IndexError::NotFound)
        }

        fn outer() -> SkipShardResult<()> {
            inner().context("outer context")?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert_eq!(err.contexts().len(), 1);
        assert_eq!(err.contexts()[0].message, "outer context");
    }

    #[test]
    fn test_with_context_is_lazy() {
        let ok: Result<u8, IndexError> = Ok(1);
        let value = ok
            .with_context(|| -> String { unreachable!("context built on success") })
            .unwrap();
        assert_eq!(value, 1);
    }
}
