pub mod config;
mod filters;
mod formatter;

pub use config::{ConsoleConfig, LogFormat, LoggingConfig};
pub use filters::build_filter_from_config;
use skipshard_error::{GenericError, SkipShardResult, StackError, StatusCode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Инициализация логирования с конфигурацией.
///
/// Повторный вызов в том же процессе возвращает ошибку, глобальный
/// subscriber при этом не меняется.
pub fn init_logging(config: &LoggingConfig) -> SkipShardResult<()> {
    config.validate()?;

    let env_filter = filters::build_filter_from_config(config);
    let console_layer = config
        .console_enabled
        .then(|| formatter::build_formatter_from_config(config));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init()
        .map_err(|e| {
            StackError::new(GenericError::new(
                StatusCode::Internal,
                format!("failed to install subscriber: {e}"),
            ))
        })?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        log_format = %config.format,
        "Logging system initialized"
    );

    Ok(())
}
