use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use skipshard_error::{ErrorExt, IndexResult, StatusCode};
use thiserror::Error;

use crate::{
    database::{SkipListConfig, DEFAULT_BULK_BATCH},
    logging::{LogFormat, LoggingConfig},
};

/// Ошибка загрузки настроек.
#[derive(Debug, Error)]
#[error("Failed to load settings: {0}")]
pub struct SettingsError(#[from] config::ConfigError);

/// Настройки демо и индексов: значения по умолчанию, поверх которых
/// накладываются переменные окружения `SKIPSHARD_*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub shard_count: usize,
    pub bulk_batch_size: usize,
    pub bulk_workers: Option<usize>,
    pub level_seed: Option<u64>,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn load() -> Result<Self, SettingsError> {
        let cfg = Config::builder()
            // Добавляем значения по умолчанию
            .set_default("shard_count", 4)?
            .set_default("bulk_batch_size", DEFAULT_BULK_BATCH as u64)?
            .set_default("log_level", "info")?
            .set_default("log_format", "compact")?
            // Переменные окружения с префиксом SKIPSHARD_
            .add_source(Environment::with_prefix("SKIPSHARD").try_parsing(true))
            .build()?;

        Ok(cfg.try_deserialize()?)
    }

    /// Конфигурация отдельного списка (для шардов зерно дополнительно
    /// сдвигается по индексу).
    pub fn skiplist_config(&self) -> IndexResult<SkipListConfig> {
        let config = SkipListConfig {
            bulk_batch_size: self.bulk_batch_size,
            bulk_workers: self.bulk_workers,
            level_seed: self.level_seed,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format,
            ..Default::default()
        }
    }
}

impl ErrorExt for SettingsError {
    fn status_code(&self) -> StatusCode {
        StatusCode::InvalidData
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
