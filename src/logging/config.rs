use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use skipshard_error::{GenericError, StackError, StatusCode};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Формат строки лога.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Настройки консольного вывода.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
    pub with_line_numbers: bool,
}

/// Конфигурация подсистемы логирования.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Глобальный уровень: trace, debug, info, warn, error
    pub level: String,
    pub format: LogFormat,
    pub console_enabled: bool,
    pub console: ConsoleConfig,
    /// Уровни по модулям, например `skipshard::database = "trace"`
    pub module_levels: BTreeMap<String, String>,
}

impl LoggingConfig {
    /// Директива для `EnvFilter`: глобальный уровень и уровни модулей.
    pub fn build_filter_directive(&self) -> String {
        let mut directive = self.level.clone();
        for (module, level) in &self.module_levels {
            directive.push_str(&format!(",{module}={level}"));
        }
        directive
    }

    pub fn console_format(&self) -> LogFormat {
        self.format
    }

    pub fn validate(&self) -> Result<(), StackError> {
        let levels = std::iter::once(&self.level).chain(self.module_levels.values());
        for level in levels {
            if !LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(StackError::new(GenericError::new(
                    StatusCode::InvalidArgs,
                    format!("unknown log level '{level}'"),
                )));
            }
        }
        Ok(())
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
            with_line_numbers: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            console_enabled: true,
            console: ConsoleConfig::default(),
            module_levels: BTreeMap::new(),
        }
    }
}

impl FromStr for LogFormat {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(StackError::new(GenericError::new(
                StatusCode::InvalidArgs,
                format!("unknown log format '{other}'"),
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}
