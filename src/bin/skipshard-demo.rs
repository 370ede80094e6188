//! Демо skipshard
//!
//! Небольшой CLI над библиотекой: таблица рекордов, автодополнение по
//! словарю и загрузка шардированного индекса с отчётом о распределении.

use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand};
use skipshard::{
    application::{Autocomplete, Leaderboard},
    config::Settings,
    database::{hash_shard, ShardedSkipList},
    logging::init_logging,
};
use skipshard_error::{ensure, ResultExt, SkipShardResult, StatusCode};
use tracing::debug;

const SAMPLE_SCORES: [i64; 20] = [
    5000, 100, 7000, 200, 400, 3000, 8900, 8000, 9000, 10000, 1000, 1000, 1000, 500, 5500, 6900,
    700, 900, 3100, 900,
];

const SAMPLE_WORDS: [&str; 6] = ["apple", "app", "apricot", "banana", "bat", "batch"];

/// Аргументы CLI
#[derive(Parser)]
#[command(name = "skipshard-demo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Demonstrations for the skipshard ordered indexes", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Включить подробный вывод (debug)
    #[arg(short, long, help = "Включить подробный вывод для отладки")]
    verbose: bool,
    /// Подавить большинство логов (только warn/error)
    #[arg(short = 'q', long, help = "Подавить логирование (только warn/error)")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Подкоманды CLI
#[derive(Subcommand)]
enum Commands {
    /// Таблица рекордов
    #[command(alias = "lb")]
    Leaderboard {
        /// Сколько лучших результатов показать
        #[arg(short = 'n', long, default_value = "5")]
        top: usize,
        /// Дополнительные результаты
        #[arg(help = "Результаты, добавляемые к демонстрационному набору")]
        scores: Vec<i64>,
    },
    /// Подсказки по префиксу
    #[command(alias = "ac")]
    Autocomplete {
        /// Префикс запроса
        prefix: String,
        /// Файл словаря, по слову на строку
        #[arg(long)]
        words: Option<PathBuf>,
    },
    /// Загрузка шардированного индекса
    Shards {
        /// Количество значений
        #[arg(short = 'n', long, default_value = "100000")]
        count: u64,
        /// Количество шардов (по умолчанию из настроек)
        #[arg(short, long, env = "SKIPSHARD_SHARD_COUNT")]
        shards: Option<usize>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> SkipShardResult<()> {
    let cli = Cli::parse();
    let settings = Settings::load().context("loading settings")?;

    let mut logging = settings.logging_config();
    if cli.verbose {
        logging.level = "debug".to_string();
    } else if cli.quiet {
        logging.level = "warn".to_string();
    }
    init_logging(&logging)?;

    debug!(?settings, "settings loaded");

    match cli.command {
        Commands::Leaderboard { top, scores } => run_leaderboard(top, scores),
        Commands::Autocomplete { prefix, words } => run_autocomplete(&prefix, words),
        Commands::Shards { count, shards } => {
            run_shards(&settings, count, shards.unwrap_or(settings.shard_count))
        }
    }
}

fn run_leaderboard(
    top: usize,
    scores: Vec<i64>,
) -> SkipShardResult<()> {
    let board = Leaderboard::with_scores(SAMPLE_SCORES);
    for score in scores {
        board.add_score(score);
    }

    println!("Top {top} Scores:");
    for entry in board.top(top) {
        println!("{entry}");
    }

    Ok(())
}

fn run_autocomplete(
    prefix: &str,
    words: Option<PathBuf>,
) -> SkipShardResult<()> {
    let complete = match words {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            Autocomplete::new(text.lines())
        }
        None => Autocomplete::new(SAMPLE_WORDS),
    };

    let suggestions = complete.suggest(prefix);
    println!(
        "Autocomplete suggestions for '{prefix}': {}",
        suggestions.join(", ")
    );

    Ok(())
}

fn run_shards(
    settings: &Settings,
    count: u64,
    shards: usize,
) -> SkipShardResult<()> {
    check_shard_args(count, shards)?;

    let config = settings
        .skiplist_config()
        .context("building skiplist config")?;

    let index = ShardedSkipList::with_config(
        shards,
        move |value: &u64| hash_shard(value, shards),
        config,
    )?;

    index.add_range(0..count).context("bulk loading shards")?;

    print!("{}", index.format_report());
    print!("{}", index.statistics().format_report());

    Ok(())
}

fn check_shard_args(
    count: u64,
    shards: usize,
) -> SkipShardResult<()> {
    ensure!(shards > 0, StatusCode::InvalidShard, "--shards must be at least 1");
    ensure!(
        count > 0,
        StatusCode::InvalidArgs,
        "--count must be positive, got {}",
        count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_args_are_validated() {
        assert!(check_shard_args(10, 4).is_ok());

        let err = check_shard_args(10, 0).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::InvalidShard);

        let err = check_shard_args(0, 4).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::InvalidArgs);
        assert!(err.to_string().contains("--count"));
    }
}
