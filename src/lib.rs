/// Example applications built on the indexes (leaderboard, autocomplete).
pub mod application;
/// Settings loading from defaults and `SKIPSHARD_*` environment variables.
pub mod config;
/// Ordered indexes: SkipList with unique and sharded variants, Trie.
pub mod database;
/// Logging initialization (filters, formats).
pub mod logging;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Applications on top of the indexes.
pub use application::{Autocomplete, Leaderboard, RankedScore};
/// config
pub use crate::config::{Settings, SettingsError};
/// Index types, comparison rules and the shared index contract.
pub use database::{
    Comparator, Equivalence, NaturalEq, NaturalOrder, OrderedIndex, ShardedSkipList, SkipList,
    SkipListConfig, Trie, UniqueIndex, UniqueShardedSkipList, UniqueSkipList,
};
/// Logging configuration.
pub use logging::{init_logging, LogFormat, LoggingConfig};
/// Operation errors and result types.
pub use skipshard_error::{IndexError, IndexResult, SkipShardResult, StackError};
