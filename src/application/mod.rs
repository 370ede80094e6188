pub mod autocomplete;
pub mod leaderboard;

pub use autocomplete::Autocomplete;
pub use leaderboard::{Leaderboard, RankedScore};
