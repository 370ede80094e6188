//! SkipList - конкурентный упорядоченный индекс.
//!
//! # Модули
//!
//! - `skiplist_base`: конкурентный список с дубликатами и массовой загрузкой.
//! - `unique`: вариант с уникальными ключами и обновлением на месте.
//! - `sharded`: несколько независимых списков за функцией шардирования.
//! - `unique_sharded`: шардированный вариант с уникальными ключами.
//! - `compare`: компараторы и отношения равенства.
//! - `level`: генераторы высот башен.
//! - `safety`: валидация и статистика.
//! - `traits`: общий интерфейс индексов.

mod arena;
mod bulk;

pub mod compare;
pub mod level;
pub mod safety;
pub mod sharded;
pub mod skiplist_base;
pub mod traits;
pub mod unique;
pub mod unique_sharded;

// Publicly re-export all types from the submodules to simplify access
// from external code.
pub use compare::*;
pub use level::*;
pub use safety::*;
pub use sharded::*;
pub use skiplist_base::*;
pub use traits::*;
pub use unique::*;
pub use unique_sharded::*;
