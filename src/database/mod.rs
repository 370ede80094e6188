pub mod skiplist;
pub mod trie;

pub use skiplist::*;
pub use trie::*;
