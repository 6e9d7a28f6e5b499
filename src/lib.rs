pub mod wordtree;

pub use wordtree::btree::tree::{BTree, InvariantViolation, Iter, WordTree};
pub use wordtree::btree::{MAX_KEYS, MIN_DEGREE, MIN_KEYS};
