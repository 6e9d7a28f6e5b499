pub mod tree;
mod node;

/// Minimum degree `t` of the tree.
pub const MIN_DEGREE: usize = 3;
pub const MAX_KEYS: usize = 2 * MIN_DEGREE - 1;
pub const MIN_KEYS: usize = MIN_DEGREE - 1;
