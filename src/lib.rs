#![warn(clippy::all, clippy::cargo)]

mod error;
mod quadtree;
mod utils;

pub use error::{Error, Result};
pub use quadtree::{macro_step_generations, NodeId, QuadTreeNode, Universe};
pub use utils::with_delimiters;

/// Deepest quadtree level a universe will allocate. Keeps side lengths and
/// node-local coordinates within `u64`; recursion depth stays bounded by
/// the same number.
pub const MAX_LEVEL: u8 = 60;
