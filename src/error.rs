use thiserror::Error;

/// Failures surfaced by universe operations.
///
/// The first three variants indicate a programming bug in the caller and
/// should not be retried blindly. [`Error::OutOfBounds`] is recoverable:
/// expand the node and retry. [`Error::Capacity`] is terminal for the
/// current universe.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A child handed to `create` (or a composition primitive) is not at
    /// the level the parent requires.
    #[error("child level mismatch: expected level {expected}, found level {found}")]
    ChildLevelMismatch { expected: u8, found: u8 },

    /// The operation needs a node of at least `min` levels.
    #[error("node of level {level} is below the minimum level {min} for this operation")]
    LevelTooSmall { level: u8, min: u8 },

    /// `set_cell` target outside `[0, 2^level)`.
    #[error("cell ({x}, {y}) is outside a level-{level} node")]
    OutOfBounds { x: u64, y: u64, level: u8 },

    /// `advance` asked for more generations than a node of this level can
    /// produce in one call.
    #[error("{steps} generations exceed the budget of {max} for a level-{level} node")]
    TooManySteps { steps: u64, max: u64, level: u8 },

    /// Node id space or the maximum quadtree depth is exhausted.
    #[error("node storage exhausted")]
    Capacity,
}

pub type Result<T> = std::result::Result<T, Error>;
