pub mod lcg;
mod recur_backtrack;
pub mod stack;

use std::fmt;

pub use lcg::Lcg;
pub use recur_backtrack::{GeneratorState, MazeGenerator};
pub use stack::BoundedStack;

/// Stack capacity of the reference configuration.
pub const DEFAULT_STACK_CAPACITY: usize = 5000;

/// Counters collected over one completed generation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    /// Maze cells visited, the start cell included.
    pub visited: usize,
    /// Two-cell carves, one per tree edge.
    pub edges: usize,
    pub pushes: usize,
    pub pops: usize,
    /// Deepest the stack got.
    pub peak_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The backtracking stack grew past its capacity. The maze is left
    /// incomplete with the overflow sentinel drawn in the bottom-right corner.
    StackOverflow { depth: usize, capacity: usize },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::StackOverflow { depth, capacity } => write!(
                f,
                "backtracking stack overflowed: depth {} exceeds capacity {}",
                depth, capacity
            ),
        }
    }
}

impl std::error::Error for GenerationError {}
