//! Pattern error types.

use morpha_compiler::{CompileError, GroupKey};
use thiserror::Error;

/// Errors that can occur while building or querying a matcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern failed to compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A group the pattern never defined.
    #[error("Unknown group '{group}'")]
    UnknownGroup { group: GroupKey },
}

impl PatternError {
    pub fn unknown_group(group: GroupKey) -> Self {
        Self::UnknownGroup { group }
    }
}

/// Result type for pattern operations.
pub type PatternResult<T> = Result<T, PatternError>;
