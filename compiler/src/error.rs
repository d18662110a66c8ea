//! Compiler error types.

use thiserror::Error;

/// Errors that can occur while compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("alternation has no branches")]
    EmptyAlternation,

    #[error("quantifier maximum {max} is below minimum {min}")]
    InvalidQuantifier { min: u32, max: u32 },

    #[error("capture group {id} is defined more than once")]
    DuplicateCapture { id: u32 },

    #[error("determinization exceeded the limit of {limit} states")]
    StateLimit { limit: usize },
}

impl CompileError {
    pub fn invalid_quantifier(min: u32, max: u32) -> Self {
        Self::InvalidQuantifier { min, max }
    }

    pub fn duplicate_capture(id: u32) -> Self {
        Self::DuplicateCapture { id }
    }

    pub fn state_limit(limit: usize) -> Self {
        Self::StateLimit { limit }
    }
}

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;
