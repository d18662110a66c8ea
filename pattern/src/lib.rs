//! Morpha Pattern
//!
//! Match compiled patterns against annotation lists.
//!
//! Responsibilities:
//! - Compile a pattern once per direction behind a `Matcher`
//! - Walk the automaton over stacked and optional annotations
//! - Replay accepting paths to recover group spans and variable bindings
//! - Enumerate first or all matches in a stable order

mod error;
mod iter;
mod matcher;
mod replay;
mod result;
mod settings;

pub use error::{PatternError, PatternResult};
pub use iter::Matches;
pub use matcher::Matcher;
pub use morpha_compiler::GroupKey;
pub use morpha_feature::MatchingMethod;
pub use result::PatternMatch;
pub use settings::{MatchMode, MatcherSettings};
