//! Morpha Feature Structures
//!
//! Typed feature values and the unification engine over them.
//!
//! Responsibilities:
//! - Represent symbolic, string, variable and complex values
//! - Store feature structures in an arena so reentrant and cyclic graphs are plain indices
//! - Unify destructively with forwarding, guarded against revisiting node pairs
//! - Bind variables with agree/disagree polarity
//! - Negate simple values within their feature's inventory

mod binding;
mod builder;
mod display;
mod error;
mod structure;
mod unify;
mod value;

pub use binding::VariableBindings;
pub use builder::FeatureStructBuilder;
pub use display::{FeatureStructDisplay, FeatureValueDisplay};
pub use error::{FeatureError, FeatureResult, UnificationFailure};
pub use structure::FeatureStruct;
pub use unify::{MatchingMethod, Unifier};
pub use value::{FeatureValue, StringFeatureValue, SymbolicFeatureValue, VariableFeatureValue};
