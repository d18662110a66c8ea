//! Morpha Registry
//!
//! The feature system: an immutable vocabulary of features, their legal
//! symbols, and the annotation types patterns may constrain.
//!
//! Responsibilities:
//! - Register features with their value kind and optional default
//! - Assign every symbol a dense index within its feature
//! - Resolve names to ids for builders and the textual front-end
//! - Freeze the vocabulary so it can be shared read-only across threads

mod builder;
mod registry;
mod types;

pub use builder::{FeatureBuilder, FeatureSystemBuilder, RegistryError, RegistryResult};
pub use registry::FeatureSystem;
pub use types::{AnnotationType, DefaultValue, Feature, FeatureSymbol, ValueKind};
