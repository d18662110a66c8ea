//! Feature structure error types.

use morpha_core::FeatureId;
use morpha_registry::ValueKind;
use thiserror::Error;

/// Errors raised while building or validating feature structures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeatureError {
    /// Unknown feature name.
    #[error("Unknown feature '{name}'")]
    UnknownFeature { name: String },

    /// Feature id not registered in the system.
    #[error("Feature {id} is not registered")]
    UnregisteredFeature { id: FeatureId },

    /// Unknown symbol on a symbolic feature.
    #[error("Unknown symbol '{symbol}' on feature '{feature}'")]
    UnknownSymbol { feature: String, symbol: String },

    /// Value kind does not fit the feature.
    #[error("Feature '{feature}' is {expected} but was given a {found} value")]
    KindMismatch {
        feature: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// An empty feature path.
    #[error("Feature path is empty")]
    EmptyPath,

    /// A path step lands on a simple value.
    #[error("Feature path passes through simple value at {feature}")]
    PathThroughSimpleValue { feature: FeatureId },

    /// A path that must exist does not.
    #[error("No value at feature path")]
    PathNotFound,
}

impl FeatureError {
    pub fn unknown_feature(name: impl Into<String>) -> Self {
        Self::UnknownFeature { name: name.into() }
    }

    pub fn unknown_symbol(feature: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self::UnknownSymbol {
            feature: feature.into(),
            symbol: symbol.into(),
        }
    }

    pub fn kind_mismatch(feature: impl Into<String>, expected: ValueKind, found: ValueKind) -> Self {
        Self::KindMismatch {
            feature: feature.into(),
            expected,
            found,
        }
    }
}

/// Result type for feature structure construction.
pub type FeatureResult<T> = Result<T, FeatureError>;

/// Why two values failed to unify.
///
/// Failures are ordinary outcomes of constraint solving, not faults.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnificationFailure {
    #[error("disjoint symbol sets on {feature}")]
    DisjointSymbols { feature: FeatureId },

    #[error("disjoint string values at {}", slot_label(.feature))]
    DisjointStrings { feature: Option<FeatureId> },

    #[error("complex and simple values meet at {}", slot_label(.feature))]
    KindMismatch { feature: Option<FeatureId> },

    #[error("symbols of {left} and {right} cannot be unified")]
    FeatureMismatch { left: FeatureId, right: FeatureId },

    #[error("value contradicts the binding of variable '{variable}'")]
    ContradictoryBinding { variable: String },

    #[error("variables '{left}' and '{right}' differ in name or polarity")]
    VariableMismatch { left: String, right: String },
}

fn slot_label(feature: &Option<FeatureId>) -> String {
    match feature {
        Some(id) => id.to_string(),
        None => "root".to_string(),
    }
}
