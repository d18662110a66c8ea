//! Morpha Tests
//!
//! Scenario-driven integration tests for the matching engine.
//!
//! A [`Scenario`] names a pattern in the textual syntax, the input it runs
//! over and a list of steps. Each step queries the matcher and checks the
//! result against an [`Assertion`].

mod assertion;
mod error;
mod fixture;
mod scenario;

pub use assertion::{Assertion, AssertionBuilder};
pub use error::{ScenarioError, ScenarioResult};
pub use fixture::Phonology;
pub use scenario::{Query, Scenario};

pub mod prelude {
    pub use crate::{Assertion, AssertionBuilder, Phonology, Query, Scenario};
    pub use morpha_core::{AnnotationId, Direction, Span};
    pub use morpha_feature::VariableBindings;
    pub use morpha_pattern::{MatchMode, MatcherSettings, MatchingMethod};
}
