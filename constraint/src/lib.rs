//! Morpha Constraint
//!
//! Conditions: the predicates that guard automaton transitions.
//!
//! Responsibilities:
//! - Represent a condition as a conjunction of (type, feature structure, polarity) literals
//! - Conjoin conditions by literal-set union
//! - Negate conditions by flipping every literal's polarity
//! - Test an annotation against a condition by unifiability
//! - Reject structurally unsatisfiable combinations cheaply

mod condition;

pub use condition::{Condition, ConditionDisplay, Literal};
