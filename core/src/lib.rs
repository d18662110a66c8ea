//! Morpha Core Types
//!
//! This crate provides the foundational types used throughout the Morpha system:
//! - Identity types (FeatureId, SymbolId, TypeId, AnnotationId)
//! - Traversal direction (left-to-right / right-to-left)
//! - Spans over an opaque, totally ordered offset type
//! - Dense symbol bitsets used by symbolic feature values

mod direction;
mod id;
mod span;
mod symbols;

pub use direction::*;
pub use id::*;
pub use span::*;
pub use symbols::*;
