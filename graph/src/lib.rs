//! Morpha Graph
//!
//! The annotated input patterns are matched against.
//!
//! Responsibilities:
//! - Hold annotations (type, span, feature structure) in one list
//! - Order them for left-to-right and right-to-left traversal
//! - Find the annotations at the next position, including stacked and optional ones
//! - Answer edge-of-input questions for margin anchors

mod annotation;
mod list;

pub use annotation::Annotation;
pub use list::{AnnotationFilter, AnnotationList};
