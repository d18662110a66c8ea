//! A single annotation.

use morpha_core::{Offset, Span, TypeId};
use morpha_feature::FeatureStruct;

/// A feature-bearing label attached to a span of the input.
#[derive(Debug, Clone)]
pub struct Annotation<O> {
    /// Type of this annotation (reference to the feature system).
    pub ann_type: TypeId,
    /// Covered range of the medium.
    pub span: Span<O>,
    /// Feature values of this annotation.
    pub fs: FeatureStruct,
    /// Optional annotations may be skipped by a match.
    pub optional: bool,
}

impl<O: Offset> Annotation<O> {
    /// Create a new annotation with the given properties.
    pub fn new(ann_type: TypeId, span: Span<O>, fs: FeatureStruct) -> Self {
        Self {
            ann_type,
            span,
            fs,
            optional: false,
        }
    }

    /// Mark as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}
