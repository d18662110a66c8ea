//! Front-end configuration.

use morpha_core::TypeId;

/// Settings for [`parse_pattern`](crate::parse_pattern).
#[derive(Debug, Clone, Default)]
pub struct ParseSettings {
    /// Annotation type for constraints written without `@Type`.
    pub default_type: Option<TypeId>,
    /// Name given to the parsed pattern.
    pub name: Option<String>,
}

impl ParseSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_type(mut self, ann_type: TypeId) -> Self {
        self.default_type = Some(ann_type);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
