//! Matcher configuration.

use morpha_compiler::CompileSettings;
use morpha_core::{Direction, TypeId};
use morpha_feature::MatchingMethod;

/// How many results a start position yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// The preferred match only.
    #[default]
    First,
    /// Every accepting path, preferred first.
    All,
}

/// Settings for a [`Matcher`](crate::Matcher).
#[derive(Debug, Clone, Default)]
pub struct MatcherSettings {
    pub direction: Direction,
    /// Fill features a constraint names and an annotation lacks from
    /// their defaults.
    pub use_defaults: bool,
    pub matching_method: MatchingMethod,
    /// The match must begin at the edge the traversal starts from.
    pub anchored_to_start: bool,
    /// The match must end at the edge the traversal ends at.
    pub anchored_to_end: bool,
    /// When set, only annotations of these types are visible.
    pub annotation_types: Option<Vec<TypeId>>,
    pub compile: CompileSettings,
}

impl MatcherSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_defaults(mut self, use_defaults: bool) -> Self {
        self.use_defaults = use_defaults;
        self
    }

    pub fn with_matching_method(mut self, method: MatchingMethod) -> Self {
        self.matching_method = method;
        self
    }

    pub fn with_anchored_to_start(mut self, anchored: bool) -> Self {
        self.anchored_to_start = anchored;
        self
    }

    pub fn with_anchored_to_end(mut self, anchored: bool) -> Self {
        self.anchored_to_end = anchored;
        self
    }

    pub fn with_annotation_types(mut self, types: impl IntoIterator<Item = TypeId>) -> Self {
        self.annotation_types = Some(types.into_iter().collect());
        self
    }

    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.compile = self.compile.with_max_states(max_states);
        self
    }
}
