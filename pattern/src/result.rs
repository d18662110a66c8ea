//! Match results.

use crate::{PatternError, PatternResult};
use morpha_compiler::GroupKey;
use morpha_core::{AnnotationId, Offset, Span};
use morpha_feature::FeatureValue;
use std::collections::BTreeMap;

/// One accepted path through the pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch<O> {
    pub(crate) span: Span<O>,
    /// Every group the pattern defines; `None` where the path skipped it.
    pub(crate) groups: BTreeMap<GroupKey, Option<Span<O>>>,
    pub(crate) variables: BTreeMap<String, FeatureValue>,
    pub(crate) pattern_path: Vec<String>,
    /// Consumed annotations in traversal order.
    pub(crate) annotations: Vec<AnnotationId>,
    pub(crate) next_start: Option<AnnotationId>,
}

impl<O: Offset> PatternMatch<O> {
    pub fn span(&self) -> Span<O> {
        self.span
    }

    /// Span of a named group.
    ///
    /// # Panics
    ///
    /// Panics if the pattern defines no group called `name`.
    pub fn group(&self, name: &str) -> Option<Span<O>> {
        match self.try_group(name) {
            Ok(span) => span,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_group(&self, name: &str) -> PatternResult<Option<Span<O>>> {
        self.lookup(GroupKey::Named(name.to_string()))
    }

    /// Span of a numbered capture.
    pub fn capture(&self, id: u32) -> PatternResult<Option<Span<O>>> {
        self.lookup(GroupKey::Capture(id))
    }

    fn lookup(&self, key: GroupKey) -> PatternResult<Option<Span<O>>> {
        match self.groups.get(&key) {
            Some(span) => Ok(*span),
            None => Err(PatternError::unknown_group(key)),
        }
    }

    pub fn groups(&self) -> &BTreeMap<GroupKey, Option<Span<O>>> {
        &self.groups
    }

    pub fn variable(&self, name: &str) -> Option<&FeatureValue> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> &BTreeMap<String, FeatureValue> {
        &self.variables
    }

    /// Names of the nested patterns the path passed through, outermost first.
    pub fn pattern_path(&self) -> &[String] {
        &self.pattern_path
    }

    pub fn annotations(&self) -> &[AnnotationId] {
        &self.annotations
    }

    /// First visible annotation after the match.
    pub fn next_start(&self) -> Option<AnnotationId> {
        self.next_start
    }
}
