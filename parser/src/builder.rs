//! Fluent construction of patterns in code.

use crate::ast::{Pattern, PatternNode, Side};
use morpha_core::TypeId;
use morpha_feature::FeatureStruct;

/// Builds a [`Pattern`] as a sequence of nodes.
///
/// ```ignore
/// let pattern = PatternBuilder::new()
///     .constraint(seg, voiced)
///     .group("coda", |g| g.constraint(seg, voiceless))
///     .optional(|o| o.constraint(seg, empty))
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct PatternBuilder {
    name: Option<String>,
    children: Vec<PatternNode>,
}

impl PatternBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            children: Vec::new(),
        }
    }

    pub fn node(mut self, node: PatternNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn constraint(self, ann_type: TypeId, fs: FeatureStruct) -> Self {
        self.node(PatternNode::constraint(ann_type, fs))
    }

    pub fn group<F>(self, name: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(PatternBuilder) -> PatternBuilder,
    {
        let inner = build(PatternBuilder::new());
        self.node(PatternNode::group(name, inner.children))
    }

    pub fn capture<F>(self, id: u32, build: F) -> Self
    where
        F: FnOnce(PatternBuilder) -> PatternBuilder,
    {
        let inner = build(PatternBuilder::new());
        self.node(PatternNode::capture(id, inner.children))
    }

    /// One branch per closure, in priority order.
    pub fn alternation<I, F>(self, branches: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: FnOnce(PatternBuilder) -> PatternBuilder,
    {
        let branches = branches
            .into_iter()
            .map(|build| PatternNode::sequence(build(PatternBuilder::new()).children));
        self.node(PatternNode::alternation(branches))
    }

    pub fn quantified<F>(self, min: u32, max: Option<u32>, build: F) -> Self
    where
        F: FnOnce(PatternBuilder) -> PatternBuilder,
    {
        let inner = PatternNode::sequence(build(PatternBuilder::new()).children);
        self.node(PatternNode::quantifier(min, max, inner))
    }

    pub fn optional<F>(self, build: F) -> Self
    where
        F: FnOnce(PatternBuilder) -> PatternBuilder,
    {
        self.quantified(0, Some(1), build)
    }

    pub fn zero_or_more<F>(self, build: F) -> Self
    where
        F: FnOnce(PatternBuilder) -> PatternBuilder,
    {
        self.quantified(0, None, build)
    }

    pub fn one_or_more<F>(self, build: F) -> Self
    where
        F: FnOnce(PatternBuilder) -> PatternBuilder,
    {
        self.quantified(1, None, build)
    }

    pub fn nested(self, pattern: Pattern) -> Self {
        self.node(PatternNode::NestedPattern(pattern))
    }

    pub fn left_margin(self) -> Self {
        self.node(PatternNode::Margin(Side::Left))
    }

    pub fn right_margin(self) -> Self {
        self.node(PatternNode::Margin(Side::Right))
    }

    pub fn build(self) -> Pattern {
        Pattern {
            name: self.name,
            children: self.children,
        }
    }
}
