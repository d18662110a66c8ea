//! Abstract Syntax Tree for patterns.

use morpha_core::TypeId;
use morpha_feature::FeatureStruct;
use std::collections::BTreeSet;

/// Source location information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// An edge of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Left,
    Right,
}

/// Consume one annotation of `ann_type` whose features unify with `fs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub ann_type: TypeId,
    pub fs: FeatureStruct,
}

impl Constraint {
    pub fn new(ann_type: TypeId, fs: FeatureStruct) -> Self {
        Self { ann_type, fs }
    }

    /// Variables referenced anywhere in the feature structure.
    pub fn variables(&self) -> BTreeSet<String> {
        self.fs.variables()
    }
}

/// A node of the pattern tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternNode {
    Constraint(Constraint),
    /// Ordered branches; earlier branches have priority.
    Alternation(Vec<PatternNode>),
    /// A sequence. Named groups report their span in a match.
    Group {
        name: Option<String>,
        children: Vec<PatternNode>,
    },
    /// A numbered capture.
    CapturingGroup { id: u32, children: Vec<PatternNode> },
    /// `max == None` is unbounded.
    Quantifier {
        min: u32,
        max: Option<u32>,
        child: Box<PatternNode>,
    },
    NestedPattern(Pattern),
    /// Zero-width assertion that the match touches an edge of the input.
    Margin(Side),
}

impl PatternNode {
    pub fn constraint(ann_type: TypeId, fs: FeatureStruct) -> Self {
        PatternNode::Constraint(Constraint::new(ann_type, fs))
    }

    pub fn alternation(branches: impl IntoIterator<Item = PatternNode>) -> Self {
        PatternNode::Alternation(branches.into_iter().collect())
    }

    /// An unnamed group: plain sequencing.
    pub fn sequence(children: impl IntoIterator<Item = PatternNode>) -> Self {
        PatternNode::Group {
            name: None,
            children: children.into_iter().collect(),
        }
    }

    pub fn group(name: impl Into<String>, children: impl IntoIterator<Item = PatternNode>) -> Self {
        PatternNode::Group {
            name: Some(name.into()),
            children: children.into_iter().collect(),
        }
    }

    pub fn capture(id: u32, children: impl IntoIterator<Item = PatternNode>) -> Self {
        PatternNode::CapturingGroup {
            id,
            children: children.into_iter().collect(),
        }
    }

    pub fn quantifier(min: u32, max: Option<u32>, child: PatternNode) -> Self {
        PatternNode::Quantifier {
            min,
            max,
            child: Box::new(child),
        }
    }

    pub fn optional(child: PatternNode) -> Self {
        Self::quantifier(0, Some(1), child)
    }

    pub fn zero_or_more(child: PatternNode) -> Self {
        Self::quantifier(0, None, child)
    }

    pub fn one_or_more(child: PatternNode) -> Self {
        Self::quantifier(1, None, child)
    }

    pub fn margin(side: Side) -> Self {
        PatternNode::Margin(side)
    }

    /// Children of a plain sequence, or the node itself.
    pub fn into_sequence(self) -> Vec<PatternNode> {
        match self {
            PatternNode::Group {
                name: None,
                children,
            } => children,
            other => vec![other],
        }
    }

    /// Returns true if any constraint below this node references a variable.
    pub fn has_variables(&self) -> bool {
        match self {
            PatternNode::Constraint(c) => c.fs.has_variables(),
            PatternNode::Alternation(children)
            | PatternNode::Group { children, .. }
            | PatternNode::CapturingGroup { children, .. } => {
                children.iter().any(PatternNode::has_variables)
            }
            PatternNode::Quantifier { child, .. } => child.has_variables(),
            PatternNode::NestedPattern(p) => p.children.iter().any(PatternNode::has_variables),
            PatternNode::Margin(_) => false,
        }
    }
}

/// A whole pattern: a sequence, optionally named.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pattern {
    pub name: Option<String>,
    pub children: Vec<PatternNode>,
}

impl Pattern {
    pub fn new(children: impl IntoIterator<Item = PatternNode>) -> Self {
        Self {
            name: None,
            children: children.into_iter().collect(),
        }
    }

    pub fn named(name: impl Into<String>, children: impl IntoIterator<Item = PatternNode>) -> Self {
        Self {
            name: Some(name.into()),
            children: children.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Names of all named groups, in first-appearance order, without repeats.
    pub fn group_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for child in &self.children {
            collect_group_names(child, &mut names);
        }
        names
    }
}

fn collect_group_names(node: &PatternNode, names: &mut Vec<String>) {
    match node {
        PatternNode::Group { name, children } => {
            if let Some(name) = name {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            for child in children {
                collect_group_names(child, names);
            }
        }
        PatternNode::Alternation(children) | PatternNode::CapturingGroup { children, .. } => {
            for child in children {
                collect_group_names(child, names);
            }
        }
        PatternNode::Quantifier { child, .. } => collect_group_names(child, names),
        PatternNode::NestedPattern(p) => {
            for child in &p.children {
                collect_group_names(child, names);
            }
        }
        PatternNode::Constraint(_) | PatternNode::Margin(_) => {}
    }
}
