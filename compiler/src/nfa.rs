//! Pattern AST to tagged NFA.
//!
//! States own their outgoing arcs; arc order is priority order. Each state
//! returned by `compile_node` is the exit of the fragment that starts at the
//! state passed in, so fragments chain without patching.

use crate::{CompileError, CompileResult};
use morpha_constraint::Condition;
use morpha_core::{Direction, TypeId};
use morpha_feature::FeatureStruct;
use morpha_parser::{Pattern, PatternNode, Side};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NfaStateId(pub u32);

impl NfaStateId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// One constraint occurrence in the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub u32);

impl ConstraintId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// An interned, single-literal condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionId(pub u32);

impl ConditionId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Identifies a group in a match result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Named(String),
    Capture(u32),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Named(name) => f.write_str(name),
            GroupKey::Capture(id) => write!(f, "#{}", id),
        }
    }
}

/// Zero-width operations recorded along a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagOp {
    /// Group slot opens at the current boundary.
    Open(u32),
    /// Group slot closes at the current boundary.
    Close(u32),
    /// The current boundary must lie on an edge of the input.
    Anchor(Side),
    /// The path enters the named nested pattern with this index.
    Enter(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcLabel {
    Epsilon,
    Tag(TagOp),
    Consume(ConstraintId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
    pub label: ArcLabel,
    pub target: NfaStateId,
}

#[derive(Debug, Clone, Default)]
pub struct NfaState {
    pub arcs: Vec<Arc>,
    pub accepting: bool,
}

impl NfaState {
    pub fn consumes(&self) -> bool {
        self.arcs
            .iter()
            .any(|arc| matches!(arc.label, ArcLabel::Consume(_)))
    }
}

/// A constraint as the automaton sees it.
#[derive(Debug, Clone)]
pub struct CompiledConstraint {
    pub ann_type: TypeId,
    pub fs: FeatureStruct,
    pub condition: ConditionId,
    /// Replay must unify this constraint to collect bindings.
    pub has_variables: bool,
}

#[derive(Debug, Clone)]
pub struct Nfa {
    pub states: Vec<NfaState>,
    pub start: NfaStateId,
    pub accept: NfaStateId,
}

impl Nfa {
    pub fn state(&self, id: NfaStateId) -> &NfaState {
        &self.states[id.index()]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Everything compilation of the AST produces besides the DFA.
#[derive(Debug)]
pub(crate) struct NfaOutput {
    pub nfa: Nfa,
    pub constraints: Vec<CompiledConstraint>,
    pub conditions: Vec<Condition>,
    pub groups: Vec<GroupKey>,
    pub paths: Vec<String>,
}

pub(crate) struct NfaBuilder {
    dir: Direction,
    states: Vec<NfaState>,
    constraints: Vec<CompiledConstraint>,
    conditions: Vec<Condition>,
    groups: Vec<GroupKey>,
    slots: FxHashMap<GroupKey, u32>,
    paths: Vec<String>,
}

impl NfaBuilder {
    pub fn new(dir: Direction) -> Self {
        Self {
            dir,
            states: Vec::new(),
            constraints: Vec::new(),
            conditions: Vec::new(),
            groups: Vec::new(),
            slots: FxHashMap::default(),
            paths: Vec::new(),
        }
    }

    pub fn build(mut self, pattern: &Pattern) -> CompileResult<NfaOutput> {
        let mut captures = FxHashSet::default();
        for child in &pattern.children {
            check_captures(child, &mut captures)?;
        }

        let start = self.add_state();
        let accept = self.compile_pattern(pattern, start)?;
        self.states[accept.index()].accepting = true;

        Ok(NfaOutput {
            nfa: Nfa {
                states: self.states,
                start,
                accept,
            },
            constraints: self.constraints,
            conditions: self.conditions,
            groups: self.groups,
            paths: self.paths,
        })
    }

    fn add_state(&mut self) -> NfaStateId {
        let id = NfaStateId(self.states.len() as u32);
        self.states.push(NfaState::default());
        id
    }

    fn add_arc(&mut self, from: NfaStateId, label: ArcLabel, to: NfaStateId) {
        self.states[from.index()].arcs.push(Arc { label, target: to });
    }

    /// A fresh state reached from `from` by `label`.
    fn step(&mut self, from: NfaStateId, label: ArcLabel) -> NfaStateId {
        let to = self.add_state();
        self.add_arc(from, label, to);
        to
    }

    fn slot(&mut self, key: GroupKey) -> u32 {
        if let Some(slot) = self.slots.get(&key) {
            return *slot;
        }
        let slot = self.groups.len() as u32;
        self.groups.push(key.clone());
        self.slots.insert(key, slot);
        slot
    }

    fn condition(&mut self, ann_type: TypeId, fs: &FeatureStruct) -> ConditionId {
        let condition = Condition::new(ann_type, fs.clone());
        if let Some(pos) = self.conditions.iter().position(|c| *c == condition) {
            return ConditionId(pos as u32);
        }
        self.conditions.push(condition);
        ConditionId(self.conditions.len() as u32 - 1)
    }

    fn compile_pattern(&mut self, pattern: &Pattern, from: NfaStateId) -> CompileResult<NfaStateId> {
        let from = match &pattern.name {
            Some(name) => {
                let index = self.paths.len() as u32;
                self.paths.push(name.clone());
                self.step(from, ArcLabel::Tag(TagOp::Enter(index)))
            }
            None => from,
        };
        self.compile_sequence(&pattern.children, from)
    }

    fn compile_sequence(
        &mut self,
        children: &[PatternNode],
        from: NfaStateId,
    ) -> CompileResult<NfaStateId> {
        let mut cur = from;
        if self.dir.is_left_to_right() {
            for child in children {
                cur = self.compile_node(child, cur)?;
            }
        } else {
            for child in children.iter().rev() {
                cur = self.compile_node(child, cur)?;
            }
        }
        Ok(cur)
    }

    fn compile_node(&mut self, node: &PatternNode, from: NfaStateId) -> CompileResult<NfaStateId> {
        match node {
            PatternNode::Constraint(c) => {
                let condition = self.condition(c.ann_type, &c.fs);
                let id = ConstraintId(self.constraints.len() as u32);
                self.constraints.push(CompiledConstraint {
                    ann_type: c.ann_type,
                    fs: c.fs.clone(),
                    condition,
                    has_variables: c.fs.has_variables(),
                });
                Ok(self.step(from, ArcLabel::Consume(id)))
            }
            PatternNode::Alternation(branches) => {
                if branches.is_empty() {
                    return Err(CompileError::EmptyAlternation);
                }
                let entry = self.step(from, ArcLabel::Epsilon);
                let exit = self.add_state();
                for branch in branches {
                    let start = self.step(entry, ArcLabel::Epsilon);
                    let end = self.compile_node(branch, start)?;
                    self.add_arc(end, ArcLabel::Epsilon, exit);
                }
                Ok(exit)
            }
            PatternNode::Group { name: None, children } => self.compile_sequence(children, from),
            PatternNode::Group {
                name: Some(name),
                children,
            } => {
                let slot = self.slot(GroupKey::Named(name.clone()));
                self.compile_tagged(slot, children, from)
            }
            PatternNode::CapturingGroup { id, children } => {
                let slot = self.slot(GroupKey::Capture(*id));
                self.compile_tagged(slot, children, from)
            }
            PatternNode::Quantifier { min, max, child } => {
                self.compile_quantifier(*min, *max, child, from)
            }
            PatternNode::NestedPattern(pattern) => self.compile_pattern(pattern, from),
            PatternNode::Margin(side) => Ok(self.step(from, ArcLabel::Tag(TagOp::Anchor(*side)))),
        }
    }

    fn compile_tagged(
        &mut self,
        slot: u32,
        children: &[PatternNode],
        from: NfaStateId,
    ) -> CompileResult<NfaStateId> {
        let inner = self.step(from, ArcLabel::Tag(TagOp::Open(slot)));
        let end = self.compile_sequence(children, inner)?;
        Ok(self.step(end, ArcLabel::Tag(TagOp::Close(slot))))
    }

    fn compile_quantifier(
        &mut self,
        min: u32,
        max: Option<u32>,
        child: &PatternNode,
        from: NfaStateId,
    ) -> CompileResult<NfaStateId> {
        if let Some(max) = max {
            if max < min {
                return Err(CompileError::invalid_quantifier(min, max));
            }
        }

        let mut cur = from;
        for _ in 0..min {
            cur = self.compile_node(child, cur)?;
        }

        match max {
            None => {
                // Continue before exit: repetition is greedy.
                let head = self.step(cur, ArcLabel::Epsilon);
                let body = self.step(head, ArcLabel::Epsilon);
                let body_end = self.compile_node(child, body)?;
                self.add_arc(body_end, ArcLabel::Epsilon, head);
                Ok(self.step(head, ArcLabel::Epsilon))
            }
            Some(max) => {
                if max == min {
                    return Ok(cur);
                }
                let exit = self.add_state();
                for _ in min..max {
                    let body = self.step(cur, ArcLabel::Epsilon);
                    self.add_arc(cur, ArcLabel::Epsilon, exit);
                    cur = self.compile_node(child, body)?;
                }
                self.add_arc(cur, ArcLabel::Epsilon, exit);
                Ok(exit)
            }
        }
    }
}

fn check_captures(node: &PatternNode, seen: &mut FxHashSet<u32>) -> CompileResult<()> {
    match node {
        PatternNode::CapturingGroup { id, children } => {
            if !seen.insert(*id) {
                return Err(CompileError::duplicate_capture(*id));
            }
            children.iter().try_for_each(|c| check_captures(c, seen))
        }
        PatternNode::Alternation(children) | PatternNode::Group { children, .. } => {
            children.iter().try_for_each(|c| check_captures(c, seen))
        }
        PatternNode::Quantifier { child, .. } => check_captures(child, seen),
        PatternNode::NestedPattern(p) => p.children.iter().try_for_each(|c| check_captures(c, seen)),
        PatternNode::Constraint(_) | PatternNode::Margin(_) => Ok(()),
    }
}
