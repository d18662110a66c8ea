//! Arena-backed feature structures.
//!
//! Every value of a structure lives in one `Vec` of nodes and refers to its
//! children by index, so reentrancy (two features sharing one value) and
//! cycles need no shared ownership. Destructive unification never rewrites a
//! node's kind; it only sets the node's forward pointer, and every read goes
//! through [`FeatureStruct::resolve`].

use crate::{
    FeatureError, FeatureResult, FeatureValue, StringFeatureValue, SymbolicFeatureValue,
    VariableFeatureValue,
};
use morpha_core::FeatureId;
use morpha_registry::{FeatureSystem, ValueKind};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeMap, BTreeSet};

/// Index of a node inside one structure's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The payload of an arena node.
#[derive(Debug, Clone)]
pub(crate) enum Slot {
    Symbolic(SymbolicFeatureValue),
    String(StringFeatureValue),
    Variable(VariableFeatureValue),
    Complex(BTreeMap<FeatureId, NodeId>),
}

impl Slot {
    pub(crate) fn kind(&self) -> ValueKind {
        match self {
            Slot::Symbolic(_) => ValueKind::Symbol,
            Slot::String(_) => ValueKind::String,
            Slot::Variable(_) => ValueKind::Variable,
            Slot::Complex(_) => ValueKind::Complex,
        }
    }

    /// The simple value held by this slot; `None` for complex slots.
    pub(crate) fn to_simple_value(&self) -> Option<FeatureValue> {
        match self {
            Slot::Symbolic(v) => Some(FeatureValue::Symbolic(v.clone())),
            Slot::String(v) => Some(FeatureValue::String(v.clone())),
            Slot::Variable(v) => Some(FeatureValue::Variable(v.clone())),
            Slot::Complex(_) => None,
        }
    }

    /// Slot for a simple value; `None` for complex values.
    pub(crate) fn from_simple_value(value: &FeatureValue) -> Option<Slot> {
        match value {
            FeatureValue::Symbolic(v) => Some(Slot::Symbolic(v.clone())),
            FeatureValue::String(v) => Some(Slot::String(v.clone())),
            FeatureValue::Variable(v) => Some(Slot::Variable(v.clone())),
            FeatureValue::Complex(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) slot: Slot,
    pub(crate) forward: Option<NodeId>,
}

/// A feature structure: an ordered map from features to values whose
/// values may themselves be feature structures.
#[derive(Debug, Clone)]
pub struct FeatureStruct {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for FeatureStruct {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureStruct {
    /// Create an empty feature structure.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                slot: Slot::Complex(BTreeMap::new()),
                forward: None,
            }],
            root: NodeId(0),
        }
    }

    // ==================== Arena Access ====================

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn push(&mut self, slot: Slot) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            slot,
            forward: None,
        });
        id
    }

    /// Follow forward pointers to the node currently standing for `id`.
    pub(crate) fn resolve(&self, mut id: NodeId) -> NodeId {
        while let Some(next) = self.nodes[id.index()].forward {
            id = next;
        }
        id
    }

    pub(crate) fn slot(&self, id: NodeId) -> &Slot {
        &self.nodes[self.resolve(id).index()].slot
    }

    pub(crate) fn set_slot(&mut self, id: NodeId, slot: Slot) {
        let id = self.resolve(id);
        self.nodes[id.index()].slot = slot;
    }

    /// Redirect `from` to `to`. Both must already be resolved.
    pub(crate) fn forward(&mut self, from: NodeId, to: NodeId) {
        debug_assert_eq!(self.resolve(from), from);
        if from != to {
            self.nodes[from.index()].forward = Some(to);
        }
    }

    pub(crate) fn child(&self, id: NodeId, feature: FeatureId) -> Option<NodeId> {
        match self.slot(id) {
            Slot::Complex(map) => map.get(&feature).copied(),
            _ => None,
        }
    }

    pub(crate) fn insert_child(&mut self, id: NodeId, feature: FeatureId, child: NodeId) {
        let id = self.resolve(id);
        if let Slot::Complex(map) = &mut self.nodes[id.index()].slot {
            map.insert(feature, child);
        }
    }

    /// Copy another structure's arena into this one. Returns the new id of
    /// its root.
    pub(crate) fn import(&mut self, other: &FeatureStruct) -> NodeId {
        let offset = self.nodes.len() as u32;
        let shift = |id: NodeId| NodeId(id.0 + offset);
        for node in &other.nodes {
            let slot = match &node.slot {
                Slot::Complex(map) => {
                    Slot::Complex(map.iter().map(|(f, c)| (*f, shift(*c))).collect())
                }
                simple => simple.clone(),
            };
            self.nodes.push(Node {
                slot,
                forward: node.forward.map(shift),
            });
        }
        shift(other.root)
    }

    /// Add a value to the arena, returning its node.
    pub(crate) fn insert_value(&mut self, value: &FeatureValue) -> NodeId {
        match value {
            FeatureValue::Complex(fs) => self.import(fs),
            simple => match Slot::from_simple_value(simple) {
                Some(slot) => self.push(slot),
                None => self.push(Slot::Complex(BTreeMap::new())),
            },
        }
    }

    /// A fresh structure holding only what is reachable from `from`, with
    /// every forward pointer resolved.
    pub(crate) fn compact(&self, from: NodeId) -> FeatureStruct {
        let mut out = FeatureStruct {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let mut remap = FxHashMap::default();
        out.root = self.compact_node(from, &mut out, &mut remap);
        out
    }

    fn compact_node(
        &self,
        id: NodeId,
        out: &mut FeatureStruct,
        remap: &mut FxHashMap<NodeId, NodeId>,
    ) -> NodeId {
        let id = self.resolve(id);
        if let Some(&done) = remap.get(&id) {
            return done;
        }
        match self.slot(id) {
            Slot::Complex(map) => {
                let new_id = out.push(Slot::Complex(BTreeMap::new()));
                remap.insert(id, new_id);
                for (feature, child) in map {
                    let new_child = self.compact_node(*child, out, remap);
                    out.insert_child(new_id, *feature, new_child);
                }
                new_id
            }
            simple => {
                let new_id = out.push(simple.clone());
                remap.insert(id, new_id);
                new_id
            }
        }
    }

    /// Snapshot of the value at a node.
    pub(crate) fn node_value(&self, id: NodeId) -> FeatureValue {
        match self.slot(id).to_simple_value() {
            Some(value) => value,
            None => FeatureValue::Complex(self.compact(id)),
        }
    }

    // ==================== Root Features ====================

    /// Returns true if no feature is set.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of features set at the top level.
    pub fn len(&self) -> usize {
        match self.slot(self.root) {
            Slot::Complex(map) => map.len(),
            _ => 0,
        }
    }

    /// Top-level features in id order.
    pub fn features(&self) -> impl Iterator<Item = FeatureId> + '_ {
        let keys: Vec<FeatureId> = match self.slot(self.root) {
            Slot::Complex(map) => map.keys().copied().collect(),
            _ => Vec::new(),
        };
        keys.into_iter()
    }

    pub fn contains(&self, feature: FeatureId) -> bool {
        self.child(self.root, feature).is_some()
    }

    /// The value of a top-level feature.
    pub fn get(&self, feature: FeatureId) -> Option<FeatureValue> {
        self.child(self.root, feature).map(|id| self.node_value(id))
    }

    /// The symbolic value of a top-level feature, if it has one.
    pub fn symbolic(&self, feature: FeatureId) -> Option<&SymbolicFeatureValue> {
        match self.child(self.root, feature).map(|id| self.slot(id)) {
            Some(Slot::Symbolic(v)) => Some(v),
            _ => None,
        }
    }

    /// Set a top-level feature, replacing any previous value.
    pub fn set(&mut self, feature: FeatureId, value: impl Into<FeatureValue>) {
        let node = self.insert_value(&value.into());
        let root = self.root;
        self.insert_child(root, feature, node);
    }

    /// Builder-style [`FeatureStruct::set`].
    pub fn with(mut self, feature: FeatureId, value: impl Into<FeatureValue>) -> Self {
        self.set(feature, value);
        self
    }

    // ==================== Paths ====================

    fn node_at(&self, path: &[FeatureId]) -> Option<NodeId> {
        path.iter()
            .try_fold(self.root, |node, feature| self.child(node, *feature))
    }

    /// Walk `path`, creating empty complex values on the way.
    fn ensure_parent(&mut self, path: &[FeatureId]) -> FeatureResult<(NodeId, FeatureId)> {
        let (last, parents) = path.split_last().ok_or(FeatureError::EmptyPath)?;
        let mut node = self.root;
        for feature in parents {
            node = match self.child(node, *feature) {
                Some(child) => {
                    if !matches!(self.slot(child), Slot::Complex(_)) {
                        return Err(FeatureError::PathThroughSimpleValue { feature: *feature });
                    }
                    child
                }
                None => {
                    let child = self.push(Slot::Complex(BTreeMap::new()));
                    self.insert_child(node, *feature, child);
                    child
                }
            };
        }
        Ok((node, *last))
    }

    /// The value at a feature path.
    pub fn value_at(&self, path: &[FeatureId]) -> Option<FeatureValue> {
        self.node_at(path).map(|id| self.node_value(id))
    }

    /// Set the value at a feature path, creating intermediate structures.
    pub fn set_at(&mut self, path: &[FeatureId], value: impl Into<FeatureValue>) -> FeatureResult<()> {
        let (parent, feature) = self.ensure_parent(path)?;
        let node = self.insert_value(&value.into());
        self.insert_child(parent, feature, node);
        Ok(())
    }

    /// Make `to` point at the very value found at `from` (reentrancy).
    pub fn share(&mut self, from: &[FeatureId], to: &[FeatureId]) -> FeatureResult<()> {
        let node = self.node_at(from).ok_or(FeatureError::PathNotFound)?;
        let (parent, feature) = self.ensure_parent(to)?;
        self.insert_child(parent, feature, node);
        Ok(())
    }

    /// Returns true if both paths lead to one shared value.
    pub fn is_shared(&self, a: &[FeatureId], b: &[FeatureId]) -> bool {
        match (self.node_at(a), self.node_at(b)) {
            (Some(x), Some(y)) => self.resolve(x) == self.resolve(y),
            _ => false,
        }
    }

    // ==================== Inspection ====================

    fn reachable(&self) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        let mut stack = vec![self.resolve(self.root)];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            if let Slot::Complex(map) = self.slot(id) {
                stack.extend(map.values().rev().map(|c| self.resolve(*c)));
            }
        }
        order
    }

    /// Names of every variable reachable from the root.
    pub fn variables(&self) -> BTreeSet<String> {
        self.reachable()
            .into_iter()
            .filter_map(|id| match self.slot(id) {
                Slot::Variable(v) => Some(v.name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn has_variables(&self) -> bool {
        self.reachable()
            .into_iter()
            .any(|id| matches!(self.slot(id), Slot::Variable(_)))
    }

    /// Check every value against the kind and inventory of its feature.
    pub fn validate(&self, system: &FeatureSystem) -> FeatureResult<()> {
        for id in self.reachable() {
            let Slot::Complex(map) = self.slot(id) else {
                continue;
            };
            for (feature_id, child) in map {
                let feature = system
                    .feature(*feature_id)
                    .ok_or(FeatureError::UnregisteredFeature { id: *feature_id })?;
                let slot = self.slot(*child);
                let fits = match slot {
                    Slot::Symbolic(v) => {
                        feature.kind == ValueKind::Symbol
                            && v.feature() == *feature_id
                            && v.symbols().is_subset(&feature.possible_symbols())
                    }
                    Slot::String(_) => feature.kind == ValueKind::String,
                    Slot::Variable(_) => {
                        matches!(feature.kind, ValueKind::Symbol | ValueKind::String)
                    }
                    Slot::Complex(_) => feature.kind == ValueKind::Complex,
                };
                if !fits {
                    return Err(FeatureError::kind_mismatch(
                        feature.name.clone(),
                        feature.kind,
                        slot.kind(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn equal_nodes(
        &self,
        a: NodeId,
        other: &FeatureStruct,
        b: NodeId,
        paired: &mut FxHashMap<NodeId, NodeId>,
    ) -> bool {
        let a = self.resolve(a);
        let b = other.resolve(b);
        if let Some(&seen) = paired.get(&a) {
            return seen == b;
        }
        paired.insert(a, b);
        match (self.slot(a), other.slot(b)) {
            (Slot::Complex(x), Slot::Complex(y)) => {
                x.len() == y.len()
                    && x.iter().zip(y.iter()).all(|((fx, cx), (fy, cy))| {
                        fx == fy && self.equal_nodes(*cx, other, *cy, paired)
                    })
            }
            (Slot::Symbolic(x), Slot::Symbolic(y)) => x == y,
            (Slot::String(x), Slot::String(y)) => x == y,
            (Slot::Variable(x), Slot::Variable(y)) => x == y,
            _ => false,
        }
    }
}

/// Structural equality, including the sharing pattern of reentrant values.
impl PartialEq for FeatureStruct {
    fn eq(&self, other: &Self) -> bool {
        let mut paired = FxHashMap::default();
        self.equal_nodes(self.root, other, other.root, &mut paired)
    }
}
