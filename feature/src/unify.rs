//! Unification of feature structures.
//!
//! Non-destructive entry points copy the left operand, import the right one
//! into the same arena and merge the two roots destructively. Merged nodes are
//! forwarded to their survivor, so a value reached twice (reentrancy) or
//! through a cycle resolves to the node it was already merged into. The
//! result is compacted before it is handed back, leaving no forward pointers.

use crate::structure::{NodeId, Slot};
use crate::{
    FeatureStruct, StringFeatureValue, SymbolicFeatureValue, UnificationFailure, VariableBindings,
    VariableFeatureValue,
};
use morpha_core::FeatureId;
use morpha_registry::{DefaultValue, FeatureSystem, ValueKind};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

type UnifyResult<T> = Result<T, UnificationFailure>;

/// How a constraint is compared against an annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchingMethod {
    /// The annotation must be compatible with the constraint.
    #[default]
    Unification,
    /// The annotation must be at least as specific as the constraint.
    Subsumption,
}

/// Unifies feature structures against one feature system.
#[derive(Debug, Clone, Copy)]
pub struct Unifier<'s> {
    system: &'s FeatureSystem,
    use_defaults: bool,
    method: MatchingMethod,
}

impl<'s> Unifier<'s> {
    pub fn new(system: &'s FeatureSystem) -> Self {
        Self {
            system,
            use_defaults: false,
            method: MatchingMethod::Unification,
        }
    }

    /// A feature the right operand brings and the left one lacks is first
    /// merged with the feature's default. Features only the left operand
    /// carries are kept as they are.
    pub fn with_defaults(mut self, use_defaults: bool) -> Self {
        self.use_defaults = use_defaults;
        self
    }

    pub fn with_method(mut self, method: MatchingMethod) -> Self {
        self.method = method;
        self
    }

    pub fn method(&self) -> MatchingMethod {
        self.method
    }

    pub fn system(&self) -> &'s FeatureSystem {
        self.system
    }

    pub fn uses_defaults(&self) -> bool {
        self.use_defaults
    }

    /// The most general structure both `a` and `b` describe.
    pub fn unify(&self, a: &FeatureStruct, b: &FeatureStruct) -> UnifyResult<FeatureStruct> {
        let mut bindings = VariableBindings::new();
        self.unify_with_bindings(a, b, &mut bindings)
    }

    /// Like [`Unifier::unify`], reading and extending `bindings`.
    ///
    /// `bindings` is only updated when unification succeeds.
    pub fn unify_with_bindings(
        &self,
        a: &FeatureStruct,
        b: &FeatureStruct,
        bindings: &mut VariableBindings,
    ) -> UnifyResult<FeatureStruct> {
        let mut scratch = a.clone();
        let root = scratch.root();
        let other = scratch.import(b);
        let mut working = bindings.clone();
        Merge::new(self, &mut scratch, &mut working).unify_nodes(root, other, None)?;
        *bindings = working;
        Ok(scratch.compact(root))
    }

    /// Test compatibility without producing a result.
    pub fn is_unifiable(&self, a: &FeatureStruct, b: &FeatureStruct) -> bool {
        let mut bindings = VariableBindings::new();
        self.is_unifiable_with_bindings(a, b, &mut bindings)
    }

    /// Test compatibility under `bindings`, committing new bindings on success.
    pub fn is_unifiable_with_bindings(
        &self,
        a: &FeatureStruct,
        b: &FeatureStruct,
        bindings: &mut VariableBindings,
    ) -> bool {
        let mut scratch = a.clone();
        let root = scratch.root();
        let other = scratch.import(b);
        let mut working = bindings.clone();
        let ok = Merge::new(self, &mut scratch, &mut working)
            .unify_nodes(root, other, None)
            .is_ok();
        if ok {
            *bindings = working;
        }
        ok
    }

    /// Returns true if `general` describes everything `specific` does.
    ///
    /// Every feature of `general` must be present in `specific` with a value
    /// it includes. With defaults, a missing feature is read as its default.
    pub fn subsumes(&self, general: &FeatureStruct, specific: &FeatureStruct) -> bool {
        let mut bindings = VariableBindings::new();
        self.subsumes_with_bindings(general, specific, &mut bindings)
    }

    /// Like [`Unifier::subsumes`]; variables of `general` read and extend
    /// `bindings`, which are only updated on success.
    pub fn subsumes_with_bindings(
        &self,
        general: &FeatureStruct,
        specific: &FeatureStruct,
        bindings: &mut VariableBindings,
    ) -> bool {
        let mut working = bindings.clone();
        let ok = Subsume {
            unifier: self,
            general,
            specific,
            bindings: &mut working,
            visited: FxHashSet::default(),
        }
        .nodes(general.root(), specific.root());
        if ok {
            *bindings = working;
        }
        ok
    }

    /// Returns true if `annotation` satisfies `constraint` under the
    /// configured [`MatchingMethod`].
    pub fn matches(&self, annotation: &FeatureStruct, constraint: &FeatureStruct) -> bool {
        let mut bindings = VariableBindings::new();
        self.matches_with_bindings(annotation, constraint, &mut bindings)
    }

    pub fn matches_with_bindings(
        &self,
        annotation: &FeatureStruct,
        constraint: &FeatureStruct,
        bindings: &mut VariableBindings,
    ) -> bool {
        match self.method {
            MatchingMethod::Unification => {
                self.is_unifiable_with_bindings(annotation, constraint, bindings)
            }
            MatchingMethod::Subsumption => {
                self.subsumes_with_bindings(constraint, annotation, bindings)
            }
        }
    }

    fn default_slot(&self, feature: FeatureId) -> Option<Slot> {
        if !self.use_defaults {
            return None;
        }
        match self.system.feature(feature)?.default.as_ref()? {
            DefaultValue::Symbols(symbols) => Some(Slot::Symbolic(SymbolicFeatureValue::new(
                feature,
                symbols.clone(),
            ))),
            DefaultValue::String(value) => {
                Some(Slot::String(StringFeatureValue::single(value.clone())))
            }
        }
    }
}

impl FeatureStruct {
    /// Unify `other` into this structure.
    ///
    /// On failure the structure is left as it was.
    pub fn unify_in_place(
        &mut self,
        other: &FeatureStruct,
        unifier: &Unifier<'_>,
        bindings: &mut VariableBindings,
    ) -> UnifyResult<()> {
        *self = unifier.unify_with_bindings(self, other, bindings)?;
        Ok(())
    }
}

/// One destructive merge over a single arena.
struct Merge<'a, 's> {
    unifier: &'a Unifier<'s>,
    fs: &'a mut FeatureStruct,
    bindings: &'a mut VariableBindings,
    /// Resolved node pairs already merged (or being merged) in this call.
    visited: FxHashSet<(NodeId, NodeId)>,
}

impl<'a, 's> Merge<'a, 's> {
    fn new(
        unifier: &'a Unifier<'s>,
        fs: &'a mut FeatureStruct,
        bindings: &'a mut VariableBindings,
    ) -> Self {
        Self {
            unifier,
            fs,
            bindings,
            visited: FxHashSet::default(),
        }
    }

    fn unify_nodes(&mut self, x: NodeId, y: NodeId, feature: Option<FeatureId>) -> UnifyResult<()> {
        let x = self.fs.resolve(x);
        let y = self.fs.resolve(y);
        if x == y || !self.visited.insert((x, y)) {
            return Ok(());
        }
        let ours = self.fs.slot(x).kind();
        let theirs = self.fs.slot(y).kind();
        match (ours, theirs) {
            (ValueKind::Complex, ValueKind::Complex) => self.unify_complex(x, y),
            (ValueKind::Complex, _) | (_, ValueKind::Complex) => {
                Err(UnificationFailure::KindMismatch { feature })
            }
            _ => self.unify_simple(x, y, feature),
        }
    }

    fn unify_complex(&mut self, x: NodeId, y: NodeId) -> UnifyResult<()> {
        let theirs = self.entries(y);
        // Forward first so cycles back into `y` land on `x`.
        self.fs.forward(y, x);

        for (feature, their_child) in &theirs {
            match self.fs.child(x, *feature) {
                Some(our_child) => self.unify_nodes(our_child, *their_child, Some(*feature))?,
                None => {
                    self.fs.insert_child(x, *feature, *their_child);
                    self.unify_with_default(*their_child, *feature)?;
                }
            }
        }
        Ok(())
    }

    fn entries(&self, id: NodeId) -> BTreeMap<FeatureId, NodeId> {
        match self.fs.slot(id) {
            Slot::Complex(map) => map.clone(),
            _ => BTreeMap::new(),
        }
    }

    fn unify_with_default(&mut self, node: NodeId, feature: FeatureId) -> UnifyResult<()> {
        match self.unifier.default_slot(feature) {
            Some(slot) => {
                let default = self.fs.push(slot);
                self.unify_nodes(node, default, Some(feature))
            }
            None => Ok(()),
        }
    }

    fn unify_simple(&mut self, x: NodeId, y: NodeId, feature: Option<FeatureId>) -> UnifyResult<()> {
        let ours = self.fs.slot(x).clone();
        let theirs = self.fs.slot(y).clone();
        match (ours, theirs) {
            (Slot::Variable(a), Slot::Variable(b)) => {
                if a != b {
                    return Err(UnificationFailure::VariableMismatch {
                        left: a.name,
                        right: b.name,
                    });
                }
                self.fs.forward(y, x);
            }
            (Slot::Variable(var), concrete) => {
                let merged = self.bind(&var, &concrete, feature)?;
                self.fs.set_slot(y, merged);
                self.fs.forward(x, y);
            }
            (concrete, Slot::Variable(var)) => {
                let merged = self.bind(&var, &concrete, feature)?;
                self.fs.set_slot(x, merged);
                self.fs.forward(y, x);
            }
            (a, b) => {
                let merged = meet(&a, &b, feature)?;
                self.fs.set_slot(x, merged);
                self.fs.forward(y, x);
            }
        }
        Ok(())
    }

    /// Unify a variable with a concrete value, binding it on first use.
    fn bind(
        &mut self,
        var: &VariableFeatureValue,
        concrete: &Slot,
        feature: Option<FeatureId>,
    ) -> UnifyResult<Slot> {
        let system = self.unifier.system;
        match self.bindings.get(&var.name) {
            Some(bound) => {
                let expected = if var.agree {
                    Some(bound.clone())
                } else {
                    bound.negation(system)
                };
                expected
                    .as_ref()
                    .and_then(Slot::from_simple_value)
                    .and_then(|expected| meet(&expected, concrete, feature).ok())
                    .ok_or_else(|| UnificationFailure::ContradictoryBinding {
                        variable: var.name.clone(),
                    })
            }
            None => {
                let value = concrete
                    .to_simple_value()
                    .ok_or(UnificationFailure::KindMismatch { feature })?;
                let bound = if var.agree {
                    Some(value)
                } else {
                    value.negation(system)
                };
                if let Some(bound) = bound {
                    self.bindings.insert(var.name.clone(), bound);
                }
                Ok(concrete.clone())
            }
        }
    }
}

/// One subsumption check between two structures.
struct Subsume<'a, 's> {
    unifier: &'a Unifier<'s>,
    general: &'a FeatureStruct,
    specific: &'a FeatureStruct,
    bindings: &'a mut VariableBindings,
    visited: FxHashSet<(NodeId, NodeId)>,
}

impl Subsume<'_, '_> {
    fn nodes(&mut self, g: NodeId, s: NodeId) -> bool {
        let general = self.general;
        let specific = self.specific;
        let g = general.resolve(g);
        let s = specific.resolve(s);
        if !self.visited.insert((g, s)) {
            return true;
        }
        match (general.slot(g), specific.slot(s)) {
            (Slot::Complex(ours), Slot::Complex(theirs)) => {
                for (feature, our_child) in ours {
                    let holds = match theirs.get(feature) {
                        Some(their_child) => self.nodes(*our_child, *their_child),
                        None => match self.unifier.default_slot(*feature) {
                            Some(default) => self.simple(general.slot(*our_child), &default),
                            None => false,
                        },
                    };
                    if !holds {
                        return false;
                    }
                }
                true
            }
            (Slot::Complex(_), _) | (_, Slot::Complex(_)) => false,
            (ours, theirs) => self.simple(ours, theirs),
        }
    }

    fn simple(&mut self, general: &Slot, specific: &Slot) -> bool {
        match (general, specific) {
            (Slot::Variable(a), Slot::Variable(b)) => a == b,
            (Slot::Variable(var), concrete) => self.bind(var, concrete),
            (_, Slot::Variable(_)) => false,
            (Slot::Symbolic(a), Slot::Symbolic(b)) => a.subsumes(b),
            (Slot::String(a), Slot::String(b)) => a.subsumes(b),
            _ => false,
        }
    }

    /// A bound variable must include `concrete`; an unbound one takes it.
    fn bind(&mut self, var: &VariableFeatureValue, concrete: &Slot) -> bool {
        let system = self.unifier.system;
        let expected = self.bindings.get(&var.name).map(|bound| {
            if var.agree {
                Some(bound.clone())
            } else {
                bound.negation(system)
            }
        });
        match expected {
            Some(expected) => expected
                .as_ref()
                .and_then(Slot::from_simple_value)
                .is_some_and(|expected| self.simple(&expected, concrete)),
            None => {
                let Some(value) = concrete.to_simple_value() else {
                    return false;
                };
                let bound = if var.agree {
                    Some(value)
                } else {
                    value.negation(system)
                };
                if let Some(bound) = bound {
                    self.bindings.insert(var.name.clone(), bound);
                }
                true
            }
        }
    }
}

/// Intersect two concrete simple values.
fn meet(a: &Slot, b: &Slot, feature: Option<FeatureId>) -> UnifyResult<Slot> {
    match (a, b) {
        (Slot::Symbolic(x), Slot::Symbolic(y)) => {
            if x.feature() != y.feature() {
                return Err(UnificationFailure::FeatureMismatch {
                    left: x.feature(),
                    right: y.feature(),
                });
            }
            if !x.overlaps(y) {
                return Err(UnificationFailure::DisjointSymbols {
                    feature: x.feature(),
                });
            }
            Ok(Slot::Symbolic(x.intersection(y)))
        }
        (Slot::String(x), Slot::String(y)) => {
            if !x.overlaps(y) {
                return Err(UnificationFailure::DisjointStrings { feature });
            }
            Ok(Slot::String(x.intersection(y)))
        }
        _ => Err(UnificationFailure::KindMismatch { feature }),
    }
}
