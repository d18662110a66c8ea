//! The condition algebra.
//!
//! A condition is a set of literals read conjunctively. `negation` flips
//! every literal and is therefore only a true Boolean complement for
//! single-literal conditions. Automaton alphabets are built from such
//! single-literal conditions, and the minterms over them are conjunctions of
//! literals, so the restricted form is all the determinizer needs.

use morpha_core::{Offset, TypeId};
use morpha_feature::{FeatureStruct, Unifier};
use morpha_graph::Annotation;
use morpha_registry::FeatureSystem;
use std::fmt;

/// One (type, feature structure, polarity) predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub ann_type: TypeId,
    pub fs: FeatureStruct,
    /// An excluded literal holds where the included one does not.
    pub excluded: bool,
}

impl Literal {
    pub fn new(ann_type: TypeId, fs: FeatureStruct) -> Self {
        Self {
            ann_type,
            fs,
            excluded: false,
        }
    }

    pub fn negation(&self) -> Literal {
        Literal {
            excluded: !self.excluded,
            ..self.clone()
        }
    }

    /// Included: same type and matched under the unifier's method.
    /// Excluded: the opposite.
    pub fn is_match<O: Offset>(&self, annotation: &Annotation<O>, unifier: &Unifier<'_>) -> bool {
        let holds = annotation.ann_type == self.ann_type && unifier.matches(&annotation.fs, &self.fs);
        holds != self.excluded
    }

    fn same_predicate(&self, other: &Literal) -> bool {
        self.ann_type == other.ann_type && self.fs == other.fs
    }
}

/// A conjunction of literals. The empty condition holds everywhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    literals: Vec<Literal>,
}

impl Condition {
    /// A single-literal condition: annotations of `ann_type` unifiable with `fs`.
    pub fn new(ann_type: TypeId, fs: FeatureStruct) -> Self {
        Self {
            literals: vec![Literal::new(ann_type, fs)],
        }
    }

    /// The condition that holds for every annotation.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn from_literals(literals: impl IntoIterator<Item = Literal>) -> Self {
        let mut condition = Self::any();
        for literal in literals {
            condition.push(literal);
        }
        condition
    }

    fn push(&mut self, literal: Literal) {
        if !self.literals.contains(&literal) {
            self.literals.push(literal);
        }
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Returns true for the condition that holds everywhere.
    pub fn is_any(&self) -> bool {
        self.literals.is_empty()
    }

    /// Both conditions at once: the union of their literals.
    pub fn conjunction(&self, other: &Condition) -> Condition {
        let mut out = self.clone();
        for literal in &other.literals {
            out.push(literal.clone());
        }
        out
    }

    /// Flip every literal.
    pub fn negation(&self) -> Condition {
        Condition {
            literals: self.literals.iter().map(Literal::negation).collect(),
        }
    }

    pub fn is_match<O: Offset>(&self, annotation: &Annotation<O>, unifier: &Unifier<'_>) -> bool {
        self.literals.iter().all(|l| l.is_match(annotation, unifier))
    }

    /// Cheap structural check. Only rejects combinations no annotation can
    /// satisfy; a `true` answer does not prove an annotation exists.
    pub fn is_satisfiable(&self) -> bool {
        let included: Vec<&Literal> = self.literals.iter().filter(|l| !l.excluded).collect();
        let excluded: Vec<&Literal> = self.literals.iter().filter(|l| l.excluded).collect();

        // An annotation has exactly one type.
        if let Some(first) = included.first() {
            if included.iter().any(|l| l.ann_type != first.ann_type) {
                return false;
            }
        }

        for out in &excluded {
            for inc in &included {
                if out.same_predicate(inc) {
                    return false;
                }
                // The empty structure unifies with everything of its type.
                if out.fs.is_empty() && out.ann_type == inc.ann_type {
                    return false;
                }
            }
        }
        true
    }

    pub fn display<'a>(&'a self, system: &'a FeatureSystem) -> ConditionDisplay<'a> {
        ConditionDisplay {
            condition: self,
            system,
        }
    }
}

/// Displays a condition with names resolved against a system.
pub struct ConditionDisplay<'a> {
    condition: &'a Condition,
    system: &'a FeatureSystem,
}

impl fmt::Display for ConditionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.condition.is_any() {
            return f.write_str("*");
        }
        for (i, literal) in self.condition.literals.iter().enumerate() {
            if i > 0 {
                f.write_str(" & ")?;
            }
            if literal.excluded {
                f.write_str("!")?;
            }
            write!(
                f,
                "@{}{}",
                self.system.type_name(literal.ann_type),
                literal.fs.display(self.system)
            )?;
        }
        Ok(())
    }
}
