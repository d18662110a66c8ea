//! Feature values.

use crate::FeatureStruct;
use morpha_core::{FeatureId, SymbolSet};
use morpha_registry::{FeatureSystem, ValueKind};
use std::collections::BTreeSet;

/// A non-empty set of alternative symbols of one feature.
///
/// Unification intersects the sets; a value with more than one symbol is
/// ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolicFeatureValue {
    feature: FeatureId,
    symbols: SymbolSet,
}

impl SymbolicFeatureValue {
    pub fn new(feature: FeatureId, symbols: SymbolSet) -> Self {
        Self { feature, symbols }
    }

    /// A value holding exactly one symbol index.
    pub fn single(feature: FeatureId, index: usize) -> Self {
        Self::new(feature, SymbolSet::singleton(index))
    }

    pub fn feature(&self) -> FeatureId {
        self.feature
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    pub fn is_ambiguous(&self) -> bool {
        self.symbols.len() > 1
    }

    /// An empty value can never unify with anything concrete.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn overlaps(&self, other: &SymbolicFeatureValue) -> bool {
        !self.symbols.is_disjoint(&other.symbols)
    }

    pub fn intersection(&self, other: &SymbolicFeatureValue) -> SymbolicFeatureValue {
        Self::new(self.feature, self.symbols.intersection(&other.symbols))
    }

    /// Every symbol `other` allows is allowed here too.
    pub fn subsumes(&self, other: &SymbolicFeatureValue) -> bool {
        self.feature == other.feature && other.symbols.is_subset(&self.symbols)
    }

    /// The complement within the feature's possible symbols.
    pub fn negation(&self, system: &FeatureSystem) -> SymbolicFeatureValue {
        let possible = system.possible_symbols(self.feature);
        Self::new(self.feature, possible.difference(&self.symbols))
    }
}

/// A set of strings, or with `negated` set, every string but those.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringFeatureValue {
    values: BTreeSet<String>,
    negated: bool,
}

impl StringFeatureValue {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    pub fn single(value: impl Into<String>) -> Self {
        Self::new([value.into()])
    }

    /// Every string except `values`.
    pub fn excluding<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            negated: true,
            ..Self::new(values)
        }
    }

    pub fn values(&self) -> &BTreeSet<String> {
        &self.values
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_empty(&self) -> bool {
        !self.negated && self.values.is_empty()
    }

    pub fn overlaps(&self, other: &StringFeatureValue) -> bool {
        match (self.negated, other.negated) {
            (false, false) => !self.values.is_disjoint(&other.values),
            (true, false) => !other.values.is_subset(&self.values),
            (false, true) => !self.values.is_subset(&other.values),
            (true, true) => true,
        }
    }

    /// Every string `other` allows is allowed here too.
    pub fn subsumes(&self, other: &StringFeatureValue) -> bool {
        match (self.negated, other.negated) {
            (false, false) => other.values.is_subset(&self.values),
            (true, false) => other.values.is_disjoint(&self.values),
            (false, true) => false,
            (true, true) => self.values.is_subset(&other.values),
        }
    }

    pub fn intersection(&self, other: &StringFeatureValue) -> StringFeatureValue {
        let (values, negated) = match (self.negated, other.negated) {
            (false, false) => (&self.values & &other.values, false),
            (true, false) => (&other.values - &self.values, false),
            (false, true) => (&self.values - &other.values, false),
            (true, true) => (&self.values | &other.values, true),
        };
        Self { values, negated }
    }

    pub fn negation(&self) -> StringFeatureValue {
        Self {
            values: self.values.clone(),
            negated: !self.negated,
        }
    }
}

/// A named variable. With `agree` unset it stands for the negation of its binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableFeatureValue {
    pub name: String,
    pub agree: bool,
}

impl VariableFeatureValue {
    pub fn new(name: impl Into<String>, agree: bool) -> Self {
        Self {
            name: name.into(),
            agree,
        }
    }

    pub fn negation(&self) -> VariableFeatureValue {
        Self {
            name: self.name.clone(),
            agree: !self.agree,
        }
    }
}

/// Any value a feature may carry.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Symbolic(SymbolicFeatureValue),
    String(StringFeatureValue),
    Variable(VariableFeatureValue),
    Complex(FeatureStruct),
}

impl FeatureValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FeatureValue::Symbolic(_) => ValueKind::Symbol,
            FeatureValue::String(_) => ValueKind::String,
            FeatureValue::Variable(_) => ValueKind::Variable,
            FeatureValue::Complex(_) => ValueKind::Complex,
        }
    }

    pub fn as_symbolic(&self) -> Option<&SymbolicFeatureValue> {
        match self {
            FeatureValue::Symbolic(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringFeatureValue> {
        match self {
            FeatureValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableFeatureValue> {
        match self {
            FeatureValue::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<&FeatureStruct> {
        match self {
            FeatureValue::Complex(fs) => Some(fs),
            _ => None,
        }
    }

    /// Negation of a simple value; complex values have none.
    pub fn negation(&self, system: &FeatureSystem) -> Option<FeatureValue> {
        match self {
            FeatureValue::Symbolic(v) => Some(FeatureValue::Symbolic(v.negation(system))),
            FeatureValue::String(v) => Some(FeatureValue::String(v.negation())),
            FeatureValue::Variable(v) => Some(FeatureValue::Variable(v.negation())),
            FeatureValue::Complex(_) => None,
        }
    }
}

impl From<SymbolicFeatureValue> for FeatureValue {
    fn from(v: SymbolicFeatureValue) -> Self {
        FeatureValue::Symbolic(v)
    }
}

impl From<StringFeatureValue> for FeatureValue {
    fn from(v: StringFeatureValue) -> Self {
        FeatureValue::String(v)
    }
}

impl From<VariableFeatureValue> for FeatureValue {
    fn from(v: VariableFeatureValue) -> Self {
        FeatureValue::Variable(v)
    }
}

impl From<FeatureStruct> for FeatureValue {
    fn from(fs: FeatureStruct) -> Self {
        FeatureValue::Complex(fs)
    }
}
