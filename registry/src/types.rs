//! Vocabulary definition types.

use morpha_core::{FeatureId, SymbolId, SymbolSet, TypeId};
use std::fmt;

/// The kind of value a feature (or a value node) carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A set of symbols drawn from the feature's closed inventory.
    Symbol,
    /// An open set of strings.
    String,
    /// A nested feature structure.
    Complex,
    /// A named variable standing for a symbol or string value.
    Variable,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Symbol => "symbolic",
            ValueKind::String => "string",
            ValueKind::Complex => "complex",
            ValueKind::Variable => "variable",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Default value of a feature, used when unification runs with defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Dense symbol indices of a symbolic feature.
    Symbols(SymbolSet),
    /// A single string for a string feature.
    String(String),
}

/// A feature definition.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Unique identifier.
    pub id: FeatureId,
    /// Feature name, unique within the system.
    pub name: String,
    /// Human-readable description.
    pub description: Option<String>,
    /// Kind of value this feature carries.
    pub kind: ValueKind,
    /// Default value if one was declared.
    pub default: Option<DefaultValue>,
    /// Symbols of a symbolic feature, in dense index order.
    pub symbols: Vec<SymbolId>,
}

impl Feature {
    /// Every legal symbol index of this feature.
    pub fn possible_symbols(&self) -> SymbolSet {
        SymbolSet::full(self.symbols.len())
    }

    pub fn is_symbolic(&self) -> bool {
        self.kind == ValueKind::Symbol
    }

    /// Map a dense index back to the symbol id.
    pub fn symbol_at(&self, index: usize) -> Option<SymbolId> {
        self.symbols.get(index).copied()
    }
}

/// One legal value of a symbolic feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSymbol {
    pub id: SymbolId,
    pub name: String,
    /// The feature this symbol belongs to.
    pub feature: FeatureId,
    /// Bit position inside the feature's symbol set.
    pub index: usize,
}

/// A registered annotation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationType {
    pub id: TypeId,
    pub name: String,
}
