//! Fluent construction of feature structures by name.

use crate::{
    FeatureError, FeatureResult, FeatureStruct, FeatureValue, StringFeatureValue,
    SymbolicFeatureValue, VariableFeatureValue,
};
use morpha_core::{FeatureId, SymbolSet};
use morpha_registry::{FeatureSystem, ValueKind};

/// Builds a [`FeatureStruct`] from feature and symbol names.
///
/// The first lookup error is kept and reported by [`FeatureStructBuilder::build`].
///
/// ```ignore
/// let fs = FeatureStructBuilder::new(&system)
///     .symbol("voice", "+")
///     .not_symbol("place", "lab")
///     .variable("nasal", "n")
///     .build()?;
/// ```
pub struct FeatureStructBuilder<'s> {
    system: &'s FeatureSystem,
    fs: FeatureStruct,
    error: Option<FeatureError>,
}

impl<'s> FeatureStructBuilder<'s> {
    pub fn new(system: &'s FeatureSystem) -> Self {
        Self {
            system,
            fs: FeatureStruct::new(),
            error: None,
        }
    }

    /// Set a symbolic feature to one symbol.
    pub fn symbol(self, feature: &str, symbol: &str) -> Self {
        self.symbols(feature, &[symbol])
    }

    /// Set a symbolic feature to a set of alternative symbols.
    pub fn symbols(self, feature: &str, symbols: &[&str]) -> Self {
        self.symbolic(feature, symbols, false)
    }

    /// Set a symbolic feature to every symbol except one.
    pub fn not_symbol(self, feature: &str, symbol: &str) -> Self {
        self.not_symbols(feature, &[symbol])
    }

    /// Set a symbolic feature to every symbol except the given ones.
    pub fn not_symbols(self, feature: &str, symbols: &[&str]) -> Self {
        self.symbolic(feature, symbols, true)
    }

    pub fn string(self, feature: &str, value: &str) -> Self {
        self.set_kind(feature, &[ValueKind::String], |_| {
            Ok(StringFeatureValue::single(value).into())
        })
    }

    pub fn not_string(self, feature: &str, value: &str) -> Self {
        self.set_kind(feature, &[ValueKind::String], |_| {
            Ok(StringFeatureValue::excluding([value]).into())
        })
    }

    /// Bind a symbolic or string feature to an agreeing variable.
    pub fn variable(self, feature: &str, name: &str) -> Self {
        self.set_kind(feature, &[ValueKind::Symbol, ValueKind::String], |_| {
            Ok(VariableFeatureValue::new(name, true).into())
        })
    }

    /// Bind a symbolic or string feature to a disagreeing variable.
    pub fn not_variable(self, feature: &str, name: &str) -> Self {
        self.set_kind(feature, &[ValueKind::Symbol, ValueKind::String], |_| {
            Ok(VariableFeatureValue::new(name, false).into())
        })
    }

    /// Set a complex feature to a nested structure.
    pub fn feature<F>(mut self, feature: &str, build: F) -> Self
    where
        F: FnOnce(FeatureStructBuilder<'s>) -> FeatureStructBuilder<'s>,
    {
        let nested = build(FeatureStructBuilder::new(self.system));
        match nested.build() {
            Ok(fs) => self.set_kind(feature, &[ValueKind::Complex], |_| Ok(fs.into())),
            Err(err) => {
                self.error.get_or_insert(err);
                self
            }
        }
    }

    /// Set a feature to an already-built value.
    pub fn value(mut self, feature: FeatureId, value: impl Into<FeatureValue>) -> Self {
        self.fs.set(feature, value);
        self
    }

    /// Finish, validating the structure against the system.
    pub fn build(self) -> FeatureResult<FeatureStruct> {
        if let Some(err) = self.error {
            return Err(err);
        }
        self.fs.validate(self.system)?;
        Ok(self.fs)
    }

    fn symbolic(self, feature: &str, symbols: &[&str], negated: bool) -> Self {
        let system = self.system;
        self.set_kind(feature, &[ValueKind::Symbol], |id| {
            let mut set = SymbolSet::new();
            for name in symbols {
                let symbol = system
                    .symbol_by_name(id, name)
                    .ok_or_else(|| FeatureError::unknown_symbol(feature, *name))?;
                set.insert(symbol.index);
            }
            let value = SymbolicFeatureValue::new(id, set);
            let value = if negated {
                value.negation(system)
            } else {
                value
            };
            Ok(value.into())
        })
    }

    fn set_kind<F>(mut self, feature: &str, kinds: &[ValueKind], make: F) -> Self
    where
        F: FnOnce(FeatureId) -> FeatureResult<FeatureValue>,
    {
        if self.error.is_some() {
            return self;
        }
        let result = self
            .system
            .feature_by_name(feature)
            .ok_or_else(|| FeatureError::unknown_feature(feature))
            .and_then(|f| {
                if kinds.contains(&f.kind) {
                    Ok(f.id)
                } else {
                    Err(FeatureError::kind_mismatch(feature, f.kind, kinds[0]))
                }
            })
            .and_then(|id| make(id).map(|value| (id, value)));
        match result {
            Ok((id, value)) => self.fs.set(id, value),
            Err(err) => self.error = Some(err),
        }
        self
    }
}
