//! FeatureSystemBuilder for constructing an immutable FeatureSystem.

use crate::{AnnotationType, DefaultValue, Feature, FeatureSymbol, FeatureSystem, ValueKind};
use morpha_core::{FeatureId, SymbolId, SymbolSet, TypeId};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors that can occur during feature system construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate feature name: {0}")]
    DuplicateFeatureName(String),

    #[error("Duplicate annotation type name: {0}")]
    DuplicateTypeName(String),

    #[error("Duplicate symbol '{symbol}' on feature '{feature}'")]
    DuplicateSymbol { feature: String, symbol: String },

    #[error("Symbolic feature '{0}' declares no symbols")]
    EmptySymbolInventory(String),

    #[error("Feature '{0}' is not symbolic and cannot declare symbols")]
    SymbolsOnNonSymbolicFeature(String),

    #[error("Unknown default symbol '{symbol}' on feature '{feature}'")]
    UnknownDefaultSymbol { feature: String, symbol: String },

    #[error("A {kind} feature '{feature}' cannot carry this default")]
    InvalidDefault { feature: String, kind: ValueKind },
}

/// Result type for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Builder for constructing an immutable FeatureSystem.
#[derive(Debug, Default)]
pub struct FeatureSystemBuilder {
    /// Features being built, in id order.
    features: Vec<Feature>,
    /// Feature name to ID mapping.
    feature_names: FxHashMap<String, FeatureId>,

    /// Symbols being built, in id order.
    symbols: Vec<FeatureSymbol>,
    /// (feature, symbol name) to ID mapping.
    symbol_names: FxHashMap<(FeatureId, String), SymbolId>,

    types: Vec<AnnotationType>,
    type_names: FxHashMap<String, TypeId>,
}

impl FeatureSystemBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an annotation type.
    pub fn add_type(&mut self, name: impl Into<String>) -> RegistryResult<TypeId> {
        let name = name.into();
        if self.type_names.contains_key(&name) {
            return Err(RegistryError::DuplicateTypeName(name));
        }
        let id = TypeId::new(self.types.len() as u32);
        self.type_names.insert(name.clone(), id);
        self.types.push(AnnotationType { id, name });
        Ok(id)
    }

    /// Add a symbolic feature definition.
    pub fn add_symbolic_feature(&mut self, name: impl Into<String>) -> FeatureBuilder<'_> {
        self.feature_builder(name.into(), ValueKind::Symbol)
    }

    /// Add a string feature definition.
    pub fn add_string_feature(&mut self, name: impl Into<String>) -> FeatureBuilder<'_> {
        self.feature_builder(name.into(), ValueKind::String)
    }

    /// Add a complex (nested feature structure) feature definition.
    pub fn add_complex_feature(&mut self, name: impl Into<String>) -> FeatureBuilder<'_> {
        self.feature_builder(name.into(), ValueKind::Complex)
    }

    fn feature_builder(&mut self, name: String, kind: ValueKind) -> FeatureBuilder<'_> {
        FeatureBuilder {
            builder: self,
            name,
            kind,
            description: None,
            symbols: Vec::new(),
            default: None,
        }
    }

    /// Build the immutable FeatureSystem.
    pub fn build(self) -> RegistryResult<FeatureSystem> {
        Ok(FeatureSystem::new(
            self.features,
            self.feature_names,
            self.symbols,
            self.symbol_names,
            self.types,
            self.type_names,
        ))
    }
}

/// Requested default, resolved when the feature is finished.
#[derive(Debug)]
enum PendingDefault {
    Symbols(Vec<String>),
    String(String),
}

/// Builder for a feature definition.
pub struct FeatureBuilder<'a> {
    builder: &'a mut FeatureSystemBuilder,
    name: String,
    kind: ValueKind,
    description: Option<String>,
    symbols: Vec<String>,
    default: Option<PendingDefault>,
}

impl<'a> FeatureBuilder<'a> {
    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a symbol. Symbols receive dense indices in declaration order.
    pub fn symbol(mut self, name: impl Into<String>) -> Self {
        self.symbols.push(name.into());
        self
    }

    /// Add several symbols at once.
    pub fn symbols<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declare a default symbol. May be called repeatedly for an ambiguous default.
    pub fn default_symbol(mut self, name: impl Into<String>) -> Self {
        match &mut self.default {
            Some(PendingDefault::Symbols(names)) => names.push(name.into()),
            _ => self.default = Some(PendingDefault::Symbols(vec![name.into()])),
        }
        self
    }

    /// Declare a default string value.
    pub fn default_string(mut self, value: impl Into<String>) -> Self {
        self.default = Some(PendingDefault::String(value.into()));
        self
    }

    /// Finish building this feature.
    pub fn done(self) -> RegistryResult<FeatureId> {
        if self.builder.feature_names.contains_key(&self.name) {
            return Err(RegistryError::DuplicateFeatureName(self.name));
        }

        match self.kind {
            ValueKind::Symbol if self.symbols.is_empty() => {
                return Err(RegistryError::EmptySymbolInventory(self.name));
            }
            ValueKind::Symbol => {}
            _ if !self.symbols.is_empty() => {
                return Err(RegistryError::SymbolsOnNonSymbolicFeature(self.name));
            }
            _ => {}
        }

        for (i, symbol) in self.symbols.iter().enumerate() {
            if self.symbols[..i].contains(symbol) {
                return Err(RegistryError::DuplicateSymbol {
                    feature: self.name,
                    symbol: symbol.clone(),
                });
            }
        }

        let default = match self.default {
            None => None,
            Some(PendingDefault::Symbols(names)) if self.kind == ValueKind::Symbol => {
                let mut set = SymbolSet::new();
                for name in names {
                    match self.symbols.iter().position(|s| *s == name) {
                        Some(index) => {
                            set.insert(index);
                        }
                        None => {
                            return Err(RegistryError::UnknownDefaultSymbol {
                                feature: self.name,
                                symbol: name,
                            });
                        }
                    }
                }
                Some(DefaultValue::Symbols(set))
            }
            Some(PendingDefault::String(value)) if self.kind == ValueKind::String => {
                Some(DefaultValue::String(value))
            }
            Some(_) => {
                return Err(RegistryError::InvalidDefault {
                    feature: self.name,
                    kind: self.kind,
                });
            }
        };

        let id = FeatureId::new(self.builder.features.len() as u32);
        let mut symbol_ids = Vec::with_capacity(self.symbols.len());
        for (index, symbol) in self.symbols.into_iter().enumerate() {
            let symbol_id = SymbolId::new(self.builder.symbols.len() as u32);
            self.builder
                .symbol_names
                .insert((id, symbol.clone()), symbol_id);
            self.builder.symbols.push(FeatureSymbol {
                id: symbol_id,
                name: symbol,
                feature: id,
                index,
            });
            symbol_ids.push(symbol_id);
        }

        self.builder.feature_names.insert(self.name.clone(), id);
        self.builder.features.push(Feature {
            id,
            name: self.name,
            description: self.description,
            kind: self.kind,
            default,
            symbols: symbol_ids,
        });

        Ok(id)
    }
}
