//! The FeatureSystem - immutable vocabulary lookup.

use crate::{AnnotationType, Feature, FeatureSymbol};
use morpha_core::{FeatureId, SymbolId, SymbolSet, TypeId};
use rustc_hash::FxHashMap;

/// The FeatureSystem provides runtime lookup of features, symbols and
/// annotation types. It is immutable after construction.
#[derive(Debug)]
pub struct FeatureSystem {
    /// Feature definitions, indexed by FeatureId.
    features: Vec<Feature>,
    /// Feature ID lookup by name.
    feature_names: FxHashMap<String, FeatureId>,

    /// Symbol definitions, indexed by SymbolId.
    symbols: Vec<FeatureSymbol>,
    /// Symbol ID lookup by (feature, name).
    symbol_names: FxHashMap<(FeatureId, String), SymbolId>,

    /// Annotation types, indexed by TypeId.
    types: Vec<AnnotationType>,
    /// Type ID lookup by name.
    type_names: FxHashMap<String, TypeId>,
}

impl FeatureSystem {
    /// Create a feature system (use FeatureSystemBuilder for construction).
    pub(crate) fn new(
        features: Vec<Feature>,
        feature_names: FxHashMap<String, FeatureId>,
        symbols: Vec<FeatureSymbol>,
        symbol_names: FxHashMap<(FeatureId, String), SymbolId>,
        types: Vec<AnnotationType>,
        type_names: FxHashMap<String, TypeId>,
    ) -> Self {
        Self {
            features,
            feature_names,
            symbols,
            symbol_names,
            types,
            type_names,
        }
    }

    // ==================== Feature Lookups ====================

    /// Get a feature definition by ID.
    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(id.index())
    }

    /// Get a feature definition by name.
    pub fn feature_by_name(&self, name: &str) -> Option<&Feature> {
        self.feature_names
            .get(name)
            .and_then(|id| self.features.get(id.index()))
    }

    /// Get a feature ID by name.
    pub fn feature_id(&self, name: &str) -> Option<FeatureId> {
        self.feature_names.get(name).copied()
    }

    /// Get the name of a feature, or a placeholder for unknown ids.
    pub fn feature_name(&self, id: FeatureId) -> &str {
        self.feature(id).map_or("?", |f| f.name.as_str())
    }

    /// Get all feature definitions in registration order.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Get the number of features.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Every legal symbol index of a feature; empty for unknown or
    /// non-symbolic features.
    pub fn possible_symbols(&self, id: FeatureId) -> SymbolSet {
        self.feature(id)
            .map(Feature::possible_symbols)
            .unwrap_or_default()
    }

    // ==================== Symbol Lookups ====================

    /// Get a symbol definition by ID.
    pub fn symbol(&self, id: SymbolId) -> Option<&FeatureSymbol> {
        self.symbols.get(id.index())
    }

    /// Get a symbol of a feature by name.
    pub fn symbol_by_name(&self, feature: FeatureId, name: &str) -> Option<&FeatureSymbol> {
        self.symbol_names
            .get(&(feature, name.to_string()))
            .and_then(|id| self.symbols.get(id.index()))
    }

    /// Get the symbol stored at a dense index of a feature.
    pub fn symbol_at(&self, feature: FeatureId, index: usize) -> Option<&FeatureSymbol> {
        self.feature(feature)
            .and_then(|f| f.symbol_at(index))
            .and_then(|id| self.symbol(id))
    }

    /// Get all symbols of a feature in dense index order.
    pub fn symbols_of(&self, feature: FeatureId) -> impl Iterator<Item = &FeatureSymbol> {
        self.feature(feature)
            .into_iter()
            .flat_map(|f| f.symbols.iter())
            .filter_map(|id| self.symbol(*id))
    }

    // ==================== Annotation Type Lookups ====================

    /// Get an annotation type by ID.
    pub fn annotation_type(&self, id: TypeId) -> Option<&AnnotationType> {
        self.types.get(id.index())
    }

    /// Get an annotation type ID by name.
    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.type_names.get(name).copied()
    }

    /// Get the name of an annotation type, or a placeholder for unknown ids.
    pub fn type_name(&self, id: TypeId) -> &str {
        self.annotation_type(id).map_or("?", |t| t.name.as_str())
    }

    /// Get all annotation types in registration order.
    pub fn types(&self) -> impl Iterator<Item = &AnnotationType> {
        self.types.iter()
    }
}
