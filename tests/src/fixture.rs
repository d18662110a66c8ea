//! A small phonological feature system shared by the scenarios.

use morpha_core::{Span, SymbolSet, TypeId};
use morpha_feature::{FeatureStruct, FeatureStructBuilder, FeatureValue, SymbolicFeatureValue};
use morpha_graph::{Annotation, AnnotationList};
use morpha_parser::{parse_pattern, ParseResult, ParseSettings, Pattern};
use morpha_registry::{FeatureSystem, FeatureSystemBuilder};

/// Types `Seg` and `Bdry` over the features
/// `voice {+,-}`, `place {lab,cor,dor}`, `nasal {+,-}` (default `-`) and
/// `F {a,b}`.
pub struct Phonology {
    pub system: FeatureSystem,
    pub seg: TypeId,
    pub bdry: TypeId,
}

impl Default for Phonology {
    fn default() -> Self {
        Self::new()
    }
}

impl Phonology {
    pub fn new() -> Self {
        let mut builder = FeatureSystemBuilder::new();
        let seg = builder.add_type("Seg").unwrap();
        let bdry = builder.add_type("Bdry").unwrap();
        builder
            .add_symbolic_feature("voice")
            .symbols(["+", "-"])
            .done()
            .unwrap();
        builder
            .add_symbolic_feature("place")
            .symbols(["lab", "cor", "dor"])
            .done()
            .unwrap();
        builder
            .add_symbolic_feature("nasal")
            .symbols(["+", "-"])
            .default_symbol("-")
            .done()
            .unwrap();
        builder
            .add_symbolic_feature("F")
            .symbols(["a", "b"])
            .done()
            .unwrap();
        Self {
            system: builder.build().unwrap(),
            seg,
            bdry,
        }
    }

    /// Parse a pattern whose bare constraints default to `Seg`.
    pub fn parse(&self, text: &str) -> ParseResult<Pattern> {
        self.parse_named(text, None)
    }

    pub fn parse_named(&self, text: &str, name: Option<String>) -> ParseResult<Pattern> {
        let mut settings = ParseSettings::new().with_default_type(self.seg);
        if let Some(name) = name {
            settings = settings.with_name(name);
        }
        parse_pattern(text, &self.system, &settings)
    }

    /// Build a structure from `(feature, symbols)` pairs.
    pub fn fs(&self, features: &[(&str, &[&str])]) -> FeatureStruct {
        features
            .iter()
            .fold(FeatureStructBuilder::new(&self.system), |b, (name, symbols)| {
                b.symbols(name, symbols)
            })
            .build()
            .unwrap()
    }

    /// The value a variable is bound to when it meets `symbols` of `feature`.
    pub fn value(&self, feature: &str, symbols: &[&str]) -> FeatureValue {
        let id = self.system.feature_id(feature).unwrap();
        let mut set = SymbolSet::new();
        for symbol in symbols {
            set.insert(self.system.symbol_by_name(id, symbol).unwrap().index);
        }
        SymbolicFeatureValue::new(id, set).into()
    }

    /// A segment covering `[at, at + 1)`.
    pub fn segment(&self, at: u32, features: &[(&str, &[&str])]) -> Annotation<u32> {
        Annotation::new(self.seg, Span::new(at, at + 1), self.fs(features))
    }

    /// A boundary covering `[at, at + 1)`.
    pub fn boundary(&self, at: u32) -> Annotation<u32> {
        Annotation::new(self.bdry, Span::new(at, at + 1), FeatureStruct::new())
    }

    /// One annotation per character: `+` and `-` are voiced and voiceless
    /// segments, `?` is a segment of unknown voicing, `#` a boundary and
    /// `a`/`b` segments carrying `F`.
    pub fn word(&self, text: &str) -> AnnotationList<u32> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let at = i as u32;
                match c {
                    '+' => self.segment(at, &[("voice", &["+"])]),
                    '-' => self.segment(at, &[("voice", &["-"])]),
                    '?' => self.segment(at, &[("voice", &["+", "-"])]),
                    'a' => self.segment(at, &[("F", &["a"])]),
                    'b' => self.segment(at, &[("F", &["b"])]),
                    '#' => self.boundary(at),
                    _ => self.segment(at, &[]),
                }
            })
            .collect()
    }
}
