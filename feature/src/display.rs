//! Human-readable rendering of feature structures.
//!
//! The output uses the same bracket notation the pattern front-end reads:
//! `[voice:+ place:{lab,cor} gloss:!"x" nasal:$n head:[...]]`.

use crate::structure::{NodeId, Slot};
use crate::{FeatureStruct, FeatureValue, StringFeatureValue, SymbolicFeatureValue};
use morpha_registry::FeatureSystem;
use std::fmt::{self, Write};

/// Displays a feature structure with names resolved against a system.
pub struct FeatureStructDisplay<'a> {
    fs: &'a FeatureStruct,
    system: &'a FeatureSystem,
}

/// Displays a single value with names resolved against a system.
pub struct FeatureValueDisplay<'a> {
    value: &'a FeatureValue,
    system: &'a FeatureSystem,
}

impl FeatureStruct {
    pub fn display<'a>(&'a self, system: &'a FeatureSystem) -> FeatureStructDisplay<'a> {
        FeatureStructDisplay { fs: self, system }
    }
}

impl FeatureValue {
    pub fn display<'a>(&'a self, system: &'a FeatureSystem) -> FeatureValueDisplay<'a> {
        FeatureValueDisplay {
            value: self,
            system,
        }
    }
}

impl fmt::Display for FeatureStructDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut open = Vec::new();
        write_node(f, self.fs, self.fs.root(), self.system, &mut open)
    }
}

impl fmt::Display for FeatureValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            FeatureValue::Symbolic(v) => write_symbols(f, v, self.system),
            FeatureValue::String(v) => write_strings(f, v),
            FeatureValue::Variable(v) => {
                write!(f, "{}${}", if v.agree { "" } else { "!" }, v.name)
            }
            FeatureValue::Complex(fs) => write!(f, "{}", fs.display(self.system)),
        }
    }
}

fn write_node(
    f: &mut fmt::Formatter<'_>,
    fs: &FeatureStruct,
    id: NodeId,
    system: &FeatureSystem,
    open: &mut Vec<NodeId>,
) -> fmt::Result {
    let id = fs.resolve(id);
    match fs.slot(id) {
        Slot::Complex(map) => {
            if open.contains(&id) {
                return f.write_str("<cycle>");
            }
            open.push(id);
            f.write_char('[')?;
            for (i, (feature, child)) in map.iter().enumerate() {
                if i > 0 {
                    f.write_char(' ')?;
                }
                write!(f, "{}:", system.feature_name(*feature))?;
                write_node(f, fs, *child, system, open)?;
            }
            open.pop();
            f.write_char(']')
        }
        Slot::Symbolic(v) => write_symbols(f, v, system),
        Slot::String(v) => write_strings(f, v),
        Slot::Variable(v) => write!(f, "{}${}", if v.agree { "" } else { "!" }, v.name),
    }
}

fn write_symbols(
    f: &mut fmt::Formatter<'_>,
    value: &SymbolicFeatureValue,
    system: &FeatureSystem,
) -> fmt::Result {
    let names: Vec<&str> = value
        .symbols()
        .iter()
        .map(|index| {
            system
                .symbol_at(value.feature(), index)
                .map_or("?", |s| s.name.as_str())
        })
        .collect();
    match names.as_slice() {
        [single] => f.write_str(single),
        _ => write!(f, "{{{}}}", names.join(",")),
    }
}

fn write_strings(f: &mut fmt::Formatter<'_>, value: &StringFeatureValue) -> fmt::Result {
    if value.is_negated() {
        f.write_char('!')?;
    }
    let quoted: Vec<String> = value
        .values()
        .iter()
        .map(|s| format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    match quoted.as_slice() {
        [single] => f.write_str(single),
        _ => write!(f, "{{{}}}", quoted.join(",")),
    }
}
