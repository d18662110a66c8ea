//! Morpha Parser
//!
//! This crate provides the pattern front-end:
//! - The pattern AST (constraints, alternation, groups, quantifiers, margins)
//! - A fluent `PatternBuilder` for constructing patterns in code
//! - A textual pattern syntax resolved against a `FeatureSystem`
//! - Error handling with location information

mod ast;
mod builder;
mod error;
mod lexer;
mod parser;
mod settings;

pub use ast::*;
pub use builder::PatternBuilder;
pub use error::*;
pub use parser::{parse_pattern, Parser};
pub use settings::ParseSettings;
