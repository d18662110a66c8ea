//! Constraint parsing: `[@Type feature:value ...]`.

use super::Parser;
use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::TokenKind;
use morpha_core::SymbolSet;
use morpha_feature::{
    FeatureStruct, FeatureValue, StringFeatureValue, SymbolicFeatureValue, VariableFeatureValue,
};
use morpha_registry::{Feature, ValueKind};

impl Parser<'_> {
    /// atom := '[' ('@' TYPE)? feature* ']'
    pub(crate) fn parse_constraint(&mut self) -> ParseResult<PatternNode> {
        let open = self.expect(&TokenKind::LBracket)?;

        let ann_type = if self.check(&TokenKind::At) {
            self.advance();
            let span = self.peek().span;
            let name = self.expect_ident()?;
            self.system
                .type_id(&name)
                .ok_or_else(|| ParseError::unknown_type(span, &name))?
        } else {
            self.settings.default_type.ok_or_else(|| {
                ParseError::new(
                    "constraint has no '@Type' and no default type is configured",
                    open.span,
                )
            })?
        };

        let fs = self.parse_features()?;
        Ok(PatternNode::constraint(ann_type, fs))
    }

    /// feature* ']', with the opening bracket already consumed.
    fn parse_features(&mut self) -> ParseResult<FeatureStruct> {
        let system = self.system;
        let mut fs = FeatureStruct::new();
        while !self.check(&TokenKind::RBracket) {
            let span = self.peek().span;
            let name = self.expect_ident()?;
            let feature = system
                .feature_by_name(&name)
                .ok_or_else(|| ParseError::unknown_feature(span, &name))?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_value(feature)?;
            fs.set(feature.id, value);
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(fs)
    }

    fn parse_value(&mut self, feature: &Feature) -> ParseResult<FeatureValue> {
        let token = self.peek().clone();
        match (&token.kind, feature.kind) {
            (TokenKind::Bang, _) => {
                self.advance();
                let inner = self.parse_value(feature)?;
                inner.negation(self.system).ok_or_else(|| {
                    ParseError::new(
                        format!("complex feature '{}' cannot be negated", feature.name),
                        token.span,
                    )
                })
            }
            (TokenKind::Var(name), ValueKind::Symbol | ValueKind::String) => {
                self.advance();
                Ok(VariableFeatureValue::new(name.clone(), true).into())
            }
            (TokenKind::LBracket, ValueKind::Complex) => {
                self.advance();
                Ok(self.parse_features()?.into())
            }
            (_, ValueKind::Symbol) => {
                let mut symbols = SymbolSet::new();
                if self.check(&TokenKind::LBrace) {
                    self.advance();
                    loop {
                        symbols.insert(self.parse_symbol(feature)?);
                        if !self.check(&TokenKind::Comma) {
                            break;
                        }
                        self.advance();
                    }
                    self.expect(&TokenKind::RBrace)?;
                } else {
                    symbols.insert(self.parse_symbol(feature)?);
                }
                Ok(SymbolicFeatureValue::new(feature.id, symbols).into())
            }
            (_, ValueKind::String) => {
                let mut values = Vec::new();
                if self.check(&TokenKind::LBrace) {
                    self.advance();
                    loop {
                        values.push(self.parse_string()?);
                        if !self.check(&TokenKind::Comma) {
                            break;
                        }
                        self.advance();
                    }
                    self.expect(&TokenKind::RBrace)?;
                } else {
                    values.push(self.parse_string()?);
                }
                Ok(StringFeatureValue::new(values).into())
            }
            _ => Err(ParseError::unexpected_token(
                token.span,
                &format!("{} value for '{}'", feature.kind.name(), feature.name),
                token.kind.name(),
            )),
        }
    }

    /// A symbol name: identifier, `+`, `-` or integer.
    fn parse_symbol(&mut self, feature: &Feature) -> ParseResult<usize> {
        let token = self.peek().clone();
        let name = match &token.kind {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Int(n) => n.to_string(),
            other => {
                return Err(ParseError::unexpected_token(
                    token.span,
                    "symbol",
                    other.name(),
                ))
            }
        };
        self.advance();
        self.system
            .symbol_by_name(feature.id, &name)
            .map(|symbol| symbol.index)
            .ok_or_else(|| ParseError::unknown_symbol(token.span, &feature.name, &name))
    }

    fn parse_string(&mut self) -> ParseResult<String> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::String(value) => {
                self.advance();
                Ok(value)
            }
            other => Err(ParseError::unexpected_token(
                token.span,
                "string",
                other.name(),
            )),
        }
    }
}
