//! Parser for pattern text.
//!
//! This module is organized into submodules by parsing category:
//! - `pattern`: Structure (alternation, sequences, groups, quantifiers, margins)
//! - `constraint`: Bracketed constraints and their feature values

mod constraint;
mod pattern;

use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::ParseSettings;
use morpha_registry::FeatureSystem;

// ==================== PARSER STATE ====================

/// Parser state.
///
/// Names are resolved against the feature system while parsing, so the
/// resulting pattern carries ids rather than strings.
pub struct Parser<'s> {
    tokens: Vec<Token>,
    pos: usize,
    system: &'s FeatureSystem,
    settings: ParseSettings,
    next_capture: u32,
    eof: Token,
}

impl<'s> Parser<'s> {
    /// Create a new parser from source text.
    pub fn new(input: &str, system: &'s FeatureSystem, settings: ParseSettings) -> ParseResult<Self> {
        let tokens = Lexer::new(input).tokenize()?;
        let eof = Token::eof(input.len(), 1, 1);
        Ok(Self {
            tokens,
            eof,
            pos: 0,
            system,
            settings,
            next_capture: 1,
        })
    }
}

// ==================== TOKEN HELPERS ====================

impl Parser<'_> {
    pub(crate) fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&self.eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(ParseError::unexpected_token(
                token.span,
                kind.name(),
                token.kind.name(),
            ))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => {
                let token = self.peek();
                Err(ParseError::unexpected_token(
                    token.span,
                    "identifier",
                    token.kind.name(),
                ))
            }
        }
    }

    pub(crate) fn expect_int(&mut self) -> ParseResult<u32> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Int(n) => {
                self.advance();
                u32::try_from(n).map_err(|_| {
                    ParseError::new(format!("repetition count {} is too large", n), token.span)
                })
            }
            _ => Err(ParseError::unexpected_token(
                token.span,
                "integer",
                token.kind.name(),
            )),
        }
    }
}

// ==================== PUBLIC API ====================

/// Parse a pattern from source text.
///
/// ```ignore
/// let settings = ParseSettings::new().with_default_type(seg);
/// let pattern = parse_pattern("[voice:+] (?<coda>[voice:-])?", &system, &settings)?;
/// ```
pub fn parse_pattern(
    input: &str,
    system: &FeatureSystem,
    settings: &ParseSettings,
) -> ParseResult<Pattern> {
    Parser::new(input, system, settings.clone())?.parse_pattern()
}

// ==================== TESTS ====================
