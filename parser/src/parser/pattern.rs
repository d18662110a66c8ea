//! Pattern structure parsing: alternation, sequences, groups and quantifiers.

use super::Parser;
use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::TokenKind;

impl Parser<'_> {
    /// Parse a whole pattern up to end of input.
    pub fn parse_pattern(&mut self) -> ParseResult<Pattern> {
        let body = self.parse_alternation()?;
        self.expect(&TokenKind::Eof)?;
        Ok(Pattern {
            name: self.settings.name.clone(),
            children: body.into_sequence(),
        })
    }

    /// alternation := sequence ('|' sequence)*
    fn parse_alternation(&mut self) -> ParseResult<PatternNode> {
        let mut branches = vec![self.parse_sequence()?];
        while self.check(&TokenKind::Pipe) {
            self.advance();
            branches.push(self.parse_sequence()?);
        }
        if branches.len() == 1 {
            if let Some(single) = branches.pop() {
                return Ok(single);
            }
        }
        Ok(PatternNode::Alternation(branches))
    }

    /// sequence := term*
    fn parse_sequence(&mut self) -> ParseResult<PatternNode> {
        let mut terms = Vec::new();
        while self.at_term_start() {
            terms.push(self.parse_term()?);
        }
        if terms.len() == 1 {
            if let Some(single) = terms.pop() {
                return Ok(single);
            }
        }
        Ok(PatternNode::sequence(terms))
    }

    fn at_term_start(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::LBracket | TokenKind::LParen | TokenKind::Caret | TokenKind::Dollar
        )
    }

    /// term := atom quantifier?
    fn parse_term(&mut self) -> ParseResult<PatternNode> {
        let atom = self.parse_atom()?;
        self.parse_quantifier(atom)
    }

    fn parse_atom(&mut self) -> ParseResult<PatternNode> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::LBracket => self.parse_constraint(),
            TokenKind::LParen => self.parse_group(),
            TokenKind::Caret => {
                self.advance();
                Ok(PatternNode::Margin(Side::Left))
            }
            TokenKind::Dollar => {
                self.advance();
                Ok(PatternNode::Margin(Side::Right))
            }
            _ => Err(ParseError::unexpected_token(
                token.span,
                "pattern element",
                token.kind.name(),
            )),
        }
    }

    /// '(' ('?:' | '?<' NAME '>')? alternation ')'
    fn parse_group(&mut self) -> ParseResult<PatternNode> {
        self.expect(&TokenKind::LParen)?;

        enum Kind {
            Plain,
            Named(String),
            Capture(u32),
        }

        let kind = if self.check(&TokenKind::Question) {
            self.advance();
            if self.check(&TokenKind::Colon) {
                self.advance();
                Kind::Plain
            } else {
                self.expect(&TokenKind::Lt)?;
                let name = self.expect_ident()?;
                self.expect(&TokenKind::Gt)?;
                Kind::Named(name)
            }
        } else {
            // Numbered at the open paren, so outer groups come first.
            let id = self.next_capture;
            self.next_capture += 1;
            Kind::Capture(id)
        };

        let body = self.parse_alternation()?;
        self.expect(&TokenKind::RParen)?;

        let children = body.into_sequence();
        Ok(match kind {
            Kind::Plain => PatternNode::sequence(children),
            Kind::Named(name) => PatternNode::group(name, children),
            Kind::Capture(id) => PatternNode::capture(id, children),
        })
    }

    /// quantifier := '?' | '*' | '+' | '{' INT (',' INT?)? '}'
    fn parse_quantifier(&mut self, atom: PatternNode) -> ParseResult<PatternNode> {
        let token = self.peek().clone();
        let (min, max) = match token.kind {
            TokenKind::Question => {
                self.advance();
                (0, Some(1))
            }
            TokenKind::Star => {
                self.advance();
                (0, None)
            }
            TokenKind::Plus => {
                self.advance();
                (1, None)
            }
            TokenKind::LBrace => {
                self.advance();
                let min = self.expect_int()?;
                let max = if self.check(&TokenKind::Comma) {
                    self.advance();
                    if self.check(&TokenKind::RBrace) {
                        None
                    } else {
                        Some(self.expect_int()?)
                    }
                } else {
                    Some(min)
                };
                self.expect(&TokenKind::RBrace)?;
                if let Some(max) = max {
                    if max < min {
                        return Err(ParseError::new(
                            format!("quantifier maximum {} is below minimum {}", max, min),
                            token.span,
                        ));
                    }
                }
                (min, max)
            }
            _ => return Ok(atom),
        };
        Ok(PatternNode::quantifier(min, max, atom))
    }
}
