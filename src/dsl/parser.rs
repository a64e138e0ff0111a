//! Parser for the layout format.

use std::collections::HashSet;

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::circuit::TerminalId;
use crate::components::ComponentKind;
use crate::error::{ResistoError, Result};

/// Parser for layout files.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire layout.
    pub fn parse(&mut self) -> Result<LayoutAst> {
        let mut ast = LayoutAst::new();
        let mut ids = HashSet::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier if self.current.text.eq_ignore_ascii_case("wire") => {
                    let wire = self.parse_wire()?;
                    ast.wires.push(wire);
                }
                TokenKind::Identifier => {
                    let component = self.parse_component()?;
                    if !ids.insert(component.id.clone()) {
                        return Err(ResistoError::DuplicateComponent { id: component.id });
                    }
                    ast.components.push(component);
                }
                _ => {
                    return Err(ResistoError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }
            self.end_of_line()?;
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(ResistoError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn expect_number(&mut self) -> Result<f64> {
        let tok = self.expect(TokenKind::Number)?;
        parse_value(&tok.text)
            .ok_or_else(|| ResistoError::parse(tok.line, format!("invalid number: {}", tok.text)))
    }

    fn end_of_line(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::Newline => self.advance(),
            TokenKind::Eof => Ok(()),
            _ => Err(ResistoError::parse(
                self.current.line,
                format!("unexpected trailing token: {:?}", self.current.text),
            )),
        }
    }

    fn parse_directive(&mut self, ast: &mut LayoutAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".tolerance" => {
                let tolerance = self.expect_number()?;
                if !tolerance.is_finite() || tolerance < 0.0 {
                    return Err(ResistoError::parse(line, "tolerance must be non-negative"));
                }
                ast.row_tolerance = Some(tolerance);
            }
            ".grid" => {
                let grid = self.expect_number()?;
                if !grid.is_finite() || grid <= 0.0 {
                    return Err(ResistoError::parse(line, "grid size must be positive"));
                }
                ast.grid_size = Some(grid);
            }
            _ => {
                return Err(ResistoError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    fn parse_wire(&mut self) -> Result<WireDef> {
        let line = self.current.line;
        self.advance()?;

        let mut terminal = || -> Result<TerminalId> {
            let tok = self.expect(TokenKind::Identifier)?;
            tok.text
                .parse()
                .map_err(|e: ResistoError| ResistoError::parse(tok.line, e.to_string()))
        };
        let from = terminal()?;
        let to = terminal()?;

        Ok(WireDef { from, to, line })
    }

    /// `<id> <kind> [value] [at <x> <y>] [rot <degrees>]`
    fn parse_component(&mut self) -> Result<ComponentDef> {
        let id = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let kind_tok = self.expect(TokenKind::Identifier)?;
        let kind = ComponentKind::from_keyword(&kind_tok.text).ok_or_else(|| {
            ResistoError::UnknownComponentKind {
                kind: kind_tok.text.clone(),
                line,
            }
        })?;

        let mut def = ComponentDef {
            id,
            kind,
            value: None,
            position: None,
            rotation: None,
            line,
        };

        if self.current.kind == TokenKind::Number {
            def.value = Some(self.expect_number()?);
        }

        while self.current.kind == TokenKind::Identifier {
            match self.current.text.to_lowercase().as_str() {
                "at" => {
                    self.advance()?;
                    let x = self.expect_number()?;
                    let y = self.expect_number()?;
                    def.position = Some((x, y));
                }
                "rot" => {
                    self.advance()?;
                    let text = self.current.text.clone();
                    let degrees = self.expect_number()?;
                    if degrees.fract() != 0.0 {
                        return Err(ResistoError::parse(
                            line,
                            format!("rotation must be whole degrees, got {}", text),
                        ));
                    }
                    def.rotation = Some(degrees as i64);
                }
                other => {
                    return Err(ResistoError::parse(
                        line,
                        format!("unexpected keyword '{}' in component {}", other, def.id),
                    ));
                }
            }
        }

        Ok(def)
    }
}
