//! Text format for circuit layouts.
//!
//! A layout file places components on the canvas and draws wires between
//! their terminals. The format is line-oriented and human-editable.
//!
//! # Grammar Overview
//!
//! ```text
//! layout      = { line }
//! line        = comment | directive | component | wire | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = ".tolerance" number | ".grid" number
//! component   = id kind [value] [ "at" number number ] [ "rot" number ]
//! wire        = "wire" terminal terminal
//!
//! kind        = "R" | "res" | "resistor" | "V" | "voltage" | "source" | "battery"
//! terminal    = id '-' ('A' | 'B')
//! value       = number [unit_suffix]
//! number      = ['-'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! # Directives
//!
//! | Directive | Description | Syntax |
//! |-----------|-------------|--------|
//! | .tolerance | Row tolerance for the layout heuristic | `.tolerance <units>` |
//! | .grid | Snap grid for interactive edits | `.grid <units>` |
//!
//! # Example
//!
//! ```text
//! # Two resistors across a 12 V source
//! V1 V 12  at 40 100 rot 90
//! R1 R 100 at 140 60
//! R2 R 100 at 140 140
//!
//! wire V1-B R1-A
//! wire R1-B R2-B
//! wire R2-A V1-A
//! ```
//!
//! Wires naming unknown components are kept in the AST; the session's
//! repair step drops them before analysis.

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a layout string into an AST.
pub fn parse(input: &str) -> Result<LayoutAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a layout file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<LayoutAst> {
    let content =
        std::fs::read_to_string(path).map_err(|e| crate::error::ResistoError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
    parse(&content)
}
