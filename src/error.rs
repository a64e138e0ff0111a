//! Error types for the Resisto circuit analyzer.
//!
//! This module provides a unified error type [`ResistoError`] for the
//! operations that can genuinely fail: reading layout files, editing a
//! session with bad input, and evaluating a bridge with invalid arms.
//!
//! Classification outcomes such as "no connections" or "multiple sources"
//! are not errors. They are reported through
//! [`CircuitType`](crate::analysis::CircuitType).

use thiserror::Error;

/// Result type alias using [`ResistoError`].
pub type Result<T> = std::result::Result<T, ResistoError>;

/// Unified error type for all Resisto operations.
#[derive(Error, Debug)]
pub enum ResistoError {
    // ============ Layout File Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Unknown component kind keyword
    #[error("Unknown component kind '{kind}' at line {line}")]
    UnknownComponentKind { kind: String, line: usize },

    // ============ Session Errors ============
    /// Duplicate component id
    #[error("Duplicate component id '{id}'")]
    DuplicateComponent { id: String },

    /// Component id not present in the session
    #[error("Component '{id}' not found in circuit")]
    ComponentNotFound { id: String },

    /// Non-positive or non-finite component value
    #[error("Invalid value {value} for component '{id}': {message}")]
    InvalidValue {
        id: String,
        value: f64,
        message: String,
    },

    /// Non-positive or non-finite value for a component not yet placed
    #[error("Invalid {kind} value {value} (must be positive and finite)")]
    InvalidKindValue { kind: &'static str, value: f64 },

    /// Non-finite component position
    #[error("Invalid position ({x}, {y}) for component '{id}' (must be finite)")]
    InvalidPosition { id: String, x: f64, y: f64 },

    /// Rotation other than 0 or 90 degrees
    #[error("Invalid rotation {degrees}° (expected 0 or 90)")]
    InvalidRotation { degrees: i64 },

    /// Malformed terminal reference such as "R1" or "R1-C"
    #[error("Invalid terminal reference '{text}' (expected <id>-A or <id>-B)")]
    InvalidTerminal { text: String },

    // ============ Bridge Errors ============
    /// Bridge arm that is not a positive finite resistance
    #[error("Invalid bridge arm {arm} = {value} (must be a positive resistance)")]
    InvalidBridgeArm { arm: &'static str, value: f64 },

    // ============ I/O Errors ============
    /// Error reading a layout file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error serializing a result record
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ResistoError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(id: impl Into<String>, value: f64, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            id: id.into(),
            value,
            message: message.into(),
        }
    }
}
