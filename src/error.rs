//! Error types for the breadboard engine.
//!
//! This module provides a unified error type [`CircuitError`] that covers
//! scene parsing, circuit editing and simulation configuration. Traversal
//! itself never fails: an unreachable component is simply unpowered.

use thiserror::Error;

use crate::circuit::ComponentId;

/// Result type alias using [`CircuitError`].
pub type Result<T> = std::result::Result<T, CircuitError>;

/// Unified error type for all breadboard operations.
#[derive(Error, Debug)]
pub enum CircuitError {
    // ============ Scene Parsing Errors ============
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

    /// Unknown component type keyword
    #[error("Unknown component type '{component_type}' at line {line}")]
    UnknownComponentType { component_type: String, line: usize },

    /// Invalid component definition
    #[error("Invalid component '{name}' at line {line}: {message}")]
    InvalidComponent {
        name: String,
        line: usize,
        message: String,
    },

    /// Duplicate component name
    #[error("Duplicate component name '{name}'")]
    DuplicateComponent { name: String },

    /// Wire or lookup referencing a name that was never declared
    #[error("Unknown component '{name}'")]
    UnknownComponent { name: String },

    // ============ Editing Errors ============
    /// Component id not present in the registry
    #[error("Component {id} not found")]
    ComponentNotFound { id: ComponentId },

    /// Operation not applicable to the component's type; nothing was changed
    #[error("Cannot {operation} on {kind} {id}")]
    InvalidOperation {
        id: ComponentId,
        kind: &'static str,
        operation: &'static str,
    },

    /// Invalid circuit topology
    #[error("Invalid circuit topology: {message}")]
    InvalidTopology { message: String },

    // ============ Configuration Errors ============
    /// Invalid simulation parameter
    #[error("Invalid simulation parameter '{param}': {message}")]
    InvalidSimulationParam { param: String, message: String },

    // ============ I/O Errors ============
    /// Error reading a scene file
    #[error("Failed to read scene file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error serializing a simulation report
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CircuitError {
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

    /// Create an invalid component error
    pub fn invalid_component(name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidComponent {
            name: name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid simulation parameter error
    pub fn invalid_param(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSimulationParam {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a rejected type-specific edit (state untouched).
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation { .. })
    }
}
