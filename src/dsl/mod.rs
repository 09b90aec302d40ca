//! Scene description language.
//!
//! A small line-oriented text format for describing a breadboard layout:
//! where each component sits, how it is configured and which components
//! are wired together. It feeds the CLI and the WASM `from_scene`
//! constructor; the editor itself talks to the engine directly.
//!
//! # Grammar Overview
//!
//! ```text
//! scene       = { line }
//! line        = comment | directive | component | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = ".wire" name name { name }
//!             | ".set" key '=' number { key '=' number }
//! component   = type name x y { value | flag | key '=' (number | flag) }
//!
//! type        = "POWER" | "R" | "C" | "LED" | "D" | "SW" | "J" (and long forms)
//! flag        = "forward" | "reverse" | "on" | "off" | "closed" | "open"
//! number      = ['-'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+] [unit_suffix]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! Resistor values are ohms and capacitor values are microfarads, so a
//! 60 µF capacitor is written `60`, not `60u`.
//!
//! # Example
//!
//! ```text
//! # Power -> resistor -> LED
//! POWER P1   0  0
//! R     R1  50  0  220
//! LED   L1 100  0
//! .wire P1 R1 L1
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a scene string into an AST.
pub fn parse(input: &str) -> Result<SceneAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a scene file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<SceneAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::CircuitError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
