//! Abstract Syntax Tree types for the scene language.

use std::collections::HashMap;

use crate::circuit::Position;
use crate::components::{ComponentKind, DiodeDirection};

/// Complete AST representation of a parsed scene.
#[derive(Debug, Clone, Default)]
pub struct SceneAst {
    /// Component placements, in source order
    pub components: Vec<ComponentDef>,
    /// Wires, in source order
    pub wires: Vec<WireDef>,
    /// Simulation settings from `.set` directives
    pub settings: HashMap<String, f64>,
}

impl SceneAst {
    /// Create a new empty scene AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A component placement from the scene.
#[derive(Debug, Clone)]
pub struct ComponentDef {
    /// Component kind
    pub kind: ComponentKind,
    /// Unique component name
    pub name: String,
    /// Canvas position
    pub position: Position,
    /// Ohms or microfarads, for valued kinds
    pub value: Option<f64>,
    /// Diode orientation
    pub direction: Option<DiodeDirection>,
    /// Switch state
    pub active: Option<bool>,
    /// Source line number for error reporting
    pub line: usize,
}

/// A wire between two named components.
#[derive(Debug, Clone, PartialEq)]
pub struct WireDef {
    pub start: String,
    pub end: String,
    /// Source line number for error reporting
    pub line: usize,
}
