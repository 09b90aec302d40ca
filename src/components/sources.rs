//! Power sources and passive junctions.

use crate::circuit::{ComponentId, Position};

/// A power source.
///
/// Every source drives the same fixed supply voltage; propagation starts
/// from each of them and their reach is unioned.
#[derive(Debug, Clone)]
pub struct PowerSource {
    pub id: ComponentId,
    pub position: Position,
}

impl PowerSource {
    /// Create a new power source.
    pub fn new(id: ComponentId, position: Position) -> Self {
        Self { id, position }
    }
}

/// A generic wire endpoint with no electrical behavior of its own.
#[derive(Debug, Clone)]
pub struct Junction {
    pub id: ComponentId,
    pub position: Position,
}

impl Junction {
    /// Create a new junction.
    pub fn new(id: ComponentId, position: Position) -> Self {
        Self { id, position }
    }
}
