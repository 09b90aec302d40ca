//! Valued passive components: Resistor and Capacitor.

use crate::circuit::{ComponentId, Position};

/// A resistor component.
///
/// Only its ohm value matters to the engine: every resistor in the circuit
/// contributes to one series total, powered or not.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub id: ComponentId,
    pub position: Position,
    /// Resistance in ohms (always positive)
    pub ohms: f64,
}

impl Resistor {
    /// Resistance used when no valid value was entered.
    pub const DEFAULT_OHMS: f64 = 100.0;

    /// Create a new resistor with the default value.
    pub fn new(id: ComponentId, position: Position) -> Self {
        Self {
            id,
            position,
            ohms: Self::DEFAULT_OHMS,
        }
    }

    /// Set the resistance, falling back to the default for unusable input.
    /// Returns the value actually stored.
    pub fn set_ohms(&mut self, ohms: Option<f64>) -> f64 {
        self.ohms = sanitize(ohms, Self::DEFAULT_OHMS);
        self.ohms
    }
}

/// A capacitor component.
///
/// Its charge indicator is computed from its own capacitance alone and does
/// not depend on whether the capacitor is wired to anything.
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub id: ComponentId,
    pub position: Position,
    /// Capacitance in microfarads (always positive)
    pub microfarads: f64,
}

impl Capacitor {
    /// Capacitance used when no valid value was entered.
    pub const DEFAULT_MICROFARADS: f64 = 10.0;

    /// Create a new capacitor with the default value.
    pub fn new(id: ComponentId, position: Position) -> Self {
        Self {
            id,
            position,
            microfarads: Self::DEFAULT_MICROFARADS,
        }
    }

    /// Set the capacitance, falling back to the default for unusable input.
    /// Returns the value actually stored.
    pub fn set_microfarads(&mut self, microfarads: Option<f64>) -> f64 {
        self.microfarads = sanitize(microfarads, Self::DEFAULT_MICROFARADS);
        self.microfarads
    }
}

/// Non-finite, zero and negative values all collapse to the default.
fn sanitize(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}
