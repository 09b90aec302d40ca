//! Component models for the breadboard.
//!
//! This module provides models for all placeable components:
//! - Sources: Power, Junction
//! - Valued: Resistor, Capacitor
//! - Directional: Diode, LED
//! - Controls: Switch
//!
//! Each variant carries only the attributes that make sense for its type,
//! so a resistor can never hold a diode direction or a switch state.

mod controls;
mod diode;
mod linear;
mod sources;

pub use controls::Switch;
pub use diode::{Diode, DiodeDirection, Led};
pub use linear::{Capacitor, Resistor};
pub use sources::{Junction, PowerSource};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::circuit::{ComponentId, Position};

/// Component types that can be placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Power source
    Power,
    /// Resistor
    Resistor,
    /// Capacitor
    Capacitor,
    /// Light-emitting diode
    Led,
    /// Diode
    Diode,
    /// Switch
    Switch,
    /// Plain wire endpoint
    Junction,
}

impl ComponentKind {
    /// All kinds, in palette order.
    pub const ALL: [ComponentKind; 7] = [
        Self::Power,
        Self::Resistor,
        Self::Capacitor,
        Self::Led,
        Self::Diode,
        Self::Switch,
        Self::Junction,
    ];

    /// Parse a component kind from a keyword or palette label.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "POWER" | "PWR" | "BAT" | "BATTERY" | "V" => Some(Self::Power),
            "R" | "RES" | "RESISTOR" => Some(Self::Resistor),
            "C" | "CAP" | "CAPACITOR" => Some(Self::Capacitor),
            "LED" => Some(Self::Led),
            "D" | "DIODE" => Some(Self::Diode),
            "SW" | "SWITCH" => Some(Self::Switch),
            "J" | "NODE" | "JUNCTION" => Some(Self::Junction),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Power => "Power",
            Self::Resistor => "Resistor",
            Self::Capacitor => "Capacitor",
            Self::Led => "LED",
            Self::Diode => "Diode",
            Self::Switch => "Switch",
            Self::Junction => "Junction",
        }
    }

    /// Whether this kind carries a numeric value.
    pub fn has_value(&self) -> bool {
        matches!(self, Self::Resistor | Self::Capacitor)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A placed component.
#[derive(Debug, Clone)]
pub enum Component {
    Power(PowerSource),
    Resistor(Resistor),
    Capacitor(Capacitor),
    Led(Led),
    Diode(Diode),
    Switch(Switch),
    Junction(Junction),
}

impl Component {
    /// Create a component of the given kind with type defaults.
    pub fn with_defaults(id: ComponentId, kind: ComponentKind, position: Position) -> Self {
        match kind {
            ComponentKind::Power => Component::Power(PowerSource::new(id, position)),
            ComponentKind::Resistor => Component::Resistor(Resistor::new(id, position)),
            ComponentKind::Capacitor => Component::Capacitor(Capacitor::new(id, position)),
            ComponentKind::Led => Component::Led(Led::new(id, position)),
            ComponentKind::Diode => Component::Diode(Diode::new(id, position)),
            ComponentKind::Switch => Component::Switch(Switch::new(id, position)),
            ComponentKind::Junction => Component::Junction(Junction::new(id, position)),
        }
    }

    /// Get the component ID.
    pub fn id(&self) -> ComponentId {
        match self {
            Component::Power(p) => p.id,
            Component::Resistor(r) => r.id,
            Component::Capacitor(c) => c.id,
            Component::Led(l) => l.id,
            Component::Diode(d) => d.id,
            Component::Switch(s) => s.id,
            Component::Junction(j) => j.id,
        }
    }

    /// Get the component kind.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Power(_) => ComponentKind::Power,
            Component::Resistor(_) => ComponentKind::Resistor,
            Component::Capacitor(_) => ComponentKind::Capacitor,
            Component::Led(_) => ComponentKind::Led,
            Component::Diode(_) => ComponentKind::Diode,
            Component::Switch(_) => ComponentKind::Switch,
            Component::Junction(_) => ComponentKind::Junction,
        }
    }

    /// Get the canvas position.
    pub fn position(&self) -> Position {
        match self {
            Component::Power(p) => p.position,
            Component::Resistor(r) => r.position,
            Component::Capacitor(c) => c.position,
            Component::Led(l) => l.position,
            Component::Diode(d) => d.position,
            Component::Switch(s) => s.position,
            Component::Junction(j) => j.position,
        }
    }

    /// Move the component.
    pub fn set_position(&mut self, position: Position) {
        let slot = match self {
            Component::Power(p) => &mut p.position,
            Component::Resistor(r) => &mut r.position,
            Component::Capacitor(c) => &mut c.position,
            Component::Led(l) => &mut l.position,
            Component::Diode(d) => &mut d.position,
            Component::Switch(s) => &mut s.position,
            Component::Junction(j) => &mut j.position,
        };
        *slot = position;
    }

    /// Numeric value (ohms or microfarads), if this kind has one.
    pub fn value(&self) -> Option<f64> {
        match self {
            Component::Resistor(r) => Some(r.ohms),
            Component::Capacitor(c) => Some(c.microfarads),
            _ => None,
        }
    }

    /// Check if this component is a power source.
    pub fn is_source(&self) -> bool {
        matches!(self, Component::Power(_))
    }
}
