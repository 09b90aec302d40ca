//! Diode and LED models.
//!
//! Neither is modelled electrically. A diode only decides which way current
//! may enter it, and it decides that from canvas positions: a forward diode
//! accepts current arriving from its left (smaller or equal x), a reverse
//! diode from its right. Moving a component can therefore change the
//! simulation outcome even when the wiring is unchanged. An LED is a sink
//! whose brightness is derived after propagation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::circuit::{ComponentId, Position};

/// Orientation of a diode on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiodeDirection {
    /// Conducts left to right
    #[default]
    Forward,
    /// Conducts right to left
    Reverse,
}

impl DiodeDirection {
    /// The opposite orientation.
    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }

    /// Parse a direction keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "forward" | "fwd" => Some(Self::Forward),
            "reverse" | "rev" => Some(Self::Reverse),
            _ => None,
        }
    }
}

impl fmt::Display for DiodeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Reverse => write!(f, "reverse"),
        }
    }
}

/// A diode component.
#[derive(Debug, Clone)]
pub struct Diode {
    pub id: ComponentId,
    pub position: Position,
    pub direction: DiodeDirection,
}

impl Diode {
    /// Create a new forward-biased diode.
    pub fn new(id: ComponentId, position: Position) -> Self {
        Self {
            id,
            position,
            direction: DiodeDirection::Forward,
        }
    }

    /// Flip the orientation and return the new one.
    pub fn toggle(&mut self) -> DiodeDirection {
        self.direction = self.direction.flipped();
        self.direction
    }

    /// Whether current arriving from `from` may enter this diode.
    ///
    /// Equal x coordinates conduct in both orientations.
    pub fn conducts_from(&self, from: Position) -> bool {
        match self.direction {
            DiodeDirection::Forward => from.x <= self.position.x,
            DiodeDirection::Reverse => from.x >= self.position.x,
        }
    }
}

/// A light-emitting diode. Always passes current; lights up when powered.
#[derive(Debug, Clone)]
pub struct Led {
    pub id: ComponentId,
    pub position: Position,
}

impl Led {
    /// Create a new LED.
    pub fn new(id: ComponentId, position: Position) -> Self {
        Self { id, position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diode_at(x: f64, direction: DiodeDirection) -> Diode {
        Diode {
            id: ComponentId(0),
            position: Position::new(x, 0.0),
            direction,
        }
    }

    #[test]
    fn test_forward_accepts_from_left() {
        let d = diode_at(100.0, DiodeDirection::Forward);
        assert!(d.conducts_from(Position::new(50.0, 300.0)));
        assert!(d.conducts_from(Position::new(100.0, 0.0)));
        assert!(!d.conducts_from(Position::new(150.0, 0.0)));
    }

    #[test]
    fn test_reverse_accepts_from_right() {
        let d = diode_at(100.0, DiodeDirection::Reverse);
        assert!(!d.conducts_from(Position::new(50.0, 0.0)));
        assert!(d.conducts_from(Position::new(100.0, 0.0)));
        assert!(d.conducts_from(Position::new(150.0, -20.0)));
    }

    #[test]
    fn test_toggle_round_trips() {
        let mut d = diode_at(0.0, DiodeDirection::Forward);
        assert_eq!(d.toggle(), DiodeDirection::Reverse);
        assert_eq!(d.toggle(), DiodeDirection::Forward);
    }

    #[test]
    fn test_direction_keywords() {
        assert_eq!(DiodeDirection::from_keyword("REVERSE"), Some(DiodeDirection::Reverse));
        assert_eq!(DiodeDirection::from_keyword("fwd"), Some(DiodeDirection::Forward));
        assert_eq!(DiodeDirection::from_keyword("sideways"), None);
    }
}
