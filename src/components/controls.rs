//! Control components: Switch.

use crate::circuit::{ComponentId, Position};

/// A switch component.
///
/// An inactive switch blocks all current entering it; an active one is
/// transparent. It only changes state on an explicit user toggle.
#[derive(Debug, Clone)]
pub struct Switch {
    pub id: ComponentId,
    pub position: Position,
    pub active: bool,
}

impl Switch {
    /// Create a new switch, initially inactive.
    pub fn new(id: ComponentId, position: Position) -> Self {
        Self {
            id,
            position,
            active: false,
        }
    }

    /// Set the switch state.
    pub fn set_state(&mut self, active: bool) {
        self.active = active;
    }

    /// Toggle the switch state and return the new one.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }

    /// Parse a state keyword (`on`/`closed` or `off`/`open`).
    pub fn state_from_keyword(keyword: &str) -> Option<bool> {
        match keyword.to_ascii_lowercase().as_str() {
            "on" | "closed" | "active" => Some(true),
            "off" | "open" | "inactive" => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_starts_inactive() {
        let mut s = Switch::new(ComponentId(3), Position::default());
        assert!(!s.active);
        assert!(s.toggle());
        assert!(!s.toggle());
        s.set_state(true);
        assert!(s.active);
    }

    #[test]
    fn test_state_keywords() {
        assert_eq!(Switch::state_from_keyword("Closed"), Some(true));
        assert_eq!(Switch::state_from_keyword("off"), Some(false));
        assert_eq!(Switch::state_from_keyword("maybe"), None);
    }
}
