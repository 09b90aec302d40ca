//! Component registry.
//!
//! Owns every placed component, keyed by a stable [`ComponentId`]. The
//! registry knows nothing about wires; cascading deletes are handled by
//! [`Circuit`](super::Circuit), which owns both the registry and the graph.

use std::collections::BTreeMap;

use log::debug;

use super::types::{ComponentId, Position};
use crate::components::{Component, ComponentKind, DiodeDirection};
use crate::dsl::parse_value;
use crate::error::{CircuitError, Result};

/// The set of placed components.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    components: BTreeMap<ComponentId, Component>,
    next_id: usize,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new component with type-appropriate defaults.
    pub fn add(&mut self, kind: ComponentKind, position: Position) -> ComponentId {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        self.components
            .insert(id, Component::with_defaults(id, kind, position));
        debug!("placed {} {} at {}", kind, id, position);
        id
    }

    /// Remove a component, returning it.
    pub fn remove(&mut self, id: ComponentId) -> Result<Component> {
        self.components
            .remove(&id)
            .ok_or(CircuitError::ComponentNotFound { id })
    }

    /// Look up a component.
    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    /// Check whether a component exists.
    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(&id)
    }

    /// Iterate over all components in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Iterate over all components of one kind in id order.
    pub fn of_kind(&self, kind: ComponentKind) -> impl Iterator<Item = &Component> {
        self.components.values().filter(move |c| c.kind() == kind)
    }

    /// Number of placed components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Move a component.
    pub fn move_to(&mut self, id: ComponentId, position: Position) -> Result<()> {
        self.get_mut(id)?.set_position(position);
        Ok(())
    }

    /// Set a resistor or capacitor value from raw user input.
    ///
    /// Input that does not parse as a positive number falls back to the
    /// type default; that is not an error. Returns the value stored.
    pub fn set_value(&mut self, id: ComponentId, raw: &str) -> Result<f64> {
        self.apply_value(id, parse_value(raw))
    }

    /// Set a resistor or capacitor value from an already parsed number,
    /// with the same fallback rules as [`Registry::set_value`].
    pub fn set_numeric_value(&mut self, id: ComponentId, value: f64) -> Result<f64> {
        self.apply_value(id, Some(value))
    }

    fn apply_value(&mut self, id: ComponentId, parsed: Option<f64>) -> Result<f64> {
        match self.get_mut(id)? {
            Component::Resistor(r) => Ok(r.set_ohms(parsed)),
            Component::Capacitor(c) => Ok(c.set_microfarads(parsed)),
            other => Err(invalid(other, "set a value")),
        }
    }

    /// Flip a diode's orientation and return the new one.
    pub fn toggle_direction(&mut self, id: ComponentId) -> Result<DiodeDirection> {
        match self.get_mut(id)? {
            Component::Diode(d) => Ok(d.toggle()),
            other => Err(invalid(other, "toggle direction")),
        }
    }

    /// Set a diode's orientation explicitly.
    pub fn set_direction(&mut self, id: ComponentId, direction: DiodeDirection) -> Result<()> {
        match self.get_mut(id)? {
            Component::Diode(d) => {
                d.direction = direction;
                Ok(())
            }
            other => Err(invalid(other, "set direction")),
        }
    }

    /// Set a switch's state.
    pub fn set_switch(&mut self, id: ComponentId, active: bool) -> Result<()> {
        match self.get_mut(id)? {
            Component::Switch(s) => {
                s.set_state(active);
                Ok(())
            }
            other => Err(invalid(other, "set switch state")),
        }
    }

    /// Toggle a switch and return its new state.
    pub fn toggle_switch(&mut self, id: ComponentId) -> Result<bool> {
        match self.get_mut(id)? {
            Component::Switch(s) => Ok(s.toggle()),
            other => Err(invalid(other, "toggle switch")),
        }
    }

    fn get_mut(&mut self, id: ComponentId) -> Result<&mut Component> {
        self.components
            .get_mut(&id)
            .ok_or(CircuitError::ComponentNotFound { id })
    }
}

fn invalid(component: &Component, operation: &'static str) -> CircuitError {
    CircuitError::InvalidOperation {
        id: component.id(),
        kind: component.kind().label(),
        operation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_never_reused() {
        let mut reg = Registry::new();
        let a = reg.add(ComponentKind::Led, Position::default());
        reg.remove(a).unwrap();
        let b = reg.add(ComponentKind::Led, Position::default());
        assert_ne!(a, b);
        assert!(!reg.contains(a));
        assert!(matches!(
            reg.remove(a),
            Err(CircuitError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn test_set_value_falls_back() {
        let mut reg = Registry::new();
        let r = reg.add(ComponentKind::Resistor, Position::default());
        let c = reg.add(ComponentKind::Capacitor, Position::default());

        assert_eq!(reg.set_value(r, "220").unwrap(), 220.0);
        assert_eq!(reg.set_value(r, "1k").unwrap(), 1000.0);
        assert_eq!(reg.set_value(r, "abc").unwrap(), 100.0);
        assert_eq!(reg.set_value(r, "-4").unwrap(), 100.0);
        assert_eq!(reg.set_value(c, "").unwrap(), 10.0);
        assert_eq!(reg.set_value(c, "60").unwrap(), 60.0);
        assert_eq!(reg.get(c).and_then(Component::value), Some(60.0));
    }

    #[test]
    fn test_wrong_type_edits_are_no_ops() {
        let mut reg = Registry::new();
        let led = reg.add(ComponentKind::Led, Position::new(5.0, 5.0));
        let r = reg.add(ComponentKind::Resistor, Position::default());

        let err = reg.toggle_direction(led).unwrap_err();
        assert!(err.is_invalid_operation());
        assert!(reg.set_switch(r, true).unwrap_err().is_invalid_operation());
        assert!(reg.set_value(led, "5").unwrap_err().is_invalid_operation());
        assert_eq!(reg.get(r).and_then(Component::value), Some(100.0));
    }

    #[test]
    fn test_diode_and_switch_edits() {
        let mut reg = Registry::new();
        let d = reg.add(ComponentKind::Diode, Position::default());
        let s = reg.add(ComponentKind::Switch, Position::default());

        assert_eq!(reg.toggle_direction(d).unwrap(), DiodeDirection::Reverse);
        reg.set_direction(d, DiodeDirection::Forward).unwrap();
        assert!(matches!(
            reg.get(d),
            Some(Component::Diode(diode)) if diode.direction == DiodeDirection::Forward
        ));

        reg.set_switch(s, true).unwrap();
        assert!(!reg.toggle_switch(s).unwrap());
    }

    #[test]
    fn test_of_kind_filters() {
        let mut reg = Registry::new();
        reg.add(ComponentKind::Resistor, Position::default());
        reg.add(ComponentKind::Led, Position::default());
        reg.add(ComponentKind::Resistor, Position::default());
        assert_eq!(reg.of_kind(ComponentKind::Resistor).count(), 2);
        assert_eq!(reg.len(), 3);
    }
}
