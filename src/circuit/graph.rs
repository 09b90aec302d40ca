//! Circuit structure: components plus the wires between them.

use std::collections::HashMap;

use log::{debug, warn};

use super::registry::Registry;
use super::types::{ComponentId, Position, WireId};
use super::wires::{Neighbor, Wire, WireGraph};
use crate::components::{Component, ComponentKind, DiodeDirection};
use crate::dsl::SceneAst;
use crate::error::{CircuitError, Result};

/// A breadboard layout: the component registry, the wire graph and the
/// optional names given to components.
///
/// All topology edits go through here so that deleting a component always
/// takes its wires with it.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    registry: Registry,
    wires: WireGraph,
    /// Mapping from component names to ids
    name_map: HashMap<String, ComponentId>,
    /// Reverse mapping, for reports and error messages
    names: HashMap<ComponentId, String>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a circuit from a parsed scene.
    pub fn from_ast(ast: SceneAst) -> Result<Self> {
        let mut circuit = Circuit::new();

        for def in &ast.components {
            let id = circuit.add_named(&def.name, def.kind, def.position)?;

            if let Some(value) = def.value {
                circuit.registry.set_numeric_value(id, value)?;
            }
            if let Some(direction) = def.direction {
                circuit.registry.set_direction(id, direction)?;
            }
            if let Some(active) = def.active {
                circuit.set_switch(id, active)?;
            }
        }

        for wire in &ast.wires {
            let start = circuit.require(&wire.start)?;
            let end = circuit.require(&wire.end)?;
            if circuit.connect(start, end)?.is_none() {
                warn!(
                    "line {}: ignoring wire from '{}' to itself",
                    wire.line, wire.start
                );
            }
        }

        Ok(circuit)
    }

    /// Place a new unnamed component.
    pub fn add(&mut self, kind: ComponentKind, position: Position) -> ComponentId {
        self.registry.add(kind, position)
    }

    /// Place a new component under a unique name.
    pub fn add_named(
        &mut self,
        name: &str,
        kind: ComponentKind,
        position: Position,
    ) -> Result<ComponentId> {
        if self.name_map.contains_key(name) {
            return Err(CircuitError::DuplicateComponent {
                name: name.to_string(),
            });
        }
        let id = self.registry.add(kind, position);
        self.name_map.insert(name.to_string(), id);
        self.names.insert(id, name.to_string());
        Ok(id)
    }

    /// Delete a component and every wire touching it.
    ///
    /// Returns the removed wires so the caller can drop their rendering.
    pub fn remove(&mut self, id: ComponentId) -> Result<Vec<Wire>> {
        self.registry.remove(id)?;
        if let Some(name) = self.names.remove(&id) {
            self.name_map.remove(&name);
        }
        let removed = self.wires.disconnect_all(id);
        debug!("removed {} along with {} wire(s)", id, removed.len());
        Ok(removed)
    }

    /// Wire two components together.
    ///
    /// Returns `Ok(None)` for a self connection, which is silently ignored.
    pub fn connect(&mut self, a: ComponentId, b: ComponentId) -> Result<Option<WireId>> {
        for id in [a, b] {
            if !self.registry.contains(id) {
                return Err(CircuitError::ComponentNotFound { id });
            }
        }
        let wire = self.wires.connect(a, b);
        if let Some(w) = wire {
            debug!("wired {} -> {} as {}", a, b, w);
        }
        Ok(wire)
    }

    /// Move a component on the canvas.
    pub fn move_to(&mut self, id: ComponentId, position: Position) -> Result<()> {
        self.registry.move_to(id, position)
    }

    /// Set a resistor or capacitor value from raw input. See [`Registry::set_value`].
    pub fn set_value(&mut self, id: ComponentId, raw: &str) -> Result<f64> {
        self.registry.set_value(id, raw)
    }

    /// Flip a diode's orientation.
    pub fn toggle_direction(&mut self, id: ComponentId) -> Result<DiodeDirection> {
        self.registry.toggle_direction(id)
    }

    /// Set a switch's state.
    pub fn set_switch(&mut self, id: ComponentId, active: bool) -> Result<()> {
        self.registry.set_switch(id, active)
    }

    /// Toggle a switch.
    pub fn toggle_switch(&mut self, id: ComponentId) -> Result<bool> {
        self.registry.toggle_switch(id)
    }

    /// Look up a component.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.registry.get(id)
    }

    /// Neighbors of a component along its wires.
    pub fn neighbors(&self, id: ComponentId) -> Vec<Neighbor> {
        self.wires.neighbors(id)
    }

    /// The component registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The wire graph.
    pub fn wires(&self) -> &WireGraph {
        &self.wires
    }

    /// Find a component id by name.
    pub fn find(&self, name: &str) -> Option<ComponentId> {
        self.name_map.get(name).copied()
    }

    /// Get the name of a component, if it has one.
    pub fn name_of(&self, id: ComponentId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Display label for a component: its name, or its id.
    pub fn label(&self, id: ComponentId) -> String {
        self.name_of(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    fn require(&self, name: &str) -> Result<ComponentId> {
        self.find(name).ok_or_else(|| CircuitError::UnknownComponent {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse;

    #[test]
    fn test_from_ast_applies_attributes() {
        let ast = parse(
            "POWER P1 0 0\nR R1 10 0 220\nD D1 20 0 reverse\nSW S1 30 0 on\n.wire P1 R1 D1 S1",
        )
        .unwrap();
        let circuit = Circuit::from_ast(ast).unwrap();

        let r1 = circuit.find("R1").unwrap();
        assert_eq!(circuit.component(r1).and_then(Component::value), Some(220.0));
        assert!(matches!(
            circuit.component(circuit.find("D1").unwrap()),
            Some(Component::Diode(d)) if d.direction == DiodeDirection::Reverse
        ));
        assert!(matches!(
            circuit.component(circuit.find("S1").unwrap()),
            Some(Component::Switch(s)) if s.active
        ));
        assert_eq!(circuit.wires().len(), 3);
    }

    #[test]
    fn test_from_ast_rejects_unknown_and_duplicate_names() {
        let err = Circuit::from_ast(parse("LED L1 0 0\n.wire L1 L2").unwrap()).unwrap_err();
        assert!(matches!(err, CircuitError::UnknownComponent { ref name } if name == "L2"));

        let err = Circuit::from_ast(parse("LED L1 0 0\nLED L1 5 0").unwrap()).unwrap_err();
        assert!(matches!(err, CircuitError::DuplicateComponent { .. }));
    }

    #[test]
    fn test_self_wire_in_scene_is_ignored() {
        let circuit = Circuit::from_ast(parse("LED L1 0 0\n.wire L1 L1").unwrap()).unwrap();
        assert!(circuit.wires().is_empty());
    }

    #[test]
    fn test_remove_cascades_and_frees_name() {
        let mut circuit = Circuit::new();
        let p = circuit.add_named("P1", ComponentKind::Power, Position::default()).unwrap();
        let l = circuit.add(ComponentKind::Led, Position::new(10.0, 0.0));
        let j = circuit.add(ComponentKind::Junction, Position::new(5.0, 5.0));
        circuit.connect(p, l).unwrap();
        circuit.connect(p, j).unwrap();
        circuit.connect(j, l).unwrap();

        let removed = circuit.remove(p).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(circuit.wires().len(), 1);
        assert_eq!(circuit.find("P1"), None);
        assert!(circuit.add_named("P1", ComponentKind::Power, Position::default()).is_ok());
    }

    #[test]
    fn test_connect_requires_existing_components() {
        let mut circuit = Circuit::new();
        let a = circuit.add(ComponentKind::Led, Position::default());
        let err = circuit.connect(a, ComponentId(99)).unwrap_err();
        assert!(matches!(err, CircuitError::ComponentNotFound { id: ComponentId(99) }));
        assert_eq!(circuit.connect(a, a).unwrap(), None);
    }

    #[test]
    fn test_labels() {
        let mut circuit = Circuit::new();
        let named = circuit.add_named("R7", ComponentKind::Resistor, Position::default()).unwrap();
        let anon = circuit.add(ComponentKind::Resistor, Position::default());
        assert_eq!(circuit.label(named), "R7");
        assert_eq!(circuit.label(anon), anon.to_string());
    }
}
