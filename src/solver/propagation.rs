//! Depth-first power propagation.

use std::collections::BTreeSet;

use log::debug;
use serde::Serialize;

use super::gating::can_pass_current;
use crate::circuit::{ComponentId, Registry, WireGraph};
use crate::components::ComponentKind;

/// The set of components reached by current from any power source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PoweredSet(BTreeSet<ComponentId>);

impl PoweredSet {
    /// Check whether a component is powered.
    pub fn contains(&self, id: ComponentId) -> bool {
        self.0.contains(&id)
    }

    /// Number of powered components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is powered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Powered ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.0.iter().copied()
    }

    /// Powered ids as a vector, ascending.
    pub fn to_vec(&self) -> Vec<ComponentId> {
        self.iter().collect()
    }

    fn insert(&mut self, id: ComponentId) -> bool {
        self.0.insert(id)
    }

    /// Forget a deleted component.
    pub(super) fn remove(&mut self, id: ComponentId) -> bool {
        self.0.remove(&id)
    }
}

/// Compute which components are powered.
///
/// Runs a depth-first walk from every power source. A wire leading back to
/// the component we just came from is skipped, and a component already
/// marked powered is never entered again; the second check alone bounds the
/// walk to O(components + wires) and makes it terminate on any cycle.
/// Sources are not distinguished: their reach is simply unioned.
pub fn compute_powered(registry: &Registry, graph: &WireGraph) -> PoweredSet {
    let mut powered = PoweredSet::default();

    for source in registry.of_kind(ComponentKind::Power) {
        let before = powered.len();
        trace_from(source.id(), registry, graph, &mut powered);
        debug!(
            "source {} powered {} new component(s)",
            source.id(),
            powered.len() - before
        );
    }

    powered
}

/// Explicit-stack DFS; each entry is (component, component we arrived from).
fn trace_from(
    source: ComponentId,
    registry: &Registry,
    graph: &WireGraph,
    powered: &mut PoweredSet,
) {
    let mut stack: Vec<(ComponentId, Option<ComponentId>)> = vec![(source, None)];

    while let Some((id, previous)) = stack.pop() {
        let Some(current) = registry.get(id) else {
            continue;
        };
        if !powered.insert(id) {
            continue;
        }

        // Reversed so the first wire is explored first, as in a recursive walk.
        for neighbor in graph.neighbors(id).into_iter().rev() {
            if Some(neighbor.other) == previous || powered.contains(neighbor.other) {
                continue;
            }
            let Some(next) = registry.get(neighbor.other) else {
                continue;
            };
            if can_pass_current(current, next) {
                stack.push((neighbor.other, Some(id)));
            }
        }
    }
}
