//! Wire graph: an undirected multigraph over component ids.
//!
//! Wires have no direction of their own. The adjacency index records, for
//! each component, the wires touching it in creation order so that
//! traversal order is deterministic.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::types::{ComponentId, WireId};

/// A wire between two distinct components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Wire {
    pub id: WireId,
    pub start: ComponentId,
    pub end: ComponentId,
}

impl Wire {
    /// Whether the wire touches `component`.
    pub fn touches(&self, component: ComponentId) -> bool {
        self.start == component || self.end == component
    }
}

/// Which end of a wire the queried component sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireSide {
    Start,
    End,
}

/// One step away from a component along a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    /// The wire crossed
    pub wire: WireId,
    /// The component at the far end
    pub other: ComponentId,
    /// The end of the wire the queried component was on
    pub side: WireSide,
}

/// The set of wires plus an adjacency index.
#[derive(Debug, Clone, Default)]
pub struct WireGraph {
    wires: BTreeMap<WireId, Wire>,
    adjacency: HashMap<ComponentId, Vec<WireId>>,
    next_id: usize,
}

impl WireGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a wire between `a` and `b`.
    ///
    /// Self loops are rejected silently by returning `None`. Parallel wires
    /// between the same pair are allowed.
    pub fn connect(&mut self, a: ComponentId, b: ComponentId) -> Option<WireId> {
        if a == b {
            return None;
        }
        let id = WireId(self.next_id);
        self.next_id += 1;
        self.wires.insert(id, Wire { id, start: a, end: b });
        self.adjacency.entry(a).or_default().push(id);
        self.adjacency.entry(b).or_default().push(id);
        Some(id)
    }

    /// Remove every wire touching `component`, returning them in creation order.
    pub fn disconnect_all(&mut self, component: ComponentId) -> Vec<Wire> {
        let Some(incident) = self.adjacency.remove(&component) else {
            return Vec::new();
        };

        let mut removed = Vec::with_capacity(incident.len());
        for wire_id in incident {
            let Some(wire) = self.wires.remove(&wire_id) else {
                continue;
            };
            let other = if wire.start == component { wire.end } else { wire.start };
            if let Some(list) = self.adjacency.get_mut(&other) {
                list.retain(|w| *w != wire_id);
                if list.is_empty() {
                    self.adjacency.remove(&other);
                }
            }
            removed.push(wire);
        }
        removed
    }

    /// Components one wire away from `component`, in wire creation order.
    pub fn neighbors(&self, component: ComponentId) -> Vec<Neighbor> {
        self.adjacency
            .get(&component)
            .map(|incident| {
                incident
                    .iter()
                    .filter_map(|id| self.wires.get(id))
                    .map(|wire| {
                        if wire.start == component {
                            Neighbor {
                                wire: wire.id,
                                other: wire.end,
                                side: WireSide::Start,
                            }
                        } else {
                            Neighbor {
                                wire: wire.id,
                                other: wire.start,
                                side: WireSide::End,
                            }
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Look up a wire.
    pub fn get(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(&id)
    }

    /// Iterate over all wires in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Wire> {
        self.wires.values()
    }

    /// Number of wires touching `component`.
    pub fn degree(&self, component: ComponentId) -> usize {
        self.adjacency.get(&component).map_or(0, Vec::len)
    }

    /// Number of wires.
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// Whether there are no wires.
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }
}
