//! Circuit graph representation and validation.
//!
//! Components live in a [`Registry`] keyed by stable ids; wires live in a
//! [`WireGraph`] that refers to components only by id. The [`Circuit`]
//! struct owns both and keeps them consistent.

mod graph;
mod registry;
mod types;
mod validate;
mod wires;

pub use graph::Circuit;
pub use registry::Registry;
pub use types::*;
pub use validate::validate_circuit;
pub use wires::{Neighbor, Wire, WireGraph, WireSide};
