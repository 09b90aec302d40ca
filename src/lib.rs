//! # Breadboard Core
//!
//! A visual breadboard circuit simulator engine.
//!
//! This library provides:
//! - A component registry and wire graph with stable ids
//! - Depth-first power propagation with diode and switch gating
//! - A simplified electrical model: series resistance, one circuit current,
//!   LED brightness and a timed capacitor charging indicator
//! - A small scene language for describing boards in text
//!
//! ## Architecture
//!
//! - [`circuit`] - Component registry, wire graph and validation
//! - [`components`] - Component kinds and their editable properties
//! - [`dsl`] - Parser for the scene description language
//! - [`solver`] - Propagation, electrical model and the simulation session
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! RUST_LOG=debug breadboard board.bb --at-ms 500
//! ```
//!
//! ### Library
//!
//! ```
//! use std::time::Duration;
//! use breadboard_core::{dsl, Circuit, Simulator};
//!
//! let ast = dsl::parse("POWER P1 0 0\nR R1 50 0 100\nLED L1 100 0\n.wire P1 R1 L1").unwrap();
//! let circuit = Circuit::from_ast(ast).unwrap();
//! let led = circuit.find("L1").unwrap();
//!
//! let mut sim = Simulator::new(circuit);
//! let report = sim.run(Duration::ZERO);
//! assert!(report.led(led).unwrap().active);
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmBreadboard } from 'breadboard_core';
//!
//! const board = new WasmBreadboard();
//! const p = board.add("power", 40, 80);
//! ```

pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod solver;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use error::{CircuitError, Result};
pub use solver::{SimulationConfig, SimulationReport, Simulator};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmBreadboard;
