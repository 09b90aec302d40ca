//! WASM bindings for Breadboard Core.
//!
//! The browser editor owns the canvas and the clock; this module owns the
//! circuit. Ids cross the boundary as plain numbers and timestamps as
//! milliseconds since the editor session started.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmBreadboard } from 'breadboard_core';
//!
//! await init();
//!
//! const board = new WasmBreadboard();
//! const p = board.add("power", 40, 80);
//! const led = board.add("led", 200, 80);
//! board.click(p);
//! board.click(led);
//!
//! const report = JSON.parse(board.run(performance.now()));
//! // Call tick() from a timer to clear capacitor charging indicators.
//! ```

use std::time::Duration;

use log::warn;
use wasm_bindgen::prelude::*;

use crate::circuit::{validate_circuit, Circuit, ComponentId, Position};
use crate::components::ComponentKind;
use crate::dsl;
use crate::error::{CircuitError, Result};
use crate::solver::{SimulationConfig, Simulator};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_error(err: CircuitError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn millis(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::ZERO)
}

/// Edits that do not apply to the component's kind are ignored.
fn lenient<T>(result: Result<T>) -> std::result::Result<Option<T>, JsValue> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_invalid_operation() => {
            warn!("{}", err);
            Ok(None)
        }
        Err(err) => Err(js_error(err)),
    }
}

/// WASM-compatible breadboard editing session.
#[wasm_bindgen]
pub struct WasmBreadboard {
    simulator: Simulator,
}

impl Default for WasmBreadboard {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmBreadboard {
    /// Create an empty board.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmBreadboard {
        WasmBreadboard {
            simulator: Simulator::new(Circuit::new()),
        }
    }

    /// Create a board from a scene description.
    #[wasm_bindgen]
    pub fn from_scene(scene: &str) -> std::result::Result<WasmBreadboard, JsValue> {
        let ast = dsl::parse(scene).map_err(js_error)?;
        let config = SimulationConfig::from_params(&ast.settings).map_err(js_error)?;
        let circuit = Circuit::from_ast(ast).map_err(js_error)?;
        validate_circuit(&circuit).map_err(js_error)?;

        Ok(WasmBreadboard {
            simulator: Simulator::with_config(circuit, config),
        })
    }

    /// Place a component. `kind` accepts the scene keywords
    /// (`power`, `resistor`, `capacitor`, `led`, `diode`, `switch`, `junction`, ...).
    #[wasm_bindgen]
    pub fn add(&mut self, kind: &str, x: f64, y: f64) -> std::result::Result<usize, JsValue> {
        let kind = ComponentKind::from_keyword(kind)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown component type: {}", kind)))?;
        let id = self.simulator.add_component(kind, Position::new(x, y));
        Ok(id.0)
    }

    /// Delete a component. Returns the ids of the wires removed with it.
    #[wasm_bindgen]
    pub fn remove(&mut self, id: usize) -> std::result::Result<Vec<usize>, JsValue> {
        let removed = self
            .simulator
            .remove_component(ComponentId(id))
            .map_err(js_error)?;
        Ok(removed.into_iter().map(|w| w.id.0).collect())
    }

    /// Move a component after a drag.
    #[wasm_bindgen]
    pub fn move_to(&mut self, id: usize, x: f64, y: f64) -> std::result::Result<(), JsValue> {
        self.simulator
            .move_to(ComponentId(id), Position::new(x, y))
            .map_err(js_error)
    }

    /// Wire two components. Returns `undefined` when both ids are the same.
    #[wasm_bindgen]
    pub fn connect(&mut self, a: usize, b: usize) -> std::result::Result<Option<usize>, JsValue> {
        let wire = self
            .simulator
            .connect(ComponentId(a), ComponentId(b))
            .map_err(js_error)?;
        Ok(wire.map(|w| w.0))
    }

    /// One click of the two-click wiring gesture. Returns the new wire id
    /// when the click completes a wire.
    #[wasm_bindgen]
    pub fn click(&mut self, id: usize) -> std::result::Result<Option<usize>, JsValue> {
        let wire = self.simulator.click(ComponentId(id)).map_err(js_error)?;
        Ok(wire.map(|w| w.0))
    }

    /// The component selected by the first click, if any.
    #[wasm_bindgen(getter)]
    pub fn pending_wire(&self) -> Option<usize> {
        self.simulator.pending_wire().map(|id| id.0)
    }

    /// Set a resistor or capacitor value from text (`"4.7k"`, `"100"`).
    /// Returns the value stored, or `undefined` for other kinds.
    #[wasm_bindgen]
    pub fn set_value(&mut self, id: usize, raw: &str) -> std::result::Result<Option<f64>, JsValue> {
        lenient(self.simulator.set_value(ComponentId(id), raw))
    }

    /// Flip a diode. Returns the new direction, or `undefined` for other kinds.
    #[wasm_bindgen]
    pub fn toggle_diode(&mut self, id: usize) -> std::result::Result<Option<String>, JsValue> {
        let direction = lenient(self.simulator.toggle_direction(ComponentId(id)))?;
        Ok(direction.map(|d| d.to_string()))
    }

    /// Open or close a switch.
    #[wasm_bindgen]
    pub fn set_switch(&mut self, id: usize, active: bool) -> std::result::Result<(), JsValue> {
        lenient(self.simulator.set_switch(ComponentId(id), active)).map(|_| ())
    }

    /// Toggle a switch. Returns the new state, or `undefined` for other kinds.
    #[wasm_bindgen]
    pub fn toggle_switch(&mut self, id: usize) -> std::result::Result<Option<bool>, JsValue> {
        lenient(self.simulator.toggle_switch(ComponentId(id)))
    }

    /// Run the simulation. Returns the report as JSON.
    #[wasm_bindgen]
    pub fn run(&mut self, now_ms: f64) -> std::result::Result<String, JsValue> {
        self.simulator.run(millis(now_ms)).to_json().map_err(js_error)
    }

    /// Stop the simulation. Returns the report as JSON.
    #[wasm_bindgen]
    pub fn stop(&mut self) -> std::result::Result<String, JsValue> {
        self.simulator.stop().to_json().map_err(js_error)
    }

    /// Advance the clock. Returns the ids of capacitors that stopped charging.
    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) -> Vec<usize> {
        self.simulator
            .advance(millis(now_ms))
            .into_iter()
            .map(|id| id.0)
            .collect()
    }

    /// When the next `tick` would change anything, in milliseconds.
    #[wasm_bindgen(getter)]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.simulator
            .next_deadline()
            .map(|d| d.as_micros() as f64 / 1000.0)
    }

    /// Current display state as JSON.
    #[wasm_bindgen]
    pub fn report(&self) -> std::result::Result<String, JsValue> {
        self.simulator.report().to_json().map_err(js_error)
    }

    /// All wires as JSON, for redrawing after edits.
    #[wasm_bindgen]
    pub fn wires(&self) -> std::result::Result<String, JsValue> {
        let wires: Vec<_> = self.simulator.circuit().wires().iter().collect();
        serde_json::to_string(&wires).map_err(|e| js_error(e.into()))
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
