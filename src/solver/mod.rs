//! Power propagation and display-state solver.
//!
//! The solver is deliberately not an analog simulator. A run does three
//! things:
//!
//! 1. Walk the wire graph depth-first from every power source, asking the
//!    gating rules whether current may enter each next component. Everything
//!    reached is *powered*.
//! 2. Derive one circuit-wide current from Ohm's law, using the sum of all
//!    resistor values as the series resistance.
//! 3. Turn that into display state: LED brightness for powered LEDs and a
//!    timed charging indicator for capacitors.
//!
//! ```text
//! current    = supply_voltage / max(total_resistance, 1)
//! brightness = min(1, current / led_threshold)
//! v_cap      = capacitance * charge_constant      (charging while v_cap > 0.5)
//! hold       = capacitance * discharge_scale ms
//! ```

mod electrical;
mod gating;
mod propagation;
mod schedule;
mod simulator;

pub use electrical::{
    capacitor_charge, circuit_current, led_brightness, total_resistance, ChargeOutcome,
};
pub use gating::can_pass_current;
pub use propagation::{compute_powered, PoweredSet};
pub use schedule::ChargeSchedule;
pub use simulator::{
    CapacitorDisplay, LedDisplay, SimulationConfig, SimulationReport, Simulator,
};

/// Supply voltage of every power source, in volts.
pub const DEFAULT_SUPPLY_VOLTAGE: f64 = 5.0;

/// Current at which an LED reaches full brightness, in amperes.
pub const DEFAULT_LED_THRESHOLD: f64 = 0.01;

/// Volts per microfarad used for the capacitor charge indicator.
pub const DEFAULT_CHARGE_CONSTANT: f64 = 0.01;

/// Capacitor voltage above which the charging indicator turns on.
pub const DEFAULT_CHARGE_THRESHOLD: f64 = 0.5;

/// Milliseconds of charging indicator per microfarad.
pub const DEFAULT_DISCHARGE_SCALE: f64 = 10.0;

/// Floor applied to the series resistance before dividing.
pub const MIN_RESISTANCE: f64 = 1.0;
