//! Electrical model: resistance, current and display values.

use std::time::Duration;

use crate::circuit::Registry;
use crate::components::{Capacitor, Component};

use super::simulator::SimulationConfig;
use super::MIN_RESISTANCE;

/// Sum of every resistor's value in the registry.
///
/// Resistors count whether or not they are powered or even wired: the
/// model treats the whole board as one series loop.
pub fn total_resistance(registry: &Registry) -> f64 {
    registry
        .iter()
        .filter_map(|c| match c {
            Component::Resistor(r) => Some(r.ohms),
            _ => None,
        })
        .sum()
}

/// Ohm's law with the resistance floored at [`MIN_RESISTANCE`].
pub fn circuit_current(supply_voltage: f64, total_resistance: f64) -> f64 {
    supply_voltage / total_resistance.max(MIN_RESISTANCE)
}

/// LED brightness in [0, 1] for a given circuit current.
pub fn led_brightness(current: f64, led_threshold: f64) -> f64 {
    if led_threshold <= 0.0 {
        return 1.0;
    }
    (current / led_threshold).clamp(0.0, 1.0)
}

/// Charge indicator state for one capacitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeOutcome {
    /// Nominal voltage, `capacitance * charge_constant`
    pub voltage: f64,
    /// How long the charging indicator stays on; `None` when idle
    pub hold: Option<Duration>,
}

impl ChargeOutcome {
    /// Whether the capacitor shows as charging.
    pub fn is_charging(&self) -> bool {
        self.hold.is_some()
    }
}

/// Evaluate a capacitor's charge indicator from its own value alone.
pub fn capacitor_charge(capacitor: &Capacitor, config: &SimulationConfig) -> ChargeOutcome {
    let voltage = capacitor.microfarads * config.charge_constant;
    let hold = (voltage > config.charge_threshold).then(|| {
        let micros = capacitor.microfarads * config.discharge_scale * 1000.0;
        Duration::from_micros(micros.round() as u64)
    });
    ChargeOutcome { voltage, hold }
}
