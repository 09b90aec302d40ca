//! Main simulator interface.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use log::{debug, info};
use serde::{Serialize, Serializer};

use crate::circuit::{Circuit, ComponentId, Position, Wire, WireId};
use crate::components::{Component, ComponentKind, DiodeDirection};
use crate::error::{CircuitError, Result};

use super::electrical::{capacitor_charge, circuit_current, led_brightness, total_resistance};
use super::propagation::{compute_powered, PoweredSet};
use super::schedule::ChargeSchedule;
use super::{
    DEFAULT_CHARGE_CONSTANT, DEFAULT_CHARGE_THRESHOLD, DEFAULT_DISCHARGE_SCALE,
    DEFAULT_LED_THRESHOLD, DEFAULT_SUPPLY_VOLTAGE,
};

/// Configuration for the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Voltage of every power source (volts).
    pub supply_voltage: f64,
    /// Current at which an LED is fully bright (amperes).
    pub led_threshold: f64,
    /// Capacitor volts per microfarad.
    pub charge_constant: f64,
    /// Capacitor voltage above which it shows as charging.
    pub charge_threshold: f64,
    /// Milliseconds of charging indicator per microfarad.
    pub discharge_scale: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            supply_voltage: DEFAULT_SUPPLY_VOLTAGE,
            led_threshold: DEFAULT_LED_THRESHOLD,
            charge_constant: DEFAULT_CHARGE_CONSTANT,
            charge_threshold: DEFAULT_CHARGE_THRESHOLD,
            discharge_scale: DEFAULT_DISCHARGE_SCALE,
        }
    }
}

impl SimulationConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the supply voltage.
    pub fn with_supply_voltage(mut self, volts: f64) -> Self {
        self.supply_voltage = volts;
        self
    }

    /// Set the LED full-brightness current.
    pub fn with_led_threshold(mut self, amperes: f64) -> Self {
        self.led_threshold = amperes;
        self
    }

    /// Set the capacitor volts-per-microfarad constant.
    pub fn with_charge_constant(mut self, constant: f64) -> Self {
        self.charge_constant = constant;
        self
    }

    /// Set the capacitor charging threshold.
    pub fn with_charge_threshold(mut self, volts: f64) -> Self {
        self.charge_threshold = volts;
        self
    }

    /// Set the charging indicator duration per microfarad (milliseconds).
    pub fn with_discharge_scale(mut self, millis_per_microfarad: f64) -> Self {
        self.discharge_scale = millis_per_microfarad;
        self
    }

    /// Build a configuration from `.set` directives, starting from defaults.
    pub fn from_params(params: &HashMap<String, f64>) -> Result<Self> {
        Self::default().with_params(params)
    }

    /// Apply `.set` style overrides on top of this configuration.
    ///
    /// Recognised keys: `supply`, `led_threshold`, `charge_constant`,
    /// `charge_threshold`, `discharge_scale`.
    pub fn with_params(mut self, params: &HashMap<String, f64>) -> Result<Self> {
        for (key, &value) in params {
            match key.as_str() {
                "supply" | "supply_voltage" | "voltage" => self.supply_voltage = value,
                "led_threshold" => self.led_threshold = value,
                "charge_constant" => self.charge_constant = value,
                "charge_threshold" => self.charge_threshold = value,
                "discharge_scale" => self.discharge_scale = value,
                other => {
                    return Err(CircuitError::invalid_param(other, "unknown setting"));
                }
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that every parameter is finite and in range.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("supply_voltage", self.supply_voltage),
            ("led_threshold", self.led_threshold),
            ("charge_constant", self.charge_constant),
            ("discharge_scale", self.discharge_scale),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CircuitError::invalid_param(name, format!("must be positive, got {}", value)));
            }
        }
        if !self.charge_threshold.is_finite() || self.charge_threshold < 0.0 {
            return Err(CircuitError::invalid_param(
                "charge_threshold",
                format!("must be non-negative, got {}", self.charge_threshold),
            ));
        }
        Ok(())
    }
}

/// Display state of one LED.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedDisplay {
    pub id: ComponentId,
    pub active: bool,
    /// 0 when inactive, otherwise in (0, 1]
    pub brightness: f64,
}

/// Display state of one capacitor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacitorDisplay {
    pub id: ComponentId,
    pub voltage: f64,
    pub charging: bool,
    /// When the charging indicator turns itself off
    #[serde(rename = "clears_at_ms", serialize_with = "serialize_millis")]
    pub clears_at: Option<Duration>,
}

/// Everything the editor needs to redraw after a run, stop or tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub running: bool,
    pub powered: Vec<ComponentId>,
    pub total_resistance: f64,
    pub current: f64,
    pub leds: Vec<LedDisplay>,
    pub capacitors: Vec<CapacitorDisplay>,
}

impl SimulationReport {
    /// Display state of an LED.
    pub fn led(&self, id: ComponentId) -> Option<&LedDisplay> {
        self.leds.iter().find(|l| l.id == id)
    }

    /// Display state of a capacitor.
    pub fn capacitor(&self, id: ComponentId) -> Option<&CapacitorDisplay> {
        self.capacitors.iter().find(|c| c.id == id)
    }

    /// Check whether a component was powered in the last run.
    pub fn is_powered(&self, id: ComponentId) -> bool {
        self.powered.contains(&id)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn serialize_millis<S: Serializer>(
    value: &Option<Duration>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(d) => serializer.serialize_some(&(d.as_micros() as f64 / 1000.0)),
        None => serializer.serialize_none(),
    }
}

/// A breadboard editing and simulation session.
///
/// Owns the circuit, the pending half of a two-click wiring gesture, the
/// capacitor reversion schedule and the display state of the last run.
/// Time is passed in by the caller as an offset from session start.
pub struct Simulator {
    /// The circuit being simulated
    circuit: Circuit,
    /// Simulation constants
    config: SimulationConfig,
    /// Pending capacitor reversions
    schedule: ChargeSchedule,
    /// First click of the wiring gesture
    pending_wire: Option<ComponentId>,
    /// Result of the last propagation
    powered: PoweredSet,
    total_resistance: f64,
    current: f64,
    leds: BTreeMap<ComponentId, LedDisplay>,
    capacitors: BTreeMap<ComponentId, CapacitorDisplay>,
    running: bool,
}

impl Simulator {
    /// Create a new simulator for the given circuit with default configuration.
    pub fn new(circuit: Circuit) -> Self {
        Self::with_config(circuit, SimulationConfig::default())
    }

    /// Create a new simulator for the given circuit with custom configuration.
    pub fn with_config(circuit: Circuit, config: SimulationConfig) -> Self {
        Self {
            circuit,
            config,
            schedule: ChargeSchedule::new(),
            pending_wire: None,
            powered: PoweredSet::default(),
            total_resistance: 0.0,
            current: 0.0,
            leds: BTreeMap::new(),
            capacitors: BTreeMap::new(),
            running: false,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Get a reference to the circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Place a new component. Takes effect on the next [`run`](Self::run).
    pub fn add_component(&mut self, kind: ComponentKind, position: Position) -> ComponentId {
        self.circuit.add(kind, position)
    }

    /// Delete a component, its wires and any session state referring to it.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<Vec<Wire>> {
        let removed = self.circuit.remove(id)?;
        if self.pending_wire == Some(id) {
            self.pending_wire = None;
        }
        self.schedule.cancel(id);
        self.powered.remove(id);
        self.leds.remove(&id);
        self.capacitors.remove(&id);
        Ok(removed)
    }

    /// Move a component. Diode gating depends on position, so a drag alone
    /// can change the next run's outcome.
    pub fn move_to(&mut self, id: ComponentId, position: Position) -> Result<()> {
        self.circuit.move_to(id, position)
    }

    /// Wire two components directly, bypassing the click gesture.
    pub fn connect(&mut self, a: ComponentId, b: ComponentId) -> Result<Option<WireId>> {
        self.circuit.connect(a, b)
    }

    /// Set a resistor or capacitor value from raw input.
    pub fn set_value(&mut self, id: ComponentId, raw: &str) -> Result<f64> {
        self.circuit.set_value(id, raw)
    }

    /// Flip a diode.
    pub fn toggle_direction(&mut self, id: ComponentId) -> Result<DiodeDirection> {
        self.circuit.toggle_direction(id)
    }

    /// Set a switch's state.
    pub fn set_switch(&mut self, id: ComponentId, active: bool) -> Result<()> {
        self.circuit.set_switch(id, active)
    }

    /// Toggle a switch.
    pub fn toggle_switch(&mut self, id: ComponentId) -> Result<bool> {
        self.circuit.toggle_switch(id)
    }

    /// Handle a click on a component as part of the two-click wiring gesture.
    ///
    /// The first click selects; a second click on another component wires
    /// the two and returns the new wire; clicking the selected component
    /// again just clears the selection.
    pub fn click(&mut self, id: ComponentId) -> Result<Option<WireId>> {
        if self.circuit.component(id).is_none() {
            return Err(CircuitError::ComponentNotFound { id });
        }
        match self.pending_wire.take() {
            None => {
                self.pending_wire = Some(id);
                Ok(None)
            }
            Some(start) => self.circuit.connect(start, id),
        }
    }

    /// The component selected by the first click, if any.
    pub fn pending_wire(&self) -> Option<ComponentId> {
        self.pending_wire
    }

    /// Run the simulation at time `now`.
    ///
    /// Recomputes the powered set, the circuit current and all display
    /// state. Charging capacitors get a fresh reversion deadline, replacing
    /// any deadline left over from a previous run.
    pub fn run(&mut self, now: Duration) -> SimulationReport {
        let registry = self.circuit.registry();
        self.schedule.retain(|id| registry.contains(id));

        self.powered = compute_powered(registry, self.circuit.wires());
        self.total_resistance = total_resistance(registry);
        self.current = circuit_current(self.config.supply_voltage, self.total_resistance);
        let brightness = led_brightness(self.current, self.config.led_threshold);

        self.leds.clear();
        self.capacitors.clear();

        for component in registry.iter() {
            match component {
                Component::Led(led) => {
                    let active = self.powered.contains(led.id);
                    self.leds.insert(
                        led.id,
                        LedDisplay {
                            id: led.id,
                            active,
                            brightness: if active { brightness } else { 0.0 },
                        },
                    );
                }
                Component::Capacitor(cap) => {
                    let outcome = capacitor_charge(cap, &self.config);
                    let clears_at = match outcome.hold {
                        Some(hold) => {
                            let deadline = now.saturating_add(hold);
                            self.schedule.schedule(cap.id, deadline);
                            Some(deadline)
                        }
                        None => {
                            self.schedule.cancel(cap.id);
                            None
                        }
                    };
                    self.capacitors.insert(
                        cap.id,
                        CapacitorDisplay {
                            id: cap.id,
                            voltage: outcome.voltage,
                            charging: clears_at.is_some(),
                            clears_at,
                        },
                    );
                }
                _ => {}
            }
        }

        self.running = true;
        info!(
            "run at {:?}: {} powered, R={} ohm, I={:.4} A",
            now,
            self.powered.len(),
            self.total_resistance,
            self.current
        );
        self.report()
    }

    /// Clear every active and charging flag.
    ///
    /// The powered set from the last run is kept; only the display resets.
    pub fn stop(&mut self) -> SimulationReport {
        for led in self.leds.values_mut() {
            led.active = false;
            led.brightness = 0.0;
        }
        for cap in self.capacitors.values_mut() {
            cap.charging = false;
            cap.clears_at = None;
        }
        self.schedule.clear();
        self.running = false;
        debug!("stopped; {} component(s) still marked powered", self.powered.len());
        self.report()
    }

    /// Advance the clock to `now`, clearing every capacitor whose charging
    /// indicator has run out. Returns the capacitors that changed.
    pub fn advance(&mut self, now: Duration) -> Vec<ComponentId> {
        let expired = self.schedule.expire(now);
        for id in &expired {
            if let Some(cap) = self.capacitors.get_mut(id) {
                cap.charging = false;
                cap.clears_at = None;
                debug!("{} stopped charging at {:?}", id, now);
            }
        }
        expired
    }

    /// The next time [`advance`](Self::advance) would change anything.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.schedule.next_deadline()
    }

    /// Powered set from the last run.
    pub fn powered(&self) -> &PoweredSet {
        &self.powered
    }

    /// Whether a run is in effect (no stop since the last run).
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Snapshot of the current display state.
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            running: self.running,
            powered: self.powered.to_vec(),
            total_resistance: self.total_resistance,
            current: self.current,
            leds: self.leds.values().cloned().collect(),
            capacitors: self.capacitors.values().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse;
    use approx::assert_relative_eq;

    const T0: Duration = Duration::ZERO;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn scene(src: &str) -> Simulator {
        Simulator::new(Circuit::from_ast(parse(src).unwrap()).unwrap())
    }

    fn id(sim: &Simulator, name: &str) -> ComponentId {
        sim.circuit().find(name).unwrap()
    }

    #[test]
    fn test_power_resistor_led() {
        let mut sim = scene("POWER P1 0 0\nR R1 50 0 100\nLED L1 100 0\n.wire P1 R1 L1");
        let report = sim.run(T0);

        assert_relative_eq!(report.total_resistance, 100.0);
        assert_relative_eq!(report.current, 0.05);
        let led = report.led(id(&sim, "L1")).unwrap();
        assert!(led.active);
        assert_relative_eq!(led.brightness, 1.0);
    }

    #[test]
    fn test_dim_led_with_large_resistance() {
        let mut sim = scene("POWER P1 0 0\nR R1 50 0 1k\nLED L1 100 0\n.wire P1 R1 L1");
        let report = sim.run(T0);
        assert_relative_eq!(report.current, 0.005);
        assert_relative_eq!(report.led(id(&sim, "L1")).unwrap().brightness, 0.5);
    }

    #[test]
    fn test_diode_direction_scenario() {
        let mut sim = scene("POWER P1 0 0\nD D1 100 0\nLED L1 200 0\n.wire P1 D1 L1");
        let l1 = id(&sim, "L1");
        assert!(sim.run(T0).led(l1).unwrap().active);

        let d1 = id(&sim, "D1");
        sim.toggle_direction(d1).unwrap();
        let report = sim.run(T0);
        assert!(!report.led(l1).unwrap().active);
        assert_eq!(report.led(l1).unwrap().brightness, 0.0);
        assert!(!report.is_powered(d1));
    }

    #[test]
    fn test_switch_scenario() {
        let mut sim = scene("POWER P1 0 0\nSW S1 50 0\nLED L1 100 0\n.wire P1 S1 L1");
        let l1 = id(&sim, "L1");
        assert!(!sim.run(T0).led(l1).unwrap().active);

        let s1 = id(&sim, "S1");
        sim.set_switch(s1, true).unwrap();
        assert!(sim.run(T0).led(l1).unwrap().active);
    }

    #[test]
    fn test_unpowered_resistors_still_count() {
        let mut sim = scene(
            "POWER P1 0 0\nLED L1 10 0\nR R1 0 50 200\nR R2 0 90 300\n.wire P1 L1",
        );
        let report = sim.run(T0);
        assert_relative_eq!(report.total_resistance, 500.0);
        assert_relative_eq!(report.current, 0.01);
        assert!(!report.is_powered(id(&sim, "R1")));
    }

    #[test]
    fn test_capacitor_charges_then_reverts() {
        let mut sim = scene("C C1 0 0 60\nC C2 0 40");
        let c1 = id(&sim, "C1");
        let c2 = id(&sim, "C2");

        let report = sim.run(ms(1000));
        let cap = report.capacitor(c1).unwrap();
        assert!(cap.charging);
        assert_relative_eq!(cap.voltage, 0.6);
        assert_eq!(cap.clears_at, Some(ms(1600)));
        assert!(!report.capacitor(c2).unwrap().charging);
        assert_eq!(sim.next_deadline(), Some(ms(1600)));

        assert!(sim.advance(ms(1599)).is_empty());
        assert!(sim.report().capacitor(c1).unwrap().charging);
        assert_eq!(sim.advance(ms(1600)), vec![c1]);
        assert!(!sim.report().capacitor(c1).unwrap().charging);
        assert_eq!(sim.next_deadline(), None);
    }

    #[test]
    fn test_rerun_replaces_deadline() {
        let mut sim = scene("C C1 0 0 60");
        let c1 = id(&sim, "C1");
        sim.run(ms(0));
        sim.run(ms(500));

        // The first run's deadline no longer fires.
        assert!(sim.advance(ms(600)).is_empty());
        assert!(sim.report().capacitor(c1).unwrap().charging);
        assert_eq!(sim.advance(ms(1100)), vec![c1]);
    }

    #[test]
    fn test_lowering_capacitance_cancels_charge() {
        let mut sim = scene("C C1 0 0 60");
        let c1 = id(&sim, "C1");
        sim.run(T0);
        sim.set_value(c1, "20").unwrap();
        assert!(!sim.run(ms(10)).capacitor(c1).unwrap().charging);
        assert_eq!(sim.next_deadline(), None);
    }

    #[test]
    fn test_stop_clears_display_only() {
        let mut sim = scene("POWER P1 0 0\nLED L1 10 0\nC C1 0 50 80\n.wire P1 L1");
        let l1 = id(&sim, "L1");
        let c1 = id(&sim, "C1");
        sim.run(T0);

        let report = sim.stop();
        assert!(!report.running);
        assert!(!report.led(l1).unwrap().active);
        assert!(!report.capacitor(c1).unwrap().charging);
        assert!(report.is_powered(l1));
        assert!(sim.powered().contains(l1));
        assert_eq!(sim.next_deadline(), None);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let mut sim = scene(
            "POWER P1 0 0\nR R1 20 0 250\nD D1 40 0\nLED L1 80 0\nLED L2 -50 0\n.wire P1 R1 D1 L1\n.wire P1 L2",
        );
        let first = sim.run(T0);
        let second = sim.run(T0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_deleted_component_is_forgotten() {
        let mut sim = scene("POWER P1 0 0\nJ J1 10 0\nLED L1 20 0\nC C1 0 0 90\n.wire P1 J1 L1");
        let j1 = id(&sim, "J1");
        let l1 = id(&sim, "L1");
        let c1 = id(&sim, "C1");
        assert!(sim.run(T0).led(l1).unwrap().active);

        let removed = sim.remove_component(j1).unwrap();
        assert_eq!(removed.len(), 2);
        sim.remove_component(c1).unwrap();
        assert_eq!(sim.next_deadline(), None);

        let report = sim.run(T0);
        assert!(!report.is_powered(j1));
        assert!(!report.led(l1).unwrap().active);
        assert!(report.capacitor(c1).is_none());
    }

    #[test]
    fn test_deletion_clears_display_before_next_run() {
        let mut sim = scene("POWER P1 0 0\nLED L1 10 0\nC C1 0 50 60\n.wire P1 L1");
        let l1 = id(&sim, "L1");
        let c1 = id(&sim, "C1");
        sim.run(T0);
        sim.click(l1).unwrap();

        sim.remove_component(c1).unwrap();
        sim.remove_component(l1).unwrap();

        let report = sim.report();
        assert!(report.led(l1).is_none());
        assert!(report.capacitor(c1).is_none());
        assert!(!report.is_powered(l1));
        assert_eq!(sim.pending_wire(), None);
        assert_eq!(sim.next_deadline(), None);
        assert!(sim.advance(ms(600)).is_empty());
    }

    #[test]
    fn test_moving_source_past_diode_blocks_current() {
        let mut sim = scene("POWER P1 0 0\nD D1 100 0\nLED L1 200 0\n.wire P1 D1 L1");
        let p1 = id(&sim, "P1");
        let l1 = id(&sim, "L1");
        assert!(sim.run(T0).led(l1).unwrap().active);

        sim.move_to(p1, Position::new(150.0, 0.0)).unwrap();
        let report = sim.run(T0);
        assert!(!report.led(l1).unwrap().active);
        assert!(!report.is_powered(id(&sim, "D1")));
    }

    #[test]
    fn test_click_gesture() {
        let mut sim = Simulator::new(Circuit::new());
        let a = sim.add_component(ComponentKind::Power, Position::default());
        let b = sim.add_component(ComponentKind::Led, Position::new(10.0, 0.0));

        assert_eq!(sim.click(a).unwrap(), None);
        assert_eq!(sim.pending_wire(), Some(a));
        assert_eq!(sim.click(a).unwrap(), None);
        assert_eq!(sim.pending_wire(), None);
        assert!(sim.circuit().wires().is_empty());

        sim.click(a).unwrap();
        let wire = sim.click(b).unwrap();
        assert!(wire.is_some());
        assert_eq!(sim.pending_wire(), None);

        sim.click(b).unwrap();
        sim.remove_component(b).unwrap();
        assert_eq!(sim.pending_wire(), None);
        assert!(sim.click(b).is_err());
    }

    #[test]
    fn test_config_from_params() {
        let mut params = HashMap::new();
        params.insert("supply".to_string(), 9.0);
        params.insert("led_threshold".to_string(), 0.02);
        let config = SimulationConfig::from_params(&params).unwrap();
        assert_eq!(config.supply_voltage, 9.0);
        assert_eq!(config.led_threshold, 0.02);

        params.insert("gain".to_string(), 1.0);
        assert!(SimulationConfig::new().with_params(&params).is_err());

        assert!(SimulationConfig::new().with_led_threshold(0.0).validate().is_err());
    }

    #[test]
    fn test_custom_supply_voltage() {
        let circuit = Circuit::from_ast(
            parse("POWER P1 0 0\nR R1 0 0 1k\nLED L1 10 0\n.wire P1 R1 L1").unwrap(),
        )
        .unwrap();
        let l1 = circuit.find("L1").unwrap();
        let mut sim = Simulator::with_config(circuit, SimulationConfig::new().with_supply_voltage(2.5));
        let report = sim.run(T0);
        assert_relative_eq!(report.current, 0.0025);
        assert_relative_eq!(report.led(l1).unwrap().brightness, 0.25);
    }

    #[test]
    fn test_report_json() {
        let mut sim = scene("POWER P1 0 0\nLED L1 10 0\nC C1 0 0 60\n.wire P1 L1");
        let json = sim.run(ms(0)).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["running"], true);
        assert_eq!(value["powered"], serde_json::json!([0, 1]));
        assert_eq!(value["capacitors"][0]["clears_at_ms"], 600.0);
        assert_eq!(value["leds"][0]["active"], true);
    }
}
