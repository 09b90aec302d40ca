//! Breadboard - Visual Circuit Simulator
//!
//! Loads a scene file, runs the simulation once and prints the result.
//!
//! # Usage
//!
//! ```bash
//! breadboard board.bb
//! breadboard board.bb --at-ms 500 --json
//! RUST_LOG=debug breadboard board.bb --supply 9
//! ```

use std::path::PathBuf;
use std::time::Duration;

use breadboard_core::{
    circuit::{validate_circuit, Circuit},
    dsl,
    error::Result,
    SimulationConfig, SimulationReport, Simulator,
};
use clap::Parser;
use log::info;

/// Breadboard circuit simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the scene description file
    #[arg(value_name = "SCENE")]
    scene: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Advance the clock to this many milliseconds after the run
    #[arg(long, value_name = "MS")]
    at_ms: Option<u64>,

    /// Supply voltage in volts (overrides `.set supply`)
    #[arg(long, value_name = "VOLTS")]
    supply: Option<f64>,

    /// Full-brightness LED current in amperes (overrides `.set led_threshold`)
    #[arg(long, value_name = "AMPS")]
    led_threshold: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Parse the scene file
    let ast = dsl::parse_file(&args.scene)?;

    // Scene settings first, flags on top
    let mut config = SimulationConfig::from_params(&ast.settings)?;
    if let Some(volts) = args.supply {
        config = config.with_supply_voltage(volts);
    }
    if let Some(amps) = args.led_threshold {
        config = config.with_led_threshold(amps);
    }
    config.validate()?;

    // Build and validate the circuit
    let circuit = Circuit::from_ast(ast)?;
    let warnings = validate_circuit(&circuit)?;
    info!("loaded {} with {} warning(s)", args.scene.display(), warnings);

    let mut simulator = Simulator::with_config(circuit, config);
    let mut report = simulator.run(Duration::ZERO);

    if let Some(ms) = args.at_ms {
        let expired = simulator.advance(Duration::from_millis(ms));
        info!("{} capacitor(s) stopped charging by {} ms", expired.len(), ms);
        report = simulator.report();
    }

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print_report(simulator.circuit(), &report);
    }

    Ok(())
}

fn print_report(circuit: &Circuit, report: &SimulationReport) {
    println!(
        "Circuit: {} component(s), {} wire(s)",
        circuit.registry().len(),
        circuit.wires().len()
    );
    println!("Total resistance: {} ohm", report.total_resistance);
    println!("Current: {:.4} A", report.current);

    let powered: Vec<String> = report.powered.iter().map(|&id| circuit.label(id)).collect();
    if powered.is_empty() {
        println!("Powered: (none)");
    } else {
        println!("Powered: {}", powered.join(", "));
    }

    for led in &report.leds {
        if led.active {
            println!("LED {}: on (brightness {:.2})", circuit.label(led.id), led.brightness);
        } else {
            println!("LED {}: off", circuit.label(led.id));
        }
    }

    for cap in &report.capacitors {
        match cap.clears_at {
            Some(at) if cap.charging => println!(
                "Capacitor {}: {:.2} V, charging until {} ms",
                circuit.label(cap.id),
                cap.voltage,
                at.as_millis()
            ),
            _ => println!("Capacitor {}: {:.2} V, idle", circuit.label(cap.id), cap.voltage),
        }
    }
}
