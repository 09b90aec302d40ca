//! Circuit validation.

use log::warn;

use crate::components::ComponentKind;
use crate::error::{CircuitError, Result};

use super::Circuit;

/// Validate a circuit before a batch simulation.
///
/// An empty board is an error. Everything else a user can build is
/// simulatable, so the remaining checks only log warnings:
/// - No power source (nothing will ever be powered)
/// - Components with no wires at all
///
/// Returns the number of warnings emitted.
pub fn validate_circuit(circuit: &Circuit) -> Result<usize> {
    let registry = circuit.registry();

    if registry.is_empty() {
        return Err(CircuitError::InvalidTopology {
            message: "Circuit has no components".to_string(),
        });
    }

    let mut warnings = 0;

    if registry.of_kind(ComponentKind::Power).next().is_none() {
        warn!("circuit has no power source; nothing will be powered");
        warnings += 1;
    }

    for component in registry.iter() {
        let id = component.id();
        // Capacitors charge without wiring, so a loose one is still meaningful.
        if component.kind() != ComponentKind::Capacitor && circuit.wires().degree(id) == 0 {
            warn!("{} {} is not wired to anything", component.kind(), circuit.label(id));
            warnings += 1;
        }
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Position;

    #[test]
    fn test_empty_circuit_is_error() {
        assert!(matches!(
            validate_circuit(&Circuit::new()),
            Err(CircuitError::InvalidTopology { .. })
        ));
    }

    #[test]
    fn test_warnings_counted() {
        let mut circuit = Circuit::new();
        let led = circuit.add(ComponentKind::Led, Position::default());
        let _cap = circuit.add(ComponentKind::Capacitor, Position::default());
        // no power + unwired LED; the capacitor is exempt
        assert_eq!(validate_circuit(&circuit).unwrap(), 2);

        let p = circuit.add(ComponentKind::Power, Position::default());
        circuit.connect(p, led).unwrap();
        assert_eq!(validate_circuit(&circuit).unwrap(), 0);
    }
}
