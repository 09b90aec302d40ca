//! Gating rules: may current enter a component?

use crate::components::Component;

/// Whether current flowing out of `from` may enter `to`.
///
/// - Diode: depends on the x positions of the two components and the
///   diode's orientation (see [`Diode::conducts_from`](crate::components::Diode::conducts_from)).
/// - Switch: only when active.
/// - Everything else: always.
///
/// The rule is asymmetric and must be asked separately for each direction
/// a wire is crossed.
pub fn can_pass_current(from: &Component, to: &Component) -> bool {
    match to {
        Component::Diode(d) => d.conducts_from(from.position()),
        Component::Switch(s) => s.active,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ComponentId, Position};
    use crate::components::{ComponentKind, Diode, DiodeDirection, Switch};

    fn at(kind: ComponentKind, x: f64) -> Component {
        Component::with_defaults(ComponentId(0), kind, Position::new(x, 0.0))
    }

    #[test]
    fn test_diode_gate_is_asymmetric() {
        let power = at(ComponentKind::Power, 0.0);
        let diode = at(ComponentKind::Diode, 100.0);
        assert!(can_pass_current(&power, &diode));

        let reversed = Component::Diode(Diode {
            direction: DiodeDirection::Reverse,
            ..Diode::new(ComponentId(1), Position::new(100.0, 0.0))
        });
        assert!(!can_pass_current(&power, &reversed));

        // Leaving a diode is never gated by the diode itself.
        assert!(can_pass_current(&reversed, &power));
    }

    #[test]
    fn test_switch_gate() {
        let led = at(ComponentKind::Led, 0.0);
        let mut switch = Switch::new(ComponentId(2), Position::default());
        assert!(!can_pass_current(&led, &Component::Switch(switch.clone())));
        switch.set_state(true);
        assert!(can_pass_current(&led, &Component::Switch(switch)));
    }

    #[test]
    fn test_other_kinds_are_transparent() {
        let from = at(ComponentKind::Switch, 500.0);
        for kind in [
            ComponentKind::Power,
            ComponentKind::Resistor,
            ComponentKind::Capacitor,
            ComponentKind::Led,
            ComponentKind::Junction,
        ] {
            assert!(can_pass_current(&from, &at(kind, 0.0)), "{kind} should pass");
        }
    }
}
