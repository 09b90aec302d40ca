//! Capacitor charge reversion schedule.
//!
//! Each charging capacitor has at most one pending deadline. Scheduling
//! again replaces the previous deadline (last write wins), so overlapping
//! runs never leave two timers racing on the same flag.

use std::collections::HashMap;
use std::time::Duration;

use log::debug;

use crate::circuit::ComponentId;

/// Pending "stop charging" deadlines keyed by capacitor id.
///
/// Times are offsets from the start of the session, supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct ChargeSchedule {
    deadlines: HashMap<ComponentId, Duration>,
}

impl ChargeSchedule {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule (or reschedule) the reversion for a capacitor.
    ///
    /// Returns the deadline that was replaced, if any.
    pub fn schedule(&mut self, id: ComponentId, deadline: Duration) -> Option<Duration> {
        let replaced = self.deadlines.insert(id, deadline);
        if let Some(old) = replaced {
            debug!("{}: reversion moved from {:?} to {:?}", id, old, deadline);
        }
        replaced
    }

    /// Cancel a pending reversion.
    pub fn cancel(&mut self, id: ComponentId) -> Option<Duration> {
        self.deadlines.remove(&id)
    }

    /// Drop every pending reversion.
    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    /// Keep only the entries whose id satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(ComponentId) -> bool) {
        self.deadlines.retain(|id, _| keep(*id));
    }

    /// Remove and return every capacitor whose deadline is at or before `now`,
    /// ordered by deadline then id.
    pub fn expire(&mut self, now: Duration) -> Vec<ComponentId> {
        let mut due: Vec<(Duration, ComponentId)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort();

        for (_, id) in &due {
            self.deadlines.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// The pending deadline for a capacitor.
    pub fn deadline(&self, id: ComponentId) -> Option<Duration> {
        self.deadlines.get(&id).copied()
    }

    /// The earliest pending deadline, useful for arming a single host timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.deadlines.values().min().copied()
    }

    /// Number of pending reversions.
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_last_write_wins() {
        let mut s = ChargeSchedule::new();
        let id = ComponentId(4);
        assert_eq!(s.schedule(id, ms(600)), None);
        assert_eq!(s.schedule(id, ms(900)), Some(ms(600)));
        assert_eq!(s.len(), 1);

        assert!(s.expire(ms(600)).is_empty());
        assert_eq!(s.expire(ms(900)), vec![id]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_expire_order_and_next_deadline() {
        let mut s = ChargeSchedule::new();
        s.schedule(ComponentId(1), ms(300));
        s.schedule(ComponentId(2), ms(100));
        s.schedule(ComponentId(3), ms(100));
        s.schedule(ComponentId(4), ms(500));
        assert_eq!(s.next_deadline(), Some(ms(100)));

        assert_eq!(
            s.expire(ms(300)),
            vec![ComponentId(2), ComponentId(3), ComponentId(1)]
        );
        assert_eq!(s.next_deadline(), Some(ms(500)));
    }

    #[test]
    fn test_cancel_and_retain() {
        let mut s = ChargeSchedule::new();
        s.schedule(ComponentId(1), ms(10));
        s.schedule(ComponentId(2), ms(10));
        assert_eq!(s.cancel(ComponentId(1)), Some(ms(10)));
        s.retain(|id| id != ComponentId(2));
        assert!(s.is_empty());
        assert_eq!(s.deadline(ComponentId(2)), None);
    }
}
