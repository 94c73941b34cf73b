// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! When to stop for an obstacle the camera says is not a car.

/// Tolerates `grace` confirmations of a non-vehicle obstacle and stops on the next one.
///
/// Seeing a vehicle, or stopping, starts the count over.
#[derive(Copy, Clone, Debug)]
pub struct StopPolicy {
    grace: u8,
    pending: u8,
}

impl StopPolicy {
    pub fn new(grace: u8) -> Self {
        Self { grace, pending: 0 }
    }

    pub fn vehicle_seen(&mut self) {
        self.pending = 0;
    }

    /// Returns `true` when the car has to stop now.
    pub fn obstacle_seen(&mut self) -> bool {
        if self.pending >= self.grace {
            self.pending = 0;
            true
        } else {
            self.pending += 1;
            false
        }
    }

    #[inline]
    pub fn pending(&self) -> u8 {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_after_grace() {
        let mut p = StopPolicy::new(2);
        assert!(!p.obstacle_seen());
        assert!(!p.obstacle_seen());
        assert!(p.obstacle_seen());
        assert_eq!(p.pending(), 0);
    }

    #[test]
    fn vehicle_resets_count() {
        let mut p = StopPolicy::new(2);
        p.obstacle_seen();
        p.obstacle_seen();
        p.vehicle_seen();
        assert!(!p.obstacle_seen());
    }

    #[test]
    fn zero_grace_stops_immediately() {
        let mut p = StopPolicy::new(0);
        assert!(p.obstacle_seen());
        assert!(p.obstacle_seen());
    }
}
