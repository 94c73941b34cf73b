// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Merge-gap detection on the side sensor facing the passed car.
//!
//! Pure state machine: the caller samples, feeds `clear` (reading above the gap threshold), and
//! performs the confirmation hold when told to. A single clear reading is never accepted on its
//! own; it has to survive the hold.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GapState {
    /// The passed car hasn't shown up on the side sensor yet.
    AwaitAlongside,
    /// The passed car is beside us.
    Alongside,
    /// One clear reading seen; the next one decides.
    Confirming,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GapEvent {
    /// Keep sampling.
    Sample,
    /// Hold for the confirmation interval, then sample again.
    Hold,
    Confirmed,
}

#[derive(Copy, Clone, Debug)]
pub struct GapDetector {
    state: GapState,
    samples: u32,
}

impl GapDetector {
    pub fn new(requires_alongside: bool) -> Self {
        Self {
            state: if requires_alongside {
                GapState::AwaitAlongside
            } else {
                GapState::Alongside
            },
            samples: 0,
        }
    }

    pub fn feed(&mut self, clear: bool) -> GapEvent {
        self.samples += 1;
        let (next, event) = match (self.state, clear) {
            (GapState::AwaitAlongside, true) => (GapState::AwaitAlongside, GapEvent::Sample),
            (GapState::AwaitAlongside, false) => (GapState::Alongside, GapEvent::Sample),
            (GapState::Alongside, true) => (GapState::Confirming, GapEvent::Hold),
            (GapState::Alongside, false) => (GapState::Alongside, GapEvent::Sample),
            (GapState::Confirming, true) => (GapState::Confirming, GapEvent::Confirmed),
            (GapState::Confirming, false) => (GapState::Alongside, GapEvent::Sample),
        };
        self.state = next;
        event
    }

    #[inline]
    pub fn state(&self) -> GapState {
        self.state
    }

    /// Samples fed so far.
    #[inline]
    pub fn samples(&self) -> u32 {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(readings: &[f32], threshold: f32, requires_alongside: bool) -> Vec<GapEvent> {
        let mut gap = GapDetector::new(requires_alongside);
        readings.iter().map(|&cm| gap.feed(cm > threshold)).collect()
    }

    #[test]
    fn transient_spike_is_rejected() {
        use GapEvent::*;
        let events = run(&[40.0, 40.0, 60.0, 30.0, 60.0, 60.0], 50.0, true);
        assert_eq!(events, vec![Sample, Sample, Hold, Sample, Hold, Confirmed]);
        assert_eq!(events.iter().position(|e| *e == Confirmed), Some(5));
    }

    #[test]
    fn waits_for_car_alongside_first() {
        use GapEvent::*;
        let events = run(&[80.0, 80.0, 45.0, 70.0, 70.0], 50.0, true);
        assert_eq!(events, vec![Sample, Sample, Sample, Hold, Confirmed]);
    }

    #[test]
    fn without_alongside_requirement_clear_road_confirms_at_once() {
        use GapEvent::*;
        let events = run(&[80.0, 80.0], 50.0, false);
        assert_eq!(events, vec![Hold, Confirmed]);
    }

    #[test]
    fn threshold_reading_counts_as_alongside() {
        let mut gap = GapDetector::new(true);
        gap.feed(false);
        assert_eq!(gap.state(), GapState::Alongside);
        assert_eq!(gap.feed(50.0 > 50.0), GapEvent::Sample);
        assert_eq!(gap.samples(), 2);
    }
}
