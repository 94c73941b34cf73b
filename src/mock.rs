// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side stand-ins for the board, used by the unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::{
    delay::DelayNs,
    digital::{self, InputPin, OutputPin},
    pwm::{self, SetDutyCycle},
};

use crate::drivers::l298n::{MotorBridge, PinPattern};
use crate::error::{Error, Result};
use crate::protocol::link::ByteLink;
use crate::sensors::{Channel, DistanceSample, RangeFinder};

#[derive(Clone, Debug, PartialEq)]
pub enum HwEvent {
    Pin(&'static str, bool),
    Duty(&'static str, u16),
    BridgeDuty(u16, u16),
    BridgePins(PinPattern),
}

/// Shared, ordered record of hardware writes.
#[derive(Clone, Default)]
pub struct HwLog(Rc<RefCell<Vec<HwEvent>>>);

impl HwLog {
    pub fn push(&self, e: HwEvent) {
        self.0.borrow_mut().push(e);
    }

    pub fn events(&self) -> Vec<HwEvent> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn count(&self, f: impl Fn(&HwEvent) -> bool) -> usize {
        self.0.borrow().iter().filter(|e| f(e)).count()
    }

    /// Levels written to the pin called `name`, in order.
    pub fn pin_levels(&self, name: &str) -> Vec<bool> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                HwEvent::Pin(n, level) if *n == name => Some(*level),
                _ => None,
            })
            .collect()
    }

    /// Direction commands reaching the bridge, decoded back from their pin patterns.
    pub fn bridge_patterns(&self) -> Vec<PinPattern> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                HwEvent::BridgePins(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

pub struct MockPin {
    name: &'static str,
    log: HwLog,
}

impl MockPin {
    pub fn new(name: &'static str, log: &HwLog) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

impl digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> core::result::Result<(), Infallible> {
        self.log.push(HwEvent::Pin(self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Infallible> {
        self.log.push(HwEvent::Pin(self.name, true));
        Ok(())
    }
}

pub struct MockPwm {
    name: &'static str,
    max: u16,
    log: HwLog,
}

impl MockPwm {
    pub fn new(name: &'static str, max: u16, log: &HwLog) -> Self {
        Self {
            name,
            max,
            log: log.clone(),
        }
    }
}

impl pwm::ErrorType for MockPwm {
    type Error = Infallible;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> core::result::Result<(), Infallible> {
        self.log.push(HwEvent::Duty(self.name, duty));
        Ok(())
    }
}

/// Bridge that records whole commands instead of individual pins.
pub struct MockBridge {
    log: HwLog,
}

impl MockBridge {
    pub fn new(log: &HwLog) -> Self {
        Self { log: log.clone() }
    }
}

impl MotorBridge for MockBridge {
    fn set_duty(&mut self, a: u16, b: u16) -> Result<()> {
        self.log.push(HwEvent::BridgeDuty(a, b));
        Ok(())
    }

    fn set_pins(&mut self, pattern: PinPattern) -> Result<()> {
        self.log.push(HwEvent::BridgePins(pattern));
        Ok(())
    }
}

/// Echo line that reads low `lead` times, then high `high` times, then low forever.
pub struct EchoPin {
    lead: u32,
    high: u32,
    reads: u32,
}

impl EchoPin {
    pub fn new(lead: u32, high: u32) -> Self {
        Self {
            lead,
            high,
            reads: 0,
        }
    }

    /// An echo that never rises.
    pub fn never() -> Self {
        Self::new(u32::MAX, 0)
    }
}

impl digital::ErrorType for EchoPin {
    type Error = Infallible;
}

impl InputPin for EchoPin {
    fn is_high(&mut self) -> core::result::Result<bool, Infallible> {
        let i = self.reads;
        self.reads = self.reads.saturating_add(1);
        Ok(i >= self.lead && i - self.lead < self.high)
    }

    fn is_low(&mut self) -> core::result::Result<bool, Infallible> {
        self.is_high().map(|h| !h)
    }
}

/// Delay that only keeps time, with an optional one-shot alarm.
#[derive(Default)]
pub struct MockDelay<'a> {
    calls_us: Vec<u32>,
    elapsed_ns: u64,
    alarm: Option<(u64, Box<dyn FnMut() + 'a>)>,
}

impl<'a> MockDelay<'a> {
    /// Run `f` once simulated time reaches `at_us`.
    pub fn with_alarm(mut self, at_us: u64, f: impl FnMut() + 'a) -> Self {
        self.alarm = Some((at_us * 1_000, Box::new(f)));
        self
    }

    pub fn calls_us(&self) -> &[u32] {
        &self.calls_us
    }

    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_ns / 1_000
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }

    fn advance(&mut self, ns: u64) {
        self.elapsed_ns += ns;
        if let Some((at, _)) = &self.alarm {
            if self.elapsed_ns >= *at {
                if let Some((_, mut f)) = self.alarm.take() {
                    f();
                }
            }
        }
    }
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.calls_us.push(ns / 1_000);
        self.advance(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.calls_us.push(us);
        self.advance(us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls_us.push(ms.saturating_mul(1_000));
        self.advance(ms as u64 * 1_000_000);
    }
}

/// Serial peer that replays a fixed script.
#[derive(Default)]
pub struct ScriptedLink {
    rx: VecDeque<u8>,
    late: Option<(u32, u8)>,
    error: Option<Error>,
    tx: Vec<u8>,
}

impl ScriptedLink {
    pub fn new(rx: &[u8]) -> Self {
        Self {
            rx: rx.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Deliver `byte` only after `polls` empty reads.
    pub fn with_late(mut self, polls: u32, byte: u8) -> Self {
        self.late = Some((polls, byte));
        self
    }

    /// Report `e` on the next read, once.
    pub fn with_error(mut self, e: Error) -> Self {
        self.error = Some(e);
        self
    }

    pub fn queue(&mut self, rx: &[u8]) {
        self.rx.extend(rx.iter().copied());
    }

    pub fn sent(&self) -> &[u8] {
        &self.tx
    }

    pub fn clear_sent(&mut self) {
        self.tx.clear();
    }
}

impl ByteLink for ScriptedLink {
    fn read(&mut self) -> nb::Result<u8, Error> {
        if let Some(e) = self.error.take() {
            return Err(nb::Error::Other(e));
        }
        if let Some(b) = self.rx.pop_front() {
            return Ok(b);
        }
        match self.late {
            Some((0, b)) => {
                self.late = None;
                Ok(b)
            }
            Some((n, b)) => {
                self.late = Some((n - 1, b));
                Err(nb::Error::WouldBlock)
            }
            None => Err(nb::Error::WouldBlock),
        }
    }

    fn write(&mut self, byte: u8) -> nb::Result<(), Error> {
        self.tx.push(byte);
        Ok(())
    }
}

/// Range finder fed from per-channel scripts. The last value of a script repeats forever.
#[derive(Default)]
pub struct ScriptedRanger {
    scripts: HashMap<Channel, VecDeque<Result<DistanceSample>>>,
    last: HashMap<Channel, Result<DistanceSample>>,
    calls: Vec<Channel>,
}

impl ScriptedRanger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, channel: Channel, cms: &[f32]) -> Self {
        let q = self.scripts.entry(channel).or_default();
        q.extend(cms.iter().map(|&cm| Ok(DistanceSample::new(channel, cm))));
        self
    }

    pub fn with_result(mut self, channel: Channel, r: Result<DistanceSample>) -> Self {
        self.scripts.entry(channel).or_default().push_back(r);
        self
    }

    /// Channels measured so far, in order.
    pub fn calls(&self) -> &[Channel] {
        &self.calls
    }

    pub fn count(&self, channel: Channel) -> usize {
        self.calls.iter().filter(|&&c| c == channel).count()
    }
}

impl RangeFinder for ScriptedRanger {
    fn measure<D: DelayNs>(&mut self, channel: Channel, _delay: &mut D) -> Result<DistanceSample> {
        self.calls.push(channel);
        if let Some(r) = self.scripts.get_mut(&channel).and_then(|q| q.pop_front()) {
            self.last.insert(channel, r);
            return r;
        }
        // Unscripted channels read as far away.
        self.last
            .get(&channel)
            .copied()
            .unwrap_or(Ok(DistanceSample::new(channel, 400.0)))
    }
}
