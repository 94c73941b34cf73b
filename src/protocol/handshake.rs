// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Request/acknowledge exchange with the vision co-processor.
//!
//! One call is one session and one attempt:
//!
//! ```text
//!   peer  'D'        ->            (else we answer 'H', PeerNotReady)
//!         <-  'A'
//!         <-  request code ('C' vision, 'R' telemetry)
//!   peer  'S'        ->            (else we answer the kind's NAK, UnexpectedAck)
//!         <-  'S'
//!   peer  payload    ->
//!         <-  ack / reject         (reject means InvalidPayload)
//! ```
//!
//! A receive that times out after the peer has started talking (start byte or payload) is answered
//! with the same negative acknowledgment as a bad byte so the peer can resynchronise.

use embedded_hal::delay::DelayNs;

use crate::config::LinkConfig;
use crate::error::{Error, Result};

use super::link::ByteLink;
use super::messages::{RequestKind, VisionVerdict, PEER_READY, READY_ACK, READY_NAK, START};
use super::telemetry::TelemetryRecord;

/// Progress of the most recent session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    #[default]
    Idle,
    /// Waiting for the peer's ready byte.
    AwaitPeerReady,
    /// Request code sent; waiting for the start byte.
    RequestSent,
    /// Start echoed; waiting for the payload to acknowledge.
    AwaitAck,
    Completed,
    Aborted,
}

pub struct LinkHandshake<L> {
    link: L,
    cfg: LinkConfig,
    session: SessionState,
}

impl<L: ByteLink> LinkHandshake<L> {
    pub fn new(link: L, cfg: LinkConfig) -> Self {
        Self {
            link,
            cfg,
            session: SessionState::Idle,
        }
    }

    #[inline]
    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn free(self) -> L {
        self.link
    }

    /// Run one session for `kind` and return the validated payload byte.
    pub fn request<D: DelayNs>(&mut self, kind: RequestKind, delay: &mut D) -> Result<u8> {
        let res = self.exchange(kind, delay);
        match res {
            Ok(payload) => {
                self.session = SessionState::Completed;
                log_debug!("handshake: {:?} -> {}", kind, payload);
            }
            Err(e) => {
                log_warn!(
                    "handshake: {:?} aborted in {:?}: {:?}",
                    kind,
                    self.session,
                    e
                );
                self.session = SessionState::Aborted;
            }
        }
        res
    }

    pub fn request_vision<D: DelayNs>(&mut self, delay: &mut D) -> Result<VisionVerdict> {
        let byte = self.request(RequestKind::Vision, delay)?;
        VisionVerdict::from_byte(byte).ok_or(Error::InvalidPayload)
    }

    pub fn request_telemetry<D: DelayNs>(&mut self, delay: &mut D) -> Result<TelemetryRecord> {
        let byte = self.request(RequestKind::Telemetry, delay)?;
        TelemetryRecord::decode(byte)
    }

    fn exchange<D: DelayNs>(&mut self, kind: RequestKind, delay: &mut D) -> Result<u8> {
        self.session = SessionState::AwaitPeerReady;
        let ready = self.link.receive(delay, &self.cfg)?;
        if ready != PEER_READY {
            self.link.send(READY_NAK)?;
            return Err(Error::PeerNotReady);
        }
        self.link.send(READY_ACK)?;

        self.link.send(kind.code())?;
        self.session = SessionState::RequestSent;

        let ack = self.receive_or_nak(kind.start_nak(), delay)?;
        if ack != START {
            self.link.send(kind.start_nak())?;
            return Err(Error::UnexpectedAck);
        }
        self.link.send(START)?;
        self.session = SessionState::AwaitAck;

        let payload = self.receive_or_nak(kind.reject(), delay)?;
        if !kind.accepts(payload) {
            self.link.send(kind.reject())?;
            return Err(Error::InvalidPayload);
        }
        self.link.send(kind.ack())?;

        Ok(payload)
    }

    fn receive_or_nak<D: DelayNs>(&mut self, nak: u8, delay: &mut D) -> Result<u8> {
        match self.link.receive(delay, &self.cfg) {
            Ok(byte) => Ok(byte),
            Err(e) => {
                // Best effort; the receive error is what gets reported.
                let _ = self.link.send(nak);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDelay, ScriptedLink};

    fn handshake(rx: &[u8]) -> LinkHandshake<ScriptedLink> {
        LinkHandshake::new(
            ScriptedLink::new(rx),
            LinkConfig::default().with_receive_timeout_polls(10),
        )
    }

    #[test]
    fn vision_happy_path() {
        let mut hs = handshake(b"DSV");
        let mut delay = MockDelay::default();

        assert_eq!(hs.request_vision(&mut delay), Ok(VisionVerdict::Vehicle));
        assert_eq!(hs.link_mut().sent(), b"ACSF");
        assert_eq!(hs.session(), SessionState::Completed);
    }

    #[test]
    fn telemetry_happy_path() {
        let mut hs = handshake(&[b'D', b'S', 113]);
        let mut delay = MockDelay::default();

        let rec = hs.request_telemetry(&mut delay).unwrap();
        assert!(rec.object_detected());
        assert_eq!(rec.speed(), 3);
        assert_eq!(hs.link_mut().sent(), b"ARSK");
    }

    #[test]
    fn peer_not_ready_gets_h() {
        let mut hs = handshake(b"X");
        let mut delay = MockDelay::default();

        assert_eq!(
            hs.request(RequestKind::Vision, &mut delay),
            Err(Error::PeerNotReady)
        );
        assert_eq!(hs.link_mut().sent(), b"H");
        assert_eq!(hs.session(), SessionState::Aborted);
    }

    #[test]
    fn missing_start_gets_kind_specific_nak() {
        let mut hs = handshake(b"DX");
        let mut delay = MockDelay::default();
        assert_eq!(
            hs.request(RequestKind::Vision, &mut delay),
            Err(Error::UnexpectedAck)
        );
        assert_eq!(hs.link_mut().sent(), b"AC<");

        let mut hs = handshake(b"DX");
        assert_eq!(
            hs.request(RequestKind::Telemetry, &mut delay),
            Err(Error::UnexpectedAck)
        );
        assert_eq!(hs.link_mut().sent(), b"AR)");
    }

    #[test]
    fn invalid_payloads_are_rejected_and_discarded() {
        let mut hs = handshake(b"DSZ");
        let mut delay = MockDelay::default();
        assert_eq!(
            hs.request(RequestKind::Vision, &mut delay),
            Err(Error::InvalidPayload)
        );
        assert_eq!(hs.link_mut().sent(), b"ACSG");

        let mut hs = handshake(&[b'D', b'S', 121]);
        assert_eq!(hs.request_telemetry(&mut delay), Err(Error::InvalidPayload));
        assert_eq!(hs.link_mut().sent(), b"ARSL");
    }

    #[test]
    fn silent_peer_times_out() {
        let mut hs = handshake(b"");
        let mut delay = MockDelay::default();
        assert_eq!(
            hs.request(RequestKind::Vision, &mut delay),
            Err(Error::Timeout)
        );
        assert!(hs.link_mut().sent().is_empty());
    }

    #[test]
    fn timeout_after_start_still_naks() {
        let mut hs = handshake(b"D");
        let mut delay = MockDelay::default();
        assert_eq!(
            hs.request(RequestKind::Telemetry, &mut delay),
            Err(Error::Timeout)
        );
        assert_eq!(hs.link_mut().sent(), b"AR)");

        let mut hs = handshake(b"DS");
        assert_eq!(
            hs.request(RequestKind::Vision, &mut delay),
            Err(Error::Timeout)
        );
        assert_eq!(hs.link_mut().sent(), b"ACSG");
    }

    #[test]
    fn sessions_are_independent() {
        let mut hs = handshake(b"XDSO");
        let mut delay = MockDelay::default();

        assert!(hs.request_vision(&mut delay).is_err());
        assert_eq!(hs.request_vision(&mut delay), Ok(VisionVerdict::Obstacle));
    }
}
