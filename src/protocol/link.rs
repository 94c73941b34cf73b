// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Byte-level serial seam.
//!
//! Implementors only provide non-blocking single-byte `read`/`write`. Blocking helpers are layered
//! on top; the receive side is always bounded.

use embedded_hal::delay::DelayNs;

use crate::config::LinkConfig;
use crate::error::{Error, Result};

pub trait ByteLink {
    /// Take one received byte, or `WouldBlock` if none is pending.
    fn read(&mut self) -> nb::Result<u8, Error>;

    /// Queue one byte for transmission, or `WouldBlock` if the transmitter is busy.
    fn write(&mut self, byte: u8) -> nb::Result<(), Error>;

    /// Block until `byte` is queued.
    fn send(&mut self, byte: u8) -> Result<()> {
        nb::block!(self.write(byte))
    }

    /// Poll for one byte, giving up after `receive_timeout_polls` empty polls.
    fn receive<D: DelayNs>(&mut self, delay: &mut D, cfg: &LinkConfig) -> Result<u8> {
        let mut empty = 0;
        loop {
            match self.read() {
                Ok(byte) => return Ok(byte),
                Err(nb::Error::Other(e)) => return Err(e),
                Err(nb::Error::WouldBlock) => {
                    empty += 1;
                    if empty >= cfg.receive_timeout_polls {
                        return Err(Error::Timeout);
                    }
                    delay.delay_us(cfg.receive_poll_us);
                }
            }
        }
    }

    /// Take a pending byte if there is one.
    fn try_receive(&mut self) -> Result<Option<u8>> {
        match self.read() {
            Ok(byte) => Ok(Some(byte)),
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(e)) => Err(e),
        }
    }
}
