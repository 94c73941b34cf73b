// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Polled USART as a [`ByteLink`].
//!
//! The companion link (USART1) is driven entirely by polling. The remote-control port (USART6) only
//! receives, from its RXNE interrupt; see [`take_rx_byte`].

use stm32f7xx_hal::{
    pac,
    prelude::*,
    serial::{Instance, Pins, Rx, Serial, Tx},
};

use crate::error::Error;
use crate::protocol::ByteLink;

pub struct Usart<U: Instance> {
    tx: Tx<U>,
    rx: Rx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, rx) = serial.split();
        Self { tx, rx }
    }

    pub fn free(self) -> (Tx<U>, Rx<U>) {
        (self.tx, self.rx)
    }
}

impl<U: Instance> ByteLink for Usart<U> {
    fn read(&mut self) -> nb::Result<u8, Error> {
        self.rx.read().map_err(|e| match e {
            nb::Error::WouldBlock => nb::Error::WouldBlock,
            nb::Error::Other(_) => nb::Error::Other(Error::Link),
        })
    }

    fn write(&mut self, byte: u8) -> nb::Result<(), Error> {
        self.tx.write(byte).map_err(|e| match e {
            nb::Error::WouldBlock => nb::Error::WouldBlock,
            nb::Error::Other(_) => nb::Error::Other(Error::Link),
        })
    }
}

/// Read the pending byte of USART6 from interrupt context, if RXNE is set.
///
/// Overrun is cleared so the interrupt does not refire forever after a missed byte.
pub fn take_rx_byte() -> Option<u8> {
    // SAFETY: called only from the USART6 handler, which owns the receive side of this port.
    let usart = unsafe { &*pac::USART6::ptr() };
    let isr = usart.isr.read();
    if isr.ore().bit_is_set() {
        usart.icr.write(|w| w.orecf().set_bit());
    }
    if isr.rxne().bit_is_set() {
        Some(usart.rdr.read().rdr().bits() as u8)
    } else {
        None
    }
}
