// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial protocols.
//!
//! - [`messages`] – Byte vocabulary of the companion link
//! - [`telemetry`] – Decimal-packed companion status record
//! - [`link`] – Non-blocking byte seam with bounded receive
//! - [`handshake`] – One-shot request/acknowledge session
//! - [`remote`] – Remote-control tokens and the interrupt mailbox

pub mod handshake;
pub mod link;
pub mod messages;
pub mod remote;
pub mod telemetry;

pub use handshake::{LinkHandshake, SessionState};
pub use link::ByteLink;
pub use messages::{RequestKind, VisionVerdict};
pub use remote::{CommandMailbox, RemoteCommand};
pub use telemetry::TelemetryRecord;
