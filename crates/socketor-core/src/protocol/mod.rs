//! Boundary types exchanged with the transport layer.
//!
//! - `envelope` – Backend message lines and their translation into
//!   display-ready [`MessageItem`](envelope::MessageItem)s, plus the
//!   [`ActionResult`](envelope::ActionResult) session outcome record.
//! - `payload`  – Encoding send-box input into bytes and rendering received
//!   bytes for display.

pub mod envelope;
pub mod payload;
