//! Domain entities for Socketor.
//!
//! Everything in this module is plain data plus the rules that keep it
//! consistent.  No sockets, no files, no async.
//!
//! # What lives here
//!
//! - **`config`** – How to reach a peer.  Exactly one of five connection
//!   variants, each carrying its own message-box and send-box preferences.
//! - **`message`** – A single unit of socket traffic: who produced it, what
//!   kind of content it holds, and the raw bytes.
//! - **`history`** – The capacity-bounded list of messages shown for one
//!   connection.  Oldest entries are evicted first.

pub mod config;
pub mod history;
pub mod message;
