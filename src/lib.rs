// src/lib.rs

//! _Super Speedy Chathistory_ library, _chrlib_.
//!
//! Replays per-day chat room log files as IRCv3 `chathistory` batches.
//!
//! A query such as
//!
//! ```text
//! CHATHISTORY #rust 2016-11-12T13:10:05.000Z -50
//! ```
//!
//! is answered by a [`QueryEngine`] with the up to 50 messages logged in
//! room `#rust` before the anchor, framed in one `BATCH`.
//!
//! [`QueryEngine`]: crate::readers::queryengine::QueryEngine

pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
