// src/data/mod.rs

//! The `data` module is specialized data containers for
//! [`LogLine`]s, [`Event`]s, [`CanonicalMessage`]s, and the per-user
//! [`Settings`].
//!
//! ## Definitions of data
//!
//! ### Day file
//!
//! A "day file" is a chat log file covering one calendar day of one room.
//! The date is in the file name, e.g. `2016-11-12.log`.
//!
//! ### LogLine
//!
//! A "log line" is one line of a day file. It begins with a clock time
//! stamp, e.g. `[13:10:01]`. It is represented by a [`LogLine`].
//!
//! ### Event
//!
//! An "event" is the typed meaning of a log line; a message, a notice,
//! a join, a kick, etc. It is represented by an [`Event`] and found by the
//! [`classifier`].
//!
//! ### CanonicalMessage
//!
//! A "canonical message" is an IRC wire line replaying one event, with a
//! `server-time` tag. It is represented by a [`CanonicalMessage`] and
//! rendered by the [`formatter`].
//!
//! [`LogLine`]: crate::data::line::LogLine
//! [`Event`]: crate::data::event::Event
//! [`CanonicalMessage`]: crate::data::message::CanonicalMessage
//! [`Settings`]: crate::data::settings::Settings
//! [`classifier`]: crate::readers::classifier
//! [`formatter`]: crate::printer::formatter

pub mod datetime;
pub mod event;
pub mod line;
pub mod message;
pub mod settings;
