// src/data/event.rs

//! Implement [`Event`], the typed fields of one classified log line.
//!
//! An `Event` is produced by the [`classifier`] and consumed by the
//! [`formatter`].
//!
//! [`classifier`]: crate::readers::classifier
//! [`formatter`]: crate::printer::formatter

use crate::data::datetime::{
    server_time,
    ClockTime,
    LogDate,
};

use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// EventKind
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The kind of chat activity a log line records.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum EventKind {
    /// `[13:10:01] <alice> hello`
    Message,
    /// `[13:10:01] -alice- hello`
    Notice,
    /// `[13:10:01] *** Joins: alice (ident@host)`
    Join,
    /// `[13:10:01] *** Parts: alice (ident@host) (reason)`
    Part,
    /// `[13:10:01] *** Quits: alice (ident@host) (reason)`
    Quit,
    /// `[13:10:01] *** bob was kicked by alice (reason)`
    Kick,
    /// `[13:10:01] *** alice is now known as alicia`
    NickChange,
    /// `[13:10:01] *** alice changes topic to 'new topic'`
    TopicChange,
    /// `[13:10:01] *** alice sets mode: +o bob`
    ModeChange,
    /// matched no known pattern
    #[default]
    Unclassified,
}

impl EventKind {
    /// Is this one of the "extras", i.e. not a plain message or notice?
    ///
    /// `Unclassified` is not an extra.
    pub const fn is_extra(&self) -> bool {
        !matches!(self, EventKind::Message | EventKind::Notice | EventKind::Unclassified)
    }

    /// The IRC command verb used to replay this kind.
    pub const fn command(&self) -> &'static str {
        match self {
            EventKind::Message => "PRIVMSG",
            EventKind::Notice => "NOTICE",
            EventKind::Join => "JOIN",
            EventKind::Part => "PART",
            EventKind::Quit => "QUIT",
            EventKind::Kick => "KICK",
            EventKind::NickChange => "NICK",
            EventKind::TopicChange => "TOPIC",
            EventKind::ModeChange => "MODE",
            EventKind::Unclassified => "",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Event
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The `ident@host` of a sender.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    pub ident: String,
    pub host: String,
}

impl Identity {
    pub fn new<S: Into<String>>(ident: S, host: S) -> Identity {
        Identity {
            ident: ident.into(),
            host: host.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.ident, self.host)
    }
}

/// The typed fields of one classified log line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    /// date of the day file
    pub date: LogDate,
    /// clock time of the line
    pub time: ClockTime,
    /// the nick that caused the event; for a `Kick` the kicking operator,
    /// for a `NickChange` the old nick
    pub actor: String,
    /// for a `Kick` the kicked nick, for a `NickChange` the new nick
    pub secondary: Option<String>,
    /// only `Join`, `Part`, `Quit` record the sender `ident@host`
    pub identity: Option<Identity>,
    /// message text, part or quit or kick reason, topic, or mode string
    pub payload: Option<String>,
}

impl Event {
    /// The `server-time` tag value of this event.
    pub fn server_time(&self) -> String {
        server_time(&self.date, &self.time)
    }
}
