// src/readers/classifier.rs

//! Implements a [`LineClassifier`], which determines the [`EventKind`] of a
//! [`LogLine`] and extracts its typed fields into an [`Event`].
//!
//! Patterns are tried in a fixed order:
//!
//! 1. message, `[HH:MM:SS] <nick> text`
//! 2. notice, `[HH:MM:SS] -nick- text`
//! 3. action, `[HH:MM:SS] *** …`, then within the action body
//!    1. `Joins:` / `Parts:` / `Quits:` `nick (ident@host) (reason)`
//!    2. `victim was kicked by op (reason)`
//!    3. `old is now known as new`
//!    4. `nick changes topic to 'topic'`
//!    5. `nick sets mode: modes`
//!
//! Message and notice lines look alike and must be decided before falling
//! through to the action patterns.
//!
//! [`EventKind`]: crate::data::event::EventKind
//! [`LogLine`]: crate::data::line::LogLine
//! [`Event`]: crate::data::event::Event

use crate::data::datetime::{
    parse_clock,
    ClockTime,
};
use crate::data::event::{
    Event,
    EventKind,
    Identity,
};
use crate::data::line::LogLine;

use ::lazy_static::lazy_static;
use ::regex::{Captures, Regex};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// patterns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

lazy_static! {
    /// `[13:10:01] <alice> hello`
    static ref REGEX_MESSAGE: Regex = Regex::new(
        r"^\[(\d{2}:\d{2}:\d{2})\] <([^>\s]+)> ?(.*)$"
    ).unwrap();

    /// `[13:10:01] -alice- hello`
    static ref REGEX_NOTICE: Regex = Regex::new(
        r"^\[(\d{2}:\d{2}:\d{2})\] -(\S+?)-(?: (.*))?$"
    ).unwrap();

    /// `[13:10:01] *** …`
    static ref REGEX_ACTION: Regex = Regex::new(
        r"^\[(\d{2}:\d{2}:\d{2})\] \*\*\* (.*)$"
    ).unwrap();

    /// `Joins: alice (ident@host)`, `Quits: alice (ident@host) (Quit: bye)`
    static ref REGEX_JOIN_PART_QUIT: Regex = Regex::new(
        r"^(Joins|Parts|Quits): (\S+) \(([^@\s()]*)@([^\s()]*)\)(?: \((.*)\))?\s*$"
    ).unwrap();

    /// `bob was kicked by alice (reason)`
    static ref REGEX_KICK: Regex = Regex::new(
        r"^(\S+) was kicked by (\S+) \((.*)\)\s*$"
    ).unwrap();

    /// `alice is now known as alicia`
    static ref REGEX_NICK: Regex = Regex::new(
        r"^(\S+) is now known as (\S+)\s*$"
    ).unwrap();

    /// `alice changes topic to 'new topic'`
    static ref REGEX_TOPIC: Regex = Regex::new(
        r"^(\S+) changes topic to (.*)$"
    ).unwrap();

    /// `alice sets mode: +o bob`
    static ref REGEX_MODE: Regex = Regex::new(
        r"^(\S+) sets mode: (.*)$"
    ).unwrap();
}

/// Remove one leading `open` and one trailing `close`, if both are present.
fn strip_delimiters<'a>(value: &'a str, open: char, close: char) -> &'a str {
    match value
        .strip_prefix(open)
        .and_then(|v| v.strip_suffix(close))
    {
        Some(inner) => inner,
        None => value,
    }
}

/// An empty reason is no reason.
fn reason(value: Option<&str>) -> Option<String> {
    match value {
        Some(val) if !val.is_empty() => Some(val.to_string()),
        _ => None,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LineClassifier
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Classifies [`LogLine`]s into [`Event`]s.
///
/// When `extras` is `false` only [`EventKind::Message`] and
/// [`EventKind::Notice`] are produced; every other line is unclassified.
///
/// [`LogLine`]: crate::data::line::LogLine
/// [`Event`]: crate::data::event::Event
#[derive(Clone, Copy, Debug, Default)]
pub struct LineClassifier {
    extras: bool,
}

impl LineClassifier {
    pub fn new(extras: bool) -> LineClassifier {
        LineClassifier { extras }
    }

    pub fn extras(&self) -> bool {
        self.extras
    }

    /// Return the [`Event`] of `line`, or `None` if `line` is unclassified.
    ///
    /// [`Event`]: crate::data::event::Event
    pub fn classify(&self, line: &LogLine) -> Option<Event> {
        defn!("({:?})", line.text);
        let event = match classify_text(&line.text) {
            Some((time, fields)) => {
                if fields.kind.is_extra() && !self.extras {
                    defx!("{:?} is extra; extras disabled", fields.kind);
                    return None;
                }
                Event {
                    kind: fields.kind,
                    date: line.date,
                    time,
                    actor: fields.actor,
                    secondary: fields.secondary,
                    identity: fields.identity,
                    payload: fields.payload,
                }
            }
            None => {
                defx!("unclassified");
                return None;
            }
        };
        defx!("{:?}", event.kind);

        Some(event)
    }
}

/// Return only the [`EventKind`] of `text`, regardless of `extras`.
///
/// [`EventKind`]: crate::data::event::EventKind
pub fn classify_kind(text: &str) -> EventKind {
    match classify_text(text) {
        Some((_, fields)) => fields.kind,
        None => EventKind::Unclassified,
    }
}

/// The fields of an [`Event`] besides its date and time.
struct Fields {
    kind: EventKind,
    actor: String,
    secondary: Option<String>,
    identity: Option<Identity>,
    payload: Option<String>,
}

impl Fields {
    fn new(kind: EventKind, actor: &str) -> Fields {
        Fields {
            kind,
            actor: actor.to_string(),
            secondary: None,
            identity: None,
            payload: None,
        }
    }
}

/// Match `text` against the patterns, in priority order.
fn classify_text(text: &str) -> Option<(ClockTime, Fields)> {
    if let Some(captures) = REGEX_MESSAGE.captures(text) {
        let time = parse_clock(&captures[1])?;
        let mut fields = Fields::new(EventKind::Message, &captures[2]);
        fields.payload = Some(captures[3].to_string());
        return Some((time, fields));
    }
    if let Some(captures) = REGEX_NOTICE.captures(text) {
        let time = parse_clock(&captures[1])?;
        let mut fields = Fields::new(EventKind::Notice, &captures[2]);
        fields.payload = Some(
            captures
                .get(3)
                .map_or("", |m| m.as_str())
                .to_string(),
        );
        return Some((time, fields));
    }
    if let Some(captures) = REGEX_ACTION.captures(text) {
        let time = parse_clock(&captures[1])?;
        let fields = classify_action(&captures[2])?;
        return Some((time, fields));
    }

    None
}

/// Match the body of an action line, the text after `*** `.
fn classify_action(body: &str) -> Option<Fields> {
    if let Some(captures) = REGEX_JOIN_PART_QUIT.captures(body) {
        return Some(join_part_quit(&captures));
    }
    if let Some(captures) = REGEX_KICK.captures(body) {
        let mut fields = Fields::new(EventKind::Kick, &captures[2]);
        fields.secondary = Some(captures[1].to_string());
        fields.payload = Some(captures[3].to_string());
        return Some(fields);
    }
    if let Some(captures) = REGEX_NICK.captures(body) {
        let mut fields = Fields::new(EventKind::NickChange, &captures[1]);
        fields.secondary = Some(captures[2].to_string());
        return Some(fields);
    }
    if let Some(captures) = REGEX_TOPIC.captures(body) {
        let mut fields = Fields::new(EventKind::TopicChange, &captures[1]);
        fields.payload = Some(strip_delimiters(&captures[2], '\'', '\'').to_string());
        return Some(fields);
    }
    if let Some(captures) = REGEX_MODE.captures(body) {
        let mut fields = Fields::new(EventKind::ModeChange, &captures[1]);
        fields.payload = Some(captures[2].trim_end().to_string());
        return Some(fields);
    }

    None
}

fn join_part_quit(captures: &Captures) -> Fields {
    let kind = match &captures[1] {
        "Joins" => EventKind::Join,
        "Parts" => EventKind::Part,
        _ => EventKind::Quit,
    };
    let mut fields = Fields::new(kind, &captures[2]);
    fields.identity = Some(Identity::new(&captures[3], &captures[4]));
    if kind != EventKind::Join {
        fields.payload = reason(captures.get(5).map(|m| m.as_str()));
    }

    fields
}
