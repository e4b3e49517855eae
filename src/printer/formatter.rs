// src/printer/formatter.rs

//! Implements an [`EventFormatter`], which renders an [`Event`] as the
//! [`CanonicalMessage`] that replays it.
//!
//! | kind          | wire line                                         |
//! |---------------|---------------------------------------------------|
//! | `Message`     | `@time=… :nick!ident@host PRIVMSG #room :text`    |
//! | `Notice`      | `@time=… :nick!ident@host NOTICE #room :text`     |
//! | `Join`        | `@time=… :nick!ident@host JOIN :#room`            |
//! | `Part`        | `@time=… :nick!ident@host PART #room :reason`     |
//! | `Quit`        | `@time=… :nick!ident@host QUIT #room :reason`     |
//! | `Kick`        | `@time=… :op!ident@host KICK #room victim :reason`|
//! | `NickChange`  | `@time=… :old!ident@host NICK :new`               |
//! | `TopicChange` | `@time=… :nick!ident@host TOPIC #room :topic`     |
//! | `ModeChange`  | `@time=… :nick!ident@host MODE #room modes`       |
//!
//! Logs only record `ident@host` for joins, parts, and quits. Every other
//! sender gets the placeholder identity.
//!
//! [`Event`]: crate::data::event::Event
//! [`CanonicalMessage`]: crate::data::message::CanonicalMessage

use crate::common::{DEFAULT_HOST, DEFAULT_IDENT};
use crate::data::datetime::SERVER_TIME_TAG;
use crate::data::event::{
    Event,
    EventKind,
    Identity,
};
use crate::data::message::CanonicalMessage;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Renders [`Event`]s as [`CanonicalMessage`]s.
///
/// [`Event`]: crate::data::event::Event
/// [`CanonicalMessage`]: crate::data::message::CanonicalMessage
#[derive(Clone, Debug)]
pub struct EventFormatter {
    /// `ident@host` for senders the log has no identity for
    placeholder: Identity,
}

impl Default for EventFormatter {
    fn default() -> Self {
        EventFormatter::new(Identity::new(DEFAULT_IDENT, DEFAULT_HOST))
    }
}

impl EventFormatter {
    pub fn new(placeholder: Identity) -> EventFormatter {
        EventFormatter { placeholder }
    }

    fn prefix(&self, nick: &str, identity: Option<&Identity>) -> String {
        let identity: &Identity = identity.unwrap_or(&self.placeholder);

        format!("{}!{}", nick, identity)
    }

    /// Render `event` as it happened in room `target`.
    ///
    /// An `Unclassified` event renders as `None`.
    pub fn format(&self, event: &Event, target: &str) -> Option<CanonicalMessage> {
        defñ!("({:?}, {:?})", event.kind, target);
        let payload: &str = event.payload.as_deref().unwrap_or_default();
        let secondary: &str = event.secondary.as_deref().unwrap_or_default();
        let msg = CanonicalMessage::new(event.kind.command())
            .tag(SERVER_TIME_TAG, event.server_time())
            .prefix(self.prefix(&event.actor, event.identity.as_ref()));

        let msg = match event.kind {
            EventKind::Message | EventKind::Notice | EventKind::TopicChange => {
                msg.param(target).trailing(payload)
            }
            EventKind::Join => msg.trailing(target),
            EventKind::Part | EventKind::Quit => {
                let msg = msg.param(target);
                match event.payload.as_deref() {
                    Some(reason) => msg.trailing(reason),
                    None => msg,
                }
            }
            EventKind::Kick => msg
                .param(target)
                .param(secondary)
                .trailing(payload),
            EventKind::NickChange => msg.trailing(secondary),
            EventKind::ModeChange => msg.param(target).param(payload),
            EventKind::Unclassified => return None,
        };

        Some(msg)
    }
}
