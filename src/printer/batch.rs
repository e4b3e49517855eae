// src/printer/batch.rs

//! Implements a [`BatchEnvelope`], the IRCv3 `BATCH` framing of one
//! delivered history window.
//!
//! ```text
//! :irc.znc.in BATCH +sDf3kQ0pZ1aB9 chathistory #room
//! @batch=sDf3kQ0pZ1aB9;draft/msgid=…;time=… :alice!… PRIVMSG #room :hello
//! @batch=sDf3kQ0pZ1aB9;draft/msgid=…;time=… :bob!… PRIVMSG #room :hi
//! :irc.znc.in BATCH -sDf3kQ0pZ1aB9
//! ```

use crate::common::{BATCH_ID_SIZE, BATCH_TYPE, SERVER_NAME};
use crate::data::message::CanonicalMessage;
use crate::printer::printers::ResponseLine;

use ::rand::distr::Alphanumeric;
use ::rand::Rng;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::uuid::Uuid;

/// Name of the tag referencing the batch.
pub const BATCH_TAG: &str = "batch";
/// Name of the per-message unique id tag.
pub const MSGID_TAG: &str = "draft/msgid";
/// Command of the batch start and end markers.
pub const BATCH_COMMAND: &str = "BATCH";

/// A fresh random alphanumeric batch token, [`BATCH_ID_SIZE`] long.
///
/// [`BATCH_ID_SIZE`]: crate::common::BATCH_ID_SIZE
pub fn new_batch_id() -> String {
    ::rand::rng()
        .sample_iter(&Alphanumeric)
        .take(BATCH_ID_SIZE)
        .map(char::from)
        .collect()
}

/// A fresh globally unique message id.
pub fn new_msgid() -> String {
    Uuid::new_v4().to_string()
}

/// The framing of one non-empty result set.
#[derive(Clone, Debug)]
pub struct BatchEnvelope {
    id: String,
    target: String,
    /// members, already tagged with the batch id and a message id
    members: Vec<CanonicalMessage>,
}

impl BatchEnvelope {
    /// Frame `messages` for room `target`.
    ///
    /// Returns `None` for an empty `messages`; no envelope is made for
    /// nothing.
    pub fn new(messages: Vec<CanonicalMessage>, target: &str) -> Option<BatchEnvelope> {
        if messages.is_empty() {
            defñ!("no messages; return None");
            return None;
        }
        let id: String = new_batch_id();
        defn!("batch {:?} of {} messages", id, messages.len());
        let members: Vec<CanonicalMessage> = messages
            .into_iter()
            .map(|mut msg| {
                msg.prepend_tags(vec![
                    (BATCH_TAG.to_string(), id.clone()),
                    (MSGID_TAG.to_string(), new_msgid()),
                ]);
                msg
            })
            .collect();
        defx!();

        Some(BatchEnvelope {
            id,
            target: target.to_string(),
            members,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn members(&self) -> &[CanonicalMessage] {
        &self.members
    }

    /// `:irc.znc.in BATCH +<id> chathistory <target>`
    pub fn start_marker(&self) -> CanonicalMessage {
        CanonicalMessage::new(BATCH_COMMAND)
            .prefix(SERVER_NAME)
            .param(format!("+{}", self.id))
            .param(BATCH_TYPE)
            .param(self.target.as_str())
    }

    /// `:irc.znc.in BATCH -<id>`
    pub fn end_marker(&self) -> CanonicalMessage {
        CanonicalMessage::new(BATCH_COMMAND)
            .prefix(SERVER_NAME)
            .param(format!("-{}", self.id))
    }

    /// All lines in emission order; start marker, members, end marker.
    pub fn lines(&self) -> Vec<ResponseLine> {
        let mut lines: Vec<ResponseLine> = Vec::with_capacity(self.members.len() + 2);
        lines.push(ResponseLine::Marker(self.start_marker().to_string()));
        for member in self.members.iter() {
            lines.push(ResponseLine::Member(member.to_string()));
        }
        lines.push(ResponseLine::Marker(self.end_marker().to_string()));

        lines
    }
}
