// src/data/message.rs

//! Implement [`CanonicalMessage`], a fully rendered IRC wire line.
//!
//! A wire line is
//!
//! ```text
//! @tag1=value1;tag2=value2 :nick!ident@host COMMAND param1 param2 :trailing
//! ```
//!
//! Tags are optional, the prefix is optional, the trailing parameter is
//! optional.

use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CanonicalMessage
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One IRCv3 message tag, `name=value`.
pub type Tag = (String, String);
pub type Tags = Vec<Tag>;

/// A rendered IRC wire line.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CanonicalMessage {
    /// message tags, rendered in this order
    pub tags: Tags,
    /// sender prefix without the leading `:`, e.g. `alice!ident@host`
    pub prefix: Option<String>,
    /// command verb, e.g. `PRIVMSG`
    pub command: String,
    /// middle parameters, e.g. the target room
    pub params: Vec<String>,
    /// the trailing parameter, rendered after ` :`
    pub trailing: Option<String>,
}

impl CanonicalMessage {
    pub fn new<S: Into<String>>(command: S) -> CanonicalMessage {
        CanonicalMessage {
            command: command.into(),
            ..Default::default()
        }
    }

    /// Append tag `name=value`.
    pub fn tag<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> CanonicalMessage {
        self.tags.push((name.into(), value.into()));
        self
    }

    pub fn prefix<S: Into<String>>(mut self, prefix: S) -> CanonicalMessage {
        self.prefix = Some(prefix.into());
        self
    }

    /// Append a middle parameter.
    pub fn param<S: Into<String>>(mut self, param: S) -> CanonicalMessage {
        self.params.push(param.into());
        self
    }

    pub fn trailing<S: Into<String>>(mut self, trailing: S) -> CanonicalMessage {
        self.trailing = Some(trailing.into());
        self
    }

    /// Insert `tags` before the existing tags.
    pub fn prepend_tags(&mut self, tags: Tags) {
        let mut tags = tags;
        tags.append(&mut self.tags);
        self.tags = tags;
    }

    /// Return the value of tag `name`, if present.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parse a wire line previously rendered by `CanonicalMessage`.
    ///
    /// This is not a general IRC parser; tag values are not unescaped.
    pub fn parse(line: &str) -> Option<CanonicalMessage> {
        let mut rest: &str = line;
        let mut msg = CanonicalMessage::default();

        if let Some(tagged) = rest.strip_prefix('@') {
            let (tags, after) = tagged.split_once(' ')?;
            for tag in tags.split(';') {
                match tag.split_once('=') {
                    Some((n, v)) => msg.tags.push((n.to_string(), v.to_string())),
                    None => msg.tags.push((tag.to_string(), String::new())),
                }
            }
            rest = after;
        }
        if let Some(prefixed) = rest.strip_prefix(':') {
            let (prefix, after) = prefixed.split_once(' ')?;
            msg.prefix = Some(prefix.to_string());
            rest = after;
        }
        let (middle, trailing) = match rest.split_once(" :") {
            Some((m, t)) => (m, Some(t)),
            None => (rest, None),
        };
        let mut words = middle.split(' ');
        msg.command = words.next()?.to_string();
        if msg.command.is_empty() {
            return None;
        }
        msg.params = words.map(String::from).collect();
        msg.trailing = trailing.map(String::from);

        Some(msg)
    }
}

impl fmt::Display for CanonicalMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.tags.is_empty() {
            write!(f, "@")?;
            for (at, (name, value)) in self.tags.iter().enumerate() {
                if at != 0 {
                    write!(f, ";")?;
                }
                if value.is_empty() {
                    write!(f, "{}", name)?;
                } else {
                    write!(f, "{}={}", name, value)?;
                }
            }
            write!(f, " ")?;
        }
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        write!(f, "{}", self.command)?;
        for param in self.params.iter() {
            write!(f, " {}", param)?;
        }
        if let Some(trailing) = &self.trailing {
            write!(f, " :{}", trailing)?;
        }

        Ok(())
    }
}
