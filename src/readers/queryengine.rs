// src/readers/queryengine.rs

//! Implements the [`QueryEngine`], which answers one `CHATHISTORY` query
//! line with the [`Response`] to send.
//!
//! A query line is
//!
//! ```text
//! CHATHISTORY <target> <YYYY-MM-DDTHH:MM:SS.mmmZ> <count>
//! ```
//!
//! where `count` is `*` (the user's configured size, newer than the anchor)
//! or a signed decimal integer; negative asks for messages older than the
//! anchor, positive for messages newer than the anchor. The verb is
//! case-insensitive and the target is lowercased.
//!
//! A response is either
//!
//! - an optional `WARN` reply, then one framed batch, or
//! - one `ERR` reply, and no batch.

use crate::common::{COMMAND, FPath, MessageCount};
use crate::data::datetime::Anchor;
use crate::data::message::CanonicalMessage;
use crate::data::settings::{Settings, SettingsStore};
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn};
use crate::printer::batch::BatchEnvelope;
use crate::printer::formatter::EventFormatter;
use crate::printer::printers::{
    isupport_line,
    reply_line,
    Destination,
    ResponseLine,
    REPLY_ERR,
    REPLY_WARN,
};
use crate::readers::classifier::LineClassifier;
use crate::readers::logstore::LogStore;
use crate::readers::summary::SummaryScan;
use crate::readers::windowscanner::{Direction, WindowScanner};

use std::fmt;
use std::sync::Arc;

use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

lazy_static! {
    /// `CHATHISTORY <target> <anchor> <count>`
    static ref REGEX_QUERY: Regex = Regex::new(
        r"(?i)^CHATHISTORY +(\S+) +(\S+) +(\S+) *$"
    ).unwrap();
    /// `*` or a signed decimal integer
    static ref REGEX_COUNT: Regex = Regex::new(
        r"^(?:\*|-?[0-9]+)$"
    ).unwrap();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// QueryError, QueryWarning
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A query that produced no batch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueryError {
    /// the query line does not follow the grammar
    InvalidCommand,
    /// the count is zero
    InvalidCount,
    /// nothing qualified
    NotFound,
}

impl QueryError {
    /// The wire code of the `ERR` reply.
    pub const fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidCommand => "CMD_INVALID",
            QueryError::InvalidCount => "MSG_COUNT_INVALID",
            QueryError::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidCommand => write!(f, "invalid command"),
            QueryError::InvalidCount => write!(f, "invalid message count"),
            QueryError::NotFound => write!(f, "no messages found"),
        }
    }
}

impl std::error::Error for QueryError {}

/// A query that was answered, but not as asked.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueryWarning {
    /// the count was larger than the user's size and was clamped to it
    CountExceedsLimit { requested: u64, limit: u64 },
}

impl QueryWarning {
    /// The wire code of the `WARN` reply.
    pub const fn code(&self) -> &'static str {
        match self {
            QueryWarning::CountExceedsLimit { .. } => "MAX_MESSAGE_COUNT_EXCEEDED",
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Query
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The count of a query as the client wrote it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RequestedCount {
    /// `*`
    Default,
    Count(MessageCount),
}

/// The resolved scan window of a [`Query`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Window {
    pub direction: Direction,
    /// never zero, never above the user's size
    pub limit: u64,
    pub warning: Option<QueryWarning>,
}

/// One parsed `CHATHISTORY` query.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Query {
    /// room name, lowercased
    pub target: String,
    pub anchor: Anchor,
    pub count: RequestedCount,
    /// room directory, set by [`Query::resolve_path`]
    pub path: Option<FPath>,
}

/// Is `line` a `CHATHISTORY` command, well-formed or not?
pub fn is_query(line: &str) -> bool {
    match line.split_whitespace().next() {
        Some(verb) => verb.eq_ignore_ascii_case(COMMAND),
        None => false,
    }
}

/// Can `target` be substituted for `$WINDOW` as one path component?
///
/// Path separators, NUL, `.` and `..` would name a directory outside the
/// user's log directory.
pub fn is_room_name(target: &str) -> bool {
    !(target.is_empty()
        || target == "."
        || target == ".."
        || target.contains(['/', '\\', '\0']))
}

impl Query {
    /// Parse a query line.
    ///
    /// A count of zero is `InvalidCount`; any other malformed part, including
    /// a target that is not a room name, is `InvalidCommand`.
    pub fn parse(line: &str) -> Result<Query, QueryError> {
        defn!("({:?})", line);
        let line: &str = line.trim_end_matches(['\r', '\n']);
        let captures = match REGEX_QUERY.captures(line) {
            Some(val) => val,
            None => {
                defx!("no match");
                return Err(QueryError::InvalidCommand);
            }
        };
        let target: String = captures[1].to_lowercase();
        if !is_room_name(&target) {
            defx!("bad target {:?}", target);
            return Err(QueryError::InvalidCommand);
        }
        let anchor: Anchor = match Anchor::parse(&captures[2]) {
            Some(val) => val,
            None => {
                defx!("bad anchor {:?}", &captures[2]);
                return Err(QueryError::InvalidCommand);
            }
        };
        let count_s: &str = &captures[3];
        if !REGEX_COUNT.is_match(count_s) {
            defx!("bad count {:?}", count_s);
            return Err(QueryError::InvalidCommand);
        }
        let count: RequestedCount = match count_s {
            "*" => RequestedCount::Default,
            _ => match count_s.parse::<MessageCount>() {
                Ok(0) => {
                    defx!("count zero");
                    return Err(QueryError::InvalidCount);
                }
                Ok(val) => RequestedCount::Count(val),
                Err(_err) => {
                    defx!("count {:?} error {}", count_s, _err);
                    return Err(QueryError::InvalidCommand);
                }
            },
        };
        defx!("target {:?} anchor {} count {:?}", target, anchor, count);

        Ok(Query {
            target,
            anchor,
            count,
            path: None,
        })
    }

    /// Resolve the direction and limit of the scan for a user whose size is
    /// `size`.
    pub fn window(&self, size: u64) -> Result<Window, QueryError> {
        let (direction, requested): (Direction, u64) = match self.count {
            RequestedCount::Default => (Direction::Forward, size),
            RequestedCount::Count(0) => return Err(QueryError::InvalidCount),
            RequestedCount::Count(val) if val < 0 => (Direction::Backward, val.unsigned_abs()),
            RequestedCount::Count(val) => (Direction::Forward, val.unsigned_abs()),
        };
        if requested > size {
            defñ!("clamp {} to {}", requested, size);
            return Ok(Window {
                direction,
                limit: size,
                warning: Some(QueryWarning::CountExceedsLimit {
                    requested,
                    limit: size,
                }),
            });
        }

        Ok(Window {
            direction,
            limit: requested,
            warning: None,
        })
    }

    /// Substitute the path template of `settings` for this query's room and
    /// remember it.
    pub fn resolve_path(&mut self, settings: &Settings, user: &str, network: &str) -> &FPath {
        let path: FPath = settings.resolve_path(user, network, &self.target);
        defñ!("{:?}", path);
        self.path.insert(path)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ClientContext, Response
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Who is asking.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientContext {
    /// account name; selects the settings and the log directory
    pub user: String,
    pub network: String,
    /// current nick of the client
    pub nick: String,
    /// `nick!ident@host` of the client, the prefix of `ERR` and `WARN`
    /// replies
    pub nickmask: String,
}

impl ClientContext {
    pub fn new<S: Into<String>>(user: S, network: S, nick: S, nickmask: S) -> ClientContext {
        ClientContext {
            user: user.into(),
            network: network.into(),
            nick: nick.into(),
            nickmask: nickmask.into(),
        }
    }
}

/// Everything one query produced.
#[derive(Clone, Debug)]
pub struct Response {
    /// all `lines` go here
    pub destination: Destination,
    /// output lines in emission order
    pub lines: Vec<ResponseLine>,
    pub warning: Option<QueryWarning>,
    pub error: Option<QueryError>,
    /// id of the batch, if one was framed
    pub batch_id: Option<String>,
    /// scan statistics, if a scan ran
    pub summary: Option<SummaryScan>,
}

impl Response {
    fn new(destination: Destination) -> Response {
        Response {
            destination,
            lines: Vec::new(),
            warning: None,
            error: None,
            batch_id: None,
            summary: None,
        }
    }

    fn warn(&mut self, ctx: &ClientContext, warning: QueryWarning) {
        self.lines.push(ResponseLine::Warning(reply_line(&ctx.nickmask, REPLY_WARN, warning.code())));
        self.warning = Some(warning);
    }

    fn fail(&mut self, ctx: &ClientContext, error: QueryError) {
        self.lines.push(ResponseLine::Error(reply_line(&ctx.nickmask, REPLY_ERR, error.code())));
        self.error = Some(error);
    }

    /// Did the query produce a batch?
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The replayed history lines only, without markers and replies.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            ResponseLine::Member(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// QueryEngine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Answers queries. Shareable between threads; every query reads its own
/// settings snapshot and opens its own files.
pub struct QueryEngine {
    store: Arc<dyn SettingsStore>,
    formatter: EventFormatter,
}

impl fmt::Debug for QueryEngine {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("QueryEngine")
            .field("formatter", &self.formatter)
            .finish()
    }
}

impl QueryEngine {
    pub fn new(store: Arc<dyn SettingsStore>, formatter: EventFormatter) -> QueryEngine {
        QueryEngine { store, formatter }
    }

    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    /// Answer `line` for client `ctx`.
    ///
    /// Returns `None` if `line` is not a `CHATHISTORY` command at all.
    pub fn handle(&self, ctx: &ClientContext, line: &str) -> Option<Response> {
        if !is_query(line) {
            defñ!("not a query {:?}", line);
            return None;
        }
        defn!("({:?}, {:?})", ctx.user, line);
        let settings: Settings = self.store.get(&ctx.user);
        let mut response = Response::new(Destination::from_debug(settings.debug));

        let mut query: Query = match Query::parse(line) {
            Ok(val) => val,
            Err(err) => {
                response.fail(ctx, err);
                defx!("{}", err);
                return Some(response);
            }
        };
        let window: Window = match query.window(settings.size) {
            Ok(val) => val,
            Err(err) => {
                response.fail(ctx, err);
                defx!("{}", err);
                return Some(response);
            }
        };
        if let Some(warning) = window.warning {
            response.warn(ctx, warning);
        }
        query.resolve_path(&settings, &ctx.user, &ctx.network);

        let (messages, summary) = self.scan(&query, &window, &settings);
        response.summary = Some(summary);
        match BatchEnvelope::new(messages, &query.target) {
            Some(batch) => {
                response.lines.extend(batch.lines());
                response.batch_id = Some(batch.id().to_string());
            }
            None => response.fail(ctx, QueryError::NotFound),
        }
        defx!("{} lines", response.lines.len());

        Some(response)
    }

    /// Scan the room directory of a resolved `query` within `window`.
    ///
    /// Returns the messages in ascending chronological order.
    pub fn scan(
        &self,
        query: &Query,
        window: &Window,
        settings: &Settings,
    ) -> (Vec<CanonicalMessage>, SummaryScan) {
        let path: FPath = match &query.path {
            Some(val) => val.clone(),
            None => settings.resolve_path("", "", &query.target),
        };
        let mut scanner = WindowScanner::new(
            LogStore::new(path),
            LineClassifier::new(settings.extras),
            &self.formatter,
            query.anchor,
            window.direction,
            window.limit as usize,
            settings.strip,
            query.target.clone(),
        );
        let messages: Vec<CanonicalMessage> = scanner.scan();

        (messages, scanner.summary().clone())
    }

    /// The capability advertisement for client `ctx`. Always sent to the
    /// client, whatever the `debug` setting.
    pub fn isupport(&self, ctx: &ClientContext) -> Response {
        let settings: Settings = self.store.get(&ctx.user);
        let mut response = Response::new(Destination::Client);
        response
            .lines
            .push(ResponseLine::ISupport(isupport_line(&ctx.nick, settings.size)));

        response
    }
}
