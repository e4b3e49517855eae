// src/common.rs
//
// common type aliases, protocol constants, and other globals (avoids circular imports)

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;

/// General purpose counting type, e.g. lines scanned, files opened.
pub type Count = u64;

/// A signed request for a number of log messages.
///
/// Positive is "newer than the anchor", negative is "older than the anchor".
pub type MessageCount = i64;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// custom Results enum for the LogStore
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `Result` Extended
/// for day file reading functions
#[derive(Debug, PartialEq)]
pub enum ResultS3<T, E> {
    /// Contains the success data
    Found(T),
    /// File is empty, or other condition that means "Done", nothing to return, but no bad errors happened
    Done,
    /// Contains the error value, something bad happened
    Err(E),
}

impl<T, E> ResultS3<T, E> {
    /// Returns `true` if the result is [`Found`, 'Done`].
    #[allow(dead_code)]
    #[must_use = "if you intended to assert that this is ok, consider `.unwrap()` instead"]
    #[inline(always)]
    pub const fn is_ok(&self) -> bool {
        matches!(*self, ResultS3::Found(_) | ResultS3::Done)
    }

    /// Returns `true` if the result is [`Err`].
    #[allow(dead_code)]
    #[must_use = "if you intended to assert that this is err, consider `.unwrap_err()` instead"]
    #[inline(always)]
    pub const fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// Returns `true` if the result is [`Done`].
    #[inline(always)]
    pub const fn is_done(&self) -> bool {
        matches!(*self, ResultS3::Done)
    }

    /// Converts from `ResultS3<T, E>` to [`Option<T>`].
    ///
    /// Converts `self` into an [`Option<T>`], consuming `self`,
    /// and discarding the error, if any.
    #[allow(dead_code)]
    #[inline(always)]
    pub fn ok(self) -> Option<T> {
        match self {
            ResultS3::Found(x) => Some(x),
            ResultS3::Done => None,
            ResultS3::Err(_) => None,
        }
    }
}

impl<T, E> std::fmt::Display for ResultS3<T, E>
where
    E: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultS3::Found(_) => { write!(f, "ResultS3::Found") },
            ResultS3::Done => { write!(f, "ResultS3::Done") },
            ResultS3::Err(err) => { write!(f, "ResultS3::Err({})", err) },
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// protocol constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The client command verb handled by the query engine.
pub const COMMAND: &str = "CHATHISTORY";

/// The batch type named in the batch start marker.
pub const BATCH_TYPE: &str = "chathistory";

/// Server name used as the prefix of server-originated lines, e.g. the
/// batch start and end markers.
pub const SERVER_NAME: &str = "irc.znc.in";

/// Length of a generated batch token.
pub const BATCH_ID_SIZE: usize = 13;

/// Ident used for senders when the log does not record one.
pub const DEFAULT_IDENT: &str = "chathistory";

/// Host used for senders when the log does not record one.
pub const DEFAULT_HOST: &str = "znc.in";
