// src/printer/printers.rs

//! Output routing and the specialized printer struct [`PrinterResponse`].
//!
//! A query produces [`ResponseLine`s] bound for one [`Destination`]: the
//! client, or the debug channel. This module renders the reply lines that
//! are not replayed history (errors, warnings, capability advertisement)
//! and prints whole responses to the terminal.
//!
//! [`ResponseLine`s]: self::ResponseLine

use crate::common::{COMMAND, SERVER_NAME};
use crate::data::message::CanonicalMessage;
use crate::debug::printers::de_err;
use crate::readers::queryengine::Response;

use std::io::{
    Result,
    Write, // for `std::io::Stdout.flush`
};

#[doc(hidden)]
pub use ::termcolor::{Color, ColorChoice, ColorSpec, WriteColor};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// globals and constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`Color`] for printing replayed history lines.
///
/// [`Color`]: https://docs.rs/termcolor/1.1.3/termcolor/enum.Color.html
pub const COLOR_DEFAULT: Color = Color::White;

/// [`Color`] for printing batch start and end markers.
pub const COLOR_MARKER: Color = Color::Cyan;

/// [`Color`] for printing warning replies.
pub const COLOR_WARNING: Color = Color::Yellow;

/// [`Color`] for printing error replies and some user-facing error messages.
///
/// [`Color`]: https://docs.rs/termcolor/1.1.3/termcolor/enum.Color.html
pub const COLOR_ERROR: Color = Color::Red;

/// [`Color`] for the debug channel prefix.
pub const COLOR_DEBUG_CHANNEL: Color = Color::Magenta;

/// Name of the debug channel, printed before each line routed to it.
pub const DEBUG_CHANNEL: &str = "*chathistory";

/// Reply severity word of an error reply.
pub const REPLY_ERR: &str = "ERR";
/// Reply severity word of a warning reply.
pub const REPLY_WARN: &str = "WARN";

/// Numeric of the capability advertisement reply.
pub const RPL_ISUPPORT: &str = "005";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Destination, ResponseLine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where all lines of one response go. Never both.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Destination {
    /// the connected client
    Client,
    /// the per-user debug channel
    DebugChannel,
}

impl Destination {
    /// The destination for a user with setting `debug`.
    pub const fn from_debug(debug: bool) -> Destination {
        match debug {
            true => Destination::DebugChannel,
            false => Destination::Client,
        }
    }
}

/// One output line of a response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResponseLine {
    /// batch start or end marker
    Marker(String),
    /// replayed history line
    Member(String),
    /// `CHATHISTORY WARN` reply
    Warning(String),
    /// `CHATHISTORY ERR` reply
    Error(String),
    /// capability advertisement
    ISupport(String),
}

impl ResponseLine {
    pub fn text(&self) -> &str {
        match self {
            ResponseLine::Marker(text)
            | ResponseLine::Member(text)
            | ResponseLine::Warning(text)
            | ResponseLine::Error(text)
            | ResponseLine::ISupport(text) => text.as_str(),
        }
    }

    fn color(&self) -> Color {
        match self {
            ResponseLine::Marker(_) => COLOR_MARKER,
            ResponseLine::Member(_) | ResponseLine::ISupport(_) => COLOR_DEFAULT,
            ResponseLine::Warning(_) => COLOR_WARNING,
            ResponseLine::Error(_) => COLOR_ERROR,
        }
    }
}

/// `:<nickmask> CHATHISTORY <level> :<code>`
pub fn reply_line(nickmask: &str, level: &str, code: &str) -> String {
    CanonicalMessage::new(COMMAND)
        .prefix(nickmask)
        .param(level)
        .trailing(code)
        .to_string()
}

/// `:irc.znc.in 005 <nick> CHATHISTORY=<size> :are supported by this server`
pub fn isupport_line(nick: &str, size: u64) -> String {
    CanonicalMessage::new(RPL_ISUPPORT)
        .prefix(SERVER_NAME)
        .param(nick)
        .param(format!("{}={}", COMMAND, size))
        .trailing("are supported by this server")
        .to_string()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PrinterResponse
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A printer specialized for [`Response`s].
///
/// Each response is printed as one uninterrupted block.
///
/// [`Response`s]: crate::readers::queryengine::Response
pub struct PrinterResponse {
    /// termcolor handle to stdout
    stdout_color: termcolor::StandardStream,
    /// should printing be in color?
    do_color: bool,
    /// color settings for the debug channel prefix
    color_spec_debug: ColorSpec,
    /// last value passed to `self.stdout_color.set_color()`
    ///
    /// used by macro `setcolor_or_return`
    color_spec_last: ColorSpec,
}

/// Macro to write to given stdout. If there is an error then return it.
macro_rules! write_or_return {
    ($stdout:expr, $slice_:expr, $printed:expr) => {
        match $stdout.write_all($slice_) {
            Ok(_) => {
                $printed += $slice_.len();
            }
            Err(err) => {
                // XXX: this will print when this program stdout is truncated, like when piping
                //      to `head`, e.g. `chr - < queries.txt | head`
                //          Broken pipe (os error 32)
                de_err!(
                    "{}.write({}) (len {})) error {}",
                    stringify!($stdout),
                    stringify!($slice_),
                    $slice_.len(),
                    err
                );
                #[allow(clippy::match_single_binding)]
                match $stdout.flush() {
                    _ => {}
                }
                return Err(err);
            }
        }
    };
}

/// Macro that sets output color, only changed if needed.
///
/// Unnecessary changes to `set_color` may cause errant formatting bytes to
/// print to the terminal.
macro_rules! setcolor_or_return {
    ($stdout:expr, $color_spec:expr, $color_spec_last:expr) => {
        if $color_spec != $color_spec_last {
            if let Err(err) = $stdout.set_color(&$color_spec) {
                de_err!("{}.set_color({:?}) returned error {}", stringify!($stdout), $color_spec, err);
                return Err(err);
            };
            $color_spec_last = $color_spec.clone();
        }
    };
}

/// Aliased [`Result`] returned by [`PrinterResponse`] functions; count of
/// bytes printed.
///
/// [`Result`]: std::io::Result
pub type PrinterResponseResult = Result<usize>;

impl PrinterResponse {
    /// Create a new `PrinterResponse`.
    pub fn new(color_choice: ColorChoice) -> PrinterResponse {
        let stdout_color = termcolor::StandardStream::stdout(color_choice);
        let do_color: bool = match color_choice {
            ColorChoice::Never => false,
            ColorChoice::Always | ColorChoice::AlwaysAnsi | ColorChoice::Auto => true,
        };
        let mut color_spec_debug: ColorSpec = ColorSpec::new();
        color_spec_debug.set_fg(Some(COLOR_DEBUG_CHANNEL));
        color_spec_debug.set_bold(true);

        PrinterResponse {
            stdout_color,
            do_color,
            color_spec_debug,
            color_spec_last: ColorSpec::new(),
        }
    }

    /// Prints all lines of `response`.
    ///
    /// Lines routed to the debug channel are prefixed with
    /// [`DEBUG_CHANNEL`].
    pub fn print_response(&mut self, response: &Response) -> PrinterResponseResult {
        let mut printed: usize = 0;
        let _stderr_lock = std::io::stderr().lock();
        let mut color_spec_line: ColorSpec = ColorSpec::new();
        for line in response.lines.iter() {
            if response.destination == Destination::DebugChannel {
                let prefix: String = format!("{} ", DEBUG_CHANNEL);
                if self.do_color {
                    setcolor_or_return!(self.stdout_color, self.color_spec_debug, self.color_spec_last);
                }
                write_or_return!(self.stdout_color, prefix.as_bytes(), printed);
            }
            if self.do_color {
                color_spec_line.set_fg(Some(line.color()));
                setcolor_or_return!(self.stdout_color, color_spec_line, self.color_spec_last);
            }
            write_or_return!(self.stdout_color, line.text().as_bytes(), printed);
            write_or_return!(self.stdout_color, b"\n", printed);
        }
        if self.do_color {
            if let Err(err) = self.stdout_color.reset() {
                de_err!("stdout_color.reset() returned error {}", err);
                return Err(err);
            }
            self.color_spec_last = ColorSpec::new();
        }
        self.stdout_color.flush()?;

        Ok(printed)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// other printer functions (no use of PrinterResponse)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Print colored output to terminal if possible using passed stream,
/// otherwise, print plain output.
///
/// Caller should take stream locks, e.g. `std::io::stdout().lock()`.
///
/// See an example <https://docs.rs/termcolor/1.1.2/termcolor/#detecting-presence-of-a-terminal>.
pub fn print_colored(
    color: Color,
    value: &[u8],
    out: &mut termcolor::StandardStream,
) -> Result<()> {
    if let Err(err) = out.set_color(ColorSpec::new().set_fg(Some(color))) {
        de_err!("print_colored: std.set_color({:?}) returned error {}", color, err);
        return Err(err);
    };
    if let Err(err) = out.write_all(value) {
        de_err!("print_colored: out.write(…) returned error {}", err);
        return Err(err);
    }
    if let Err(err) = out.reset() {
        de_err!("print_colored: out.reset() returned error {}", err);
        return Err(err);
    }
    out.flush()?;

    Ok(())
}

/// Print colored output to terminal on stderr.
///
/// See an example <https://docs.rs/termcolor/1.1.2/termcolor/#detecting-presence-of-a-terminal>.
pub fn print_colored_stderr(
    color: Color,
    color_choice_opt: Option<ColorChoice>,
    value: &[u8],
) -> Result<()> {
    let choice: ColorChoice = color_choice_opt.unwrap_or(ColorChoice::Auto);
    let mut stderr = termcolor::StandardStream::stderr(choice);
    let _stdout_lock = std::io::stdout().lock();

    print_colored(color, value, &mut stderr)
}

/// Safely write the `buffer` to stderr with help of [`StderrLock`].
///
/// [`StderrLock`]: std::io::StderrLock
pub fn write_stderr(buffer: &[u8]) {
    let mut stderr_lock = std::io::stderr().lock();
    let _stdout_lock = std::io::stdout().lock();
    if let Err(_err) = stderr_lock.write_all(buffer) {
        // XXX: this will print when this program stderr is truncated
        //          Broken pipe (os error 32)
        //      Not sure if anything should be done about it
        de_err!("stderr_lock.write(buffer (len {})) error {}", buffer.len(), _err);
    }
    if let Err(_err) = stderr_lock.flush() {
        de_err!("stderr flushing error {}", _err);
    }
}
