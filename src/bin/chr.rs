// src/bin/chr.rs

//! Driver program _chr_ drives the [_chrlib_].
//!
//! Processes user-passed command-line arguments, standing in for the
//! connection of one client: the user, network, and nick the queries are
//! answered for.
//! Then processes the `CHATHISTORY` query lines passed on the command-line,
//! or via STDIN.
//!
//! For each query line, a query processing thread is created. Each thread
//! runs the query through a shared [`QueryEngine`] and sends the
//! [`Response`] to the main thread through it's own [channel].
//! The main thread prints each response as one block, in the order the
//! queries were passed.
//!
//! If passed CLI option `--summary`, the main thread prints the
//! [`SummaryScan`] of each query to STDERR.
//!
//! `chr.rs` should be the main thread and the only thread that prints to
//! STDOUT.
//!
//! [_chrlib_]: chrlib
//! [`QueryEngine`]: chrlib::readers::queryengine::QueryEngine
//! [`Response`]: chrlib::readers::queryengine::Response
//! [`SummaryScan`]: chrlib::readers::summary::SummaryScan
//! [channel]: self::ChanSendResponse

#![allow(non_camel_case_types)]

use std::collections::VecDeque;
use std::io::BufRead; // for stdin::lock().lines()
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use ::anyhow::{Context, Result};
use ::clap::{
    Parser,
    ValueEnum,
};
use ::const_format::concatcp;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use ::chrlib::common::{COMMAND, DEFAULT_HOST};
use ::chrlib::data::settings::{
    SettingKey,
    Settings,
    SettingsMap,
    SettingsStore,
    SIZE_DEFAULT,
};
use ::chrlib::debug::printers::{de_err, de_wrn, e_err, e_wrn};
use ::chrlib::printer::formatter::EventFormatter;
use ::chrlib::printer::printers::{
    print_colored_stderr,
    write_stderr,
    ColorChoice,
    PrinterResponse,
    COLOR_ERROR,
};
use ::chrlib::readers::queryengine::{
    ClientContext,
    QueryEngine,
    Response,
};

// --------------------
// command-line parsing

/// CLI enum that maps to [`termcolor::ColorChoice`].
///
/// [`termcolor::ColorChoice`]: https://docs.rs/termcolor/1.1.3/termcolor/enum.ColorChoice.html
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    ValueEnum, // from `clap`
)]
enum CLI_Color_Choice {
    always,
    auto,
    never,
}

#[cfg(debug_assertions)]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "\nDEBUG BUILD";
#[cfg(not(debug_assertions))]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "";

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    r#"
A query is
    CHATHISTORY <target> <YYYY-MM-DDTHH:MM:SS.mmmZ> <count>
where <count> is "*" (the configured size, newer than the anchor) or a signed
integer; negative is older than the anchor, positive is newer than the anchor.
For example
    CHATHISTORY #rust 2016-11-12T13:10:05.000Z -50

Day files are read from the room directory given by the "path" setting.
Variables $USER, $NETWORK, $WINDOW are replaced with the user, the network,
and the lowercased target. The default path is
    <DATA_DIR>/users/$USER/moddata/log/$NETWORK/$WINDOW/
Day files are named YYYY-MM-DD.log.

Settings are "size", "extras", "strip", "path", "debug".
Pass --set to change a setting of the --user; with --settings the change is
persisted to that JSON file.

---

Version: "#, env!("CARGO_PKG_VERSION"), r#"
MSRV: "#, env!("CARGO_PKG_RUST_VERSION"), r#"
License: "#, env!("CARGO_PKG_LICENSE"), r#"
Author: "#, env!("CARGO_PKG_AUTHORS"), r#"
"#,
    CLI_HELP_AFTER_NOTE_DEBUG,
);

/// clap command-line arguments build-time definitions.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "chr",
    // write expanded information for the `--version` output
    version = concatcp!(
        "(Super Speedy Chathistory)\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
        "Author: ", env!("CARGO_PKG_AUTHORS"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Query line(s), e.g. "CHATHISTORY #rust 2016-11-12T13:10:05.000Z -50".
    /// Queries may also be passed via STDIN, one per line. The user must
    /// supply argument "-" to signify queries are available from STDIN.
    #[clap(
        required = true,
        verbatim_doc_comment,
    )]
    queries: Vec<String>,

    /// User (account) the queries are answered for.
    #[clap(
        short = 'u',
        long,
        verbatim_doc_comment,
        default_value = "user",
    )]
    user: String,

    /// Network the queries are answered for.
    #[clap(
        short = 'N',
        long,
        verbatim_doc_comment,
        default_value = "network",
    )]
    network: String,

    /// Current nick of the client. Defaults to the --user.
    #[clap(
        long,
        verbatim_doc_comment,
    )]
    nick: Option<String>,

    /// Directory the default "path" setting is rooted at.
    #[clap(
        short = 'd',
        long = "data-dir",
        verbatim_doc_comment,
        default_value = ".",
    )]
    data_dir: PathBuf,

    /// JSON file of per-user settings. Created on the first --set.
    #[clap(
        long,
        verbatim_doc_comment,
    )]
    settings: Option<PathBuf>,

    /// Change a setting of the --user before answering, as "key=value".
    /// May be passed more than once.
    #[clap(
        long = "set",
        verbatim_doc_comment,
        value_parser = cli_parse_set,
    )]
    set: Vec<(String, String)>,

    /// Size for users that have not changed "size".
    #[clap(
        long = "default-size",
        verbatim_doc_comment,
        default_value_t = SIZE_DEFAULT,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    default_size: u64,

    /// Choose to print using colors.
    #[clap(
        required = false,
        short = 'c',
        long = "color",
        verbatim_doc_comment,
        value_enum,
        default_value_t = CLI_Color_Choice::auto,
    )]
    color_choice: CLI_Color_Choice,

    /// Maximum number of queries answered at the same time.
    /// Defaults to the available parallelism.
    #[clap(
        short = 'j',
        long,
        verbatim_doc_comment,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    threads: Option<u64>,

    /// Print the capability advertisement before answering.
    #[clap(
        long,
        verbatim_doc_comment,
    )]
    isupport: bool,

    /// Print a summary of each query processed to stderr.
    /// Most useful for developers.
    #[clap(
        short,
        long,
        verbatim_doc_comment,
    )]
    summary: bool,
}

/// `clap` argument processor for `--set`.
fn cli_parse_set(keyvalue: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = match keyvalue.split_once('=') {
        Some(val) => val,
        None => return Err(format!("expected \"key=value\", got {:?}", keyvalue)),
    };
    if let Err(err) = SettingKey::from_str(key) {
        return Err(err.to_string());
    }

    Ok((key.to_string(), value.to_string()))
}

/// Read query lines from STDIN, skipping blank lines.
fn stdin_queries() -> Result<Vec<String>> {
    let mut queries: Vec<String> = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line: String = line.context("reading STDIN")?;
        if line.trim().is_empty() {
            continue;
        }
        queries.push(line);
    }

    Ok(queries)
}

// --------------------
// query processing

/// Query threads allowed at the same time when the available parallelism is
/// unknown.
const THREADS_DEFAULT: usize = 4;

/// Data sent from a query processing thread to the main printing thread;
/// the index of the query and it's response, `None` if the query line was
/// not a query.
type ChanDatum = (usize, Option<Response>);

/// Sender channel (used by each query processing thread).
type ChanSendResponse = ::crossbeam_channel::Sender<ChanDatum>;

/// Receiver channel (used by main printing loop).
type ChanRecvResponse = ::crossbeam_channel::Receiver<ChanDatum>;

/// Thread entry point; answer one query.
fn exec_query_thread(
    chan_send: ChanSendResponse,
    engine: Arc<QueryEngine>,
    ctx: Arc<ClientContext>,
    index: usize,
    line: String,
) {
    defn!("({}, {:?})", index, line);
    let response: Option<Response> = engine.handle(&ctx, &line);
    if let Err(_err) = chan_send.send((index, response)) {
        de_err!("chan_send.send(…) failed {} for query {}", _err, index);
    }
    defx!();
}

/// Wait for the response of one query thread and print it.
///
/// Returns `Ok(false)` if the query could not be answered, `Err` if printing
/// failed.
fn print_next(
    index: usize,
    line: &str,
    chan_recv: ChanRecvResponse,
    printer: &mut PrinterResponse,
    cli_opt_summary: bool,
) -> std::io::Result<bool> {
    let response: Response = match chan_recv.recv() {
        Ok((_index, Some(response))) => response,
        Ok((_index, None)) => {
            e_wrn!("not a {} query {:?}", COMMAND, line);
            return Ok(false);
        }
        Err(err) => {
            e_err!("query {} thread ended without a response; {}", index, err);
            return Ok(false);
        }
    };
    printer.print_response(&response)?;
    if cli_opt_summary {
        print_summary(index, line, &response);
    }

    Ok(true)
}

/// Answer all `queries` concurrently, at most `threads_max` at a time, and
/// print the responses in order.
///
/// Returns `false` if any query could not be answered.
fn processing_loop(
    engine: Arc<QueryEngine>,
    ctx: Arc<ClientContext>,
    queries: Vec<String>,
    threads_max: usize,
    printer: &mut PrinterResponse,
    cli_opt_summary: bool,
) -> bool {
    defn!("({} queries, threads_max {})", queries.len(), threads_max);
    debug_assert!(threads_max > 0);
    let mut ret: bool = true;
    // spawned query threads not yet printed, oldest first
    let mut in_flight: VecDeque<(usize, String, ChanRecvResponse)> = VecDeque::with_capacity(threads_max.min(1024));

    for (index, line) in queries.into_iter().enumerate() {
        if in_flight.len() >= threads_max {
            if let Some((index_, line_, chan_recv)) = in_flight.pop_front() {
                match print_next(index_, &line_, chan_recv, printer, cli_opt_summary) {
                    Ok(answered) => ret &= answered,
                    Err(err) => {
                        // likely a broken pipe
                        de_err!("print_response failed {}", err);
                        return false;
                    }
                }
            }
        }
        let (chan_send, chan_recv): (ChanSendResponse, ChanRecvResponse) = ::crossbeam_channel::bounded(1);
        let engine_ = engine.clone();
        let ctx_ = ctx.clone();
        let line_ = line.clone();
        match thread::Builder::new()
            .name(format!("query{}", index))
            .spawn(move || exec_query_thread(chan_send, engine_, ctx_, index, line_))
        {
            Ok(_joinhandle) => in_flight.push_back((index, line, chan_recv)),
            Err(err) => {
                e_err!("thread.name(\"query{}\").spawn() failed {:?}", index, err);
                ret = false;
            }
        }
    }

    while let Some((index, line, chan_recv)) = in_flight.pop_front() {
        match print_next(index, &line, chan_recv, printer, cli_opt_summary) {
            Ok(answered) => ret &= answered,
            Err(err) => {
                de_err!("print_response failed {}", err);
                return false;
            }
        }
    }
    defx!("return {}", ret);

    ret
}

/// Print the `--summary` of one query to STDERR.
fn print_summary(index: usize, line: &str, response: &Response) {
    let mut summary: String = format!("\nQuery {}: {:?}\n", index, line);
    summary.push_str(&format!("destination         : {:?}\n", response.destination));
    if let Some(warning) = &response.warning {
        summary.push_str(&format!("warning             : {:?}\n", warning));
    }
    if let Some(batch_id) = &response.batch_id {
        summary.push_str(&format!("batch               : {}\n", batch_id));
    }
    if let Some(scan) = &response.summary {
        summary.push_str(&format!("{}\n", scan));
    }
    write_stderr(summary.as_bytes());
    if let Some(error) = &response.error {
        let error_s: String = format!("error reply         : {} ({})\n", error.code(), error);
        if print_colored_stderr(COLOR_ERROR, None, error_s.as_bytes()).is_err() {
            write_stderr(error_s.as_bytes());
        }
    }
}

/// Number of query threads allowed at the same time; `--threads`, else the
/// available parallelism.
fn cli_threads_max(cli_threads: Option<u64>) -> usize {
    match cli_threads {
        Some(val) => usize::try_from(val).unwrap_or(usize::MAX).max(1),
        None => match thread::available_parallelism() {
            Ok(val) => val.get(),
            Err(_err) => {
                de_wrn!("available_parallelism failed {}", _err);
                THREADS_DEFAULT
            }
        },
    }
}

/// Set up the settings store and the engine, answer the queries.
fn run(args: CLI_Args) -> Result<bool> {
    defn!();
    let color_choice: ColorChoice = match args.color_choice {
        CLI_Color_Choice::always => ColorChoice::Always,
        CLI_Color_Choice::auto => ColorChoice::Auto,
        CLI_Color_Choice::never => ColorChoice::Never,
    };
    defo!("color_choice {:?}", color_choice);

    let mut defaults: Settings = Settings::with_data_dir(&args.data_dir);
    defaults.size = args.default_size;
    let store: SettingsMap = match &args.settings {
        Some(path) => SettingsMap::load(defaults, path)
            .with_context(|| format!("loading settings file {:?}", path))?,
        None => SettingsMap::new(defaults),
    };
    let store: Arc<dyn SettingsStore> = Arc::new(store);
    let engine = Arc::new(QueryEngine::new(store, EventFormatter::default()));
    for (key, value) in args.set.iter() {
        let key_: SettingKey = SettingKey::from_str(key)?;
        let settings: Settings = engine
            .store()
            .set(&args.user, key_, value)
            .with_context(|| format!("--set {}={}", key, value))?;
        defo!("settings {:?}", settings);
    }
    let threads_max: usize = cli_threads_max(args.threads);
    defo!("threads_max {}", threads_max);

    let nick: String = args.nick.unwrap_or_else(|| args.user.clone());
    let nickmask: String = format!("{}!{}@{}", nick, args.user, DEFAULT_HOST);
    let ctx = Arc::new(ClientContext::new(args.user, args.network, nick, nickmask));
    defo!("{:?}", ctx);

    let queries: Vec<String> = if args.queries.len() == 1 && args.queries[0] == "-" {
        stdin_queries()?
    } else {
        args.queries
    };

    let mut printer = PrinterResponse::new(color_choice);
    if args.isupport {
        printer
            .print_response(&engine.isupport(&ctx))
            .context("printing capability advertisement")?;
    }
    let ret: bool = processing_loop(engine, ctx, queries, threads_max, &mut printer, args.summary);
    defx!("return {}", ret);

    Ok(ret)
}

/// Process the user-passed command-line arguments.
/// Start function `processing_loop`.
/// Determine a process return code.
pub fn main() -> ExitCode {
    defn!();
    let args = CLI_Args::parse();
    defo!("args {:?}", args);

    let exitcode: ExitCode = match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            e_err!("{:#}", err);
            ExitCode::FAILURE
        }
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}
