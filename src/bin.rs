//! Print the contents of an x11 selection to stdout.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use log::LevelFilter;
use xselection::display;
use xselection::selection::{self, Error, Options, Requestor, SelectionKind};
use std::io;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "xselection")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Selection to read: primary, secondary, clipboard or buffer-cut, any prefix works.
    #[arg(short, long, default_value = "primary")]
    selection: SelectionKind,

    /// Target to request from the selection owner, UTF8_STRING when not given.
    #[arg(short, long)]
    target: Option<String>,

    /// Request STRING instead of UTF8_STRING.
    #[arg(long)]
    noutf8: bool,

    /// Keep a trailing newline instead of removing it.
    #[arg(long)]
    keep_newline: bool,

    /// X display to connect to, defaults to $DISPLAY.
    #[arg(short, long)]
    display: Option<String>,

    /// Log more, repeat for protocol traces. RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn execute(cli: &Cli, requestor: &mut Requestor) -> Result<(), Error> {
    let selection = cli.selection.atom(requestor)?;
    let target = selection::target(requestor, cli.target.as_deref(), cli.noutf8)?;

    log::debug!("requestor window {:#x}", requestor.window().id());

    let options = Options {
        keep_newline: cli.keep_newline,
    };

    selection::run(requestor, &mut io::stdout().lock(), selection, target, options)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(level(cli.verbose))
        .parse_default_env()
        .init();

    let requestor = display::open(cli.display.as_deref())
        .map_err(Error::from)
        .and_then(Requestor::new);

    let mut requestor = match requestor {
        Ok(requestor) => requestor,
        Err(e) => {
            log::debug!("failed to open display: {}", e);

            let name = display::name(cli.display.as_deref());

            eprintln!("Error: Can't open display: {}", name.as_deref().unwrap_or("(null)"));

            return ExitCode::FAILURE;
        },
    };

    match execute(&cli, &mut requestor) {
        Ok(()) => ExitCode::SUCCESS,
        // the reader went away, e.g. piped into `head`
        Err(Error::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);

            ExitCode::FAILURE
        },
    }
}
