//! pdf2audio main entry point
//!
//! The main loop polls stdin with a short timeout. Each wake-up applies
//! worker events to the form, handles any keys, and redraws when the screen
//! would change.

use log::{debug, error, info};
use mio::{Events, Interest, Poll, Token};
use nix::libc;
use nix::sys::signal::{self, SigHandler, Signal};
use pdf2audio::conversion::Controller;
use pdf2audio::input::{create_default_keymap, dispatch, FormKeyHandler};
use pdf2audio::speech::{create_engine, share};
use pdf2audio::state::config::Config;
use pdf2audio::state::State;
use pdf2audio::terminal::{get_terminal_size, render_form, TermiosGuard};
use pdf2audio::{Pdf2AudioError, Result};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Token for stdin in mio poll
const STDIN: Token = Token(0);

/// UI refresh interval
const TICK: Duration = Duration::from_millis(100);

/// Global flag set by SIGWINCH handler
static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);

/// SIGWINCH handler - sets flag when terminal is resized
extern "C" fn handle_sigwinch(_: libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::Relaxed);
}

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    debug: bool,
    pdf_path: Option<String>,
}

fn print_usage() {
    println!("Usage: {} [--debug|-d] [FILE.pdf]", pdf2audio::APP_NAME);
    println!();
    println!("Read a PDF aloud and save it as an audio book.");
    println!();
    println!("Options:");
    println!("  -d, --debug     Write debug logs to {}.log", pdf2audio::APP_NAME);
    println!("  -h, --help      Show this help");
    println!("  -V, --version   Show version");
}

fn parse_args() -> Args {
    let mut args = Args::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--debug" | "-d" => args.debug = true,
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", pdf2audio::APP_NAME, pdf2audio::VERSION);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                process::exit(2);
            }
            path => args.pdf_path = Some(path.to_string()),
        }
    }
    args
}

fn init_logging(debug_mode: bool) {
    if debug_mode {
        use std::fs::OpenOptions;
        let log_name = format!("{}.log", pdf2audio::APP_NAME);
        match OpenOptions::new().create(true).append(true).open(&log_name) {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open {} for debug logging: {}", log_name, e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "{} version {} starting (debug mode, logging to {})",
            pdf2audio::APP_NAME,
            pdf2audio::VERSION,
            log_name
        );
    } else {
        // Normal mode: errors only, so the form isn't scribbled over
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }
}

fn main() {
    let args = parse_args();
    init_logging(args.debug);

    if let Err(e) = run(args) {
        error!("Fatal error: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    debug!("Initializing {}", pdf2audio::APP_NAME);

    let stdin_fd = io::stdin().as_raw_fd();
    if unsafe { libc::isatty(stdin_fd) } == 0 {
        return Err(Pdf2AudioError::Terminal(
            "an interactive terminal is required (stdin is not a TTY)".to_string(),
        ));
    }

    let config = Config::load()?;
    info!("Configuration loaded from {:?}", config.path());

    let engine = create_engine(&config.engine_options())?;
    let controller =
        Controller::new(share(engine)).with_default_extension(&config.default_extension());
    let mut state = State::new(config, controller, args.pdf_path);

    let keymap = create_default_keymap();
    info!("Key handler initialized with {} bindings", keymap.len());
    let mut form_handler = FormKeyHandler::new(keymap);

    unsafe {
        signal::signal(Signal::SIGWINCH, SigHandler::Handler(handle_sigwinch)).map_err(|e| {
            Pdf2AudioError::Terminal(format!("Failed to set SIGWINCH handler: {}", e))
        })?;
    }

    let mut poll = Poll::new()?;
    let mut stdin_source = mio::unix::SourceFd(&stdin_fd);
    poll.registry()
        .register(&mut stdin_source, STDIN, Interest::READABLE)?;
    let mut events = Events::with_capacity(16);

    let _guard = TermiosGuard::enter(stdin_fd)?;
    let (mut cols, _rows) = get_terminal_size(stdin_fd)?;
    info!("Terminal width {}", cols);

    let result = event_loop(
        &mut state,
        &mut form_handler,
        &mut poll,
        &mut events,
        stdin_fd,
        &mut cols,
    );

    state.controller.shutdown();
    result
}

fn event_loop(
    state: &mut State,
    form_handler: &mut FormKeyHandler,
    poll: &mut Poll,
    events: &mut Events,
    stdin_fd: std::os::unix::io::RawFd,
    cols: &mut u16,
) -> Result<()> {
    let mut last_frame = String::new();
    let mut stdout = io::stdout();

    info!("Entering event loop");
    while !state.should_quit {
        if RESIZE_PENDING.swap(false, Ordering::Relaxed) {
            *cols = get_terminal_size(stdin_fd)?.0;
            info!("Terminal resized to width {}", cols);
            last_frame.clear();
        }

        state.tick();

        let frame = render_form(state, *cols);
        if frame != last_frame {
            stdout.write_all(frame.as_bytes())?;
            stdout.flush()?;
            last_frame = frame;
        }

        match poll.poll(events, Some(TICK)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }

        for event in events.iter() {
            if event.token() == STDIN {
                handle_stdin(state, form_handler)?;
            }
        }
    }

    info!("Leaving event loop");
    Ok(())
}

/// Read available keys and route them to the active handler
fn handle_stdin(state: &mut State, form_handler: &mut FormKeyHandler) -> Result<()> {
    let mut buf = [0u8; 1024];

    let n = match io::stdin().read(&mut buf) {
        Ok(n) => n,
        Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    if n == 0 {
        // stdin closed
        state.quit();
        return Ok(());
    }

    let action = dispatch(&buf[..n], state, form_handler)?;
    debug!("Input handled: {:?}", action);
    Ok(())
}
