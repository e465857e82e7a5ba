//! Mochi Headless Terminal Runner
//!
//! Feeds a byte stream through the emulation engine without a GUI and
//! prints the resulting screen. Useful for testing and for deterministic
//! snapshots.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use mochi_vt::{Emulator, ResolveOptions, Terminal, TerminalSpec};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Parse command line arguments
    let mut spec: Option<TerminalSpec> = None;
    let mut emulator: Option<Emulator> = None;
    let mut rows: Option<usize> = None;
    let mut cols: Option<usize> = None;
    let mut config_file: Option<PathBuf> = None;
    let mut input_file: Option<PathBuf> = None;
    let mut output_format = OutputFormat::Json;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-s" | "--spec" => {
                i += 1;
                if i < args.len() {
                    match parse_name(&args[i]) {
                        Some(value) => spec = Some(value),
                        None => {
                            eprintln!("Unknown spec '{}'", args[i]);
                            return ExitCode::FAILURE;
                        },
                    }
                }
            },
            "-e" | "--emulator" => {
                i += 1;
                if i < args.len() {
                    match parse_name(&args[i]) {
                        Some(value) => emulator = Some(value),
                        None => {
                            eprintln!("Unknown emulator '{}'", args[i]);
                            return ExitCode::FAILURE;
                        },
                    }
                }
            },
            "-r" | "--rows" => {
                i += 1;
                if i < args.len() {
                    rows = args[i].parse().ok();
                }
            },
            "-c" | "--cols" => {
                i += 1;
                if i < args.len() {
                    cols = args[i].parse().ok();
                }
            },
            "--config" => {
                i += 1;
                if i < args.len() {
                    config_file = Some(PathBuf::from(&args[i]));
                }
            },
            "-f" | "--file" => {
                i += 1;
                if i < args.len() {
                    input_file = Some(PathBuf::from(&args[i]));
                }
            },
            "-j" | "--json" => {
                output_format = OutputFormat::Json;
            },
            "-t" | "--text" => {
                output_format = OutputFormat::Text;
            },
            "-h" | "--help" => {
                show_help = true;
            },
            _ => {
                // Treat as input file if no flag
                if input_file.is_none() && !args[i].starts_with('-') {
                    input_file = Some(PathBuf::from(&args[i]));
                }
            },
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    // Build options: config file first, then command-line flags on top
    let mut options = match &config_file {
        Some(path) => match ResolveOptions::load(path) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            },
        },
        None => ResolveOptions::default(),
    };
    options.spec = spec.or(options.spec);
    options.emulator = emulator.or(options.emulator);
    options.features.initial_rows = rows.or(options.features.initial_rows);
    options.features.initial_columns = cols.or(options.features.initial_columns);

    let mut terminal = match Terminal::new(&options) {
        Ok(terminal) => terminal,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        },
    };

    // Read input
    let input_data = match &input_file {
        Some(path) => match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            },
        },
        None => {
            let mut data = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut data) {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            data
        },
    };

    terminal.write(&input_data);
    let responses = terminal.take_responses();
    if !responses.is_empty() {
        tracing::info!(count = responses.len(), "discarding terminal responses");
    }

    // Output result
    let state = terminal.snapshot();
    match output_format {
        OutputFormat::Text => {
            let cursor = state.cursor();
            println!(
                "Terminal State ({}x{}, {}):",
                state.columns(),
                state.rows(),
                terminal.capabilities().spec
            );
            println!("Cursor: ({}, {})", cursor.row, cursor.column);
            println!("---");
            println!("{}", state.to_text());
            println!("---");
        },
        OutputFormat::Json => match serde_json::to_string_pretty(state) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing snapshot: {}", e);
                return ExitCode::FAILURE;
            },
        },
    }

    ExitCode::SUCCESS
}

/// Parse a lowercase name such as `vt220` or `xterm` through its serde form
fn parse_name<T: serde::de::DeserializeOwned>(name: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(name.to_ascii_lowercase())).ok()
}

fn print_help() {
    println!("Mochi Headless Terminal Runner");
    println!();
    println!("Usage: mochi-headless [OPTIONS] [INPUT_FILE]");
    println!();
    println!("Options:");
    println!("  -s, --spec <NAME>      Terminal spec: vt100, vt102, vt220 (default), vt240,");
    println!("                         vt320, vt340, vt420, vt510, vt520, vt525");
    println!("  -e, --emulator <NAME>  Emulator overlay: xterm");
    println!("  -r, --rows <N>         Set terminal height (default: 24)");
    println!("  -c, --cols <N>         Set terminal width (default: 80)");
    println!("      --config <PATH>    Load options from a JSON file");
    println!("  -f, --file <PATH>      Read input from file");
    println!("  -j, --json             Output snapshot as JSON (default)");
    println!("  -t, --text             Output screen as plain text");
    println!("  -h, --help             Show this help message");
    println!();
    println!("If no input file is specified, reads from stdin.");
    println!("Logging goes to stderr and is controlled by RUST_LOG (default: warn).");
    println!();
    println!("Examples:");
    println!("  echo -e 'Hello\\x1b[31mWorld\\x1b[0m' | mochi-headless --emulator xterm --text");
    println!("  mochi-headless --spec vt100 -c 132 -r 24 input.bin");
    println!("  mochi-headless --config terminal.json < test.bin > snapshot.json");
}
