use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use ferrijson_core::api::Store;
use rustyline::DefaultEditor;
use tracing::debug;

mod commands;
mod display;
mod executor;
mod parser;

use display::OutputMode;

/// FerriJSON Console: interactive and scriptable CLI for JSON document files.
#[derive(Parser, Debug)]
#[command(name = "ferrijson", version)]
struct Cli {
    /// JSON file to operate on (default: ~/.local/share/ferrijson/default.json).
    file: Option<PathBuf>,

    /// Execute a command non-interactively (can be repeated).
    #[arg(short, long = "exec")]
    exec: Vec<String>,

    /// Output results as machine-parseable JSON.
    #[arg(short, long)]
    json: bool,

    /// Write the file without indentation.
    #[arg(long)]
    compact: bool,
}

fn default_file_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ferrijson")
        .join("default.json")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let path = cli.file.clone().unwrap_or_else(default_file_path);
    debug!(path = %path.display(), "opening store");

    let mut store = Store::builder(&path)
        .pretty(!cli.compact)
        .create_dirs(true)
        .open();

    if !cli.exec.is_empty() {
        let code = run_exec_mode(&mut store, &cli.exec, cli.json);
        process::exit(code);
    } else if !std::io::stdin().is_terminal() {
        let code = run_pipe_mode(&mut store, cli.json);
        process::exit(code);
    } else if let Err(e) = run_repl(&mut store) {
        eprintln!("Failed to initialize line editor: {e}");
        process::exit(1);
    }
}

fn output_mode(json_mode: bool) -> OutputMode {
    if json_mode {
        OutputMode::Json
    } else {
        OutputMode::Pretty
    }
}

/// Parse and execute one line, rendering the outcome.
///
/// Returns `Err(())` on the first parse or execution error, `Ok(false)` on EXIT.
fn run_line(store: &mut Store, line: &str, mode: &OutputMode) -> Result<bool, ()> {
    let cmd = match parser::parse(line) {
        Ok(cmd) => cmd,
        Err(e) => {
            display::render_error(&e, mode);
            return Err(());
        }
    };

    match executor::execute(store, cmd) {
        Ok(result) => Ok(display::render(&result, mode)),
        Err(e) => {
            display::render_error(&e, mode);
            Err(())
        }
    }
}

/// Execute one or more commands non-interactively (--exec mode).
///
/// Returns exit code: 0 = all succeeded, 1 = first error stops execution.
fn run_exec_mode(store: &mut Store, commands: &[String], json_mode: bool) -> i32 {
    let mode = output_mode(json_mode);

    for cmd_str in commands {
        match run_line(store, cmd_str, &mode) {
            Ok(true) => {}
            Ok(false) => return 0,
            Err(()) => return 1,
        }
    }

    0
}

/// Read commands from stdin (pipe mode).
///
/// Returns exit code: 0 = all succeeded, 1 = first error.
fn run_pipe_mode(store: &mut Store, json_mode: bool) -> i32 {
    let mode = output_mode(json_mode);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                display::render_error(&e, &mode);
                return 1;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match run_line(store, trimmed, &mode) {
            Ok(true) => {}
            Ok(false) => return 0, // EXIT command
            Err(()) => return 1,
        }
    }

    0
}

/// Interactive REPL mode. Errors are printed and the session continues.
fn run_repl(store: &mut Store) -> rustyline::Result<()> {
    println!("FerriJSON Console v0.1.0");
    println!("File: {}", store.path().display());
    println!("Type HELP for available commands.\n");

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("ferrijson> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let cmd = match parser::parse(trimmed) {
                    Ok(cmd) => cmd,
                    Err(e) => {
                        display::print_error(&e);
                        continue;
                    }
                };

                match executor::execute(store, cmd) {
                    Ok(result) => {
                        if !display::render(&result, &OutputMode::Pretty) {
                            break; // EXIT command
                        }
                    }
                    Err(e) => display::print_error(&e),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!();
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("Bye!");
                break;
            }
            Err(e) => {
                eprintln!("Readline error: {e}");
                break;
            }
        }
    }

    Ok(())
}
