//! arch-assist - Archaeology Material Storage capture and transcription helper
//!
//! Usage:
//!   arch-assist              Run TUI mode (default)
//!   arch-assist --cli <cmd>  Run CLI mode (headless)
//!   arch-assist --help       Show help

use std::fs::File;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use arch_assist_core::{default_backends, identify, Config};
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod event;
mod screens;
mod tui;
#[cfg(test)]
mod tui_test;
mod widgets;
mod worker;

use app::App;
use worker::Worker;

/// Log file used while the terminal UI owns the screen
const LOG_FILE: &str = "arch-assist.log";

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // Check for --help
    if args.iter().any(|a| a == "--help" || a == "-h") && !args.iter().any(|a| a == "--cli") {
        print_help();
        return Ok(());
    }

    // Check for --cli flag
    if let Some(cli_pos) = args.iter().position(|a| a == "--cli") {
        // Get args after --cli
        let cli_args: Vec<String> = args.iter().skip(cli_pos + 1).cloned().collect();

        if cli_args.is_empty() || cli_args.iter().any(|a| a == "--help" || a == "-h") {
            cli::print_help();
            return Ok(());
        }

        match cli::parse_args(&cli_args) {
            Ok((command, options)) => {
                init_cli_logging();
                return cli::run(command, options);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                cli::print_help();
                std::process::exit(1);
            }
        }
    }

    // Default: TUI mode
    init_logging();
    run()
}

fn print_help() {
    println!("arch-assist v{}", env!("CARGO_PKG_VERSION"));
    println!("Capture your archaeology Material Storage and export material counts as CSV");
    println!();
    println!("USAGE:");
    println!("    arch-assist [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --cli <cmd>     Run in CLI mode (headless, for scripting)");
    println!("    --help          Show this help message");
    println!();
    println!("By default, arch-assist runs in TUI (terminal) mode.");
    println!("Logs are written to {} (set RUST_LOG to adjust).", LOG_FILE);
    println!();
    println!("For CLI mode help: arch-assist --cli --help");
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn init_logging() {
    // For TUI apps, log to a file to avoid corrupting the terminal display
    // If file creation fails, logging is simply disabled (no subscriber set)
    if let Ok(log_file) = File::create(LOG_FILE) {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter("info"))
            .with_target(false)
            .with_ansi(false)
            .with_writer(log_file)
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn init_cli_logging() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run() -> anyhow::Result<()> {
    let config = Config::load();

    // Probe capture backends once, before taking over the terminal
    let session = identify(&config.manifest_path, default_backends(&config.capture));

    // Take over the terminal; restored when the guard drops
    let mut guard = tui::TerminalGuard::enter()?;

    // Set up worker communication
    let (app_tx, app_rx) = mpsc::channel();
    let worker = Worker::spawn(session.mode.adapter(), app_tx);

    let mut app = App::new(&session, &config).with_channels(worker.sender(), app_rx);

    // Main event loop
    loop {
        // Render
        guard.terminal().draw(|frame| app.render(frame))?;

        // Handle input events
        if let Some(key) = event::poll(Duration::from_millis(50))? {
            app.handle_key(key);
        }

        // Process worker messages
        app.process_worker_messages();
        app.tick(Instant::now());

        // Check for quit
        if app.should_quit {
            break;
        }
    }

    // Shutdown worker
    worker.shutdown();

    Ok(())
}
