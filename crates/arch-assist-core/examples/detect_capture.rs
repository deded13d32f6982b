//! Show which capture sources are detected on this machine

use arch_assist_core::config::{detect_screenshot_command, detect_screenshot_dir};
use arch_assist_core::{default_backends, CaptureAdapter, Config};

fn main() {
    println!("=== Capture Source Detection ===\n");

    println!("Detecting screenshot command...");
    match detect_screenshot_command() {
        Some(argv) => println!("  FOUND: {}", argv.join(" ")),
        None => println!("  NOT FOUND"),
    }

    println!("\nDetecting game screenshot folder...");
    match detect_screenshot_dir() {
        Some(path) => println!("  FOUND: {}", path.display()),
        None => println!("  NOT FOUND"),
    }

    let config = Config::load();
    let adapter = CaptureAdapter::probe(default_backends(&config.capture));
    println!(
        "\nSelected backend: {}",
        adapter.backend_name().unwrap_or("none (standalone)")
    );

    println!("\n=== Done ===");
}
