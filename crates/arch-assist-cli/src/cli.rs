//! CLI/headless mode for scripting and testing
//!
//! Usage:
//!   arch-assist --cli catalog                 List the materials catalog
//!   arch-assist --cli capture                 Capture both screens interactively
//!   arch-assist --cli export --set ...        Build the CSV export
//!
//! Options:
//!   --set "Category:Material=N"   Quantity for one material (repeatable)
//!   --out <dir>                   Output folder
//!   --stdout                      Print the CSV instead of saving it
//!   --copy                        Also copy the CSV to the clipboard
//!   --json                        Output in JSON format

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use arch_assist_core::{
    build_csv, copy_to_clipboard, default_backends, identify, save_csv, CaptureFlow,
    CaptureStep, Catalog, Config, FlowUpdate, HostMode, SystemClipboard, TerminalClipboard,
    TranscriptionForm,
};
use thiserror::Error;

/// CLI command to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Catalog,
    Capture {
        out: Option<PathBuf>,
    },
    Export {
        settings: Vec<QuantitySetting>,
        out: Option<PathBuf>,
        stdout: bool,
        copy: bool,
    },
}

/// CLI options
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub json: bool,
}

/// One `--set "Category:Material=N"` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantitySetting {
    pub category: String,
    pub material: String,
    pub value: String,
}

/// Bad command line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    #[error("No command specified. Use: catalog, capture or export")]
    MissingCommand,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{0} requires a value")]
    MissingValue(&'static str),

    #[error("Invalid --set '{0}'. Expected \"Category:Material=N\"")]
    InvalidSetting(String),

    #[error("{0} only applies to the export command")]
    ExportOnly(&'static str),
}

/// Parse CLI arguments and return command + options
pub fn parse_args(args: &[String]) -> Result<(CliCommand, CliOptions), ArgError> {
    let mut options = CliOptions::default();
    let mut command: Option<&str> = None;
    let mut settings = Vec::new();
    let mut out = None;
    let mut stdout = false;
    let mut copy = false;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--json" => options.json = true,
            "--stdout" => stdout = true,
            "--copy" => copy = true,
            "--out" => {
                i += 1;
                let value = args.get(i).ok_or(ArgError::MissingValue("--out"))?;
                out = Some(PathBuf::from(value));
            }
            "--set" => {
                i += 1;
                let value = args.get(i).ok_or(ArgError::MissingValue("--set"))?;
                settings.push(parse_setting(value)?);
            }
            "catalog" | "capture" | "export" if command.is_none() => command = Some(arg.as_str()),
            _ => return Err(ArgError::UnknownCommand(arg.clone())),
        }
        i += 1;
    }

    let command = match command {
        Some("catalog") | Some("capture") if !settings.is_empty() => {
            return Err(ArgError::ExportOnly("--set"))
        }
        Some("catalog") | Some("capture") if stdout => return Err(ArgError::ExportOnly("--stdout")),
        Some("catalog") | Some("capture") if copy => return Err(ArgError::ExportOnly("--copy")),
        Some("catalog") => CliCommand::Catalog,
        Some("capture") => CliCommand::Capture { out },
        Some(_) => CliCommand::Export {
            settings,
            out,
            stdout,
            copy,
        },
        None => return Err(ArgError::MissingCommand),
    };

    Ok((command, options))
}

/// Parse `Category:Material=N`; the material name may itself contain ':'
fn parse_setting(s: &str) -> Result<QuantitySetting, ArgError> {
    let invalid = || ArgError::InvalidSetting(s.to_string());
    let (name, value) = s.rsplit_once('=').ok_or_else(invalid)?;
    let (category, material) = name.split_once(':').ok_or_else(invalid)?;

    let category = category.trim();
    let material = material.trim();
    if category.is_empty() || material.is_empty() {
        return Err(invalid());
    }

    Ok(QuantitySetting {
        category: category.to_string(),
        material: material.to_string(),
        value: value.to_string(),
    })
}

/// Run CLI command
pub fn run(command: CliCommand, options: CliOptions) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let config = Config::load();

    runtime.block_on(async {
        match command {
            CliCommand::Catalog => run_catalog(&config, options).await,
            CliCommand::Capture { out } => run_capture(&config, out, options).await,
            CliCommand::Export {
                settings,
                out,
                stdout,
                copy,
            } => run_export(&config, &settings, out, stdout, copy, options).await,
        }
    })
}

async fn run_catalog(config: &Config, options: CliOptions) -> anyhow::Result<()> {
    let catalog = Catalog::load(&config.catalog_path).await?;

    if options.json {
        println!(
            "{}",
            serde_json::json!({
                "path": config.catalog_path.to_string_lossy(),
                "categories": catalog.categories(),
                "materials": catalog.len(),
            })
        );
    } else {
        println!("Materials catalog ({}):", config.catalog_path.display());
        println!();
        for category in catalog.categories() {
            println!("{} ({}):", category.name, category.items.len());
            for item in &category.items {
                println!("  - {}", item);
            }
        }
        println!();
        println!("{} materials in {} categories", catalog.len(), catalog.categories().len());
    }

    Ok(())
}

async fn run_capture(
    config: &Config,
    out: Option<PathBuf>,
    options: CliOptions,
) -> anyhow::Result<()> {
    let session = identify(&config.manifest_path, default_backends(&config.capture));
    let adapter = match &session.mode {
        HostMode::Attached(adapter) => adapter.clone(),
        HostMode::Standalone => anyhow::bail!(session.standalone_notice()),
    };

    let mut flow = CaptureFlow::new(config.liveness_timeout());
    let status = flow.start(adapter.is_available(), Instant::now());
    eprintln!("{}", status.text);

    let stdin = std::io::stdin();
    for step in [CaptureStep::First, CaptureStep::Second] {
        loop {
            eprint!("Press Enter to capture {}...", step.label());
            std::io::stderr().flush()?;
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                anyhow::bail!("Input closed before {} was captured", step.label());
            }

            let ticket = flow.begin_capture(step)?;
            let result = adapter.request_capture().await;
            let retryable = result.as_ref().err().map(|e| e.is_retryable());

            match flow.complete_capture(ticket, result) {
                FlowUpdate::Retry(status) => {
                    eprintln!("{}", status.text);
                    if retryable == Some(false) {
                        anyhow::bail!("Capture cannot be retried");
                    }
                }
                update => {
                    if let Some(status) = update.status() {
                        eprintln!("{}", status.text);
                    }
                    break;
                }
            }
        }
    }

    let out_dir = out.unwrap_or_else(|| config.export_dir.clone());
    std::fs::create_dir_all(&out_dir)?;

    let mut saved = Vec::new();
    for (step, capture) in [(CaptureStep::First, flow.first()), (CaptureStep::Second, flow.second())] {
        let Some(capture) = capture else {
            continue;
        };
        let path = out_dir.join(format!("screen-{}.png", step.number()));
        capture.preview().save_to_file(&path)?;
        saved.push((path, capture));
    }

    if options.json {
        let captures: Vec<_> = saved
            .iter()
            .map(|(path, capture)| {
                serde_json::json!({
                    "path": path.to_string_lossy(),
                    "width": capture.preview().width,
                    "height": capture.preview().height,
                    "backend": capture.backend(),
                    "source": capture.raw().describe(),
                    "captured_at": capture.captured_at().to_rfc3339(),
                })
            })
            .collect();
        println!("{}", serde_json::json!({ "captures": captures }));
    } else {
        for (path, capture) in &saved {
            println!(
                "Saved {}x{} capture to {} (source: {})",
                capture.preview().width,
                capture.preview().height,
                path.display(),
                capture.raw().describe()
            );
        }
    }

    Ok(())
}

async fn run_export(
    config: &Config,
    settings: &[QuantitySetting],
    out: Option<PathBuf>,
    stdout: bool,
    copy: bool,
    options: CliOptions,
) -> anyhow::Result<()> {
    let catalog = Catalog::load(&config.catalog_path).await?;
    let form = fill_form(&catalog, settings)?;
    let csv = build_csv(&form.rows())?;

    let saved = if stdout {
        println!("{}", csv);
        None
    } else {
        let dir = out.unwrap_or_else(|| config.export_dir.clone());
        Some(save_csv(&csv, &dir)?)
    };

    let copied = if copy {
        match copy_to_clipboard(
            &csv,
            &SystemClipboard::detect(),
            &TerminalClipboard::new(std::io::stderr()),
        ) {
            Ok(outcome) => Some(outcome.backend().to_string()),
            Err(e) => {
                eprintln!("Warning: {}", e);
                None
            }
        }
    } else {
        None
    };

    if !stdout {
        print_export_result(saved.as_deref(), form.len(), copied.as_deref(), options);
    }

    Ok(())
}

/// Build the form and apply every `--set`
fn fill_form(catalog: &Catalog, settings: &[QuantitySetting]) -> anyhow::Result<TranscriptionForm> {
    let mut form = TranscriptionForm::new(catalog);
    for setting in settings {
        let index = form
            .find(&setting.category, &setting.material)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown material '{}' in category '{}'",
                    setting.material,
                    setting.category
                )
            })?;
        form.apply_input(index, &setting.value).map_err(|e| {
            anyhow::anyhow!("{}:{}: {}", setting.category, setting.material, e)
        })?;
    }
    Ok(form)
}

fn print_export_result(path: Option<&Path>, rows: usize, copied: Option<&str>, options: CliOptions) {
    if options.json {
        println!(
            "{}",
            serde_json::json!({
                "path": path.map(|p| p.to_string_lossy()),
                "rows": rows,
                "copied_via": copied,
            })
        );
    } else {
        if let Some(path) = path {
            println!("Saved {} rows to {}", rows, path.display());
        }
        if let Some(backend) = copied {
            println!("Copied CSV via {}", backend);
        }
    }
}

/// Print CLI help
pub fn print_help() {
    println!("arch-assist CLI Mode");
    println!();
    println!("USAGE:");
    println!("    arch-assist --cli <command> [options]");
    println!();
    println!("COMMANDS:");
    println!("    catalog                     List the materials catalog");
    println!("    capture                     Capture Screen 1 and Screen 2, save previews");
    println!("    export                      Build and save the CSV export");
    println!();
    println!("OPTIONS:");
    println!("    --set \"Category:Material=N\" Quantity for one material (export, repeatable)");
    println!("    --out <dir>                 Output folder (capture, export)");
    println!("    --stdout                    Print the CSV instead of saving it (export)");
    println!("    --copy                      Also copy the CSV to the clipboard (export)");
    println!("    --json                      Output in JSON format");
    println!();
    println!("EXAMPLES:");
    println!("    arch-assist --cli catalog --json");
    println!("    arch-assist --cli capture --out ./captures");
    println!("    arch-assist --cli export --set \"Agnostic:Samite silk=12\" --stdout");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_setting() {
        let setting = parse_setting("Metals:Iron=3").unwrap();
        assert_eq!(setting.category, "Metals");
        assert_eq!(setting.material, "Iron");
        assert_eq!(setting.value, "3");

        let setting = parse_setting("Zarosian:Ancient: vis=12").unwrap();
        assert_eq!(setting.material, "Ancient: vis");

        assert!(parse_setting("Iron=3").is_err());
        assert!(parse_setting("Metals:Iron").is_err());
        assert!(parse_setting(":Iron=3").is_err());
    }

    #[test]
    fn test_parse_args_catalog() {
        let (cmd, options) = parse_args(&args(&["catalog", "--json"])).unwrap();
        assert_eq!(cmd, CliCommand::Catalog);
        assert!(options.json);
    }

    #[test]
    fn test_parse_args_capture_with_out() {
        let (cmd, _) = parse_args(&args(&["capture", "--out", "shots"])).unwrap();
        assert_eq!(
            cmd,
            CliCommand::Capture {
                out: Some(PathBuf::from("shots"))
            }
        );
    }

    #[test]
    fn test_parse_args_export() {
        let (cmd, _) = parse_args(&args(&[
            "export",
            "--set",
            "Metals:Iron=3",
            "--set",
            "Metals:Gold=1",
            "--stdout",
            "--copy",
        ]))
        .unwrap();

        match cmd {
            CliCommand::Export {
                settings,
                out,
                stdout,
                copy,
            } => {
                assert_eq!(settings.len(), 2);
                assert_eq!(settings[1].material, "Gold");
                assert!(out.is_none());
                assert!(stdout);
                assert!(copy);
            }
            other => panic!("Expected Export command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_args_errors() {
        assert_eq!(parse_args(&[]).unwrap_err(), ArgError::MissingCommand);
        assert_eq!(
            parse_args(&args(&["sync"])).unwrap_err(),
            ArgError::UnknownCommand("sync".into())
        );
        assert_eq!(
            parse_args(&args(&["export", "--out"])).unwrap_err(),
            ArgError::MissingValue("--out")
        );
        assert_eq!(
            parse_args(&args(&["catalog", "--set", "Metals:Iron=1"])).unwrap_err(),
            ArgError::ExportOnly("--set")
        );
    }

    #[test]
    fn test_fill_form_applies_settings() {
        let catalog = Catalog::from_categories([("Metals", vec!["Iron", "Gold"])]);
        let settings = vec![parse_setting("metals:iron=3").unwrap()];

        let form = fill_form(&catalog, &settings).unwrap();
        assert_eq!(
            build_csv(&form.rows()).unwrap(),
            "Category,Material,Quantity\nMetals,Iron,3\nMetals,Gold,0"
        );
    }

    #[test]
    fn test_fill_form_rejects_unknown_and_invalid() {
        let catalog = Catalog::from_categories([("Metals", vec!["Iron"])]);

        let unknown = vec![parse_setting("Metals:Tin=1").unwrap()];
        assert!(fill_form(&catalog, &unknown).is_err());

        let negative = vec![parse_setting("Metals:Iron=-1").unwrap()];
        assert!(fill_form(&catalog, &negative).is_err());
    }
}
