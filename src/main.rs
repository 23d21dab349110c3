//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ip_lookup` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Reading targets and user-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::io::{self, Read, Write};
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use ip_lookup::config::RESULT_POLL_INTERVAL;
use ip_lookup::initialization::init_logger_with;
use ip_lookup::report::{build_rows, render_table, sort_rows};
use ip_lookup::{
    export_report, prepare_targets_with_limit, Config, Opt, ProviderRegistry, ScanOptions,
    ScanReport, ScanRequest, ScanWorker,
};

fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try the current directory first, then the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();
    let config = Config::from(&opt);

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(&opt, config) {
        eprintln!("ip_lookup error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

fn run(opt: &Opt, config: Config) -> Result<()> {
    let input = read_targets(opt)?;
    let expansion = prepare_targets_with_limit(&input, config.max_cidr_hosts)?;
    for rejected in &expansion.rejected {
        eprintln!(
            "{} skipping '{}': {}",
            "warning:".yellow().bold(),
            rejected.target,
            rejected.reason
        );
    }

    let registry = ProviderRegistry::standard(&config);
    let total = expansion.ips.len();
    let handle = ScanWorker::spawn(ScanRequest {
        config,
        registry,
        ips: expansion.ips,
        options: ScanOptions {
            no_threat: opt.no_threat,
        },
    })?;

    let outcome = handle.wait(RESULT_POLL_INTERVAL, |handle| {
        eprint!(
            "\rScanning {} IP{}... {:.1}s",
            total,
            if total == 1 { "" } else { "s" },
            handle.elapsed().as_secs_f64()
        );
        let _ = io::stderr().flush();
    });
    eprint!("\r\x1b[2K");
    let report = outcome?;

    print_report(opt, &report);

    if let Some(path) = &opt.output {
        export_report(&report.results, path)
            .with_context(|| format!("Failed to save report to {}", path.display()))?;
        println!("Report saved to {}", path.display());
    }
    Ok(())
}

/// Collects targets from the positional arguments and `--file` (or stdin).
fn read_targets(opt: &Opt) -> Result<String> {
    let mut lines = opt.targets.join("\n");
    if let Some(file) = &opt.file {
        let contents = if file == Path::new("-") {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read targets from stdin")?;
            buffer
        } else {
            std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read targets from {}", file.display()))?
        };
        lines.push('\n');
        lines.push_str(&contents);
    }
    Ok(lines)
}

fn print_report(opt: &Opt, report: &ScanReport) {
    let mut rows = build_rows(&report.results);
    if let Some(column) = opt.sort_by {
        sort_rows(&mut rows, column, opt.reverse);
    }
    println!("{}", render_table(&rows));
    println!();
    println!(
        "✅ Looked up {} IP{} ({} private, {} geolocated) in {:.1}s",
        report.total_ips,
        if report.total_ips == 1 { "" } else { "s" },
        report.private_ips,
        report.geolocated,
        report.elapsed_seconds
    );
    if report.stats.total_failures() > 0 {
        println!(
            "{} {} provider call{} failed; see the log for details",
            "⚠️".yellow(),
            report.stats.total_failures(),
            if report.stats.total_failures() == 1 { "" } else { "s" }
        );
    }
}
