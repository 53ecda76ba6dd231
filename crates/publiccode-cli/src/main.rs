//! publiccode - validate publiccode.yml manifests from the shell
//!
//! Thin front-end over `publiccode-core`: one parser session, one
//! parse per file, a human or JSON report, and a non-zero exit code
//! when any file fails validation.

mod cli;
mod report;

use anyhow::Context;
use cli::Cli;
use colored::{control, Colorize};
use publiccode_core::{Parser, ParserConfig};
use report::FileReport;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());
    init_logging(&cli);

    match run(&cli) {
        Ok(all_valid) => process::exit(if all_valid { 0 } else { 1 }),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            process::exit(2);
        }
    }
}

/// Verbosity mapping: `-q` errors only, default warn, `-v` info,
/// `-vv` debug, `-vvv` trace. `RUST_LOG` overrides all of it.
fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let config = ParserConfig::new()
        .with_network(cli.network)
        .with_branch(cli.branch.clone())
        .with_base_url(cli.base_url.clone());

    tracing::info!(?config, "opening parser session");
    let parser = Parser::new(config).context("failed to initialize the publiccode parser")?;

    let reports: Vec<FileReport> = cli
        .files
        .iter()
        .map(|file| FileReport::from_parse(file, parser.parse_file(file)))
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            report.print(cli.quiet);
        }
    }

    Ok(reports.iter().all(|r| r.valid))
}
