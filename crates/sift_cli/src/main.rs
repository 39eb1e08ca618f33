//! # Commands
//!
//! - `sift scan` - Scan a directory tree and write a match report
//! - `sift rules` - List the loaded detection rules

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod commands;
mod ui;

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use console::style;
use sift_core::prelude::*;

use crate::ui::colors;

fn parse_tier(s: &str) -> Result<Tier, String> {
    match s.to_lowercase().as_str() {
        "1" | "simple" => Ok(Tier::Simple),
        "2" | "standard" => Ok(Tier::Standard),
        "3" | "detailed" => Ok(Tier::Detailed),
        _ => Err(format!("invalid tier '{s}' (expected 1, 2, or 3)")),
    }
}

const REPO_URL: &str = "https://github.com/spikermint/sift";

#[derive(Debug, Parser)]
#[command(
    name = "sift",
    version,
    styles = ui::clap_styles(),
    arg_required_else_help = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(visible_alias = "s")]
    Scan(ScanArgs),

    #[command(visible_alias = "r")]
    Rules(RulesArgs),
}

/// Arguments for the `sift scan` command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Directory tree to scan.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub directory: PathBuf,

    /// File the report is written to.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: PathBuf,

    /// Report tier: 1 (simple), 2 (standard), or 3 (detailed).
    #[arg(short = 't', long, value_parser = parse_tier, default_value = "1")]
    pub tier: Tier,

    /// Path to the rules file.
    #[arg(short, long, value_name = "PATH", default_value = sift_core::RULES_FILENAME)]
    pub rules: PathBuf,

    /// Path to the scan configuration file.
    #[arg(short, long, value_name = "PATH", default_value = sift_core::CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the `sift rules` command.
#[derive(Debug, Parser)]
pub struct RulesArgs {
    /// Path to the rules file.
    #[arg(short, long, value_name = "PATH", default_value = sift_core::RULES_FILENAME)]
    pub rules: PathBuf,

    /// Show each rule's patterns as well.
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() {
    #[cfg(feature = "tracing")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).without_time())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let cli = parse_cli();

    if let Err(e) = run(cli.command) {
        ui::print_error(&format!("{e:#}"));
        std::process::exit(ui::exit::ERROR);
    }
}

fn parse_cli() -> Cli {
    let cmd = Cli::command().about(build_about()).after_help(build_after_help());

    let matches = cmd.get_matches();

    #[expect(clippy::expect_used, reason = "clap already validated args; this cannot fail")]
    Cli::from_arg_matches(&matches).expect("failed to parse arguments")
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Scan(args) => commands::scan::run(&args),
        Command::Rules(args) => commands::rules::run(&args.rules, args.verbose),
    }
}

fn build_about() -> String {
    format!(
        r"
  {} scans a file tree for sensitive information - credentials,
  tokens, internal URLs - using a configurable YAML rule set, and
  writes a categorised, deduplicated report. Works offline.",
        colors::accent().apply_to("sift").bold()
    )
}

fn build_after_help() -> String {
    format!(
        r"
  {}
    sift scan -d . -o report.txt          Scan the current directory
    sift scan -d src -o report.txt -t 2   Report with file/line locations
    sift scan -d . -o report.txt -t 3     One field per line, per match
    sift rules                            List loaded rules
    sift rules -v                         ...including their patterns

  Learn more: {}",
        style("Examples:").bold(),
        colors::accent().apply_to(REPO_URL).underlined()
    )
}
