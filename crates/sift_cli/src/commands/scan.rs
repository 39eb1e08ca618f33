//! Scan command - walks a directory tree and writes a match report.

use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::Context as _;
use sift_core::prelude::*;

use crate::ScanArgs;
use crate::ui::{self, colors, create_file_progress, format_duration, indicators, pluralise_word, print_command_header};

/// Executes the `sift scan` command.
pub fn run(args: &ScanArgs) -> super::Result {
    let start = Instant::now();

    print_command_header("scan");

    let config = ScanConfig::load(&args.config).context("loading scan configuration")?;
    let rules = RuleSet::load(&args.rules).context("loading rules")?;

    if rules.is_empty() {
        ui::print_warning("no rules loaded - the report will be empty");
    }

    let cancel = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(Arc::clone(&cancel))?;

    let mut scanner = TreeScanner::new(rules, config.suffix_policy()).with_cancel_flag(Arc::clone(&cancel));
    if let Some(limit) = config.max_file_size {
        scanner = scanner.with_max_file_size(limit);
    }

    let outcome = run_walk(&scanner, &args.directory, !args.no_progress);

    let ScanOutcome {
        matches,
        files_scanned,
        files_skipped,
        files_unreadable,
        interrupted,
    } = outcome;

    let matches = Refinery::standard().refine(matches, scanner.rules());

    write_report_file(&args.output, &matches, args.tier, interrupted)?;

    print_summary(&SummaryInfo {
        files_scanned,
        files_skipped,
        files_unreadable,
        total_matches: matches.total(),
        output: &args.output,
        elapsed: start.elapsed(),
    });

    if interrupted {
        ui::print_warning("scan interrupted - partial results written");
        std::process::exit(ui::exit::INTERRUPTED);
    }

    Ok(())
}

fn run_walk(scanner: &TreeScanner, directory: &Path, show_progress: bool) -> ScanOutcome {
    if show_progress {
        let pb = create_file_progress(count_files(directory));
        let outcome = scanner.scan(directory, &mut |_| pb.inc(1));
        pb.finish_and_clear();
        outcome
    } else {
        scanner.scan(directory, &mut |_| {})
    }
}

fn install_interrupt_handler(cancel: Arc<AtomicBool>) -> super::Result {
    ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed))
        .context("failed to install interrupt handler")?;
    Ok(())
}

fn write_report_file(path: &Path, matches: &MatchSet, tier: Tier, interrupted: bool) -> super::Result {
    let file =
        File::create(path).with_context(|| format!("failed to create report file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    write_report(matches, tier, interrupted, &mut writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("failed to write report to {}", path.display()))?;

    Ok(())
}

struct SummaryInfo<'a> {
    files_scanned: usize,
    files_skipped: usize,
    files_unreadable: usize,
    total_matches: usize,
    output: &'a Path,
    elapsed: std::time::Duration,
}

fn print_summary(info: &SummaryInfo) {
    println!(
        "{} scanned {} {} in {}",
        colors::success().apply_to(indicators::SUCCESS),
        info.files_scanned,
        pluralise_word(info.files_scanned, "file", "files"),
        format_duration(info.elapsed),
    );

    if info.files_skipped > 0 {
        println!(
            "  {}",
            colors::muted().apply_to(format!(
                "{} {} skipped by suffix policy",
                info.files_skipped,
                pluralise_word(info.files_skipped, "file", "files")
            ))
        );
    }

    if info.files_unreadable > 0 {
        ui::print_warning(&format!(
            "{} unreadable {} skipped",
            info.files_unreadable,
            pluralise_word(info.files_unreadable, "file", "files")
        ));
    }

    ui::print_info(&format!(
        "{} {} written to {}",
        info.total_matches,
        pluralise_word(info.total_matches, "match", "matches"),
        info.output.display()
    ));
}
