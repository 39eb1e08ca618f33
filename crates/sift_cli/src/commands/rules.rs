//! Rules command - lists the rules a rules file defines.

use std::path::Path;

use anyhow::Context as _;
use sift_core::prelude::*;

use crate::ui::{colors, pluralise_word, print_command_header};

/// Executes the `sift rules` command.
pub fn run(rules_path: &Path, verbose: bool) -> super::Result {
    print_command_header("rules");

    let rules = RuleSet::load(rules_path).context("loading rules")?;

    if rules.is_empty() {
        println!("no rules defined in {}", rules_path.display());
        return Ok(());
    }

    println!(
        "{} {} loaded from {}",
        rules.len(),
        pluralise_word(rules.len(), "rule", "rules"),
        colors::secondary().apply_to(rules_path.display())
    );
    println!();

    for rule in rules.rules() {
        print_rule(rule, verbose);
    }

    Ok(())
}

fn print_rule(rule: &Rule, verbose: bool) {
    println!(
        "  {}  {}",
        colors::accent().apply_to(format!("{:<24}", rule.name)),
        colors::muted().apply_to(format!(
            "{} {}",
            rule.patterns.len(),
            pluralise_word(rule.patterns.len(), "pattern", "patterns")
        ))
    );

    if verbose {
        for pattern in &rule.patterns {
            println!("      {}", colors::muted().apply_to(pattern.as_str()));
        }
    }
}
