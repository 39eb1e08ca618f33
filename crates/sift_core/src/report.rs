//! Report rendering at three verbosity tiers.
//!
//! Rendering is a pure formatting step: every filtering decision has
//! already been made by the walker and the refinery. Reports carry no
//! colour codes, so they are safe to write straight to a file.

use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::matches::{Match, MatchSet};

/// Report verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Per rule: the distinct, sorted matched substrings. Answers "what
    /// was found", not "where".
    Simple,
    /// Per rule (empty rules announced): one dense line per match with
    /// rule, path, line, and substring.
    Standard,
    /// Standard's coverage with one field per line and a blank line
    /// between matches, for visually scanning large matches.
    Detailed,
}

/// Writes the full report for `matches` at the given tier.
///
/// Every tier starts with a header carrying the total match count; an
/// interrupted scan adds an explicit partial-results marker so the
/// report cannot be mistaken for a completed run.
pub fn write_report(matches: &MatchSet, tier: Tier, interrupted: bool, writer: &mut dyn Write) -> io::Result<()> {
    writeln!(writer, "total matches: {}", matches.total())?;
    if interrupted {
        writeln!(writer, "scan interrupted: results are partial")?;
    }
    writeln!(writer)?;

    match tier {
        Tier::Simple => write_simple(matches, writer),
        Tier::Standard => write_standard(matches, writer),
        Tier::Detailed => write_detailed(matches, writer),
    }
}

fn write_simple(matches: &MatchSet, writer: &mut dyn Write) -> io::Result<()> {
    for (rule, rule_matches) in matches.iter() {
        if rule_matches.is_empty() {
            continue;
        }

        let distinct: BTreeSet<&str> = rule_matches.iter().map(|m| m.text.as_ref()).collect();

        writeln!(writer, "[{rule}]")?;
        for text in distinct {
            writeln!(writer, "{text}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn write_standard(matches: &MatchSet, writer: &mut dyn Write) -> io::Result<()> {
    for (rule, rule_matches) in matches.iter() {
        writeln!(writer, "[{rule}] {}", count_label(rule_matches.len()))?;
        for m in rule_matches {
            writeln!(writer, "{rule}:{}:{}: {}", m.path.display(), m.line, m.text)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn write_detailed(matches: &MatchSet, writer: &mut dyn Write) -> io::Result<()> {
    for (rule, rule_matches) in matches.iter() {
        writeln!(writer, "[{rule}] {}", count_label(rule_matches.len()))?;
        writeln!(writer)?;
        for m in rule_matches {
            write_match_block(rule, m, writer)?;
        }
    }
    Ok(())
}

fn write_match_block(rule: &str, m: &Match, writer: &mut dyn Write) -> io::Result<()> {
    writeln!(writer, "rule: {rule}")?;
    writeln!(writer, "file: {}", m.path.display())?;
    writeln!(writer, "line: {}", m.line)?;
    writeln!(writer, "match: {}", m.text)?;
    writeln!(writer)
}

fn count_label(count: usize) -> String {
    if count == 1 {
        "1 match".to_string()
    } else {
        format!("{count} matches")
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::scanner::scan_content;
    use crate::test_utils::make_ruleset;

    fn render(matches: &MatchSet, tier: Tier, interrupted: bool) -> String {
        let mut buffer = Vec::new();
        write_report(matches, tier, interrupted, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn sample_matches() -> (crate::rules::RuleSet, MatchSet) {
        let rules = make_ruleset(&[("token", &[r"TOKEN_[A-Z]{4}"]), ("quiet", &[r"NEVER_MATCHES_\d{9}"])]);
        let mut matches = scan_content("TOKEN_AAAA\nTOKEN_BBBB", Path::new("a.txt"), &rules);
        matches.merge(scan_content("TOKEN_AAAA", Path::new("b.txt"), &rules));
        (rules, matches)
    }

    #[test]
    fn header_reports_total_match_count() {
        let (_, matches) = sample_matches();
        let report = render(&matches, Tier::Simple, false);
        assert!(report.starts_with("total matches: 3\n"));
    }

    #[test]
    fn header_marks_interrupted_runs() {
        let (_, matches) = sample_matches();

        let complete = render(&matches, Tier::Standard, false);
        let partial = render(&matches, Tier::Standard, true);

        assert!(!complete.contains("partial"));
        assert!(partial.contains("scan interrupted: results are partial"));
    }

    #[test]
    fn simple_tier_deduplicates_and_sorts_substrings() {
        let (_, matches) = sample_matches();
        let report = render(&matches, Tier::Simple, false);

        // TOKEN_AAAA appears in two files but is printed once.
        assert_eq!(report.matches("TOKEN_AAAA").count(), 1);
        let aaaa = report.find("TOKEN_AAAA").unwrap();
        let bbbb = report.find("TOKEN_BBBB").unwrap();
        assert!(aaaa < bbbb);
    }

    #[test]
    fn simple_tier_omits_file_and_line() {
        let (_, matches) = sample_matches();
        let report = render(&matches, Tier::Simple, false);

        assert!(!report.contains("a.txt"));
        assert!(!report.contains("b.txt"));
    }

    #[test]
    fn simple_tier_omits_empty_rules() {
        let (_, matches) = sample_matches();
        let report = render(&matches, Tier::Simple, false);

        assert!(!report.contains("quiet"));
    }

    #[test]
    fn standard_tier_announces_empty_rules() {
        let (_, matches) = sample_matches();
        let report = render(&matches, Tier::Standard, false);

        assert!(report.contains("[quiet] 0 matches"));
    }

    #[test]
    fn standard_tier_prints_one_dense_line_per_match_in_order() {
        let (_, matches) = sample_matches();
        let report = render(&matches, Tier::Standard, false);

        let lines: Vec<&str> = report.lines().filter(|l| l.starts_with("token:")).collect();
        assert_eq!(
            lines,
            vec![
                "token:a.txt:1: TOKEN_AAAA",
                "token:a.txt:2: TOKEN_BBBB",
                "token:b.txt:1: TOKEN_AAAA",
            ]
        );
    }

    #[test]
    fn detailed_tier_renders_one_field_per_line() {
        let (_, matches) = sample_matches();
        let report = render(&matches, Tier::Detailed, false);

        assert!(report.contains("rule: token\nfile: a.txt\nline: 1\nmatch: TOKEN_AAAA\n\n"));
    }

    #[test]
    fn detailed_tier_covers_every_match() {
        let (_, matches) = sample_matches();
        let report = render(&matches, Tier::Detailed, false);

        assert_eq!(report.matches("rule: token").count(), 3);
        assert!(report.contains("[quiet] 0 matches"));
    }

    #[test]
    fn empty_match_set_still_renders_a_header() {
        let rules = make_ruleset(&[]);
        let matches = MatchSet::for_rules(&rules);
        let report = render(&matches, Tier::Standard, false);

        assert!(report.starts_with("total matches: 0\n"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let (_, matches) = sample_matches();

        let first = render(&matches, Tier::Detailed, false);
        let second = render(&matches, Tier::Detailed, false);

        assert_eq!(first, second);
    }
}
