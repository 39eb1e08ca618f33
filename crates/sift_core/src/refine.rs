//! Cross-rule post-processing of aggregated matches.
//!
//! Most rules pass through untouched. The link rule is the exception:
//! its pattern is intentionally broad, so anything the url rule already
//! covers is suppressed, and quote characters wrapping the remaining
//! matches are stripped.

use regex::Regex;

use crate::matches::{Match, MatchSet};
use crate::rules::RuleSet;

/// Name of the rule whose matches are refined against the url rule.
pub const LINK_RULE: &str = "link";

/// Name of the rule whose patterns drive link-match suppression.
pub const URL_RULE: &str = "url";

/// A per-rule refinement: takes a rule's matches and the full rule set,
/// returns the replacement match sequence.
pub type RefineFn = fn(&[Match], &RuleSet) -> Vec<Match>;

/// Ordered per-rule refinement steps applied after aggregation.
///
/// Each step names the single rule it rewrites; rules without a step
/// pass through unchanged. Additional special-cased rules register a
/// step here instead of branching on rule names in the renderer.
#[derive(Debug, Default)]
pub struct Refinery {
    steps: Vec<(Box<str>, RefineFn)>,
}

impl Refinery {
    /// Creates a refinery with no steps (every rule passes through).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a refinement step for the named rule.
    #[must_use]
    pub fn with_step(mut self, rule: &str, apply: RefineFn) -> Self {
        self.steps.push((rule.into(), apply));
        self
    }

    /// Creates the refinery with the built-in link-rule step.
    #[must_use]
    pub fn standard() -> Self {
        Self::new().with_step(LINK_RULE, refine_link_matches)
    }

    /// Applies every registered step, replacing only the named rules'
    /// match sequences. Steps for rules absent from `matches` are
    /// silently skipped.
    #[must_use]
    pub fn refine(&self, mut matches: MatchSet, rules: &RuleSet) -> MatchSet {
        for (rule, apply) in &self.steps {
            let Some(current) = matches.rule_matches(rule) else {
                continue;
            };
            let replacement = apply(current, rules);
            matches.replace(rule, replacement);
        }
        matches
    }
}

/// Link-rule refinement: drops matches already covered by the url rule,
/// then strips one layer of wrapping quotes from the survivors.
fn refine_link_matches(matches: &[Match], rules: &RuleSet) -> Vec<Match> {
    let url_patterns = rules.lookup(URL_RULE).unwrap_or(&[]);

    matches
        .iter()
        .filter(|m| !contains_url(&m.text, url_patterns))
        .map(|m| {
            let stripped = strip_quote_layer(&m.text);
            if stripped.len() == m.text.len() {
                m.clone()
            } else {
                Match {
                    path: m.path.clone(),
                    line: m.line,
                    text: stripped.into(),
                }
            }
        })
        .collect()
}

/// A url-rule match anywhere inside the text suppresses the whole match;
/// full-span equality is not required.
fn contains_url(text: &str, url_patterns: &[Regex]) -> bool {
    url_patterns.iter().any(|pattern| pattern.is_match(text))
}

/// Removes exactly one pair of wrapping quotes when both ends carry the
/// same quote character (`"` or `'`).
fn strip_quote_layer(text: &str) -> &str {
    let bytes = text.as_bytes();
    let wrapped = bytes.len() >= 2
        && ((bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\''));

    if wrapped { &text[1..text.len() - 1] } else { text }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::scanner::scan_content;
    use crate::test_utils::{make_match, make_ruleset};

    fn link_url_rules() -> RuleSet {
        make_ruleset(&[("link", &[r#""[^"]*""#]), ("url", &[r"https?://\S+"])])
    }

    #[test]
    fn strip_quote_layer_removes_matching_double_quotes() {
        assert_eq!(strip_quote_layer(r#""abc123""#), "abc123");
    }

    #[test]
    fn strip_quote_layer_removes_matching_single_quotes() {
        assert_eq!(strip_quote_layer("'abc123'"), "abc123");
    }

    #[test]
    fn strip_quote_layer_removes_only_one_layer() {
        assert_eq!(strip_quote_layer(r#"""abc"""#), r#""abc""#);
    }

    #[test]
    fn strip_quote_layer_ignores_mismatched_quotes() {
        assert_eq!(strip_quote_layer(r#""abc'"#), r#""abc'"#);
        assert_eq!(strip_quote_layer(r#"'abc""#), r#"'abc""#);
    }

    #[test]
    fn strip_quote_layer_ignores_unwrapped_text() {
        assert_eq!(strip_quote_layer("abc"), "abc");
        assert_eq!(strip_quote_layer(r#"token="abc""#), r#"token="abc""#);
    }

    #[test]
    fn strip_quote_layer_leaves_lone_quote_alone() {
        assert_eq!(strip_quote_layer(r#"""#), r#"""#);
        assert_eq!(strip_quote_layer(r#""""#), "");
    }

    #[test]
    fn refine_drops_link_matches_containing_a_url() {
        let rules = link_url_rules();
        let matches = scan_content(
            r#"a = "http://evil.test/x" and b = "just text""#,
            Path::new("f.cfg"),
            &rules,
        );
        assert_eq!(matches.rule_matches("link").unwrap().len(), 2);

        let refined = Refinery::standard().refine(matches, &rules);

        let link = refined.rule_matches("link").unwrap();
        assert_eq!(link.len(), 1);
        assert_eq!(link[0].text.as_ref(), "just text");
    }

    #[test]
    fn refine_suppresses_on_partial_url_containment() {
        let rules = link_url_rules();
        let matches = scan_content(
            r#"x = "see http://evil.test/x for details""#,
            Path::new("f.cfg"),
            &rules,
        );

        let refined = Refinery::standard().refine(matches, &rules);

        assert!(refined.rule_matches("link").unwrap().is_empty());
    }

    #[test]
    fn refine_strips_quotes_but_keeps_location() {
        let rules = link_url_rules();
        let matches = scan_content("first\nname = \"abc123\"", Path::new("f.cfg"), &rules);

        let refined = Refinery::standard().refine(matches, &rules);

        let link = refined.rule_matches("link").unwrap();
        assert_eq!(link[0].text.as_ref(), "abc123");
        assert_eq!(link[0].line, 2);
        assert_eq!(link[0].path.as_ref(), Path::new("f.cfg"));
    }

    #[test]
    fn refine_without_url_rule_only_strips_quotes() {
        let rules = make_ruleset(&[("link", &[r#""[^"]*""#])]);
        let matches = scan_content(r#"a = "http://evil.test/x""#, Path::new("f.cfg"), &rules);

        let refined = Refinery::standard().refine(matches, &rules);

        let link = refined.rule_matches("link").unwrap();
        assert_eq!(link.len(), 1);
        assert_eq!(link[0].text.as_ref(), "http://evil.test/x");
    }

    #[test]
    fn refine_leaves_other_rules_untouched() {
        let rules = make_ruleset(&[
            ("token", &[r#"token="[^"]+""#]),
            ("link", &[r#""[^"]*""#]),
            ("url", &[r"https?://\S+"]),
        ]);
        let matches = scan_content(r#"token="abc123""#, Path::new("f.cfg"), &rules);

        let refined = Refinery::standard().refine(matches, &rules);

        let token = refined.rule_matches("token").unwrap();
        assert_eq!(token.len(), 1);
        assert_eq!(token[0].text.as_ref(), r#"token="abc123""#);
    }

    #[test]
    fn refine_with_no_link_rule_is_a_no_op() {
        let rules = make_ruleset(&[("token", &[r"TOKEN"])]);
        let matches = scan_content("TOKEN", Path::new("f.cfg"), &rules);

        let refined = Refinery::standard().refine(matches, &rules);

        assert_eq!(refined.rule_matches("token").unwrap().len(), 1);
    }

    #[test]
    fn custom_step_applies_to_its_rule_only() {
        fn drop_everything(_matches: &[Match], _rules: &RuleSet) -> Vec<Match> {
            Vec::new()
        }

        let rules = make_ruleset(&[("a", &["A"]), ("b", &["B"])]);
        let matches = scan_content("A B", Path::new("f.cfg"), &rules);

        let refined = Refinery::new().with_step("a", drop_everything).refine(matches, &rules);

        assert!(refined.rule_matches("a").unwrap().is_empty());
        assert_eq!(refined.rule_matches("b").unwrap().len(), 1);
    }

    #[test]
    fn refinery_preserves_match_identity_for_unquoted_survivors() {
        let rules = link_url_rules();
        let original = make_match("f.cfg", 3, "plain");

        let refined = refine_link_matches(&[original.clone()], &rules);

        assert_eq!(refined, vec![original]);
    }
}
