//! Pattern normalization
//!
//! Turns a strategy's matchers into the ordered list of compiled
//! patterns the resolver scans with. Every pattern scans globally:
//! the resolver always collects all non-overlapping matches.

use regex::Regex;

use super::strategy::{EngineConfig, Matcher, Strategy};
use crate::error::{OverlayError, Result};

/// Compile a strategy's matchers under the engine config
///
/// Without multi-part matching, several matchers collapse into one
/// alternation `(m1|m2|...)` scanned in a single pass. Otherwise each
/// matcher stays its own pattern, in declaration order.
///
/// Each source is compiled on its own before merging, so an invalid
/// matcher is reported even when the merged text would compile.
/// Precompiled regexes cannot be merged: their builder flags are not
/// recoverable from the pattern text.
pub fn normalize(strategy: &Strategy, config: &EngineConfig) -> Result<Vec<Regex>> {
    if strategy.matchers.is_empty() {
        return Err(OverlayError::NoMatchers(strategy.name.clone()));
    }

    if !config.allow_multi_part_matching() && strategy.matchers.len() > 1 {
        for matcher in &strategy.matchers {
            match matcher {
                Matcher::Source(src) => {
                    compile(src)?;
                }
                Matcher::Regex(_) => {
                    return Err(OverlayError::UnmergeableMatcher(strategy.name.clone()))
                }
            }
        }
        let merged = merge_alternation(&strategy.matchers);
        return Ok(vec![compile(&merged)?]);
    }

    strategy
        .matchers
        .iter()
        .map(|matcher| match matcher {
            Matcher::Regex(re) => Ok(re.clone()),
            Matcher::Source(src) => compile(src),
        })
        .collect()
}

/// Join matcher sources into a single alternation group
pub fn merge_alternation(matchers: &[Matcher]) -> String {
    let parts: Vec<String> = matchers
        .iter()
        .map(|m| escape_grouping(m.source()))
        .collect();
    format!("({})", parts.join("|"))
}

/// Escape unescaped `(`, `)` and `|` so they match literally
///
/// Characters already preceded by a backslash are left as they are.
pub fn escape_grouping(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 4);
    let mut chars = source.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '(' | ')' | '|' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn compile(source: &str) -> Result<Regex> {
    Regex::new(source).map_err(|e| OverlayError::InvalidPattern {
        pattern: source.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::style::StyleDecl;
    use crate::overlay::strategy::EngineOptions;

    fn config(multi_part: bool) -> EngineConfig {
        EngineConfig::freeze(EngineOptions::default().multi_part(multi_part))
    }

    #[test]
    fn test_escape_grouping() {
        assert_eq!(escape_grouping("cat"), "cat");
        assert_eq!(escape_grouping("(a|b)"), r"\(a\|b\)");
        assert_eq!(escape_grouping(r"\(x\)"), r"\(x\)");
        assert_eq!(escape_grouping(r"\d+(x"), r"\d+\(x");
        assert_eq!(escape_grouping("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_merge_when_multi_part_disabled() {
        let s = Strategy::chained("pets", ["cat", "dog"], StyleDecl::new());
        let patterns = normalize(&s, &config(false)).unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].as_str(), "(cat|dog)");
    }

    #[test]
    fn test_merged_parens_are_literal() {
        let s = Strategy::chained("calls", ["f(x)", "a|b"], StyleDecl::new());
        let patterns = normalize(&s, &config(false)).unwrap();
        let re = &patterns[0];
        assert!(re.is_match("call f(x) now"));
        assert!(re.is_match("a|b"));
        assert!(!re.is_match("fx"));
        assert!(!re.is_match("a"));
    }

    #[test]
    fn test_chain_kept_when_multi_part_enabled() {
        let s = Strategy::chained("range", [r"\d+-\d+", r"\d+"], StyleDecl::new());
        let patterns = normalize(&s, &config(true)).unwrap();
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[1].as_str(), r"\d+");
    }

    #[test]
    fn test_single_matcher_never_merged() {
        let s = Strategy::new("group", "(a|b)c", StyleDecl::new());
        let patterns = normalize(&s, &config(false)).unwrap();
        assert_eq!(patterns[0].as_str(), "(a|b)c");
    }

    #[test]
    fn test_invalid_pattern() {
        let s = Strategy::new("broken", "[unclosed", StyleDecl::new());
        match normalize(&s, &config(true)) {
            Err(OverlayError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "[unclosed"),
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_matcher_not_hidden_by_merge() {
        // a trailing backslash would escape the separator once merged
        let s = Strategy::chained("p", ["a\\", "b"], StyleDecl::new());
        match normalize(&s, &config(false)) {
            Err(OverlayError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "a\\"),
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_compiled_regex_rejected_when_merging() {
        let cat = regex::RegexBuilder::new("cat").case_insensitive(true).build().unwrap();
        let s = Strategy::chained("pets", [Matcher::from(cat), Matcher::from("dog")], StyleDecl::new());
        assert!(matches!(
            normalize(&s, &config(false)),
            Err(OverlayError::UnmergeableMatcher(name)) if name == "pets"
        ));

        let patterns = normalize(&s, &config(true)).unwrap();
        assert!(patterns[0].is_match("CAT"));
    }

    #[test]
    fn test_no_matchers() {
        let s = Strategy::chained::<_, &str>("empty", [], StyleDecl::new());
        assert!(matches!(normalize(&s, &config(true)), Err(OverlayError::NoMatchers(_))));
    }
}
