//! Chained match resolution
//!
//! Matches are refined through a strategy's patterns in order: the
//! first pattern scans the whole text, and every later pattern only
//! scans inside the matches the previous one produced.

use regex::Regex;

/// A matched substring and where it starts in the scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedSpan<'t> {
    /// Byte offset into the scanned text
    pub index: usize,
    /// The matched substring
    pub text: &'t str,
}

impl<'t> MatchedSpan<'t> {
    /// Byte offset just past the match
    pub fn end(&self) -> usize {
        self.index + self.text.len()
    }
}

/// Resolve the final, non-overlapping matches of a pattern chain
///
/// Spans come back sorted by index. A candidate in which the next
/// pattern finds nothing is dropped.
pub fn resolve<'t>(patterns: &[Regex], text: &'t str) -> Vec<MatchedSpan<'t>> {
    if text.is_empty() || patterns.is_empty() {
        return Vec::new();
    }

    let mut candidates = vec![MatchedSpan { index: 0, text }];
    for pattern in patterns {
        let mut refined = Vec::new();
        for candidate in &candidates {
            scan(pattern, candidate, &mut refined);
        }
        if refined.is_empty() {
            return refined;
        }
        candidates = refined;
    }
    candidates
}

/// Collect every leftmost-first match of `pattern` inside `candidate`
fn scan<'t>(pattern: &Regex, candidate: &MatchedSpan<'t>, out: &mut Vec<MatchedSpan<'t>>) {
    let haystack = candidate.text;
    let mut pos = 0;
    while pos <= haystack.len() {
        let Some(m) = pattern.find_at(haystack, pos) else {
            break;
        };
        if m.is_empty() {
            // Empty matches carry nothing to style; step one char past them.
            pos = step_char(haystack, m.end());
            continue;
        }
        out.push(MatchedSpan {
            index: candidate.index + m.start(),
            text: m.as_str(),
        });
        pos = m.end();
    }
}

fn step_char(s: &str, pos: usize) -> usize {
    match s[pos..].chars().next() {
        Some(c) => pos + c.len_utf8(),
        None => pos + 1,
    }
}
