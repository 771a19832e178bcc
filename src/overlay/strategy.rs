//! Strategy and engine option types
//!
//! A strategy pairs one or more matchers with the style applied to
//! whatever they match. Engine options decide how strategies compose.

use regex::Regex;
use serde::Deserialize;

use super::style::StyleDecl;

/// A single pattern used to find substrings
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Pattern source, compiled on registration
    Source(String),
    /// Pre-compiled pattern
    Regex(Regex),
}

impl Matcher {
    /// Pattern source text
    pub fn source(&self) -> &str {
        match self {
            Matcher::Source(s) => s,
            Matcher::Regex(re) => re.as_str(),
        }
    }
}

impl From<&str> for Matcher {
    fn from(s: &str) -> Self {
        Matcher::Source(s.to_string())
    }
}

impl From<String> for Matcher {
    fn from(s: String) -> Self {
        Matcher::Source(s)
    }
}

impl From<Regex> for Matcher {
    fn from(re: Regex) -> Self {
        Matcher::Regex(re)
    }
}

/// One matching + styling rule
#[derive(Debug, Clone)]
pub struct Strategy {
    /// Name for logging and diagnostics
    pub name: String,
    /// Matchers in order; with multi-part matching each one refines the last
    pub matchers: Vec<Matcher>,
    /// Declarations applied verbatim to matched spans
    pub style: StyleDecl,
}

impl Strategy {
    /// Create a strategy with a single matcher
    pub fn new(name: &str, matcher: impl Into<Matcher>, style: StyleDecl) -> Self {
        Self {
            name: name.to_string(),
            matchers: vec![matcher.into()],
            style,
        }
    }

    /// Create a strategy from an ordered list of matchers
    pub fn chained<I, M>(name: &str, matchers: I, style: StyleDecl) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Matcher>,
    {
        Self {
            name: name.to_string(),
            matchers: matchers.into_iter().map(Into::into).collect(),
            style,
        }
    }

    /// Builder: append a matcher
    pub fn then(mut self, matcher: impl Into<Matcher>) -> Self {
        self.matchers.push(matcher.into());
        self
    }
}

/// Options passed with a registration call
///
/// Only the first registration on an engine decides them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Later strategies may match inside earlier strategies' output
    pub allow_overlapping: bool,
    /// Multiple matchers form a refinement chain instead of one alternation
    pub allow_multi_part_matching: bool,
}

impl EngineOptions {
    /// Builder: set overlapping composition
    pub fn overlapping(mut self, allow: bool) -> Self {
        self.allow_overlapping = allow;
        self
    }

    /// Builder: set multi-part matching
    pub fn multi_part(mut self, allow: bool) -> Self {
        self.allow_multi_part_matching = allow;
        self
    }
}

/// Engine-wide flags, frozen at the first registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    allow_overlapping: bool,
    allow_multi_part_matching: bool,
}

impl EngineConfig {
    pub(crate) fn freeze(options: EngineOptions) -> Self {
        Self {
            allow_overlapping: options.allow_overlapping,
            allow_multi_part_matching: options.allow_multi_part_matching,
        }
    }

    pub fn allow_overlapping(&self) -> bool {
        self.allow_overlapping
    }

    pub fn allow_multi_part_matching(&self) -> bool {
        self.allow_multi_part_matching
    }

    /// Whether this config was frozen from the given options
    pub fn matches(&self, options: &EngineOptions) -> bool {
        *self == Self::freeze(*options)
    }
}
