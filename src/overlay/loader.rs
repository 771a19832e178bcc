//! Strategy files
//!
//! Strategies can be declared in TOML:
//!
//! ```text
//! [options]
//! allow_overlapping = false
//! allow_multi_part_matching = true
//!
//! [[strategy]]
//! name = "mention"
//! match = ['@\w+', '\w+']
//! [strategy.style]
//! background-color = "#d8dfea"
//! color = "blue"
//! ```
//!
//! `match` takes one pattern or a list. Style declarations keep the
//! order they are written in.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::strategy::{EngineOptions, Strategy};
use super::style::StyleDecl;
use crate::error::{OverlayError, Result};

/// Options and strategies read from a strategy file
#[derive(Debug, Clone)]
pub struct StrategySet {
    /// Present when the file has an `[options]` table
    pub options: Option<EngineOptions>,
    pub strategies: Vec<Strategy>,
}

#[derive(Debug, Deserialize)]
struct StrategyFile {
    options: Option<EngineOptions>,
    #[serde(default, rename = "strategy")]
    strategies: Vec<StrategyEntry>,
}

#[derive(Debug, Deserialize)]
struct StrategyEntry {
    name: Option<String>,
    #[serde(rename = "match")]
    matchers: OneOrMany,
    #[serde(default)]
    style: toml::Table,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Parse strategy file contents
pub fn parse(contents: &str) -> Result<StrategySet> {
    let file: StrategyFile = toml::from_str(contents)?;

    let mut strategies = Vec::with_capacity(file.strategies.len());
    for (i, entry) in file.strategies.into_iter().enumerate() {
        let name = entry.name.unwrap_or_else(|| format!("strategy-{}", i + 1));
        let matchers = entry.matchers.into_vec();
        if matchers.is_empty() {
            return Err(OverlayError::NoMatchers(name));
        }

        let mut style = StyleDecl::new();
        for (property, value) in &entry.style {
            let value = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Integer(n) => n.to_string(),
                toml::Value::Float(f) => f.to_string(),
                other => {
                    return Err(OverlayError::Message(format!(
                        "strategy `{}`: style `{}` must be a string or number, got {}",
                        name,
                        property,
                        other.type_str()
                    )))
                }
            };
            style.push(property, &value);
        }

        strategies.push(Strategy::chained(&name, matchers, style));
    }

    Ok(StrategySet {
        options: file.options,
        strategies,
    })
}

/// Read and parse a strategy file
pub fn load(path: &Path) -> Result<StrategySet> {
    let contents = fs::read_to_string(path)?;
    let set = parse(&contents)?;
    debug!(path = %path.display(), strategies = set.strategies.len(), "loaded strategy file");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r##"
[options]
allow_multi_part_matching = true

[[strategy]]
name = "mention"
match = ['@\w+', '\w+']
[strategy.style]
color = "blue"
background-color = "#d8dfea"
z-index = 2

[[strategy]]
match = '#\w+'
"##;

    #[test]
    fn test_parse_sample() {
        let set = parse(SAMPLE).unwrap();
        let options = set.options.unwrap();
        assert!(options.allow_multi_part_matching);
        assert!(!options.allow_overlapping);
        assert_eq!(set.strategies.len(), 2);

        let mention = &set.strategies[0];
        assert_eq!(mention.name, "mention");
        assert_eq!(mention.matchers.len(), 2);
        assert_eq!(
            mention.style.to_inline(),
            "color: blue;background-color: #d8dfea;z-index: 2"
        );

        let second = &set.strategies[1];
        assert_eq!(second.name, "strategy-2");
        assert_eq!(second.matchers[0].source(), r"#\w+");
        assert!(second.style.is_empty());
    }

    #[test]
    fn test_empty_file() {
        let set = parse("").unwrap();
        assert!(set.strategies.is_empty());
        assert!(set.options.is_none());
    }

    #[test]
    fn test_rejects_bad_entries() {
        assert!(matches!(parse("[[strategy]]\nmatch = []"), Err(OverlayError::NoMatchers(_))));
        assert!(matches!(parse("[[strategy]]\nname = 'x'"), Err(OverlayError::StrategyFile(_))));
        let bad_style = "[[strategy]]\nmatch = 'x'\n[strategy.style]\ncolor = true";
        assert!(matches!(parse(bad_style), Err(OverlayError::Message(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let set = load(file.path()).unwrap();
        assert_eq!(set.strategies.len(), 2);

        let missing = file.path().with_extension("missing");
        assert!(matches!(load(&missing), Err(OverlayError::Io(_))));
    }
}
