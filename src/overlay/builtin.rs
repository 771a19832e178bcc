//! Built-in strategies
//!
//! Common highlighting rules for chat and comment boxes. The mention
//! preset relies on multi-part matching to style only the user name.

use super::strategy::Strategy;
use super::style::StyleDecl;
use crate::error::{OverlayError, Result};

/// Names accepted by [`preset`]
pub const PRESET_NAMES: &[&str] = &[
    "mention",
    "hashtag",
    "url",
    "email",
    "number",
    "trailing-whitespace",
];

/// Look up a preset strategy by name
pub fn preset(name: &str) -> Result<Strategy> {
    match name.trim().to_ascii_lowercase().as_str() {
        "mention" => Ok(mention()),
        "hashtag" => Ok(hashtag()),
        "url" => Ok(url()),
        "email" => Ok(email()),
        "number" => Ok(number()),
        "trailing-whitespace" => Ok(trailing_whitespace()),
        _ => Err(OverlayError::UnknownPreset(name.to_string())),
    }
}

/// Resolve a comma separated preset list
pub fn presets(list: &str) -> Result<Vec<Strategy>> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(preset)
        .collect()
}

/// `@name`; the second matcher narrows the match to the name itself
///
/// When matchers are merged the `(?:^|\B)` group is escaped into
/// literals, so only the `\w+` branch can match and every word is
/// highlighted.
pub fn mention() -> Strategy {
    Strategy::new(
        "mention",
        r"(?:^|\B)@\w+",
        StyleDecl::new()
            .with("background-color", "#d8dfea")
            .with("color", "blue"),
    )
    .then(r"\w+")
}

pub fn hashtag() -> Strategy {
    Strategy::new(
        "hashtag",
        r"(?:^|\B)#\w+",
        StyleDecl::new().with("color", "teal").with("font-weight", "bold"),
    )
}

pub fn url() -> Strategy {
    Strategy::new(
        "url",
        r#"\bhttps?://[^\s<>"']+"#,
        StyleDecl::new()
            .with("color", "navy")
            .with("text-decoration", "underline"),
    )
}

pub fn email() -> Strategy {
    Strategy::new(
        "email",
        r"\b[\w.+-]+@[\w-]+(?:\.[\w-]+)+\b",
        StyleDecl::new().with("color", "purple"),
    )
}

pub fn number() -> Strategy {
    Strategy::new(
        "number",
        r"\b\d+(?:\.\d+)?\b",
        StyleDecl::new().with("color", "olive"),
    )
}

/// Validation highlight for whitespace before a line break or the end
pub fn trailing_whitespace() -> Strategy {
    Strategy::new(
        "trailing-whitespace",
        r"(?m)[ \t]+$",
        StyleDecl::new().with("background-color", "red"),
    )
}
