//! Error types for textoverlay

use thiserror::Error;

/// Result type alias for overlay operations
pub type Result<T> = std::result::Result<T, OverlayError>;

/// Overlay error types
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Strategy needs at least one matcher: {0}")]
    NoMatchers(String),

    #[error("Strategy `{0}` mixes compiled regexes into a merged alternation")]
    UnmergeableMatcher(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid strategy file: {0}")]
    StrategyFile(#[from] toml::de::Error),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("{0}")]
    Message(String),
}
