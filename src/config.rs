//! Configuration file support
//!
//! Loads command-line host settings from ~/.textoverlay.conf
//! (or %USERPROFILE%\.textoverlay.conf on Windows)
//!
//! Format: simple key=value pairs, one per line
//! Lines starting with # are comments
//!
//! Example:
//! ```text
//! # textoverlay configuration
//! format = ansi
//! allow-overlapping = false
//! multi-part-matching = true
//! presets = mention, hashtag
//! strategies = /home/me/.textoverlay.toml
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use tracing::warn;

use crate::overlay::EngineOptions;

/// How renders are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Markup inside the overlay container
    #[default]
    Html,
    /// Styled terminal text
    Ansi,
    /// One segment per line
    Segments,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "ansi" | "terminal" => Ok(OutputFormat::Ansi),
            "segments" => Ok(OutputFormat::Segments),
            other => Err(format!("unknown format: {}", other)),
        }
    }
}

/// Configuration settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Output format
    pub format: OutputFormat,
    /// Later strategies may match inside earlier ones
    pub allow_overlapping: bool,
    /// Multiple matchers refine instead of merging
    pub multi_part_matching: bool,
    /// Strategy file to load
    pub strategies: Option<PathBuf>,
    /// Built-in presets used when no strategy file is given
    pub presets: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Html,
            allow_overlapping: false,
            multi_part_matching: true,
            strategies: None,
            presets: vec!["mention".into(), "hashtag".into(), "url".into()],
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".textoverlay.conf"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".textoverlay.conf"))
        }
    }

    /// Load configuration from file
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(path) = Self::config_path() {
            if let Ok(contents) = fs::read_to_string(&path) {
                let settings = Self::parse(&contents);
                config.apply(&settings);
            }
        }

        config
    }

    /// Engine options these settings describe
    pub fn options(&self) -> EngineOptions {
        EngineOptions::default()
            .overlapping(self.allow_overlapping)
            .multi_part(self.multi_part_matching)
    }

    /// Parse config file contents into key-value pairs
    fn parse(contents: &str) -> HashMap<String, String> {
        let mut settings = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse key = value
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_lowercase();
                let value = value.trim().to_string();
                settings.insert(key, value);
            }
        }

        settings
    }

    /// Apply settings from parsed config
    fn apply(&mut self, settings: &HashMap<String, String>) {
        if let Some(value) = settings.get("format") {
            match value.parse() {
                Ok(format) => self.format = format,
                Err(e) => warn!("ignoring config setting: {}", e),
            }
        }

        if let Some(value) = settings.get("allow-overlapping") {
            self.allow_overlapping = parse_bool(value);
        }

        if let Some(value) = settings.get("multi-part-matching") {
            self.multi_part_matching = parse_bool(value);
        }

        if let Some(value) = settings.get("strategies") {
            if !value.is_empty() {
                self.strategies = Some(PathBuf::from(value));
            }
        }

        if let Some(value) = settings.get("presets") {
            self.presets = value
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
        }
    }
}

/// Parse a boolean value from string
fn parse_bool(s: &str) -> bool {
    let s = s.to_lowercase();
    matches!(s.as_str(), "true" | "yes" | "on" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
format = ansi
allow-overlapping = yes
presets = mention , url
        "#;

        let settings = Config::parse(contents);
        assert_eq!(settings.get("format"), Some(&"ansi".to_string()));
        assert_eq!(settings.get("allow-overlapping"), Some(&"yes".to_string()));
        assert_eq!(settings.get("presets"), Some(&"mention , url".to_string()));
        assert_eq!(settings.len(), 3);
    }

    #[test]
    fn test_apply_settings() {
        let mut config = Config::default();
        let mut settings = HashMap::new();
        settings.insert("format".to_string(), "segments".to_string());
        settings.insert("allow-overlapping".to_string(), "true".to_string());
        settings.insert("multi-part-matching".to_string(), "off".to_string());
        settings.insert("strategies".to_string(), "/tmp/s.toml".to_string());
        settings.insert("presets".to_string(), "hashtag, ,email".to_string());

        config.apply(&settings);

        assert_eq!(config.format, OutputFormat::Segments);
        assert!(config.allow_overlapping);
        assert!(!config.multi_part_matching);
        assert_eq!(config.strategies, Some(PathBuf::from("/tmp/s.toml")));
        assert_eq!(config.presets, vec!["hashtag", "email"]);

        let options = config.options();
        assert!(options.allow_overlapping);
        assert!(!options.allow_multi_part_matching);
    }

    #[test]
    fn test_bad_format_keeps_default() {
        let mut config = Config::default();
        let mut settings = HashMap::new();
        settings.insert("format".to_string(), "pdf".to_string());
        config.apply(&settings);
        assert_eq!(config.format, OutputFormat::Html);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("True"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("on"));
        assert!(parse_bool("1"));

        assert!(!parse_bool("false"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool("anything"));
    }
}
