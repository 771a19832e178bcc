//! Strategy registry and render driver
//!
//! An [`Engine`] owns the strategies registered for one text source and
//! the engine config frozen by the first registration. Every render is
//! a full recomputation over the registered strategies, in order.

use std::cell::OnceCell;
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, trace};

use super::pattern::normalize;
use super::render::{apply_sequential, AnnotationResult, MarkupBuffer, Segment};
use super::strategy::{EngineConfig, EngineOptions, Strategy};
use super::style::StyleDecl;
use crate::error::Result;

/// A registered strategy with its patterns compiled under the frozen config
struct CompiledStrategy {
    name: String,
    patterns: Vec<Regex>,
    style: Arc<StyleDecl>,
}

impl CompiledStrategy {
    fn compile(strategy: Strategy, config: &EngineConfig) -> Result<Self> {
        let patterns = normalize(&strategy, config)?;
        Ok(Self {
            name: strategy.name,
            patterns,
            style: Arc::new(strategy.style),
        })
    }
}

/// Annotation engine for a single text source
pub struct Engine {
    /// Append-only, in registration order
    strategies: Vec<CompiledStrategy>,
    /// Set by the first successful registration
    config: OnceCell<EngineConfig>,
    /// Last text supplied by the host
    text: String,
}

impl Engine {
    /// Create an engine with no strategies
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
            config: OnceCell::new(),
            text: String::new(),
        }
    }

    /// Frozen config, if any registration has happened
    pub fn config(&self) -> Option<EngineConfig> {
        self.config.get().copied()
    }

    /// Number of registered strategies
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Names of registered strategies, in order
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name.as_str()).collect()
    }

    /// Append strategies and re-render the current text
    ///
    /// The first successful call freezes the config from `options`;
    /// later calls ignore them. Registration is all-or-nothing: if any
    /// matcher fails to compile, neither strategies nor config change.
    pub fn register<I>(&mut self, strategies: I, options: EngineOptions) -> Result<AnnotationResult>
    where
        I: IntoIterator<Item = Strategy>,
    {
        let config = match self.config.get() {
            Some(frozen) => {
                if !frozen.matches(&options) {
                    debug!(?options, "engine config already frozen, ignoring options");
                }
                *frozen
            }
            None => EngineConfig::freeze(options),
        };

        let compiled = strategies
            .into_iter()
            .map(|s| CompiledStrategy::compile(s, &config))
            .collect::<Result<Vec<_>>>()?;

        let config = *self.config.get_or_init(|| config);
        debug!(
            added = compiled.len(),
            total = self.strategies.len() + compiled.len(),
            overlapping = config.allow_overlapping(),
            multi_part = config.allow_multi_part_matching(),
            "registered strategies"
        );
        self.strategies.extend(compiled);

        Ok(self.render_current())
    }

    /// Last text supplied by the host
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the current text and render it
    pub fn set_text(&mut self, text: &str) -> AnnotationResult {
        self.text.clear();
        self.text.push_str(text);
        self.render_current()
    }

    /// Render the current text
    pub fn render_current(&self) -> AnnotationResult {
        self.render(&self.text)
    }

    /// Render `text` through every registered strategy
    ///
    /// Depends only on the registered strategies, the config and `text`.
    pub fn render(&self, text: &str) -> AnnotationResult {
        let config = self
            .config()
            .unwrap_or_else(|| EngineConfig::freeze(EngineOptions::default()));

        let result = if config.allow_overlapping() {
            let mut buffer = MarkupBuffer::from_text(text);
            for strategy in &self.strategies {
                let inserted = buffer.apply(&strategy.patterns, &strategy.style);
                trace!(strategy = %strategy.name, inserted, "applied overlapping strategy");
            }
            AnnotationResult::Markup(buffer)
        } else {
            let mut segments = if text.is_empty() {
                Vec::new()
            } else {
                vec![Segment::Plain(text.to_string())]
            };
            for strategy in &self.strategies {
                segments = apply_sequential(segments, &strategy.patterns, &strategy.style);
                trace!(strategy = %strategy.name, segments = segments.len(), "applied sequential strategy");
            }
            AnnotationResult::Segments(segments)
        };

        debug!(len = text.len(), strategies = self.strategies.len(), "rendered text");
        result
    }

    /// Release the engine and everything it owns
    pub fn destroy(self) {
        debug!(strategies = self.strategies.len(), "engine destroyed");
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
