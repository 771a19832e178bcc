//! Text annotation engine
//!
//! This module turns raw text plus an ordered list of strategies into
//! annotated output:
//! - Pattern normalization (merged alternation or refinement chain)
//! - Chained match resolution
//! - Segment rendering under sequential or overlapping composition
//! - The per-text-source strategy registry

mod style;
mod strategy;
mod pattern;
mod resolve;
mod render;
mod engine;
pub mod builtin;
pub mod loader;

pub use style::{Color, StyleDecl, TextStyle};
pub use strategy::{EngineConfig, EngineOptions, Matcher, Strategy};
pub use pattern::{escape_grouping, merge_alternation, normalize};
pub use resolve::{resolve, MatchedSpan};
pub use render::{escape_html, escape_text_node, unescape_html, AnnotationResult, MarkupBuffer, Segment};
pub use engine::Engine;
