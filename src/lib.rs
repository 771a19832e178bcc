//! textoverlay - live, style-annotated overlays for editable text
//!
//! As text changes, registered strategies are matched against it and the
//! matched spans come back as styled segments or markup that a host can
//! lay over the real input.

pub mod config;
pub mod error;
pub mod host;
pub mod overlay;
pub mod terminal;

pub use error::{OverlayError, Result};
pub use overlay::{AnnotationResult, Engine, EngineOptions, Segment, Strategy, StyleDecl};
