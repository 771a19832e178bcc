//! Host binding
//!
//! A host owns the real input and a rendering surface laid over it. It
//! tells the overlay whenever the text or its visual state changes and
//! the overlay splices a fresh render into the surface.

use std::io::Write;

use crate::error::Result;
use crate::overlay::{AnnotationResult, Engine, EngineOptions, Segment, Strategy};

/// Something annotated output can be spliced into
pub trait Surface {
    /// Replace the surface contents with a render
    fn present(&mut self, result: &AnnotationResult) -> Result<()>;
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn present(&mut self, result: &AnnotationResult) -> Result<()> {
        (**self).present(result)
    }
}

/// An engine bound to the surface it renders into
pub struct Overlay<S: Surface> {
    engine: Engine,
    surface: S,
}

impl<S: Surface> Overlay<S> {
    /// Attach a fresh engine to a surface
    pub fn attach(surface: S) -> Self {
        Self {
            engine: Engine::new(),
            surface,
        }
    }

    /// Bind an existing engine to a surface
    pub fn with_engine(engine: Engine, surface: S) -> Self {
        Self { engine, surface }
    }

    /// Register strategies and present the re-rendered current text
    pub fn register<I>(&mut self, strategies: I, options: EngineOptions) -> Result<()>
    where
        I: IntoIterator<Item = Strategy>,
    {
        let result = self.engine.register(strategies, options)?;
        self.surface.present(&result)
    }

    /// The observed text changed
    pub fn notify(&mut self, text: &str) -> Result<()> {
        let result = self.engine.set_text(text);
        self.surface.present(&result)
    }

    /// The surface needs repainting without a text change
    pub fn refresh(&mut self) -> Result<()> {
        let result = self.engine.render_current();
        self.surface.present(&result)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Tear down the engine and hand the surface back
    pub fn detach(self) -> S {
        self.engine.destroy();
        self.surface
    }
}

/// Writes each render as markup inside the overlay container
pub struct HtmlSurface<W: Write> {
    out: W,
    wrap: bool,
}

impl<W: Write> HtmlSurface<W> {
    /// Wrap renders in `<div class="textoverlay">`
    pub fn new(out: W) -> Self {
        Self { out, wrap: true }
    }

    /// Write bare markup, one render per line
    pub fn bare(out: W) -> Self {
        Self { out, wrap: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for HtmlSurface<W> {
    fn present(&mut self, result: &AnnotationResult) -> Result<()> {
        let markup = result.to_markup();
        if self.wrap {
            writeln!(self.out, "<div class=\"textoverlay\">{}</div>", markup)?;
        } else {
            writeln!(self.out, "{}", markup)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Lists segments one per line, for inspecting renders
///
/// Overlapping renders have no segment structure and are written as
/// their markup.
pub struct SegmentListSurface<W: Write> {
    out: W,
}

impl<W: Write> SegmentListSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for SegmentListSurface<W> {
    fn present(&mut self, result: &AnnotationResult) -> Result<()> {
        match result.segments() {
            Some(segments) => {
                for segment in segments {
                    match segment {
                        Segment::Plain(text) => writeln!(self.out, "plain  {:?}", text)?,
                        Segment::Styled { text, style } => {
                            writeln!(self.out, "styled {:?} [{}]", text, style.to_inline())?
                        }
                    }
                }
            }
            None => writeln!(self.out, "markup {}", result.to_markup())?,
        }
        writeln!(self.out, "--")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Keeps the latest render in memory
#[derive(Debug, Default)]
pub struct MemorySurface {
    /// Markup of the latest render
    pub markup: String,
    /// Number of renders presented
    pub renders: usize,
}

impl Surface for MemorySurface {
    fn present(&mut self, result: &AnnotationResult) -> Result<()> {
        self.markup = result.to_markup();
        self.renders += 1;
        Ok(())
    }
}
