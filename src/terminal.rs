//! Terminal rendering surface using crossterm
//!
//! Styled segments are drawn with the colors and attributes their CSS
//! declarations map to. Overlapping renders are walked tag by tag so
//! nested spans layer their styles.

use std::io::{self, Write};
use std::sync::OnceLock;

use crossterm::{
    queue,
    style::{self, Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
};
use regex::Regex;

use crate::error::Result;
use crate::host::Surface;
use crate::overlay::{AnnotationResult, Color, StyleDecl, TextStyle};

/// Surface that prints renders as styled terminal text
pub struct TerminalSurface<W: Write> {
    out: W,
}

/// Matches the span tags the engine emits
fn span_tag() -> &'static Regex {
    static SPAN_TAG: OnceLock<Regex> = OnceLock::new();
    SPAN_TAG.get_or_init(|| {
        Regex::new(r#"<span style="([^"]*)">|</span>"#).expect("span tag pattern is valid")
    })
}

impl TerminalSurface<io::Stdout> {
    /// Draw to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write text with a style, restoring defaults afterwards
    fn write_styled(&mut self, text: &str, style: TextStyle) -> Result<()> {
        if style.is_default() {
            queue!(self.out, Print(text))?;
            return Ok(());
        }
        if style.fg != Color::Default {
            queue!(self.out, SetForegroundColor(to_crossterm(style.fg)))?;
        }
        if style.bg != Color::Default {
            queue!(self.out, SetBackgroundColor(to_crossterm(style.bg)))?;
        }
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if style.italic {
            queue!(self.out, SetAttribute(Attribute::Italic))?;
        }
        if style.underline {
            queue!(self.out, SetAttribute(Attribute::Underlined))?;
        }
        queue!(self.out, Print(text), SetAttribute(Attribute::Reset), ResetColor)?;
        Ok(())
    }

    /// Walk overlapping-mode markup, layering nested span styles
    ///
    /// A closing tag with nothing open is printed as text.
    fn write_markup(&mut self, markup: &str) -> Result<()> {
        let mut stack: Vec<TextStyle> = Vec::new();
        let mut prev = 0;
        let tags: Vec<_> = span_tag()
            .captures_iter(markup)
            .map(|caps| {
                let whole = caps.get(0).map_or(0..0, |m| m.range());
                let style = caps.get(1).map(|m| TextStyle::from_decl(&StyleDecl::parse_inline(m.as_str())));
                (whole, style)
            })
            .collect();

        for (range, style) in tags {
            let current = stack.last().copied().unwrap_or_default();
            self.write_styled(&decode_text_node(&markup[prev..range.start]), current)?;
            match style {
                Some(style) => stack.push(current.layered(style)),
                None => {
                    if stack.pop().is_none() {
                        self.write_styled(&markup[range.clone()], current)?;
                    }
                }
            }
            prev = range.end;
        }
        let current = stack.last().copied().unwrap_or_default();
        self.write_styled(&decode_text_node(&markup[prev..]), current)?;
        Ok(())
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn present(&mut self, result: &AnnotationResult) -> Result<()> {
        match result {
            AnnotationResult::Segments(segments) => {
                for segment in segments {
                    let style = segment.style().map(TextStyle::from_decl).unwrap_or_default();
                    self.write_styled(segment.text(), style)?;
                }
            }
            AnnotationResult::Markup(buffer) => self.write_markup(buffer.as_str())?,
        }
        queue!(self.out, Print("\n"))?;
        self.out.flush()?;
        Ok(())
    }
}

fn decode_text_node(s: &str) -> String {
    s.replace("&lt;", "<").replace("&gt;", ">").replace("&amp;", "&")
}

fn to_crossterm(color: Color) -> style::Color {
    match color {
        Color::Default => style::Color::Reset,
        Color::Black => style::Color::Black,
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::White => style::Color::Grey,
        Color::BrightBlack => style::Color::DarkGrey,
        Color::BrightRed => style::Color::Red,
        Color::BrightGreen => style::Color::Green,
        Color::BrightYellow => style::Color::Yellow,
        Color::BrightBlue => style::Color::Blue,
        Color::BrightMagenta => style::Color::Magenta,
        Color::BrightCyan => style::Color::Cyan,
        Color::BrightWhite => style::Color::White,
        Color::Rgb(r, g, b) => style::Color::Rgb { r, g, b },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{Engine, EngineOptions, Strategy};

    fn render_to_string(engine: &Engine, text: &str) -> String {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.present(&engine.render(text)).unwrap();
        String::from_utf8(surface.into_inner()).unwrap()
    }

    fn strip_ansi(s: &str) -> String {
        Regex::new(r"\x1b\[[0-9;]*m").unwrap().replace_all(s, "").into_owned()
    }

    #[test]
    fn test_plain_text_has_no_escapes() {
        let engine = Engine::new();
        assert_eq!(render_to_string(&engine, "a < b"), "a < b\n");
    }

    #[test]
    fn test_sequential_segments_styled() {
        let mut engine = Engine::new();
        let style = StyleDecl::new().with("color", "red").with("font-weight", "bold");
        engine
            .register([Strategy::new("num", r"\d+", style)], EngineOptions::default())
            .unwrap();
        let out = render_to_string(&engine, "x 42");
        assert!(out.contains("\x1b["));
        assert_eq!(strip_ansi(&out), "x 42\n");
    }

    #[test]
    fn test_overlapping_nested_spans() {
        let mut engine = Engine::new();
        engine
            .register(
                [
                    Strategy::new("word", r"[a-z]+", StyleDecl::new().with("padding", "1px")),
                    Strategy::new("b", "b", StyleDecl::new().with("color", "blue")),
                ],
                EngineOptions::default().overlapping(true),
            )
            .unwrap();
        let out = render_to_string(&engine, "ab cb");
        assert!(out.contains("\x1b["));
        assert_eq!(strip_ansi(&out), "ab cb\n");
    }

    #[test]
    fn test_overlapping_markup_decoded() {
        let mut engine = Engine::new();
        engine
            .register(
                [Strategy::new("digit", r"\d", StyleDecl::new().with("color", "red"))],
                EngineOptions::default().overlapping(true),
            )
            .unwrap();
        let out = render_to_string(&engine, "1 < 2 & 3");
        assert_eq!(strip_ansi(&out), "1 < 2 & 3\n");
    }

    #[test]
    fn test_stray_closing_tag_printed() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.write_markup("x</span>").unwrap();
        assert_eq!(String::from_utf8(surface.into_inner()).unwrap(), "x</span>");
    }

    #[test]
    fn test_nested_styles_layer() {
        let outer = TextStyle::from_decl(&StyleDecl::new().with("background-color", "yellow"));
        let inner = TextStyle::from_decl(&StyleDecl::new().with("color", "red"));
        let both = outer.layered(inner);
        assert_eq!(both.bg, Color::BrightYellow);
        assert_eq!(both.fg, Color::BrightRed);
    }
}
