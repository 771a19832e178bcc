//! Segment rendering
//!
//! Turns matched spans into the plain/styled output handed to a host.
//! Two composition policies exist:
//!
//! - Sequential: strategies partition the text. Each strategy only
//!   splits segments that are still plain, so styled text is never
//!   matched again. All literal text is escaped when serialized.
//! - Overlapping: each strategy scans the markup produced so far,
//!   tags included, and wraps its matches in place. Nothing is escaped
//!   after the initial text serialization, and patterns may straddle
//!   tags emitted by earlier strategies.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::resolve::resolve;
use super::style::StyleDecl;

/// One piece of annotated output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text no strategy claimed
    Plain(String),
    /// Text claimed by a strategy
    Styled { text: String, style: Arc<StyleDecl> },
}

impl Segment {
    /// Raw, unescaped text of this segment
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain(text) => text,
            Segment::Styled { text, .. } => text,
        }
    }

    /// Style of a styled segment
    pub fn style(&self) -> Option<&StyleDecl> {
        match self {
            Segment::Plain(_) => None,
            Segment::Styled { style, .. } => Some(&**style),
        }
    }

    pub fn is_styled(&self) -> bool {
        matches!(self, Segment::Styled { .. })
    }

    /// Append this segment as escaped markup
    pub fn write_markup(&self, out: &mut String) {
        match self {
            Segment::Plain(text) => out.push_str(&escape_html(text)),
            Segment::Styled { text, style } => {
                push_span(out, &style.to_inline(), &escape_html(text));
            }
        }
    }
}

/// Apply one strategy to every still-plain segment
///
/// Styled segments pass through untouched.
pub fn apply_sequential(
    segments: Vec<Segment>,
    patterns: &[Regex],
    style: &Arc<StyleDecl>,
) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Plain(text) => split_plain(text, patterns, style, &mut out),
            styled => out.push(styled),
        }
    }
    out
}

fn split_plain(text: String, patterns: &[Regex], style: &Arc<StyleDecl>, out: &mut Vec<Segment>) {
    let spans = resolve(patterns, &text);
    if spans.is_empty() {
        out.push(Segment::Plain(text));
        return;
    }

    let mut prev = 0;
    for span in &spans {
        if span.index > prev {
            out.push(Segment::Plain(text[prev..span.index].to_string()));
        }
        out.push(Segment::Styled {
            text: span.text.to_string(),
            style: Arc::clone(style),
        });
        prev = span.end();
    }
    if prev < text.len() {
        out.push(Segment::Plain(text[prev..].to_string()));
    }
}

/// Serialized markup passed from strategy to strategy in overlapping mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkupBuffer(String);

impl MarkupBuffer {
    /// Serialize raw text the way a text node is serialized
    pub fn from_text(text: &str) -> Self {
        Self(escape_text_node(text).into_owned())
    }

    /// Wrap every match of the pattern chain in a styled span
    ///
    /// Returns the number of spans inserted.
    pub fn apply(&mut self, patterns: &[Regex], style: &StyleDecl) -> usize {
        let (html, count) = {
            let spans = resolve(patterns, &self.0);
            if spans.is_empty() {
                return 0;
            }
            let inline = style.to_inline();
            let mut html = String::with_capacity(self.0.len() + spans.len() * (inline.len() + 24));
            let mut prev = 0;
            for span in &spans {
                html.push_str(&self.0[prev..span.index]);
                push_span(&mut html, &inline, span.text);
                prev = span.end();
            }
            html.push_str(&self.0[prev..]);
            (html, spans.len())
        };
        self.0 = html;
        count
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Output of one render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationResult {
    /// Sequential mode: disjoint plain and styled segments
    Segments(Vec<Segment>),
    /// Overlapping mode: markup with possibly nested spans
    Markup(MarkupBuffer),
}

impl AnnotationResult {
    /// Markup ready to splice into a rendering surface
    pub fn to_markup(&self) -> String {
        match self {
            AnnotationResult::Segments(segments) => {
                let mut out = String::new();
                for segment in segments {
                    segment.write_markup(&mut out);
                }
                out
            }
            AnnotationResult::Markup(buffer) => buffer.as_str().to_string(),
        }
    }

    /// Structured segments, available in sequential mode
    pub fn segments(&self) -> Option<&[Segment]> {
        match self {
            AnnotationResult::Segments(segments) => Some(segments),
            AnnotationResult::Markup(_) => None,
        }
    }

    /// Concatenated raw segment text (sequential mode only)
    pub fn plain_text(&self) -> Option<String> {
        self.segments()
            .map(|segments| segments.iter().map(Segment::text).collect())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AnnotationResult::Segments(segments) => segments.is_empty(),
            AnnotationResult::Markup(buffer) => buffer.is_empty(),
        }
    }
}

impl fmt::Display for AnnotationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationResult::Markup(buffer) => f.write_str(buffer.as_str()),
            AnnotationResult::Segments(_) => f.write_str(&self.to_markup()),
        }
    }
}

fn push_span(out: &mut String, inline_style: &str, inner: &str) {
    out.push_str("<span style=\"");
    out.push_str(inline_style);
    out.push_str("\">");
    out.push_str(inner);
    out.push_str("</span>");
}

/// Escape text for HTML interpolation (`& < > " ' /`)
pub fn escape_html(s: &str) -> Cow<'_, str> {
    escape_with(s, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#x27;"),
        '/' => Some("&#x2F;"),
        _ => None,
    })
}

/// Escape text the way a text node serializes (`& < >` only)
pub fn escape_text_node(s: &str) -> Cow<'_, str> {
    escape_with(s, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

fn escape_with(s: &str, entity: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    if !s.chars().any(|c| entity(c).is_some()) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match entity(c) {
            Some(e) => out.push_str(e),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Undo [`escape_html`]
pub fn unescape_html(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#x2F;", "/")
        .replace("&amp;", "&")
}
