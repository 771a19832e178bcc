//! Style types for annotated text
//!
//! A strategy carries its style as an ordered list of CSS-like
//! declarations that are passed through verbatim to the markup.
//! Terminal hosts reduce the same declarations to a [`TextStyle`].

/// Ordered `property: value` declarations applied to matched spans
///
/// Values are not validated or sanitized; they reach the markup as given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleDecl {
    declarations: Vec<(String, String)>,
}

impl StyleDecl {
    /// Create an empty declaration list
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a declaration
    pub fn with(mut self, property: &str, value: &str) -> Self {
        self.push(property, value);
        self
    }

    /// Append a declaration, keeping insertion order
    pub fn push(&mut self, property: &str, value: &str) {
        self.declarations.push((property.to_string(), value.to_string()));
    }

    /// Look up a property; a later declaration overrides an earlier one
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(p, _)| p.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
    }

    /// Iterate declarations in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialize as an inline style attribute value
    ///
    /// Each declaration becomes `property: value`, joined by `;`.
    pub fn to_inline(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{}: {}", p, v))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Parse an inline style attribute value back into declarations
    ///
    /// Pieces without a `:` are skipped.
    pub fn parse_inline(inline: &str) -> Self {
        inline
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .map(|(p, v)| (p.trim(), v.trim()))
            .filter(|(p, _)| !p.is_empty())
            .collect()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for StyleDecl {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = StyleDecl::new();
        for (property, value) in iter {
            style.push(property.as_ref(), value.as_ref());
        }
        style
    }
}

/// Terminal colors (ANSI 16-color palette plus true color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    Rgb(u8, u8, u8),
}

impl Color {
    /// Parse a CSS color value (named colors, `#rgb`, `#rrggbb`)
    pub fn parse_css(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }
        let color = match value.as_str() {
            "black" => Color::Black,
            "maroon" | "darkred" => Color::Red,
            "red" => Color::BrightRed,
            "green" | "darkgreen" => Color::Green,
            "lime" => Color::BrightGreen,
            "olive" => Color::Yellow,
            "yellow" => Color::BrightYellow,
            "navy" | "darkblue" => Color::Blue,
            "blue" => Color::BrightBlue,
            "purple" | "darkmagenta" => Color::Magenta,
            "fuchsia" | "magenta" => Color::BrightMagenta,
            "teal" | "darkcyan" => Color::Cyan,
            "aqua" | "cyan" => Color::BrightCyan,
            "silver" | "lightgray" | "lightgrey" => Color::White,
            "gray" | "grey" => Color::BrightBlack,
            "white" => Color::BrightWhite,
            _ => return None,
        };
        Some(color)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v * 17;
            }
            Some(Color::Rgb(rgb[0], rgb[1], rgb[2]))
        }
        6 => Some(Color::Rgb(
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        )),
        _ => None,
    }
}

/// Text attributes a terminal can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
}

impl TextStyle {
    /// Reduce CSS declarations to terminal attributes
    ///
    /// Declarations a terminal cannot show are ignored.
    pub fn from_decl(decl: &StyleDecl) -> Self {
        let mut style = Self::default();
        for (property, value) in decl.iter() {
            let value = value.trim().to_ascii_lowercase();
            match property.trim().to_ascii_lowercase().as_str() {
                "color" => {
                    if let Some(color) = Color::parse_css(&value) {
                        style.fg = color;
                    }
                }
                "background-color" | "background" => {
                    if let Some(color) = Color::parse_css(&value) {
                        style.bg = color;
                    }
                }
                "font-weight" => {
                    style.bold = value == "bold"
                        || value == "bolder"
                        || value.parse::<u16>().map_or(false, |w| w >= 600);
                }
                "font-style" => style.italic = value == "italic" || value == "oblique",
                "text-decoration" | "text-decoration-line" => {
                    style.underline = value.split_whitespace().any(|v| v == "underline");
                }
                _ => {}
            }
        }
        style
    }

    /// Layer an inner (nested) style on top of this one
    pub fn layered(self, inner: TextStyle) -> Self {
        Self {
            fg: if inner.fg == Color::Default { self.fg } else { inner.fg },
            bg: if inner.bg == Color::Default { self.bg } else { inner.bg },
            bold: self.bold || inner.bold,
            italic: self.italic || inner.italic,
            underline: self.underline || inner.underline,
        }
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_serialization() {
        let style = StyleDecl::new()
            .with("background-color", "#d8dfea")
            .with("color", "red");
        assert_eq!(style.to_inline(), "background-color: #d8dfea;color: red");
        assert_eq!(StyleDecl::new().to_inline(), "");
    }

    #[test]
    fn test_parse_inline() {
        let style = StyleDecl::parse_inline("color: red; background-color:#fff;;junk");
        assert_eq!(style.len(), 2);
        assert_eq!(style.get("background-color"), Some("#fff"));
        assert_eq!(style.to_inline(), "color: red;background-color: #fff");
    }

    #[test]
    fn test_later_declaration_wins() {
        let style: StyleDecl = [("color", "red"), ("Color", "blue")].into_iter().collect();
        assert_eq!(style.get("color"), Some("blue"));
        assert_eq!(style.len(), 2);
    }

    #[test]
    fn test_parse_css_colors() {
        assert_eq!(Color::parse_css("red"), Some(Color::BrightRed));
        assert_eq!(Color::parse_css(" Grey "), Some(Color::BrightBlack));
        assert_eq!(Color::parse_css("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Color::parse_css("#d8dfea"), Some(Color::Rgb(0xd8, 0xdf, 0xea)));
        assert_eq!(Color::parse_css("#12"), None);
        assert_eq!(Color::parse_css("rgba(0,0,0,0)"), None);
    }

    #[test]
    fn test_text_style_from_decl() {
        let decl = StyleDecl::new()
            .with("color", "blue")
            .with("font-weight", "700")
            .with("text-decoration", "underline dotted")
            .with("border-radius", "3px");
        let style = TextStyle::from_decl(&decl);
        assert_eq!(style.fg, Color::BrightBlue);
        assert_eq!(style.bg, Color::Default);
        assert!(style.bold);
        assert!(style.underline);
        assert!(!style.italic);
        assert!(TextStyle::from_decl(&StyleDecl::new()).is_default());
    }
}
