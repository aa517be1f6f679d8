//! Formatting tokens carried by style ranges.

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Normal,
    Center,
    Opposite,
}

/// Opaque formatting attribute attached to a range of text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Style {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    /// Absolute font size in pixels.
    AbsoluteSize(u32),
    /// ARGB color.
    ForegroundColor(u32),
    /// ARGB color.
    BackgroundColor(u32),
    Typeface(String),
    Link(String),
    /// Image reference (path or URI); covers one object-replacement character.
    Image(String),
    Bullet,
    Number,
    Indentation(u32),
    Alignment(Alignment),
}

/// Payload-free discriminant of `Style`, used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    AbsoluteSize,
    ForegroundColor,
    BackgroundColor,
    Typeface,
    Link,
    Image,
    Bullet,
    Number,
    Indentation,
    Alignment,
}

impl Style {
    pub fn kind(&self) -> StyleKind {
        match self {
            Style::Bold => StyleKind::Bold,
            Style::Italic => StyleKind::Italic,
            Style::Underline => StyleKind::Underline,
            Style::Strikethrough => StyleKind::Strikethrough,
            Style::Superscript => StyleKind::Superscript,
            Style::Subscript => StyleKind::Subscript,
            Style::AbsoluteSize(_) => StyleKind::AbsoluteSize,
            Style::ForegroundColor(_) => StyleKind::ForegroundColor,
            Style::BackgroundColor(_) => StyleKind::BackgroundColor,
            Style::Typeface(_) => StyleKind::Typeface,
            Style::Link(_) => StyleKind::Link,
            Style::Image(_) => StyleKind::Image,
            Style::Bullet => StyleKind::Bullet,
            Style::Number => StyleKind::Number,
            Style::Indentation(_) => StyleKind::Indentation,
            Style::Alignment(_) => StyleKind::Alignment,
        }
    }
}

impl StyleKind {
    /// Paragraph styles apply to whole lines; everything else is a character style.
    pub fn is_paragraph(self) -> bool {
        matches!(
            self,
            StyleKind::Bullet | StyleKind::Number | StyleKind::Indentation | StyleKind::Alignment
        )
    }

    /// Character styles removed by "clear formatting". Links and images are content, not formatting.
    pub fn is_formatting(self) -> bool {
        !self.is_paragraph() && !matches!(self, StyleKind::Link | StyleKind::Image)
    }
}

/// Selects which ranges a query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleFilter {
    #[default]
    Any,
    Kind(StyleKind),
    Character,
    Paragraph,
}

impl StyleFilter {
    pub fn matches(&self, style: &Style) -> bool {
        match self {
            StyleFilter::Any => true,
            StyleFilter::Kind(kind) => style.kind() == *kind,
            StyleFilter::Character => !style.kind().is_paragraph(),
            StyleFilter::Paragraph => style.kind().is_paragraph(),
        }
    }
}

impl From<StyleKind> for StyleFilter {
    fn from(kind: StyleKind) -> Self {
        StyleFilter::Kind(kind)
    }
}
