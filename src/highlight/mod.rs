//! Per-row syntax highlighting with multi-line comment propagation.

mod highlighter;
mod syntax;
mod theme;

pub use highlighter::{highlight_row, is_separator};
pub use syntax::{Keyword, Syntax, SyntaxFlags, SyntaxRegistry};
pub use theme::Theme;

/// Highlight class assigned to each rendered byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Highlight {
    #[default]
    Normal = 0,
    NonPrint = 1,
    Comment = 2,
    MlComment = 3,
    Keyword1 = 4,
    Keyword2 = 5,
    String = 6,
    Number = 7,
    /// Current search match.
    Match = 8,
}

impl Highlight {
    /// Every class, in discriminant order.
    pub const ALL: [Self; 9] = [
        Self::Normal,
        Self::NonPrint,
        Self::Comment,
        Self::MlComment,
        Self::Keyword1,
        Self::Keyword2,
        Self::String,
        Self::Number,
        Self::Match,
    ];

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether the class belongs to either comment kind.
    #[must_use]
    pub const fn is_comment(self) -> bool {
        matches!(self, Self::Comment | Self::MlComment)
    }
}
