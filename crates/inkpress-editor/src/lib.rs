//! Inkpress Editor
//!
//! Rich-text editing behind a small interface.
//!
//! # Components
//!
//! - [`RichTextEditor`] - the capability set views depend on
//! - [`Mark`] / [`Marks`] - inline formatting
//! - [`Document`] - in-repo engine implementing [`RichTextEditor`]
//!
//! # Example
//!
//! ```
//! use inkpress_editor::{Document, Mark, RichTextEditor};
//!
//! let mut doc = Document::from_html("<p>Hello world</p>");
//! doc.select(0, 5);
//! doc.toggle(Mark::Bold);
//! assert_eq!(doc.current_content(), "<p><strong>Hello</strong> world</p>");
//! ```

pub mod document;
pub mod html;

pub use document::{
    Block, Cell, Document, IMAGE_PLACEHOLDER, PLACEHOLDER_HTML, offset_to_utf16, utf16_to_offset,
};

/// Inline formatting mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
}

impl Mark {
    /// All marks, in nesting order (outermost first).
    pub const ALL: [Mark; 5] = [
        Mark::Bold,
        Mark::Italic,
        Mark::Underline,
        Mark::Strike,
        Mark::Code,
    ];

    /// HTML tag written for this mark.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Bold => "strong",
            Self::Italic => "em",
            Self::Underline => "u",
            Self::Strike => "s",
            Self::Code => "code",
        }
    }

    /// Toolbar label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Underline => "Underline",
            Self::Strike => "Strike",
            Self::Code => "Code",
        }
    }

    /// Mark for an HTML tag name, including legacy aliases.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "strong" | "b" => Some(Self::Bold),
            "em" | "i" => Some(Self::Italic),
            "u" | "ins" => Some(Self::Underline),
            "s" | "strike" | "del" => Some(Self::Strike),
            "code" => Some(Self::Code),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Bold => 1,
            Self::Italic => 1 << 1,
            Self::Underline => 1 << 2,
            Self::Strike => 1 << 3,
            Self::Code => 1 << 4,
        }
    }
}

/// Set of marks carried by one character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Marks(u8);

impl Marks {
    /// No marks.
    pub const NONE: Marks = Marks(0);

    /// A set holding only `mark`.
    pub fn only(mark: Mark) -> Self {
        Self(mark.bit())
    }

    pub fn contains(self, mark: Mark) -> bool {
        self.0 & mark.bit() != 0
    }

    pub fn insert(&mut self, mark: Mark) {
        self.0 |= mark.bit();
    }

    pub fn remove(&mut self, mark: Mark) {
        self.0 &= !mark.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Marks present, in nesting order.
    pub fn iter(self) -> impl DoubleEndedIterator<Item = Mark> {
        Mark::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

/// Capability set of a rich-text engine.
///
/// Views depend on this trait only, so any engine that can report and toggle
/// marks, serialize its content, and embed images can back the form.
pub trait RichTextEditor {
    /// Whether `mark` can be toggled on the current selection.
    fn can_apply(&self, mark: Mark) -> bool;

    /// Toggle `mark` on the current selection.
    fn toggle(&mut self, mark: Mark);

    /// Serialized HTML of the whole document.
    fn current_content(&self) -> String;

    /// Insert an image node at the cursor.
    fn insert_image(&mut self, url: &str);

    /// Whether `mark` is active on the current selection.
    fn is_active(&self, _mark: Mark) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_set_operations() {
        let mut marks = Marks::NONE;
        assert!(marks.is_empty());

        marks.insert(Mark::Italic);
        marks.insert(Mark::Bold);
        assert!(marks.contains(Mark::Bold));
        assert_eq!(marks.iter().collect::<Vec<_>>(), vec![Mark::Bold, Mark::Italic]);

        marks.remove(Mark::Bold);
        assert_eq!(marks, Marks::only(Mark::Italic));
    }

    #[test]
    fn test_tag_aliases() {
        assert_eq!(Mark::from_tag("b"), Some(Mark::Bold));
        assert_eq!(Mark::from_tag("del"), Some(Mark::Strike));
        assert_eq!(Mark::from_tag("ins"), Some(Mark::Underline));
        assert_eq!(Mark::from_tag("span"), None);
        for mark in Mark::ALL {
            assert_eq!(Mark::from_tag(mark.tag()), Some(mark));
        }
    }
}
