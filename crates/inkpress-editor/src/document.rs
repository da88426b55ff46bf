//! Flat rich-text document with a selection.
//!
//! The document is a sequence of [`Cell`]s. Blocks are separated by
//! [`Cell::Break`], which carries the kind of the block it starts; the kind
//! of the first block is kept on the document. Images are inline atoms
//! occupying one position. Positions are cell indices, so the plain-text
//! projection (`\n` for breaks, [`IMAGE_PLACEHOLDER`] for images) has
//! exactly one `char` per cell.

use crate::{Mark, Marks, RichTextEditor, html};

/// Initial content of a new post.
pub const PLACEHOLDER_HTML: &str = "<p>Type here...</p>";

/// Stand-in for an image in the plain-text projection.
pub const IMAGE_PLACEHOLDER: char = '\u{FFFC}';

/// Kind of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Block {
    #[default]
    Paragraph,
    /// `<h1>` to `<h6>`.
    Heading(u8),
    /// One line of a `<pre><code>` block. Adjacent lines form one block.
    Code,
}

impl Block {
    /// Kind of the block started by a line break typed inside `self`.
    pub fn next(self) -> Self {
        match self {
            Self::Code => Self::Code,
            _ => Self::Paragraph,
        }
    }
}

/// One position of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// A character with its inline marks and link target.
    Char {
        ch: char,
        marks: Marks,
        link: Option<String>,
    },
    /// Start of a new block of the given kind.
    Break(Block),
    /// Embedded image.
    Image { src: String },
}

impl Cell {
    /// Unlinked character.
    pub fn text(ch: char, marks: Marks) -> Self {
        Self::Char {
            ch,
            marks,
            link: None,
        }
    }

    fn marks(&self) -> Option<Marks> {
        match self {
            Self::Char { marks, .. } => Some(*marks),
            _ => None,
        }
    }

    fn link(&self) -> Option<&str> {
        match self {
            Self::Char { link, .. } => link.as_deref(),
            _ => None,
        }
    }

    fn projected(&self) -> char {
        match self {
            Self::Char { ch, .. } => *ch,
            Self::Break(_) => '\n',
            Self::Image { .. } => IMAGE_PLACEHOLDER,
        }
    }
}

/// Document model implementing [`RichTextEditor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Kind of the block before the first break.
    first: Block,
    cells: Vec<Cell>,
    anchor: usize,
    head: usize,
    /// Marks for the next typed text when the selection is collapsed.
    stored: Option<Marks>,
    editable: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty, editable document.
    pub fn new() -> Self {
        Self::from_cells(Vec::new())
    }

    /// Document pre-filled with [`PLACEHOLDER_HTML`].
    pub fn placeholder() -> Self {
        Self::from_html(PLACEHOLDER_HTML)
    }

    /// Parse HTML; the cursor is placed at the end.
    pub fn from_html(source: &str) -> Self {
        let (first, cells) = html::parse(source);
        Self::from_blocks(first, cells)
    }

    /// Build a document of paragraphs; the cursor is placed at the end.
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self::from_blocks(Block::Paragraph, cells)
    }

    /// Build a document whose first block is of kind `first`.
    pub fn from_blocks(first: Block, cells: Vec<Cell>) -> Self {
        let end = cells.len();
        Self {
            first,
            cells,
            anchor: end,
            head: end,
            stored: None,
            editable: true,
        }
    }

    /// Serialize to HTML.
    pub fn to_html(&self) -> String {
        html::serialize(self.first, &self.cells)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Make the document read-only or editable again.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    /// Set the selection; offsets are clamped to the document.
    pub fn select(&mut self, anchor: usize, head: usize) {
        self.anchor = anchor.min(self.cells.len());
        self.head = head.min(self.cells.len());
        self.stored = None;
    }

    /// Ordered selection bounds `(from, to)`.
    pub fn selection(&self) -> (usize, usize) {
        (self.anchor.min(self.head), self.anchor.max(self.head))
    }

    /// Kind of the block containing position `pos`.
    pub fn block_at(&self, pos: usize) -> Block {
        let pos = pos.min(self.cells.len());
        self.cells[..pos]
            .iter()
            .rev()
            .find_map(|cell| match cell {
                Cell::Break(block) => Some(*block),
                _ => None,
            })
            .unwrap_or(self.first)
    }

    /// Image URLs in document order.
    pub fn image_sources(&self) -> Vec<&str> {
        self.cells
            .iter()
            .filter_map(|cell| match cell {
                Cell::Image { src } => Some(src.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Plain-text projection, one `char` per cell.
    pub fn plain_text(&self) -> String {
        self.cells.iter().map(Cell::projected).collect()
    }

    /// Replace `from..to` with `text`, typed with the cursor's marks.
    pub fn replace_text(&mut self, from: usize, to: usize, text: &str) {
        if !self.editable {
            return;
        }
        let from = from.min(self.cells.len());
        let to = to.clamp(from, self.cells.len());

        let marks = self.stored.unwrap_or_else(|| self.marks_before(from));
        let link = self.link_around(from, to);
        let block = self.block_at(from).next();
        let inserted: Vec<Cell> = text
            .chars()
            .filter(|ch| *ch != IMAGE_PLACEHOLDER)
            .map(|ch| match ch {
                '\n' => Cell::Break(block),
                ch => Cell::Char {
                    ch,
                    marks,
                    link: link.clone(),
                },
            })
            .collect();

        let cursor = from + inserted.len();
        self.cells.splice(from..to, inserted);
        self.anchor = cursor;
        self.head = cursor;
        self.stored = None;
    }

    /// Reconcile with an edited plain-text projection.
    ///
    /// Only the span between the common prefix and common suffix is
    /// replaced, so marks and images outside of it survive.
    pub fn apply_text_change(&mut self, new_text: &str) {
        let old: Vec<char> = self.plain_text().chars().collect();
        let new: Vec<char> = new_text.chars().collect();

        let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
        let max_suffix = old.len().min(new.len()) - prefix;
        let suffix = old
            .iter()
            .rev()
            .zip(new.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        if prefix == old.len() && prefix == new.len() {
            return;
        }

        let inserted: String = new[prefix..new.len() - suffix].iter().collect();
        self.replace_text(prefix, old.len() - suffix, &inserted);
    }

    fn marks_before(&self, pos: usize) -> Marks {
        pos.checked_sub(1)
            .and_then(|i| self.cells.get(i))
            .and_then(Cell::marks)
            .unwrap_or_default()
    }

    /// Link shared by the characters on both sides of `from..to`. Text typed
    /// at the edge of a link stays unlinked.
    fn link_around(&self, from: usize, to: usize) -> Option<String> {
        let before = from.checked_sub(1).and_then(|i| self.cells.get(i))?.link()?;
        let after = self.cells.get(to)?.link()?;
        (before == after).then(|| before.to_string())
    }

    /// Marks that typing at the cursor would use.
    fn cursor_marks(&self) -> Marks {
        self.stored.unwrap_or_else(|| self.marks_before(self.head))
    }

    fn selected_marks(&self) -> impl Iterator<Item = Marks> + '_ {
        let (from, to) = self.selection();
        self.cells[from..to].iter().filter_map(Cell::marks)
    }
}

impl RichTextEditor for Document {
    fn can_apply(&self, mark: Mark) -> bool {
        if !self.editable {
            return false;
        }

        let (from, to) = self.selection();
        if from == to {
            return mark == Mark::Code || !self.cursor_marks().contains(Mark::Code);
        }

        let mut any_text = false;
        for marks in self.selected_marks() {
            any_text = true;
            // Code excludes every other mark.
            if mark != Mark::Code && marks.contains(Mark::Code) {
                return false;
            }
        }
        any_text
    }

    fn toggle(&mut self, mark: Mark) {
        if !self.can_apply(mark) {
            return;
        }

        let (from, to) = self.selection();
        if from == to {
            let mut marks = self.cursor_marks();
            if marks.contains(mark) {
                marks.remove(mark);
            } else if mark == Mark::Code {
                marks = Marks::only(Mark::Code);
            } else {
                marks.insert(mark);
            }
            self.stored = Some(marks);
            return;
        }

        let remove = self.is_active(mark);
        for cell in &mut self.cells[from..to] {
            if let Cell::Char { marks, .. } = cell {
                if remove {
                    marks.remove(mark);
                } else if mark == Mark::Code {
                    *marks = Marks::only(Mark::Code);
                } else {
                    marks.insert(mark);
                }
            }
        }
    }

    fn current_content(&self) -> String {
        self.to_html()
    }

    fn insert_image(&mut self, url: &str) {
        if !self.editable || url.is_empty() {
            return;
        }

        let (from, to) = self.selection();
        self.cells.splice(
            from..to,
            [Cell::Image {
                src: url.to_string(),
            }],
        );
        self.anchor = from + 1;
        self.head = from + 1;
        self.stored = None;
        tracing::debug!(url, position = from, "Inserted image");
    }

    fn is_active(&self, mark: Mark) -> bool {
        let (from, to) = self.selection();
        if from == to {
            return self.cursor_marks().contains(mark);
        }

        let mut any_text = false;
        for marks in self.selected_marks() {
            any_text = true;
            if !marks.contains(mark) {
                return false;
            }
        }
        any_text
    }
}

/// Convert a UTF-16 offset (as reported by DOM selection APIs) into a
/// `char` offset of `text`.
pub fn utf16_to_offset(text: &str, units: usize) -> usize {
    let mut seen = 0;
    for (index, ch) in text.chars().enumerate() {
        if seen >= units {
            return index;
        }
        seen += ch.len_utf16();
    }
    text.chars().count()
}

/// Convert a `char` offset of `text` into UTF-16 units.
pub fn offset_to_utf16(text: &str, offset: usize) -> usize {
    text.chars().take(offset).map(char::len_utf16).sum()
}
