//! HTML reading and writing for [`Document`](crate::Document) cells.
//!
//! The writer emits paragraphs, headings, code blocks, links, inline marks
//! and inline images. The reader is tolerant: list items and other block
//! containers flatten into paragraphs, unknown tags are dropped and their
//! text kept.

use std::fmt::Write;

use crate::{
    Mark, Marks,
    document::{Block, Cell},
};

/// Serialize the blocks of a document to HTML. `first` is the kind of the
/// block before the first break.
pub fn serialize(first: Block, cells: &[Cell]) -> String {
    let blocks = split_blocks(first, cells);
    let mut out = String::new();

    for (i, (kind, content)) in blocks.iter().enumerate() {
        match *kind {
            Block::Paragraph => {
                out.push_str("<p>");
                write_inline(&mut out, content, false);
                out.push_str("</p>");
            }
            Block::Heading(level) => {
                let level = level.clamp(1, 6);
                let _ = write!(out, "<h{level}>");
                write_inline(&mut out, content, false);
                let _ = write!(out, "</h{level}>");
            }
            Block::Code => {
                let joined = i > 0 && blocks[i - 1].0 == Block::Code;
                out.push_str(if joined { "\n" } else { "<pre><code>" });
                write_inline(&mut out, content, true);
                if blocks.get(i + 1).is_none_or(|(next, _)| *next != Block::Code) {
                    out.push_str("</code></pre>");
                }
            }
        }
    }
    out
}

fn split_blocks(first: Block, cells: &[Cell]) -> Vec<(Block, &[Cell])> {
    let mut blocks = Vec::new();
    let mut kind = first;
    let mut start = 0;
    for (i, cell) in cells.iter().enumerate() {
        if let Cell::Break(next) = cell {
            blocks.push((kind, &cells[start..i]));
            kind = *next;
            start = i + 1;
        }
    }
    blocks.push((kind, &cells[start..]));
    blocks
}

/// Write the inline content of one block. Links wrap marks; marks nest in
/// [`Mark::ALL`] order. Inside code blocks the code mark is implied.
fn write_inline(out: &mut String, cells: &[Cell], in_code: bool) {
    let mut open: Vec<Mark> = Vec::new();
    let mut link: Option<&str> = None;
    let mut run = String::new();

    for cell in cells {
        match cell {
            Cell::Char {
                ch,
                marks,
                link: target,
            } => {
                let target = target.as_deref();
                if target != link {
                    flush(out, &mut run);
                    close_marks(out, &mut open, 0);
                    if link.is_some() {
                        out.push_str("</a>");
                    }
                    if let Some(href) = target {
                        let _ = write!(out, "<a href=\"{}\">", escape_attr(href));
                    }
                    link = target;
                }

                let mut marks = *marks;
                if in_code {
                    marks.remove(Mark::Code);
                }
                let wanted: Vec<Mark> = marks.iter().collect();
                let keep = open
                    .iter()
                    .zip(&wanted)
                    .take_while(|(a, b)| a == b)
                    .count();

                if keep < open.len() || keep < wanted.len() {
                    flush(out, &mut run);
                    close_marks(out, &mut open, keep);
                    for mark in &wanted[keep..] {
                        let _ = write!(out, "<{}>", mark.tag());
                        open.push(*mark);
                    }
                }
                run.push(*ch);
            }
            Cell::Image { src } => {
                flush(out, &mut run);
                close_marks(out, &mut open, 0);
                if link.take().is_some() {
                    out.push_str("</a>");
                }
                let _ = write!(out, "<img src=\"{}\">", escape_attr(src));
            }
            Cell::Break(_) => {}
        }
    }

    flush(out, &mut run);
    close_marks(out, &mut open, 0);
    if link.is_some() {
        out.push_str("</a>");
    }
}

fn flush(out: &mut String, run: &mut String) {
    out.push_str(&escape_text(run));
    run.clear();
}

fn close_marks(out: &mut String, open: &mut Vec<Mark>, keep: usize) {
    for mark in open.drain(keep..).rev() {
        let _ = write!(out, "</{}>", mark.tag());
    }
}

/// Escape text content.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "blockquote",
    "li",
    "ul",
    "ol",
    "figure",
    "section",
    "article",
];

/// Elements whose content is never text.
const RAW_TAGS: &[&str] = &["script", "style"];

/// Parse HTML into the kind of the first block and the cells.
pub fn parse(source: &str) -> (Block, Vec<Cell>) {
    let mut reader = Reader::default();
    let mut rest = source;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
            continue;
        }

        if rest.starts_with('<') {
            let starts_tag = rest[1..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');
            let Some(end) = rest.find('>').filter(|_| starts_tag) else {
                reader.text("<");
                rest = &rest[1..];
                continue;
            };

            let raw = reader.tag(&rest[1..end]);
            rest = &rest[end + 1..];
            if let Some(name) = raw {
                let closing = format!("</{name}");
                rest = rest
                    .to_ascii_lowercase()
                    .find(&closing)
                    .map_or("", |at| &rest[at..]);
            }
            continue;
        }

        let end = rest.find('<').unwrap_or(rest.len());
        reader.text(&rest[..end]);
        rest = &rest[end..];
    }

    (reader.first, reader.cells)
}

#[derive(Default)]
struct Reader {
    first: Block,
    cells: Vec<Cell>,
    /// Open count per mark, indexed like [`Mark::ALL`].
    depth: [usize; Mark::ALL.len()],
    /// Open anchors and their targets.
    links: Vec<Option<String>>,
    /// Open `<pre>` elements.
    pre: usize,
    /// Kind of the block receiving content.
    current: Block,
    /// A block closed; the next content starts a new paragraph.
    need_break: bool,
    /// A block opened and nothing was added since.
    fresh: bool,
}

impl Reader {
    /// Handle one tag body (between `<` and `>`). Returns the name of a raw
    /// text element whose content must be skipped.
    fn tag(&mut self, body: &str) -> Option<&'static str> {
        let body = body.trim();
        let (closing, body) = match body.strip_prefix('/') {
            Some(body) => (true, body),
            None => (false, body),
        };
        let body = body.trim_end_matches('/');
        let name_end = body
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(body.len());
        let name = body[..name_end].to_ascii_lowercase();
        let attrs = &body[name_end..];

        if let Some(mark) = Mark::from_tag(&name) {
            // `<pre><code>` marks the block, not its text.
            if mark == Mark::Code && self.pre > 0 {
                return None;
            }
            let depth = &mut self.depth[mark as usize];
            if closing {
                *depth = depth.saturating_sub(1);
            } else {
                *depth += 1;
            }
            return None;
        }

        match name.as_str() {
            "a" if closing => {
                self.links.pop();
            }
            "a" => {
                let href = attribute(attrs, "href").filter(|href| !href.is_empty());
                self.links.push(href);
            }
            "br" if !closing => self.line_break(),
            "img" if !closing => {
                if let Some(src) = attribute(attrs, "src") {
                    self.image(src);
                }
            }
            "pre" if closing => {
                self.pre = self.pre.saturating_sub(1);
                self.close_block();
            }
            "pre" => {
                if self.pre == 0 {
                    self.open_block(Block::Code);
                }
                self.pre += 1;
            }
            _ if self.pre > 0 => {}
            name if heading_level(name).is_some() => {
                if closing {
                    self.close_block();
                } else if let Some(level) = heading_level(name) {
                    self.open_block(Block::Heading(level));
                }
            }
            name if BLOCK_TAGS.contains(&name) => {
                if closing {
                    self.close_block();
                } else {
                    self.open_block(Block::Paragraph);
                }
            }
            name if !closing => {
                return RAW_TAGS.iter().copied().find(|raw| *raw == name);
            }
            _ => {}
        }
        None
    }

    fn marks(&self) -> Marks {
        let mut marks = Marks::NONE;
        for mark in Mark::ALL {
            if self.depth[mark as usize] > 0 {
                marks.insert(mark);
            }
        }
        marks
    }

    fn link(&self) -> Option<String> {
        self.links.last().cloned().flatten()
    }

    fn at_paragraph_start(&self) -> bool {
        self.need_break || self.fresh || matches!(self.cells.last(), None | Some(Cell::Break(_)))
    }

    fn after_space(&self) -> bool {
        matches!(self.cells.last(), Some(Cell::Char { ch: ' ', .. }))
    }

    fn start_content(&mut self) {
        if self.need_break {
            self.cells.push(Cell::Break(Block::Paragraph));
            self.current = Block::Paragraph;
            self.need_break = false;
        }
        self.fresh = false;
    }

    fn push_chars(&mut self, text: &str) {
        let marks = self.marks();
        let link = self.link();
        let block = self.current;
        for ch in text.chars() {
            self.cells.push(match ch {
                '\n' => Cell::Break(block),
                ch => Cell::Char {
                    ch,
                    marks,
                    link: link.clone(),
                },
            });
        }
    }

    fn text(&mut self, raw: &str) {
        if self.pre > 0 {
            self.preformatted(raw);
            return;
        }

        let collapsed = collapse_whitespace(raw);
        let trimmed = if self.at_paragraph_start() || self.after_space() {
            collapsed.trim_start()
        } else {
            collapsed.as_str()
        };
        if trimmed.is_empty() {
            return;
        }

        let text = decode_entities(trimmed);
        self.start_content();
        self.push_chars(&text);
    }

    /// Text inside `<pre>`: whitespace is kept and newlines become code lines.
    fn preformatted(&mut self, raw: &str) {
        let text = decode_entities(raw).replace("\r\n", "\n");
        // A newline right after the opening tag is not content.
        let text = match text.strip_prefix('\n') {
            Some(rest) if self.fresh => rest,
            _ => text.as_str(),
        };
        if text.is_empty() {
            return;
        }

        self.start_content();
        self.push_chars(text);
    }

    fn image(&mut self, src: String) {
        if src.is_empty() {
            return;
        }
        self.start_content();
        self.cells.push(Cell::Image { src });
    }

    fn line_break(&mut self) {
        self.start_content();
        self.cells.push(Cell::Break(self.current));
    }

    fn open_block(&mut self, kind: Block) {
        if self.need_break || (!self.fresh && !self.cells.is_empty()) {
            self.cells.push(Cell::Break(kind));
        } else {
            // Nested opening tags without content in between: the innermost
            // decides the kind.
            match self.cells.last_mut() {
                Some(Cell::Break(block)) => *block = kind,
                _ => self.first = kind,
            }
        }
        self.current = kind;
        self.need_break = false;
        self.fresh = true;
    }

    fn close_block(&mut self) {
        self.need_break = true;
        self.fresh = false;
    }
}

fn heading_level(name: &str) -> Option<u8> {
    match name.as_bytes() {
        [b'h', level @ b'1'..=b'6'] => Some(level - b'0'),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Value of attribute `key`, quoted or not.
fn attribute(attrs: &str, key: &str) -> Option<String> {
    let mut rest = attrs;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return None;
        }

        let name_end = rest
            .find(|c: char| c == '=' || c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let mut value = "";
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            let (found, remaining) = match after.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let inner = &after[1..];
                    let end = inner.find(quote).unwrap_or(inner.len());
                    (&inner[..end], inner.get(end + 1..).unwrap_or(""))
                }
                _ => {
                    let end = after
                        .find(|c: char| c.is_ascii_whitespace())
                        .unwrap_or(after.len());
                    (&after[..end], &after[end..])
                }
            };
            value = found;
            rest = remaining;
        }

        if name.eq_ignore_ascii_case(key) {
            return Some(decode_entities(value));
        }
    }
}

/// Decode named and numeric character references.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let decoded = tail
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|ch| (ch, end)));

        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(html: &str) -> String {
        let (first, cells) = parse(html);
        serialize(first, &cells)
    }

    #[test]
    fn test_paragraphs_round_trip() {
        for html in [
            "<p>one</p><p>two</p>",
            "<p><strong>a<em>b</em></strong>c</p>",
            "<p></p><p>after empty</p>",
            "<p>a<img src=\"https://img.example/x.png\">b</p>",
            "<p><img src=\"https://img.example/x.png\"></p>",
            "<p>x &amp; y &lt; z</p>",
        ] {
            assert_eq!(round_trip(html), html);
        }
    }

    #[test]
    fn test_structure_round_trip() {
        for html in [
            "<h2>Setup</h2><p>See <a href=\"https://docs.rs\">the docs</a> and <u>this</u></p>\
             <pre><code>let x = 1;</code></pre>",
            "<h1>A</h1><h3>B</h3><p>c</p>",
            "<p><a href=\"https://a.example/?q=1&amp;r=2\"><strong>bold</strong> link</a></p>",
            "<pre><code>fn main() {\n    run(&amp;args);\n}</code></pre><p>after</p>",
        ] {
            assert_eq!(round_trip(html), html);
        }
    }

    #[test]
    fn test_empty_document() {
        let (first, cells) = parse("");
        assert_eq!(first, Block::Paragraph);
        assert!(cells.is_empty());
        assert_eq!(serialize(Block::Paragraph, &[]), "<p></p>");
    }

    #[test]
    fn test_legacy_tags_and_lists() {
        let html = "<h1>Title</h1><ul><li><b>one</b></li><li><i>two</i></li></ul>";
        assert_eq!(
            round_trip(html),
            "<h1>Title</h1><p><strong>one</strong></p><p><em>two</em></p>"
        );
        assert_eq!(round_trip("<p><ins>new</ins></p>"), "<p><u>new</u></p>");
    }

    #[test]
    fn test_nested_block_openers_take_innermost_kind() {
        assert_eq!(
            round_trip("<div><h2>x</h2></div><section><pre>y</pre></section>"),
            "<h2>x</h2><pre><code>y</code></pre>"
        );
    }

    #[test]
    fn test_preformatted_text_keeps_whitespace() {
        let (first, cells) = parse("<pre><code>\na  b\n</code></pre>");
        assert_eq!(first, Block::Code);
        assert_eq!(
            cells,
            vec![
                Cell::text('a', Marks::NONE),
                Cell::text(' ', Marks::NONE),
                Cell::text(' ', Marks::NONE),
                Cell::text('b', Marks::NONE),
                Cell::Break(Block::Code),
            ]
        );
        assert_eq!(serialize(first, &cells), "<pre><code>a  b\n</code></pre>");
    }

    #[test]
    fn test_anchor_without_href_is_plain_text() {
        assert_eq!(round_trip("<p><a name=\"top\">top</a></p>"), "<p>top</p>");
    }

    #[test]
    fn test_whitespace_between_blocks() {
        let html = "\n  <p>  Hello\n   world </p>\n\n  <p>next</p>\n";
        assert_eq!(round_trip(html), "<p>Hello world </p><p>next</p>");
    }

    #[test]
    fn test_line_break_splits_block() {
        assert_eq!(round_trip("<p>a<br>b</p>"), "<p>a</p><p>b</p>");
        assert_eq!(round_trip("<h2>a<br>b</h2>"), "<h2>a</h2><h2>b</h2>");
    }

    #[test]
    fn test_image_attributes() {
        let (first, cells) =
            parse("<p>x</p><img alt='cover' src=https://img.example/a.png?w=1&amp;h=2 />");
        assert_eq!(
            cells.last(),
            Some(&Cell::Image {
                src: "https://img.example/a.png?w=1&h=2".to_string()
            })
        );
        // An image outside any paragraph gets one of its own.
        assert_eq!(
            serialize(first, &cells),
            "<p>x</p><p><img src=\"https://img.example/a.png?w=1&amp;h=2\"></p>"
        );

        assert!(parse("<img alt=\"no source\">").1.is_empty());
    }

    #[test]
    fn test_image_between_marked_text() {
        assert_eq!(
            round_trip("<p><strong>a<img src=\"https://img.example/x.png\">b</strong></p>"),
            "<p><strong>a</strong><img src=\"https://img.example/x.png\"><strong>b</strong></p>"
        );
    }

    #[test]
    fn test_comments_scripts_and_unknown_tags() {
        let html = "<p>a<!-- note --><span class=\"x\">b</span></p>\
                    <script>alert('<p>')</script><p>c</p>";
        assert_eq!(round_trip(html), "<p>ab</p><p>c</p>");
    }

    #[test]
    fn test_stray_angle_bracket_is_text() {
        assert_eq!(round_trip("<p>1 < 2</p>"), "<p>1 &lt; 2</p>");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&quot;a&quot; &#39;b&#x27;"), "\"a\" 'b'");
        assert_eq!(decode_entities("&nbsp;"), "\u{a0}");
        assert_eq!(decode_entities("AT&T &unknown;"), "AT&T &unknown;");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("a\"b'<c>&"), "a&quot;b&#39;&lt;c&gt;&amp;");
    }
}
