//! A single line of the document.

use crate::highlight::{Highlight, Syntax, highlight_row};
use std::borrow::Cow;

/// One line: raw bytes, the tab-expanded render, and per-byte highlight.
///
/// `render` and `highlight` always have the same length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    pub(crate) idx: usize,
    chars: Vec<u8>,
    render: Vec<u8>,
    hl: Vec<Highlight>,
    open_comment: bool,
    starts_in_comment: bool,
}

impl Row {
    pub(crate) fn new(idx: usize, chars: Vec<u8>) -> Self {
        Self {
            idx,
            chars,
            ..Self::default()
        }
    }

    /// Position of the row in its document.
    #[must_use]
    pub fn index(&self) -> usize {
        self.idx
    }

    /// Raw bytes as stored on disk, without the line terminator.
    #[must_use]
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// Raw bytes, lossily decoded for display or assertions.
    #[must_use]
    pub fn as_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.chars)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Tab-expanded bytes.
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Highlight class per rendered byte.
    #[must_use]
    pub fn highlight(&self) -> &[Highlight] {
        &self.hl
    }

    /// Whether a block comment is still open at the end of this row.
    #[must_use]
    pub fn has_open_comment(&self) -> bool {
        self.open_comment
    }

    /// Whether this row was last highlighted as starting inside a comment.
    #[must_use]
    pub fn starts_in_comment(&self) -> bool {
        self.starts_in_comment
    }

    /// Rendered column of raw column `col`. Columns past the end map one to
    /// one.
    #[must_use]
    pub fn render_column(&self, col: usize, tab_stop: usize) -> usize {
        let tab_stop = tab_stop.max(1);
        let mut rx = 0;
        for &c in self.chars.iter().take(col) {
            rx += 1;
            if c == b'\t' {
                while (rx + 1) % tab_stop != 0 {
                    rx += 1;
                }
            }
        }
        rx + col.saturating_sub(self.chars.len())
    }

    /// Raw column holding rendered column `rx`.
    #[must_use]
    pub fn raw_column(&self, rx: usize, tab_stop: usize) -> usize {
        let tab_stop = tab_stop.max(1);
        let mut cur = 0;
        for (col, &c) in self.chars.iter().enumerate() {
            let mut next = cur + 1;
            if c == b'\t' {
                while (next + 1) % tab_stop != 0 {
                    next += 1;
                }
            }
            if next > rx {
                return col;
            }
            cur = next;
        }
        self.chars.len() + rx.saturating_sub(cur)
    }

    pub(crate) fn update_render(&mut self, tab_stop: usize) {
        self.render.clear();
        expand_tabs(&self.chars, tab_stop, &mut self.render);
    }

    /// Re-highlight from the current render. Returns whether the open flag
    /// changed.
    pub(crate) fn update_highlight(
        &mut self,
        syntax: Option<&Syntax>,
        starts_in_comment: bool,
    ) -> bool {
        let was_open = self.open_comment;
        self.starts_in_comment = starts_in_comment;
        self.open_comment = highlight_row(&self.render, syntax, starts_in_comment, &mut self.hl);
        self.open_comment != was_open
    }

    pub(crate) fn highlight_mut(&mut self) -> &mut [Highlight] {
        &mut self.hl
    }

    /// Insert `c` at `at`, padding with spaces when `at` is past the end.
    pub(crate) fn insert_byte(&mut self, at: usize, c: u8) {
        if at > self.chars.len() {
            self.chars.resize(at, b' ');
        }
        self.chars.insert(at, c);
    }

    pub(crate) fn remove_byte(&mut self, at: usize) -> Option<u8> {
        (at < self.chars.len()).then(|| self.chars.remove(at))
    }

    pub(crate) fn append(&mut self, bytes: &[u8]) {
        self.chars.extend_from_slice(bytes);
    }

    pub(crate) fn split_off(&mut self, at: usize) -> Vec<u8> {
        self.chars.split_off(at.min(self.chars.len()))
    }

    pub(crate) fn into_chars(self) -> Vec<u8> {
        self.chars
    }
}

/// Expand `chars` into `out`: a tab becomes one space plus spaces until the
/// next 1-indexed column is a multiple of `tab_stop`.
pub fn expand_tabs(chars: &[u8], tab_stop: usize, out: &mut Vec<u8>) {
    let tab_stop = tab_stop.max(1);
    let start = out.len();
    for &c in chars {
        if c == b'\t' {
            out.push(b' ');
            while (out.len() - start + 1) % tab_stop != 0 {
                out.push(b' ');
            }
        } else {
            out.push(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(text: &str) -> Row {
        let mut row = Row::new(0, text.as_bytes().to_vec());
        row.update_render(8);
        row.update_highlight(None, false);
        row
    }

    #[test]
    fn tab_expands_to_stop() {
        assert_eq!(row("\tx").render(), format!("{}x", " ".repeat(7)).as_bytes());
        assert_eq!(row("abc\td").render(), format!("abc{}d", " ".repeat(4)).as_bytes());
        assert_eq!(
            row("abcdefg\th").render(),
            format!("abcdefg{}h", " ".repeat(8)).as_bytes()
        );
    }

    #[test]
    fn tab_width_is_between_one_and_tab_stop() {
        for prefix in 0..16 {
            let text = format!("{}\t", "a".repeat(prefix));
            let width = row(&text).render().len() - prefix;
            assert!((1..=8).contains(&width), "prefix {prefix} width {width}");
        }
    }

    #[test]
    fn render_and_highlight_lengths_match() {
        let r = row("a\tb\t\tc");
        assert_eq!(r.render().len(), r.highlight().len());
    }

    #[test]
    fn render_column_follows_tabs() {
        let r = row("\tx");
        assert_eq!(r.render_column(0, 8), 0);
        assert_eq!(r.render_column(1, 8), 7);
        assert_eq!(r.render_column(2, 8), 8);
        assert_eq!(r.render_column(4, 8), 10);
    }

    #[test]
    fn raw_column_inverts_render_column() {
        let r = row("a\tbc");
        for col in 0..=r.len() + 2 {
            let rx = r.render_column(col, 8);
            assert_eq!(r.raw_column(rx, 8), col);
        }
        // Inside a tab maps back to the tab.
        assert_eq!(r.raw_column(3, 8), 1);
    }

    #[test]
    fn insert_pads_with_spaces() {
        let mut r = Row::new(0, b"ab".to_vec());
        r.insert_byte(5, b'x');
        assert_eq!(r.chars(), b"ab   x");
        r.insert_byte(0, b'>');
        assert_eq!(r.chars(), b">ab   x");
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut r = Row::new(0, b"ab".to_vec());
        assert_eq!(r.remove_byte(2), None);
        assert_eq!(r.remove_byte(0), Some(b'a'));
        assert_eq!(r.as_str_lossy(), "b");
    }
}
