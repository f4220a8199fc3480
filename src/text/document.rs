//! Ordered row storage with incremental highlighting.

use super::row::Row;
use crate::config::{Config, DEFAULT_TAB_STOP};
use crate::highlight::{Highlight, Syntax};
use std::sync::Arc;

/// The open file as a list of rows.
///
/// Row-level operations never fail: out-of-range positions are no-ops,
/// clamped, or padded as each method documents. Every mutation re-renders
/// the touched row and re-highlights downstream rows whose comment state
/// changed.
#[derive(Clone, Debug)]
pub struct Document {
    rows: Vec<Row>,
    syntax: Option<Arc<Syntax>>,
    tab_stop: usize,
    dirty: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            syntax: None,
            tab_stop: DEFAULT_TAB_STOP,
            dirty: 0,
        }
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty document using the tab stop from `config`.
    #[must_use]
    pub fn with_config(config: &Config) -> Self {
        Self {
            tab_stop: config.tab_stop,
            ..Self::default()
        }
    }

    /// Parse `text` into rows with default settings.
    ///
    /// Lines are split on `\n` and lose one trailing `\r`. A final line
    /// without a terminator is still a row; empty input has no rows.
    #[must_use]
    pub fn from_flat_text(text: &[u8]) -> Self {
        let mut document = Self::new();
        document.load_flat_text(text);
        document
    }

    /// Replace all rows with the lines of `text`, keeping the syntax and
    /// tab stop. Clears the dirty counter.
    pub fn load_flat_text(&mut self, text: &[u8]) {
        self.rows.clear();
        if !text.is_empty() {
            let body = text.strip_suffix(b"\n").unwrap_or(text);
            for line in body.split(|&b| b == b'\n') {
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                let at = self.rows.len();
                self.insert_row(at, line);
            }
        }
        self.dirty = 0;
    }

    /// Rows joined with `\n`, each row followed by one terminator.
    #[must_use]
    pub fn to_flat_text(&self) -> Vec<u8> {
        let len = self.rows.iter().map(|row| row.len() + 1).sum();
        let mut out = Vec::with_capacity(len);
        for row in &self.rows {
            out.extend_from_slice(row.chars());
            out.push(b'\n');
        }
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn row_mut(&mut self, at: usize) -> Option<&mut Row> {
        self.rows.get_mut(at)
    }

    /// Raw bytes of every row.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.rows.iter().map(Row::chars)
    }

    /// Rendered bytes and highlight classes of every row.
    pub fn render(&self) -> impl Iterator<Item = (&[u8], &[Highlight])> + '_ {
        self.rows.iter().map(|row| (row.render(), row.highlight()))
    }

    #[must_use]
    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    #[must_use]
    pub fn syntax(&self) -> Option<&Arc<Syntax>> {
        self.syntax.as_ref()
    }

    /// Select the highlighting profile and re-highlight every row.
    pub fn set_syntax(&mut self, syntax: Option<Arc<Syntax>>) {
        self.syntax = syntax;
        self.rehighlight_all();
    }

    /// Whether the document changed since it was loaded or marked clean.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Mutations since the last load or [`Self::mark_clean`].
    #[must_use]
    pub fn dirty_count(&self) -> u64 {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    /// Insert a row at `at` (`0..=len`). Returns `false` and changes
    /// nothing when `at` is out of range.
    pub fn insert_row(&mut self, at: usize, content: &[u8]) -> bool {
        if at > self.rows.len() {
            return false;
        }
        self.rows.insert(at, Row::new(at, content.to_vec()));
        self.renumber_from(at + 1);
        self.update_row(at);
        self.dirty += 1;
        true
    }

    /// Remove row `at`. Returns `false` when out of range.
    pub fn delete_row(&mut self, at: usize) -> bool {
        if at >= self.rows.len() {
            return false;
        }
        self.rows.remove(at);
        self.renumber_from(at);
        self.refresh_start_state(at);
        self.dirty += 1;
        true
    }

    /// Insert byte `c` at (`row`, `col`).
    ///
    /// Missing rows are appended as empty rows, and a row shorter than `col`
    /// is padded with spaces first.
    pub fn insert_char(&mut self, row: usize, col: usize, c: u8) {
        while self.rows.len() <= row {
            let at = self.rows.len();
            self.insert_row(at, b"");
        }
        self.rows[row].insert_byte(col, c);
        self.update_row(row);
        self.dirty += 1;
    }

    /// Remove the byte at (`row`, `col`). Returns `false` when out of range.
    pub fn delete_char(&mut self, row: usize, col: usize) -> bool {
        let Some(target) = self.rows.get_mut(row) else {
            return false;
        };
        if target.remove_byte(col).is_none() {
            return false;
        }
        self.update_row(row);
        self.dirty += 1;
        true
    }

    /// Append `bytes` to the end of `row`. Returns `false` when out of range.
    pub fn append_bytes(&mut self, row: usize, bytes: &[u8]) -> bool {
        let Some(target) = self.rows.get_mut(row) else {
            return false;
        };
        target.append(bytes);
        self.update_row(row);
        self.dirty += 1;
        true
    }

    /// Break `row` at `col`, moving the tail into a new row below.
    ///
    /// `col` clamps to the row length. At column 0 the new empty row lands
    /// above. Splitting one past the last row appends an empty row; further
    /// out is a no-op.
    pub fn split_row(&mut self, row: usize, col: usize) {
        let len = self.rows.len();
        if row >= len {
            if row == len {
                self.insert_row(len, b"");
            }
            return;
        }

        if col == 0 {
            self.insert_row(row, b"");
            return;
        }

        let tail = self.rows[row].split_off(col);
        self.update_row(row);
        self.insert_row(row + 1, &tail);
    }

    /// Append `row` to the row above and remove it.
    ///
    /// Returns the former length of the row above, where a cursor joining
    /// the lines lands. `None` for row 0 or out of range.
    pub fn join_with_previous(&mut self, row: usize) -> Option<usize> {
        if row == 0 || row >= self.rows.len() {
            return None;
        }
        let removed = self.rows.remove(row);
        self.renumber_from(row);

        let landing = self.rows[row - 1].len();
        self.rows[row - 1].append(&removed.into_chars());
        self.update_row(row - 1);
        self.dirty += 1;
        Some(landing)
    }

    fn renumber_from(&mut self, from: usize) {
        for (idx, row) in self.rows.iter_mut().enumerate().skip(from) {
            row.idx = idx;
        }
    }

    fn start_state(&self, at: usize) -> bool {
        at > 0 && self.rows[at - 1].has_open_comment()
    }

    /// Re-render row `at`, then re-highlight it and whatever follows.
    fn update_row(&mut self, at: usize) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        row.update_render(self.tab_stop);
        self.rehighlight_from(at);
    }

    /// Re-highlight row `at` only if the row above now ends differently than
    /// when `at` was last highlighted.
    fn refresh_start_state(&mut self, at: usize) {
        let stale = self
            .rows
            .get(at)
            .is_some_and(|row| row.starts_in_comment() != self.start_state(at));
        if stale {
            self.rehighlight_from(at);
        }
    }

    /// Highlight row `start`, then walk down while the comment state keeps
    /// changing.
    fn rehighlight_from(&mut self, start: usize) {
        let syntax = self.syntax.clone();
        let mut pending = (start < self.rows.len()).then_some(start);

        while let Some(at) = pending.take() {
            let starts_in_comment = self.start_state(at);
            let changed = self.rows[at].update_highlight(syntax.as_deref(), starts_in_comment);
            let open = self.rows[at].has_open_comment();

            if let Some(next) = self.rows.get(at + 1) {
                if changed || next.starts_in_comment() != open {
                    pending = Some(at + 1);
                }
            }
        }
    }

    fn rehighlight_all(&mut self) {
        let syntax = self.syntax.clone();
        let mut open = false;
        for row in &mut self.rows {
            row.update_highlight(syntax.as_deref(), open);
            open = row.has_open_comment();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Document {
        let mut document = Document::new();
        for (i, line) in lines.iter().enumerate() {
            document.insert_row(i, line.as_bytes());
        }
        document
    }

    fn c_doc(lines: &[&str]) -> Document {
        let mut document = doc(lines);
        document.set_syntax(Some(Arc::new(Syntax::c())));
        document
    }

    fn text(document: &Document) -> Vec<String> {
        document
            .lines()
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    fn assert_indices(document: &Document) {
        for (i, row) in document.rows().iter().enumerate() {
            assert_eq!(row.index(), i);
        }
    }

    #[test]
    fn insert_row_bounds() {
        let mut d = doc(&["a", "c"]);
        assert!(d.insert_row(1, b"b"));
        assert!(d.insert_row(3, b"d"));
        assert!(!d.insert_row(9, b"x"));
        assert_eq!(text(&d), ["a", "b", "c", "d"]);
        assert_indices(&d);
    }

    #[test]
    fn delete_row_renumbers() {
        let mut d = doc(&["a", "b", "c"]);
        assert!(d.delete_row(0));
        assert!(!d.delete_row(5));
        assert_eq!(text(&d), ["b", "c"]);
        assert_indices(&d);
    }

    #[test]
    fn insert_char_creates_rows_and_pads() {
        let mut d = Document::new();
        d.insert_char(2, 3, b'x');
        assert_eq!(text(&d), ["", "", "   x"]);
        assert_indices(&d);
    }

    #[test]
    fn delete_char_out_of_range_is_noop() {
        let mut d = doc(&["ab"]);
        let dirty = d.dirty_count();
        assert!(!d.delete_char(0, 2));
        assert!(!d.delete_char(1, 0));
        assert_eq!(d.dirty_count(), dirty);
        assert!(d.delete_char(0, 0));
        assert_eq!(text(&d), ["b"]);
    }

    #[test]
    fn append_bytes_extends_row() {
        let mut d = doc(&["ab"]);
        assert!(d.append_bytes(0, b"cd"));
        assert!(!d.append_bytes(1, b"x"));
        assert_eq!(text(&d), ["abcd"]);
    }

    #[test]
    fn split_row_cases() {
        let mut d = doc(&["hello"]);
        d.split_row(0, 2);
        assert_eq!(text(&d), ["he", "llo"]);

        let mut d = doc(&["hello"]);
        d.split_row(0, 0);
        assert_eq!(text(&d), ["", "hello"]);

        let mut d = doc(&["hello"]);
        d.split_row(0, 99);
        assert_eq!(text(&d), ["hello", ""]);

        let mut d = doc(&["hello"]);
        d.split_row(1, 0);
        assert_eq!(text(&d), ["hello", ""]);
        d.split_row(5, 0);
        assert_eq!(d.len(), 2);
        assert_indices(&d);
    }

    #[test]
    fn join_with_previous_returns_landing_column() {
        let mut d = doc(&["first row", "second row", "third row"]);
        assert_eq!(d.join_with_previous(0), None);
        assert_eq!(d.join_with_previous(3), None);
        assert_eq!(d.join_with_previous(1), Some(9));
        assert_eq!(text(&d), ["first rowsecond row", "third row"]);
        assert_indices(&d);
    }

    #[test]
    fn flat_text_round_trip() {
        let d = Document::from_flat_text(b"int x;\n\n/* c */\n");
        assert_eq!(text(&d), ["int x;", "", "/* c */"]);
        assert_eq!(d.to_flat_text(), b"int x;\n\n/* c */\n");
        assert!(!d.is_dirty());
    }

    #[test]
    fn flat_text_edge_cases() {
        assert!(Document::from_flat_text(b"").is_empty());
        assert_eq!(text(&Document::from_flat_text(b"\n")), [""]);
        assert_eq!(text(&Document::from_flat_text(b"a\r\nb")), ["a", "b"]);
        assert_eq!(Document::new().to_flat_text(), b"");
    }

    #[test]
    fn every_mutation_marks_dirty() {
        let mut d = Document::from_flat_text(b"abc\n");
        assert!(!d.is_dirty());
        d.insert_char(0, 0, b'x');
        assert!(d.is_dirty());
        d.mark_clean();
        d.split_row(0, 1);
        assert!(d.is_dirty());
    }

    #[test]
    fn comment_opens_and_closes_across_rows() {
        let d = c_doc(&["/* start", "end */"]);
        assert!(d.rows()[0].has_open_comment());
        assert!(!d.rows()[1].has_open_comment());
        assert!(
            d.rows()[1]
                .highlight()
                .iter()
                .all(|&h| h == Highlight::MlComment)
        );
    }

    #[test]
    fn removing_close_marker_cascades() {
        let mut d = c_doc(&["/* start", "end */", "int x;"]);
        assert_eq!(d.rows()[2].highlight()[0], Highlight::Keyword2);

        d.delete_char(1, 5);
        assert_eq!(text(&d), ["/* start", "end *", "int x;"]);
        assert!(d.rows()[1].has_open_comment());
        assert!(d.rows()[2].starts_in_comment());
        assert!(
            d.rows()[2]
                .highlight()
                .iter()
                .all(|&h| h == Highlight::MlComment)
        );
    }

    #[test]
    fn deleting_opening_row_uncomments_followers() {
        let mut d = c_doc(&["/* start", "int x;", "int y;"]);
        assert!(d.rows()[2].starts_in_comment());
        d.delete_row(0);
        assert!(!d.rows()[0].starts_in_comment());
        assert_eq!(d.rows()[0].highlight()[0], Highlight::Keyword2);
        assert_eq!(d.rows()[1].highlight()[0], Highlight::Keyword2);
    }

    #[test]
    fn inserting_row_inside_comment_inherits_state() {
        let mut d = c_doc(&["/* start", "end */"]);
        d.insert_row(1, b"middle");
        assert!(d.rows()[1].starts_in_comment());
        assert!(d.rows()[1].has_open_comment());
        assert!(!d.rows()[2].has_open_comment());
    }

    #[test]
    fn set_syntax_none_clears_highlight() {
        let mut d = c_doc(&["int x;"]);
        d.set_syntax(None);
        assert!(d.rows()[0].highlight().iter().all(|&h| h == Highlight::Normal));
    }

    #[test]
    fn render_pairs_have_equal_lengths() {
        let d = c_doc(&["\tint x;", "a\tb"]);
        for (render, hl) in d.render() {
            assert_eq!(render.len(), hl.len());
        }
    }
}
