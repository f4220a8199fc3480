//! Incremental search over rendered rows.

use super::Document;
use crate::highlight::Highlight;

/// Longest query a search accepts.
pub const MAX_QUERY_LEN: usize = 256;

/// Which way to step from the previous match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// A match location in rendered coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchMatch {
    pub row: usize,
    /// Offset into the row's render.
    pub offset: usize,
    pub len: usize,
}

/// Search state: the query, the row of the last match, and the highlight
/// the match overwrote.
///
/// At most one row carries [`Highlight::Match`] at a time; call
/// [`Search::restore`] before dropping the search to put it back.
#[derive(Clone, Debug, Default)]
pub struct Search {
    query: Vec<u8>,
    last_match: Option<usize>,
    saved: Option<(usize, Vec<Highlight>)>,
}

impl Search {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Search starting from `query`.
    #[must_use]
    pub fn with_query(query: &[u8]) -> Self {
        let mut search = Self::new();
        for &c in query {
            search.push(c);
        }
        search
    }

    #[must_use]
    pub fn query(&self) -> &[u8] {
        &self.query
    }

    /// Extend the query. Returns `false` when it is already full. The next
    /// [`Search::find`] starts over from the top.
    pub fn push(&mut self, c: u8) -> bool {
        if self.query.len() >= MAX_QUERY_LEN {
            return false;
        }
        self.query.push(c);
        self.last_match = None;
        true
    }

    /// Drop the last query byte and start over from the top.
    pub fn pop(&mut self) -> Option<u8> {
        self.last_match = None;
        self.query.pop()
    }

    #[must_use]
    pub fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// Find the next row containing the query, wrapping around the
    /// document, and mark the match with [`Highlight::Match`].
    ///
    /// Without a previous match the search always runs forward from row 0.
    /// Only the first occurrence in each row is reported.
    pub fn find(&mut self, document: &mut Document, direction: Direction) -> Option<SearchMatch> {
        self.restore(document);

        let rows = document.len();
        if self.query.is_empty() || rows == 0 {
            return None;
        }

        let direction = if self.last_match.is_none() {
            Direction::Forward
        } else {
            direction
        };

        let mut current = self.last_match;
        for _ in 0..rows {
            let next = match (current, direction) {
                (None, _) => 0,
                (Some(at), Direction::Forward) => (at + 1) % rows,
                (Some(0), Direction::Backward) => rows - 1,
                (Some(at), Direction::Backward) => at - 1,
            };
            current = Some(next);

            let Some(row) = document.row_mut(next) else {
                continue;
            };
            let Some(offset) = find_subslice(row.render(), &self.query) else {
                continue;
            };

            let len = self.query.len();
            let hl = row.highlight_mut();
            self.saved = Some((next, hl.to_vec()));
            hl[offset..offset + len].fill(Highlight::Match);
            self.last_match = Some(next);
            return Some(SearchMatch {
                row: next,
                offset,
                len,
            });
        }

        None
    }

    /// Put back the highlight the last match overwrote.
    pub fn restore(&mut self, document: &mut Document) {
        let Some((at, saved)) = self.saved.take() else {
            return;
        };
        if let Some(row) = document.row_mut(at) {
            let hl = row.highlight_mut();
            if hl.len() == saved.len() {
                hl.copy_from_slice(&saved);
            }
        }
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::Syntax;
    use std::sync::Arc;

    fn document() -> Document {
        let mut d = Document::from_flat_text(b"int alpha;\nbeta\nint gamma;\n");
        d.set_syntax(Some(Arc::new(Syntax::c())));
        d
    }

    #[test]
    fn empty_query_finds_nothing() {
        let mut d = document();
        assert_eq!(Search::new().find(&mut d, Direction::Forward), None);
    }

    #[test]
    fn forward_wraps_around() {
        let mut d = document();
        let mut search = Search::with_query(b"int");
        let first = search.find(&mut d, Direction::Forward).unwrap();
        assert_eq!((first.row, first.offset, first.len), (0, 0, 3));
        let second = search.find(&mut d, Direction::Forward).unwrap();
        assert_eq!(second.row, 2);
        let third = search.find(&mut d, Direction::Forward).unwrap();
        assert_eq!(third.row, 0);
    }

    #[test]
    fn backward_wraps_to_last_row() {
        let mut d = document();
        let mut search = Search::with_query(b"int");
        search.find(&mut d, Direction::Forward);
        let prev = search.find(&mut d, Direction::Backward).unwrap();
        assert_eq!(prev.row, 2);
    }

    #[test]
    fn first_find_ignores_backward() {
        let mut d = document();
        let mut search = Search::with_query(b"beta");
        let found = search.find(&mut d, Direction::Backward).unwrap();
        assert_eq!(found.row, 1);
    }

    #[test]
    fn match_highlight_is_restored() {
        let mut d = document();
        let before = d.rows()[0].highlight().to_vec();
        let mut search = Search::with_query(b"alpha");
        let found = search.find(&mut d, Direction::Forward).unwrap();
        assert_eq!(found.offset, 4);
        assert_eq!(&d.rows()[0].highlight()[4..9], &[Highlight::Match; 5]);
        assert_eq!(d.rows()[0].highlight()[0], Highlight::Keyword2);

        search.restore(&mut d);
        assert_eq!(d.rows()[0].highlight(), before.as_slice());
    }

    #[test]
    fn moving_to_next_match_restores_previous_row() {
        let mut d = document();
        let mut search = Search::with_query(b"int");
        search.find(&mut d, Direction::Forward);
        search.find(&mut d, Direction::Forward);
        assert_eq!(d.rows()[0].highlight()[0], Highlight::Keyword2);
        assert_eq!(d.rows()[2].highlight()[0], Highlight::Match);
    }

    #[test]
    fn editing_query_restarts_from_top() {
        let mut d = document();
        let mut search = Search::with_query(b"int");
        search.find(&mut d, Direction::Forward);
        search.find(&mut d, Direction::Forward);
        assert_eq!(search.last_match(), Some(2));
        search.push(b' ');
        assert_eq!(search.last_match(), None);
        assert_eq!(search.find(&mut d, Direction::Forward).unwrap().row, 0);
        assert_eq!(search.pop(), Some(b' '));
        assert_eq!(search.query(), b"int");
    }

    #[test]
    fn query_is_bounded() {
        let mut search = Search::with_query(&[b'a'; MAX_QUERY_LEN]);
        assert!(!search.push(b'b'));
        assert_eq!(search.query().len(), MAX_QUERY_LEN);
    }

    #[test]
    fn no_match_returns_none() {
        let mut d = document();
        assert_eq!(Search::with_query(b"zeta").find(&mut d, Direction::Forward), None);
    }
}
