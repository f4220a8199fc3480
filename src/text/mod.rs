//! Line-oriented document model.
//!
//! A [`Document`] is an ordered list of [`Row`]s. Each row keeps its raw
//! bytes, a tab-expanded render, and one highlight class per rendered byte.
//! Edits re-render the touched row and re-highlight downstream rows only
//! while the multi-line comment state keeps changing.
//!
//! # Examples
//!
//! ```
//! use ette::text::Document;
//!
//! let mut doc = Document::from_flat_text(b"hello\nworld\n");
//! doc.split_row(0, 2);
//! assert_eq!(doc.to_flat_text(), b"he\nllo\nworld\n");
//! assert_eq!(doc.join_with_previous(1), Some(2));
//! assert_eq!(doc.to_flat_text(), b"hello\nworld\n");
//! ```

mod document;
mod row;
mod search;

pub use document::Document;
pub use row::{Row, expand_tabs};
pub use search::{Direction, MAX_QUERY_LEN, Search, SearchMatch};
