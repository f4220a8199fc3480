//! Fuzz target for row edits and highlight propagation.
//!
//! Replays an arbitrary edit script against a C document and checks that
//! row indices stay in order and every highlight covers its render.

#![no_main]

use arbitrary::Arbitrary;
use ette::highlight::Syntax;
use ette::text::Document;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Arbitrary, Debug)]
enum Edit {
    InsertRow { at: u8, text: Vec<u8> },
    DeleteRow { at: u8 },
    InsertChar { row: u8, col: u8, c: u8 },
    DeleteChar { row: u8, col: u8 },
    Split { row: u8, col: u8 },
    Join { row: u8 },
}

#[derive(Arbitrary, Debug)]
struct Script {
    initial: Vec<u8>,
    edits: Vec<Edit>,
}

fuzz_target!(|script: Script| {
    let mut doc = Document::from_flat_text(&script.initial);
    doc.set_syntax(Some(Arc::new(Syntax::c())));

    for edit in script.edits.into_iter().take(64) {
        match edit {
            Edit::InsertRow { at, text } => {
                let text: Vec<u8> = text.into_iter().filter(|&b| b != b'\n').collect();
                doc.insert_row(usize::from(at), &text);
            }
            Edit::DeleteRow { at } => {
                doc.delete_row(usize::from(at));
            }
            Edit::InsertChar { row, col, c } => doc.insert_char(usize::from(row), usize::from(col), c),
            Edit::DeleteChar { row, col } => {
                doc.delete_char(usize::from(row), usize::from(col));
            }
            Edit::Split { row, col } => doc.split_row(usize::from(row), usize::from(col)),
            Edit::Join { row } => {
                doc.join_with_previous(usize::from(row));
            }
        }
    }

    for (idx, row) in doc.rows().iter().enumerate() {
        assert_eq!(row.index(), idx);
        assert_eq!(row.highlight().len(), row.render().len());
    }
    let _ = doc.to_flat_text();
});
