//! Single-row highlighting pass.
//!
//! Rows are highlighted independently; the only state carried between rows
//! is whether the previous row ended inside an unterminated block comment.

use super::{Highlight, Syntax, SyntaxFlags};

/// Bytes that end a word for keyword and number detection.
#[must_use]
pub fn is_separator(c: u8) -> bool {
    c == 0 || is_space(c) || b",.()+-/*=~%[];".contains(&c)
}

fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn is_nonprint(c: u8) -> bool {
    c < 0x20 || c == 0x7f
}

/// Highlight one rendered row into `hl`.
///
/// `starts_in_comment` is the previous row's open flag. Returns this row's
/// open flag: the last byte is block-comment text and the row does not end
/// with the close marker. Empty and whitespace-only rows are never open.
/// Without a syntax every byte is [`Highlight::Normal`] and no comment is
/// ever open.
pub fn highlight_row(
    render: &[u8],
    syntax: Option<&Syntax>,
    starts_in_comment: bool,
    hl: &mut Vec<Highlight>,
) -> bool {
    hl.clear();
    hl.resize(render.len(), Highlight::Normal);

    let Some(syntax) = syntax else {
        return false;
    };

    let scs = syntax.singleline_comment_start();
    let mcs = syntax.multiline_comment_start();
    let mce = syntax.multiline_comment_end();
    let block_comments = syntax.has_multiline_comments();
    let flags = syntax.flags();

    let mut in_comment = starts_in_comment && block_comments;
    let mut i = 0;

    while i < render.len() && is_space(render[i]) {
        i += 1;
    }

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;

    while i < render.len() {
        let c = render[i];
        let rest = &render[i..];

        if prev_sep && in_string.is_none() && !scs.is_empty() && rest.starts_with(scs) {
            hl[i..].fill(Highlight::Comment);
            break;
        }

        if in_comment {
            if rest.starts_with(mce) {
                hl[i..i + mce.len()].fill(Highlight::MlComment);
                i += mce.len();
                in_comment = false;
                prev_sep = true;
            } else {
                hl[i] = Highlight::MlComment;
                prev_sep = false;
                i += 1;
            }
            continue;
        }

        if in_string.is_none() && block_comments && rest.starts_with(mcs) {
            hl[i..i + mcs.len()].fill(Highlight::MlComment);
            i += mcs.len();
            in_comment = true;
            prev_sep = false;
            continue;
        }

        if flags.contains(SyntaxFlags::STRINGS) {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                if c == b'\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                continue;
            }
            if c == b'"' || c == b'\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                prev_sep = false;
                i += 1;
                continue;
            }
        }

        if is_nonprint(c) {
            hl[i] = Highlight::NonPrint;
            prev_sep = false;
            i += 1;
            continue;
        }

        if flags.contains(SyntaxFlags::NUMBERS) {
            let prev_is_number = i > 0 && hl[i - 1] == Highlight::Number;
            if (c.is_ascii_digit() && (prev_sep || prev_is_number)) || (c == b'.' && prev_is_number)
            {
                hl[i] = Highlight::Number;
                prev_sep = false;
                i += 1;
                continue;
            }
        }

        if prev_sep {
            if let Some(keyword) = syntax.keyword_at(rest) {
                hl[i..i + keyword.len()].fill(keyword.class());
                i += keyword.len();
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    hl.last() == Some(&Highlight::MlComment) && !render.ends_with(mce)
}
