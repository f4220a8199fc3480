//! Editing session: one open document plus cursor, status line and mode.
//!
//! An [`Editor`] owns everything a session mutates. Keys go in through
//! [`Editor::process_key`]; reading keys from a terminal and painting the
//! screen is left to the host.

mod key;
mod unlock;

pub use key::Key;
pub use unlock::{
    CONFIRM_PROMPT, ENTER_PROMPT, MISMATCH_PROMPT, PassphrasePrompt, PromptStep, RETRY_PROMPT,
    UnlockMode,
};

pub mod keys {
    //! Raw key codes accepted by [`Key::from_code`](super::Key::from_code).
    pub use super::key::{
        ARROW_DOWN, ARROW_LEFT, ARROW_RIGHT, ARROW_UP, BACKSPACE, CTRL_C, CTRL_D, CTRL_F, CTRL_H,
        CTRL_L, CTRL_Q, CTRL_S, CTRL_U, DEL_KEY, END_KEY, ENTER, ESC, HOME_KEY, PAGE_DOWN,
        PAGE_UP, TAB,
    };
}

use crate::config::Config;
use crate::crypto::{Algorithm, ENCRYPTED_SUFFIX};
use crate::error::Result;
use crate::event::{LogLevel, emit_log};
use crate::highlight::SyntaxRegistry;
use crate::storage;
use crate::text::{Direction, Document, Search, SearchMatch};
use std::path::{Path, PathBuf};
use std::time::Instant;
use zeroize::Zeroizing;

/// Cursor position in file coordinates: a row index and a raw byte column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

/// What the host should do after a key was processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

#[derive(Clone, Debug)]
struct StatusMessage {
    text: String,
    set_at: Instant,
}

struct SearchSession {
    search: Search,
    saved_cursor: Cursor,
}

/// One editing session.
pub struct Editor {
    document: Document,
    path: Option<PathBuf>,
    passphrase: Option<Zeroizing<String>>,
    cursor: Cursor,
    status: Option<StatusMessage>,
    config: Config,
    quit_times: u8,
    search: Option<SearchSession>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Editor {
    /// Empty, unnamed session.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            document: Document::with_config(&config),
            path: None,
            passphrase: None,
            cursor: Cursor::default(),
            status: None,
            quit_times: config.quit_confirmations,
            config,
            search: None,
        }
    }

    /// Open `path`, decrypting with `passphrase` when one is given.
    ///
    /// The syntax profile is chosen from the filename. A missing file opens
    /// as an empty document that saving will create.
    pub fn open(path: impl AsRef<Path>, passphrase: Option<&str>, config: Config) -> Result<Self> {
        let mut editor = Self::new(config);
        editor.open_path(path.as_ref(), passphrase)?;
        Ok(editor)
    }

    /// Open `path`, reading a passphrase from `keys` first when the filename
    /// asks for encryption. Returns `Ok(None)` when the prompt is cancelled
    /// or the keys run out.
    pub fn open_with_keys(
        path: impl AsRef<Path>,
        keys: impl IntoIterator<Item = Key>,
        config: Config,
    ) -> Result<Option<Self>> {
        let path = path.as_ref();
        let filename = path.to_string_lossy();
        let Some(algorithm) = Algorithm::for_filename(&filename) else {
            return Self::open(path, None, config).map(Some);
        };

        let mut prompt = PassphrasePrompt::for_path(path);
        let Some(passphrase) = prompt.run(keys) else {
            return Ok(None);
        };
        Self::open(path, Some(passphrase.as_str()), config.with_algorithm(algorithm)).map(Some)
    }

    fn open_path(&mut self, path: &Path, passphrase: Option<&str>) -> Result<()> {
        let filename = path.to_string_lossy();
        let syntax = SyntaxRegistry::with_builtins()
            .for_filename(filename.trim_end_matches(ENCRYPTED_SUFFIX));
        self.document.set_syntax(syntax);
        storage::load_into(path, passphrase, &mut self.document)?;
        self.path = Some(path.to_path_buf());
        self.passphrase = passphrase.map(|p| Zeroizing::new(p.to_owned()));
        self.cursor = Cursor::default();
        Ok(())
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.clamp_col();
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.passphrase.is_some()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.document.is_dirty()
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// Rendered column of the cursor.
    #[must_use]
    pub fn render_column(&self) -> usize {
        self.document.row(self.cursor.row).map_or(self.cursor.col, |row| {
            row.render_column(self.cursor.col, self.document.tab_stop())
        })
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.set_status_at(text, Instant::now());
    }

    pub fn set_status_at(&mut self, text: impl Into<String>, now: Instant) {
        self.status = Some(StatusMessage {
            text: text.into(),
            set_at: now,
        });
    }

    /// Status text if it was set less than the configured timeout before
    /// `now`.
    #[must_use]
    pub fn status_message(&self, now: Instant) -> Option<&str> {
        let status = self.status.as_ref()?;
        let age = now.saturating_duration_since(status.set_at);
        (age < self.config.status_timeout && !status.text.is_empty()).then_some(&status.text[..])
    }

    /// Status bar summary: filename, row count and modified marker.
    #[must_use]
    pub fn status_line(&self) -> String {
        let name = self
            .path
            .as_deref()
            .map_or_else(|| "[No Name]".to_owned(), |p| p.display().to_string());
        let modified = if self.is_dirty() { " (modified)" } else { "" };
        format!("{name} - {} lines{modified}", self.document.len())
    }

    /// Insert `c` at the cursor and move right.
    pub fn insert_char(&mut self, c: u8) {
        self.document.insert_char(self.cursor.row, self.cursor.col, c);
        self.cursor.col += 1;
    }

    /// Insert every byte of `text` at the cursor.
    pub fn insert_str(&mut self, text: &str) {
        for c in text.bytes() {
            self.insert_char(c);
        }
    }

    /// Split the row at the cursor and move to the start of the next row.
    pub fn insert_newline(&mut self) {
        let row = self.cursor.row;
        if row > self.document.len() {
            return;
        }
        self.document.split_row(row, self.cursor.col);
        self.cursor = Cursor {
            row: row + 1,
            col: 0,
        };
    }

    /// Erase the byte before the cursor, joining with the previous row at
    /// column 0.
    pub fn delete_char(&mut self) {
        let Cursor { row, col } = self.cursor;
        if row >= self.document.len() || (row == 0 && col == 0) {
            return;
        }
        if col == 0 {
            if let Some(landing) = self.document.join_with_previous(row) {
                self.cursor = Cursor {
                    row: row - 1,
                    col: landing,
                };
            }
        } else if self.document.delete_char(row, col - 1) {
            self.cursor.col -= 1;
        }
    }

    pub fn move_cursor(&mut self, key: Key) {
        let rows = self.document.len();
        let row_len = |doc: &Document, at: usize| doc.row(at).map_or(0, |row| row.len());
        let Cursor { row, col } = self.cursor;

        match key {
            Key::Left => {
                if col > 0 {
                    self.cursor.col -= 1;
                } else if row > 0 {
                    self.cursor.row -= 1;
                    self.cursor.col = row_len(&self.document, row - 1);
                }
            }
            Key::Right => {
                if row < rows {
                    if col < row_len(&self.document, row) {
                        self.cursor.col += 1;
                    } else {
                        self.cursor = Cursor {
                            row: row + 1,
                            col: 0,
                        };
                    }
                }
            }
            Key::Up => self.cursor.row = row.saturating_sub(1),
            Key::Down => {
                if row < rows {
                    self.cursor.row += 1;
                }
            }
            Key::Home => self.cursor.col = 0,
            Key::End => self.cursor.col = row_len(&self.document, row),
            Key::PageUp => self.cursor.row = 0,
            Key::PageDown => self.cursor.row = rows,
            _ => {}
        }
        self.clamp_col();
    }

    fn clamp_col(&mut self) {
        let len = self.document.row(self.cursor.row).map_or(0, |row| row.len());
        self.cursor.col = self.cursor.col.min(len);
    }

    /// Write the document back to its path, re-encrypting when the session
    /// was opened with a passphrase. Reports the outcome on the status line.
    pub fn save(&mut self) -> Result<usize> {
        let Some(path) = self.path.clone() else {
            let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no file name");
            self.set_status(format!("Can't save! I/O error: {err}"));
            return Err(err.into());
        };
        let passphrase = self.passphrase.as_deref().map(String::as_str);
        match storage::store(&path, &mut self.document, passphrase, &self.config) {
            Ok(written) => {
                self.set_status(format!("{written} bytes written on disk"));
                Ok(written)
            }
            Err(err) => {
                self.set_status(format!("Can't save! {err}"));
                Err(err)
            }
        }
    }

    /// Start an interactive search at the current cursor.
    pub fn start_search(&mut self) {
        if self.search.is_none() {
            self.search = Some(SearchSession {
                search: Search::new(),
                saved_cursor: self.cursor,
            });
            self.set_status("Search:  (Use ESC/Arrows/Enter)");
        }
    }

    /// Run a one-shot search for `query` and move the cursor to the match.
    pub fn find(&mut self, query: &str, direction: Direction) -> Option<SearchMatch> {
        let mut search = Search::with_query(query.as_bytes());
        let found = search.find(&mut self.document, direction);
        search.restore(&mut self.document);
        if let Some(found) = found {
            self.jump_to(found);
        }
        found
    }

    fn jump_to(&mut self, found: SearchMatch) {
        let col = self.document.row(found.row).map_or(found.offset, |row| {
            row.raw_column(found.offset, self.document.tab_stop())
        });
        self.cursor = Cursor {
            row: found.row,
            col,
        };
    }

    fn process_search_key(&mut self, key: Key) {
        let Some(mut session) = self.search.take() else {
            return;
        };

        let direction = match key {
            Key::Esc | Key::Enter => {
                session.search.restore(&mut self.document);
                if key == Key::Esc {
                    self.cursor = session.saved_cursor;
                }
                self.set_status("");
                return;
            }
            key if key.is_erase() => {
                session.search.pop();
                None
            }
            Key::Right | Key::Down => Some(Direction::Forward),
            Key::Left | Key::Up => Some(Direction::Backward),
            key => {
                if let Some(c) = key.printable() {
                    session.search.push(c);
                }
                None
            }
        };

        if direction.is_some() || session.search.last_match().is_none() {
            let direction = direction.unwrap_or_default();
            if let Some(found) = session.search.find(&mut self.document, direction) {
                self.jump_to(found);
            }
        }

        let query = String::from_utf8_lossy(session.search.query()).into_owned();
        self.set_status(format!("Search: {query} (Use ESC/Arrows/Enter)"));
        self.search = Some(session);
    }

    /// Apply one key press.
    pub fn process_key(&mut self, key: Key) -> Action {
        if self.search.is_some() {
            self.process_search_key(key);
            return Action::Continue;
        }

        match key {
            Key::CtrlQ => {
                if self.is_dirty() && self.quit_times > 0 {
                    self.set_status(format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    self.quit_times -= 1;
                    return Action::Continue;
                }
                return Action::Quit;
            }
            Key::Enter => self.insert_newline(),
            Key::CtrlS => {
                if let Err(err) = self.save() {
                    emit_log(LogLevel::Warn, &format!("save failed: {err}"));
                }
            }
            Key::CtrlF => self.start_search(),
            key if key.is_erase() => self.delete_char(),
            key if key.is_navigation() => self.move_cursor(key),
            Key::CtrlC | Key::CtrlD | Key::CtrlL | Key::CtrlU | Key::Esc => {}
            Key::Char(c) => self.insert_char(c),
            _ => {}
        }

        self.quit_times = self.config.quit_confirmations;
        Action::Continue
    }

    /// Apply keys in order, stopping at the first that quits.
    pub fn process_keys(&mut self, keys: impl IntoIterator<Item = Key>) -> Action {
        for key in keys {
            if self.process_key(key) == Action::Quit {
                return Action::Quit;
            }
        }
        Action::Continue
    }
}
