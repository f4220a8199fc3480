//! Passphrase entry before an encrypted file is opened.

use super::Key;
use crate::crypto;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

pub const ENTER_PROMPT: &str = "Enter password: ";
pub const CONFIRM_PROMPT: &str = "Confirm password: ";
pub const MISMATCH_PROMPT: &str = "Password mismatch. Confirm password: ";
pub const RETRY_PROMPT: &str = "Incorrect password. Try again: ";

/// Whether the passphrase creates a new container or opens an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnlockMode {
    /// Typed twice; both entries must match.
    NewFile,
    /// Typed once and checked against the file.
    ExistingFile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Enter,
    Confirm,
}

/// Result of feeding one key to a [`PassphrasePrompt`].
#[derive(Debug, PartialEq, Eq)]
pub enum PromptStep {
    /// Keep reading keys.
    Pending,
    /// The entry was rejected and cleared; show the new prompt.
    Retry,
    /// Ctrl-Q abandoned the prompt.
    Cancelled,
    /// Accepted passphrase.
    Done(Zeroizing<String>),
}

/// Key-driven passphrase prompt.
///
/// Printable bytes are appended, erase keys remove the last byte, Enter
/// submits, Ctrl-Q cancels. Every other key is ignored.
pub struct PassphrasePrompt {
    mode: UnlockMode,
    path: PathBuf,
    stage: Stage,
    prompt: &'static str,
    entry: Zeroizing<String>,
    first: Zeroizing<String>,
}

impl PassphrasePrompt {
    /// Prompt for `path`, picking the mode by whether the file exists.
    #[must_use]
    pub fn for_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mode = if path.exists() {
            UnlockMode::ExistingFile
        } else {
            UnlockMode::NewFile
        };
        Self::new(mode, path)
    }

    #[must_use]
    pub fn new(mode: UnlockMode, path: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            path: path.into(),
            stage: Stage::Enter,
            prompt: ENTER_PROMPT,
            entry: Zeroizing::new(String::new()),
            first: Zeroizing::new(String::new()),
        }
    }

    #[must_use]
    pub fn mode(&self) -> UnlockMode {
        self.mode
    }

    /// Prompt text currently shown.
    #[must_use]
    pub fn prompt(&self) -> &'static str {
        self.prompt
    }

    /// Prompt followed by one `*` per typed byte.
    #[must_use]
    pub fn masked_line(&self) -> String {
        format!("{}{}", self.prompt, "*".repeat(self.entry.len()))
    }

    pub fn feed(&mut self, key: Key) -> PromptStep {
        match key {
            Key::Enter => self.submit(),
            Key::CtrlQ => PromptStep::Cancelled,
            key if key.is_erase() => {
                self.entry.pop();
                PromptStep::Pending
            }
            key => {
                if let Some(c) = key.printable() {
                    self.entry.push(char::from(c));
                }
                PromptStep::Pending
            }
        }
    }

    /// Feed keys until the prompt finishes. Returns `None` when the keys run
    /// out first or the prompt is cancelled.
    pub fn run(&mut self, keys: impl IntoIterator<Item = Key>) -> Option<Zeroizing<String>> {
        for key in keys {
            match self.feed(key) {
                PromptStep::Done(passphrase) => return Some(passphrase),
                PromptStep::Cancelled => return None,
                PromptStep::Pending | PromptStep::Retry => {}
            }
        }
        None
    }

    fn submit(&mut self) -> PromptStep {
        let entry = std::mem::replace(&mut self.entry, Zeroizing::new(String::new()));
        match (self.mode, self.stage) {
            (UnlockMode::ExistingFile, _) => {
                if !entry.is_empty() && crypto::is_key_correct(&entry, &self.path) {
                    PromptStep::Done(entry)
                } else {
                    self.prompt = RETRY_PROMPT;
                    PromptStep::Retry
                }
            }
            (UnlockMode::NewFile, Stage::Enter) => {
                if entry.is_empty() {
                    return PromptStep::Pending;
                }
                self.first = entry;
                self.stage = Stage::Confirm;
                self.prompt = CONFIRM_PROMPT;
                PromptStep::Pending
            }
            (UnlockMode::NewFile, Stage::Confirm) => {
                if *entry == *self.first {
                    PromptStep::Done(entry)
                } else {
                    self.prompt = MISMATCH_PROMPT;
                    PromptStep::Retry
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_file_requires_matching_confirmation() {
        let mut prompt = PassphrasePrompt::new(UnlockMode::NewFile, "/nonexistent/x.aes256cbc");
        for key in Key::from_text("test\r") {
            assert_eq!(prompt.feed(key), PromptStep::Pending);
        }
        assert_eq!(prompt.prompt(), CONFIRM_PROMPT);
        for key in Key::from_text("tesx") {
            prompt.feed(key);
        }
        assert_eq!(prompt.masked_line(), "Confirm password: ****");
        assert_eq!(prompt.feed(Key::Enter), PromptStep::Retry);
        assert_eq!(prompt.prompt(), MISMATCH_PROMPT);

        let passphrase = prompt.run(Key::from_text("test\r")).unwrap();
        assert_eq!(passphrase.as_str(), "test");
    }

    #[test]
    fn erase_removes_last_byte() {
        let mut prompt = PassphrasePrompt::new(UnlockMode::NewFile, "x");
        let keys = Key::from_text("tesq")
            .chain([Key::Backspace])
            .chain(Key::from_text("t\rtest\r"));
        assert_eq!(prompt.run(keys).unwrap().as_str(), "test");
    }

    #[test]
    fn cancel_and_exhaustion_return_none() {
        let mut prompt = PassphrasePrompt::new(UnlockMode::NewFile, "x");
        assert!(prompt.run([Key::Char(b'a'), Key::CtrlQ]).is_none());
        let mut prompt = PassphrasePrompt::new(UnlockMode::NewFile, "x");
        assert!(prompt.run(Key::from_text("abc")).is_none());
    }

    #[test]
    fn existing_file_checks_passphrase() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.aes256cbc");
        let container = crypto::encrypt(b"hello\n", "test", &[0u8; 16]).unwrap();
        std::fs::write(&path, container).unwrap();

        let mut prompt = PassphrasePrompt::for_path(&path);
        assert_eq!(prompt.mode(), UnlockMode::ExistingFile);
        for key in Key::from_text("wrong") {
            prompt.feed(key);
        }
        assert_eq!(prompt.feed(Key::Enter), PromptStep::Retry);
        assert_eq!(prompt.prompt(), RETRY_PROMPT);
        assert_eq!(prompt.run(Key::from_text("test\r")).unwrap().as_str(), "test");
    }
}
