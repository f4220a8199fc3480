//! Editor configuration.

use crate::crypto::Algorithm;
use std::time::Duration;

/// Default tab stop used when rendering rows.
pub const DEFAULT_TAB_STOP: usize = 8;

/// Default lifetime of a status bar message.
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of extra Ctrl-Q presses required to drop unsaved changes.
pub const DEFAULT_QUIT_CONFIRMATIONS: u8 = 3;

/// Settings shared by the document model and the editor context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Tabs expand up to the next multiple of this column.
    pub tab_stop: usize,
    /// How long a status message stays visible.
    pub status_timeout: Duration,
    /// Ctrl-Q presses swallowed while the document is dirty.
    pub quit_confirmations: u8,
    /// Cipher used when saving encrypted documents.
    pub algorithm: Algorithm,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_stop: DEFAULT_TAB_STOP,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            quit_confirmations: DEFAULT_QUIT_CONFIRMATIONS,
            algorithm: Algorithm::default(),
        }
    }
}

impl Config {
    /// Builder-style tab stop setter. Zero is clamped to one.
    #[must_use]
    pub fn with_tab_stop(mut self, tab_stop: usize) -> Self {
        self.tab_stop = tab_stop.max(1);
        self
    }

    /// Builder-style status timeout setter.
    #[must_use]
    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout = timeout;
        self
    }

    /// Builder-style quit confirmation setter.
    #[must_use]
    pub fn with_quit_confirmations(mut self, count: u8) -> Self {
        self.quit_confirmations = count;
        self
    }

    /// Builder-style algorithm setter.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}
