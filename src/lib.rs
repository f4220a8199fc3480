//! `ette` - encrypted, line-oriented text editing core
//!
//! Keeps an open file as highlighted rows and stores it either as plain
//! text or inside a passphrase-keyed AES-256-CBC container.
//!
//! # Examples
//!
//! ```
//! use ette::storage;
//!
//! let mut doc = storage::open_plain(b"int x;\n");
//! doc.insert_char(1, 0, b'}');
//! let container = storage::save_encrypted(&doc, "test").unwrap();
//! let reopened = storage::open_encrypted(&container, "test").unwrap();
//! assert_eq!(storage::save(&reopened), b"int x;\n}\n");
//! ```

// Crate-level lint configuration
#![forbid(unsafe_code)]
#![allow(clippy::cast_possible_truncation)] // Lengths fit the header's u64
#![allow(clippy::module_name_repetitions)] // Allow SyntaxRegistry, SearchMatch etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::needless_collect)] // Collect for assertions is clear

pub mod config;
pub mod crypto;
pub mod editor;
pub mod error;
pub mod event;
pub mod highlight;
pub mod storage;
pub mod text;

// Re-export core types at crate root
pub use config::Config;
pub use error::{CryptoError, Error, Result};
pub use event::{LogLevel, emit_event, emit_log, set_event_callback, set_log_callback};

// Re-export commonly used types
pub use crypto::{Algorithm, ContainerHeader, decrypt, encrypt, is_key_correct};
pub use editor::{Action, Cursor, Editor, Key};
pub use highlight::{Highlight, Syntax, SyntaxRegistry, Theme};
pub use text::{Document, Row};
