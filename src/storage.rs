//! Reading and writing documents, optionally through the encrypted
//! container.

use crate::config::Config;
use crate::crypto::{self, Algorithm};
use crate::error::Result;
use crate::event::{
    EVENT_DOCUMENT_OPENED, EVENT_DOCUMENT_SAVED, EVENT_SAVE_FAILED, LogLevel, emit_event,
    emit_log,
};
use crate::text::Document;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Document from plain flat text.
#[must_use]
pub fn open_plain(bytes: &[u8]) -> Document {
    Document::from_flat_text(bytes)
}

/// Document from an encrypted container.
pub fn open_encrypted(bytes: &[u8], passphrase: &str) -> Result<Document> {
    let plaintext = crypto::decrypt(bytes, passphrase)?;
    Ok(Document::from_flat_text(&plaintext))
}

/// Flat text of `document`.
#[must_use]
pub fn save(document: &Document) -> Vec<u8> {
    document.to_flat_text()
}

/// Container holding `document`, encrypted under a fresh IV.
pub fn save_encrypted(document: &Document, passphrase: &str) -> Result<Vec<u8>> {
    save_encrypted_with(document, passphrase, Algorithm::default())
}

/// Like [`save_encrypted`] with an explicit cipher.
pub fn save_encrypted_with(
    document: &Document,
    passphrase: &str,
    algorithm: Algorithm,
) -> Result<Vec<u8>> {
    let plaintext = document.to_flat_text();
    let container =
        crypto::encrypt_with(algorithm, &plaintext, passphrase, &crypto::random_iv())?;
    Ok(container)
}

/// Read the file at `path` into a new document.
///
/// A missing file yields an empty document, so a new file can be created
/// by editing and saving. With a passphrase the file must be a container
/// that the passphrase opens.
pub fn load(path: impl AsRef<Path>, passphrase: Option<&str>, config: &Config) -> Result<Document> {
    let mut document = Document::with_config(config);
    load_into(path, passphrase, &mut document)?;
    Ok(document)
}

/// Replace the rows of `document` with the file at `path`, keeping its
/// syntax and tab stop. See [`load`].
pub fn load_into(
    path: impl AsRef<Path>,
    passphrase: Option<&str>,
    document: &mut Document,
) -> Result<()> {
    let path = path.as_ref();
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            emit_log(
                LogLevel::Debug,
                &format!("{} does not exist, starting empty", path.display()),
            );
            document.load_flat_text(b"");
            return Ok(());
        }
        Err(err) => {
            emit_log(
                LogLevel::Error,
                &format!("failed to read {}: {err}", path.display()),
            );
            return Err(err.into());
        }
    };

    let plaintext = match passphrase {
        Some(passphrase) => crypto::decrypt(&bytes, passphrase).map_err(|err| {
            emit_log(
                LogLevel::Warn,
                &format!("failed to decrypt {}: {err}", path.display()),
            );
            err
        })?,
        None => bytes,
    };

    document.load_flat_text(&plaintext);
    emit_log(
        LogLevel::Info,
        &format!("opened {} ({} rows)", path.display(), document.len()),
    );
    emit_event(EVENT_DOCUMENT_OPENED, &path.display().to_string());
    Ok(())
}

/// Write `document` to `path`, encrypting when a passphrase is given.
///
/// The file is created with mode 0644 if needed, truncated to the final
/// length, and written in one call. Returns the number of bytes written.
/// The document is marked clean on success.
pub fn store(
    path: impl AsRef<Path>,
    document: &mut Document,
    passphrase: Option<&str>,
    config: &Config,
) -> Result<usize> {
    let path = path.as_ref();
    let result = write_document(path, document, passphrase, config.algorithm);
    match &result {
        Ok(written) => {
            document.mark_clean();
            emit_log(
                LogLevel::Info,
                &format!("{written} bytes written to {}", path.display()),
            );
            emit_event(EVENT_DOCUMENT_SAVED, &path.display().to_string());
        }
        Err(err) => {
            emit_log(
                LogLevel::Error,
                &format!("failed to save {}: {err}", path.display()),
            );
            emit_event(EVENT_SAVE_FAILED, &err.to_string());
        }
    }
    result
}

fn write_document(
    path: &Path,
    document: &Document,
    passphrase: Option<&str>,
    algorithm: Algorithm,
) -> Result<usize> {
    let bytes = match passphrase {
        Some(passphrase) => save_encrypted_with(document, passphrase, algorithm)?,
        None => save(document),
    };

    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(false);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options.open(path)?;
    file.set_len(bytes.len() as u64)?;
    file.write_all(&bytes)?;
    Ok(bytes.len())
}
