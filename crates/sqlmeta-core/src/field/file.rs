//! File field.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};
use crate::field::{Field, FieldOptions};
use crate::value::Value;

/// A field holding the name of a file kept under a fixed directory.
///
/// The directory must exist and be writable when the field is constructed;
/// moving uploads into it is the caller's business.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    options: FieldOptions,
    path: String,
}

impl File {
    /// Create a file field storing into `path`.
    ///
    /// Fails with [`Error::Configuration`] unless `path` is a writable directory.
    /// The stored path uses forward slashes and always ends in `/`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !is_writable_dir(path) {
            return Err(Error::Configuration(format!(
                "file field must have a `path` pointing to a writable directory, got `{}`",
                path.display()
            )));
        }

        let normalized = path.to_string_lossy().replace('\\', "/");
        let path = format!("{}/", normalized.trim_end_matches('/'));
        tracing::trace!(path = %path, "File field configured");

        Ok(Self {
            options: FieldOptions::default(),
            path,
        })
    }

    /// Directory files are stored under, with a trailing slash.
    pub fn path(&self) -> &str {
        &self.path
    }

    option_setters!();
}

/// Whether files can be created in `dir` by this process.
///
/// Permission bits alone say nothing about ownership, so this creates and
/// removes a scratch file instead.
fn is_writable_dir(dir: &Path) -> bool {
    if !fs::metadata(dir).is_ok_and(|meta| meta.is_dir()) {
        return false;
    }

    static CHECKS: AtomicU64 = AtomicU64::new(0);
    let scratch = dir.join(format!(
        ".sqlmeta-write-check-{}-{}",
        std::process::id(),
        CHECKS.fetch_add(1, Ordering::Relaxed)
    ));
    match fs::OpenOptions::new().write(true).create_new(true).open(&scratch) {
        Ok(file) => {
            drop(file);
            if let Err(e) = fs::remove_file(&scratch) {
                tracing::warn!(
                    path = %scratch.display(),
                    error = %e,
                    "Could not remove write check file"
                );
            }
            true
        }
        Err(e) => {
            tracing::debug!(path = %dir.display(), error = %e, "Directory is not writable");
            false
        }
    }
}

impl Field for File {
    field_options!();

    fn set(&self, value: Value) -> Value {
        if value.is_null() {
            return value;
        }
        Value::Text(value.to_text())
    }
}
