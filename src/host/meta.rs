// SPDX-License-Identifier: MIT

//! Persisted form metadata, keyed by form id
//!
//! The core stores one opaque blob per form and always replaces it whole.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::error::StorageError;
use super::form::FormId;

/// Read/write primitive for per-form metadata blobs
pub trait MetaStore: Send + Sync {
    /// Returns `None` when nothing was stored for the form
    fn read(&self, form: FormId) -> Result<Option<String>, StorageError>;

    /// Replaces the blob for the form
    fn write(&self, form: FormId, blob: String) -> Result<(), StorageError>;

    /// Removes the blob; removing a missing blob is not an error
    fn remove(&self, form: FormId) -> Result<(), StorageError>;
}

impl<M: MetaStore + ?Sized> MetaStore for Arc<M> {
    fn read(&self, form: FormId) -> Result<Option<String>, StorageError> {
        (**self).read(form)
    }

    fn write(&self, form: FormId, blob: String) -> Result<(), StorageError> {
        (**self).write(form, blob)
    }

    fn remove(&self, form: FormId) -> Result<(), StorageError> {
        (**self).remove(form)
    }
}

/// In-memory metadata, shared between clones
#[derive(Clone, Default)]
pub struct MemoryMeta {
    blobs: Arc<RwLock<HashMap<FormId, String>>>,
}

impl MemoryMeta {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StorageError {
    StorageError::Backend("metadata lock poisoned".to_string())
}

impl MetaStore for MemoryMeta {
    fn read(&self, form: FormId) -> Result<Option<String>, StorageError> {
        let blobs = self.blobs.read().map_err(|_| poisoned())?;
        Ok(blobs.get(&form).cloned())
    }

    fn write(&self, form: FormId, blob: String) -> Result<(), StorageError> {
        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        blobs.insert(form, blob);
        Ok(())
    }

    fn remove(&self, form: FormId) -> Result<(), StorageError> {
        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        blobs.remove(&form);
        Ok(())
    }
}

/// One `<form id>.json` file per form under a directory
#[derive(Debug, Clone)]
pub struct FileMeta {
    dir: PathBuf,
}

impl FileMeta {
    /// Creates the directory if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, form: FormId) -> PathBuf {
        self.dir.join(format!("{}.json", form))
    }
}

impl MetaStore for FileMeta {
    fn read(&self, form: FormId) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(form)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, form: FormId, blob: String) -> Result<(), StorageError> {
        // Readers must never see a half-written blob
        let tmp = self.dir.join(format!("{}.json.tmp", form));
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, self.path(form))?;
        Ok(())
    }

    fn remove(&self, form: FormId) -> Result<(), StorageError> {
        match fs::remove_file(self.path(form)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
