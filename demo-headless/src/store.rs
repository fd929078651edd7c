//! JSON file store for saved calculation variants

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thermothin_core::{Variant, VariantStore};
use tracing::debug;

/// On-disk layout of the variants file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct VariantFile {
    variants: Vec<Variant>,
}

/// Variants kept in a single pretty-printed JSON file
///
/// Every save rewrites the whole file.
#[derive(Debug)]
pub struct JsonVariantStore {
    path: PathBuf,
    file: VariantFile,
}

impl JsonVariantStore {
    /// Open the store at `path`; a missing file starts an empty store
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StoreError::ParseFailed(e.to_string()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No variants file yet, starting empty");
                VariantFile::default()
            }
            Err(e) => return Err(StoreError::LoadFailed(e.to_string())),
        };
        Ok(Self { path, file })
    }

    pub fn variants(&self) -> &[Variant] {
        &self.file.variants
    }

    /// Saved variant with `id`, if any
    pub fn get(&self, id: u64) -> Option<&Variant> {
        self.file.variants.iter().find(|v| v.id == Some(id))
    }

    /// Remove the variant with `id` and rewrite the file
    ///
    /// Returns `false` (and leaves the file untouched) if no variant has `id`.
    ///
    /// # Errors
    /// Returns error if the file cannot be rewritten; the variant is kept
    pub fn delete(&mut self, id: u64) -> Result<bool, StoreError> {
        let Some(index) = self.file.variants.iter().position(|v| v.id == Some(id)) else {
            return Ok(false);
        };
        let removed = self.file.variants.remove(index);
        if let Err(e) = self.write() {
            self.file.variants.insert(index, removed);
            return Err(e);
        }
        debug!(id, path = %self.path.display(), "Deleted variant");
        Ok(true)
    }

    fn next_id(&self) -> u64 {
        self.file
            .variants
            .iter()
            .filter_map(|v| v.id)
            .max()
            .map_or(1, |id| id + 1)
    }

    fn write(&self) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(&self.file)
            .map_err(|e| StoreError::SerializeFailed(e.to_string()))?;
        fs::write(&self.path, contents).map_err(|e| StoreError::SaveFailed(e.to_string()))
    }
}

impl VariantStore for JsonVariantStore {
    type Error = StoreError;

    fn save(&mut self, variant: Variant) -> Result<u64, StoreError> {
        let id = self.next_id();
        self.file.variants.push(variant.with_id(id));
        if let Err(e) = self.write() {
            self.file.variants.pop();
            return Err(e);
        }
        Ok(id)
    }
}

/// Errors that can occur with the variants file
#[derive(Debug)]
pub enum StoreError {
    /// Failed to read file
    LoadFailed(String),
    /// Failed to parse file contents
    ParseFailed(String),
    /// Failed to serialize variants
    SerializeFailed(String),
    /// Failed to write file
    SaveFailed(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::LoadFailed(msg) => write!(f, "Failed to load: {msg}"),
            StoreError::ParseFailed(msg) => write!(f, "Failed to parse: {msg}"),
            StoreError::SerializeFailed(msg) => write!(f, "Failed to serialize: {msg}"),
            StoreError::SaveFailed(msg) => write!(f, "Failed to save: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
