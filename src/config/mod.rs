// License: MIT

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::ast::Value;
use crate::resolver::{EnvAdapter, EnvLookup, ProcessEnv};
use crate::yaml;
use crate::SigilError;

mod access;
mod conversion;

/// Main configuration struct holding the loaded document set, the active
/// index, and the environment adapter used for resolution.
///
/// Not designed for concurrent mutation; callers sharing a handle across
/// threads provide their own synchronization.
#[derive(Debug)]
pub struct SigilConfig<L: EnvLookup = ProcessEnv> {
    documents: Vec<Value>,
    active_index: usize,
    adapter: EnvAdapter<L>,
}

impl SigilConfig<ProcessEnv> {
    /// Read a YAML file into its ordered document set.
    ///
    /// Expands a leading `~/`, fails before reading when the path is not an
    /// existing regular file, and parses the content as a `---`-separated
    /// stream.
    ///
    /// # Example
    /// ```ignore
    /// let documents = SigilConfig::load("config.yml")?;
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Value>, SigilError> {
        let path = expand_home(path.as_ref())?;

        if !path.is_file() {
            return Err(SigilError::file_error(
                "Yaml file is not found at path".into(),
                path.to_string_lossy().to_string(),
            ));
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            SigilError::file_error(
                format!("Failed to read file: {}", e),
                path.to_string_lossy().to_string(),
            )
        })?;

        let documents = yaml::parse_documents(&content)?;
        debug!("loaded {} document(s) from {}", documents.len(), path.display());
        Ok(documents)
    }

    /// Load a YAML config file; the first document starts active.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SigilError> {
        Ok(Self::from_documents(Self::load(path)?))
    }

    /// Load a YAML config file and select a document up front.
    ///
    /// Fails with the index error when `index` is invalid for the loaded set.
    pub fn from_file_with_index<P: AsRef<Path>>(path: P, index: usize) -> Result<Self, SigilError> {
        let mut config = Self::from_file(path)?;
        config.set_active_index(index)?;
        Ok(config)
    }

    /// Load a YAML config file with fallback support.
    ///
    /// Tries the primary path first. If that fails (file not found),
    /// attempts to load from the fallback path.
    pub fn from_file_with_fallback<P: AsRef<Path>>(
        primary: P,
        fallback: P,
    ) -> Result<Self, SigilError> {
        match Self::from_file(&primary) {
            Ok(config) => Ok(config),
            Err(SigilError::FileError { .. }) => {
                // Primary file not found, try fallback
                Self::from_file(&fallback).map_err(|e| match e {
                    SigilError::FileError { message, .. } => SigilError::FileError {
                        message: format!(
                            "Failed to load config from primary path '{}' or fallback path '{}': {}",
                            primary.as_ref().display(),
                            fallback.as_ref().display(),
                            message
                        ),
                        path: format!(
                            "{} (fallback: {})",
                            primary.as_ref().display(),
                            fallback.as_ref().display()
                        ),
                        hint: Some("Check that at least one of the config files exists".into()),
                        code: Some(301),
                    },
                    other => other,
                })
            }
            Err(other) => Err(other), // Pass through non-file errors
        }
    }

    /// Parse a YAML config from a string (no file I/O).
    pub fn from_str(content: &str) -> Result<Self, SigilError> {
        Ok(Self::from_documents(yaml::parse_documents(content)?))
    }

    /// Wrap an already-decoded document set; the first document starts active.
    pub fn from_documents(documents: Vec<Value>) -> Self {
        Self {
            documents,
            active_index: 0,
            adapter: EnvAdapter::new(),
        }
    }
}

impl<L: EnvLookup> SigilConfig<L> {
    /// Wrap a document set with an injected environment lookup.
    pub fn with_lookup(documents: Vec<Value>, lookup: L) -> Self {
        Self {
            documents,
            active_index: 0,
            adapter: EnvAdapter::with_lookup(lookup),
        }
    }

    /// Checks whether an index is in range for assignment.
    ///
    /// The accepted range is `0..=document_count()` — inclusive of the
    /// count, one past the last document. The inherited behavior this crate
    /// replaces checked `len >= index >= 0`, and that bound is carried
    /// forward verbatim rather than silently corrected; reading through the
    /// one-past-the-end index still fails.
    pub fn valid_index(&self, index: usize) -> bool {
        index <= self.documents.len()
    }

    /// Set the active document index.
    ///
    /// On an out-of-range index returns the index error and leaves the
    /// previously active index unchanged.
    pub fn set_active_index(&mut self, index: usize) -> Result<(), SigilError> {
        if !self.valid_index(index) {
            return Err(SigilError::IndexError {
                index,
                len: self.documents.len(),
                hint: Some("Index out of range".into()),
                code: Some(303),
            });
        }
        self.active_index = index;
        Ok(())
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn documents(&self) -> &[Value] {
        &self.documents
    }

    /// Borrow the environment adapter used for resolution.
    pub fn resolver(&self) -> &EnvAdapter<L> {
        &self.adapter
    }

    /// Read configuration from the document set.
    ///
    /// - `index`: document to read; an invalid index falls back to the
    ///   active index, `None` uses the active index.
    /// - `section`: select one top-level key from the document first.
    /// - `safe`: return the selected value raw, skipping resolution.
    ///
    /// The returned value is owned and structurally independent of the
    /// stored documents.
    pub fn config(
        &self,
        section: Option<&str>,
        safe: bool,
        index: Option<usize>,
    ) -> Result<Value, SigilError> {
        let index = match index {
            Some(i) if self.valid_index(i) => i,
            Some(i) => {
                debug!(
                    "requested index {} out of range, using active index {}",
                    i, self.active_index
                );
                self.active_index
            }
            None => self.active_index,
        };

        let document = self.documents.get(index).ok_or_else(|| SigilError::IndexError {
            index,
            len: self.documents.len(),
            hint: Some("Index out of range".into()),
            code: Some(303),
        })?;

        let selected = match section {
            Some(key) => match document {
                Value::Object(map) => map.get(key).ok_or_else(|| SigilError::KeyError {
                    key: key.to_string(),
                    hint: Some("Check that the section exists in your config file".into()),
                    code: Some(304),
                })?,
                other => {
                    return Err(SigilError::TypeError {
                        message: format!(
                            "Cannot select section '{}' from non-mapping document: {:?}",
                            key, other
                        ),
                        hint: Some("Only mapping documents have sections".into()),
                        code: Some(306),
                    });
                }
            },
            None => document,
        };

        if safe {
            Ok(selected.clone())
        } else {
            Ok(self.adapter.resolve(selected))
        }
    }

    /// The resolved active document.
    pub fn document(&self) -> Result<Value, SigilError> {
        self.config(None, false, None)
    }

    /// A resolved top-level section of the active document.
    pub fn section(&self, name: &str) -> Result<Value, SigilError> {
        self.config(Some(name), false, None)
    }
}

/// Expand a leading "~/" against the user's home directory.
fn expand_home(path: &Path) -> Result<PathBuf, SigilError> {
    if let Ok(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| SigilError::FileError {
            message: "Could not determine home directory for ~ expansion".into(),
            path: path.to_string_lossy().to_string(),
            hint: Some("Set HOME or use an absolute path".into()),
            code: Some(300),
        })?;
        Ok(home.join(rest))
    } else {
        Ok(path.to_path_buf())
    }
}
