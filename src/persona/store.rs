//! Persona persistence
//!
//! The store is a JSON array of `{"agent": ..., "description": ...}`
//! records kept in insertion order. It is append-only: personas are never
//! edited or removed by expertbot.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::Persona;
use crate::error::{ExpertError, Result};

/// Durable, ordered collection of personas
pub trait PersonaStore {
    /// All personas in insertion order
    fn list(&self) -> Result<Vec<Persona>>;

    /// Append a persona at the end of the store
    fn append(&self, name: &str, description: &str) -> Result<()>;

    /// First persona whose name matches exactly
    fn find_by_name(&self, name: &str) -> Result<Option<Persona>> {
        Ok(self.list()?.into_iter().find(|p| p.name == name))
    }
}

/// Persona store backed by a single JSON file
pub struct JsonPersonaStore {
    path: PathBuf,
}

impl JsonPersonaStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Persona>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ExpertError::persistence(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| ExpertError::CorruptStore {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Write the full sequence via a temp file + rename so readers never see
    /// a half-written store
    fn persist(&self, personas: &[Persona]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        fs::create_dir_all(&dir)
            .map_err(|e| ExpertError::persistence(format!("cannot create {}: {}", dir.display(), e)))?;

        let mut tmp = NamedTempFile::new_in(&dir)
            .map_err(|e| ExpertError::persistence(format!("cannot create temp file in {}: {}", dir.display(), e)))?;

        serde_json::to_writer_pretty(&mut tmp, personas)
            .map_err(|e| ExpertError::persistence(format!("cannot encode experts: {}", e)))?;
        tmp.write_all(b"\n")
            .and_then(|_| tmp.flush())
            .map_err(|e| ExpertError::persistence(e.to_string()))?;

        tmp.persist(&self.path)
            .map_err(|e| ExpertError::persistence(format!("cannot replace {}: {}", self.path.display(), e)))?;

        Ok(())
    }
}

impl PersonaStore for JsonPersonaStore {
    fn list(&self) -> Result<Vec<Persona>> {
        self.load()
    }

    fn append(&self, name: &str, description: &str) -> Result<()> {
        let mut personas = self.load()?;
        personas.push(Persona::new(name, description));
        self.persist(&personas)?;

        log::info!(
            "Saved expert '{}' to {} ({} total)",
            name,
            self.path.display(),
            personas.len()
        );
        Ok(())
    }
}
