//! Session persistence.
//!
//! Pane contents and the diagnostics text survive restarts. A missing store
//! file is an empty session, not an error.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sync::PaneId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub derived: String,
    #[serde(default)]
    pub diagnostics: String,
}

impl SessionSnapshot {
    pub fn pane(&self, id: PaneId) -> &str {
        match id {
            PaneId::Source => &self.source,
            PaneId::Derived => &self.derived,
        }
    }

    pub fn set_pane(&mut self, id: PaneId, text: &str) {
        let slot = match id {
            PaneId::Source => &mut self.source,
            PaneId::Derived => &mut self.derived,
        };
        text.clone_into(slot);
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty() && self.derived.is_empty()
    }
}

pub trait SessionStore {
    fn load(&mut self) -> Result<SessionSnapshot, StoreError>;
    fn save_pane(&mut self, pane: PaneId, text: &str) -> Result<(), StoreError>;
    fn save_diagnostics(&mut self, text: &str) -> Result<(), StoreError>;
}

/// Keeps everything in memory. Used with `--no-persist` and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: SessionSnapshot,
    writes: HashMap<&'static str, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            snapshot,
            writes: HashMap::new(),
        }
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn write_count(&self, key: &str) -> usize {
        self.writes.get(key).copied().unwrap_or(0)
    }
}

impl SessionStore for MemoryStore {
    fn load(&mut self) -> Result<SessionSnapshot, StoreError> {
        Ok(self.snapshot.clone())
    }

    fn save_pane(&mut self, pane: PaneId, text: &str) -> Result<(), StoreError> {
        self.snapshot.set_pane(pane, text);
        let key = match pane {
            PaneId::Source => "source",
            PaneId::Derived => "derived",
        };
        *self.writes.entry(key).or_default() += 1;
        Ok(())
    }

    fn save_diagnostics(&mut self, text: &str) -> Result<(), StoreError> {
        text.clone_into(&mut self.snapshot.diagnostics);
        *self.writes.entry("diagnostics").or_default() += 1;
        Ok(())
    }
}

/// A single JSON document on disk, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    snapshot: SessionSnapshot,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: SessionSnapshot::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(&self.snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SessionStore for JsonFileStore {
    fn load(&mut self) -> Result<SessionSnapshot, StoreError> {
        let body = match fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        self.snapshot = if body.trim().is_empty() {
            SessionSnapshot::default()
        } else {
            serde_json::from_str(&body)?
        };
        Ok(self.snapshot.clone())
    }

    fn save_pane(&mut self, pane: PaneId, text: &str) -> Result<(), StoreError> {
        if self.snapshot.pane(pane) == text {
            return Ok(());
        }
        self.snapshot.set_pane(pane, text);
        self.flush()
    }

    fn save_diagnostics(&mut self, text: &str) -> Result<(), StoreError> {
        if self.snapshot.diagnostics == text {
            return Ok(());
        }
        text.clone_into(&mut self.snapshot.diagnostics);
        self.flush()
    }
}
