//! Durable storage for the engine state

use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use thiserror::Error;
use tracing::debug;

use crate::engine::EngineState;

const STATE_FILE: &str = "state.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Where committed engine state lives between ticks and restarts
pub trait StateStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<EngineState>, StoreError>;

    /// Replace the stored snapshot atomically
    fn save(&self, state: &EngineState) -> Result<(), StoreError>;
}

/// JSON snapshot on disk, replaced via write-to-temp and rename
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            path: data_dir.join(STATE_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<EngineState>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, state: &EngineState) -> Result<(), StoreError> {
        let temp_path = self.path.with_extension("tmp");
        let file = fs::File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, state)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        fs::rename(&temp_path, &self.path)?;
        debug!("State saved to {}", self.path.display());
        Ok(())
    }
}

/// In-process store, with a switch to simulate an unavailable backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<EngineState>>,
    failing: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut flag) = self.failing.lock() {
            *flag = failing;
        }
    }

    fn check_available(&self) -> Result<(), StoreError> {
        match self.failing.lock() {
            Ok(flag) if !*flag => Ok(()),
            Ok(_) => Err(StoreError::Unavailable("memory store switched off".to_string())),
            Err(e) => Err(StoreError::Unavailable(format!("Failed to lock store: {}", e))),
        }
    }

    pub fn snapshot(&self) -> Option<EngineState> {
        self.state.lock().ok().and_then(|state| state.clone())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<EngineState>, StoreError> {
        self.check_available()?;
        self.state
            .lock()
            .map(|state| state.clone())
            .map_err(|e| StoreError::Unavailable(format!("Failed to lock store: {}", e)))
    }

    fn save(&self, state: &EngineState) -> Result<(), StoreError> {
        self.check_available()?;
        let mut stored = self
            .state
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("Failed to lock store: {}", e)))?;
        *stored = Some(state.clone());
        Ok(())
    }
}
