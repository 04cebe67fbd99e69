//! Auto-save of the working design.
//!
//! The design is serialized to JSON and written under a single well-known key.
//! Writes only happen while the design is dirty.

use super::{KeyValueStore, StorageError};
use crate::canvas::Canvas;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 5;

/// Key the working design is stored under.
pub const DESIGN_KEY: &str = "last_design";

/// Failure to restore a stored design.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("stored design is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("failed to read stored design: {0}")]
    Storage(#[from] StorageError),
}

/// Failure to persist the working design.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to serialize design: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write design: {0}")]
    Write(#[from] StorageError),
}

/// Tracks unsaved changes and writes the design to a [`KeyValueStore`].
pub struct AutoSaveManager {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    interval: Duration,
    last_save: Option<Instant>,
    /// Whether the design has unsaved changes.
    dirty: bool,
}

impl AutoSaveManager {
    /// Create a new auto-save manager with the given storage backend.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            key: DESIGN_KEY.to_string(),
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
        }
    }

    /// Use a different storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Set the auto-save interval.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Get the auto-save interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Mark the design as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check if the design has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// When the last successful write happened.
    pub fn last_save(&self) -> Option<Instant> {
        self.last_save
    }

    /// Check if an auto-save is due at `now`: dirty, and the interval has
    /// passed since the last write (or nothing was ever written).
    pub fn should_save(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }

        match self.last_save {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Save the design if an auto-save is due.
    /// Returns true if a write was performed.
    pub async fn maybe_save(&mut self, canvas: &Canvas, now: Instant) -> Result<bool, PersistenceError> {
        if !self.should_save(now) {
            return Ok(false);
        }
        self.write(canvas, now).await?;
        Ok(true)
    }

    /// Save the design now if it is dirty, regardless of the interval.
    /// Returns true if a write was performed.
    pub async fn save(&mut self, canvas: &Canvas) -> Result<bool, PersistenceError> {
        if !self.dirty {
            return Ok(false);
        }
        self.write(canvas, Instant::now()).await?;
        Ok(true)
    }

    /// The dirty flag is only cleared once the write has succeeded.
    async fn write(&mut self, canvas: &Canvas, now: Instant) -> Result<(), PersistenceError> {
        let json = canvas.to_json()?;
        self.storage.set(&self.key, &json).await?;

        self.last_save = Some(now);
        self.dirty = false;
        log::debug!("Saved design under '{}' ({} bytes)", self.key, json.len());
        Ok(())
    }

    /// Load the stored design, if there is one.
    ///
    /// A corrupt record is reported as [`LoadError::Corrupt`]; callers are
    /// expected to fall back to an empty canvas.
    pub async fn load(&mut self) -> Result<Option<Canvas>, LoadError> {
        let Some(json) = self.storage.get(&self.key).await? else {
            return Ok(None);
        };

        let canvas = Canvas::from_json(&json)?;
        self.dirty = false;
        Ok(Some(canvas))
    }

    /// Delete the stored design.
    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(&self.key).await
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }
}
