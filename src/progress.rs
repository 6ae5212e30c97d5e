use std::{collections::BTreeMap, fs, io, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    constants::NOTICES,
    domain::TaskId,
    error::{Error, Result},
    storage,
};

/// Completion state for every task the user has touched, plus the time of
/// the last save. Missing entries read as not completed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub tasks: BTreeMap<TaskId, bool>,
    #[serde(default)]
    pub last_saved: Option<DateTime<Utc>>,
}

impl ProgressSnapshot {
    pub fn is_completed(&self, id: &TaskId) -> bool {
        self.tasks.get(id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: TaskId, completed: bool) {
        self.tasks.insert(id, completed);
    }

    pub fn task_ids(&self) -> impl Iterator<Item = &TaskId> {
        self.tasks.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.last_saved.is_none()
    }
}

/// A single named slot holding the serialized snapshot.
pub trait ProgressSlot {
    /// `Ok(None)` when nothing has been stored.
    fn read(&self) -> Result<Option<String>>;
    fn write(&mut self, contents: &str) -> Result<()>;
    fn remove(&mut self) -> Result<()>;
}

pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSlot { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ProgressSlot for FileSlot {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        storage::atomic_write(&self.path, contents)
    }

    fn remove(&mut self) -> Result<()> {
        if storage::file_exists(&self.path) {
            storage::create_backup(&self.path)?;
        }
        storage::delete_file_if_exists(&self.path)
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemorySlot {
    pub value: Option<String>,
}

#[cfg(test)]
impl ProgressSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        self.value = Some(contents.to_string());
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        self.value = None;
        Ok(())
    }
}

/// Owns the canonical snapshot and mediates every read and write of the
/// slot behind it.
pub struct ProgressStore<S: ProgressSlot> {
    slot: S,
    snapshot: ProgressSnapshot,
}

impl<S: ProgressSlot> ProgressStore<S> {
    pub fn new(slot: S) -> Self {
        ProgressStore {
            slot,
            snapshot: ProgressSnapshot::default(),
        }
    }

    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Never fails: an empty, unreadable or corrupt slot yields an empty
    /// snapshot.
    pub fn load(&mut self) -> &ProgressSnapshot {
        self.snapshot = match self.slot.read() {
            Ok(Some(content)) => match serde_json::from_str(&content) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::warn!("discarding unreadable progress data: {e}");
                    ProgressSnapshot::default()
                }
            },
            Ok(None) => ProgressSnapshot::default(),
            Err(e) => {
                tracing::warn!("could not read progress data: {e}");
                ProgressSnapshot::default()
            }
        };

        tracing::debug!(entries = self.snapshot.tasks.len(), "progress loaded");
        &self.snapshot
    }

    pub fn set_task_state(&mut self, id: &TaskId, completed: bool) {
        self.snapshot.set(id.clone(), completed);
    }

    pub fn save(&mut self) -> Result<&'static str> {
        self.save_at(Utc::now())
    }

    pub fn save_at(&mut self, now: DateTime<Utc>) -> Result<&'static str> {
        self.snapshot.last_saved = Some(now);
        let json = serde_json::to_string_pretty(&self.snapshot)?;
        self.slot.write(&json)?;
        tracing::debug!(entries = self.snapshot.tasks.len(), "progress saved");
        Ok(NOTICES.saved)
    }

    /// Deletes the stored entry, then clears memory, so the next load sees
    /// nothing saved rather than an empty save. Memory is left untouched when
    /// the entry cannot be removed.
    pub fn reset(&mut self) -> Result<&'static str> {
        self.slot.remove()?;
        self.snapshot = ProgressSnapshot::default();
        tracing::info!("progress reset");
        Ok(NOTICES.reset)
    }
}
