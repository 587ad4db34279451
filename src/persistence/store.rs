use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// The independent entries seqtimer persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    Mode,
    SequenceConfig,
    SequenceRuntime,
}

impl StateKey {
    pub const ALL: [StateKey; 3] = [
        StateKey::Mode,
        StateKey::SequenceConfig,
        StateKey::SequenceRuntime,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            StateKey::Mode => "mode.json",
            StateKey::SequenceConfig => "sequence_config.json",
            StateKey::SequenceRuntime => "sequence_runtime.json",
        }
    }
}

/// Best-effort durable storage.
///
/// Failures never escape: an unreadable entry is `None`, a failed write is
/// `false`.
pub trait StateStore: Send + Sync {
    fn load(&self, key: StateKey) -> Option<String>;
    fn save(&self, key: StateKey, value: &str) -> bool;
}

/// One JSON file per entry inside a state directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, key: StateKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    fn write(&self, key: StateKey, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).context("Failed to create state directory")?;
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).context("Failed to write state file")?;
        fs::rename(&tmp, &path).context("Failed to replace state file")?;
        Ok(())
    }
}

impl StateStore for FileStore {
    fn load(&self, key: StateKey) -> Option<String> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable state file");
                None
            }
        }
    }

    fn save(&self, key: StateKey, value: &str) -> bool {
        match self.write(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(key = ?key, error = %format!("{:#}", e), "state not saved");
                false
            }
        }
    }
}

/// In-memory store for tests. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<StateKey, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save` fail, as a full or read-only disk would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn get(&self, key: StateKey) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .cloned()
    }

    pub fn put(&self, key: StateKey, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, value.to_string());
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: StateKey) -> Option<String> {
        self.get(key)
    }

    fn save(&self, key: StateKey, value: &str) -> bool {
        if self.fail_writes.load(Ordering::SeqCst) {
            return false;
        }
        self.put(key, value);
        true
    }
}
