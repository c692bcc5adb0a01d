use std::collections::BTreeMap;
use std::fs::{rename, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use crate::core::MatchHistory;
use crate::models::{MatchupKey, Participant};
use crate::services::store::{check_roster, HistoryStore, RosterStore, StoreError};

/// Roster kept as a JSON array of participant records
#[derive(Debug, Clone)]
pub struct JsonRosterStore {
    path: PathBuf,
}

impl JsonRosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RosterStore for JsonRosterStore {
    fn load(&self) -> Result<Vec<Participant>, StoreError> {
        let Some(data) = read_if_exists(&self.path)? else {
            tracing::debug!("No roster at {:?}, starting empty", self.path);
            return Ok(Vec::new());
        };

        let location = self.path.display().to_string();
        let participants: Vec<Participant> = serde_json::from_slice(&data)
            .map_err(|e| StoreError::corrupt(&location, e.to_string()))?;
        check_roster(&location, &participants)?;

        tracing::debug!("Loaded {} participants from {:?}", participants.len(), self.path);
        Ok(participants)
    }

    fn save(&self, participants: &[Participant]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(participants)?;
        write_atomic(&self.path, &data)?;
        tracing::debug!("Saved {} participants to {:?}", participants.len(), self.path);
        Ok(())
    }
}

/// History kept as a JSON object mapping encoded matchup keys to ages
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Result<MatchHistory, StoreError> {
        let Some(data) = read_if_exists(&self.path)? else {
            tracing::debug!("No match history at {:?}, starting empty", self.path);
            return Ok(MatchHistory::new());
        };

        let location = self.path.display().to_string();
        let raw: BTreeMap<String, u32> = serde_json::from_slice(&data)
            .map_err(|e| StoreError::corrupt(&location, e.to_string()))?;

        let mut history = MatchHistory::new();
        for (encoded, age) in raw {
            let key = MatchupKey::decode(&encoded).ok_or_else(|| {
                StoreError::corrupt(&location, format!("invalid matchup key '{}'", encoded))
            })?;
            history.insert(key, age);
        }

        tracing::debug!("Loaded {} history entries from {:?}", history.len(), self.path);
        Ok(history)
    }

    fn save(&self, history: &MatchHistory) -> Result<(), StoreError> {
        let raw: BTreeMap<String, u32> = history
            .iter()
            .map(|(key, age)| (key.encode(), age))
            .collect();
        let data = serde_json::to_vec_pretty(&raw)?;
        write_atomic(&self.path, &data)?;
        tracing::debug!("Saved {} history entries to {:?}", raw.len(), self.path);
        Ok(())
    }
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match std::fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write to a temp file, then rename over the target
fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let temp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&temp_path).map_err(io_err)?;
        file.write_all(data).map_err(io_err)?;
        file.flush().map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
    }

    rename(&temp_path, path).map_err(io_err)
}
