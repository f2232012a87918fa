use chrono::{DateTime, Utc};
use sapper_core::{Difficulty, RecordStore, ScoreRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not access records file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("records file {path} is not valid JSON")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk shape of a record. The difficulty stays a plain label so one bad entry does not
/// make the whole file unreadable.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredRecord {
    player_name: String,
    difficulty: String,
    elapsed_secs: u32,
    timestamp: DateTime<Utc>,
}

impl From<&ScoreRecord> for StoredRecord {
    fn from(record: &ScoreRecord) -> Self {
        Self {
            player_name: record.player_name.clone(),
            difficulty: record.difficulty.label().to_owned(),
            elapsed_secs: record.elapsed_secs,
            timestamp: record.timestamp,
        }
    }
}

impl TryFrom<StoredRecord> for ScoreRecord {
    type Error = sapper_core::GameError;

    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        let difficulty: Difficulty = stored.difficulty.parse()?;
        Ok(ScoreRecord::new(
            stored.player_name,
            difficulty,
            stored.elapsed_secs,
            stored.timestamp,
        ))
    }
}

/// Score records kept as a JSON array in a single file.
#[derive(Clone, Debug)]
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_stored(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write_stored(&self, stored: &[StoredRecord]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(io_err)?;
                parent
            }
            None => Path::new("."),
        };
        let text = serde_json::to_string_pretty(stored).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        // Replace the file in one rename so a failed write leaves the old history intact.
        let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
        file.write_all(text.as_bytes()).map_err(io_err)?;
        file.as_file().sync_all().map_err(io_err)?;
        file.persist(&self.path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}

impl RecordStore for JsonRecordStore {
    type Error = StoreError;

    fn save(&mut self, record: ScoreRecord) -> Result<(), Self::Error> {
        let mut stored = self.read_stored()?;
        stored.push(StoredRecord::from(&record));
        self.write_stored(&stored)?;
        log::info!(
            "Saved record for {} ({}, {}s) to {}",
            record.player_name,
            record.difficulty,
            record.elapsed_secs,
            self.path.display()
        );
        Ok(())
    }

    /// Entries with a difficulty label outside the known set are skipped with a warning.
    fn load_all(&self) -> Result<Vec<ScoreRecord>, Self::Error> {
        let records = self
            .read_stored()?
            .into_iter()
            .filter_map(|stored| {
                let label = stored.difficulty.clone();
                match ScoreRecord::try_from(stored) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        log::warn!("Skipping record with difficulty {:?}: {}", label, err);
                        None
                    }
                }
            })
            .collect();
        Ok(records)
    }
}
