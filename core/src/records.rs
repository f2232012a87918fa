use alloc::string::String;
use alloc::vec::Vec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

/// One finished, won game. Never modified once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub elapsed_secs: u32,
    pub timestamp: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn new(
        player_name: impl Into<String>,
        difficulty: Difficulty,
        elapsed_secs: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            player_name: player_name.into(),
            difficulty,
            elapsed_secs,
            timestamp,
        }
    }
}

/// Orders records for display: by difficulty (Easy, Medium, Hard, Custom), then fastest
/// first. Equal keys keep their input order.
pub fn rank(records: impl IntoIterator<Item = ScoreRecord>) -> Vec<ScoreRecord> {
    let mut records: Vec<_> = records.into_iter().collect();
    records.sort_by_key(|record| (record.difficulty, record.elapsed_secs));
    records
}

/// Splits ranked records into one section per difficulty, in table order. Sections without
/// records are kept so every heading is shown.
pub fn group_by_difficulty(ranked: &[ScoreRecord]) -> Vec<(Difficulty, Vec<&ScoreRecord>)> {
    Difficulty::ALL
        .into_iter()
        .map(|difficulty| {
            let section = ranked
                .iter()
                .filter(|record| record.difficulty == difficulty)
                .collect();
            (difficulty, section)
        })
        .collect()
}

/// Durable storage for score records. Implementations keep every field verbatim and may
/// return records in any order.
pub trait RecordStore {
    type Error;

    fn save(&mut self, record: ScoreRecord) -> core::result::Result<(), Self::Error>;

    fn load_all(&self) -> core::result::Result<Vec<ScoreRecord>, Self::Error>;

    /// All stored records, ranked for display.
    fn ranked(&self) -> core::result::Result<Vec<ScoreRecord>, Self::Error> {
        self.load_all().map(rank)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryRecordStore {
    records: Vec<ScoreRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    type Error = core::convert::Infallible;

    fn save(&mut self, record: ScoreRecord) -> core::result::Result<(), Self::Error> {
        self.records.push(record);
        Ok(())
    }

    fn load_all(&self) -> core::result::Result<Vec<ScoreRecord>, Self::Error> {
        Ok(self.records.clone())
    }
}
