use alloc::string::String;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Board dimensions plus mine count, validated so that at least one safe cell exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const EASY: Self = Self::new_unchecked((9, 9), 10);
    pub const MEDIUM: Self = Self::new_unchecked((16, 16), 40);
    pub const HARD: Self = Self::new_unchecked((30, 16), 99);

    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        Self::new_unchecked(size, mines).validate()
    }

    pub fn validate(self) -> Result<Self> {
        if self.size.0 < 1 || self.size.1 < 1 {
            return Err(ConfigIssue::EmptyBoard.into());
        }
        if self.mines >= self.total_cells() {
            return Err(ConfigIssue::TooManyMines.into());
        }
        Ok(self)
    }

    pub const fn width(&self) -> Coord {
        self.size.0
    }

    pub const fn height(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Difficulty label attached to score records.
///
/// The declaration order is the display order of the high-score table, so the derived `Ord`
/// is what ranking sorts by. Deserializing goes through [`FromStr`], so labels are
/// case-insensitive there too.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Custom,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Custom];

    /// Fixed board for the preset levels, `None` for custom games.
    pub const fn preset(self) -> Option<GameConfig> {
        match self {
            Self::Easy => Some(GameConfig::EASY),
            Self::Medium => Some(GameConfig::MEDIUM),
            Self::Hard => Some(GameConfig::HARD),
            Self::Custom => None,
        }
    }

    /// Maps a board back to its preset, anything else is custom.
    pub fn classify(config: GameConfig) -> Self {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.preset() == Some(config))
            .unwrap_or(Self::Custom)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.label().eq_ignore_ascii_case(s))
            .ok_or(GameError::UnknownDifficulty)
    }
}

impl TryFrom<String> for Difficulty {
    type Error = GameError;

    fn try_from(label: String) -> Result<Self> {
        label.parse()
    }
}

/// Bounds a host applies to player-entered custom boards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomLimits {
    pub min_side: Coord,
    pub max_side: Coord,
    pub min_mines: CellCount,
}

impl Default for CustomLimits {
    fn default() -> Self {
        Self {
            min_side: 5,
            max_side: 40,
            min_mines: 1,
        }
    }
}

impl CustomLimits {
    pub fn validate(&self, config: GameConfig) -> Result<GameConfig> {
        let config = config.validate()?;
        let sides = self.min_side..=self.max_side;
        if !sides.contains(&config.width())
            || !sides.contains(&config.height())
            || config.mines < self.min_mines
        {
            return Err(ConfigIssue::OutsideCustomLimits.into());
        }
        Ok(config)
    }
}
