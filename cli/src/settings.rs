use anyhow::Context;
use sapper_core::{CustomLimits, Difficulty};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file looked up in the working directory when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "sapper.toml";

/// Persistent host settings, read from TOML. Command-line flags take precedence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub records_path: PathBuf,
    pub custom_limits: CustomLimits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            records_path: PathBuf::from("sapper_records.json"),
            custom_limits: CustomLimits::default(),
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads `path` when given, otherwise the default file if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_SETTINGS_FILE).is_file() => Path::new(DEFAULT_SETTINGS_FILE),
            None => {
                log::debug!("No settings file, using defaults");
                return Ok(Self::default());
            }
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read settings from {}", path.display()))?;
        let settings = Self::from_toml(&text)
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        log::debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let settings = Settings::from_toml(
            r#"
            difficulty = "Hard"

            [custom_limits]
            min_side = 3
            max_side = 60
            min_mines = 2
            "#,
        )
        .unwrap();

        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.records_path, PathBuf::from("sapper_records.json"));
        assert_eq!(settings.custom_limits.max_side, 60);
    }

    #[test]
    fn difficulty_labels_ignore_case() {
        let settings = Settings::from_toml(r#"difficulty = "hard""#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        assert!(Settings::from_toml(r#"difficulty = "Insane""#).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sapper.toml");
        fs::write(&path, "records_path = \"scores.json\"\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.records_path, PathBuf::from("scores.json"));
        assert_eq!(settings.difficulty, Difficulty::Easy);
    }
}
