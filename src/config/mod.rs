//! Configuration management for pokernow2hh.
//!
//! Handles the defaults for the `convert` command: hero name, site label,
//! time zone, tournament name, player-count filter, game type and rake.
//! Command-line flags take precedence over the file.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};
use crate::export::GameType;
use crate::model::PlayerCountFilter;
use crate::util::atomic_write;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Defaults for the convert command.
    #[serde(default)]
    pub convert: ConvertDefaults,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConvertError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConvertError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        self.convert.time_zone()?;
        self.convert.filter()?;
        if self.convert.rake_percent < 0.0 || self.convert.rake_cap_bb < 0.0 {
            return Err(ConvertError::InvalidConfig {
                message: "rake_percent and rake_cap_bb must not be negative".to_string(),
            });
        }
        Ok(())
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path.
    ///
    /// The file is written atomically and its parent directory created.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConvertError::InvalidConfig {
            message: format!("Failed to serialize config: {e}"),
        })?;

        atomic_write(path, content.as_bytes())?;

        Ok(())
    }
}

/// Defaults for the convert command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertDefaults {
    /// Hero display name.
    #[serde(default)]
    pub hero_name: String,
    /// Site label in hand headers.
    #[serde(default = "default_site_name")]
    pub site_name: String,
    /// IANA time zone name for rendered timestamps.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Table name; empty keeps `PokerNow <tournament id>`.
    #[serde(default)]
    pub tournament_name: String,
    /// Accepted player-count classes, empty for all.
    #[serde(default)]
    pub filters: Vec<String>,
    /// Rake percentage.
    #[serde(default)]
    pub rake_percent: f64,
    /// Rake cap in big blinds.
    #[serde(default)]
    pub rake_cap_bb: f64,
    /// Hand history layout, `tournament` or `cash`.
    #[serde(default)]
    pub game_type: GameType,
}

impl Default for ConvertDefaults {
    fn default() -> Self {
        Self {
            hero_name: String::new(),
            site_name: default_site_name(),
            timezone: default_timezone(),
            tournament_name: String::new(),
            filters: Vec::new(),
            rake_percent: 0.0,
            rake_cap_bb: 0.0,
            game_type: GameType::Tournament,
        }
    }
}

impl ConvertDefaults {
    /// Parsed time zone.
    pub fn time_zone(&self) -> Result<Tz> {
        parse_time_zone(&self.timezone).map_err(|_| ConvertError::InvalidConfig {
            message: format!("unknown time zone: {}", self.timezone),
        })
    }

    /// Combined player-count filter.
    pub fn filter(&self) -> Result<PlayerCountFilter> {
        self.filters.iter().try_fold(PlayerCountFilter::ALL, |acc, name| {
            let class: PlayerCountFilter = name.parse().map_err(|_| ConvertError::InvalidConfig {
                message: format!("unknown player-count filter: {name}"),
            })?;
            Ok(acc | class)
        })
    }
}

/// Parse an IANA time zone name such as `Asia/Tokyo`.
pub fn parse_time_zone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| ConvertError::invalid_argument("timezone", e.to_string()))
}

fn default_site_name() -> String {
    crate::export::DEFAULT_SITE_NAME.to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| ConvertError::InvalidConfig {
        message: "could not determine the configuration directory".to_string(),
    })?;

    Ok(config_dir.join(crate::NAME).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.convert.site_name, "PokerStars");
        assert_eq!(config.convert.time_zone().unwrap(), Tz::UTC);
        assert!(config.convert.filter().unwrap().is_all());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[convert]
hero_name = "whywaita"
timezone = "Asia/Tokyo"
filters = ["hu", "mtt"]
rake_percent = 5.0
game_type = "cash"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.convert.hero_name, "whywaita");
        assert_eq!(config.convert.site_name, "PokerStars");
        assert_eq!(config.convert.time_zone().unwrap(), chrono_tz::Asia::Tokyo);
        assert_eq!(
            config.convert.filter().unwrap(),
            PlayerCountFilter::HEADS_UP | PlayerCountFilter::MTT
        );
        assert_eq!(config.convert.rake_cap_bb, 0.0);
        assert_eq!(config.convert.game_type, GameType::Cash);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        std::fs::write(&path, "[convert]\ntimezone = \"Mars/Olympus\"\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig { .. }));

        std::fs::write(&path, "[convert]\nfilters = [\"six-max\"]\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        std::fs::write(&path, "[convert]\ngame_type = \"sit-and-go\"\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig { .. }));

        std::fs::write(&path, "[convert\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.convert.hero_name = "alice".to_string();
        config.convert.filters = vec!["spin".to_string()];
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
