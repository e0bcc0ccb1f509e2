use std::fs;
use std::path::{Path, PathBuf};

use bevy::log::info;
use serde::{Deserialize, Serialize};

use crate::game_logic::{
    CpuDifficulty, DEFAULT_COUNTDOWN, OPPONENT_NAMES, PLAYER_ACCELERATION, PLAYER_MAX_SPEED, PowerUpKind,
    SetupError, TOTAL_LAPS, TRACK_SEGMENTS, TrackConfig, TrackTemplate, TrackTheme, SEGMENT_LENGTH,
};

/// Race setup as written in a settings file. Names stay strings here so an unknown
/// one is reported with its own error instead of a generic JSON failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RaceSettings {
    pub track: String,
    pub theme: String,
    pub segment_count: usize,
    /// Load an exported track instead of generating one.
    pub track_file: Option<PathBuf>,
    pub total_laps: u32,
    pub opponents: usize,
    pub difficulty: String,
    pub countdown: f32,
    pub seed: Option<u64>,
    pub power_ups: Vec<String>,
    pub player_name: String,
    pub player_max_speed: f32,
    pub player_acceleration: f32,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            track: TrackTemplate::default().as_str().to_string(),
            theme: TrackTheme::default().as_str().to_string(),
            segment_count: TRACK_SEGMENTS,
            track_file: None,
            total_laps: TOTAL_LAPS,
            opponents: OPPONENT_NAMES.len(),
            difficulty: CpuDifficulty::default().as_str().to_string(),
            countdown: DEFAULT_COUNTDOWN,
            seed: None,
            power_ups: PowerUpKind::ALL.iter().map(|k| k.as_str().to_string()).collect(),
            player_name: "You".to_string(),
            player_max_speed: PLAYER_MAX_SPEED,
            player_acceleration: PLAYER_ACCELERATION,
        }
    }
}

/// Checked, typed form of [`RaceSettings`].
#[derive(Debug, Clone, PartialEq)]
pub struct RaceConfig {
    pub track: TrackConfig,
    pub track_file: Option<PathBuf>,
    pub total_laps: u32,
    pub opponents: usize,
    pub difficulty: CpuDifficulty,
    pub countdown: f32,
    pub seed: Option<u64>,
    pub power_ups: Vec<PowerUpKind>,
    pub player_name: String,
    pub player_max_speed: f32,
    pub player_acceleration: f32,
}

fn positive(field: &'static str, value: f32) -> Result<f32, SetupError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SetupError::InvalidSetting {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

impl RaceSettings {
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let settings = RaceSettings::from_json(&fs::read_to_string(path)?)?;
        info!("Loaded race settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<RaceConfig, SetupError> {
        let template: TrackTemplate = self.track.parse()?;
        let theme: TrackTheme = self.theme.parse()?;
        let difficulty: CpuDifficulty = self.difficulty.parse()?;

        if self.segment_count < 4 {
            return Err(SetupError::InvalidSetting {
                field: "segmentCount",
                reason: format!("a loop needs at least 4 segments, got {}", self.segment_count),
            });
        }
        if self.total_laps == 0 {
            return Err(SetupError::InvalidSetting {
                field: "totalLaps",
                reason: "a race needs at least one lap".to_string(),
            });
        }
        if self.opponents > OPPONENT_NAMES.len() {
            return Err(SetupError::InvalidSetting {
                field: "opponents",
                reason: format!("at most {} opponents, got {}", OPPONENT_NAMES.len(), self.opponents),
            });
        }
        if !(self.countdown.is_finite() && self.countdown >= 0.0) {
            return Err(SetupError::InvalidSetting {
                field: "countdown",
                reason: format!("must be zero or more seconds, got {}", self.countdown),
            });
        }

        let mut power_ups = Vec::with_capacity(self.power_ups.len());
        for name in &self.power_ups {
            let kind: PowerUpKind = name.parse()?;
            if !power_ups.contains(&kind) {
                power_ups.push(kind);
            }
        }
        if power_ups.is_empty() {
            return Err(SetupError::InvalidSetting {
                field: "powerUps",
                reason: "at least one power-up kind must be enabled".to_string(),
            });
        }

        Ok(RaceConfig {
            track: TrackConfig {
                template,
                theme,
                segment_count: self.segment_count,
                segment_length: SEGMENT_LENGTH,
            },
            track_file: self.track_file.clone(),
            total_laps: self.total_laps,
            opponents: self.opponents,
            difficulty,
            countdown: self.countdown,
            seed: self.seed,
            power_ups,
            player_name: self.player_name.clone(),
            player_max_speed: positive("playerMaxSpeed", self.player_max_speed)?,
            player_acceleration: positive("playerAcceleration", self.player_acceleration)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = RaceSettings::default().validate().unwrap();
        assert_eq!(config.track.template, TrackTemplate::Classic);
        assert_eq!(config.opponents, 4);
        assert_eq!(config.power_ups.len(), PowerUpKind::ALL.len());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings = RaceSettings::from_json(r#"{"track":"rally","totalLaps":5,"powerUps":["duckTailDraft"]}"#).unwrap();
        let config = settings.validate().unwrap();
        assert_eq!(config.track.template, TrackTemplate::Rally);
        assert_eq!(config.total_laps, 5);
        assert_eq!(config.power_ups, vec![PowerUpKind::DuckTailDraft]);
        assert_eq!(config.difficulty, CpuDifficulty::Medium);
    }

    #[test]
    fn test_unknown_names_are_setup_errors() {
        let bad_track = RaceSettings { track: "moon".into(), ..Default::default() };
        assert!(matches!(bad_track.validate(), Err(SetupError::UnknownTrack(_))));

        let bad_item = RaceSettings { power_ups: vec!["bananaPeel".into()], ..Default::default() };
        assert!(matches!(bad_item.validate(), Err(SetupError::UnknownPowerUp(name)) if name == "bananaPeel"));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let cases = [
            RaceSettings { total_laps: 0, ..Default::default() },
            RaceSettings { opponents: 9, ..Default::default() },
            RaceSettings { countdown: -1.0, ..Default::default() },
            RaceSettings { player_max_speed: f32::NAN, ..Default::default() },
            RaceSettings { power_ups: Vec::new(), ..Default::default() },
            RaceSettings { segment_count: 3, ..Default::default() },
        ];
        for settings in cases {
            assert!(matches!(settings.validate(), Err(SetupError::InvalidSetting { .. })), "{settings:?}");
        }
    }
}
