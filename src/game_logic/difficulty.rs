use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game_logic::SetupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl CpuDifficulty {
    pub const ALL: [CpuDifficulty; 4] = [
        CpuDifficulty::Easy,
        CpuDifficulty::Medium,
        CpuDifficulty::Hard,
        CpuDifficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CpuDifficulty::Easy => "easy",
            CpuDifficulty::Medium => "medium",
            CpuDifficulty::Hard => "hard",
            CpuDifficulty::Expert => "expert",
        }
    }

    /// Share of an AI kart's top speed it will actually use.
    pub fn speed_factor(&self) -> f32 {
        match self {
            CpuDifficulty::Easy => 0.85,
            CpuDifficulty::Medium => 0.95,
            CpuDifficulty::Hard => 1.0,
            CpuDifficulty::Expert => 1.1,
        }
    }

    /// Scales how quickly the kart closes on its racing line.
    pub fn handling_factor(&self) -> f32 {
        match self {
            CpuDifficulty::Easy => 0.8,
            CpuDifficulty::Medium => 0.9,
            CpuDifficulty::Hard => 1.0,
            CpuDifficulty::Expert => 1.1,
        }
    }
}

impl FromStr for CpuDifficulty {
    type Err = SetupError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        CpuDifficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| SetupError::UnknownDifficulty(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harder_karts_are_faster_and_sharper() {
        for pair in CpuDifficulty::ALL.windows(2) {
            assert!(pair[0].speed_factor() < pair[1].speed_factor());
            assert!(pair[0].handling_factor() < pair[1].handling_factor());
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("HARD".parse::<CpuDifficulty>().unwrap(), CpuDifficulty::Hard);
        assert!(matches!(
            "nightmare".parse::<CpuDifficulty>(),
            Err(SetupError::UnknownDifficulty(name)) if name == "nightmare"
        ));
    }
}
