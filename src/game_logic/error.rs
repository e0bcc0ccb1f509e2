use std::io;

use crate::game_logic::{RaceEvent, RacePhase};

/// Failures that can only happen while setting up a race or importing a track.
/// Nothing on the per-frame path returns one of these.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("unknown track template '{0}' (expected one of: classic, oval, figure8, circuit, drag, rally, custom)")]
    UnknownTrack(String),

    #[error("unknown track theme '{0}' (expected one of: retro, desert, forest, city, snow, space)")]
    UnknownTheme(String),

    #[error("unknown power-up '{0}'")]
    UnknownPowerUp(String),

    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),

    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("track import contains no segments")]
    EmptyTrack,

    #[error("track import has no {0} segment, so no lap can ever be completed")]
    MissingLapMarker(&'static str),

    #[error("track import has a non-finite value in segment {0}")]
    NonFiniteSegment(usize),

    #[error("failed to read or write file: {0}")]
    Io(#[from] io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A race event that the current phase does not accept.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("race event {event:?} is not valid during {from:?}")]
pub struct TransitionError {
    pub from: RacePhase,
    pub event: RaceEvent,
}
