use alloc::string::String;

use serde::{Deserialize, Serialize};

use crate::*;

/// Sounds the session asks its host to play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cue {
    Start,
    DotEaten,
    Death,
    GhostEaten,
    PowerPellet,
    LevelComplete,
}

impl Cue {
    pub const ALL: [Cue; 6] = [
        Cue::Start,
        Cue::DotEaten,
        Cue::Death,
        Cue::GhostEaten,
        Cue::PowerPellet,
        Cue::LevelComplete,
    ];

    /// Asset name, e.g. `/sounds/{name}.mp3`.
    pub const fn name(self) -> &'static str {
        use Cue::*;
        match self {
            Start => "start",
            DotEaten => "munch",
            Death => "death",
            GhostEaten => "eatGhost",
            PowerPellet => "powerPellet",
            LevelComplete => "levelComplete",
        }
    }
}

/// Fire-and-forget audio output. Implementations must not block the tick.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
    fn stop(&mut self, cue: Cue);
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _cue: Cue) {}
    fn stop(&mut self, _cue: Cue) {}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScore {
    pub score: u32,
    pub player_name: String,
}

pub trait HighScoreStore {
    fn load(&mut self) -> core::result::Result<Option<HighScore>, StoreError>;
    fn save(&mut self, high_score: &HighScore) -> core::result::Result<(), StoreError>;
}

/// Keeps the record for the lifetime of the session only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    pub high_score: Option<HighScore>,
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> core::result::Result<Option<HighScore>, StoreError> {
        Ok(self.high_score.clone())
    }

    fn save(&mut self, high_score: &HighScore) -> core::result::Result<(), StoreError> {
        self.high_score = Some(high_score.clone());
        Ok(())
    }
}
