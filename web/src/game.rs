use mazechase_core::{Direction, GameConfig, HighScoreStore, PlayEngine};
use wasm_bindgen::prelude::*;
use web_time::Instant;

use crate::Args;
use crate::audio::HtmlAudio;
use crate::storage::LocalHighScores;
use crate::utils::js_random_seed;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Steer(Direction),
    Primary,
    ToggleSound,
}

impl KeyAction {
    /// Maps a `KeyboardEvent.key` value.
    pub(crate) fn from_key(key: &str) -> Option<Self> {
        use KeyAction::*;
        match key {
            "ArrowUp" | "w" | "W" => Some(Steer(Direction::Up)),
            "ArrowDown" | "s" | "S" => Some(Steer(Direction::Down)),
            "ArrowLeft" | "a" | "A" => Some(Steer(Direction::Left)),
            "ArrowRight" | "d" | "D" => Some(Steer(Direction::Right)),
            " " | "Enter" => Some(Primary),
            "m" | "M" => Some(ToggleSound),
            _ => None,
        }
    }
}

/// Direction names as reported by the host's swipe detection.
pub(crate) fn parse_direction(name: &str) -> Option<Direction> {
    match name {
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        _ => None,
    }
}

/// The session as seen from JavaScript. The host calls `tick` once per
/// animation frame and draws whatever `frame_json` returns.
#[wasm_bindgen]
pub struct WebGame {
    engine: PlayEngine,
    audio: HtmlAudio,
    last_tick: Option<Instant>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebGame, JsError> {
        let args = Args::from_location()?;

        let mut config = GameConfig::default();
        if let Some(lives) = args.lives {
            config.lives = lives;
        }
        let seed = args.seed.unwrap_or_else(js_random_seed);
        log::debug!("seed: {seed}");

        let audio = HtmlAudio::new().map_err(|err| JsError::new(&format!("Cannot load sounds: {err:?}")))?;
        let mut engine = PlayEngine::new(config, seed)
            .with_audio(audio.clone())
            .with_store(LocalHighScores);
        if let Some(name) = args.name {
            engine.set_player_name(name);
        }

        Ok(Self {
            engine,
            audio,
            last_tick: None,
        })
    }

    /// Advances by the wall-clock time since the previous call. Returns
    /// whether anything visible changed.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        let delta_ms = self
            .last_tick
            .map_or(0.0, |last| now.duration_since(last).as_secs_f64() * 1000.0);
        self.last_tick = Some(now);
        self.engine.tick(delta_ms).has_update()
    }

    pub fn handle_key(&mut self, key: &str) -> bool {
        match KeyAction::from_key(key) {
            Some(KeyAction::Steer(direction)) => self.engine.set_direction(direction),
            Some(KeyAction::Primary) => self.primary_action(),
            Some(KeyAction::ToggleSound) => {
                let enabled = self.audio.toggle();
                log::debug!("sound enabled: {enabled}");
                true
            }
            None => false,
        }
    }

    pub fn swipe(&mut self, direction: &str) -> bool {
        parse_direction(direction).is_some_and(|direction| self.engine.set_direction(direction))
    }

    pub fn primary_action(&mut self) -> bool {
        self.engine.primary_action().has_update()
    }

    pub fn frame_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.engine.frame())?)
    }

    pub fn set_player_name(&mut self, name: String) {
        self.engine.set_player_name(name);
    }

    pub fn sound_enabled(&self) -> bool {
        self.audio.is_enabled()
    }

    /// Picks up a record written by another tab, e.g. from a `storage` event.
    pub fn reload_high_score(&mut self) {
        match LocalHighScores.load() {
            Ok(Some(high_score)) => self.engine.update_high_score(high_score),
            Ok(None) => {}
            Err(err) => log::warn!("Cannot reload high score: {err}"),
        }
    }
}
