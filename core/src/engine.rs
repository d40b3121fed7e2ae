use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::BitOr;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameState {
    Ready,
    Playing,
    Paused,
    GameOver,
    Win,
}

impl GameState {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Result of [`PlayEngine::primary_action`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Ignored,
    Started,
    Resumed,
    Paused,
    Restarted,
}

impl ActionOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Moved,
    Ate,
    GhostEaten,
    LevelCleared,
    LifeLost,
    GameOver,
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl BitOr for TickOutcome {
    type Output = TickOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use TickOutcome::*;
        match (self, rhs) {
            (GameOver, _) | (_, GameOver) => GameOver,
            (LifeLost, _) | (_, LifeLost) => LifeLost,
            (LevelCleared, _) | (_, LevelCleared) => LevelCleared,
            (GhostEaten, _) | (_, GhostEaten) => GhostEaten,
            (Ate, _) | (_, Ate) => Ate,
            (Moved, _) | (_, Moved) => Moved,
            (Idle, Idle) => Idle,
        }
    }
}

/// Read-only view handed to renderers once per frame.
#[derive(Copy, Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame<'a> {
    pub grid: &'a Maze,
    pub player: &'a Player,
    pub ghosts: &'a [Ghost],
    pub effects: &'a Effects,
    pub state: GameState,
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    pub dots_remaining: usize,
    pub power_mode: bool,
    pub high_score: &'a HighScore,
    pub clock_ms: f64,
}

/// One game session. Everything mutates through [`PlayEngine::tick`] and the
/// two input calls, so timers and movement never interleave.
pub struct PlayEngine {
    config: GameConfig,
    maze: Maze,
    player: Player,
    ghosts: Vec<Ghost>,
    effects: Effects,
    timers: Timers,
    state: GameState,
    level: u32,
    score: u32,
    dots_remaining: usize,
    ghosts_eaten: u32,
    power_mode: bool,
    clock_ms: f64,
    player_name: String,
    high_score: HighScore,
    rng: SmallRng,
    audio: Box<dyn AudioSink>,
    store: Box<dyn HighScoreStore>,
}

impl PlayEngine {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let config = config.validated();
        let maze = Maze::classic();
        let dots_remaining = maze.count_dots();
        let ghosts = spawn_ghosts(&config, 1);
        Self {
            player: Player::new(PLAYER_SPAWN, config.lives),
            maze,
            ghosts,
            effects: Effects::default(),
            timers: Timers::default(),
            state: Default::default(),
            level: 1,
            score: 0,
            dots_remaining,
            ghosts_eaten: 0,
            power_mode: false,
            clock_ms: 0.0,
            player_name: String::new(),
            high_score: HighScore::default(),
            rng: SmallRng::seed_from_u64(seed),
            audio: Box::new(Silent),
            store: Box::new(MemoryStore::default()),
            config,
        }
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    /// Attaches a store and reads the current record from it.
    pub fn with_store(mut self, store: impl HighScoreStore + 'static) -> Self {
        self.store = Box::new(store);
        self.high_score = match self.store.load() {
            Ok(high_score) => high_score.unwrap_or_default(),
            Err(err) => {
                log::warn!("Cannot load high score, starting from zero: {err}");
                HighScore::default()
            }
        };
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.player.lives
    }

    pub fn dots_remaining(&self) -> usize {
        self.dots_remaining
    }

    pub fn ghosts_eaten(&self) -> u32 {
        self.ghosts_eaten
    }

    pub fn is_power_mode(&self) -> bool {
        self.power_mode
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn high_score(&self) -> &HighScore {
        &self.high_score
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }

    /// Another tab or window changed the stored record.
    pub fn update_high_score(&mut self, high_score: HighScore) {
        self.high_score = high_score;
    }

    /// Buffers a turn. Only accepted while playing.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        self.player.steer(direction);
        true
    }

    /// Space/enter: start, pause, resume or restart depending on the state.
    pub fn primary_action(&mut self) -> ActionOutcome {
        use GameState::*;
        match self.state {
            Ready => {
                self.start_playing();
                ActionOutcome::Started
            }
            Paused if self.timers.death_reset.is_some() => ActionOutcome::Ignored,
            Paused => {
                self.start_playing();
                ActionOutcome::Resumed
            }
            Playing => {
                self.set_state(Paused);
                self.timers.cancel_cycle();
                ActionOutcome::Paused
            }
            GameOver => {
                self.reset_game();
                ActionOutcome::Restarted
            }
            Win => ActionOutcome::Ignored,
        }
    }

    pub fn tick(&mut self, delta_ms: f64) -> TickOutcome {
        let delta_ms = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, self.config.max_tick_ms)
        } else {
            0.0
        };
        self.clock_ms += delta_ms;

        if tick_slot(&mut self.timers.level_advance, delta_ms) {
            self.advance_level();
        }
        if tick_slot(&mut self.timers.death_reset, delta_ms) {
            self.reset_after_death();
        }
        self.effects.prune(self.clock_ms);

        if !self.state.is_playing() {
            return TickOutcome::Idle;
        }
        self.tick_playing(delta_ms)
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            grid: &self.maze,
            player: &self.player,
            ghosts: &self.ghosts,
            effects: &self.effects,
            state: self.state,
            score: self.score,
            level: self.level,
            lives: self.player.lives,
            dots_remaining: self.dots_remaining,
            power_mode: self.power_mode,
            high_score: &self.high_score,
            clock_ms: self.clock_ms,
        }
    }

    fn tick_playing(&mut self, delta_ms: f64) -> TickOutcome {
        if tick_slot(&mut self.timers.cycle, delta_ms) {
            log::debug!("Ghosts switch between chase and scatter");
            for ghost in &mut self.ghosts {
                ghost.toggle_mode();
            }
        }
        if tick_slot(&mut self.timers.power, delta_ms) {
            self.end_power_mode();
        }

        let mut outcome = self.move_player(delta_ms);
        if self.dots_remaining == 0 {
            self.clear_level();
            return outcome | TickOutcome::LevelCleared;
        }

        outcome = outcome | self.move_ghosts(delta_ms);
        outcome | self.resolve_collisions()
    }

    fn move_player(&mut self, delta_ms: f64) -> TickOutcome {
        match self.player.advance(&self.maze, delta_ms, self.config.player_cell_ms) {
            Step::Idle => TickOutcome::Idle,
            Step::Started(_) | Step::InTransit => TickOutcome::Moved,
            Step::Arrived(cell) => self.consume_at(cell),
        }
    }

    fn consume_at(&mut self, pos: GridPosition) -> TickOutcome {
        let Some(eaten) = self.maze.consume(pos) else {
            return TickOutcome::Moved;
        };
        log::trace!("Ate {eaten:?} at {pos:?}");

        let points = eaten.points();
        self.score = self.score.saturating_add(points);
        self.dots_remaining = self.dots_remaining.saturating_sub(1);
        self.add_effect(EffectKind::Score, pos, Some(points));
        self.audio.play(Cue::DotEaten);

        if eaten == Cell::PowerPellet {
            self.add_effect(EffectKind::PowerPellet, pos, None);
            self.audio.play(Cue::PowerPellet);
            self.start_power_mode();
        }
        TickOutcome::Ate
    }

    fn move_ghosts(&mut self, delta_ms: f64) -> TickOutcome {
        let pursuit = Pursuit {
            player: self.player.position(),
            heading: self.player.heading(),
        };

        let mut outcome = TickOutcome::Idle;
        for ghost in &mut self.ghosts {
            if ghost.update(&self.maze, &pursuit, &mut self.rng, delta_ms) != Step::Idle {
                outcome = TickOutcome::Moved;
            }
        }
        outcome
    }

    fn resolve_collisions(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::Idle;
        for index in find_contacts(&self.player.motion, &self.ghosts, &self.maze) {
            if self.ghosts[index].is_frightened() {
                self.eat_ghost(index);
                outcome = outcome | TickOutcome::GhostEaten;
            } else {
                return outcome | self.lose_life();
            }
        }
        outcome
    }

    fn eat_ghost(&mut self, index: usize) {
        self.ghosts_eaten += 1;
        let bonus = ghost_bonus(self.ghosts_eaten);
        self.score = self.score.saturating_add(bonus);

        let ghost = &mut self.ghosts[index];
        let position = ghost.motion.position;
        ghost.respawn(self.level, &self.config);
        log::debug!("Ate {:?} for {bonus} points", ghost.kind);

        self.add_effect(EffectKind::GhostEaten, position, Some(bonus));
        self.audio.play(Cue::GhostEaten);
    }

    fn lose_life(&mut self) -> TickOutcome {
        self.add_effect(EffectKind::Death, self.player.position(), None);
        self.audio.play(Cue::Death);

        self.player.lose_life();
        if self.player.is_out_of_lives() {
            self.end_game();
            return TickOutcome::GameOver;
        }

        self.set_state(GameState::Paused);
        self.timers.cancel_cycle();
        self.timers.death_reset = Some(Timer::once(self.config.death_reset_delay_ms));
        TickOutcome::LifeLost
    }

    fn end_game(&mut self) {
        self.set_state(GameState::GameOver);
        self.timers.cancel_all();

        if self.score > self.high_score.score {
            self.high_score = HighScore {
                score: self.score,
                player_name: self.player_name.clone(),
            };
            if let Err(err) = self.store.save(&self.high_score) {
                log::warn!("Cannot save high score: {err}");
            }
        }
    }

    fn clear_level(&mut self) {
        self.set_state(GameState::Win);
        self.timers.cancel_cycle();
        self.timers.level_advance = Some(Timer::once(self.config.level_advance_delay_ms));
        self.audio.play(Cue::LevelComplete);
    }

    fn advance_level(&mut self) {
        self.level += 1;
        self.maze = Maze::classic();
        self.dots_remaining = self.maze.count_dots();
        self.player.reset_position(PLAYER_SPAWN);
        self.ghosts = spawn_ghosts(&self.config, self.level);
        self.power_mode = false;
        self.ghosts_eaten = 0;
        self.timers.power = None;
        self.effects.clear();
        self.set_state(GameState::Ready);
    }

    fn reset_after_death(&mut self) {
        if self.power_mode {
            self.end_power_mode();
        }
        self.player.reset_position(PLAYER_SPAWN);
        for ghost in &mut self.ghosts {
            ghost.return_to_spawn();
        }
        self.set_state(GameState::Ready);
    }

    fn reset_game(&mut self) {
        self.timers.cancel_all();
        self.level = 1;
        self.score = 0;
        self.maze = Maze::classic();
        self.dots_remaining = self.maze.count_dots();
        self.player = Player::new(PLAYER_SPAWN, self.config.lives);
        self.ghosts = spawn_ghosts(&self.config, self.level);
        self.effects.clear();
        self.power_mode = false;
        self.ghosts_eaten = 0;
        self.set_state(GameState::Ready);
    }

    fn start_playing(&mut self) {
        self.set_state(GameState::Playing);
        self.audio.play(Cue::Start);
        self.timers.start_cycle(self.config.ghost_cycle_ms);
    }

    fn start_power_mode(&mut self) {
        self.power_mode = true;
        self.ghosts_eaten = 0;
        for ghost in &mut self.ghosts {
            ghost.frighten(&self.config);
        }
        self.timers.power = Some(Timer::once(self.config.power_duration_ms));
    }

    fn end_power_mode(&mut self) {
        self.power_mode = false;
        self.timers.power = None;
        self.audio.stop(Cue::PowerPellet);
        for ghost in &mut self.ghosts {
            ghost.calm(self.level, &self.config);
        }
    }

    fn add_effect(&mut self, kind: EffectKind, position: GridPosition, value: Option<u32>) {
        self.effects.push(VisualEffect {
            kind,
            position,
            value,
            created_at: self.clock_ms,
            duration_ms: self.config.effect_duration_ms,
        });
    }

    fn set_state(&mut self, state: GameState) {
        if self.state != state {
            log::debug!("Game state {:?} -> {state:?}", self.state);
        }
        self.state = state;
    }
}

impl fmt::Debug for PlayEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayEngine")
            .field("state", &self.state)
            .field("level", &self.level)
            .field("score", &self.score)
            .field("lives", &self.player.lives)
            .field("dots_remaining", &self.dots_remaining)
            .field("power_mode", &self.power_mode)
            .field("clock_ms", &self.clock_ms)
            .finish_non_exhaustive()
    }
}

fn spawn_ghosts(config: &GameConfig, level: u32) -> Vec<Ghost> {
    config
        .roster
        .iter()
        .map(|&kind| Ghost::spawn(kind, level, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;

    #[derive(Clone, Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<(bool, Cue)>>>,
    }

    impl Recorder {
        fn played(&self, cue: Cue) -> bool {
            self.events.borrow().contains(&(true, cue))
        }

        fn stopped(&self, cue: Cue) -> bool {
            self.events.borrow().contains(&(false, cue))
        }
    }

    impl AudioSink for Recorder {
        fn play(&mut self, cue: Cue) {
            self.events.borrow_mut().push((true, cue));
        }

        fn stop(&mut self, cue: Cue) {
            self.events.borrow_mut().push((false, cue));
        }
    }

    #[derive(Clone, Default)]
    struct SharedStore {
        inner: Rc<RefCell<MemoryStore>>,
    }

    impl HighScoreStore for SharedStore {
        fn load(&mut self) -> core::result::Result<Option<HighScore>, StoreError> {
            self.inner.borrow_mut().load()
        }

        fn save(&mut self, high_score: &HighScore) -> core::result::Result<(), StoreError> {
            self.inner.borrow_mut().save(high_score)
        }
    }

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load(&mut self) -> core::result::Result<Option<HighScore>, StoreError> {
            Err(StoreError::Corrupt("not a number".into()))
        }

        fn save(&mut self, _high_score: &HighScore) -> core::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }
    }

    fn playing(config: GameConfig) -> PlayEngine {
        let mut engine = PlayEngine::new(config, 42);
        assert_eq!(engine.primary_action(), ActionOutcome::Started);
        engine
    }

    fn run(engine: &mut PlayEngine, ticks: usize) {
        for _ in 0..ticks {
            engine.tick(50.0);
        }
    }

    fn place_ghost(engine: &mut PlayEngine, index: usize, pos: GridPosition) {
        engine.ghosts[index].motion = Motion::settled(pos, Direction::Left);
        engine.ghosts[index].leaving_house = false;
    }

    #[test]
    fn new_game_is_ready_with_full_maze() {
        let engine = PlayEngine::new(GameConfig::default(), 0);

        assert_eq!(engine.state(), GameState::Ready);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.lives(), 3);
        assert_eq!(engine.dots_remaining(), 244);
        assert_eq!(engine.ghosts().len(), 5);
        assert!(engine.ghosts().iter().all(|ghost| ghost.mode == GhostMode::Scatter));
    }

    #[test]
    fn primary_action_walks_the_lifecycle() {
        let recorder = Recorder::default();
        let mut engine = PlayEngine::new(GameConfig::default(), 0).with_audio(recorder.clone());

        assert!(!engine.set_direction(Direction::Left));
        assert_eq!(engine.primary_action(), ActionOutcome::Started);
        assert!(recorder.played(Cue::Start));
        assert!(engine.timers.cycle.is_some());
        assert!(engine.set_direction(Direction::Left));

        assert_eq!(engine.primary_action(), ActionOutcome::Paused);
        assert_eq!(engine.state(), GameState::Paused);
        assert!(engine.timers.cycle.is_none());

        assert_eq!(engine.primary_action(), ActionOutcome::Resumed);
        assert_eq!(engine.state(), GameState::Playing);
        assert!(engine.timers.cycle.is_some());
    }

    #[test]
    fn paused_game_does_not_move() {
        let mut engine = playing(GameConfig::default());
        engine.set_direction(Direction::Left);
        engine.primary_action();

        for _ in 0..20 {
            assert_eq!(engine.tick(50.0), TickOutcome::Idle);
        }
        assert_eq!(engine.player().position(), PLAYER_SPAWN);
        assert!(!engine.player().motion.is_moving);
    }

    #[test]
    fn tick_clamps_delta() {
        let mut engine = PlayEngine::new(GameConfig::default(), 0);

        engine.tick(10_000.0);
        assert_eq!(engine.clock_ms(), 50.0);
        engine.tick(-3.0);
        engine.tick(f64::NAN);
        assert_eq!(engine.clock_ms(), 50.0);
    }

    #[test]
    fn eating_a_dot_twice_counts_once() {
        let recorder = Recorder::default();
        let mut engine = playing(GameConfig::default()).with_audio(recorder.clone());
        let dot = GridPosition::new(23, 12);

        assert_eq!(engine.consume_at(dot), TickOutcome::Ate);
        assert_eq!(engine.consume_at(dot), TickOutcome::Moved);

        assert_eq!(engine.score(), 10);
        assert_eq!(engine.dots_remaining(), 243);
        assert_eq!(engine.effects().len(), 1);
        assert!(recorder.played(Cue::DotEaten));
    }

    #[test]
    fn walking_onto_a_dot_scores_it() {
        let mut engine = playing(GameConfig::default());
        engine.set_direction(Direction::Left);

        let mut outcome = TickOutcome::Idle;
        for _ in 0..5 {
            outcome = outcome | engine.tick(50.0);
        }

        assert_eq!(outcome, TickOutcome::Ate);
        assert_eq!(engine.player().position(), GridPosition::new(23, 12));
        assert_eq!(engine.score(), 10);
        assert_eq!(engine.maze().get_cell(GridPosition::new(23, 12)), Some(Cell::Empty));
    }

    #[test]
    fn power_pellet_frightens_until_expiry() {
        let recorder = Recorder::default();
        let config = GameConfig {
            power_duration_ms: 500.0,
            ..Default::default()
        };
        let mut engine = playing(config).with_audio(recorder.clone());

        engine.consume_at(GridPosition::new(3, 1));

        assert_eq!(engine.score(), 50);
        assert!(engine.is_power_mode());
        assert!(recorder.played(Cue::PowerPellet));
        assert!(engine.ghosts().iter().all(|ghost| ghost.is_frightened() && ghost.speed == 400.0));

        run(&mut engine, 9);
        assert!(engine.is_power_mode());

        run(&mut engine, 1);
        assert!(!engine.is_power_mode());
        assert!(recorder.stopped(Cue::PowerPellet));
        for ghost in engine.ghosts() {
            assert_eq!(ghost.mode, GhostMode::Chase);
            assert_eq!(ghost.speed, Ghost::cruising_speed(ghost.kind, 1, engine.config()));
        }
    }

    #[test]
    fn second_pellet_restarts_power_timer() {
        let config = GameConfig {
            power_duration_ms: 500.0,
            ..Default::default()
        };
        let mut engine = playing(config);

        engine.consume_at(GridPosition::new(3, 1));
        run(&mut engine, 8);
        engine.consume_at(GridPosition::new(3, 26));
        run(&mut engine, 8);

        assert!(engine.is_power_mode());
        assert_eq!(engine.timers.power.map(|timer| timer.remaining_ms()), Some(100.0));
    }

    #[test]
    fn power_timer_freezes_while_paused() {
        let config = GameConfig {
            power_duration_ms: 500.0,
            ..Default::default()
        };
        let mut engine = playing(config);
        engine.consume_at(GridPosition::new(3, 1));

        engine.primary_action();
        run(&mut engine, 40);
        assert!(engine.is_power_mode());

        engine.primary_action();
        run(&mut engine, 10);
        assert!(!engine.is_power_mode());
    }

    #[test]
    fn four_ghosts_in_one_power_window_score_3000() {
        let recorder = Recorder::default();
        let mut engine = playing(GameConfig::default()).with_audio(recorder.clone());
        engine.start_power_mode();
        for index in 0..4 {
            place_ghost(&mut engine, index, PLAYER_SPAWN);
        }

        let outcome = engine.tick(16.0);

        assert_eq!(outcome, TickOutcome::GhostEaten);
        assert_eq!(engine.score(), 3000);
        assert_eq!(engine.ghosts_eaten(), 4);
        assert!(recorder.played(Cue::GhostEaten));
        for ghost in &engine.ghosts()[..4] {
            assert_eq!(ghost.motion.position, ghost.kind.home());
            assert_eq!(ghost.mode, GhostMode::Chase);
            assert!((ghost.speed - 250.0 * 0.95).abs() < 1e-9);
        }
        assert!(engine.ghosts()[4].is_frightened());
    }

    #[test]
    fn losing_a_spare_life_pauses_then_resets() {
        let recorder = Recorder::default();
        let mut engine = playing(GameConfig::default()).with_audio(recorder.clone());
        place_ghost(&mut engine, 0, PLAYER_SPAWN);

        assert_eq!(engine.tick(16.0), TickOutcome::LifeLost);
        assert_eq!(engine.state(), GameState::Paused);
        assert_eq!(engine.lives(), 2);
        assert!(recorder.played(Cue::Death));
        assert!(engine.timers.cycle.is_none());
        assert_eq!(engine.primary_action(), ActionOutcome::Ignored);

        run(&mut engine, 19);
        assert_eq!(engine.state(), GameState::Paused);
        run(&mut engine, 1);

        assert_eq!(engine.state(), GameState::Ready);
        assert_eq!(engine.player().position(), PLAYER_SPAWN);
        for ghost in engine.ghosts() {
            assert_eq!(ghost.motion.position, ghost.kind.home());
            assert_eq!(ghost.mode, GhostMode::Scatter);
            assert_eq!(ghost.leaving_house, ghost.kind.starts_in_house());
        }
    }

    #[test]
    fn every_ghost_gets_out_of_the_house_during_play() {
        let config = GameConfig {
            power_duration_ms: 60_000.0,
            ..Default::default()
        };
        let mut engine = playing(config);
        engine.start_power_mode();
        let mut outside = [false; 5];

        for _ in 0..200 {
            engine.tick(50.0);
            for (seen, ghost) in outside.iter_mut().zip(engine.ghosts()) {
                *seen |= ghost.motion.position.row <= HOUSE_EXIT.row;
            }
        }

        assert_eq!(outside, [true; 5]);
    }

    #[test]
    fn death_reset_cancels_power_mode() {
        let mut engine = playing(GameConfig::default());
        engine.start_power_mode();
        engine.ghosts[0].calm(1, &GameConfig::default());
        place_ghost(&mut engine, 0, PLAYER_SPAWN);

        assert_eq!(engine.tick(16.0), TickOutcome::LifeLost);
        run(&mut engine, 20);

        assert!(!engine.is_power_mode());
        assert!(engine.timers.power.is_none());
        assert!(engine.ghosts().iter().all(|ghost| !ghost.is_frightened()));
    }

    #[test]
    fn losing_the_last_life_ends_the_game() {
        let config = GameConfig {
            lives: 1,
            ..Default::default()
        };
        let mut engine = playing(config);
        place_ghost(&mut engine, 2, PLAYER_SPAWN);

        assert_eq!(engine.tick(16.0), TickOutcome::GameOver);
        assert_eq!(engine.state(), GameState::GameOver);
        assert_eq!(engine.lives(), 0);
        assert_eq!(engine.timers, Timers::default());

        run(&mut engine, 40);
        assert_eq!(engine.state(), GameState::GameOver);
    }

    #[test]
    fn first_fatal_contact_stops_resolution() {
        let mut engine = playing(GameConfig::default());
        engine.start_power_mode();
        engine.ghosts[1].calm(1, &GameConfig::default());
        for index in 0..3 {
            place_ghost(&mut engine, index, PLAYER_SPAWN);
        }

        assert_eq!(engine.tick(16.0), TickOutcome::LifeLost);
        assert_eq!(engine.score(), 200);
        assert_eq!(engine.ghosts_eaten(), 1);
        assert!(engine.ghosts()[2].is_frightened());
    }

    #[test]
    fn high_score_is_saved_only_when_beaten() {
        let store = SharedStore::default();
        store.inner.borrow_mut().high_score = Some(HighScore {
            score: 500,
            player_name: "old".into(),
        });
        let config = GameConfig {
            lives: 1,
            ..Default::default()
        };

        let mut engine = playing(config.clone()).with_store(store.clone());
        engine.set_player_name("new");
        engine.score = 500;
        place_ghost(&mut engine, 0, PLAYER_SPAWN);
        engine.tick(16.0);
        assert_eq!(store.inner.borrow().high_score.as_ref().map(|hs| hs.player_name.as_str()), Some("old"));

        let mut engine = playing(config).with_store(store.clone());
        engine.set_player_name("new");
        engine.score = 501;
        place_ghost(&mut engine, 0, PLAYER_SPAWN);
        engine.tick(16.0);

        let saved = store.inner.borrow().high_score.clone();
        assert_eq!(
            saved,
            Some(HighScore {
                score: 501,
                player_name: "new".into(),
            })
        );
        assert_eq!(engine.high_score().score, 501);
    }

    #[test]
    fn broken_store_is_not_fatal() {
        let config = GameConfig {
            lives: 1,
            ..Default::default()
        };
        let mut engine = playing(config).with_store(BrokenStore);
        assert_eq!(engine.high_score().score, 0);

        engine.score = 90;
        place_ghost(&mut engine, 0, PLAYER_SPAWN);

        assert_eq!(engine.tick(16.0), TickOutcome::GameOver);
        assert_eq!(engine.high_score().score, 90);
    }

    #[test]
    fn restart_after_game_over_resets_everything() {
        let config = GameConfig {
            lives: 1,
            ..Default::default()
        };
        let mut engine = playing(config);
        engine.consume_at(GridPosition::new(1, 1));
        place_ghost(&mut engine, 0, PLAYER_SPAWN);
        engine.tick(16.0);

        assert_eq!(engine.primary_action(), ActionOutcome::Restarted);

        assert_eq!(engine.state(), GameState::Ready);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.lives(), 1);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.dots_remaining(), 244);
        assert_eq!(engine.maze().get_cell(GridPosition::new(1, 1)), Some(Cell::Dot));
        assert!(engine.effects().is_empty());
    }

    #[test]
    fn clearing_the_maze_wins_then_advances_after_delay() {
        let recorder = Recorder::default();
        let mut engine = playing(GameConfig::default()).with_audio(recorder.clone());
        let last = GridPosition::new(23, 12);
        let others: Vec<GridPosition> = engine
            .maze
            .iter_cells()
            .filter(|&(pos, cell)| cell.is_edible() && pos != last)
            .map(|(pos, _)| pos)
            .collect();
        for pos in others {
            engine.maze.consume(pos);
        }
        engine.dots_remaining = engine.maze.count_dots();
        assert_eq!(engine.dots_remaining(), 1);
        engine.set_direction(Direction::Left);

        let mut outcome = TickOutcome::Idle;
        while engine.state() == GameState::Playing {
            outcome = engine.tick(50.0);
        }

        assert_eq!(outcome, TickOutcome::LevelCleared);
        assert_eq!(engine.state(), GameState::Win);
        assert_eq!(engine.dots_remaining(), 0);
        assert!(recorder.played(Cue::LevelComplete));
        assert_eq!(engine.primary_action(), ActionOutcome::Ignored);

        run(&mut engine, 59);
        assert_eq!(engine.state(), GameState::Win);
        assert_eq!(engine.level(), 1);

        run(&mut engine, 1);
        assert_eq!(engine.state(), GameState::Ready);
        assert_eq!(engine.level(), 2);
        assert_eq!(engine.dots_remaining(), 244);
        assert_eq!(engine.lives(), 3);
        assert_eq!(engine.player().position(), PLAYER_SPAWN);
        let blinky = &engine.ghosts()[0];
        assert!((blinky.speed - 250.0 * 0.9).abs() < 1e-9);
    }

    #[test]
    fn ghost_modes_cycle_only_while_playing() {
        let config = GameConfig {
            ghost_cycle_ms: 100.0,
            ..Default::default()
        };
        let mut engine = playing(config);

        run(&mut engine, 2);
        assert!(engine.ghosts().iter().all(|ghost| ghost.mode == GhostMode::Chase));

        engine.primary_action();
        run(&mut engine, 10);
        assert!(engine.ghosts().iter().all(|ghost| ghost.mode == GhostMode::Chase));

        engine.primary_action();
        run(&mut engine, 2);
        assert!(engine.ghosts().iter().all(|ghost| ghost.mode == GhostMode::Scatter));
    }

    #[test]
    fn effects_expire_with_the_session_clock() {
        let mut engine = playing(GameConfig::default());
        engine.consume_at(GridPosition::new(1, 1));
        assert_eq!(engine.effects().len(), 1);

        engine.primary_action();
        run(&mut engine, 19);
        assert_eq!(engine.effects().len(), 1);
        run(&mut engine, 1);
        assert!(engine.effects().is_empty());
    }

    #[test]
    fn same_seed_same_game() {
        let mut a = playing(GameConfig::default());
        let mut b = playing(GameConfig::default());
        a.start_power_mode();
        b.start_power_mode();

        for _ in 0..100 {
            a.tick(50.0);
            b.tick(50.0);
        }

        assert_eq!(
            serde_json::to_string(&a.frame()).unwrap(),
            serde_json::to_string(&b.frame()).unwrap()
        );
    }

    #[test]
    fn frame_serializes_for_the_renderer() {
        let engine = PlayEngine::new(GameConfig::default(), 0);

        let value = serde_json::to_value(engine.frame()).unwrap();

        assert_eq!(value["state"], "ready");
        assert_eq!(value["grid"].as_array().map(|rows| rows.len()), Some(31));
        assert_eq!(value["ghosts"].as_array().map(|ghosts| ghosts.len()), Some(5));
        assert_eq!(value["player"]["motion"]["position"]["row"], 23);
        assert_eq!(value["highScore"]["score"], 0);
        assert_eq!(value["lives"], 3);
        assert_eq!(serde_json::to_value(GameState::GameOver).unwrap(), "game-over");
    }

    #[test]
    fn outcomes_combine_by_precedence() {
        use TickOutcome::*;

        assert_eq!(Idle | Moved, Moved);
        assert_eq!(Ate | Moved, Ate);
        assert_eq!(Ate | GhostEaten, GhostEaten);
        assert_eq!(LevelCleared | GhostEaten, LevelCleared);
        assert_eq!(LifeLost | LevelCleared, LifeLost);
        assert_eq!(GameOver | LifeLost, GameOver);
        assert_eq!(vec![Moved, Idle, Ate].into_iter().fold(Idle, BitOr::bitor), Ate);
    }
}
