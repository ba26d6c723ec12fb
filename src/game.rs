//! Game controller
//!
//! Glues host input, frame callbacks and score persistence to a
//! [`GameState`]. The host calls [`Game::handle`] for every input event and
//! [`Game::frame`] once per display refresh.

use crate::highscores::{HighScores, MAX_HIGH_SCORES};
use crate::persistence::{PersistError, ScoreStore, normalize_name};
use crate::platform::{Debouncer, FrameClock, InputEvent};
use crate::renderer::Renderer;
use crate::sim::{GameEvent, GameOverReason, GamePhase, GameState, tick};
use crate::{Millis, Settings, Tuning, Viewport};

#[derive(Debug)]
pub struct Game {
    pub state: GameState,
    pub settings: Settings,
    pub high_scores: HighScores,
    resize: Debouncer<Viewport>,
    /// No frames run while a resize is settling
    halted: bool,
    clock: FrameClock,
}

impl Game {
    pub fn new(viewport: Viewport, seed: u64, settings: Settings, tuning: Tuning) -> Self {
        let resize = Debouncer::new(tuning.resize_quiet_ms);
        let mut game = Self {
            state: GameState::new(viewport, seed, tuning),
            settings: Settings::default(),
            high_scores: HighScores::new(),
            resize,
            halted: false,
            clock: FrameClock::new(),
        };
        game.apply_settings(settings);
        game
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Whether frames are held back by a pending resize
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Rolling frame rate of the host loop
    pub fn fps(&self) -> u32 {
        self.clock.fps()
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.state.explosion_particles = settings.explosion_particles();
        self.state.starfield = settings.starfield;
        log::debug!(
            "Settings applied: {} quality, {} particles per explosion",
            settings.quality.as_str(),
            self.state.explosion_particles
        );
        self.settings = settings;
    }

    /// Apply one input event
    pub fn handle(&mut self, event: InputEvent, now: Millis) {
        match event {
            InputEvent::PointerMoved(pos) => self.state.move_player(pos),
            InputEvent::Start => {
                self.start(now);
            }
            InputEvent::Focus => self.state.set_focus(true),
            InputEvent::Blur => self.state.set_focus(false),
            InputEvent::Resize(viewport) => {
                if !self.halted {
                    log::info!("Resize started, halting frames");
                }
                self.halted = true;
                self.resize.trigger(now, viewport);
            }
        }
    }

    /// Begin a run from the menu or the game-over screen
    pub fn start(&mut self, now: Millis) -> bool {
        if self.halted || self.state.phase == GamePhase::Playing {
            return false;
        }
        self.clock.reset();
        self.state.start(now);
        true
    }

    /// Leave the game-over screen
    pub fn return_to_menu(&mut self) {
        self.state.return_to_menu();
    }

    /// Run one frame. Returns the events it produced.
    pub fn frame(&mut self, now: Millis, renderer: &mut dyn Renderer) -> Vec<GameEvent> {
        if let Some(viewport) = self.resize.poll(now) {
            self.finish_resize(viewport);
        }
        if !self.halted {
            self.clock.tick(now);
            tick::frame(&mut self.state, now, renderer);
        }
        self.state.drain_events()
    }

    // The burst is over: rebuild for the new size and go back to the menu
    fn finish_resize(&mut self, viewport: Viewport) {
        if self.state.phase == GamePhase::Playing {
            self.state.end_game(GameOverReason::Resize);
        }
        self.state.set_viewport(viewport);
        self.state.return_to_menu();
        self.halted = false;
        log::info!("Resized to {}x{}", viewport.width, viewport.height);
    }

    /// Does this score earn a name prompt
    pub fn qualifies(&self, score: u64) -> bool {
        self.high_scores.qualifies(score)
    }

    /// Hand a finished run to the store and mirror it locally
    pub fn record_score(
        &mut self,
        name: &str,
        score: u64,
        store: &mut dyn ScoreStore,
    ) -> Result<usize, PersistError> {
        let name = normalize_name(name)?;
        if !self.qualifies(score) {
            return Err(PersistError::NotQualifying(score));
        }
        let rank = store.submit(&name, score)?;
        self.high_scores.add_score(name, score);
        Ok(rank)
    }

    /// Replace the local leaderboard with the store's
    pub fn load_high_scores(&mut self, store: &dyn ScoreStore) -> Result<(), PersistError> {
        self.high_scores.entries = store.top(MAX_HIGH_SCORES)?;
        log::info!("Loaded {} high scores", self.high_scores.len());
        Ok(())
    }
}
