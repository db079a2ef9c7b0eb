//! Level progression state machine
//!
//! Idle → Active → Transitioning(LevelUp) → Active → … → Active (last level)
//! → Transitioning(Finale) → Ended → (restart) Idle
//!
//! The interaction counter is cumulative over the run and compared against
//! each level's cumulative threshold.

use super::Stage;
use super::levels::{LEVELS, last_level_index, level};
use super::schedule::{Deferred, Schedule};
use crate::consts::*;
use crate::platform::{Background, Host};
use crate::settings::Settings;

/// Kind of locked interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Holding before entering the next level
    LevelUp,
    /// Final burst playing before the summary
    Finale,
}

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Start screen, nothing running
    Idle,
    /// Normal play
    Active,
    /// Input locked while a level-up or the finale plays out
    Transitioning(Transition),
    /// Run over (summary shown, or halted after a render failure)
    Ended,
}

/// Result of a threshold check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Stay,
    LevelUp,
    Finale,
}

/// End-of-run summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub name: String,
    pub interactions: u32,
    pub levels_completed: usize,
}

impl RunSummary {
    pub fn text(&self) -> String {
        format!(
            "Completaste {} niveles con {} pasos. Tu camino ya brilla entre las estrellas ✨",
            self.levels_completed, self.interactions
        )
    }
}

/// Tracks interactions and decides when to level up or end the run
#[derive(Debug, Clone)]
pub struct ProgressionController {
    phase: Phase,
    level: usize,
    interactions: u32,
    schedule: Schedule,
    /// Next message to show from the current level's pool
    message_cursor: usize,
    /// Id of the last message handed out
    message_id: u32,
    /// Id of the message currently on screen
    showing_message: Option<u32>,
    last_message_at: Option<f64>,
    messages_enabled: bool,
    default_name: String,
    summary: Option<RunSummary>,
}

impl ProgressionController {
    pub fn new(settings: &Settings) -> Self {
        Self {
            phase: Phase::Idle,
            level: 0,
            interactions: 0,
            schedule: Schedule::new(),
            message_cursor: 0,
            message_id: 0,
            showing_message: None,
            last_message_at: None,
            messages_enabled: settings.messages,
            default_name: settings.default_name.clone(),
            summary: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn interactions(&self) -> u32 {
        self.interactions
    }

    /// Simulation considered running (false once the finale starts)
    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            Phase::Active | Phase::Transitioning(Transition::LevelUp)
        )
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning(_))
    }

    /// Only normal play reacts to input
    pub fn accepts_input(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Frames need to be driven (play, level-up hold, finale burst)
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Active | Phase::Transitioning(_))
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Message id currently on screen, if any
    pub fn showing_message(&self) -> Option<u32> {
        self.showing_message
    }

    fn reset_run(&mut self, stage: &mut Stage<'_>) {
        self.schedule.reset();
        stage.field.clear();
        self.level = 0;
        self.interactions = 0;
        self.message_cursor = 0;
        self.showing_message = None;
        self.last_message_at = None;
        self.summary = None;
    }

    /// Begin a run from Idle or Ended. Returns false when already running.
    pub fn start(&mut self, stage: &mut Stage<'_>) -> bool {
        if !matches!(self.phase, Phase::Idle | Phase::Ended) {
            log::warn!("start() ignored in phase {:?}", self.phase);
            return false;
        }
        self.reset_run(stage);
        self.phase = Phase::Active;
        stage.host.hide_end_screen();
        stage.host.hide_start_screen();
        stage.host.set_background(Background::Level(0));
        log::info!("Run started at level 1 ({})", LEVELS[0].name);
        true
    }

    /// Back to the start screen from any phase
    pub fn restart(&mut self, stage: &mut Stage<'_>) {
        self.reset_run(stage);
        self.phase = Phase::Idle;
        stage.host.clear_message();
        stage.host.hide_end_screen();
        stage.host.show_start_screen();
        stage.host.set_background(Background::None);
        log::info!("Run reset");
    }

    /// Stop after an unrecoverable render failure. The start screen comes back
    /// so the page keeps a way to begin a new run.
    pub fn halt(&mut self, host: &mut dyn Host) {
        self.schedule.reset();
        if self.showing_message.take().is_some() {
            host.clear_message();
        }
        self.phase = Phase::Ended;
        host.show_start_screen();
        log::warn!("Run halted at level {}", self.level + 1);
    }

    /// Count one tap/click. Every 40th interaction (1, 41, 81, ...) shows a message.
    pub fn record_discrete_interaction(&mut self, host: &mut dyn Host) -> u32 {
        if !self.accepts_input() {
            log::trace!("Interaction ignored in phase {:?}", self.phase);
            return self.interactions;
        }
        self.interactions += 1;
        if self.interactions % MESSAGE_INTERVAL == 1 {
            self.show_encouragement(host);
        }
        self.interactions
    }

    fn show_encouragement(&mut self, host: &mut dyn Host) {
        if !self.messages_enabled {
            return;
        }
        let now = self.schedule.now();
        if self
            .last_message_at
            .is_some_and(|t| now - t < MESSAGE_COOLDOWN_MS)
        {
            log::debug!("Message skipped, cooldown active");
            return;
        }
        let pool = level(self.level).messages;
        let text = pool[self.message_cursor % pool.len()];
        self.message_cursor = (self.message_cursor + 1) % pool.len();
        self.show_message(text, host);
    }

    fn show_message(&mut self, text: &str, host: &mut dyn Host) {
        self.message_id += 1;
        let id = self.message_id;
        self.showing_message = Some(id);
        self.last_message_at = Some(self.schedule.now());
        host.display_message(text, MESSAGE_DURATION_MS);
        self.schedule.after(MESSAGE_DURATION_MS, Deferred::HideMessage { id });
    }

    fn clear_message(&mut self, host: &mut dyn Host) {
        self.showing_message = None;
        host.clear_message();
    }

    /// Compare the counter with the current level's threshold
    pub fn check_advance(&mut self, stage: &mut Stage<'_>) -> Advance {
        if self.phase != Phase::Active {
            return Advance::Stay;
        }
        if self.interactions < level(self.level).threshold {
            return Advance::Stay;
        }

        if self.level < last_level_index() {
            self.phase = Phase::Transitioning(Transition::LevelUp);
            self.clear_message(stage.host);
            stage.host.set_background(Background::Transition);
            self.schedule.after(TRANSITION_DELAY_MS, Deferred::EnterNextLevel);
            log::info!(
                "Level {} complete after {} interactions",
                self.level + 1,
                self.interactions
            );
            Advance::LevelUp
        } else {
            self.begin_finale(stage);
            Advance::Finale
        }
    }

    fn begin_finale(&mut self, stage: &mut Stage<'_>) {
        self.phase = Phase::Transitioning(Transition::Finale);
        self.clear_message(stage.host);
        stage.host.set_background(Background::Final);
        let center = stage.bounds / 2.0;
        stage.field.burst(center, FINALE_BURST_COUNT, self.level, stage.rng);
        stage.host.play_finale_sound();
        self.schedule.after(FINALE_DELAY_MS, Deferred::RevealSummary);
        log::info!("Final level complete, finale started");
    }

    /// Advance the logical clock by one frame and apply due actions
    pub fn advance_clock(&mut self, elapsed_ms: f64, stage: &mut Stage<'_>) {
        for action in self.schedule.advance(elapsed_ms) {
            self.apply(action, stage);
        }
    }

    fn apply(&mut self, action: Deferred, stage: &mut Stage<'_>) {
        match action {
            Deferred::HideMessage { id } => {
                if self.showing_message == Some(id) {
                    self.clear_message(stage.host);
                } else {
                    log::trace!("Stale hide for message {}", id);
                }
            }
            Deferred::EnterNextLevel => {
                if self.phase != Phase::Transitioning(Transition::LevelUp) {
                    log::debug!("Stale level-up in phase {:?}", self.phase);
                    return;
                }
                self.level = (self.level + 1).min(last_level_index());
                self.message_cursor = 0;
                stage.field.clear();
                self.phase = Phase::Active;
                stage.host.set_background(Background::Level(self.level));
                stage.host.play_level_up_sound();
                let config = level(self.level);
                let welcome = format!("Bienvenido al nivel {}: {}", self.level + 1, config.name);
                self.show_message(&welcome, stage.host);
                log::info!("Entered level {} ({})", self.level + 1, config.name);
            }
            Deferred::RevealSummary => {
                if self.phase != Phase::Transitioning(Transition::Finale) {
                    log::debug!("Stale summary in phase {:?}", self.phase);
                    return;
                }
                self.phase = Phase::Ended;
                let answer = stage.host.prompt_for_name(&self.default_name);
                let name = match answer.trim() {
                    "" => self.default_name.clone(),
                    trimmed => trimmed.to_string(),
                };
                let summary = RunSummary {
                    name,
                    interactions: self.interactions,
                    levels_completed: self.level + 1,
                };
                stage.host.show_end_screen(&summary.name, &summary.text());
                log::info!(
                    "Run ended: {} with {} interactions",
                    summary.name,
                    summary.interactions
                );
                self.summary = Some(summary);
            }
        }
    }
}
