//! Platform abstraction layer
//!
//! The simulation talks to its surroundings only through [`Host`]:
//! - Screens (start, end-of-run summary)
//! - Message overlay
//! - Name prompt
//! - Sounds (best effort, never fails)
//! - Background styling

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebHost;

/// Page background variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    None,
    Level(usize),
    Transition,
    Final,
}

/// UI collaborator driven by the simulation
pub trait Host {
    /// Show a message for roughly `duration_ms`
    fn display_message(&mut self, text: &str, duration_ms: f64);
    fn clear_message(&mut self);
    fn show_start_screen(&mut self);
    fn hide_start_screen(&mut self);
    fn show_end_screen(&mut self, name: &str, text: &str);
    fn hide_end_screen(&mut self);
    /// Ask for the player's name; implementations return `default` when no answer is given
    fn prompt_for_name(&mut self, default: &str) -> String;
    fn play_interaction_sound(&mut self);
    fn play_level_up_sound(&mut self);
    fn play_finale_sound(&mut self);
    fn set_background(&mut self, background: Background);
}

/// Everything a [`RecordingHost`] was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Message(String),
    ClearMessage,
    ShowStart,
    HideStart,
    ShowEnd { name: String, text: String },
    HideEnd,
    Prompt,
    InteractionSound,
    LevelUpSound,
    FinaleSound,
    Background(Background),
}

/// Host that records calls, used by tests and the native demo
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
    /// Answer given to name prompts (`None` accepts the default)
    pub name: Option<String>,
    /// Message currently on screen
    pub message: Option<String>,
    pub end_screen: bool,
    pub start_screen: bool,
    pub background: Option<Background>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn count(&self, predicate: impl Fn(&HostEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Message(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Host for RecordingHost {
    fn display_message(&mut self, text: &str, _duration_ms: f64) {
        self.message = Some(text.to_string());
        self.events.push(HostEvent::Message(text.to_string()));
    }

    fn clear_message(&mut self) {
        self.message = None;
        self.events.push(HostEvent::ClearMessage);
    }

    fn show_start_screen(&mut self) {
        self.start_screen = true;
        self.events.push(HostEvent::ShowStart);
    }

    fn hide_start_screen(&mut self) {
        self.start_screen = false;
        self.events.push(HostEvent::HideStart);
    }

    fn show_end_screen(&mut self, name: &str, text: &str) {
        self.end_screen = true;
        self.events.push(HostEvent::ShowEnd {
            name: name.to_string(),
            text: text.to_string(),
        });
    }

    fn hide_end_screen(&mut self) {
        self.end_screen = false;
        self.events.push(HostEvent::HideEnd);
    }

    fn prompt_for_name(&mut self, default: &str) -> String {
        self.events.push(HostEvent::Prompt);
        self.name.clone().unwrap_or_else(|| default.to_string())
    }

    fn play_interaction_sound(&mut self) {
        self.events.push(HostEvent::InteractionSound);
    }

    fn play_level_up_sound(&mut self) {
        self.events.push(HostEvent::LevelUpSound);
    }

    fn play_finale_sound(&mut self) {
        self.events.push(HostEvent::FinaleSound);
    }

    fn set_background(&mut self, background: Background) {
        self.background = Some(background);
        self.events.push(HostEvent::Background(background));
    }
}
