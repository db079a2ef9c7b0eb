//! Browser host: DOM screens, message overlay, name prompt and Web Audio
//!
//! Every DOM lookup is optional. A page missing an element just loses that
//! piece of UI, the simulation keeps going.

use web_sys::{Document, Element, Window};

use super::{Background, Host};
use crate::audio::{AudioManager, SoundEffect};

const MESSAGE_BOX_ID: &str = "message-box";
const START_SCREEN_ID: &str = "start-screen";
const END_SCREEN_ID: &str = "end-screen";
const END_NAME_ID: &str = "end-name";
const END_TEXT_ID: &str = "end-text";

const HIDDEN_CLASS: &str = "hidden";
const VISIBLE_CLASS: &str = "visible";

pub struct WebHost {
    window: Window,
    document: Document,
    audio: AudioManager,
}

impl WebHost {
    /// None when running outside a page with a document
    pub fn new(volume: f32) -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let mut audio = AudioManager::new();
        audio.set_volume(volume);
        Some(Self {
            window,
            document,
            audio,
        })
    }

    fn element(&self, id: &str) -> Option<Element> {
        let el = self.document.get_element_by_id(id);
        if el.is_none() {
            log::debug!("#{} not found", id);
        }
        el
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(el) = self.element(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1(HIDDEN_CLASS)
            } else {
                classes.remove_1(HIDDEN_CLASS)
            };
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }
}

impl Host for WebHost {
    fn display_message(&mut self, text: &str, _duration_ms: f64) {
        // Hiding is driven by the simulation clock, not a DOM timer
        if let Some(el) = self.element(MESSAGE_BOX_ID) {
            el.set_text_content(Some(text));
            let _ = el.class_list().add_1(VISIBLE_CLASS);
        }
    }

    fn clear_message(&mut self) {
        if let Some(el) = self.element(MESSAGE_BOX_ID) {
            let _ = el.class_list().remove_1(VISIBLE_CLASS);
        }
    }

    fn show_start_screen(&mut self) {
        self.set_hidden(START_SCREEN_ID, false);
    }

    fn hide_start_screen(&mut self) {
        self.set_hidden(START_SCREEN_ID, true);
    }

    fn show_end_screen(&mut self, name: &str, text: &str) {
        self.set_text(END_NAME_ID, name);
        self.set_text(END_TEXT_ID, text);
        self.set_hidden(END_SCREEN_ID, false);
    }

    fn hide_end_screen(&mut self) {
        self.set_hidden(END_SCREEN_ID, true);
    }

    fn prompt_for_name(&mut self, default: &str) -> String {
        match self
            .window
            .prompt_with_message_and_default("¿Cómo te llamas, viajero?", default)
        {
            Ok(Some(answer)) => answer,
            Ok(None) => default.to_string(),
            Err(e) => {
                log::warn!("Name prompt failed: {:?}", e);
                default.to_string()
            }
        }
    }

    fn play_interaction_sound(&mut self) {
        self.audio.play(SoundEffect::Interaction);
    }

    fn play_level_up_sound(&mut self) {
        self.audio.play(SoundEffect::LevelUp);
    }

    fn play_finale_sound(&mut self) {
        self.audio.play(SoundEffect::Finale);
    }

    fn set_background(&mut self, background: Background) {
        let Some(body) = self.document.body() else {
            return;
        };
        let class = match background {
            Background::None => String::new(),
            Background::Level(i) => format!("level-{}", i + 1),
            Background::Transition => "transition".to_string(),
            Background::Final => "final".to_string(),
        };
        body.set_class_name(&class);
    }
}
