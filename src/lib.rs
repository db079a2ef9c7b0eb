//! Stardust Steps - touch-driven particle trails on a 2D canvas
//!
//! Core modules:
//! - `sim`: Particle simulation, level progression and input gating
//! - `renderer`: Drawing surface abstraction (Canvas 2D on web, recording for tests)
//! - `platform`: Host UI collaborator (DOM screens, messages, audio)
//! - `app`: Host-facing facade tying the pieces together
//! - `settings`: JSON configuration

pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::Experience;
pub use error::{ConfigError, RenderError};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Simulation tuning constants
pub mod consts {
    /// Wall-clock milliseconds of one nominal frame (60 updates per second => dt 1.0)
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Longest frame step we integrate (~2 nominal frames), larger gaps are clamped
    pub const MAX_FRAME_MS: f64 = 32.0;

    /// Particles further than this outside the canvas are culled
    pub const OFFSCREEN_MARGIN: f32 = 50.0;
    /// Spawn positions are jittered within this radius of the pointer
    pub const SPAWN_JITTER: f32 = 10.0;
    /// Opacity ceiling, particles are never fully opaque
    pub const MAX_OPACITY: f32 = 0.9;
    /// Relative size pulsation amplitude
    pub const PULSE_AMPLITUDE: f32 = 0.1;

    /// Impulse reach around the pointer
    pub const IMPULSE_RADIUS: f32 = 80.0;
    /// Velocity clamp applied to particles touched by an impulse (units/tick)
    pub const MAX_VELOCITY: f32 = 5.0;

    /// A message is shown on interaction 1, 41, 81, ...
    pub const MESSAGE_INTERVAL: u32 = 40;
    /// How long a message stays visible
    pub const MESSAGE_DURATION_MS: f64 = 3000.0;
    /// Minimum gap between two messages
    pub const MESSAGE_COOLDOWN_MS: f64 = 4000.0;

    /// Hold between reaching a threshold and entering the next level
    pub const TRANSITION_DELAY_MS: f64 = 500.0;
    /// Hold between the final burst and the summary screen
    pub const FINALE_DELAY_MS: f64 = 1500.0;
    /// Number of particles in the end-of-run burst
    pub const FINALE_BURST_COUNT: usize = 150;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Normalize a wall-clock frame gap into simulation ticks.
///
/// Returns `None` when the gap is not a positive finite number, in which case
/// the caller must skip the frame entirely.
#[inline]
pub fn normalize_frame_delta(elapsed_ms: f64) -> Option<f32> {
    if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
        return None;
    }
    Some((elapsed_ms.min(consts::MAX_FRAME_MS) / consts::NOMINAL_FRAME_MS) as f32)
}
