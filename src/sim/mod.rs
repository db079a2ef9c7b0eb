//! Particle simulation module
//!
//! All state mutation happens synchronously inside a frame tick or an input
//! handler; the host never interleaves the two.
//! - Seeded RNG only
//! - Deferred effects on a logical clock (no timers)
//! - No rendering or platform dependencies beyond the `Surface`/`Host` traits

pub mod field;
pub mod frame;
pub mod input;
pub mod levels;
pub mod particle;
pub mod progression;
pub mod schedule;

pub use field::ParticleField;
pub use frame::{FrameTicket, RenderLoop, Tick};
pub use input::{InteractionGate, InteractionSnapshot};
pub use levels::{LEVELS, LevelConfig, ShapeVariant};
pub use particle::Particle;
pub use progression::{Advance, Phase, ProgressionController, RunSummary, Transition};
pub use schedule::{Deferred, Schedule};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::platform::Host;
use crate::settings::Settings;

/// Everything the controller may touch while applying a transition
pub struct Stage<'a> {
    pub field: &'a mut ParticleField,
    pub rng: &'a mut Pcg32,
    /// Canvas size
    pub bounds: Vec2,
    pub host: &'a mut dyn Host,
}

/// Simulation state owned by the experience
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Run seed for reproducibility
    pub seed: u64,
    pub field: ParticleField,
    pub progression: ProgressionController,
    pub rng: Pcg32,
    /// Canvas size
    pub bounds: Vec2,
}

impl Simulation {
    pub fn new(settings: &Settings, seed: u64, bounds: Vec2) -> Self {
        Self {
            seed,
            field: ParticleField::new(settings.quality.cap_scale()),
            progression: ProgressionController::new(settings),
            rng: Pcg32::seed_from_u64(seed),
            bounds,
        }
    }

    /// Borrow the controller alongside the stage it acts on
    pub fn split<'a>(
        &'a mut self,
        host: &'a mut dyn Host,
    ) -> (&'a mut ProgressionController, Stage<'a>) {
        (
            &mut self.progression,
            Stage {
                field: &mut self.field,
                rng: &mut self.rng,
                bounds: self.bounds,
                host,
            },
        )
    }

    /// Current level index
    pub fn level(&self) -> usize {
        self.progression.level()
    }

    pub fn phase(&self) -> Phase {
        self.progression.phase()
    }
}
