//! Pointer/touch gating
//!
//! The first sample of a press is a discrete interaction: full spawn, counter
//! +1, threshold check. Drag samples that follow only spawn at half rate and
//! never count, so one long drag cannot fast-forward the levels.

use glam::Vec2;

use super::Simulation;
use super::levels::level;
use crate::consts::IMPULSE_RADIUS;
use crate::platform::Host;

/// Last known pointer state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InteractionSnapshot {
    pub last: Option<Vec2>,
    /// A press is in progress
    pub pressed: bool,
    /// At least one drag sample followed the press
    pub dragging: bool,
}

/// Kind of interaction a pointer sample produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Discrete,
    Continuous,
}

/// Translates pointer events into simulation effects
#[derive(Debug, Clone, Default)]
pub struct InteractionGate {
    snapshot: InteractionSnapshot,
    /// Play the interaction chime on taps
    sound: bool,
}

impl InteractionGate {
    pub fn new(sound: bool) -> Self {
        Self {
            snapshot: InteractionSnapshot::default(),
            sound,
        }
    }

    pub fn snapshot(&self) -> &InteractionSnapshot {
        &self.snapshot
    }

    /// Press started. Returns the number of particles spawned.
    pub fn pointer_down(
        &mut self,
        x: f32,
        y: f32,
        sim: &mut Simulation,
        host: &mut dyn Host,
    ) -> usize {
        self.snapshot = InteractionSnapshot {
            last: Some(Vec2::new(x, y)),
            pressed: true,
            dragging: false,
        };
        self.interact(InteractionKind::Discrete, x, y, sim, host)
    }

    /// Pointer moved; ignored unless a press is in progress
    pub fn pointer_move(
        &mut self,
        x: f32,
        y: f32,
        sim: &mut Simulation,
        host: &mut dyn Host,
    ) -> usize {
        if !self.snapshot.pressed {
            return 0;
        }
        self.snapshot.last = Some(Vec2::new(x, y));
        self.snapshot.dragging = true;
        self.interact(InteractionKind::Continuous, x, y, sim, host)
    }

    pub fn pointer_up(&mut self) {
        self.snapshot.pressed = false;
        self.snapshot.dragging = false;
    }

    pub fn pointer_cancel(&mut self) {
        self.pointer_up();
    }

    /// Forget any press in progress (restart)
    pub fn reset(&mut self) {
        self.snapshot = InteractionSnapshot::default();
    }

    fn interact(
        &mut self,
        kind: InteractionKind,
        x: f32,
        y: f32,
        sim: &mut Simulation,
        host: &mut dyn Host,
    ) -> usize {
        if !sim.progression.accepts_input() {
            log::trace!("{:?} input ignored in phase {:?}", kind, sim.phase());
            return 0;
        }

        let level_index = sim.level();
        let config = level(level_index);
        let count = match kind {
            InteractionKind::Discrete => config.create_rate,
            InteractionKind::Continuous => config.drag_rate(),
        };
        let spawned = sim.field.spawn(x, y, level_index, count as usize, &mut sim.rng);
        sim.field.apply_impulse(x, y, IMPULSE_RADIUS, config.push_force);

        if kind == InteractionKind::Discrete {
            if self.sound {
                host.play_interaction_sound();
            }
            let (progression, mut stage) = sim.split(host);
            progression.record_discrete_interaction(stage.host);
            progression.check_advance(&mut stage);
        }
        spawned
    }
}
