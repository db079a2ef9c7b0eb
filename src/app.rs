//! Host-facing facade
//!
//! [`Experience`] owns the simulation, the input gate, the render loop and the
//! host. The web entry point and the native demo only talk to this type.

use glam::Vec2;

use crate::platform::Host;
use crate::renderer::Surface;
use crate::settings::Settings;
use crate::sim::{FrameTicket, InteractionGate, Phase, RenderLoop, Simulation, Tick};

/// A complete interactive session
pub struct Experience<H: Host> {
    sim: Simulation,
    gate: InteractionGate,
    render_loop: RenderLoop,
    host: H,
    settings: Settings,
}

impl<H: Host> Experience<H> {
    /// Create the experience and show the start screen
    pub fn new(settings: Settings, seed: u64, width: f32, height: f32, mut host: H) -> Self {
        let seed = settings.seed.unwrap_or(seed);
        host.show_start_screen();
        log::info!(
            "Experience ready ({}x{}, seed {}, quality {})",
            width,
            height,
            seed,
            settings.quality.as_str()
        );
        Self {
            sim: Simulation::new(&settings, seed, Vec2::new(width, height)),
            gate: InteractionGate::new(settings.sound),
            render_loop: RenderLoop::new(settings.quality.glow_scale()),
            host,
            settings,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.sim.phase()
    }

    pub fn gate(&self) -> &InteractionGate {
        &self.gate
    }

    pub fn is_looping(&self) -> bool {
        self.render_loop.is_running()
    }

    /// Begin a run. Returns the ticket for the first animation frame.
    pub fn start(&mut self) -> Option<FrameTicket> {
        let started = {
            let (progression, mut stage) = self.sim.split(&mut self.host);
            progression.start(&mut stage)
        };
        if !started {
            return None;
        }
        self.gate.reset();
        Some(self.render_loop.start())
    }

    /// Stop everything and return to the start screen
    pub fn restart(&mut self) {
        self.render_loop.cancel();
        self.gate.reset();
        let (progression, mut stage) = self.sim.split(&mut self.host);
        progression.restart(&mut stage);
    }

    pub fn handle_pointer_down(&mut self, x: f32, y: f32) {
        self.gate.pointer_down(x, y, &mut self.sim, &mut self.host);
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32) {
        self.gate.pointer_move(x, y, &mut self.sim, &mut self.host);
    }

    pub fn handle_pointer_up(&mut self) {
        self.gate.pointer_up();
    }

    pub fn handle_pointer_cancel(&mut self) {
        self.gate.pointer_cancel();
    }

    /// Canvas resized; particles keep their positions and cull against the new bounds
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.sim.bounds = Vec2::new(width, height);
    }

    /// Per-frame hook. Request another frame only when the result carries a ticket.
    pub fn render(&mut self, ticket: FrameTicket, now_ms: f64, surface: &mut dyn Surface) -> Tick {
        self.render_loop
            .tick(ticket, now_ms, &mut self.sim, &mut self.host, surface)
    }
}
