//! Per-frame driver
//!
//! Each animation frame carries a [`FrameTicket`]. Cancelling the loop bumps
//! the generation, so a callback the browser still delivers afterwards finds a
//! stale ticket and does nothing.

use glam::Vec2;

use super::Simulation;
use super::levels::level;
use crate::normalize_frame_delta;
use crate::platform::Host;
use crate::renderer::{Paint, Rgb, Surface};

/// Permission to run one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
}

/// What a frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Ticket from a cancelled loop; nothing happened
    Stale,
    /// Timing was unusable (first frame, zero or invalid gap); nothing happened
    Skipped { next: FrameTicket },
    /// Frame simulated and drawn
    Rendered { next: FrameTicket },
    /// The run stopped needing frames; loop cancelled
    Finished,
    /// Drawing failed; loop cancelled and run halted
    Halted,
}

impl Tick {
    /// Ticket for the next frame, if the loop goes on
    pub fn next(&self) -> Option<FrameTicket> {
        match self {
            Tick::Skipped { next } | Tick::Rendered { next } => Some(*next),
            _ => None,
        }
    }
}

/// Drives simulation and drawing once per animation frame
#[derive(Debug, Clone, Default)]
pub struct RenderLoop {
    generation: u64,
    running: bool,
    last_time: Option<f64>,
    /// Glow multiplier from the quality preset
    glow_scale: f32,
    frames: u64,
}

impl RenderLoop {
    pub fn new(glow_scale: f32) -> Self {
        Self {
            glow_scale,
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames rendered since the loop last started
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Start (or restart) the loop and hand out the first ticket
    pub fn start(&mut self) -> FrameTicket {
        self.generation += 1;
        self.running = true;
        self.last_time = None;
        self.frames = 0;
        FrameTicket {
            generation: self.generation,
        }
    }

    /// Stop; outstanding tickets become stale
    pub fn cancel(&mut self) {
        if self.running {
            log::debug!("Render loop cancelled after {} frames", self.frames);
        }
        self.generation += 1;
        self.running = false;
        self.last_time = None;
    }

    fn is_current(&self, ticket: FrameTicket) -> bool {
        self.running && ticket.generation == self.generation
    }

    /// Run one frame at wall-clock time `now_ms`
    pub fn tick(
        &mut self,
        ticket: FrameTicket,
        now_ms: f64,
        sim: &mut Simulation,
        host: &mut dyn Host,
        surface: &mut dyn Surface,
    ) -> Tick {
        if !self.is_current(ticket) {
            log::trace!("Stale frame ignored");
            return Tick::Stale;
        }
        // Next frame is granted before any work
        let next = FrameTicket {
            generation: self.generation,
        };

        let elapsed_ms = match self.last_time {
            Some(last) => now_ms - last,
            None => f64::NAN,
        };
        if now_ms.is_finite() {
            self.last_time = Some(now_ms);
        }
        let Some(dt) = normalize_frame_delta(elapsed_ms) else {
            return Tick::Skipped { next };
        };

        {
            let (progression, mut stage) = sim.split(host);
            progression.advance_clock(elapsed_ms, &mut stage);
        }

        if let Err(e) = self.draw(dt, sim, surface) {
            log::error!("Render failed, stopping: {}", e);
            self.cancel();
            sim.progression.halt(host);
            return Tick::Halted;
        }
        self.frames += 1;

        if !sim.progression.is_running() {
            log::info!("Run finished, render loop stopping");
            self.cancel();
            return Tick::Finished;
        }
        Tick::Rendered { next }
    }

    fn draw(
        &self,
        dt: f32,
        sim: &mut Simulation,
        surface: &mut dyn Surface,
    ) -> Result<(), crate::error::RenderError> {
        let fade = level(sim.level()).trail_fade;
        surface.fill_rect(Vec2::ZERO, sim.bounds, Paint::flat(Rgb::BLACK, fade))?;
        sim.field.step(dt, sim.bounds);
        sim.field.render(surface, self.glow_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::platform::RecordingHost;
    use crate::renderer::{DrawCommand, RecordingSurface};
    use crate::settings::Settings;
    use crate::sim::Phase;

    const FRAME: f64 = NOMINAL_FRAME_MS;

    fn running() -> (RenderLoop, Simulation, RecordingHost, FrameTicket) {
        let mut sim = Simulation::new(&Settings::default(), 3, Vec2::new(800.0, 600.0));
        let mut host = RecordingHost::new();
        {
            let (c, mut stage) = sim.split(&mut host);
            c.start(&mut stage);
        }
        let mut render_loop = RenderLoop::new(1.0);
        let ticket = render_loop.start();
        (render_loop, sim, host, ticket)
    }

    #[test]
    fn test_first_frame_is_skipped() {
        let (mut rl, mut sim, mut host, ticket) = running();
        let mut surface = RecordingSurface::new();
        let tick = rl.tick(ticket, 1000.0, &mut sim, &mut host, &mut surface);
        assert!(matches!(tick, Tick::Skipped { .. }));
        assert!(surface.commands.is_empty());

        let tick = rl.tick(tick.next().unwrap(), 1000.0 + FRAME, &mut sim, &mut host, &mut surface);
        assert!(matches!(tick, Tick::Rendered { .. }));
        assert_eq!(rl.frames(), 1);
    }

    #[test]
    fn test_frame_paints_fade_then_particles() {
        let (mut rl, mut sim, mut host, ticket) = running();
        sim.field.spawn(400.0, 300.0, 0, 4, &mut sim.rng);
        let mut surface = RecordingSurface::new();
        let next = rl.tick(ticket, 0.0, &mut sim, &mut host, &mut surface).next().unwrap();
        rl.tick(next, FRAME, &mut sim, &mut host, &mut surface);

        match &surface.commands[0] {
            DrawCommand::Rect { size, paint, .. } => {
                assert_eq!(*size, Vec2::new(800.0, 600.0));
                assert_eq!(paint.alpha, crate::sim::LEVELS[0].trail_fade);
            }
            other => panic!("expected fade rect first, got {:?}", other),
        }
        assert_eq!(surface.shape_count(), 4);
    }

    #[test]
    fn test_nominal_frame_ages_particles_one_tick() {
        let (mut rl, mut sim, mut host, ticket) = running();
        sim.field.spawn(400.0, 300.0, 0, 1, &mut sim.rng);
        let life = sim.field.particles()[0].life;
        let mut surface = RecordingSurface::new();
        let next = rl.tick(ticket, 500.0, &mut sim, &mut host, &mut surface).next().unwrap();
        rl.tick(next, 500.0 + FRAME, &mut sim, &mut host, &mut surface);
        assert!((sim.field.particles()[0].life - (life - 1.0)).abs() < 1e-4);
    }

    #[test]
    fn test_stall_is_clamped() {
        let (mut rl, mut sim, mut host, ticket) = running();
        sim.field.spawn(400.0, 300.0, 0, 1, &mut sim.rng);
        let life = sim.field.particles()[0].life;
        let mut surface = RecordingSurface::new();
        let next = rl.tick(ticket, 0.0, &mut sim, &mut host, &mut surface).next().unwrap();
        rl.tick(next, 10_000.0, &mut sim, &mut host, &mut surface);
        let max_dt = (MAX_FRAME_MS / NOMINAL_FRAME_MS) as f32;
        assert!((sim.field.particles()[0].life - (life - max_dt)).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_timing_skips_without_touching_state() {
        let (mut rl, mut sim, mut host, ticket) = running();
        sim.field.spawn(400.0, 300.0, 0, 3, &mut sim.rng);
        let mut surface = RecordingSurface::new();
        let mut next = rl.tick(ticket, 100.0, &mut sim, &mut host, &mut surface).next().unwrap();
        let before: Vec<f32> = sim.field.particles().iter().map(|p| p.life).collect();

        for now in [100.0, 50.0, f64::NAN] {
            let tick = rl.tick(next, now, &mut sim, &mut host, &mut surface);
            assert!(matches!(tick, Tick::Skipped { .. }), "{:?} at {}", tick, now);
            next = tick.next().unwrap();
        }
        let after: Vec<f32> = sim.field.particles().iter().map(|p| p.life).collect();
        assert_eq!(before, after);
        assert!(surface.commands.is_empty());
    }

    #[test]
    fn test_cancelled_ticket_is_stale() {
        let (mut rl, mut sim, mut host, ticket) = running();
        rl.cancel();
        let mut surface = RecordingSurface::new();
        assert_eq!(rl.tick(ticket, 0.0, &mut sim, &mut host, &mut surface), Tick::Stale);

        // A restarted loop does not revive old tickets either
        let fresh = rl.start();
        assert_eq!(rl.tick(ticket, 10.0, &mut sim, &mut host, &mut surface), Tick::Stale);
        assert!(matches!(
            rl.tick(fresh, 20.0, &mut sim, &mut host, &mut surface),
            Tick::Skipped { .. }
        ));
    }

    #[test]
    fn test_render_failure_halts() {
        let (mut rl, mut sim, mut host, ticket) = running();
        sim.field.spawn(400.0, 300.0, 0, 5, &mut sim.rng);
        let mut surface = RecordingSurface::failing_after(2);
        let next = rl.tick(ticket, 0.0, &mut sim, &mut host, &mut surface).next().unwrap();
        let tick = rl.tick(next, FRAME, &mut sim, &mut host, &mut surface);
        assert_eq!(tick, Tick::Halted);
        assert!(!rl.is_running());
        assert_eq!(sim.phase(), Phase::Ended);
        assert!(host.start_screen);
        assert_eq!(rl.tick(next, 2.0 * FRAME, &mut sim, &mut host, &mut surface), Tick::Stale);
    }

    #[test]
    fn test_loop_drives_transition_and_finishes_after_finale() {
        let (mut rl, mut sim, mut host, ticket) = running();
        let mut surface = RecordingSurface::new();
        let mut now = 0.0;
        let mut next = rl.tick(ticket, now, &mut sim, &mut host, &mut surface).next().unwrap();

        // Jump straight to the last level's threshold
        for _ in 0..60 {
            let (c, mut stage) = sim.split(&mut host);
            c.record_discrete_interaction(stage.host);
            c.check_advance(&mut stage);
        }
        assert!(sim.progression.is_transitioning());
        while sim.progression.is_transitioning() {
            now += FRAME;
            next = rl.tick(next, now, &mut sim, &mut host, &mut surface).next().unwrap();
        }
        assert_eq!(sim.level(), 1);

        for _ in 60..140 {
            let (c, mut stage) = sim.split(&mut host);
            c.record_discrete_interaction(stage.host);
            c.check_advance(&mut stage);
        }
        while sim.progression.is_transitioning() {
            now += FRAME;
            next = rl.tick(next, now, &mut sim, &mut host, &mut surface).next().unwrap();
        }
        assert_eq!(sim.level(), 2);

        for _ in 140..240 {
            let (c, mut stage) = sim.split(&mut host);
            c.record_discrete_interaction(stage.host);
            c.check_advance(&mut stage);
        }
        assert_eq!(sim.field.len(), FINALE_BURST_COUNT);

        let mut last = Tick::Stale;
        for _ in 0..200 {
            now += FRAME;
            last = rl.tick(next, now, &mut sim, &mut host, &mut surface);
            match last.next() {
                Some(t) => next = t,
                None => break,
            }
        }
        assert_eq!(last, Tick::Finished);
        assert_eq!(sim.phase(), Phase::Ended);
        assert!(host.end_screen);
        assert!(!rl.is_running());
    }
}
