//! The live particle collection for the current level

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use super::levels::level;
use super::particle::Particle;
use crate::consts::*;
use crate::error::RenderError;
use crate::polar_to_cartesian;
use crate::renderer::Surface;

/// Live particles in insertion (draw) order
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    /// Quality multiplier applied to each level's cap
    cap_scale: f32,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ParticleField {
    pub fn new(cap_scale: f32) -> Self {
        Self {
            particles: Vec::new(),
            cap_scale,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Live particle cap for a level
    pub fn cap(&self, level_index: usize) -> usize {
        level(level_index).scaled_cap(self.cap_scale)
    }

    /// Spawn up to `count` particles jittered around (x, y).
    ///
    /// Particles beyond the level cap are dropped; existing ones are never
    /// evicted. Returns how many were added.
    pub fn spawn(
        &mut self,
        x: f32,
        y: f32,
        level_index: usize,
        count: usize,
        rng: &mut impl Rng,
    ) -> usize {
        let room = self.cap(level_index).saturating_sub(self.particles.len());
        let n = count.min(room);
        if n < count {
            log::trace!("Particle cap reached, dropped {}", count - n);
        }

        let origin = Vec2::new(x, y);
        for _ in 0..n {
            // sqrt keeps the jitter uniform over the disc
            let r = SPAWN_JITTER * rng.random::<f32>().sqrt();
            let offset = polar_to_cartesian(r, rng.random::<f32>() * TAU);
            self.particles.push(Particle::spawn(origin + offset, level_index, rng));
        }
        n
    }

    /// Emit exactly `count` particles flying radially out of `center`.
    ///
    /// The end-of-run burst ignores the level cap.
    pub fn burst(
        &mut self,
        center: Vec2,
        count: usize,
        level_index: usize,
        rng: &mut impl Rng,
    ) -> usize {
        self.particles.reserve(count);
        for i in 0..count {
            let angle = TAU * (i as f32 / count as f32) + rng.random::<f32>() * 0.1;
            self.particles.push(Particle::burst(center, angle, level_index, rng));
        }
        count
    }

    /// Push particles within `radius` of (x, y) away from it.
    ///
    /// Strength falls off linearly to zero at `radius`. Touched velocities are
    /// clamped to `MAX_VELOCITY`. Returns the number of particles pushed.
    pub fn apply_impulse(&mut self, x: f32, y: f32, radius: f32, force: f32) -> usize {
        let origin = Vec2::new(x, y);
        let mut pushed = 0;
        for p in self.particles.iter_mut() {
            let away = p.pos - origin;
            let distance = away.length();
            if distance <= 0.0 || distance >= radius {
                continue;
            }
            let strength = (1.0 - distance / radius) * force;
            p.vel = (p.vel + away / distance * strength).clamp_length_max(MAX_VELOCITY);
            pushed += 1;
        }
        pushed
    }

    /// Update every particle, then drop the dead ones
    pub fn step(&mut self, dt: f32, bounds: Vec2) {
        for p in self.particles.iter_mut() {
            p.update(dt, bounds);
        }
        self.particles.retain(Particle::is_alive);
    }

    /// Draw all particles in insertion order
    pub fn render(&self, surface: &mut dyn Surface, glow_scale: f32) -> Result<(), RenderError> {
        for p in &self.particles {
            p.render(surface, glow_scale)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_spawn_jitters_within_radius() {
        let mut field = ParticleField::default();
        let mut rng = rng();
        assert_eq!(field.spawn(100.0, 200.0, 0, 50, &mut rng), 50);
        for p in field.particles() {
            assert!(p.pos.distance(Vec2::new(100.0, 200.0)) <= SPAWN_JITTER + 1e-4);
        }
    }

    #[test]
    fn test_spawn_respects_cap_without_eviction() {
        let mut field = ParticleField::default();
        let mut rng = rng();
        field.spawn(10.0, 10.0, 0, 140, &mut rng);
        let first = field.particles()[0].pos;

        assert_eq!(field.spawn(500.0, 500.0, 0, 30, &mut rng), 10);
        assert_eq!(field.len(), 150);
        assert_eq!(field.spawn(500.0, 500.0, 0, 5, &mut rng), 0);
        assert_eq!(field.particles()[0].pos, first, "oldest particle kept");
    }

    #[test]
    fn test_cap_scales_with_quality() {
        let mut field = ParticleField::new(0.5);
        let mut rng = rng();
        field.spawn(0.0, 0.0, 2, 1000, &mut rng);
        assert_eq!(field.len(), 175);
    }

    #[test]
    fn test_impulse_pushes_away_and_falls_off() {
        let mut field = ParticleField::default();
        let mut rng = rng();
        field.spawn(0.0, 0.0, 0, 3, &mut rng);
        let particles = field.particles_mut();
        particles[0].pos = Vec2::new(120.0, 100.0); // 20 right of impulse
        particles[1].pos = Vec2::new(100.0, 160.0); // 60 below
        particles[2].pos = Vec2::new(300.0, 100.0); // out of reach
        for p in particles.iter_mut() {
            p.vel = Vec2::ZERO;
        }

        let pushed = field.apply_impulse(100.0, 100.0, IMPULSE_RADIUS, 2.0);
        assert_eq!(pushed, 2);

        let particles = field.particles();
        assert!((particles[0].vel - Vec2::new(1.5, 0.0)).length() < 1e-5);
        assert!((particles[1].vel - Vec2::new(0.0, 0.5)).length() < 1e-5);
        assert_eq!(particles[2].vel, Vec2::ZERO);
    }

    #[test]
    fn test_impulse_skips_coincident_particle() {
        let mut field = ParticleField::default();
        let mut rng = rng();
        field.spawn(0.0, 0.0, 0, 1, &mut rng);
        field.particles_mut()[0].pos = Vec2::new(50.0, 50.0);
        let before = field.particles()[0].vel;
        assert_eq!(field.apply_impulse(50.0, 50.0, IMPULSE_RADIUS, 3.0), 0);
        assert_eq!(field.particles()[0].vel, before);
        assert!(field.particles()[0].vel.is_finite());
    }

    #[test]
    fn test_repeated_impulses_stay_clamped() {
        let mut field = ParticleField::default();
        let mut rng = rng();
        field.spawn(200.0, 200.0, 0, 20, &mut rng);
        for _ in 0..100 {
            field.apply_impulse(195.0, 195.0, IMPULSE_RADIUS, 3.0);
        }
        for p in field.particles() {
            assert!(p.vel.length() <= MAX_VELOCITY + 1e-4);
        }
    }

    #[test]
    fn test_step_prunes_dead_without_skipping() {
        let mut field = ParticleField::default();
        let mut rng = rng();
        field.spawn(400.0, 300.0, 0, 10, &mut rng);
        // Two adjacent dead particles would trip a naive remove-while-iterating loop
        for (i, p) in field.particles_mut().iter_mut().enumerate() {
            p.vel = Vec2::ZERO;
            p.life = if i == 3 || i == 4 || i == 9 { 0.5 } else { 100.0 };
        }
        field.step(1.0, BOUNDS);
        assert_eq!(field.len(), 7);
        assert!(field.particles().iter().all(|p| p.life > 0.0));
    }

    #[test]
    fn test_render_draws_every_particle() {
        let mut field = ParticleField::default();
        let mut rng = rng();
        field.spawn(400.0, 300.0, 1, 12, &mut rng);
        let mut surface = RecordingSurface::new();
        field.render(&mut surface, 1.0).unwrap();
        assert_eq!(surface.shape_count(), 12);
    }

    #[test]
    fn test_render_propagates_surface_failure() {
        let mut field = ParticleField::default();
        let mut rng = rng();
        field.spawn(400.0, 300.0, 0, 5, &mut rng);
        let mut surface = RecordingSurface::failing_after(2);
        assert!(field.render(&mut surface, 1.0).is_err());
        assert_eq!(surface.commands.len(), 2);
    }

    #[test]
    fn test_burst_is_exact_and_radial() {
        let mut field = ParticleField::default();
        let mut rng = rng();
        field.spawn(10.0, 10.0, 2, 350, &mut rng);
        field.clear();
        let center = BOUNDS / 2.0;
        assert_eq!(field.burst(center, FINALE_BURST_COUNT, 2, &mut rng), FINALE_BURST_COUNT);
        assert_eq!(field.len(), FINALE_BURST_COUNT);
        for p in field.particles() {
            assert_eq!(p.pos, center);
            assert!(p.vel.length() > 0.0);
        }

        // One tick later every particle has moved away from the center
        field.step(1.0, BOUNDS);
        for p in field.particles() {
            assert!(p.pos.distance(center) > 0.0);
            assert!(p.pos.x >= 0.0 && p.pos.x <= BOUNDS.x);
            assert!(p.pos.y >= 0.0 && p.pos.y <= BOUNDS.y);
        }
    }

    proptest! {
        #[test]
        fn spawn_never_exceeds_cap(
            seed in any::<u64>(),
            level_index in 0usize..3,
            requests in proptest::collection::vec(0usize..500, 1..20),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut field = ParticleField::default();
            let cap = field.cap(level_index);
            for count in requests {
                let before = field.len();
                let added = field.spawn(300.0, 300.0, level_index, count, &mut rng);
                prop_assert!(added <= count);
                prop_assert_eq!(field.len(), before + added);
                prop_assert!(field.len() <= cap);
            }
        }

        #[test]
        fn impulse_leaves_far_particles_untouched(
            seed in any::<u64>(),
            ix in 0f32..800.0,
            iy in 0f32..600.0,
            force in 0f32..10.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut field = ParticleField::default();
            for _ in 0..10 {
                let x = rng.random_range(0.0..800.0);
                let y = rng.random_range(0.0..600.0);
                field.spawn(x, y, 0, 10, &mut rng);
            }
            let before: Vec<Particle> = field.particles().to_vec();
            field.apply_impulse(ix, iy, IMPULSE_RADIUS, force);
            let origin = Vec2::new(ix, iy);
            for (old, new) in before.iter().zip(field.particles()) {
                if old.pos.distance(origin) >= IMPULSE_RADIUS {
                    prop_assert_eq!(old.vel, new.vel);
                } else {
                    prop_assert!(new.vel.length() <= MAX_VELOCITY + 1e-4);
                }
            }
        }
    }
}
