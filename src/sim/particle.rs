//! A single glowing particle

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use super::levels::{ShapeVariant, level};
use crate::consts::*;
use crate::error::RenderError;
use crate::polar_to_cartesian;
use crate::renderer::shapes::star_polygon;
use crate::renderer::{Paint, Rgb, Surface};

/// Burst particles live this fraction of a normal particle's life
const BURST_LIFE_FACTOR: f32 = 0.5;
/// Burst speeds (units/tick), kept under the impulse clamp
const BURST_SPEED_MIN: f32 = 2.0;
const BURST_SPEED_MAX: f32 = 4.5;

/// A visual particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Size sampled at spawn
    pub size: f32,
    /// Pulsating display size, recomputed every update
    pub current_size: f32,
    /// Remaining life in nominal frames
    pub life: f32,
    pub initial_life: f32,
    pub opacity: f32,
    pub color: Rgb,
    pub shape: ShapeVariant,
    /// Only advances for `Core`
    pub rotation: f32,
    spin: f32,
    pulsate_speed: f32,
}

impl Particle {
    /// Spawn a particle at `pos` with the attributes of level `level_index`
    pub fn spawn(pos: Vec2, level_index: usize, rng: &mut impl Rng) -> Self {
        let config = level(level_index);
        let size = config.size_base + rng.random::<f32>() * config.size_variation;
        let speed = config.speed_base + rng.random::<f32>() * config.speed_variation;
        let direction = rng.random::<f32>() * TAU;
        let life = config.life_base + rng.random::<f32>() * config.life_variation;
        let color = config.palette[rng.random_range(0..config.palette.len())];
        let spin = if rng.random::<bool>() {
            config.spin
        } else {
            -config.spin
        };

        Self {
            pos,
            vel: polar_to_cartesian(speed, direction),
            size,
            current_size: size,
            life,
            initial_life: life,
            opacity: MAX_OPACITY,
            color,
            shape: config.shape,
            rotation: rng.random::<f32>() * TAU,
            spin,
            pulsate_speed: config.pulsate_speed,
        }
    }

    /// Spawn an end-of-run particle leaving `center` along `angle`
    pub fn burst(center: Vec2, angle: f32, level_index: usize, rng: &mut impl Rng) -> Self {
        let mut particle = Self::spawn(center, level_index, rng);
        let speed = rng.random_range(BURST_SPEED_MIN..BURST_SPEED_MAX);
        particle.vel = polar_to_cartesian(speed, angle);
        particle.life *= BURST_LIFE_FACTOR;
        particle.initial_life = particle.life;
        particle
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Advance by `dt` nominal frames inside a canvas of `bounds`
    pub fn update(&mut self, dt: f32, bounds: Vec2) {
        self.pos += self.vel * dt;
        self.life -= dt;

        let outside = self.pos.x < -OFFSCREEN_MARGIN
            || self.pos.y < -OFFSCREEN_MARGIN
            || self.pos.x > bounds.x + OFFSCREEN_MARGIN
            || self.pos.y > bounds.y + OFFSCREEN_MARGIN;
        if outside {
            self.life = 0.0;
        }

        self.opacity = ((self.life / self.initial_life) * MAX_OPACITY).max(0.0);
        self.current_size =
            self.size * (1.0 + (self.life * self.pulsate_speed).sin() * PULSE_AMPLITUDE);

        if self.shape == ShapeVariant::Core {
            self.rotation = (self.rotation + self.spin * dt) % TAU;
        }
    }

    /// Glow radius for the current size
    pub fn glow_radius(&self) -> f32 {
        let factor = match self.shape {
            ShapeVariant::Dust => 2.0,
            ShapeVariant::Cloud => 4.0,
            ShapeVariant::Core => 3.0,
        };
        self.current_size * factor
    }

    /// Draw the particle; invisible particles draw nothing
    pub fn render(&self, surface: &mut dyn Surface, glow_scale: f32) -> Result<(), RenderError> {
        if self.opacity <= 0.0 || self.current_size <= 0.0 {
            return Ok(());
        }

        let paint = Paint {
            color: self.color,
            alpha: self.opacity,
            glow: self.glow_radius() * glow_scale,
        };

        match self.shape {
            ShapeVariant::Dust => surface.draw_disc(self.pos, self.current_size, paint),
            ShapeVariant::Cloud => surface.draw_disc(self.pos, self.current_size * 1.4, paint),
            ShapeVariant::Core => {
                let points = star_polygon(self.pos, self.current_size * 1.5, self.rotation);
                surface.draw_polygon(&points, paint)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::shapes::STAR_VERTICES;
    use crate::renderer::{DrawCommand, RecordingSurface};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn particle(level_index: usize) -> Particle {
        let mut rng = Pcg32::seed_from_u64(7);
        Particle::spawn(Vec2::new(400.0, 300.0), level_index, &mut rng)
    }

    #[test]
    fn test_spawn_samples_within_level_ranges() {
        let mut rng = Pcg32::seed_from_u64(1);
        for level_index in 0..3 {
            let config = level(level_index);
            for _ in 0..200 {
                let p = Particle::spawn(Vec2::ZERO, level_index, &mut rng);
                assert!(p.size >= config.size_base);
                assert!(p.size < config.size_base + config.size_variation);
                let speed = p.vel.length();
                assert!(speed >= config.speed_base - 1e-4);
                assert!(speed < config.speed_base + config.speed_variation + 1e-4);
                assert!(config.palette.contains(&p.color));
                assert_eq!(p.shape, config.shape);
                assert_eq!(p.opacity, MAX_OPACITY);
            }
        }
    }

    #[test]
    fn test_update_integrates_and_decrements_life() {
        let mut p = particle(0);
        p.vel = Vec2::new(1.0, -0.5);
        let start = p.pos;
        let life = p.life;
        p.update(2.0, BOUNDS);
        assert_eq!(p.pos, start + Vec2::new(2.0, -1.0));
        assert!((p.life - (life - 2.0)).abs() < 1e-5);
    }

    #[test]
    fn test_offscreen_beyond_margin_kills() {
        let mut p = particle(0);
        p.vel = Vec2::ZERO;
        p.pos = Vec2::new(-OFFSCREEN_MARGIN + 1.0, 100.0);
        p.update(0.1, BOUNDS);
        assert!(p.is_alive(), "inside the margin is still alive");

        p.pos = Vec2::new(BOUNDS.x + OFFSCREEN_MARGIN + 1.0, 100.0);
        p.update(0.1, BOUNDS);
        assert!(!p.is_alive());
        assert_eq!(p.opacity, 0.0);
    }

    #[test]
    fn test_only_core_rotates() {
        let mut dust = particle(0);
        let before = dust.rotation;
        dust.update(1.0, BOUNDS);
        assert_eq!(dust.rotation, before);

        let mut core = particle(2);
        let before = core.rotation;
        core.update(1.0, BOUNDS);
        assert_ne!(core.rotation, before);
    }

    #[test]
    fn test_render_shape_per_variant() {
        let mut surface = RecordingSurface::new();
        particle(0).render(&mut surface, 1.0).unwrap();
        particle(1).render(&mut surface, 1.0).unwrap();
        particle(2).render(&mut surface, 1.0).unwrap();

        assert!(matches!(surface.commands[0], DrawCommand::Disc { .. }));
        assert!(matches!(surface.commands[1], DrawCommand::Disc { .. }));
        match &surface.commands[2] {
            DrawCommand::Polygon { points, .. } => assert_eq!(points.len(), STAR_VERTICES),
            other => panic!("expected star polygon, got {:?}", other),
        }

        // Cloud glows wider than dust relative to size
        let dust = particle(0);
        let cloud = particle(1);
        assert!(cloud.glow_radius() / cloud.current_size > dust.glow_radius() / dust.current_size);
    }

    #[test]
    fn test_dead_particle_draws_nothing() {
        let mut p = particle(1);
        p.life = 0.0;
        p.opacity = 0.0;
        let mut surface = RecordingSurface::new();
        p.render(&mut surface, 1.0).unwrap();
        assert!(surface.commands.is_empty());
    }

    #[test]
    fn test_burst_is_radial_and_short_lived() {
        let mut rng = Pcg32::seed_from_u64(3);
        let center = Vec2::new(400.0, 300.0);
        let p = Particle::burst(center, 1.0, 2, &mut rng);
        let dir = p.vel.normalize();
        assert!((dir - polar_to_cartesian(1.0, 1.0)).length() < 1e-5);
        assert!(p.life <= (level(2).life_base + level(2).life_variation) * BURST_LIFE_FACTOR);
        assert_eq!(p.life, p.initial_life);
    }

    proptest! {
        #[test]
        fn opacity_bounded_and_non_increasing(
            seed in any::<u64>(),
            level_index in 0usize..3,
            steps in proptest::collection::vec(0.01f32..2.0, 1..200),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut p = Particle::spawn(Vec2::new(400.0, 300.0), level_index, &mut rng);
            let mut last = p.opacity;
            for dt in steps {
                let life = p.life;
                p.update(dt, BOUNDS);
                prop_assert!(p.opacity >= 0.0 && p.opacity <= MAX_OPACITY);
                prop_assert!(p.opacity <= last);
                if life > 0.0 {
                    prop_assert!(p.life < life);
                }
                last = p.opacity;
            }
        }
    }
}
