//! Level definitions
//!
//! Thresholds are cumulative over the whole run: level 1 starts after 60
//! taps, level 2 after 140, and the run ends at 240.

use crate::renderer::Rgb;

/// Draw geometry of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeVariant {
    /// Small plain disc
    Dust,
    /// Soft disc with an enlarged glow
    Cloud,
    /// Rotating star
    Core,
}

/// Visual and progression parameters of one level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    pub name: &'static str,
    pub shape: ShapeVariant,
    pub size_base: f32,
    pub size_variation: f32,
    pub speed_base: f32,
    pub speed_variation: f32,
    /// Lifetime in nominal frames
    pub life_base: f32,
    pub life_variation: f32,
    /// Angular frequency of the size pulsation (per unit of remaining life)
    pub pulsate_speed: f32,
    /// Rotation per tick for `Core` particles (radians, sign picked at spawn)
    pub spin: f32,
    pub palette: &'static [Rgb],
    pub messages: &'static [&'static str],
    /// Cumulative interaction count that completes this level
    pub threshold: u32,
    /// Particles spawned per discrete interaction
    pub create_rate: u32,
    /// Impulse strength applied around the pointer
    pub push_force: f32,
    /// Live particle cap at medium quality
    pub max_particles: usize,
    /// Opacity of the black trail-fade rectangle painted every frame
    pub trail_fade: f32,
}

impl LevelConfig {
    /// Particles spawned per drag sample
    pub fn drag_rate(&self) -> u32 {
        self.create_rate.div_ceil(2)
    }

    /// Particle cap after applying a quality multiplier (never below one)
    pub fn scaled_cap(&self, scale: f32) -> usize {
        ((self.max_particles as f32 * scale).round() as usize).max(1)
    }
}

const DUST_PALETTE: &[Rgb] = &[
    Rgb::new(255, 255, 255),
    Rgb::new(200, 225, 255),
    Rgb::new(160, 200, 255),
    Rgb::new(255, 240, 200),
];

const NEBULA_PALETTE: &[Rgb] = &[
    Rgb::new(186, 104, 255),
    Rgb::new(255, 120, 200),
    Rgb::new(120, 140, 255),
    Rgb::new(255, 170, 230),
];

const CORE_PALETTE: &[Rgb] = &[
    Rgb::new(255, 215, 90),
    Rgb::new(255, 160, 60),
    Rgb::new(255, 245, 180),
    Rgb::new(255, 110, 80),
];

/// All levels in play order
pub static LEVELS: [LevelConfig; 3] = [
    LevelConfig {
        name: "Polvo de estrellas",
        shape: ShapeVariant::Dust,
        size_base: 1.0,
        size_variation: 2.0,
        speed_base: 0.3,
        speed_variation: 1.0,
        life_base: 60.0,
        life_variation: 60.0,
        pulsate_speed: 0.1,
        spin: 0.0,
        palette: DUST_PALETTE,
        messages: &[
            "Cada paso te lleva a un lugar único ✨",
            "¿Dónde terminará tu viaje? 🌌",
            "Tus pasos están dibujando un mapa invisible ⭐",
        ],
        threshold: 60,
        create_rate: 3,
        push_force: 2.0,
        max_particles: 150,
        trail_fade: 0.25,
    },
    LevelConfig {
        name: "Nebulosa",
        shape: ShapeVariant::Cloud,
        size_base: 3.0,
        size_variation: 4.0,
        speed_base: 0.2,
        speed_variation: 0.8,
        life_base: 90.0,
        life_variation: 60.0,
        pulsate_speed: 0.08,
        spin: 0.0,
        palette: NEBULA_PALETTE,
        messages: &[
            "El destino es tan brillante como tu imaginación 💫",
            "No dejes de soñar, incluso si cierras los ojos 🌙",
        ],
        threshold: 140,
        create_rate: 4,
        push_force: 2.5,
        max_particles: 250,
        trail_fade: 0.18,
    },
    LevelConfig {
        name: "Núcleo",
        shape: ShapeVariant::Core,
        size_base: 2.0,
        size_variation: 3.0,
        speed_base: 0.5,
        speed_variation: 1.5,
        life_base: 80.0,
        life_variation: 60.0,
        pulsate_speed: 0.15,
        spin: 0.05,
        palette: CORE_PALETTE,
        messages: &[
            "Muy pronto… todo se revelará 🌠",
            "Tu luz ya ilumina el camino 🔆",
        ],
        threshold: 240,
        create_rate: 5,
        push_force: 3.0,
        max_particles: 350,
        trail_fade: 0.12,
    },
];

/// Level config by index, clamped to the last level
pub fn level(index: usize) -> &'static LevelConfig {
    &LEVELS[index.min(LEVELS.len() - 1)]
}

/// Index of the final level
pub fn last_level_index() -> usize {
    LEVELS.len() - 1
}
