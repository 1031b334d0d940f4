//! Power-ups на игровом поле

use bevy::prelude::*;

use crate::config;

/// Вид power-up'а — закрытый enum (раньше строковые теги
/// "trip"|"speed"|"shield"|"heal").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Triple,
    Speed,
    Shield,
    Heal,
}

pub const ALL_POWERUP_KINDS: [PowerUpKind; 4] = [
    PowerUpKind::Triple,
    PowerUpKind::Speed,
    PowerUpKind::Shield,
    PowerUpKind::Heal,
];

impl PowerUpKind {
    /// Текст баннера при подборе
    pub fn banner(&self) -> &'static str {
        match self {
            PowerUpKind::Triple => "TRIPLE SHOT ACTIVATED!",
            PowerUpKind::Speed => "SPEED BOOST ACTIVATED!",
            PowerUpKind::Shield => "SHIELD ACTIVATED!",
            PowerUpKind::Heal => "HEALTH RESTORED!",
        }
    }

    pub fn banner_color(&self) -> u32 {
        match self {
            PowerUpKind::Triple => config::COLOR_PRIMARY,
            PowerUpKind::Speed => config::COLOR_SECONDARY,
            PowerUpKind::Shield => config::COLOR_SHIELD,
            PowerUpKind::Heal => config::COLOR_HEAL,
        }
    }

    /// Длительность баффа; для Heal — длительность показа баннера
    pub fn duration_ms(&self) -> f64 {
        match self {
            PowerUpKind::Triple => config::TRIPLE_SHOT_DURATION_MS,
            PowerUpKind::Speed => config::SPEED_BOOST_DURATION_MS,
            PowerUpKind::Shield => config::SHIELD_DURATION_MS,
            PowerUpKind::Heal => config::HEAL_DISPLAY_DURATION_MS,
        }
    }
}

/// Power-up, лежащий на поле и ждущий подбора
#[derive(Component, Debug, Clone, Copy)]
pub struct PowerUp {
    pub kind: PowerUpKind,
}
