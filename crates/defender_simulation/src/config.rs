//! Игровые константы и session config
//!
//! Все tuning-числа собраны в одном месте (spawn интервалы, cooldowns,
//! combo формула, цены магазина). Presentation layer читает те же
//! константы, чтобы HUD и симуляция не расходились.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Размер игрового поля (пиксели, origin в левом верхнем углу — screen space)
pub const ARENA_WIDTH: f32 = 800.0;
pub const ARENA_HEIGHT: f32 = 600.0;

/// Margin за границей экрана, откуда спавнятся враги
pub const SPAWN_EDGE_MARGIN: f32 = 40.0;

// === Player ===

pub const PLAYER_SPEED: f32 = 220.0;
pub const PLAYER_INITIAL_HEALTH: i32 = 3;
pub const PLAYER_BASE_MAX_HEALTH: i32 = 5;

/// Базовый cooldown выстрела (мс)
pub const SHOOT_COOLDOWN_MS: f32 = 400.0;

/// Cooldown после покупки Rapid Fire (мс).
///
/// Да, 600 > 400: апгрейд фактически медленнее базы. Значение
/// историческое и сохранено намеренно (см. DESIGN.md, "rapid fire").
pub const RAPID_FIRE_COOLDOWN_MS: f32 = 600.0;

/// Углы тройного выстрела относительно bearing на курсор (радианы)
pub const TRIPLE_SHOT_OFFSETS: [f32; 3] = [-0.25, 0.0, 0.25];

// === Bullets ===

pub const BULLET_SPEED: f32 = 500.0;
pub const BULLET_LIFESPAN_MS: f32 = 2000.0;
pub const PLAYER_BULLET_CAP: usize = 120;
pub const ENEMY_BULLET_CAP: usize = 60;

// === Enemies ===

pub const GRUNT_SPEED: f32 = 60.0;
pub const FAST_SPEED: f32 = 200.0;
pub const SHOOTER_SPEED: f32 = 60.0;
pub const SHOOTER_FIRE_INTERVAL_MS: f32 = 1500.0;

/// Вероятность fast-варианта (только при wave > 2)
pub const FAST_ENEMY_CHANCE: f64 = 0.4;
/// Вероятность shooter-варианта (только при wave > 4)
pub const SHOOTER_ENEMY_CHANCE: f64 = 0.3;

// === Waves ===

pub const WAVE_SPAWN_INTERVAL_MS: f32 = 1000.0;
pub const WAVE_BASE_ENEMIES: u32 = 5;
pub const WAVE_ENEMIES_PER_WAVE: u32 = 3;
/// Пауза-анонс в начале волны (мс)
pub const WAVE_START_PAUSE_MS: f64 = 1500.0;
/// Задержка между клиром волны и открытием магазина (мс)
pub const WAVE_END_SHOP_DELAY_MS: f64 = 2000.0;

// === Power-ups ===

pub const POWERUP_SPAWN_INTERVAL_MS: f32 = 12_000.0;
pub const POWERUP_SPAWN_MARGIN: f32 = 80.0;
pub const TRIPLE_SHOT_DURATION_MS: f64 = 8000.0;
pub const SPEED_BOOST_DURATION_MS: f64 = 8000.0;
pub const SHIELD_DURATION_MS: f64 = 5000.0;
pub const HEAL_DISPLAY_DURATION_MS: f64 = 1500.0;
pub const SPEED_BOOST_FACTOR: f32 = 1.5;

// === Combo ===

pub const COMBO_RESET_MS: f32 = 3000.0;
pub const COMBO_BASE_SCORE: u32 = 10;
pub const COMBO_BONUS_STEP: u32 = 5;

// === Game over ===

/// Задержка перед handoff в game-over сцену (мс)
pub const GAME_OVER_HANDOFF_DELAY_MS: f64 = 500.0;

// === Overlap radii (circle tests) ===

pub const PLAYER_RADIUS: f32 = 16.0;
pub const ENEMY_RADIUS: f32 = 16.0;
pub const BULLET_RADIUS: f32 = 4.0;
pub const POWERUP_RADIUS: f32 = 18.0;

// === HUD colors (0xRRGGBB, presentation конвертирует сам) ===

pub const COLOR_PRIMARY: u32 = 0x00ff88;
pub const COLOR_SECONDARY: u32 = 0x00ccff;
pub const COLOR_DANGER: u32 = 0xff4757;
pub const COLOR_WARNING: u32 = 0xffa502;
pub const COLOR_SHIELD: u32 = 0xffd93c;
pub const COLOR_HEAL: u32 = 0xff4a4a;

/// Session-persistent апгрейды и имя игрока
///
/// Переживает рестарты игровой сцены в рамках одной сессии процесса.
/// Раньше это были ambient-глобалы presentation layer'а — теперь
/// explicit resource, который orchestrator получает при конструировании
/// и прокидывает в shop.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Куплен Rapid Fire (cooldown → RAPID_FIRE_COOLDOWN_MS)
    pub rapid_fire: bool,
    /// Перманентный бонус к max health (Max Health +1 в магазине)
    pub max_health_bonus: i32,
    /// Имя игрока (вводится вне симуляции, уходит в game-over handoff)
    pub player_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rapid_fire: false,
            max_health_bonus: 0,
            player_name: String::new(),
        }
    }
}

impl SessionConfig {
    /// Эффективный cooldown выстрела с учётом апгрейдов (мс)
    pub fn shoot_cooldown_ms(&self) -> f32 {
        if self.rapid_fire {
            RAPID_FIRE_COOLDOWN_MS
        } else {
            SHOOT_COOLDOWN_MS
        }
    }

    /// Эффективный max health с учётом апгрейдов
    pub fn max_health(&self) -> i32 {
        PLAYER_BASE_MAX_HEALTH + self.max_health_bonus
    }
}
