//! Events на границе симуляция ↔ presentation layer
//!
//! Симуляция — strategic layer: она владеет правилами и состоянием.
//! Рендер, HUD и сцены — tactical layer снаружи, который:
//! - читает outbound events (`EffectEvent`, `HudEvent`, `SceneEvent`)
//!   и рисует fire-and-forget эффекты;
//! - пишет inbound intents (`FireIntent`, `ShopClosed`) и resources
//!   (`MoveInput`, `AimTarget`).
//!
//! Симуляция НИКОГДА не читает состояние presentation обратно.

use bevy::prelude::*;

// === Inbound (presentation → симуляция) ===

/// Сырой input перемещения, оси в [-1, 1] (WASD / стрелки)
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct MoveInput(pub Vec2);

/// Точка прицеливания в мировых координатах (курсор)
#[derive(Resource, Debug, Clone, Copy)]
pub struct AimTarget(pub Vec2);

impl Default for AimTarget {
    fn default() -> Self {
        Self(Vec2::new(
            crate::config::ARENA_WIDTH / 2.0,
            0.0,
        ))
    }
}

/// Event: игрок нажал "выстрел" (pointer down)
///
/// Cooldown проверяет симуляция, не presentation.
#[derive(Event, Debug, Clone, Copy)]
pub struct FireIntent;

/// Event: магазин закрыт кнопкой Continue → стартует следующая волна
#[derive(Event, Debug, Clone, Copy)]
pub struct ShopClosed;

// === Outbound: визуальные эффекты (fire-and-forget) ===

#[derive(Event, Debug, Clone)]
pub enum EffectEvent {
    /// Взрыв частиц в точке
    ExplodeAt { x: f32, y: f32 },
    /// Полноэкранная вспышка
    FlashScreen { color: u32, alpha: f32, duration_ms: u32 },
    /// Тряска камеры
    ShakeCamera { duration_ms: u32, intensity: f32 },
    /// Всплывающий текст очков
    ScorePopup { x: f32, y: f32, text: String },
    /// Вспышка щита при поглощённом уроне
    ShieldFlare { x: f32, y: f32 },
    /// Вспышка у дула при выстреле
    MuzzleFlash { x: f32, y: f32 },
}

// === Outbound: HUD ===

#[derive(Event, Debug, Clone)]
pub enum HudEvent {
    Score(u32),
    Health { current: i32, max: i32 },
    Wave(u32),
    EnemiesLeft(u32),
    /// Баннер баффа; HUD сам гасит текст через duration_ms
    BuffText { text: String, color: u32, duration_ms: u32 },
    Combo(u32),
    ClearCombo,
}

// === Outbound: переходы сцен ===

#[derive(Event, Debug, Clone)]
pub enum SceneEvent {
    /// Волна зачищена (перед открытием магазина)
    WaveCleared { wave: u32 },
    /// Пора показать магазин (score = доступные кредиты)
    OpenShop { score: u32 },
    /// Терминальный переход: game over с финальным счётом
    GameOver { score: u32, player_name: String },
}
