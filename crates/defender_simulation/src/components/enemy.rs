//! Враги и их варианты

use bevy::prelude::*;

/// Вариант врага — закрытый enum вместо динамических тегов:
/// новый вид = compile-time-checked ветка в каждом match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    /// Базовый камикадзе
    Grunt,
    /// Быстрый вариант (wave > 2)
    Fast,
    /// Стреляющий вариант (wave > 4)
    Shooter,
}

impl EnemyKind {
    /// Скорость преследования (px/s)
    pub fn speed(&self) -> f32 {
        match self {
            EnemyKind::Grunt => crate::config::GRUNT_SPEED,
            EnemyKind::Fast => crate::config::FAST_SPEED,
            EnemyKind::Shooter => crate::config::SHOOTER_SPEED,
        }
    }
}

/// Враг. Все варианты — камикадзе: контакт с игроком уничтожает врага
/// независимо от щита.
#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy {
    pub kind: EnemyKind,
}

/// Таймер стрельбы shooter-варианта (dt-driven, по одному на врага)
#[derive(Component, Debug, Default)]
pub struct ShooterGun {
    pub since_last_ms: f32,
}
