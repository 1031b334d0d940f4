//! Combat: детект пересечений и резолв их последствий
//!
//! Детект и резолв разведены в разные системы одного тика: детект
//! только пишет события пересечений, резолверы мутируют состояние.
//! Все пересечения — circle tests, настоящего физдвижка здесь нет.

pub mod overlap;
pub mod resolve;

use bevy::prelude::*;

pub use overlap::detect_overlaps;
pub use resolve::{
    resolve_bullet_enemy_hits, resolve_enemy_bullet_hits, resolve_enemy_contacts, score_gain,
};

/// Пуля игрока пересекла врага
#[derive(Event, Debug, Clone, Copy)]
pub struct BulletHitEnemy {
    pub slot: usize,
    pub enemy: Entity,
}

/// Враг дотронулся до игрока (kamikaze-контакт)
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyTouchedPlayer {
    pub enemy: Entity,
}

/// Вражеская пуля пересекла игрока
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyBulletHitPlayer {
    pub slot: usize,
}

/// Игрок наехал на power-up
#[derive(Event, Debug, Clone, Copy)]
pub struct PowerUpTouched {
    pub power_up: Entity,
}
