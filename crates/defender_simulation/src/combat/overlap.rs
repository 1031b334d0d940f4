//! Детект пересечений (circle tests)

use bevy::prelude::*;

use crate::bullets::{EnemyBullets, PlayerBullets};
use crate::components::{Enemy, PlayerShip, PowerUp};
use crate::config;
use crate::state::GameState;

use super::{BulletHitEnemy, EnemyBulletHitPlayer, EnemyTouchedPlayer, PowerUpTouched};

#[inline]
fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// System: один проход по всем парам, только события на выходе
///
/// Событие может оказаться stale к моменту резолва (пуля уже потрачена,
/// враг уже мёртв) — резолверы обязаны перепроверять.
#[allow(clippy::too_many_arguments)]
pub fn detect_overlaps(
    state: Res<GameState>,
    player: Query<&Transform, With<PlayerShip>>,
    enemies: Query<(Entity, &Transform), With<Enemy>>,
    powerups: Query<(Entity, &Transform), With<PowerUp>>,
    player_bullets: Res<PlayerBullets>,
    enemy_bullets: Res<EnemyBullets>,
    mut bullet_hits: EventWriter<BulletHitEnemy>,
    mut contacts: EventWriter<EnemyTouchedPlayer>,
    mut enemy_bullet_hits: EventWriter<EnemyBulletHitPlayer>,
    mut pickups: EventWriter<PowerUpTouched>,
) {
    if state.is_game_over {
        return;
    }
    let Ok(player_transform) = player.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    // Пули игрока × враги
    for (slot, bullet) in player_bullets.0.iter_active() {
        for (enemy, transform) in enemies.iter() {
            if circles_overlap(
                bullet.pos,
                config::BULLET_RADIUS,
                transform.translation.truncate(),
                config::ENEMY_RADIUS,
            ) {
                bullet_hits.write(BulletHitEnemy { slot, enemy });
                break;
            }
        }
    }

    // Враги × игрок
    for (enemy, transform) in enemies.iter() {
        if circles_overlap(
            transform.translation.truncate(),
            config::ENEMY_RADIUS,
            player_pos,
            config::PLAYER_RADIUS,
        ) {
            contacts.write(EnemyTouchedPlayer { enemy });
        }
    }

    // Вражеские пули × игрок
    for (slot, bullet) in enemy_bullets.0.iter_active() {
        if circles_overlap(
            bullet.pos,
            config::BULLET_RADIUS,
            player_pos,
            config::PLAYER_RADIUS,
        ) {
            enemy_bullet_hits.write(EnemyBulletHitPlayer { slot });
        }
    }

    // Игрок × power-up'ы
    for (power_up, transform) in powerups.iter() {
        if circles_overlap(
            player_pos,
            config::PLAYER_RADIUS,
            transform.translation.truncate(),
            config::POWERUP_RADIUS,
        ) {
            pickups.write(PowerUpTouched { power_up });
        }
    }
}
