//! AI врагов: чистое преследование + стрельба shooter-варианта

use bevy::prelude::*;

use crate::bullets::EnemyBullets;
use crate::components::{Enemy, PlayerShip, ShooterGun};
use crate::config;
use crate::state::GameState;

/// System: все враги прут на игрока по прямой
///
/// Никакого avoidance: накопление врагов в одной точке — фича жанра.
pub fn pursue_player(
    time: Res<Time>,
    state: Res<GameState>,
    player: Query<&Transform, With<PlayerShip>>,
    mut enemies: Query<(&mut Transform, &Enemy), Without<PlayerShip>>,
) {
    if state.is_game_over {
        return;
    }
    let Ok(player_transform) = player.single() else {
        return;
    };
    let target = player_transform.translation.truncate();
    let dt = time.delta_secs();

    for (mut transform, enemy) in enemies.iter_mut() {
        let pos = transform.translation.truncate();
        let to_player = target - pos;
        if to_player.length_squared() <= f32::EPSILON {
            continue;
        }
        let step = to_player.normalize() * enemy.kind.speed() * dt;
        transform.translation.x += step.x;
        transform.translation.y += step.y;
        transform.rotation = Quat::from_rotation_z(to_player.to_angle());
    }
}

/// System: shooter-варианты стреляют в игрока раз в интервал
///
/// Таймер per-enemy, первый выстрел через полный интервал после спавна.
pub fn shooter_fire(
    time: Res<Time>,
    state: Res<GameState>,
    player: Query<&Transform, With<PlayerShip>>,
    mut shooters: Query<(&Transform, &mut ShooterGun), Without<PlayerShip>>,
    mut bullets: ResMut<EnemyBullets>,
) {
    if state.is_game_over {
        return;
    }
    let Ok(player_transform) = player.single() else {
        return;
    };
    let target = player_transform.translation.truncate();
    let dt_ms = time.delta_secs() * 1000.0;

    for (transform, mut gun) in shooters.iter_mut() {
        gun.since_last_ms += dt_ms;
        if gun.since_last_ms < config::SHOOTER_FIRE_INTERVAL_MS {
            continue;
        }
        gun.since_last_ms = 0.0;

        let origin = transform.translation.truncate();
        let bearing = (target - origin).to_angle();
        // Исчерпание пула — молчаливый дроп выстрела
        bullets
            .0
            .fire(origin, bearing, config::BULLET_SPEED, config::BULLET_LIFESPAN_MS);
    }
}
