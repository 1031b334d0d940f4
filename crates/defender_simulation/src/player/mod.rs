//! Игрок: движение, прицеливание, стрельба

use bevy::prelude::*;

use crate::bullets::{fire_player_bullet, PlayerBullets};
use crate::components::{MoveSpeed, PlayerShip};
use crate::config::{self, SessionConfig};
use crate::events::{AimTarget, EffectEvent, FireIntent, MoveInput};
use crate::powerups::BuffState;
use crate::state::{GameState, GameTimers};

/// Startup: корабль игрока в центре поля
pub fn spawn_player(mut commands: Commands) {
    commands.spawn((
        PlayerShip,
        MoveSpeed::default(),
        Transform::from_xyz(config::ARENA_WIDTH / 2.0, config::ARENA_HEIGHT / 2.0, 0.0),
    ));
}

/// System: движение по input-осям + поворот носом к точке прицеливания
///
/// Диагональ нормализуется, позиция зажата внутри поля с учётом радиуса.
pub fn apply_player_movement(
    time: Res<Time>,
    input: Res<MoveInput>,
    aim: Res<AimTarget>,
    state: Res<GameState>,
    mut player: Query<(&mut Transform, &MoveSpeed), With<PlayerShip>>,
) {
    if state.is_game_over {
        return;
    }
    let Ok((mut transform, speed)) = player.single_mut() else {
        return;
    };

    let dir = input.0.normalize_or_zero();
    let mut pos = transform.translation.truncate() + dir * speed.0 * time.delta_secs();
    pos.x = pos.x.clamp(config::PLAYER_RADIUS, config::ARENA_WIDTH - config::PLAYER_RADIUS);
    pos.y = pos.y.clamp(config::PLAYER_RADIUS, config::ARENA_HEIGHT - config::PLAYER_RADIUS);
    transform.translation.x = pos.x;
    transform.translation.y = pos.y;

    let to_aim = aim.0 - pos;
    if to_aim.length_squared() > f32::EPSILON {
        transform.rotation = Quat::from_rotation_z(to_aim.to_angle());
    }
}

/// System: стрельба по `FireIntent`
///
/// Cooldown живёт здесь, presentation шлёт intent на каждый pointer
/// down. При triple-баффе три пули веером; при исчерпании пула часть
/// веера молча дропается.
pub fn fire_player_bullets(
    mut intents: EventReader<FireIntent>,
    state: Res<GameState>,
    session: Res<SessionConfig>,
    buffs: Res<BuffState>,
    mut timers: ResMut<GameTimers>,
    aim: Res<AimTarget>,
    player: Query<&Transform, With<PlayerShip>>,
    mut bullets: ResMut<PlayerBullets>,
    mut effects: EventWriter<EffectEvent>,
) {
    let requested = !intents.is_empty();
    intents.clear();
    if !requested || state.is_game_over {
        return;
    }
    if timers.since_last_shot_ms < session.shoot_cooldown_ms() {
        return;
    }
    let Ok(transform) = player.single() else {
        return;
    };
    timers.since_last_shot_ms = 0.0;

    let origin = transform.translation.truncate();
    let bearing = (aim.0 - origin).to_angle();
    if buffs.triple {
        for offset in config::TRIPLE_SHOT_OFFSETS {
            fire_player_bullet(&mut bullets.0, origin, bearing + offset, &mut effects);
        }
    } else {
        fire_player_bullet(&mut bullets.0, origin, bearing, &mut effects);
    }
}
