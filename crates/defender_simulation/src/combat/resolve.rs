//! Резолверы последствий пересечений
//!
//! Контракт со stale-событиями: пуля резолвится только если её слот
//! всё ещё активен, враг — только если entity ещё жив и не попал в
//! локальный destroyed-набор этого тика.

use bevy::prelude::*;

use crate::bullets::{EnemyBullets, PlayerBullets};
use crate::components::{Enemy, PlayerShip};
use crate::config;
use crate::events::{EffectEvent, HudEvent};
use crate::logger;
use crate::powerups::BuffState;
use crate::state::GameState;
use crate::waves::WaveState;

use super::{BulletHitEnemy, EnemyBulletHitPlayer, EnemyTouchedPlayer};

/// Очки за убийство при текущем размере комбо (после инкремента)
pub fn score_gain(combo: u32) -> u32 {
    config::COMBO_BASE_SCORE + combo.saturating_sub(1) * config::COMBO_BONUS_STEP
}

/// System: пули игрока против врагов
#[allow(clippy::too_many_arguments)]
pub fn resolve_bullet_enemy_hits(
    mut commands: Commands,
    mut hits: EventReader<BulletHitEnemy>,
    enemies: Query<&Transform, With<Enemy>>,
    mut player_bullets: ResMut<PlayerBullets>,
    mut state: ResMut<GameState>,
    mut waves: ResMut<WaveState>,
    mut hud: EventWriter<HudEvent>,
    mut effects: EventWriter<EffectEvent>,
) {
    if state.is_game_over {
        return;
    }
    // Враги, убитые в этом же тике: вторая пуля по ним не тратится
    let mut destroyed: Vec<Entity> = Vec::new();

    for hit in hits.read() {
        if destroyed.contains(&hit.enemy) {
            continue;
        }
        let Ok(transform) = enemies.get(hit.enemy) else {
            continue;
        };
        // Stale слот: пуля уже истекла или потрачена ранее в этом тике
        if !player_bullets.0.deactivate(hit.slot) {
            continue;
        }

        let pos = transform.translation.truncate();
        destroyed.push(hit.enemy);
        commands.entity(hit.enemy).despawn();
        waves.enemies_destroyed += 1;

        state.combo_count += 1;
        state.combo_timer_ms = 0.0;
        let gain = score_gain(state.combo_count);
        state.score += gain;

        hud.write(HudEvent::Score(state.score));
        hud.write(HudEvent::EnemiesLeft(waves.enemies_left()));
        if state.combo_count > 1 {
            hud.write(HudEvent::Combo(state.combo_count));
        }
        effects.write(EffectEvent::ExplodeAt { x: pos.x, y: pos.y });
        effects.write(EffectEvent::ScorePopup {
            x: pos.x,
            y: pos.y,
            text: format!("+{gain}"),
        });
    }
}

/// System: kamikaze-контакты врагов с игроком
///
/// Враг гибнет от контакта всегда, даже при активном щите. Щит гасит
/// только урон.
#[allow(clippy::too_many_arguments)]
pub fn resolve_enemy_contacts(
    mut commands: Commands,
    mut contacts: EventReader<EnemyTouchedPlayer>,
    enemies: Query<&Transform, With<Enemy>>,
    player: Query<&Transform, With<PlayerShip>>,
    mut state: ResMut<GameState>,
    mut waves: ResMut<WaveState>,
    buffs: Res<BuffState>,
    mut hud: EventWriter<HudEvent>,
    mut effects: EventWriter<EffectEvent>,
) {
    if state.is_game_over {
        return;
    }
    let mut destroyed: Vec<Entity> = Vec::new();

    for contact in contacts.read() {
        if destroyed.contains(&contact.enemy) {
            continue;
        }
        let Ok(transform) = enemies.get(contact.enemy) else {
            continue;
        };
        let pos = transform.translation.truncate();
        destroyed.push(contact.enemy);
        commands.entity(contact.enemy).despawn();
        waves.enemies_destroyed += 1;

        hud.write(HudEvent::EnemiesLeft(waves.enemies_left()));
        effects.write(EffectEvent::ExplodeAt { x: pos.x, y: pos.y });

        if buffs.shield {
            if let Ok(player_transform) = player.single() {
                effects.write(EffectEvent::ShieldFlare {
                    x: player_transform.translation.x,
                    y: player_transform.translation.y,
                });
            }
            continue;
        }

        if state.apply_damage() {
            hud.write(HudEvent::Health {
                current: state.health,
                max: state.max_health,
            });
            effects.write(EffectEvent::FlashScreen {
                color: config::COLOR_DANGER,
                alpha: 0.3,
                duration_ms: 200,
            });
            effects.write(EffectEvent::ShakeCamera {
                duration_ms: 150,
                intensity: 0.01,
            });
            logger::log_debug(&format!("Player hit, health {}", state.health));
        }
    }
}

/// System: вражеские пули против игрока
pub fn resolve_enemy_bullet_hits(
    mut hits: EventReader<EnemyBulletHitPlayer>,
    player: Query<&Transform, With<PlayerShip>>,
    mut enemy_bullets: ResMut<EnemyBullets>,
    mut state: ResMut<GameState>,
    buffs: Res<BuffState>,
    mut hud: EventWriter<HudEvent>,
    mut effects: EventWriter<EffectEvent>,
) {
    if state.is_game_over {
        return;
    }
    for hit in hits.read() {
        if !enemy_bullets.0.deactivate(hit.slot) {
            continue;
        }

        if buffs.shield {
            if let Ok(player_transform) = player.single() {
                effects.write(EffectEvent::ShieldFlare {
                    x: player_transform.translation.x,
                    y: player_transform.translation.y,
                });
            }
            continue;
        }

        if state.apply_damage() {
            hud.write(HudEvent::Health {
                current: state.health,
                max: state.max_health,
            });
            effects.write(EffectEvent::FlashScreen {
                color: config::COLOR_DANGER,
                alpha: 0.3,
                duration_ms: 200,
            });
            logger::log_debug(&format!("Player shot, health {}", state.health));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_scoring_formula() {
        assert_eq!(score_gain(1), 10);
        assert_eq!(score_gain(2), 15);
        assert_eq!(score_gain(3), 20);
        assert_eq!(score_gain(7), 40);
        // Защита от нулевого комбо
        assert_eq!(score_gain(0), 10);
    }
}
