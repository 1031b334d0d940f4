//! Power-up система: спавн по интервалу, подбор, баффы
//!
//! Истина о баффах живёт в `BuffState`, revert'ы — в scheduled-task
//! queue. Re-collect того же баффа снимает старый revert и ставит
//! новый: длительность обновляется, эффект не стакается.

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::combat::PowerUpTouched;
use crate::components::{MoveSpeed, PlayerShip, PowerUp, PowerUpKind, ALL_POWERUP_KINDS};
use crate::config;
use crate::events::HudEvent;
use crate::logger;
use crate::scheduler::{ScheduledTask, SimClock, TaskQueue};
use crate::state::{GameState, GameTimers};
use crate::DeterministicRng;

/// Активные баффы игрока
///
/// Speed — latch: множитель применяется к `MoveSpeed` ровно один раз
/// при включении и снимается ровно один раз при revert'е.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct BuffState {
    pub triple: bool,
    pub speed_boost: bool,
    pub shield: bool,
}

/// Равновероятный выбор вида и точки спавна внутри margin-прямоугольника
pub fn roll_powerup(rng: &mut ChaCha8Rng) -> (PowerUpKind, Vec2) {
    let kind = ALL_POWERUP_KINDS[rng.gen_range(0..ALL_POWERUP_KINDS.len())];
    let m = config::POWERUP_SPAWN_MARGIN;
    let pos = Vec2::new(
        rng.gen_range(m..config::ARENA_WIDTH - m),
        rng.gen_range(m..config::ARENA_HEIGHT - m),
    );
    (kind, pos)
}

/// System: спавн power-up'а раз в интервал
///
/// Работает и во время wave-паузы: подбор баффа в анонс-окне легален.
pub fn spawn_powerups(
    mut commands: Commands,
    state: Res<GameState>,
    mut timers: ResMut<GameTimers>,
    mut rng: ResMut<DeterministicRng>,
) {
    if state.is_game_over {
        return;
    }
    if timers.since_last_powerup_ms < config::POWERUP_SPAWN_INTERVAL_MS {
        return;
    }
    timers.since_last_powerup_ms = 0.0;

    let (kind, pos) = roll_powerup(&mut rng.rng);
    commands.spawn((
        PowerUp { kind },
        Transform::from_xyz(pos.x, pos.y, 0.0),
    ));
    logger::log_debug(&format!("Power-up spawned: {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y));
}

/// System: применение подобранных power-up'ов
#[allow(clippy::too_many_arguments)]
pub fn collect_powerups(
    mut commands: Commands,
    mut touched: EventReader<PowerUpTouched>,
    powerups: Query<&PowerUp>,
    mut state: ResMut<GameState>,
    mut buffs: ResMut<BuffState>,
    clock: Res<SimClock>,
    mut queue: ResMut<TaskQueue>,
    mut player_speed: Query<&mut MoveSpeed, With<PlayerShip>>,
    mut hud: EventWriter<HudEvent>,
) {
    // Два overlap-события по одному power-up'у в одном тике — один подбор
    let mut collected: Vec<Entity> = Vec::new();

    for ev in touched.read() {
        if collected.contains(&ev.power_up) {
            continue;
        }
        let Ok(power) = powerups.get(ev.power_up) else {
            continue;
        };
        let kind = power.kind;
        collected.push(ev.power_up);
        commands.entity(ev.power_up).despawn();

        match kind {
            PowerUpKind::Triple => {
                buffs.triple = true;
                queue.cancel_buff(kind);
                queue.schedule_in(&clock, kind.duration_ms(), ScheduledTask::ClearBuff(kind));
            }
            PowerUpKind::Speed => {
                // Latch: при активном бусте только продлеваем, множитель не трогаем
                if !buffs.speed_boost {
                    buffs.speed_boost = true;
                    if let Ok(mut speed) = player_speed.single_mut() {
                        speed.0 *= config::SPEED_BOOST_FACTOR;
                    }
                }
                queue.cancel_buff(kind);
                queue.schedule_in(&clock, kind.duration_ms(), ScheduledTask::ClearBuff(kind));
            }
            PowerUpKind::Shield => {
                buffs.shield = true;
                queue.cancel_buff(kind);
                queue.schedule_in(&clock, kind.duration_ms(), ScheduledTask::ClearBuff(kind));
            }
            PowerUpKind::Heal => {
                // Instant, без revert'а. Баннер показываем даже при полном HP.
                if state.heal_one() {
                    hud.write(HudEvent::Health {
                        current: state.health,
                        max: state.max_health,
                    });
                }
            }
        }

        hud.write(HudEvent::BuffText {
            text: kind.banner().to_string(),
            color: kind.banner_color(),
            duration_ms: kind.duration_ms() as u32,
        });
        logger::log_info(&format!("Power-up collected: {:?}", kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_roll_stays_inside_margin() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let (_, pos) = roll_powerup(&mut rng);
            assert!(pos.x >= config::POWERUP_SPAWN_MARGIN);
            assert!(pos.x <= config::ARENA_WIDTH - config::POWERUP_SPAWN_MARGIN);
            assert!(pos.y >= config::POWERUP_SPAWN_MARGIN);
            assert!(pos.y <= config::ARENA_HEIGHT - config::POWERUP_SPAWN_MARGIN);
        }
    }

    #[test]
    fn test_roll_is_deterministic() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(roll_powerup(&mut a), roll_powerup(&mut b));
        }
    }
}
