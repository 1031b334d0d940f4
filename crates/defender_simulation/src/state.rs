//! Глобальное состояние игры и orchestration-системы
//!
//! `GameState` мутируется только системами симуляции — резолверы
//! получают его как параметр и никогда не держат собственных копий
//! health/score. Решение о game over принимает ТОЛЬКО `check_game_over`:
//! резолверы урона лишь уменьшают health.

use bevy::prelude::*;

use crate::components::{MoveSpeed, PlayerShip, PowerUpKind};
use crate::config::{self, SessionConfig};
use crate::events::{EffectEvent, HudEvent, SceneEvent};
use crate::logger;
use crate::powerups::BuffState;
use crate::scheduler::{ScheduledTask, SimClock, TaskQueue};

/// Состояние игровой сессии
///
/// Инварианты:
/// - 0 ≤ health ≤ max_health
/// - is_game_over монотонен: false → true, обратно никогда
#[derive(Resource, Debug, Clone)]
pub struct GameState {
    pub score: u32,
    pub health: i32,
    pub max_health: i32,
    pub is_game_over: bool,
    /// Анонс-окно волны: wave spawning приостановлен,
    /// урон и power-up'ы продолжают работать
    pub wave_pause: bool,
    pub combo_count: u32,
    pub combo_timer_ms: f32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            health: config::PLAYER_INITIAL_HEALTH,
            max_health: config::PLAYER_BASE_MAX_HEALTH,
            is_game_over: false,
            wave_pause: false,
            combo_count: 0,
            combo_timer_ms: 0.0,
        }
    }
}

impl GameState {
    /// Урон игроку с clamp к нулю. Возвращает true если health реально
    /// уменьшился (щит проверяет caller).
    pub fn apply_damage(&mut self) -> bool {
        if self.health <= 0 {
            return false;
        }
        self.health -= 1;
        true
    }

    pub fn heal_one(&mut self) -> bool {
        if self.health < self.max_health {
            self.health += 1;
            true
        } else {
            false
        }
    }
}

/// Тикающие аккумуляторы orchestrator'а (мс с последнего события)
#[derive(Resource, Debug, Default)]
pub struct GameTimers {
    pub since_last_shot_ms: f32,
    pub since_last_powerup_ms: f32,
}

/// Startup: применяет session-апгрейды к свежему состоянию
pub fn apply_session_upgrades(session: Res<SessionConfig>, mut state: ResMut<GameState>) {
    state.max_health = session.max_health();
    state.health = state.health.min(state.max_health);
}

/// System: продвижение таймеров + combo reset
///
/// Порядок в тике: часы → таймеры → scheduler → всё остальное.
pub fn advance_timers(
    time: Res<Time>,
    mut state: ResMut<GameState>,
    mut timers: ResMut<GameTimers>,
    mut hud: EventWriter<HudEvent>,
) {
    if state.is_game_over {
        return;
    }
    let dt_ms = time.delta_secs() * 1000.0;
    timers.since_last_shot_ms += dt_ms;
    timers.since_last_powerup_ms += dt_ms;
    state.combo_timer_ms += dt_ms;

    if state.combo_timer_ms > config::COMBO_RESET_MS && state.combo_count > 0 {
        state.combo_count = 0;
        hud.write(HudEvent::ClearCombo);
    }
}

/// System: дренаж scheduled-task queue
///
/// Выполняется после продвижения часов и до wave/combat/power-up логики,
/// чтобы revert'ы баффов случались "раньше" событий текущего тика.
pub fn drain_scheduler(
    clock: Res<SimClock>,
    mut queue: ResMut<TaskQueue>,
    mut state: ResMut<GameState>,
    mut buffs: ResMut<BuffState>,
    session: Res<SessionConfig>,
    mut player_speed: Query<&mut MoveSpeed, With<PlayerShip>>,
    mut scene: EventWriter<SceneEvent>,
) {
    for task in queue.take_due(&clock) {
        match task {
            ScheduledTask::ClearBuff(PowerUpKind::Triple) => {
                buffs.triple = false;
                logger::log_debug("Buff expired: triple shot");
            }
            ScheduledTask::ClearBuff(PowerUpKind::Speed) => {
                // Latch: делим ровно один раз, только если буст был активен
                if buffs.speed_boost {
                    buffs.speed_boost = false;
                    if let Ok(mut speed) = player_speed.single_mut() {
                        speed.0 /= config::SPEED_BOOST_FACTOR;
                    }
                    logger::log_debug("Buff expired: speed boost");
                }
            }
            ScheduledTask::ClearBuff(PowerUpKind::Shield) => {
                buffs.shield = false;
                logger::log_debug("Buff expired: shield");
            }
            // Heal не имеет revert'а — его баннер гасит HUD сам
            ScheduledTask::ClearBuff(PowerUpKind::Heal) => {}
            ScheduledTask::EndWavePause => {
                state.wave_pause = false;
            }
            ScheduledTask::OpenShop => {
                if !state.is_game_over {
                    scene.write(SceneEvent::OpenShop { score: state.score });
                }
            }
            ScheduledTask::FinishGameOver => {
                scene.write(SceneEvent::GameOver {
                    score: state.score,
                    player_name: session.player_name.clone(),
                });
                logger::log_info(&format!(
                    "Game over handoff: score={} player={}",
                    state.score, session.player_name
                ));
            }
        }
    }
}

/// System: терминальный переход Playing → GameOver
///
/// Идемпотентен: health может падать дальше нуля в том же кадре от
/// нескольких overlap'ов, но переход срабатывает ровно один раз.
pub fn check_game_over(
    clock: Res<SimClock>,
    mut state: ResMut<GameState>,
    mut queue: ResMut<TaskQueue>,
    player: Query<&Transform, With<PlayerShip>>,
    mut effects: EventWriter<EffectEvent>,
) {
    if state.is_game_over || state.health > 0 {
        return;
    }
    state.is_game_over = true;

    // Отложенные wave-переходы больше не имеют смысла
    queue.cancel_wave_transitions();
    queue.schedule_in(&clock, config::GAME_OVER_HANDOFF_DELAY_MS, ScheduledTask::FinishGameOver);

    if let Ok(transform) = player.single() {
        effects.write(EffectEvent::ExplodeAt {
            x: transform.translation.x,
            y: transform.translation.y,
        });
    }
    effects.write(EffectEvent::FlashScreen {
        color: config::COLOR_DANGER,
        alpha: 0.5,
        duration_ms: 500,
    });
    effects.write(EffectEvent::ShakeCamera {
        duration_ms: 500,
        intensity: 0.03,
    });

    logger::log_info(&format!("Player destroyed, final score {}", state.score));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut state = GameState::default();
        state.health = 1;

        assert!(state.apply_damage());
        assert_eq!(state.health, 0);
        // Дальше нуля не уходим
        assert!(!state.apply_damage());
        assert_eq!(state.health, 0);
    }

    #[test]
    fn test_heal_clamps_at_max() {
        let mut state = GameState::default();
        assert_eq!(state.health, 3);

        assert!(state.heal_one());
        assert!(state.heal_one());
        assert_eq!(state.health, 5);
        // Полное здоровье: числовое состояние не меняется
        assert!(!state.heal_one());
        assert_eq!(state.health, 5);
    }
}
