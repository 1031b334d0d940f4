//! Волны врагов: запуск, спавн, детект клира
//!
//! Жизненный цикл волны:
//! 1. `WaveStartRequested` → анонс-пауза 1.5 с (спавн стоит, бой идёт);
//! 2. спавн по одному врагу в секунду до квоты волны;
//! 3. последний враг волны уничтожен → `SceneEvent::WaveCleared` ровно
//!    один раз, через 2 с — `OpenShop`;
//! 4. `ShopClosed` → запрос следующей волны.

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::components::{Enemy, EnemyKind, ShooterGun};
use crate::config;
use crate::events::{EffectEvent, HudEvent, SceneEvent, ShopClosed};
use crate::logger;
use crate::scheduler::{ScheduledTask, SimClock, TaskQueue};
use crate::state::GameState;
use crate::DeterministicRng;

/// Состояние текущей волны
#[derive(Resource, Debug, Default)]
pub struct WaveState {
    pub current_wave: u32,
    pub enemies_to_spawn: u32,
    pub enemies_spawned: u32,
    pub enemies_destroyed: u32,
    pub wave_in_progress: bool,
    pub spawn_elapsed_ms: f32,
}

impl WaveState {
    /// Врагов в волне: базовая квота плюс линейный рост
    pub fn quota_for(wave: u32) -> u32 {
        config::WAVE_BASE_ENEMIES + wave * config::WAVE_ENEMIES_PER_WAVE
    }

    /// Врагов ещё осталось (не уничтожено) из квоты волны
    pub fn enemies_left(&self) -> u32 {
        self.enemies_to_spawn.saturating_sub(self.enemies_destroyed)
    }
}

/// Event: запрос старта волны N
#[derive(Event, Debug, Clone, Copy)]
pub struct WaveStartRequested {
    pub wave: u32,
}

/// Выбор варианта врага. Два независимых броска, поздний перекрывает
/// ранний: на глубоких волнах shooter съедает часть fast-вероятности.
pub fn roll_enemy_kind(rng: &mut ChaCha8Rng, wave: u32) -> EnemyKind {
    let mut kind = EnemyKind::Grunt;
    if wave > 2 && rng.gen_bool(config::FAST_ENEMY_CHANCE) {
        kind = EnemyKind::Fast;
    }
    if wave > 4 && rng.gen_bool(config::SHOOTER_ENEMY_CHANCE) {
        kind = EnemyKind::Shooter;
    }
    kind
}

/// Точка спавна за одной из четырёх границ экрана
pub fn roll_edge_spawn(rng: &mut ChaCha8Rng) -> Vec2 {
    let m = config::SPAWN_EDGE_MARGIN;
    match rng.gen_range(0..4u8) {
        0 => Vec2::new(rng.gen_range(0.0..config::ARENA_WIDTH), -m),
        1 => Vec2::new(rng.gen_range(0.0..config::ARENA_WIDTH), config::ARENA_HEIGHT + m),
        2 => Vec2::new(-m, rng.gen_range(0.0..config::ARENA_HEIGHT)),
        _ => Vec2::new(config::ARENA_WIDTH + m, rng.gen_range(0.0..config::ARENA_HEIGHT)),
    }
}

/// Startup: первая волна стартует сразу после бутстрапа
pub fn request_first_wave(mut requests: EventWriter<WaveStartRequested>) {
    requests.write(WaveStartRequested { wave: 1 });
}

/// System: старт запрошенной волны
#[allow(clippy::too_many_arguments)]
pub fn begin_requested_waves(
    mut requests: EventReader<WaveStartRequested>,
    mut waves: ResMut<WaveState>,
    mut state: ResMut<GameState>,
    clock: Res<SimClock>,
    mut queue: ResMut<TaskQueue>,
    mut hud: EventWriter<HudEvent>,
    mut effects: EventWriter<EffectEvent>,
) {
    for req in requests.read() {
        if state.is_game_over {
            continue;
        }
        waves.current_wave = req.wave;
        waves.enemies_to_spawn = WaveState::quota_for(req.wave);
        waves.enemies_spawned = 0;
        waves.enemies_destroyed = 0;
        waves.wave_in_progress = true;
        waves.spawn_elapsed_ms = 0.0;

        // Анонс-окно: спавн стоит, всё остальное живёт
        state.wave_pause = true;
        queue.schedule_in(&clock, config::WAVE_START_PAUSE_MS, ScheduledTask::EndWavePause);

        hud.write(HudEvent::Wave(req.wave));
        hud.write(HudEvent::EnemiesLeft(waves.enemies_to_spawn));
        effects.write(EffectEvent::FlashScreen {
            color: config::COLOR_PRIMARY,
            alpha: 0.3,
            duration_ms: 200,
        });
        effects.write(EffectEvent::ShakeCamera {
            duration_ms: 300,
            intensity: 0.01,
        });
        logger::log_info(&format!(
            "Wave {} started: {} enemies",
            req.wave, waves.enemies_to_spawn
        ));
    }
}

/// System: спавн врагов волны, один в секунду
pub fn spawn_wave_enemies(
    mut commands: Commands,
    time: Res<Time>,
    state: Res<GameState>,
    mut waves: ResMut<WaveState>,
    mut rng: ResMut<DeterministicRng>,
) {
    if state.is_game_over || state.wave_pause || !waves.wave_in_progress {
        return;
    }
    if waves.enemies_spawned >= waves.enemies_to_spawn {
        return;
    }

    waves.spawn_elapsed_ms += time.delta_secs() * 1000.0;
    while waves.spawn_elapsed_ms >= config::WAVE_SPAWN_INTERVAL_MS
        && waves.enemies_spawned < waves.enemies_to_spawn
    {
        waves.spawn_elapsed_ms -= config::WAVE_SPAWN_INTERVAL_MS;
        waves.enemies_spawned += 1;

        let kind = roll_enemy_kind(&mut rng.rng, waves.current_wave);
        let pos = roll_edge_spawn(&mut rng.rng);
        let mut spawned = commands.spawn((
            Enemy { kind },
            Transform::from_xyz(pos.x, pos.y, 0.0),
        ));
        if kind == EnemyKind::Shooter {
            spawned.insert(ShooterGun::default());
        }
        logger::log_debug(&format!(
            "Enemy spawned: {:?} ({}/{})",
            kind, waves.enemies_spawned, waves.enemies_to_spawn
        ));
    }
}

/// System: детект конца волны
///
/// Срабатывает ровно один раз на волну: квота заспавнена, живых врагов
/// нет. Стоит в тике после резолверов урона, так что despawn'ы этого же
/// тика уже видны.
pub fn detect_wave_end(
    mut state: ResMut<GameState>,
    mut waves: ResMut<WaveState>,
    live_enemies: Query<(), With<Enemy>>,
    clock: Res<SimClock>,
    mut queue: ResMut<TaskQueue>,
    mut scene: EventWriter<SceneEvent>,
    mut effects: EventWriter<EffectEvent>,
) {
    if state.is_game_over || !waves.wave_in_progress {
        return;
    }
    if waves.enemies_spawned < waves.enemies_to_spawn || !live_enemies.is_empty() {
        return;
    }

    waves.wave_in_progress = false;
    // Межволновое окно: пауза до анонса следующей волны
    state.wave_pause = true;
    scene.write(SceneEvent::WaveCleared {
        wave: waves.current_wave,
    });
    effects.write(EffectEvent::FlashScreen {
        color: config::COLOR_PRIMARY,
        alpha: 0.4,
        duration_ms: 300,
    });
    queue.schedule_in(&clock, config::WAVE_END_SHOP_DELAY_MS, ScheduledTask::OpenShop);
    logger::log_info(&format!("Wave {} cleared", waves.current_wave));
}

/// System: закрытие магазина запускает следующую волну
pub fn handle_shop_closed(
    mut closed: EventReader<ShopClosed>,
    waves: Res<WaveState>,
    mut requests: EventWriter<WaveStartRequested>,
) {
    for _ in closed.read() {
        requests.write(WaveStartRequested {
            wave: waves.current_wave + 1,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_wave_quota_grows_linearly() {
        assert_eq!(WaveState::quota_for(1), 8);
        assert_eq!(WaveState::quota_for(2), 11);
        assert_eq!(WaveState::quota_for(5), 20);
    }

    #[test]
    fn test_early_waves_are_grunts_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for wave in 1..=2 {
            for _ in 0..100 {
                assert_eq!(roll_enemy_kind(&mut rng, wave), EnemyKind::Grunt);
            }
        }
    }

    #[test]
    fn test_deep_waves_mix_variants() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut fast = 0;
        let mut shooter = 0;
        for _ in 0..500 {
            match roll_enemy_kind(&mut rng, 6) {
                EnemyKind::Fast => fast += 1,
                EnemyKind::Shooter => shooter += 1,
                EnemyKind::Grunt => {}
            }
        }
        // p(fast)≈0.4·0.7, p(shooter)≈0.3: оба варианта должны встречаться
        assert!(fast > 50, "fast variants: {fast}");
        assert!(shooter > 50, "shooter variants: {shooter}");
    }

    #[test]
    fn test_edge_spawn_is_offscreen() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let pos = roll_edge_spawn(&mut rng);
            let offscreen = pos.x < 0.0
                || pos.x > config::ARENA_WIDTH
                || pos.y < 0.0
                || pos.y > config::ARENA_HEIGHT;
            assert!(offscreen, "spawn inside arena: {pos:?}");
        }
    }
}
