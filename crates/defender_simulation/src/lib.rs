//! Nano Defender Simulation Core
//!
//! ECS-симуляция arcade shooter'а на Bevy 0.16 (strategic layer).
//! Rendering, HUD и input capture — tactical layer снаружи, общение
//! через events (см. `events`).
//!
//! Архитектура тика (FixedUpdate 60Hz), строгий порядок фаз:
//! часы → таймеры → scheduled tasks → wave flow → shop → спавн →
//! игрок → AI → пули → детект пересечений → резолверы → lifecycle.

use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod ai;
pub mod bullets;
pub mod combat;
pub mod components;
pub mod config;
pub mod events;
pub mod logger;
pub mod player;
pub mod powerups;
pub mod scheduler;
pub mod shop;
pub mod state;
pub mod waves;

// Re-export базовых типов для удобства
pub use bullets::{BulletPool, EnemyBullets, PlayerBullets};
pub use combat::{score_gain, BulletHitEnemy, EnemyBulletHitPlayer, EnemyTouchedPlayer, PowerUpTouched};
pub use components::*;
pub use config::SessionConfig;
pub use events::{
    AimTarget, EffectEvent, FireIntent, HudEvent, MoveInput, SceneEvent, ShopClosed,
};
pub use powerups::BuffState;
pub use scheduler::{ScheduledTask, SimClock, TaskQueue};
pub use shop::{PurchaseRequested, PurchaseResult, ShopLedger, UpgradeId, SHOP_CATALOG};
pub use state::{GameState, GameTimers};
pub use waves::{WaveStartRequested, WaveState};

/// Фазы симуляционного тика
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimStep {
    /// Часы и таймеры
    Clock,
    /// Дренаж scheduled-task queue
    Tasks,
    /// Wave flow и магазин
    Flow,
    /// Спавн врагов и power-up'ов
    Spawning,
    /// Движение и стрельба игрока
    Player,
    /// AI врагов
    Ai,
    /// Интеграция пуль
    Bullets,
    /// Детект пересечений
    Overlap,
    /// Резолверы последствий
    Resolve,
    /// Game over и конец волны
    Lifecycle,
}

/// Главный plugin симуляции
pub struct DefenderPlugin;

impl Plugin for DefenderPlugin {
    fn build(&self, app: &mut App) {
        // События на границе с presentation
        app.add_event::<events::FireIntent>()
            .add_event::<events::ShopClosed>()
            .add_event::<events::EffectEvent>()
            .add_event::<events::HudEvent>()
            .add_event::<events::SceneEvent>()
            .add_event::<waves::WaveStartRequested>()
            .add_event::<shop::PurchaseRequested>()
            .add_event::<shop::PurchaseResult>()
            .add_event::<combat::BulletHitEnemy>()
            .add_event::<combat::EnemyTouchedPlayer>()
            .add_event::<combat::EnemyBulletHitPlayer>()
            .add_event::<combat::PowerUpTouched>();

        // Ресурсы состояния (SessionConfig и DeterministicRng может
        // переопределить caller до добавления plugin'а)
        app.init_resource::<state::GameState>()
            .init_resource::<state::GameTimers>()
            .init_resource::<waves::WaveState>()
            .init_resource::<scheduler::SimClock>()
            .init_resource::<scheduler::TaskQueue>()
            .init_resource::<powerups::BuffState>()
            .init_resource::<bullets::PlayerBullets>()
            .init_resource::<bullets::EnemyBullets>()
            .init_resource::<shop::ShopLedger>()
            .init_resource::<events::MoveInput>()
            .init_resource::<events::AimTarget>()
            .init_resource::<config::SessionConfig>();

        // Порядок фаз строгий: резолверы видят пересечения этого же
        // тика, lifecycle видит despawn'ы резолверов
        app.configure_sets(
            FixedUpdate,
            (
                SimStep::Clock,
                SimStep::Tasks,
                SimStep::Flow,
                SimStep::Spawning,
                SimStep::Player,
                SimStep::Ai,
                SimStep::Bullets,
                SimStep::Overlap,
                SimStep::Resolve,
                SimStep::Lifecycle,
            )
                .chain(),
        );

        app.add_systems(
            Startup,
            (
                player::spawn_player,
                state::apply_session_upgrades,
                waves::request_first_wave,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (scheduler::advance_clock, state::advance_timers)
                .chain()
                .in_set(SimStep::Clock),
        );
        app.add_systems(FixedUpdate, state::drain_scheduler.in_set(SimStep::Tasks));
        app.add_systems(
            FixedUpdate,
            (
                waves::handle_shop_closed,
                waves::begin_requested_waves,
                shop::begin_shop_visits,
                shop::process_purchases,
                shop::end_shop_visits,
            )
                .chain()
                .in_set(SimStep::Flow),
        );
        app.add_systems(
            FixedUpdate,
            (waves::spawn_wave_enemies, powerups::spawn_powerups)
                .chain()
                .in_set(SimStep::Spawning),
        );
        app.add_systems(
            FixedUpdate,
            (player::apply_player_movement, player::fire_player_bullets)
                .chain()
                .in_set(SimStep::Player),
        );
        app.add_systems(
            FixedUpdate,
            (ai::pursue_player, ai::shooter_fire).chain().in_set(SimStep::Ai),
        );
        app.add_systems(FixedUpdate, bullets::advance_bullets.in_set(SimStep::Bullets));
        app.add_systems(FixedUpdate, combat::detect_overlaps.in_set(SimStep::Overlap));
        app.add_systems(
            FixedUpdate,
            (
                combat::resolve_bullet_enemy_hits,
                combat::resolve_enemy_contacts,
                combat::resolve_enemy_bullet_hits,
                powerups::collect_powerups,
            )
                .chain()
                .in_set(SimStep::Resolve),
        );
        app.add_systems(
            FixedUpdate,
            (state::check_game_over, waves::detect_wave_end)
                .chain()
                .in_set(SimStep::Lifecycle),
        );
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_game_app(seed: u64) -> App {
    create_game_app_with_session(seed, SessionConfig::default())
}

/// Вариант с явным session config (рестарт сцены с купленными апгрейдами)
pub fn create_game_app_with_session(seed: u64, session: SessionConfig) -> App {
    let mut app = App::new();
    logger::init_stdout_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(Time::<Fixed>::from_hz(60.0)) // 60Hz FixedUpdate
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(session)
        .add_plugins(DefenderPlugin);

    app
}

/// Прогоняет Startup-системы без первого update
/// (тесты двигают время руками, см. `step_ms`)
pub fn bootstrap(app: &mut App) {
    app.finish();
    app.cleanup();
    app.world_mut().run_schedule(Startup);
}

/// Продвигает симуляцию на `ms` одним FixedUpdate-тиком
///
/// Время двигается руками вместо wall clock, поэтому тесты
/// детерминированы с точностью до миллисекунды.
pub fn step_ms(app: &mut App, ms: f64) {
    let mut time = app.world_mut().resource_mut::<Time>();
    time.advance_by(Duration::from_secs_f64(ms / 1000.0));
    app.world_mut().run_schedule(FixedUpdate);
}

/// N тиков по 1/60 секунды
pub fn step_ticks(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        step_ms(app, 1000.0 / 60.0);
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортировка по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
