//! Интеграционный тест игрового цикла
//!
//! Полный круг: старт волны → анонс-пауза → клир → магазин → покупка →
//! следующая волна. Время двигается руками, без wall clock.

use bevy::prelude::*;
use defender_simulation::*;

const TICK_MS: f64 = 1000.0 / 60.0;

fn drain_scene_events(app: &mut App) -> Vec<SceneEvent> {
    app.world_mut()
        .resource_mut::<Events<SceneEvent>>()
        .drain()
        .collect()
}

/// Helper: пометить текущую волну зачищенной (квота выполнена, живых нет)
fn force_wave_clear(app: &mut App) {
    let enemies: Vec<Entity> = app
        .world_mut()
        .query_filtered::<Entity, With<Enemy>>()
        .iter(app.world())
        .collect();
    for enemy in enemies {
        app.world_mut().despawn(enemy);
    }
    let mut waves = app.world_mut().resource_mut::<WaveState>();
    let quota = waves.enemies_to_spawn;
    waves.enemies_spawned = quota;
    waves.enemies_destroyed = quota;
}

#[test]
fn test_wave_cycle_through_shop() {
    let mut app = create_game_app(42);
    bootstrap(&mut app);

    // Тик 1: волна 1 стартует в анонс-паузе
    step_ms(&mut app, TICK_MS);
    {
        let waves = app.world().resource::<WaveState>();
        let state = app.world().resource::<GameState>();
        assert_eq!(waves.current_wave, 1);
        assert_eq!(waves.enemies_to_spawn, 8);
        assert!(waves.wave_in_progress);
        assert!(state.wave_pause);
    }

    // Пауза-анонс заканчивается через 1500 мс
    step_ms(&mut app, 1600.0);
    assert!(!app.world().resource::<GameState>().wave_pause);

    // Кредиты для магазина
    app.world_mut().resource_mut::<GameState>().score = 200;

    // Клир волны: WaveCleared ровно один раз
    force_wave_clear(&mut app);
    step_ms(&mut app, TICK_MS);
    step_ms(&mut app, TICK_MS);
    let cleared: Vec<_> = drain_scene_events(&mut app)
        .into_iter()
        .filter(|e| matches!(e, SceneEvent::WaveCleared { .. }))
        .collect();
    assert_eq!(cleared.len(), 1, "WaveCleared must fire exactly once");

    // Магазин открывается через 2000 мс после клира
    assert!(!app.world().resource::<ShopLedger>().open);
    step_ms(&mut app, 2100.0);
    {
        let ledger = app.world().resource::<ShopLedger>();
        assert!(ledger.open);
        assert_eq!(ledger.credits, 200);
    }

    // Покупка Rapid Fire (180): кредиты визита тратятся, score не трогаем
    app.world_mut().send_event(PurchaseRequested {
        item: UpgradeId::RapidFire,
    });
    step_ms(&mut app, TICK_MS);
    {
        let ledger = app.world().resource::<ShopLedger>();
        let session = app.world().resource::<SessionConfig>();
        let state = app.world().resource::<GameState>();
        assert!(ledger.owns(UpgradeId::RapidFire));
        assert_eq!(ledger.credits, 20);
        assert!(session.rapid_fire);
        assert_eq!(session.shoot_cooldown_ms(), 600.0);
        assert_eq!(state.score, 200, "game score is not reduced by purchases");
    }

    // CONTINUE → волна 2 с квотой 11
    app.world_mut().send_event(ShopClosed);
    step_ms(&mut app, TICK_MS);
    {
        let waves = app.world().resource::<WaveState>();
        let state = app.world().resource::<GameState>();
        let ledger = app.world().resource::<ShopLedger>();
        assert_eq!(waves.current_wave, 2);
        assert_eq!(waves.enemies_to_spawn, 11);
        assert!(state.wave_pause);
        assert!(!ledger.open);
    }
}

#[test]
fn test_wave_spawning_respects_pause_and_interval() {
    let mut app = create_game_app(7);
    bootstrap(&mut app);

    // Вся пауза-анонс: ни одного врага
    step_ms(&mut app, TICK_MS);
    step_ms(&mut app, 1400.0);
    let count = app
        .world_mut()
        .query_filtered::<(), With<Enemy>>()
        .iter(app.world())
        .count();
    assert_eq!(count, 0, "no spawns during announcement pause");

    // Через ~3.2 с после конца паузы — три врага (по одному в секунду)
    step_ms(&mut app, 200.0);
    for _ in 0..3 {
        step_ms(&mut app, 1000.0);
    }
    let waves = app.world().resource::<WaveState>();
    assert_eq!(waves.enemies_spawned, 3);
    assert_eq!(waves.enemies_left(), 8);
}

#[test]
fn test_max_health_purchase_heals_live_player() {
    let mut app = create_game_app(3);
    bootstrap(&mut app);
    step_ms(&mut app, TICK_MS);

    // Открытый визит с кредитами
    {
        let mut ledger = app.world_mut().resource_mut::<ShopLedger>();
        ledger.open = true;
        ledger.credits = 10;
    }
    app.world_mut().resource_mut::<GameState>().health = 2;

    app.world_mut().send_event(PurchaseRequested {
        item: UpgradeId::MaxHealth,
    });
    step_ms(&mut app, TICK_MS);

    let state = app.world().resource::<GameState>();
    let session = app.world().resource::<SessionConfig>();
    assert_eq!(session.max_health_bonus, 1);
    assert_eq!(state.max_health, 6);
    // Живой игрок получает +1 текущего HP сразу
    assert_eq!(state.health, 3);
}
