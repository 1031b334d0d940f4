//! Интеграционные тесты боевых правил
//!
//! Инварианты урона, щита, комбо и game-over перехода на живом App
//! с ручным продвижением времени.

use bevy::prelude::*;
use defender_simulation::*;

const TICK_MS: f64 = 1000.0 / 60.0;

fn player_position(app: &mut App) -> Vec2 {
    app.world_mut()
        .query_filtered::<&Transform, With<PlayerShip>>()
        .single(app.world())
        .expect("player exists")
        .translation
        .truncate()
}

fn spawn_enemy_at(app: &mut App, kind: EnemyKind, pos: Vec2) {
    app.world_mut()
        .spawn((Enemy { kind }, Transform::from_xyz(pos.x, pos.y, 0.0)));
}

fn live_enemies(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<(), With<Enemy>>()
        .iter(app.world())
        .count()
}

#[test]
fn test_shield_gates_all_contact_damage() {
    let mut app = create_game_app(42);
    bootstrap(&mut app);
    step_ms(&mut app, TICK_MS);

    app.world_mut().resource_mut::<BuffState>().shield = true;
    let pos = player_position(&mut app);
    for _ in 0..100 {
        spawn_enemy_at(&mut app, EnemyKind::Grunt, pos);
    }
    step_ms(&mut app, TICK_MS);

    let state = app.world().resource::<GameState>();
    assert_eq!(state.health, 3, "shield absorbs every contact");
    assert!(!state.is_game_over);
    // Камикадзе гибнут и под щитом
    assert_eq!(live_enemies(&mut app), 0);

    // Без щита контакт снимает HP
    app.world_mut().resource_mut::<BuffState>().shield = false;
    let pos = player_position(&mut app);
    spawn_enemy_at(&mut app, EnemyKind::Grunt, pos);
    step_ms(&mut app, TICK_MS);
    assert_eq!(app.world().resource::<GameState>().health, 2);
}

#[test]
fn test_game_over_fires_exactly_once_with_score_at_that_instant() {
    let mut app = create_game_app(42);
    bootstrap(&mut app);
    step_ms(&mut app, TICK_MS);

    {
        let mut state = app.world_mut().resource_mut::<GameState>();
        state.health = 1;
        state.score = 70;
    }

    // Три контакта в одном кадре: health падает один раз до нуля
    let pos = player_position(&mut app);
    for _ in 0..3 {
        spawn_enemy_at(&mut app, EnemyKind::Grunt, pos);
    }
    step_ms(&mut app, TICK_MS);

    {
        let state = app.world().resource::<GameState>();
        assert_eq!(state.health, 0);
        assert!(state.is_game_over);
    }

    // Ещё контакты после game over ничего не меняют
    let pos = player_position(&mut app);
    spawn_enemy_at(&mut app, EnemyKind::Grunt, pos);
    step_ms(&mut app, TICK_MS);
    assert_eq!(app.world().resource::<GameState>().health, 0);

    // Handoff через 500 мс, ровно один, со score на момент смерти
    step_ms(&mut app, 600.0);
    step_ms(&mut app, 600.0);
    let game_overs: Vec<_> = app
        .world_mut()
        .resource_mut::<Events<SceneEvent>>()
        .drain()
        .filter(|e| matches!(e, SceneEvent::GameOver { .. }))
        .collect();
    assert_eq!(game_overs.len(), 1, "GameOver handoff must fire exactly once");
    match &game_overs[0] {
        SceneEvent::GameOver { score, .. } => assert_eq!(*score, 70),
        _ => unreachable!(),
    }
}

#[test]
fn test_heal_at_full_health_still_banners() {
    let mut app = create_game_app(42);
    bootstrap(&mut app);
    step_ms(&mut app, TICK_MS);

    app.world_mut().resource_mut::<GameState>().health = 5;
    let pos = player_position(&mut app);
    app.world_mut().spawn((
        PowerUp {
            kind: PowerUpKind::Heal,
        },
        Transform::from_xyz(pos.x, pos.y, 0.0),
    ));
    step_ms(&mut app, TICK_MS);

    // Числовое состояние не изменилось
    assert_eq!(app.world().resource::<GameState>().health, 5);

    // Баннер всё равно показан
    let banners: Vec<_> = app
        .world_mut()
        .resource_mut::<Events<HudEvent>>()
        .drain()
        .filter(|e| matches!(e, HudEvent::BuffText { text, .. } if text == "HEALTH RESTORED!"))
        .collect();
    assert_eq!(banners.len(), 1);
}

#[test]
fn test_speed_boost_is_a_latch_not_a_counter() {
    let mut app = create_game_app(42);
    bootstrap(&mut app);
    step_ms(&mut app, TICK_MS);

    let speed_of = |app: &mut App| {
        app.world_mut()
            .query_filtered::<&MoveSpeed, With<PlayerShip>>()
            .single(app.world())
            .expect("player exists")
            .0
    };
    assert_eq!(speed_of(&mut app), 220.0);

    // Первый подбор: ×1.5
    let pos = player_position(&mut app);
    app.world_mut().spawn((
        PowerUp {
            kind: PowerUpKind::Speed,
        },
        Transform::from_xyz(pos.x, pos.y, 0.0),
    ));
    step_ms(&mut app, TICK_MS);
    assert_eq!(speed_of(&mut app), 330.0);

    // Повторный подбор при активном буффе: длительность обновлена,
    // множитель НЕ компаундится
    let pos = player_position(&mut app);
    app.world_mut().spawn((
        PowerUp {
            kind: PowerUpKind::Speed,
        },
        Transform::from_xyz(pos.x, pos.y, 0.0),
    ));
    step_ms(&mut app, TICK_MS);
    assert_eq!(speed_of(&mut app), 330.0, "speed must not compound");

    // После истечения: revert ровно один раз
    step_ms(&mut app, 8100.0);
    assert_eq!(speed_of(&mut app), 220.0);
    assert!(!app.world().resource::<BuffState>().speed_boost);
}

#[test]
fn test_combo_scoring_and_reset() {
    let mut app = create_game_app(42);
    bootstrap(&mut app);
    step_ms(&mut app, TICK_MS);

    let kill_one = |app: &mut App| {
        let pos = Vec2::new(600.0, 300.0);
        spawn_enemy_at(app, EnemyKind::Grunt, pos);
        app.world_mut()
            .resource_mut::<PlayerBullets>()
            .0
            .fire(pos, 0.0, 500.0, 2000.0);
        step_ms(app, TICK_MS);
    };

    // Два быстрых убийства: 10 + 15
    kill_one(&mut app);
    assert_eq!(app.world().resource::<GameState>().score, 10);
    kill_one(&mut app);
    {
        let state = app.world().resource::<GameState>();
        assert_eq!(state.score, 25);
        assert_eq!(state.combo_count, 2);
    }

    // Больше 3000 мс без попаданий — комбо сбрасывается
    step_ms(&mut app, 3100.0);
    assert_eq!(app.world().resource::<GameState>().combo_count, 0);
    let clears = app
        .world_mut()
        .resource_mut::<Events<HudEvent>>()
        .drain()
        .filter(|e| matches!(e, HudEvent::ClearCombo))
        .count();
    assert_eq!(clears, 1);

    // Следующее убийство снова с базовых 10
    kill_one(&mut app);
    assert_eq!(app.world().resource::<GameState>().score, 35);
}

#[test]
fn test_stale_overlap_does_not_double_spend() {
    let mut app = create_game_app(42);
    bootstrap(&mut app);
    step_ms(&mut app, TICK_MS);

    // Две пули в одном враге за один тик: враг умирает один раз,
    // вторая пуля НЕ тратится
    let pos = Vec2::new(600.0, 300.0);
    spawn_enemy_at(&mut app, EnemyKind::Grunt, pos);
    {
        let mut bullets = app.world_mut().resource_mut::<PlayerBullets>();
        bullets.0.fire(pos, 0.0, 500.0, 2000.0);
        bullets.0.fire(pos, 0.0, 500.0, 2000.0);
    }
    step_ms(&mut app, TICK_MS);

    let state = app.world().resource::<GameState>();
    assert_eq!(state.score, 10, "one kill scored once");
    assert_eq!(state.combo_count, 1);
    assert_eq!(live_enemies(&mut app), 0);
    assert_eq!(
        app.world().resource::<PlayerBullets>().0.live_count(),
        1,
        "second bullet survives the stale overlap"
    );
}

#[test]
fn test_rapid_fire_cadence_is_literally_slower() {
    let shots_fired = |rapid: bool| -> usize {
        let session = SessionConfig {
            rapid_fire: rapid,
            ..Default::default()
        };
        let mut app = create_game_app_with_session(42, session);
        bootstrap(&mut app);

        // 3 секунды непрерывно зажатого выстрела, тики по 100 мс
        for _ in 0..30 {
            app.world_mut().send_event(FireIntent);
            step_ms(&mut app, 100.0);
        }
        app.world_mut()
            .resource_mut::<Events<EffectEvent>>()
            .drain()
            .filter(|e| matches!(e, EffectEvent::MuzzleFlash { .. }))
            .count()
    };

    let base = shots_fired(false);
    let rapid = shots_fired(true);
    assert_eq!(base, 7); // каждые 400 мс
    assert_eq!(rapid, 5); // каждые 600 мс
    assert!(rapid < base, "the 600ms upgrade fires slower than stock");
}
