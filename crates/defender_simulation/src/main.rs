//! Headless-прогон Nano Defender
//!
//! Запускает симуляцию без рендера: бот стоит в центре и стреляет
//! вверх. Полезно для smoke-прогонов детерминизма и профилирования.

use defender_simulation::{
    bootstrap, create_game_app, step_ticks, FireIntent, GameState, WaveState,
};

fn main() {
    let seed = 42;
    println!("Starting Nano Defender headless simulation (seed: {})", seed);

    let mut app = create_game_app(seed);
    bootstrap(&mut app);

    // 30 секунд игры по 60 тиков в секунду
    for second in 0..30 {
        app.world_mut().send_event(FireIntent);
        step_ticks(&mut app, 60);

        if second % 5 == 0 {
            let state = app.world().resource::<GameState>();
            let waves = app.world().resource::<WaveState>();
            println!(
                "t={:>2}s wave={} score={} health={} game_over={}",
                second, waves.current_wave, state.score, state.health, state.is_game_over
            );
        }
    }

    let state = app.world().resource::<GameState>();
    println!("Simulation complete, final score {}", state.score);
}
