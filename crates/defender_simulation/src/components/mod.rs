//! ECS components игровых entity
//!
//! Организация по доменам:
//! - actor: корабль игрока (PlayerShip, MoveSpeed)
//! - enemy: враги и их варианты (Enemy, EnemyKind, ShooterGun)
//! - powerup: бонусы на поле (PowerUp, PowerUpKind)
//!
//! Пули НЕ entity — они живут в fixed-capacity пулах (см. `bullets`).

pub mod actor;
pub mod enemy;
pub mod powerup;

// Re-exports для удобного импорта
pub use actor::*;
pub use enemy::*;
pub use powerup::*;
