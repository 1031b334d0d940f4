//! Корабль игрока

use bevy::prelude::*;

/// Marker: корабль игрока (ровно один на сессию)
#[derive(Component, Debug, Default)]
pub struct PlayerShip;

/// Текущая скорость перемещения (px/s)
///
/// Speed boost мутирует значение ×1.5 при активации и ÷1.5 при revert —
/// поэтому компонент отдельный, а не константа.
#[derive(Component, Debug, Clone, Copy)]
pub struct MoveSpeed(pub f32);

impl Default for MoveSpeed {
    fn default() -> Self {
        Self(crate::config::PLAYER_SPEED)
    }
}
