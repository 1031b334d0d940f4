//! Пулы пуль — fixed-capacity арены со slot reuse
//!
//! Пули не ECS entities: spawn/despawn каждые 400 мс создавал бы
//! allocation churn. Вместо этого — арена слотов с active-флагами и
//! free-list'ом: "deactivate, don't destroy". Исчерпание пула — это
//! backpressure, а не ошибка: выстрел молча не происходит.

use bevy::prelude::*;

use crate::config;
use crate::events::EffectEvent;
use crate::state::GameState;

/// Один слот арены
#[derive(Debug, Clone, Copy)]
pub struct BulletSlot {
    pub active: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    pub age_ms: f32,
    pub lifespan_ms: f32,
}

impl BulletSlot {
    fn inactive() -> Self {
        Self {
            active: false,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            age_ms: 0.0,
            lifespan_ms: 0.0,
        }
    }
}

/// Арена пуль: слоты + index-based free list, O(1) alloc/free
#[derive(Debug)]
pub struct BulletPool {
    slots: Vec<BulletSlot>,
    free: Vec<usize>,
    live: usize,
}

impl BulletPool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![BulletSlot::inactive(); capacity],
            // Пул выдаёт слоты с конца free-списка: [0] уйдёт последним
            free: (0..capacity).rev().collect(),
            live: 0,
        }
    }

    /// Активирует слот под пулю. None при исчерпании пула — caller
    /// молча дропает выстрел.
    pub fn fire(&mut self, pos: Vec2, bearing: f32, speed: f32, lifespan_ms: f32) -> Option<usize> {
        let i = self.free.pop()?;
        self.slots[i] = BulletSlot {
            active: true,
            pos,
            vel: Vec2::new(bearing.cos(), bearing.sin()) * speed,
            age_ms: 0.0,
            lifespan_ms,
        };
        self.live += 1;
        Some(i)
    }

    /// Возвращает слот в пул. false если слот уже неактивен —
    /// так резолверы отличают stale overlap от первого попадания.
    pub fn deactivate(&mut self, i: usize) -> bool {
        if i >= self.slots.len() || !self.slots[i].active {
            return false;
        }
        self.slots[i].active = false;
        self.live -= 1;
        self.free.push(i);
        true
    }

    pub fn is_active(&self, i: usize) -> bool {
        self.slots.get(i).is_some_and(|s| s.active)
    }

    pub fn slot(&self, i: usize) -> Option<&BulletSlot> {
        self.slots.get(i).filter(|s| s.active)
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Активные слоты с индексами
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &BulletSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
    }

    /// Интеграция движения + lifespan expiry за один проход
    fn advance(&mut self, dt_secs: f32) {
        let dt_ms = dt_secs * 1000.0;
        for i in 0..self.slots.len() {
            let slot = &mut self.slots[i];
            if !slot.active {
                continue;
            }
            slot.pos += slot.vel * dt_secs;
            slot.age_ms += dt_ms;
            if slot.age_ms > slot.lifespan_ms {
                slot.active = false;
                self.live -= 1;
                self.free.push(i);
            }
        }
    }

    pub fn clear(&mut self) {
        let capacity = self.slots.len();
        self.slots.fill(BulletSlot::inactive());
        self.free = (0..capacity).rev().collect();
        self.live = 0;
    }
}

/// Пул пуль игрока
#[derive(Resource, Debug)]
pub struct PlayerBullets(pub BulletPool);

impl Default for PlayerBullets {
    fn default() -> Self {
        Self(BulletPool::with_capacity(config::PLAYER_BULLET_CAP))
    }
}

/// Пул пуль shooter-врагов
#[derive(Resource, Debug)]
pub struct EnemyBullets(pub BulletPool);

impl Default for EnemyBullets {
    fn default() -> Self {
        Self(BulletPool::with_capacity(config::ENEMY_BULLET_CAP))
    }
}

/// System: интеграция обоих пулов
pub fn advance_bullets(
    time: Res<Time>,
    state: Res<GameState>,
    mut player_bullets: ResMut<PlayerBullets>,
    mut enemy_bullets: ResMut<EnemyBullets>,
) {
    if state.is_game_over {
        return;
    }
    let dt = time.delta_secs();
    player_bullets.0.advance(dt);
    enemy_bullets.0.advance(dt);
}

/// Выстрел одной пули игрока + muzzle flash.
/// Тихо дропается при исчерпании пула.
pub fn fire_player_bullet(
    pool: &mut BulletPool,
    origin: Vec2,
    bearing: f32,
    effects: &mut EventWriter<EffectEvent>,
) -> bool {
    match pool.fire(origin, bearing, config::BULLET_SPEED, config::BULLET_LIFESPAN_MS) {
        Some(_) => {
            effects.write(EffectEvent::MuzzleFlash { x: origin.x, y: origin.y });
            true
        }
        None => false,
    }
}
