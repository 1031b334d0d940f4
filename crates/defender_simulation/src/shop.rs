//! Магазин между волнами: каталог, кредиты, покупки
//!
//! UI магазина — tactical layer, правила покупки — здесь. Кредиты
//! визита — копия score на момент открытия: траты НЕ уменьшают игровой
//! score (историческое поведение, сохранено намеренно, см. DESIGN.md).
//! Владение апгрейдами переживает визиты в рамках сессии процесса.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::config::SessionConfig;
use crate::events::{HudEvent, SceneEvent};
use crate::logger;
use crate::state::GameState;

/// Позиции каталога — закрытый enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeId {
    TripleShot,
    SpeedBoost,
    Shield,
    MaxHealth,
    RapidFire,
}

pub struct ShopItem {
    pub id: UpgradeId,
    pub name: &'static str,
    pub description: &'static str,
    pub price: u32,
}

/// Каталог. Эффект при покупке есть только у MaxHealth и RapidFire;
/// остальные позиции продаются, но ничего не меняют (историческое
/// поведение, сохранено намеренно). Цена MaxHealth = 1 — тоже.
pub const SHOP_CATALOG: [ShopItem; 5] = [
    ShopItem {
        id: UpgradeId::TripleShot,
        name: "Triple Shot",
        description: "Shoot 3 bullets at once",
        price: 150,
    },
    ShopItem {
        id: UpgradeId::SpeedBoost,
        name: "Speed Boost",
        description: "Move faster permanently",
        price: 120,
    },
    ShopItem {
        id: UpgradeId::Shield,
        name: "Shield",
        description: "Start each wave with a shield",
        price: 200,
    },
    ShopItem {
        id: UpgradeId::MaxHealth,
        name: "Max Health +1",
        description: "Increase max health by 1",
        price: 1,
    },
    ShopItem {
        id: UpgradeId::RapidFire,
        name: "Rapid Fire",
        description: "Reduce reload time to 600ms",
        price: 180,
    },
];

pub fn catalog_item(id: UpgradeId) -> &'static ShopItem {
    SHOP_CATALOG
        .iter()
        .find(|item| item.id == id)
        .unwrap_or(&SHOP_CATALOG[0])
}

/// Event: запрос покупки (кнопка BUY в presentation)
#[derive(Event, Debug, Clone, Copy)]
pub struct PurchaseRequested {
    pub item: UpgradeId,
}

/// Event: исход покупки для presentation
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseResult {
    Purchased { item: UpgradeId, remaining: u32 },
    InsufficientCredits { item: UpgradeId },
    AlreadyOwned { item: UpgradeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased { remaining: u32 },
    InsufficientCredits,
    AlreadyOwned,
}

/// Состояние магазина: владение (на всю сессию) + кредиты визита
#[derive(Resource, Debug, Default)]
pub struct ShopLedger {
    owned: HashSet<UpgradeId>,
    pub credits: u32,
    pub open: bool,
}

impl ShopLedger {
    pub fn owns(&self, id: UpgradeId) -> bool {
        self.owned.contains(&id)
    }

    /// Чистая часть покупки: owned/credits без игровых эффектов
    pub fn try_purchase(&mut self, id: UpgradeId) -> PurchaseOutcome {
        if self.owned.contains(&id) {
            return PurchaseOutcome::AlreadyOwned;
        }
        let price = catalog_item(id).price;
        if self.credits < price {
            return PurchaseOutcome::InsufficientCredits;
        }
        self.credits -= price;
        self.owned.insert(id);
        PurchaseOutcome::Purchased {
            remaining: self.credits,
        }
    }
}

/// System: открытие визита по `SceneEvent::OpenShop`
pub fn begin_shop_visits(mut scenes: EventReader<SceneEvent>, mut ledger: ResMut<ShopLedger>) {
    for event in scenes.read() {
        if let SceneEvent::OpenShop { score } = event {
            ledger.credits = *score;
            ledger.open = true;
            logger::log_info(&format!("Shop opened, {} credits", score));
        }
    }
}

/// System: обработка запросов покупки
pub fn process_purchases(
    mut requests: EventReader<PurchaseRequested>,
    mut ledger: ResMut<ShopLedger>,
    mut session: ResMut<SessionConfig>,
    mut state: ResMut<GameState>,
    mut hud: EventWriter<HudEvent>,
    mut results: EventWriter<PurchaseResult>,
) {
    for request in requests.read() {
        if !ledger.open {
            continue;
        }
        let id = request.item;
        match ledger.try_purchase(id) {
            PurchaseOutcome::Purchased { remaining } => {
                apply_upgrade(id, &mut session, &mut state, &mut hud);
                results.write(PurchaseResult::Purchased { item: id, remaining });
                logger::log_info(&format!(
                    "Purchased {:?}, {} credits left",
                    id, remaining
                ));
            }
            PurchaseOutcome::InsufficientCredits => {
                results.write(PurchaseResult::InsufficientCredits { item: id });
            }
            PurchaseOutcome::AlreadyOwned => {
                results.write(PurchaseResult::AlreadyOwned { item: id });
            }
        }
    }
}

fn apply_upgrade(
    id: UpgradeId,
    session: &mut SessionConfig,
    state: &mut GameState,
    hud: &mut EventWriter<HudEvent>,
) {
    match id {
        UpgradeId::RapidFire => {
            session.rapid_fire = true;
        }
        UpgradeId::MaxHealth => {
            session.max_health_bonus += 1;
            state.max_health = session.max_health();
            // Живому игроку сразу +1 текущего HP, с clamp
            if !state.is_game_over {
                state.health = (state.health + 1).min(state.max_health);
            }
            hud.write(HudEvent::Health {
                current: state.health,
                max: state.max_health,
            });
        }
        // Продаются без эффекта
        UpgradeId::TripleShot | UpgradeId::SpeedBoost | UpgradeId::Shield => {}
    }
}

/// System: закрытие визита (кнопка CONTINUE)
pub fn end_shop_visits(
    mut closed: EventReader<crate::events::ShopClosed>,
    mut ledger: ResMut<ShopLedger>,
) {
    for _ in closed.read() {
        ledger.open = false;
    }
}
