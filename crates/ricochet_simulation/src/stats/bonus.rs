//! Stat bonus source (progression → combat).
//!
//! Progression system владеет бонусами и меняет их когда угодно (pickup,
//! level up). Combat только читает: одно чтение = один consistent snapshot
//! значения, без torn writes.

use bevy::prelude::*;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Stat channels a bonus can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Damage,
    /// Stored as seconds-per-shot: positive bonus → shorter interval
    FireRate,
    ReloadSpeed,
    ProjectileCount,
    Pierce,
    Ricochet,
    Knockback,
    AoeRadius,
    ProjectileSpeed,
    MagazineSize,
    CritChance,
    CritDamage,
    /// Pass-through (no bonus channel)
    SpreadAngle,
    /// Pass-through (no bonus channel)
    Range,
}

impl StatKind {
    pub const ALL: [StatKind; 14] = [
        StatKind::Damage,
        StatKind::FireRate,
        StatKind::ReloadSpeed,
        StatKind::ProjectileCount,
        StatKind::Pierce,
        StatKind::Ricochet,
        StatKind::Knockback,
        StatKind::AoeRadius,
        StatKind::ProjectileSpeed,
        StatKind::MagazineSize,
        StatKind::CritChance,
        StatKind::CritDamage,
        StatKind::SpreadAngle,
        StatKind::Range,
    ];
}

/// External bonus provider. Missing entry = 0.
pub trait StatBonusSource: Send + Sync {
    fn bonus(&self, kind: StatKind) -> f32;
}

/// Absent progression system.
pub struct NoBonuses;

impl StatBonusSource for NoBonuses {
    fn bonus(&self, _kind: StatKind) -> f32 {
        0.0
    }
}

impl StatBonusSource for HashMap<StatKind, f32> {
    fn bonus(&self, kind: StatKind) -> f32 {
        self.get(&kind).copied().unwrap_or(0.0)
    }
}

/// Shared accumulated bonuses.
///
/// Clone = ещё один handle на те же данные (progression держит один,
/// combat resource — другой).
#[derive(Resource, Debug, Clone, Default)]
pub struct StatBonuses {
    inner: Arc<RwLock<HashMap<StatKind, f32>>>,
}

impl StatBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `amount` onto the current bonus.
    pub fn add(&self, kind: StatKind, amount: f32) {
        let mut map = self.inner.write();
        *map.entry(kind).or_insert(0.0) += amount;
    }

    pub fn set(&self, kind: StatKind, value: f32) {
        self.inner.write().insert(kind, value);
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Copy of all bonuses at one instant.
    pub fn snapshot(&self) -> HashMap<StatKind, f32> {
        self.inner.read().clone()
    }
}

impl StatBonusSource for StatBonuses {
    fn bonus(&self, kind: StatKind) -> f32 {
        self.inner.read().get(&kind).copied().unwrap_or(0.0)
    }
}
