//! Authored weapon profiles.
//!
//! `WeaponProfile` — immutable blueprint, задаётся при setup оружия и больше
//! не меняется. Все runtime-модификаторы приходят через `StatBonusSource`
//! и сворачиваются в `StatAggregator`.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

/// Pool kind a weapon spawns (projectile prefab category).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    #[default]
    Bullet,
    Pellet,
    Slug,
    Bolt,
}

impl ProjectileKind {
    pub const ALL: [ProjectileKind; 4] = [
        ProjectileKind::Bullet,
        ProjectileKind::Pellet,
        ProjectileKind::Slug,
        ProjectileKind::Bolt,
    ];
}

/// Weapon base stats (before bonuses).
#[derive(Debug, Clone, PartialEq, Reflect, Deserialize)]
#[serde(default)]
pub struct WeaponProfile {
    /// Урон одного попадания
    pub damage: f32,
    /// Секунды между выстрелами
    pub fire_interval: f32,
    pub magazine_size: u32,
    /// Дальность полёта (метры)
    pub range: f32,
    /// Скорость projectile (м/с), после бонусов clamp [1, 50]
    pub projectile_speed: f32,
    /// Полная длительность перезарядки (секунды)
    pub reload_time: f32,
    pub knockback: f32,
    /// Радиус splash урона (0 = без splash)
    pub aoe_radius: f32,
    /// Разброс (градусы, ± по двум осям)
    pub spread_angle: f32,
    pub projectile_count: u32,
    /// Сколько врагов можно пробить после первого попадания
    pub pierce_count: u32,
    pub ricochet_bounces: u32,
    /// [0, 1]
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    pub projectile_kind: ProjectileKind,
}

impl Default for WeaponProfile {
    fn default() -> Self {
        Self::pistol()
    }
}

impl WeaponProfile {
    /// Semi-auto pistol.
    pub fn pistol() -> Self {
        Self {
            damage: 10.0,
            fire_interval: 0.25,
            magazine_size: 8,
            range: 40.0,
            projectile_speed: 30.0,
            reload_time: 2.0,
            knockback: 0.0,
            aoe_radius: 0.0,
            spread_angle: 0.0,
            projectile_count: 1,
            pierce_count: 0,
            ricochet_bounces: 0,
            crit_chance: 0.05,
            crit_multiplier: 2.0,
            projectile_kind: ProjectileKind::Bullet,
        }
    }

    /// Pump shotgun: много pellets, широкий разброс, knockback.
    pub fn shotgun() -> Self {
        Self {
            damage: 6.0,
            fire_interval: 0.9,
            magazine_size: 6,
            range: 18.0,
            projectile_speed: 25.0,
            reload_time: 3.0,
            knockback: 4.0,
            aoe_radius: 0.0,
            spread_angle: 6.0,
            projectile_count: 8,
            pierce_count: 0,
            ricochet_bounces: 0,
            crit_chance: 0.0,
            crit_multiplier: 1.5,
            projectile_kind: ProjectileKind::Pellet,
        }
    }

    /// Heavy launcher: медленный, splash.
    pub fn launcher() -> Self {
        Self {
            damage: 40.0,
            fire_interval: 1.5,
            magazine_size: 3,
            range: 60.0,
            projectile_speed: 15.0,
            reload_time: 4.0,
            knockback: 8.0,
            aoe_radius: 4.0,
            spread_angle: 0.0,
            projectile_count: 1,
            pierce_count: 0,
            ricochet_bounces: 0,
            crit_chance: 0.1,
            crit_multiplier: 1.5,
            projectile_kind: ProjectileKind::Slug,
        }
    }

    /// Clamp authored values into their documented domains.
    ///
    /// Only crit chance has a hard authored range; everything else is
    /// guarded later by the aggregator fallbacks.
    pub fn validate(mut self) -> Self {
        self.crit_chance = if self.crit_chance.is_finite() {
            self.crit_chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }
}

/// Named weapon profiles (loaded from `[weapons.*]` in config).
#[derive(Resource, Debug, Clone, Default)]
pub struct WeaponCatalog {
    profiles: HashMap<String, WeaponProfile>,
}

impl WeaponCatalog {
    /// Built-in profiles, used when config has no `[weapons]` table.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        catalog.insert("pistol", WeaponProfile::pistol());
        catalog.insert("shotgun", WeaponProfile::shotgun());
        catalog.insert("launcher", WeaponProfile::launcher());
        catalog
    }

    pub fn insert(&mut self, name: impl Into<String>, profile: WeaponProfile) {
        self.profiles.insert(name.into(), profile.validate());
    }

    pub fn get(&self, name: &str) -> Option<&WeaponProfile> {
        self.profiles.get(name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
