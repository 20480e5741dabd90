//! Ranged combat module
//!
//! Core (engine-agnostic, через traits из `world`/`hooks`):
//! - WeaponController: ammo, cooldown, 3-phase reload, spawn transaction
//! - Projectile: flight, crit/knockback/splash, pierce, ricochet
//! - ProjectileArena: fixed-capacity pool с generation handles
//!
//! ECS слой:
//! - CombatSnapshot: геометрия сцены на tick (из Transform + HitSphere/StaticSurface)
//! - systems: refresh snapshot → weapons → projectiles → apply effects

use bevy::prelude::*;

pub mod arena;
pub mod components;
pub mod controller;
pub mod events;
pub mod hooks;
pub mod projectile;
pub mod snapshot;
pub mod systems;
pub mod world;

#[cfg(test)]
mod projectile_tests;
#[cfg(test)]
pub(crate) mod test_support;

// Re-export основных типов
pub use arena::ProjectileArena;
pub use components::*;
pub use controller::{apply_spread, resolve_spawn_point, CombatEnv, WeaponController};
pub use events::{
    AmmoChanged, CombatEventWriters, CritOccurred, DamageDealt, EnemyDied, ReloadFinished, ReloadProgress,
    ReloadStarted, ShotFired,
};
pub use hooks::{CombatHooks, CombatNotification, NoopHooks, NotificationLog};
pub use projectile::{ContactOutcome, Projectile};
pub use snapshot::{CombatSnapshot, DamageRecord, EnemyEffects};
pub use world::{CombatWorld, Contact, ContactKind, EnemyCapability, ProjectileHandle, ProjectilePool, RayHit, SpatialQuery};

use crate::config::CombatTuning;
use crate::stats::StatBonuses;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. refresh_combat_snapshot — геометрия сцены на этот tick
/// 2. tick_weapons — cooldown, reload, fire (spawn в pool)
/// 3. advance_projectiles — полёт + hit pipeline, reclaim слотов
/// 4. apply_combat_effects — урон/knockback → Health, Dead
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Ресурсы (SimulationPlugin может вставить свои до нас — не перетираем)
        app.init_resource::<CombatTuning>()
            .init_resource::<CombatGate>()
            .init_resource::<StatBonuses>()
            .init_resource::<CombatSnapshot>();

        if !app.world().contains_resource::<ProjectileArena>() {
            let capacity = app.world().resource::<CombatTuning>().pool_capacity;
            app.insert_resource(ProjectileArena::new(capacity));
        }
        if !app.world().contains_resource::<crate::DeterministicRng>() {
            app.insert_resource(crate::DeterministicRng::new(crate::DEFAULT_SEED));
        }

        app.register_type::<WeaponController>()
            .register_type::<WeaponInput>()
            .register_type::<WeaponAim>()
            .register_type::<Health>()
            .register_type::<HitSphere>()
            .register_type::<StaticSurface>()
            .register_type::<KnockbackImpulse>();

        // Регистрация событий
        app.add_event::<AmmoChanged>()
            .add_event::<ReloadProgress>()
            .add_event::<ShotFired>()
            .add_event::<ReloadStarted>()
            .add_event::<ReloadFinished>()
            .add_event::<CritOccurred>()
            .add_event::<DamageDealt>()
            .add_event::<EnemyDied>();

        app.add_systems(
            FixedUpdate,
            (
                systems::refresh_combat_snapshot,
                systems::tick_weapons,
                systems::advance_projectiles,
                systems::apply_combat_effects,
            )
                .chain(), // Последовательное выполнение
        );
    }
}
