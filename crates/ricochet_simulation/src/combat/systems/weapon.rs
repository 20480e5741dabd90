//! Weapon systems (snapshot refresh + fire/reload tick).

use bevy::prelude::*;

use crate::combat::{
    CombatEnv, CombatEventWriters, CombatGate, CombatSnapshot, Dead, Enemy, HitSphere, NotificationLog,
    ProjectileArena, ProjectilePool, Shooter, StaticSurface, WeaponAim, WeaponController, WeaponInput,
};
use crate::config::CombatTuning;
use crate::stats::{StatBonusSource, StatBonuses};
use crate::DeterministicRng;

/// System: пересобираем CombatSnapshot из текущих Transform'ов
///
/// Мёртвые враги в snapshot не попадают (пули сквозь трупы).
pub fn refresh_combat_snapshot(
    mut snapshot: ResMut<CombatSnapshot>,
    enemies: Query<(Entity, &Transform, &HitSphere), (With<Enemy>, Without<Dead>)>,
    shooters: Query<(Entity, &Transform, &HitSphere), With<Shooter>>,
    surfaces: Query<(Entity, &Transform, &StaticSurface)>,
) {
    snapshot.clear();

    for (entity, transform, sphere) in enemies.iter() {
        snapshot.add_enemy(entity, transform.translation, sphere);
    }
    for (entity, transform, sphere) in shooters.iter() {
        snapshot.add_shooter(entity, transform.translation, sphere);
    }
    for (entity, transform, surface) in surfaces.iter() {
        snapshot.add_surface(entity, transform.translation, surface.half_extents);
    }

    snapshot.sort();
}

/// System: tick всех WeaponController
///
/// Notifications каждого оружия буферизуются в NotificationLog и
/// пересылаются в events с entity оружия.
pub fn tick_weapons(
    time: Res<Time>,
    gate: Res<CombatGate>,
    tuning: Res<CombatTuning>,
    bonuses: Res<StatBonuses>,
    mut snapshot: ResMut<CombatSnapshot>,
    mut arena: ResMut<ProjectileArena>,
    mut rng: ResMut<DeterministicRng>,
    mut weapons: Query<(Entity, &mut WeaponController, &WeaponInput, &WeaponAim)>,
    mut writers: CombatEventWriters,
) {
    let delta = time.delta_secs();
    let clock = time.elapsed_secs_f64();
    let suppressed = gate.suppressed();

    for (entity, mut weapon, input, aim) in weapons.iter_mut() {
        let mut notifications = NotificationLog::default();
        {
            let mut env = CombatEnv {
                bonuses: Some(&*bonuses as &dyn StatBonusSource),
                world: &mut *snapshot,
                pool: Some(&mut *arena as &mut dyn ProjectilePool),
                hooks: &mut notifications,
                tuning: &tuning,
                clock,
            };
            weapon.tick(entity, delta, input, aim, suppressed, &mut env, &mut rng.rng);
        }
        writers.forward(entity, notifications.drain());
    }
}
