//! Projectile flight system.

use bevy::prelude::*;

use crate::combat::{CombatEventWriters, CombatSnapshot, NotificationLog, ProjectileArena};
use crate::config::CombatTuning;
use crate::DeterministicRng;

/// System: двигаем все летящие снаряды пула, reclaim остановившихся
///
/// Crit notifications пересылаются с owner'ом снаряда как `weapon`.
pub fn advance_projectiles(
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    mut snapshot: ResMut<CombatSnapshot>,
    mut arena: ResMut<ProjectileArena>,
    mut rng: ResMut<DeterministicRng>,
    mut writers: CombatEventWriters,
) {
    let mut notifications = NotificationLog::default();

    arena.tick(
        time.delta_secs(),
        &tuning,
        &mut *snapshot,
        &mut notifications,
        &mut rng.rng,
    );

    for notification in notifications.drain() {
        if let crate::combat::CombatNotification::CritOccurred { owner, .. } = notification {
            writers.forward(owner, [notification]);
        }
    }
}
