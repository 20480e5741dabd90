//! Damage application and death.

use bevy::prelude::*;

use crate::combat::{CombatSnapshot, DamageDealt, Dead, EnemyDied, Health, KnockbackImpulse};

/// System: применяем накопленные за tick эффекты к Health / KnockbackImpulse
///
/// Единственное место, где меняется `Health` врагов. При `current <= 0`
/// вешаем `Dead` (трупы остаются, но в snapshot больше не попадают).
pub fn apply_combat_effects(
    mut commands: Commands,
    mut snapshot: ResMut<CombatSnapshot>,
    mut targets: Query<(&mut Health, Option<&mut KnockbackImpulse>), Without<Dead>>,
    mut damage_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EnemyDied>,
) {
    for (entity, effects) in snapshot.drain_effects() {
        let Ok((mut health, knockback)) = targets.get_mut(entity) else {
            continue;
        };

        for hit in &effects.hits {
            if !health.is_alive() {
                break;
            }
            let applied = health.take_damage(hit.amount);
            damage_events.write(DamageDealt {
                target: entity,
                amount: applied,
                is_crit: hit.is_crit,
                aoe_radius: hit.aoe_radius,
            });
        }

        if effects.knockback != Vec3::ZERO {
            match knockback {
                Some(mut existing) => existing.impulse += effects.knockback,
                None => {
                    commands.entity(entity).insert(KnockbackImpulse {
                        impulse: effects.knockback,
                    });
                }
            }
        }

        if !health.is_alive() {
            commands.entity(entity).insert(Dead);
            died_events.write(EnemyDied { entity });
            crate::logger::log_info(&format!("💀 Enemy {:?} died", entity));
        }
    }
}
