//! Combat events (HUD, audio, analytics подписываются на них).

use bevy::prelude::*;

use crate::combat::hooks::CombatNotification;

#[derive(Event, Debug, Clone, PartialEq)]
pub struct AmmoChanged {
    pub weapon: Entity,
    pub current: u32,
    pub max: u32,
}

/// Reload bar: `active = false` once the reload is over (or interrupted).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ReloadProgress {
    pub weapon: Entity,
    pub fraction: f32,
    pub active: bool,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ShotFired {
    pub weapon: Entity,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ReloadStarted {
    pub weapon: Entity,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ReloadFinished {
    pub weapon: Entity,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct CritOccurred {
    pub owner: Entity,
    pub target: Entity,
    pub damage: f32,
}

/// Damage actually applied to `Health` (after capping by remaining health).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub target: Entity,
    pub amount: f32,
    pub is_crit: bool,
    /// Non-zero for explosive direct hits (VFX radius)
    pub aoe_radius: f32,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct EnemyDied {
    pub entity: Entity,
}

/// All notification writers, so systems can forward a `NotificationLog` in one call.
#[derive(bevy::ecs::system::SystemParam)]
pub struct CombatEventWriters<'w> {
    pub ammo: EventWriter<'w, AmmoChanged>,
    pub reload_progress: EventWriter<'w, ReloadProgress>,
    pub shot: EventWriter<'w, ShotFired>,
    pub reload_started: EventWriter<'w, ReloadStarted>,
    pub reload_finished: EventWriter<'w, ReloadFinished>,
    pub crit: EventWriter<'w, CritOccurred>,
}

impl CombatEventWriters<'_> {
    pub fn forward(&mut self, weapon: Entity, notifications: impl IntoIterator<Item = CombatNotification>) {
        for notification in notifications {
            match notification {
                CombatNotification::AmmoChanged { current, max } => {
                    self.ammo.write(AmmoChanged { weapon, current, max });
                }
                CombatNotification::ReloadProgress { fraction, active } => {
                    self.reload_progress.write(ReloadProgress {
                        weapon,
                        fraction,
                        active,
                    });
                }
                CombatNotification::ShotFired => {
                    self.shot.write(ShotFired { weapon });
                }
                CombatNotification::ReloadStarted => {
                    self.reload_started.write(ReloadStarted { weapon });
                }
                CombatNotification::ReloadFinished => {
                    self.reload_finished.write(ReloadFinished { weapon });
                }
                CombatNotification::CritOccurred { owner, target, damage } => {
                    self.crit.write(CritOccurred { owner, target, damage });
                }
            }
        }
    }
}
