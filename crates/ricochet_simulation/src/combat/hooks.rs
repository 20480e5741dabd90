//! Presentation hooks (HUD, audio).
//!
//! Fire-and-forget: combat ничего не ждёт в ответ, все методы по умолчанию
//! no-op.

use bevy::prelude::*;

pub trait CombatHooks {
    fn ammo_changed(&mut self, _current: u32, _max: u32) {}
    fn reload_progress(&mut self, _fraction: f32, _active: bool) {}
    fn shot_fired(&mut self) {}
    fn reload_started(&mut self) {}
    fn reload_finished(&mut self) {}
    fn crit_occurred(&mut self, _owner: Entity, _target: Entity, _damage: f32) {}
}

/// Hooks that drop everything.
pub struct NoopHooks;

impl CombatHooks for NoopHooks {}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatNotification {
    AmmoChanged { current: u32, max: u32 },
    ReloadProgress { fraction: f32, active: bool },
    ShotFired,
    ReloadStarted,
    ReloadFinished,
    CritOccurred { owner: Entity, target: Entity, damage: f32 },
}

/// Buffers notifications in order; ECS systems drain it into events.
#[derive(Debug, Default)]
pub struct NotificationLog {
    pub entries: Vec<CombatNotification>,
}

impl NotificationLog {
    pub fn drain(&mut self) -> std::vec::Drain<'_, CombatNotification> {
        self.entries.drain(..)
    }

    pub fn count(&self, predicate: impl Fn(&CombatNotification) -> bool) -> usize {
        self.entries.iter().filter(|entry| predicate(entry)).count()
    }
}

impl CombatHooks for NotificationLog {
    fn ammo_changed(&mut self, current: u32, max: u32) {
        self.entries.push(CombatNotification::AmmoChanged { current, max });
    }

    fn reload_progress(&mut self, fraction: f32, active: bool) {
        self.entries.push(CombatNotification::ReloadProgress { fraction, active });
    }

    fn shot_fired(&mut self) {
        self.entries.push(CombatNotification::ShotFired);
    }

    fn reload_started(&mut self) {
        self.entries.push(CombatNotification::ReloadStarted);
    }

    fn reload_finished(&mut self) {
        self.entries.push(CombatNotification::ReloadFinished);
    }

    fn crit_occurred(&mut self, owner: Entity, target: Entity, damage: f32) {
        self.entries.push(CombatNotification::CritOccurred { owner, target, damage });
    }
}
