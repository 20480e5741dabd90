//! Fixed-capacity projectile pool.
//!
//! Слоты переиспользуются: generation в handle отсекает stale handles после
//! reuse. Reclaim — только в `tick`, после того как projectile сам
//! деактивировался.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::hooks::CombatHooks;
use crate::combat::projectile::Projectile;
use crate::combat::world::{CombatWorld, ProjectileHandle, ProjectilePool};
use crate::config::CombatTuning;
use crate::stats::ProjectileKind;

#[derive(Debug, Clone)]
struct Slot {
    kind: ProjectileKind,
    generation: u32,
    in_use: bool,
    projectile: Projectile,
}

#[derive(Resource, Debug)]
pub struct ProjectileArena {
    slots: Vec<Slot>,
    /// Stack of free slot indices (top = next spawn)
    free: Vec<u32>,
    kinds: Vec<ProjectileKind>,
}

impl ProjectileArena {
    /// Pool with every projectile kind registered.
    pub fn new(capacity: usize) -> Self {
        let mut arena = Self::empty(capacity);
        for kind in ProjectileKind::ALL {
            arena.register_kind(kind);
        }
        arena
    }

    /// Pool without registered kinds (spawns fail until `register_kind`).
    pub fn empty(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                kind: ProjectileKind::default(),
                generation: 0,
                in_use: false,
                projectile: Projectile::default(),
            })
            .collect();
        let free = (0..capacity as u32).rev().collect();

        Self {
            slots,
            free,
            kinds: Vec::new(),
        }
    }

    pub fn register_kind(&mut self, kind: ProjectileKind) {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slots currently checked out (flying or awaiting reclaim).
    pub fn in_use_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.in_use && slot.projectile.is_flying())
            .count()
    }

    pub fn get(&self, handle: ProjectileHandle) -> Option<&Projectile> {
        let slot = self.slots.get(handle.index as usize)?;
        (slot.in_use && slot.generation == handle.generation).then_some(&slot.projectile)
    }

    pub fn kind_of(&self, handle: ProjectileHandle) -> Option<ProjectileKind> {
        let slot = self.slots.get(handle.index as usize)?;
        (slot.in_use && slot.generation == handle.generation).then_some(slot.kind)
    }

    /// Flying projectiles with their handles.
    pub fn iter_flying(&self) -> impl Iterator<Item = (ProjectileHandle, &Projectile)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.in_use && slot.projectile.is_flying())
            .map(|(index, slot)| {
                (
                    ProjectileHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    &slot.projectile,
                )
            })
    }

    /// Return a slot to the pool. Stale or repeated release is a no-op (`false`).
    pub fn release(&mut self, handle: ProjectileHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            return false;
        };
        if !slot.in_use || slot.generation != handle.generation {
            return false;
        }

        slot.projectile.deactivate();
        slot.in_use = false;
        self.free.push(handle.index);
        true
    }

    /// Advance every flying projectile, then reclaim the ones that stopped.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        delta: f32,
        tuning: &CombatTuning,
        world: &mut dyn CombatWorld,
        hooks: &mut dyn CombatHooks,
        rng: &mut R,
    ) {
        let Self { slots, free, .. } = self;

        for (index, slot) in slots.iter_mut().enumerate() {
            if !slot.in_use {
                continue;
            }

            slot.projectile.advance(delta, tuning, world, hooks, rng);

            if !slot.projectile.is_flying() {
                slot.in_use = false;
                free.push(index as u32);
            }
        }
    }
}

impl ProjectilePool for ProjectileArena {
    fn spawn(&mut self, kind: ProjectileKind, position: Vec3, orientation: Quat) -> Option<ProjectileHandle> {
        if !self.kinds.contains(&kind) {
            crate::logger::log_warning(&format!("⚠️ Projectile kind {:?} not registered in pool", kind));
            return None;
        }

        let Some(index) = self.free.pop() else {
            crate::logger::log_warning(&format!(
                "⚠️ Projectile pool exhausted ({} slots)",
                self.slots.len()
            ));
            return None;
        };

        let slot = &mut self.slots[index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.in_use = true;
        slot.kind = kind;
        slot.projectile.deactivate();
        slot.projectile.state.position = position;
        slot.projectile.state.forward = orientation * Vec3::NEG_Z;

        Some(ProjectileHandle {
            index,
            generation: slot.generation,
        })
    }

    fn get_mut(&mut self, handle: ProjectileHandle) -> Option<&mut Projectile> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        (slot.in_use && slot.generation == handle.generation).then_some(&mut slot.projectile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::world::ProjectilePool;

    #[test]
    fn test_spawn_until_exhausted() {
        let mut arena = ProjectileArena::new(2);

        let a = arena.spawn(ProjectileKind::Bullet, Vec3::ZERO, Quat::IDENTITY);
        let b = arena.spawn(ProjectileKind::Bullet, Vec3::ZERO, Quat::IDENTITY);
        let c = arena.spawn(ProjectileKind::Bullet, Vec3::ZERO, Quat::IDENTITY);

        assert!(a.is_some());
        assert!(b.is_some());
        assert!(c.is_none());
        assert_eq!(arena.in_use_count(), 2);
    }

    #[test]
    fn test_unregistered_kind_fails() {
        let mut arena = ProjectileArena::empty(4);
        assert!(arena.spawn(ProjectileKind::Slug, Vec3::ZERO, Quat::IDENTITY).is_none());

        arena.register_kind(ProjectileKind::Slug);
        assert!(arena.spawn(ProjectileKind::Slug, Vec3::ZERO, Quat::IDENTITY).is_some());
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut arena = ProjectileArena::new(1);
        let handle = arena
            .spawn(ProjectileKind::Bullet, Vec3::ZERO, Quat::IDENTITY)
            .expect("slot available");

        assert!(arena.release(handle));
        assert!(!arena.release(handle));
        assert_eq!(arena.in_use_count(), 0);
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut arena = ProjectileArena::new(1);
        let first = arena
            .spawn(ProjectileKind::Bullet, Vec3::ZERO, Quat::IDENTITY)
            .expect("slot available");
        arena.release(first);

        let second = arena
            .spawn(ProjectileKind::Pellet, Vec3::ZERO, Quat::IDENTITY)
            .expect("slot reused");

        assert!(arena.get_mut(first).is_none());
        assert!(arena.get_mut(second).is_some());
        assert_eq!(arena.kind_of(second), Some(ProjectileKind::Pellet));
        // Повторный release старого handle не трогает новый полёт
        assert!(!arena.release(first));
        assert_eq!(arena.in_use_count(), 1);
    }

    #[test]
    fn test_spawn_orientation_sets_forward() {
        let mut arena = ProjectileArena::new(1);
        let orientation = Quat::from_rotation_arc(Vec3::NEG_Z, Vec3::X);
        let handle = arena
            .spawn(ProjectileKind::Bullet, Vec3::new(1.0, 2.0, 3.0), orientation)
            .expect("slot available");

        let projectile = arena.get(handle).expect("live handle");
        assert!(!projectile.is_flying());
        assert_eq!(projectile.state.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(projectile.state.forward.abs_diff_eq(Vec3::X, 1e-5));
    }
}
