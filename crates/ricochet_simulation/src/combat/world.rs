//! Collaborator seams of the combat core.
//!
//! Combat ничего не знает о сцене: геометрию, врагов и pool ему передают
//! снаружи через эти traits. В ECS их реализуют `CombatSnapshot` и
//! `ProjectileArena`, в тестах — fakes.

use bevy::prelude::*;

use crate::stats::ProjectileKind;

/// What a contact touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Firing entity itself (player/owner tag), always ignored
    Owner,
    /// Anything with the enemy capability
    Enemy,
    /// Ground, walls, props
    Surface,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub entity: Entity,
    pub kind: ContactKind,
    /// Impact point (sweeps) or closest point to the query center (overlaps)
    pub point: Vec3,
    /// Entity origin, used for distance ranking and ricochet aim
    pub center: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
    pub distance: f32,
}

/// Scene geometry queries.
pub trait SpatialQuery {
    /// First blocking hit along `direction` within `max_distance`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;

    /// Everything within `radius` of `center`, at most `max_results` entries.
    fn overlap_sphere(&self, center: Vec3, radius: f32, max_results: usize) -> Vec<Contact>;

    /// Everything a sphere of `radius` touches moving `from → to`,
    /// ordered by distance along the path.
    fn sweep_sphere(&self, from: Vec3, to: Vec3, radius: f32) -> Vec<Contact>;
}

/// Damage receiver (polymorphic over anything that can be hurt and pushed).
pub trait EnemyCapability {
    fn take_damage(&mut self, amount: f32, is_crit: bool, aoe_radius_for_vfx: f32);
    fn take_knockback(&mut self, direction: Vec3, force: f32);
}

/// Geometry + access to enemy capabilities.
pub trait CombatWorld: SpatialQuery {
    /// `None` = no enemy here (not an error).
    fn enemy(&mut self, entity: Entity) -> Option<&mut dyn EnemyCapability>;
}

/// Generation-checked handle to a pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectileHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Projectile pool provider.
pub trait ProjectilePool {
    /// `None` = pool exhausted or kind not registered.
    fn spawn(&mut self, kind: ProjectileKind, position: Vec3, orientation: Quat) -> Option<ProjectileHandle>;

    /// Live projectile behind a handle (`None` for stale handles).
    fn get_mut(&mut self, handle: ProjectileHandle) -> Option<&mut crate::combat::Projectile>;
}
