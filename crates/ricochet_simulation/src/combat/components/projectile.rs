//! Projectile flight state.

use bevy::prelude::*;

use crate::stats::LaunchStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ProjectileStatus {
    /// In the pool (or never initialized)
    Inactive,
    Flying,
}

/// Everything a projectile needs to start flying.
#[derive(Debug, Clone)]
pub struct ProjectileLaunch {
    /// Firing entity (never damaged by its own projectile)
    pub owner: Entity,
    pub position: Vec3,
    pub direction: Vec3,
    pub stats: LaunchStats,
    /// Simulation clock at spawn (seconds)
    pub activated_at: f64,
}

/// Logical state of one pooled projectile.
///
/// Полностью перезаписывается в `Projectile::initialize`, ничего не
/// переживает reuse слота.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileState {
    pub owner: Entity,
    pub damage: f32,
    /// [1, 50]
    pub speed: f32,
    pub range: f32,
    /// Max extra enemies after the first hit
    pub pierce_budget: u32,
    /// Enemies pierced so far (resolved hits without ricochet)
    pub pierced: u32,
    pub ricochets_left: u32,
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    pub knockback: f32,
    pub aoe_radius: f32,
    pub start: Vec3,
    pub position: Vec3,
    /// Normalized
    pub forward: Vec3,
    pub traveled: f32,
    /// Enemies already damaged on this flight leg
    pub hit_history: Vec<Entity>,
    /// Entities overlapped last tick (collision-enter filter)
    pub touching: Vec<Entity>,
    pub activated_at: f64,
    /// Safety timeout countdown (seconds)
    pub lifetime_left: f32,
}

impl Default for ProjectileState {
    fn default() -> Self {
        Self {
            owner: Entity::PLACEHOLDER,
            damage: 0.0,
            speed: 1.0,
            range: 0.0,
            pierce_budget: 0,
            pierced: 0,
            ricochets_left: 0,
            crit_chance: 0.0,
            crit_multiplier: 1.0,
            knockback: 0.0,
            aoe_radius: 0.0,
            start: Vec3::ZERO,
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            traveled: 0.0,
            hit_history: Vec::new(),
            touching: Vec::new(),
            activated_at: 0.0,
            lifetime_left: 0.0,
        }
    }
}

impl ProjectileState {
    pub fn has_hit(&self, entity: Entity) -> bool {
        self.hit_history.contains(&entity)
    }

    /// Record a hit; `false` if the entity was already in this leg's history.
    pub fn record_hit(&mut self, entity: Entity) -> bool {
        if self.has_hit(entity) {
            return false;
        }
        self.hit_history.push(entity);
        true
    }
}
