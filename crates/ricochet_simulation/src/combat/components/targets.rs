//! Target-side components: кто может получить урон и обо что бьются пули.

use bevy::prelude::*;

/// Marker: hostile entity (has the enemy capability).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, HitSphere)]
pub struct Enemy;

/// Marker: shooter/player. Own projectiles pass through it.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Shooter;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Returns damage actually removed (capped by remaining health).
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let applied = amount.max(0.0).min(self.current);
        self.current -= applied;
        applied
    }
}

/// Spherical collision volume.
///
/// `Transform.translation` — ноги (origin), сфера висит на `center_height` выше.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct HitSphere {
    pub radius: f32,
    pub center_height: f32,
}

impl Default for HitSphere {
    fn default() -> Self {
        Self {
            radius: 0.5,
            center_height: 1.0,
        }
    }
}

impl HitSphere {
    pub fn center(&self, origin: Vec3) -> Vec3 {
        origin + Vec3::Y * self.center_height
    }
}

/// Static axis-aligned blocker (ground, wall) centred on `Transform.translation`.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct StaticSurface {
    pub half_extents: Vec3,
}

/// Accumulated knockback impulse, consumed by movement (не в этом crate).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct KnockbackImpulse {
    pub impulse: Vec3,
}

/// Marker: health reached 0.
#[derive(Component, Debug)]
pub struct Dead;
