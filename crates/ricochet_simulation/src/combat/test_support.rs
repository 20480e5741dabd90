//! Shared fixtures for combat unit tests.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::combat::{CombatSnapshot, HitSphere, NotificationLog, Projectile, ProjectileLaunch};
use crate::config::CombatTuning;
use crate::stats::LaunchStats;

/// Firing entity in fixtures.
pub const OWNER: Entity = Entity::from_raw(1000);

/// Simulation step used across fixtures (exact in binary).
pub const DT: f32 = 0.125;

pub fn test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

pub fn enemy(id: u32) -> Entity {
    Entity::from_raw(id)
}

/// Default body: sphere r=0.5 on y=1 above the origin.
pub fn body() -> HitSphere {
    HitSphere::default()
}

/// Enemies standing on y=0 at the given x/z.
pub fn snapshot_with_enemies(enemies: &[(u32, f32, f32)]) -> CombatSnapshot {
    let mut snapshot = CombatSnapshot::default();
    for &(id, x, z) in enemies {
        snapshot.add_enemy(enemy(id), Vec3::new(x, 0.0, z), &body());
    }
    snapshot
}

pub fn base_stats() -> LaunchStats {
    LaunchStats {
        damage: 10.0,
        speed: 10.0,
        range: 100.0,
        crit_chance: 0.0,
        crit_multiplier: 2.0,
        pierce: 0,
        ricochet: 0,
        knockback: 0.0,
        aoe_radius: 0.0,
    }
}

/// Launch from chest height along -Z.
pub fn launch(stats: LaunchStats) -> ProjectileLaunch {
    ProjectileLaunch {
        owner: OWNER,
        position: Vec3::new(0.0, 1.0, 0.0),
        direction: Vec3::NEG_Z,
        stats,
        activated_at: 0.0,
    }
}

/// Projectile world for a single flight.
pub struct FlightRig {
    pub snapshot: CombatSnapshot,
    pub tuning: CombatTuning,
    pub hooks: NotificationLog,
    pub rng: ChaCha8Rng,
    pub projectile: Projectile,
}

impl FlightRig {
    pub fn new(snapshot: CombatSnapshot) -> Self {
        Self {
            snapshot,
            tuning: CombatTuning::default(),
            hooks: NotificationLog::default(),
            rng: test_rng(),
            projectile: Projectile::default(),
        }
    }

    pub fn fire(&mut self, launch: ProjectileLaunch) {
        self.projectile
            .initialize(launch, &self.tuning, &mut self.snapshot, &mut self.hooks, &mut self.rng);
    }

    pub fn step(&mut self, delta: f32) {
        self.projectile
            .advance(delta, &self.tuning, &mut self.snapshot, &mut self.hooks, &mut self.rng);
    }

    /// Ticks until the projectile stops; returns the tick count.
    pub fn run_until_stopped(&mut self, delta: f32, max_ticks: usize) -> usize {
        for tick in 1..=max_ticks {
            self.step(delta);
            if !self.projectile.is_flying() {
                return tick;
            }
        }
        panic!("projectile still flying after {} ticks", max_ticks);
    }

    pub fn damage(&self, id: u32) -> f32 {
        self.snapshot.total_damage(enemy(id))
    }
}
