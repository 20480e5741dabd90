//! Projectile simulation (one logical instance per pool slot).
//!
//! Flow за tick:
//! 1. safety timeout
//! 2. движение `position += forward * speed * dt`, range check
//! 3. swept contacts → hit pipeline (crit, knockback, splash, ricochet/pierce)
//!
//! Ricochet меняет `forward`, но новое направление влияет только на
//! движение следующего tick'а.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::components::{ProjectileLaunch, ProjectileState, ProjectileStatus};
use crate::combat::hooks::CombatHooks;
use crate::combat::world::{CombatWorld, Contact, ContactKind};
use crate::config::CombatTuning;
use crate::stats::{MAX_PROJECTILE_SPEED, MIN_PROJECTILE_SPEED};

/// What a single contact did to the projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Owner, already-hit enemy, or nothing damageable
    Ignored,
    /// Enemy damaged, projectile keeps flying on the same leg
    Pierced,
    /// Redirected toward a new target (new leg starts next tick)
    Ricocheted,
    /// Flight over
    Deactivated,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub status: ProjectileStatus,
    pub state: ProjectileState,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            status: ProjectileStatus::Inactive,
            state: ProjectileState::default(),
        }
    }
}

impl Projectile {
    pub fn is_flying(&self) -> bool {
        self.status == ProjectileStatus::Flying
    }

    /// Reset every field from the launch and start flying.
    ///
    /// Сразу после spawn проверяем overlap: если пуля родилась внутри врага,
    /// он получает обычное попадание (ровно один раз).
    pub fn initialize<R: Rng + ?Sized>(
        &mut self,
        launch: ProjectileLaunch,
        tuning: &CombatTuning,
        world: &mut dyn CombatWorld,
        hooks: &mut dyn CombatHooks,
        rng: &mut R,
    ) {
        // Переиспользуем аллокации векторов между reuse'ами слота
        let mut hit_history = std::mem::take(&mut self.state.hit_history);
        let mut touching = std::mem::take(&mut self.state.touching);
        hit_history.clear();
        touching.clear();

        let stats = launch.stats;
        self.state = ProjectileState {
            owner: launch.owner,
            damage: stats.damage,
            speed: stats.speed.clamp(MIN_PROJECTILE_SPEED, MAX_PROJECTILE_SPEED),
            range: stats.range,
            pierce_budget: stats.pierce,
            pierced: 0,
            ricochets_left: stats.ricochet,
            crit_chance: stats.crit_chance.max(0.0),
            crit_multiplier: stats.crit_multiplier,
            knockback: stats.knockback,
            aoe_radius: stats.aoe_radius,
            start: launch.position,
            position: launch.position,
            forward: launch.direction.normalize_or(Vec3::NEG_Z),
            traveled: 0.0,
            hit_history,
            touching,
            activated_at: launch.activated_at,
            lifetime_left: tuning.safety_timeout,
        };
        self.status = ProjectileStatus::Flying;

        let overlapping = world.overlap_sphere(
            launch.position,
            tuning.spawn_overlap_radius,
            tuning.max_overlap_results,
        );
        for contact in overlapping {
            if !self.is_flying() {
                break;
            }
            if contact.kind != ContactKind::Enemy {
                continue;
            }
            self.mark_touching(contact.entity);
            // Рикошет уже перенаправил снаряд и сбросил history, остальные overlap'ы не считаем
            if self.resolve_contact(&contact, tuning, world, hooks, rng) == ContactOutcome::Ricocheted {
                break;
            }
        }
    }

    /// One simulation tick. Returns the status after the tick.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        delta: f32,
        tuning: &CombatTuning,
        world: &mut dyn CombatWorld,
        hooks: &mut dyn CombatHooks,
        rng: &mut R,
    ) -> ProjectileStatus {
        if !self.is_flying() {
            return self.status;
        }

        self.state.lifetime_left -= delta;
        if self.state.lifetime_left <= 0.0 {
            crate::logger::log(&format!(
                "⏱️ Projectile safety timeout (owner: {:?}, traveled: {:.1}m)",
                self.state.owner, self.state.traveled
            ));
            self.deactivate();
            return self.status;
        }

        let from = self.state.position;
        let step = self.state.forward * self.state.speed * delta;
        let to = from + step;
        self.state.position = to;
        self.state.traveled += step.length();

        if self.state.traveled > self.state.range {
            crate::logger::log(&format!(
                "📏 Projectile out of range ({:.1}m, owner: {:?})",
                self.state.range, self.state.owner
            ));
            self.deactivate();
            return self.status;
        }

        let contacts = world.sweep_sphere(from, to, tuning.projectile_radius);
        let previously_touching = std::mem::take(&mut self.state.touching);

        for contact in contacts {
            if !self.state.touching.contains(&contact.entity) {
                self.state.touching.push(contact.entity);
            }
            // Collision-enter: контакт, который длится с прошлого tick'а, не резолвим
            if previously_touching.contains(&contact.entity) {
                continue;
            }

            match self.resolve_contact(&contact, tuning, world, hooks, rng) {
                ContactOutcome::Ricocheted | ContactOutcome::Deactivated => break,
                ContactOutcome::Ignored | ContactOutcome::Pierced => {}
            }
        }

        self.status
    }

    /// Hit-resolution pipeline for one contact.
    pub fn resolve_contact<R: Rng + ?Sized>(
        &mut self,
        contact: &Contact,
        tuning: &CombatTuning,
        world: &mut dyn CombatWorld,
        hooks: &mut dyn CombatHooks,
        rng: &mut R,
    ) -> ContactOutcome {
        if !self.is_flying() || contact.entity == self.state.owner {
            return ContactOutcome::Ignored;
        }

        match contact.kind {
            ContactKind::Owner => ContactOutcome::Ignored,
            ContactKind::Enemy => self.resolve_enemy_hit(contact, tuning, world, hooks, rng),
            ContactKind::Surface => self.resolve_surface_hit(contact, tuning, world),
        }
    }

    fn resolve_enemy_hit<R: Rng + ?Sized>(
        &mut self,
        contact: &Contact,
        tuning: &CombatTuning,
        world: &mut dyn CombatWorld,
        hooks: &mut dyn CombatHooks,
        rng: &mut R,
    ) -> ContactOutcome {
        let target = contact.entity;
        if self.state.has_hit(target) {
            return ContactOutcome::Ignored;
        }

        let is_crit = self.state.crit_chance > 0.0 && rng.gen::<f32>() < self.state.crit_chance;
        let damage = if is_crit {
            self.state.damage * self.state.crit_multiplier
        } else {
            self.state.damage
        };

        {
            let Some(enemy) = world.enemy(target) else {
                return ContactOutcome::Ignored;
            };
            enemy.take_damage(damage, is_crit, self.state.aoe_radius);
            if self.state.knockback > 0.0 {
                enemy.take_knockback(self.state.forward, self.state.knockback);
            }
        }
        self.state.record_hit(target);

        if is_crit {
            hooks.crit_occurred(self.state.owner, target, damage);
        }

        crate::logger::log(&format!(
            "🎯 Projectile hit {:?}: {:.1} dmg{} (pierced {}/{}, ricochets left {})",
            target,
            damage,
            if is_crit { " CRIT" } else { "" },
            self.state.pierced,
            self.state.pierce_budget,
            self.state.ricochets_left
        ));

        if self.state.aoe_radius > 0.0 {
            self.apply_splash(contact.point, target, tuning, world);
        }

        if self.state.ricochets_left > 0 && self.try_ricochet(contact.point, Some(target), tuning, world) {
            return ContactOutcome::Ricocheted;
        }

        self.state.pierced += 1;
        if self.state.pierced > self.state.pierce_budget {
            self.deactivate();
            return ContactOutcome::Deactivated;
        }
        ContactOutcome::Pierced
    }

    fn resolve_surface_hit(
        &mut self,
        contact: &Contact,
        tuning: &CombatTuning,
        world: &mut dyn CombatWorld,
    ) -> ContactOutcome {
        if self.state.ricochets_left > 0 && self.try_ricochet(contact.point, None, tuning, world) {
            return ContactOutcome::Ricocheted;
        }

        crate::logger::log(&format!(
            "🧱 Projectile stopped by surface {:?} at {:?}",
            contact.entity, contact.point
        ));
        self.deactivate();
        ContactOutcome::Deactivated
    }

    /// Splash: fixed fraction of base damage, never crit, no secondary VFX radius.
    fn apply_splash(&mut self, center: Vec3, direct_target: Entity, tuning: &CombatTuning, world: &mut dyn CombatWorld) {
        let splash_damage = self.state.damage * tuning.splash_fraction;
        let nearby = world.overlap_sphere(center, self.state.aoe_radius, tuning.max_overlap_results);

        for contact in nearby {
            if contact.kind != ContactKind::Enemy
                || contact.entity == direct_target
                || contact.entity == self.state.owner
            {
                continue;
            }
            if let Some(enemy) = world.enemy(contact.entity) {
                enemy.take_damage(splash_damage, false, 0.0);
            }
        }
    }

    /// Redirect toward the nearest enemy around `origin` (excluding `exclude`).
    ///
    /// Returns `false` (and changes nothing) when no candidate qualifies.
    fn try_ricochet(
        &mut self,
        origin: Vec3,
        exclude: Option<Entity>,
        tuning: &CombatTuning,
        world: &mut dyn CombatWorld,
    ) -> bool {
        let radius = tuning.ricochet_acquire_radius;
        let radius_sq = radius * radius;
        let owner = self.state.owner;

        let candidates = world.overlap_sphere(origin, radius, tuning.max_overlap_results);
        let best = candidates
            .iter()
            .filter(|c| c.kind == ContactKind::Enemy)
            .filter(|c| Some(c.entity) != exclude && c.entity != owner)
            .map(|c| (c, c.center.distance_squared(origin)))
            .filter(|(_, dist_sq)| *dist_sq <= radius_sq)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(c, _)| *c);

        let Some(next) = best else {
            return false;
        };

        let aim_point = next.center + Vec3::Y * tuning.torso_offset;
        self.state.ricochets_left -= 1;
        self.state.position = origin;
        self.state.forward = (aim_point - origin).normalize_or(self.state.forward);
        self.state.hit_history.clear();
        if let Some(left_behind) = exclude {
            self.state.hit_history.push(left_behind);
        }

        crate::logger::log(&format!(
            "↪️ Ricochet → {:?} (left: {})",
            next.entity, self.state.ricochets_left
        ));
        true
    }

    fn mark_touching(&mut self, entity: Entity) {
        if !self.state.touching.contains(&entity) {
            self.state.touching.push(entity);
        }
    }

    /// Stop flying and become pool-eligible. Idempotent.
    ///
    /// Returns `true` only for the call that actually deactivated.
    pub fn deactivate(&mut self) -> bool {
        if self.status == ProjectileStatus::Inactive {
            return false;
        }
        self.status = ProjectileStatus::Inactive;
        self.state.lifetime_left = 0.0;
        self.state.hit_history.clear();
        self.state.touching.clear();
        true
    }
}
