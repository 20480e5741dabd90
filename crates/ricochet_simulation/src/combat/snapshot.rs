//! CombatSnapshot — геометрия сцены на один tick.
//!
//! ECS собирает snapshot из queries в начале tick'а, combat core делает по
//! нему raycast/overlap/sweep, а урон и knockback копятся в proxies и
//! применяются к `Health` отдельной системой в конце tick'а.
//!
//! Формы: враги и shooter'ы — сферы (`HitSphere`), статика — AABB.

use bevy::prelude::*;

use crate::combat::components::HitSphere;
use crate::combat::world::{CombatWorld, Contact, ContactKind, EnemyCapability, RayHit, SpatialQuery};

const PARALLEL_EPSILON: f32 = 1e-6;

/// One `take_damage` call received by an enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRecord {
    pub amount: f32,
    pub is_crit: bool,
    pub aoe_radius: f32,
}

/// Everything an enemy received during the tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnemyEffects {
    pub hits: Vec<DamageRecord>,
    pub knockback: Vec3,
}

impl EnemyEffects {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty() && self.knockback == Vec3::ZERO
    }

    pub fn total_damage(&self) -> f32 {
        self.hits.iter().map(|hit| hit.amount).sum()
    }
}

#[derive(Debug, Clone)]
struct EnemyProxy {
    entity: Entity,
    origin: Vec3,
    sphere_center: Vec3,
    radius: f32,
    effects: EnemyEffects,
}

impl EnemyCapability for EnemyProxy {
    fn take_damage(&mut self, amount: f32, is_crit: bool, aoe_radius_for_vfx: f32) {
        self.effects.hits.push(DamageRecord {
            amount,
            is_crit,
            aoe_radius: aoe_radius_for_vfx,
        });
    }

    fn take_knockback(&mut self, direction: Vec3, force: f32) {
        self.effects.knockback += direction.normalize_or_zero() * force;
    }
}

#[derive(Debug, Clone)]
struct SurfaceProxy {
    entity: Entity,
    center: Vec3,
    half_extents: Vec3,
}

#[derive(Debug, Clone)]
struct ShooterProxy {
    entity: Entity,
    origin: Vec3,
    sphere_center: Vec3,
    radius: f32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct CombatSnapshot {
    enemies: Vec<EnemyProxy>,
    surfaces: Vec<SurfaceProxy>,
    shooters: Vec<ShooterProxy>,
}

impl CombatSnapshot {
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.surfaces.clear();
        self.shooters.clear();
    }

    pub fn add_enemy(&mut self, entity: Entity, origin: Vec3, sphere: &HitSphere) {
        self.enemies.push(EnemyProxy {
            entity,
            origin,
            sphere_center: sphere.center(origin),
            radius: sphere.radius,
            effects: EnemyEffects::default(),
        });
    }

    pub fn add_surface(&mut self, entity: Entity, center: Vec3, half_extents: Vec3) {
        self.surfaces.push(SurfaceProxy {
            entity,
            center,
            half_extents: half_extents.abs(),
        });
    }

    pub fn add_shooter(&mut self, entity: Entity, origin: Vec3, sphere: &HitSphere) {
        self.shooters.push(ShooterProxy {
            entity,
            origin,
            sphere_center: sphere.center(origin),
            radius: sphere.radius,
        });
    }

    /// Stable order (by entity) so query results don't depend on archetype layout.
    pub fn sort(&mut self) {
        self.enemies.sort_by_key(|enemy| enemy.entity);
        self.surfaces.sort_by_key(|surface| surface.entity);
        self.shooters.sort_by_key(|shooter| shooter.entity);
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn effects(&self, entity: Entity) -> Option<&EnemyEffects> {
        self.enemies
            .iter()
            .find(|enemy| enemy.entity == entity)
            .map(|enemy| &enemy.effects)
    }

    pub fn total_damage(&self, entity: Entity) -> f32 {
        self.effects(entity).map(EnemyEffects::total_damage).unwrap_or(0.0)
    }

    /// Take accumulated effects (non-empty only), resetting the proxies.
    pub fn drain_effects(&mut self) -> Vec<(Entity, EnemyEffects)> {
        self.enemies
            .iter_mut()
            .filter(|enemy| !enemy.effects.is_empty())
            .map(|enemy| (enemy.entity, std::mem::take(&mut enemy.effects)))
            .collect()
    }
}

impl SpatialQuery for CombatSnapshot {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        let mut best: Option<RayHit> = None;

        let enemy_hits = self.enemies.iter().filter_map(|enemy| {
            ray_sphere(origin, direction, enemy.sphere_center, enemy.radius).map(|t| (enemy.entity, t))
        });
        let surface_hits = self.surfaces.iter().filter_map(|surface| {
            let min = surface.center - surface.half_extents;
            let max = surface.center + surface.half_extents;
            ray_aabb(origin, direction, min, max, max_distance).map(|t| (surface.entity, t))
        });

        // Shooter'ы не блокируют прицельный луч
        for (entity, distance) in enemy_hits.chain(surface_hits) {
            if distance > max_distance {
                continue;
            }
            if best.is_none_or(|hit| distance < hit.distance) {
                best = Some(RayHit {
                    entity,
                    point: origin + direction * distance,
                    distance,
                });
            }
        }

        best
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, max_results: usize) -> Vec<Contact> {
        let mut found: Vec<(f32, Contact)> = Vec::new();

        for enemy in &self.enemies {
            let distance = enemy.sphere_center.distance(center);
            if distance <= radius + enemy.radius {
                found.push((
                    distance,
                    Contact {
                        entity: enemy.entity,
                        kind: ContactKind::Enemy,
                        point: closest_point_on_sphere(center, enemy.sphere_center, enemy.radius),
                        center: enemy.origin,
                    },
                ));
            }
        }

        for shooter in &self.shooters {
            let distance = shooter.sphere_center.distance(center);
            if distance <= radius + shooter.radius {
                found.push((
                    distance,
                    Contact {
                        entity: shooter.entity,
                        kind: ContactKind::Owner,
                        point: closest_point_on_sphere(center, shooter.sphere_center, shooter.radius),
                        center: shooter.origin,
                    },
                ));
            }
        }

        for surface in &self.surfaces {
            let min = surface.center - surface.half_extents;
            let max = surface.center + surface.half_extents;
            let closest = center.clamp(min, max);
            let distance = closest.distance(center);
            if distance <= radius {
                found.push((
                    distance,
                    Contact {
                        entity: surface.entity,
                        kind: ContactKind::Surface,
                        point: closest,
                        center: surface.center,
                    },
                ));
            }
        }

        found.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        found.truncate(max_results);
        found.into_iter().map(|(_, contact)| contact).collect()
    }

    fn sweep_sphere(&self, from: Vec3, to: Vec3, radius: f32) -> Vec<Contact> {
        let path = to - from;
        let mut found: Vec<(f32, Contact)> = Vec::new();

        for enemy in &self.enemies {
            if let Some(t) = segment_sphere(from, path, enemy.sphere_center, enemy.radius + radius) {
                let at = from + path * t;
                found.push((
                    t,
                    Contact {
                        entity: enemy.entity,
                        kind: ContactKind::Enemy,
                        point: closest_point_on_sphere(at, enemy.sphere_center, enemy.radius),
                        center: enemy.origin,
                    },
                ));
            }
        }

        for shooter in &self.shooters {
            if let Some(t) = segment_sphere(from, path, shooter.sphere_center, shooter.radius + radius) {
                let at = from + path * t;
                found.push((
                    t,
                    Contact {
                        entity: shooter.entity,
                        kind: ContactKind::Owner,
                        point: closest_point_on_sphere(at, shooter.sphere_center, shooter.radius),
                        center: shooter.origin,
                    },
                ));
            }
        }

        for surface in &self.surfaces {
            // Minkowski-расширение AABB на радиус снаряда (углы аппроксимируются боксом)
            let min = surface.center - surface.half_extents - Vec3::splat(radius);
            let max = surface.center + surface.half_extents + Vec3::splat(radius);
            if let Some(t) = segment_aabb(from, path, min, max) {
                let at = from + path * t;
                let inner_min = surface.center - surface.half_extents;
                let inner_max = surface.center + surface.half_extents;
                found.push((
                    t,
                    Contact {
                        entity: surface.entity,
                        kind: ContactKind::Surface,
                        point: at.clamp(inner_min, inner_max),
                        center: surface.center,
                    },
                ));
            }
        }

        found.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        found.into_iter().map(|(_, contact)| contact).collect()
    }
}

impl CombatWorld for CombatSnapshot {
    fn enemy(&mut self, entity: Entity) -> Option<&mut dyn EnemyCapability> {
        self.enemies
            .iter_mut()
            .find(|enemy| enemy.entity == entity)
            .map(|enemy| enemy as &mut dyn EnemyCapability)
    }
}

fn closest_point_on_sphere(from: Vec3, center: Vec3, radius: f32) -> Vec3 {
    let offset = from - center;
    if offset.length() <= radius {
        return from;
    }
    center + offset.normalize_or_zero() * radius
}

/// Distance along a normalized ray to a sphere (0 if the origin is inside).
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = origin - center;
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let b = offset.dot(direction);
    if b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    Some(-b - discriminant.sqrt())
}

/// Slab test along a normalized ray, limited to `max_distance`.
fn ray_aabb(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3, max_distance: f32) -> Option<f32> {
    slab_entry(origin, direction, min, max, max_distance)
}

/// Entry parameter t ∈ [0, 1] of segment `from + path * t` into a sphere.
fn segment_sphere(from: Vec3, path: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = from - center;
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let a = path.length_squared();
    if a < PARALLEL_EPSILON {
        return None;
    }

    let b = offset.dot(path);
    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / a;
    (0.0..=1.0).contains(&t).then_some(t)
}

/// Entry parameter t ∈ [0, 1] of segment `from + path * t` into an AABB.
fn segment_aabb(from: Vec3, path: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    slab_entry(from, path, min, max, 1.0)
}

fn slab_entry(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3, t_limit: f32) -> Option<f32> {
    let mut t_enter = 0.0_f32;
    let mut t_exit = t_limit;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];

        if d.abs() < PARALLEL_EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t1 = (min[axis] - o) * inv;
        let mut t2 = (max[axis] - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        t_enter = t_enter.max(t1);
        t_exit = t_exit.min(t2);
        if t_enter > t_exit {
            return None;
        }
    }

    Some(t_enter)
}
