//! Effective stat resolution.
//!
//! Правила комбинирования base + bonus по типу стата:
//! - multiplicative: `base * (1 + bonus)`
//! - inverse (FireRate): `base / (1 + bonus)`
//! - additive integer: `floor(base + bonus)`, не меньше 0
//! - additive fraction: `base + bonus`
//! - pass-through: `base`
//!
//! Каждый getter подменяет неположительную базу fallback-константой, чтобы
//! downstream не делил на ноль и не зависал с нулевым cooldown/reload.

use super::bonus::{NoBonuses, StatBonusSource, StatKind};
use super::profile::WeaponProfile;

pub const FALLBACK_DAMAGE: f32 = 1.0;
pub const FALLBACK_FIRE_INTERVAL: f32 = 0.5;
pub const FALLBACK_RELOAD_TIME: f32 = 1.0;
pub const FALLBACK_RANGE: f32 = 50.0;
pub const FALLBACK_PROJECTILE_SPEED: f32 = 20.0;
pub const FALLBACK_CRIT_MULTIPLIER: f32 = 1.0;

/// Hard floors applied after bonuses.
pub const MIN_DAMAGE: f32 = 0.1;
pub const MIN_FIRE_INTERVAL: f32 = 0.01;
pub const MIN_RELOAD_TIME: f32 = 0.05;

pub const MIN_PROJECTILE_SPEED: f32 = 1.0;
pub const MAX_PROJECTILE_SPEED: f32 = 50.0;

/// Smallest `1 + bonus` divisor for FireRate (bonus ≤ -1 would flip sign).
const MIN_FIRE_RATE_DIVISOR: f32 = 0.01;

/// Per-shot stat snapshot handed to every projectile of one trigger pull.
///
/// Снимается в момент выстрела: последующие изменения бонусов уже летящие
/// пули не трогают.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchStats {
    pub damage: f32,
    pub speed: f32,
    pub range: f32,
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    pub pierce: u32,
    pub ricochet: u32,
    pub knockback: f32,
    pub aoe_radius: f32,
}

/// Resolves effective stats of one weapon against a bonus source.
///
/// Stateless view: build one per frame (or per call), never cache results.
pub struct StatAggregator<'a> {
    profile: &'a WeaponProfile,
    bonuses: &'a dyn StatBonusSource,
}

impl<'a> StatAggregator<'a> {
    pub fn new(profile: &'a WeaponProfile, bonuses: Option<&'a dyn StatBonusSource>) -> Self {
        let bonuses: &'a dyn StatBonusSource = match bonuses {
            Some(source) => source,
            None => &NoBonuses,
        };
        Self { profile, bonuses }
    }

    fn bonus(&self, kind: StatKind) -> f32 {
        let value = self.bonuses.bonus(kind);
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    /// Generic getter, `GetEffective(kind)`.
    pub fn effective(&self, kind: StatKind) -> f32 {
        match kind {
            StatKind::Damage => self.damage(),
            StatKind::FireRate => self.fire_interval(),
            StatKind::ReloadSpeed => self.reload_time(),
            StatKind::ProjectileCount => self.projectile_count() as f32,
            StatKind::Pierce => self.pierce() as f32,
            StatKind::Ricochet => self.ricochet() as f32,
            StatKind::Knockback => self.knockback(),
            StatKind::AoeRadius => self.aoe_radius(),
            StatKind::ProjectileSpeed => self.projectile_speed(),
            StatKind::MagazineSize => self.magazine_size() as f32,
            StatKind::CritChance => self.crit_chance(),
            StatKind::CritDamage => self.crit_multiplier(),
            StatKind::SpreadAngle => self.spread_angle(),
            StatKind::Range => self.range(),
        }
    }

    pub fn damage(&self) -> f32 {
        let base = positive_or(self.profile.damage, FALLBACK_DAMAGE);
        multiplicative(base, self.bonus(StatKind::Damage)).max(MIN_DAMAGE)
    }

    /// Seconds between shots.
    pub fn fire_interval(&self) -> f32 {
        let base = positive_or(self.profile.fire_interval, FALLBACK_FIRE_INTERVAL);
        let divisor = (1.0 + self.bonus(StatKind::FireRate)).max(MIN_FIRE_RATE_DIVISOR);
        (base / divisor).max(MIN_FIRE_INTERVAL)
    }

    /// Total reload duration (seconds), scaled by the ReloadSpeed channel.
    pub fn reload_time(&self) -> f32 {
        let base = positive_or(self.profile.reload_time, FALLBACK_RELOAD_TIME);
        multiplicative(base, self.bonus(StatKind::ReloadSpeed)).max(MIN_RELOAD_TIME)
    }

    pub fn magazine_size(&self) -> u32 {
        let base = positive_or(self.profile.magazine_size as f32, 1.0);
        let value = multiplicative(base, self.bonus(StatKind::MagazineSize)).round();
        if value >= 1.0 {
            value as u32
        } else {
            1
        }
    }

    pub fn projectile_count(&self) -> u32 {
        // Хотя бы одна пуля на выстрел
        let base = self.profile.projectile_count.max(1);
        additive_count(base, self.bonus(StatKind::ProjectileCount)).max(1)
    }

    pub fn pierce(&self) -> u32 {
        additive_count(self.profile.pierce_count, self.bonus(StatKind::Pierce))
    }

    pub fn ricochet(&self) -> u32 {
        additive_count(self.profile.ricochet_bounces, self.bonus(StatKind::Ricochet))
    }

    pub fn knockback(&self) -> f32 {
        let base = finite_or_zero(self.profile.knockback).max(0.0);
        multiplicative(base, self.bonus(StatKind::Knockback)).max(0.0)
    }

    pub fn aoe_radius(&self) -> f32 {
        let base = finite_or_zero(self.profile.aoe_radius).max(0.0);
        multiplicative(base, self.bonus(StatKind::AoeRadius)).max(0.0)
    }

    /// Clamped to [1, 50] to bound the physics step.
    pub fn projectile_speed(&self) -> f32 {
        let base = positive_or(self.profile.projectile_speed, FALLBACK_PROJECTILE_SPEED);
        multiplicative(base, self.bonus(StatKind::ProjectileSpeed))
            .clamp(MIN_PROJECTILE_SPEED, MAX_PROJECTILE_SPEED)
    }

    /// Lower clamp only: a bonus may push the chance above 1.0.
    pub fn crit_chance(&self) -> f32 {
        let base = self.profile.crit_chance.max(0.0);
        (base + self.bonus(StatKind::CritChance)).max(0.0)
    }

    pub fn crit_multiplier(&self) -> f32 {
        let base = positive_or(self.profile.crit_multiplier, FALLBACK_CRIT_MULTIPLIER);
        let sum = base + self.bonus(StatKind::CritDamage);
        if sum > 0.0 {
            sum
        } else {
            FALLBACK_CRIT_MULTIPLIER
        }
    }

    /// Degrees; non-finite → 0 (no spread).
    pub fn spread_angle(&self) -> f32 {
        finite_or_zero(self.profile.spread_angle).max(0.0)
    }

    pub fn range(&self) -> f32 {
        positive_or(self.profile.range, FALLBACK_RANGE)
    }

    pub fn launch_stats(&self) -> LaunchStats {
        LaunchStats {
            damage: self.damage(),
            speed: self.projectile_speed(),
            range: self.range(),
            crit_chance: self.crit_chance(),
            crit_multiplier: self.crit_multiplier(),
            pierce: self.pierce(),
            ricochet: self.ricochet(),
            knockback: self.knockback(),
            aoe_radius: self.aoe_radius(),
        }
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn multiplicative(base: f32, bonus: f32) -> f32 {
    base * (1.0 + bonus)
}

fn additive_count(base: u32, bonus: f32) -> u32 {
    let value = (base as f32 + bonus).floor();
    if value > 0.0 {
        value as u32
    } else {
        0
    }
}
