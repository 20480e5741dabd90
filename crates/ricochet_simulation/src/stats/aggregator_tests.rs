//! Tests for stat aggregation.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use crate::stats::{StatAggregator, StatBonusSource, StatKind, WeaponProfile};

    fn bonuses(entries: &[(StatKind, f32)]) -> HashMap<StatKind, f32> {
        entries.iter().copied().collect()
    }

    fn effective(profile: &WeaponProfile, source: &HashMap<StatKind, f32>, kind: StatKind) -> f32 {
        StatAggregator::new(profile, Some(source as &dyn StatBonusSource)).effective(kind)
    }

    #[test]
    fn test_no_bonus_returns_base() {
        let profile = WeaponProfile::pistol();
        let agg = StatAggregator::new(&profile, None);

        assert_eq!(agg.damage(), 10.0);
        assert_eq!(agg.fire_interval(), 0.25);
        assert_eq!(agg.reload_time(), 2.0);
        assert_eq!(agg.magazine_size(), 8);
        assert_eq!(agg.projectile_speed(), 30.0);
        assert_eq!(agg.range(), 40.0);
        assert_eq!(agg.crit_multiplier(), 2.0);
    }

    #[test]
    fn test_multiplicative_kinds() {
        let profile = WeaponProfile::launcher();
        let source = bonuses(&[
            (StatKind::Damage, 0.5),
            (StatKind::Knockback, 1.0),
            (StatKind::AoeRadius, 0.25),
        ]);

        assert_eq!(effective(&profile, &source, StatKind::Damage), 60.0);
        assert_eq!(effective(&profile, &source, StatKind::Knockback), 16.0);
        assert_eq!(effective(&profile, &source, StatKind::AoeRadius), 5.0);
    }

    #[test]
    fn test_fire_rate_bonus_shortens_interval() {
        let profile = WeaponProfile::pistol();
        let base = effective(&profile, &bonuses(&[]), StatKind::FireRate);

        for bonus in [0.01, 0.5, 1.0, 10.0] {
            let boosted = effective(&profile, &bonuses(&[(StatKind::FireRate, bonus)]), StatKind::FireRate);
            assert!(boosted < base, "bonus {} gave {} (base {})", bonus, boosted, base);
        }

        // +100% fire rate → половина интервала
        let doubled = effective(&profile, &bonuses(&[(StatKind::FireRate, 1.0)]), StatKind::FireRate);
        assert!((doubled - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_critical_stats_never_non_positive() {
        let degenerate = WeaponProfile {
            damage: 0.0,
            fire_interval: -1.0,
            magazine_size: 0,
            reload_time: 0.0,
            projectile_speed: -5.0,
            range: 0.0,
            ..WeaponProfile::pistol()
        };

        for bonus in [-100.0, -1.0, -0.99, 0.0, 3.0] {
            for kind in StatKind::ALL {
                let source = bonuses(&[(kind, bonus)]);
                let agg = StatAggregator::new(&degenerate, Some(&source as &dyn StatBonusSource));
                assert!(agg.damage() > 0.0, "damage with {:?}={}", kind, bonus);
                assert!(agg.fire_interval() > 0.0, "fire interval with {:?}={}", kind, bonus);
                assert!(agg.reload_time() > 0.0, "reload with {:?}={}", kind, bonus);
                assert!(agg.magazine_size() >= 1, "magazine with {:?}={}", kind, bonus);
                assert!(agg.range() > 0.0);
            }
        }
    }

    #[test]
    fn test_projectile_speed_always_clamped() {
        let fast = WeaponProfile { projectile_speed: 500.0, ..WeaponProfile::pistol() };
        let slow = WeaponProfile { projectile_speed: 0.2, ..WeaponProfile::pistol() };

        for profile in [fast, slow, WeaponProfile::pistol()] {
            for bonus in [-50.0, -1.0, -0.5, 0.0, 0.5, 100.0] {
                let speed = effective(&profile, &bonuses(&[(StatKind::ProjectileSpeed, bonus)]), StatKind::ProjectileSpeed);
                assert!((1.0..=50.0).contains(&speed), "speed {} out of range", speed);
            }
        }
    }

    #[test]
    fn test_additive_integer_kinds_floor_and_never_negative() {
        let profile = WeaponProfile { pierce_count: 1, ricochet_bounces: 2, ..WeaponProfile::shotgun() };

        let source = bonuses(&[
            (StatKind::Pierce, 1.9),
            (StatKind::Ricochet, -5.0),
            (StatKind::ProjectileCount, 2.5),
        ]);
        let agg = StatAggregator::new(&profile, Some(&source as &dyn StatBonusSource));

        assert_eq!(agg.pierce(), 2);
        assert_eq!(agg.ricochet(), 0);
        assert_eq!(agg.projectile_count(), 10);
    }

    #[test]
    fn test_magazine_size_rounds() {
        let profile = WeaponProfile::pistol();
        assert_eq!(effective(&profile, &bonuses(&[(StatKind::MagazineSize, 0.3)]), StatKind::MagazineSize), 10.0);
        assert_eq!(effective(&profile, &bonuses(&[(StatKind::MagazineSize, -0.99)]), StatKind::MagazineSize), 1.0);
    }

    #[test]
    fn test_crit_chance_has_no_upper_clamp() {
        let profile = WeaponProfile { crit_chance: 0.5, ..WeaponProfile::pistol() };
        assert_eq!(effective(&profile, &bonuses(&[(StatKind::CritChance, 0.75)]), StatKind::CritChance), 1.25);
        assert_eq!(effective(&profile, &bonuses(&[(StatKind::CritChance, -2.0)]), StatKind::CritChance), 0.0);
    }

    #[test]
    fn test_crit_damage_falls_back_to_one() {
        let profile = WeaponProfile::pistol();
        assert_eq!(effective(&profile, &bonuses(&[(StatKind::CritDamage, 0.5)]), StatKind::CritDamage), 2.5);
        assert_eq!(effective(&profile, &bonuses(&[(StatKind::CritDamage, -3.0)]), StatKind::CritDamage), 1.0);
    }

    #[test]
    fn test_pass_through_kinds_ignore_bonus() {
        let profile = WeaponProfile::shotgun();
        let source = bonuses(&[(StatKind::SpreadAngle, 10.0), (StatKind::Range, 10.0)]);
        assert_eq!(effective(&profile, &source, StatKind::SpreadAngle), 6.0);
        assert_eq!(effective(&profile, &source, StatKind::Range), 18.0);
    }

    #[test]
    fn test_non_finite_bonus_ignored() {
        let profile = WeaponProfile::pistol();
        let source = bonuses(&[(StatKind::Damage, f32::NAN)]);
        assert_eq!(effective(&profile, &source, StatKind::Damage), 10.0);
    }

    #[test]
    fn test_non_finite_area_stats_fall_back_to_zero() {
        let profile = WeaponProfile {
            spread_angle: f32::INFINITY,
            aoe_radius: f32::INFINITY,
            knockback: f32::NAN,
            ..WeaponProfile::shotgun()
        };
        let agg = StatAggregator::new(&profile, None);

        assert_eq!(agg.spread_angle(), 0.0);
        assert_eq!(agg.aoe_radius(), 0.0);
        assert_eq!(agg.knockback(), 0.0);
    }

    #[test]
    fn test_launch_stats_snapshot() {
        let profile = WeaponProfile { pierce_count: 1, ..WeaponProfile::launcher() };
        let source = bonuses(&[(StatKind::Damage, 1.0), (StatKind::Ricochet, 2.0)]);
        let launch = StatAggregator::new(&profile, Some(&source as &dyn StatBonusSource)).launch_stats();

        assert_eq!(launch.damage, 80.0);
        assert_eq!(launch.speed, 15.0);
        assert_eq!(launch.pierce, 1);
        assert_eq!(launch.ricochet, 2);
        assert_eq!(launch.aoe_radius, 4.0);
        assert_eq!(launch.crit_multiplier, 1.5);
    }
}
