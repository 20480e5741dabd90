//! Tests for projectile flight and hit resolution.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::combat::test_support::*;
    use crate::combat::{CombatNotification, CombatSnapshot, HitSphere};

    #[test]
    fn test_pierce_zero_stops_at_first_enemy() {
        let mut rig = FlightRig::new(snapshot_with_enemies(&[(1, 0.0, -5.0), (2, 0.0, -8.0)]));
        rig.fire(launch(base_stats()));

        let ticks = rig.run_until_stopped(DT, 100);

        assert_eq!(ticks, 4);
        assert_eq!(rig.damage(1), 10.0);
        assert_eq!(rig.damage(2), 0.0);
    }

    #[test]
    fn test_pierce_n_damages_n_plus_one_enemies() {
        let mut rig = FlightRig::new(snapshot_with_enemies(&[
            (1, 0.0, -4.0),
            (2, 0.0, -7.0),
            (3, 0.0, -10.0),
            (4, 0.0, -13.0),
        ]));
        let mut stats = base_stats();
        stats.pierce = 2;
        rig.fire(launch(stats));

        rig.run_until_stopped(DT, 100);

        assert_eq!(rig.damage(1), 10.0);
        assert_eq!(rig.damage(2), 10.0);
        assert_eq!(rig.damage(3), 10.0);
        assert_eq!(rig.damage(4), 0.0);
    }

    #[test]
    fn test_certain_crit_multiplies_damage() {
        let mut rig = FlightRig::new(snapshot_with_enemies(&[(1, 0.0, -5.0)]));
        let mut stats = base_stats();
        stats.crit_chance = 1.0;
        stats.crit_multiplier = 2.0;
        rig.fire(launch(stats));

        rig.run_until_stopped(DT, 100);

        let effects = rig.snapshot.effects(enemy(1)).expect("enemy in snapshot");
        assert_eq!(effects.hits.len(), 1);
        assert_eq!(effects.hits[0].amount, 20.0);
        assert!(effects.hits[0].is_crit);
        assert_eq!(
            rig.hooks.entries,
            vec![CombatNotification::CritOccurred {
                owner: OWNER,
                target: enemy(1),
                damage: 20.0,
            }]
        );
    }

    #[test]
    fn test_zero_crit_chance_never_crits() {
        let enemies: Vec<(u32, f32, f32)> = (0..10).map(|i| (i + 1, 0.0, -3.0 - 2.0 * i as f32)).collect();
        let mut rig = FlightRig::new(snapshot_with_enemies(&enemies));
        let mut stats = base_stats();
        stats.pierce = 20;
        rig.fire(launch(stats));

        rig.run_until_stopped(DT, 200);

        assert!(rig.hooks.entries.is_empty());
        for (id, _, _) in enemies {
            let effects = rig.snapshot.effects(enemy(id)).expect("enemy in snapshot");
            assert!(effects.hits.iter().all(|hit| !hit.is_crit && hit.amount == 10.0));
        }
    }

    #[test]
    fn test_splash_is_fifth_of_base_and_never_crits() {
        // Враг 2 в стороне от траектории, но внутри AoE
        let mut rig = FlightRig::new(snapshot_with_enemies(&[(1, 0.0, -5.0), (2, 1.5, -5.0)]));
        let mut stats = base_stats();
        stats.aoe_radius = 3.0;
        stats.crit_chance = 1.0;
        rig.fire(launch(stats));

        rig.run_until_stopped(DT, 100);

        let direct = rig.snapshot.effects(enemy(1)).expect("direct target");
        assert_eq!(direct.hits.len(), 1);
        assert_eq!(direct.hits[0].amount, 20.0);
        assert_eq!(direct.hits[0].aoe_radius, 3.0);

        let splashed = rig.snapshot.effects(enemy(2)).expect("splash target");
        assert_eq!(splashed.hits.len(), 1);
        assert!((splashed.hits[0].amount - 2.0).abs() < 1e-5);
        assert!(!splashed.hits[0].is_crit);
        assert_eq!(splashed.hits[0].aoe_radius, 0.0);
    }

    #[test]
    fn test_no_splash_without_aoe() {
        let mut rig = FlightRig::new(snapshot_with_enemies(&[(1, 0.0, -5.0), (2, 1.5, -5.0)]));
        rig.fire(launch(base_stats()));

        rig.run_until_stopped(DT, 100);

        assert_eq!(rig.damage(1), 10.0);
        assert_eq!(rig.damage(2), 0.0);
    }

    #[test]
    fn test_knockback_along_flight_direction() {
        let mut rig = FlightRig::new(snapshot_with_enemies(&[(1, 0.0, -5.0)]));
        let mut stats = base_stats();
        stats.knockback = 4.0;
        rig.fire(launch(stats));

        rig.run_until_stopped(DT, 100);

        let effects = rig.snapshot.effects(enemy(1)).expect("enemy in snapshot");
        assert!(effects.knockback.abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), 1e-5));
    }

    #[test]
    fn test_ricochet_redirects_to_nearest_other_enemy() {
        // 3 дальше радиуса захвата (15)
        let mut rig = FlightRig::new(snapshot_with_enemies(&[(1, 0.0, -5.0), (2, 4.0, -5.0), (3, 0.0, -30.0)]));
        let mut stats = base_stats();
        stats.ricochet = 1;
        rig.fire(launch(stats));

        rig.run_until_stopped(DT, 100);

        assert_eq!(rig.damage(1), 10.0);
        assert_eq!(rig.damage(2), 10.0);
        assert_eq!(rig.damage(3), 0.0);
        assert_eq!(rig.projectile.state.ricochets_left, 0);
    }

    #[test]
    fn test_ricochet_without_candidates_falls_back_to_pierce() {
        let mut rig = FlightRig::new(snapshot_with_enemies(&[(1, 0.0, -5.0)]));
        let mut stats = base_stats();
        stats.ricochet = 2;
        rig.fire(launch(stats));

        rig.run_until_stopped(DT, 100);

        // Единственный кандидат — только что поражённый враг, он исключён
        assert_eq!(rig.damage(1), 10.0);
        assert_eq!(rig.projectile.state.ricochets_left, 2);
    }

    #[test]
    fn test_ricochet_leg_may_rehit_earlier_target() {
        let mut rig = FlightRig::new(snapshot_with_enemies(&[(1, 0.0, -5.0), (2, 4.0, -5.0)]));
        let mut stats = base_stats();
        stats.ricochet = 2;
        rig.fire(launch(stats));

        rig.run_until_stopped(DT, 200);

        // 1 → 2 → обратно в 1 (history очищается на каждом рикошете)
        assert_eq!(rig.damage(1), 20.0);
        assert_eq!(rig.damage(2), 10.0);
        assert_eq!(rig.projectile.state.ricochets_left, 0);
    }

    #[test]
    fn test_surface_stops_projectile() {
        let mut snapshot = snapshot_with_enemies(&[(1, 0.0, -8.0)]);
        snapshot.add_surface(enemy(50), Vec3::new(0.0, 1.0, -5.0), Vec3::new(5.0, 5.0, 0.5));
        let mut rig = FlightRig::new(snapshot);
        rig.fire(launch(base_stats()));

        let ticks = rig.run_until_stopped(DT, 100);

        assert_eq!(ticks, 4);
        assert_eq!(rig.damage(1), 0.0);
    }

    #[test]
    fn test_surface_ricochet_finds_enemy() {
        let mut snapshot = snapshot_with_enemies(&[(1, 3.0, -3.0)]);
        snapshot.add_surface(enemy(50), Vec3::new(0.0, 1.0, -5.0), Vec3::new(5.0, 5.0, 0.5));
        let mut rig = FlightRig::new(snapshot);
        let mut stats = base_stats();
        stats.ricochet = 1;
        rig.fire(launch(stats));

        rig.run_until_stopped(DT, 100);

        assert_eq!(rig.damage(1), 10.0);
        assert_eq!(rig.projectile.state.ricochets_left, 0);
    }

    #[test]
    fn test_range_exceeded_before_resolving_contacts() {
        // Враг сразу за пределом дальности: tick, пересекающий range, его не резолвит
        let mut rig = FlightRig::new(snapshot_with_enemies(&[(1, 0.0, -6.0)]));
        let mut stats = base_stats();
        stats.range = 5.0;
        rig.fire(launch(stats));

        let ticks = rig.run_until_stopped(DT, 100);

        assert_eq!(ticks, 5);
        assert_eq!(rig.damage(1), 0.0);
    }

    #[test]
    fn test_safety_timeout() {
        let mut rig = FlightRig::new(CombatSnapshot::default());
        let mut stats = base_stats();
        stats.speed = 1.0;
        stats.range = 1000.0;
        rig.fire(launch(stats));

        let ticks = rig.run_until_stopped(0.5, 100);

        assert_eq!(ticks, 10);
    }

    #[test]
    fn test_spawned_inside_enemy_hits_once() {
        let mut rig = FlightRig::new(snapshot_with_enemies(&[(1, 0.0, 0.0), (2, 0.0, -5.0)]));
        let mut stats = base_stats();
        stats.pierce = 1;
        rig.fire(launch(stats));

        // Попадание уже при initialize
        assert_eq!(rig.damage(1), 10.0);
        assert!(rig.projectile.is_flying());

        rig.run_until_stopped(DT, 100);

        assert_eq!(rig.damage(1), 10.0);
        assert_eq!(rig.damage(2), 10.0);
    }

    #[test]
    fn test_spawn_overlap_stops_after_ricochet() {
        // Оба врага перекрывают точку спавна, 1 ближе
        let mut rig = FlightRig::new(snapshot_with_enemies(&[(1, 0.0, 0.0), (2, 0.0, 0.5)]));
        let mut stats = base_stats();
        stats.ricochet = 1;
        rig.fire(launch(stats));

        // Рикошет на 1 уже выбрал 2 целью, второй overlap не резолвится
        assert_eq!(rig.damage(1), 10.0);
        assert_eq!(rig.damage(2), 0.0);
        assert_eq!(rig.projectile.state.ricochets_left, 0);
        assert!(rig.projectile.is_flying());
    }

    #[test]
    fn test_owner_is_never_damaged() {
        let mut snapshot = snapshot_with_enemies(&[(1, 0.0, -6.0)]);
        snapshot.add_shooter(OWNER, Vec3::new(0.0, 0.0, -2.0), &HitSphere::default());
        // Тот же entity ещё и как "враг" — всё равно игнорируется
        snapshot.add_enemy(OWNER, Vec3::new(0.0, 0.0, -3.0), &HitSphere::default());
        let mut rig = FlightRig::new(snapshot);
        rig.fire(launch(base_stats()));

        rig.run_until_stopped(DT, 100);

        assert_eq!(rig.snapshot.total_damage(OWNER), 0.0);
        assert_eq!(rig.damage(1), 10.0);
    }

    #[test]
    fn test_speed_clamped_on_initialize() {
        let mut rig = FlightRig::new(CombatSnapshot::default());
        let mut stats = base_stats();
        stats.speed = 120.0;
        rig.fire(launch(stats));

        assert_eq!(rig.projectile.state.speed, 50.0);
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let mut rig = FlightRig::new(CombatSnapshot::default());
        rig.fire(launch(base_stats()));

        assert!(rig.projectile.deactivate());
        assert!(!rig.projectile.deactivate());
        assert!(!rig.projectile.is_flying());
    }

    #[test]
    fn test_reinitialize_resets_flight_state() {
        let mut rig = FlightRig::new(snapshot_with_enemies(&[(1, 0.0, -5.0)]));
        let mut stats = base_stats();
        stats.ricochet = 1;
        rig.fire(launch(stats.clone()));
        rig.run_until_stopped(DT, 100);

        rig.fire(launch(stats));

        let state = &rig.projectile.state;
        assert!(rig.projectile.is_flying());
        assert_eq!(state.pierced, 0);
        assert_eq!(state.ricochets_left, 1);
        assert_eq!(state.traveled, 0.0);
        assert!(state.hit_history.is_empty());
        assert_eq!(state.position, Vec3::new(0.0, 1.0, 0.0));
    }
}
