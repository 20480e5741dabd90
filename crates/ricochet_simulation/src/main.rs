//! Headless skirmish Ricochet
//!
//! Один стрелок против шеренги врагов, без рендера. Полезно для проверки
//! детерминизма и баланса профилей (`ricochet_simulation [config.toml] [weapon]`).

use bevy::prelude::*;
use ricochet_simulation::combat::{DamageDealt, EnemyDied};
use ricochet_simulation::logger::{log_error, log_info};
use ricochet_simulation::{
    advance_fixed_ticks, create_headless_app, Enemy, Health, HitSphere, Shooter, SimulationConfig,
    SimulationPlugin, StatBonuses, StatKind, StaticSurface, WeaponAim, WeaponCatalog, WeaponController,
    WeaponInput,
};

const TICKS_PER_REPORT: usize = 60;
const REPORTS: usize = 10;

fn main() {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                // логгер ещё не инициализирован — печатаем напрямую
                eprintln!("Failed to load {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };
    let weapon_name = args.next().unwrap_or_else(|| "pistol".to_string());

    let mut app = create_headless_app(config.seed);
    app.add_plugins(SimulationPlugin::from_config(config));

    let Some(profile) = app.world().resource::<WeaponCatalog>().get(&weapon_name).cloned() else {
        log_error(&format!("Unknown weapon `{}`", weapon_name));
        std::process::exit(1);
    };

    log_info(&format!("Starting Ricochet headless skirmish ({})", weapon_name));

    spawn_arena(&mut app, profile);

    for report in 0..REPORTS {
        advance_fixed_ticks(&mut app, TICKS_PER_REPORT);

        // Половина боя — апгрейд: +1 pierce, +1 ricochet
        if report == REPORTS / 2 {
            let bonuses = app.world().resource::<StatBonuses>().clone();
            bonuses.add(StatKind::Pierce, 1.0);
            bonuses.add(StatKind::Ricochet, 1.0);
            log_info("⬆️ Upgrade picked: +1 pierce, +1 ricochet");
        }

        let world = app.world_mut();
        let alive = world
            .query_filtered::<&Health, With<Enemy>>()
            .iter(world)
            .filter(|health| health.is_alive())
            .count();
        // advance_fixed_ticks не крутит First, так что events копятся за весь бой
        let dealt: f32 = world
            .resource::<Events<DamageDealt>>()
            .iter_current_update_events()
            .map(|event| event.amount)
            .sum();
        let died = world.resource::<Events<EnemyDied>>().len();

        log_info(&format!(
            "Report {}: {} enemies alive, {:.1} total damage, {} deaths",
            report, alive, dealt, died
        ));
    }

    log_info("Simulation complete!");
}

fn spawn_arena(app: &mut App, profile: ricochet_simulation::WeaponProfile) {
    let world = app.world_mut();

    // Пол
    world.spawn((
        StaticSurface {
            half_extents: Vec3::new(50.0, 0.5, 50.0),
        },
        Transform::from_xyz(0.0, -0.5, 0.0),
    ));

    // Задняя стена: промахи рикошетят от неё (если есть ricochet)
    world.spawn((
        StaticSurface {
            half_extents: Vec3::new(10.0, 3.0, 0.5),
        },
        Transform::from_xyz(0.0, 3.0, -20.0),
    ));

    let shooter_origin = Vec3::ZERO;
    let view_origin = shooter_origin + Vec3::Y * 1.6;
    world.spawn((
        Shooter,
        HitSphere::default(),
        Transform::from_translation(shooter_origin),
        WeaponController::new(profile, None),
        WeaponInput {
            fire: true,
            reload: false,
        },
        WeaponAim {
            view_origin,
            view_forward: Vec3::new(0.0, -0.03, -1.0).normalize(),
            fire_point: view_origin + Vec3::new(0.25, -0.2, -0.6),
        },
    ));

    // Шеренга врагов в коридоре прямо перед стрелком
    for i in 0..12 {
        let x = (i % 3) as f32 - 1.0;
        let z = -8.0 - 2.5 * (i / 3) as f32;
        world.spawn((Enemy, Health::new(60.0), Transform::from_xyz(x, 0.0, z)));
    }
}
