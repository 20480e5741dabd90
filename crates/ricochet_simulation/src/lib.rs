//! Ricochet Simulation Core
//!
//! ECS-симуляция ranged combat на Bevy 0.16 (headless, fixed tick).
//!
//! Слои:
//! - `stats` — профили оружия + бонусы → effective stats
//! - `combat` — weapon controller, projectile simulation, pool (engine-agnostic core)
//!   + ECS plugin поверх него
//! - `config` — TOML конфиг (tick rate, seed, tuning, каталог оружия)

use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod combat;
pub mod config;
pub mod logger;
pub mod stats;

// Re-export базовых типов для удобства
pub use combat::{
    CombatGate, CombatPlugin, CombatSnapshot, Enemy, Health, HitSphere, ProjectileArena, Shooter, StaticSurface,
    WeaponAim, WeaponController, WeaponInput, WeaponState,
};
pub use config::{CombatTuning, ConfigError, SimulationConfig};
pub use logger::init_logger;
pub use stats::{StatAggregator, StatBonuses, StatKind, WeaponCatalog, WeaponProfile};

/// Seed по умолчанию (если конфиг не задал свой)
pub const DEFAULT_SEED: u64 = 42;

/// Главный plugin симуляции
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn from_config(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = &self.config;

        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            // Детерминистичный RNG
            .insert_resource(DeterministicRng::new(config.seed))
            .insert_resource(config.combat.clone())
            .insert_resource(config.catalog())
            .insert_resource(ProjectileArena::new(config.combat.pool_capacity))
            .add_plugins(CombatPlugin);

        crate::logger::log_info(&format!(
            "🚀 SimulationPlugin: {} Hz, seed {}, pool {}",
            config.tick_hz, config.seed, config.combat.pool_capacity
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Прогоняет ровно один FixedUpdate tick, не завися от wall clock.
///
/// Делает то же, что и fixed main loop Bevy: двигает `Time<Fixed>` на один
/// timestep и подставляет его как generic `Time` на время schedule.
pub fn advance_fixed_tick(app: &mut App) {
    let world = app.world_mut();

    let timestep = world.resource::<Time<Fixed>>().timestep();
    world.resource_mut::<Time<Fixed>>().advance_by(timestep);

    let fixed = world.resource::<Time<Fixed>>().as_generic();
    world.insert_resource::<Time>(fixed);

    world.run_schedule(FixedUpdate);
}

/// Несколько fixed tick'ов подряд.
pub fn advance_fixed_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        advance_fixed_tick(app);
    }
}

/// Duration одного fixed tick'а.
pub fn fixed_timestep(app: &App) -> Duration {
    app.world().resource::<Time<Fixed>>().timestep()
}

/// Snapshot компонентов для сравнения детерминизма
///
/// Сортировка по Entity index + Debug-формат: грубо, но достаточно чтобы
/// поймать расхождение двух прогонов.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
