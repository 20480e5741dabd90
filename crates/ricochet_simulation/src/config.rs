//! Simulation config (TOML)
//!
//! ```toml
//! tick_hz = 60
//! seed = 42
//!
//! [combat]
//! ricochet_acquire_radius = 15.0
//! safety_timeout = 5.0
//!
//! [weapons.pistol]
//! damage = 12.0
//! magazine_size = 10
//! ```
//!
//! Все поля опциональны (`#[serde(default)]`), отсутствующее = default.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::stats::{WeaponCatalog, WeaponProfile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("weapon profile `{name}` is invalid: {reason}")]
    InvalidProfile { name: String, reason: String },

    #[error("tick_hz must be a positive finite number, got {0}")]
    InvalidTickRate(f64),
}

/// Tuning constants of the hit pipeline.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Overlap check radius right after spawn ("spawned inside target")
    pub spawn_overlap_radius: f32,
    /// Forced deactivation if nothing terminal happened (seconds)
    pub safety_timeout: f32,
    /// Search radius for the next ricochet target
    pub ricochet_acquire_radius: f32,
    /// Splash damage as a fraction of base (non-crit) damage
    pub splash_fraction: f32,
    /// Vertical aim offset for ricochet redirect (torso height)
    pub torso_offset: f32,
    /// Spawn origin push along view-forward when the aim point is closer than the muzzle
    pub muzzle_nudge: f32,
    /// Collision radius of a flying projectile
    pub projectile_radius: f32,
    /// Bounded result count of sphere overlap queries
    pub max_overlap_results: usize,
    /// Fixed pool size (slots)
    pub pool_capacity: usize,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            spawn_overlap_radius: 0.2,
            safety_timeout: 5.0,
            ricochet_acquire_radius: 15.0,
            splash_fraction: 0.2,
            torso_offset: 1.0,
            muzzle_nudge: 0.5,
            projectile_radius: 0.1,
            max_overlap_results: 32,
            pool_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_hz: f64,
    pub seed: u64,
    pub combat: CombatTuning,
    pub weapons: HashMap<String, WeaponProfile>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
            combat: CombatTuning::default(),
            weapons: HashMap::new(),
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(source)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Weapon catalog: configured profiles, or built-ins if none configured.
    pub fn catalog(&self) -> WeaponCatalog {
        if self.weapons.is_empty() {
            return WeaponCatalog::builtin();
        }

        let mut catalog = WeaponCatalog::default();
        for (name, profile) in &self.weapons {
            catalog.insert(name.clone(), profile.clone());
        }
        catalog
    }

    fn check(&self) -> Result<(), ConfigError> {
        // Time::<Fixed>::from_hz паникует на 0 / отрицательном / NaN
        if !self.tick_hz.is_finite() || self.tick_hz <= 0.0 {
            return Err(ConfigError::InvalidTickRate(self.tick_hz));
        }

        for (name, profile) in &self.weapons {
            // Aggregator переживёт мусор, но NaN в authored данных — явная ошибка автора
            let fields = [
                ("damage", profile.damage),
                ("fire_interval", profile.fire_interval),
                ("range", profile.range),
                ("projectile_speed", profile.projectile_speed),
                ("reload_time", profile.reload_time),
                ("crit_chance", profile.crit_chance),
                ("crit_multiplier", profile.crit_multiplier),
                ("knockback", profile.knockback),
                ("aoe_radius", profile.aoe_radius),
                ("spread_angle", profile.spread_angle),
            ];
            if let Some((field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
                return Err(ConfigError::InvalidProfile {
                    name: name.clone(),
                    reason: format!("{} is not a finite number", field),
                });
            }
        }
        Ok(())
    }
}
