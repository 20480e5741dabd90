//! Stat aggregation (leaf module)
//!
//! - `WeaponProfile`: authored base stats
//! - `StatBonusSource`: внешний источник бонусов (progression)
//! - `StatAggregator`: base + bonus → effective value, с fallback'ами

pub mod aggregator;
pub mod bonus;
pub mod profile;

#[cfg(test)]
mod aggregator_tests;

pub use aggregator::{LaunchStats, StatAggregator, MAX_PROJECTILE_SPEED, MIN_PROJECTILE_SPEED};
pub use bonus::{NoBonuses, StatBonusSource, StatBonuses, StatKind};
pub use profile::{ProjectileKind, WeaponCatalog, WeaponProfile};
