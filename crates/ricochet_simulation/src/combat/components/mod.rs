//! Combat components

pub mod projectile;
pub mod targets;
pub mod weapon;


// Re-export all components
pub use projectile::*;
pub use targets::*;
pub use weapon::*;
