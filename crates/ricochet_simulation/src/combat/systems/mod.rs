//! Combat systems (FixedUpdate, порядок задаёт CombatPlugin)

pub mod damage;
pub mod projectile;
pub mod weapon;


// Re-export all systems
pub use damage::*;
pub use projectile::*;
pub use weapon::*;
