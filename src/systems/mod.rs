//! ECS Systems for the squadron simulation.
//!
//! Systems contain the game logic that operates on components.
//!
//! ## Tick Order
//!
//! Systems run in dependency groups each fixed update:
//!
//! **Group 1 (Steering)** - Runs first:
//! - `flocking_system` - Combines flocking forces into new velocities
//!
//! **Group 2 (Integration)**:
//! - `movement_system` - Applies ship velocity to position
//! - `projectile_movement_system` - Advances projectiles along their heading
//!
//! **Group 3 (Combat)** - Targeting then firing, so a weapon can acquire
//! and shoot in one tick:
//! - `targeting_system` - Resolves each weapon's closest hostile
//! - `weapon_fire_system` - Spawns projectiles from off-cooldown weapons
//!
//! **Group 4 (Resolution)** - Impact, damage, and cleanup:
//! - `projectile_collision_system` - Detects hits, queues damage
//! - `damage_apply_system` - Drains the damage queue into health
//! - `health_system` - Despawns dead entities
//! - `destroy_timer_system` - Expires timed entities
//!
//! **Group 5 (Population)**:
//! - `enemy_spawner_system` - Spawns enemy waves around the player

pub mod boids;
pub mod lifecycle;
pub mod movement;
pub mod projectile;
pub mod spawn;
pub mod targeting;
pub mod weapon;

pub use boids::*;
pub use lifecycle::*;
pub use movement::*;
pub use projectile::*;
pub use spawn::*;
pub use targeting::*;
pub use weapon::*;
