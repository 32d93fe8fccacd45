//! Simulation configuration.
//!
//! A single read-only blob of tunables, inserted as an ECS resource at world
//! creation and never mutated by the core. Systems that need it take
//! `Option<Res<SimConfig>>` and skip their update when it is absent.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Flocking tunables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoidConfig {
    /// Grid cell size for neighbor hashing; doubles as the alignment and
    /// cohesion neighbor radius.
    pub cell_size: f32,
    /// Cells checked on each side of the current cell (1 = 3x3 sweep).
    pub cell_check_radius: i32,
    /// How close is too close for separation.
    pub separation_radius: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub target_seek_weight: f32,
    /// Steering force cap, to prevent erratic movement.
    pub max_steer_force: f32,
    /// Distance at which target seeking starts diminishing.
    pub target_slow_radius: f32,
    /// Distance inside which target seeking reverses into avoidance.
    pub target_stop_radius: f32,
    /// Strength of the reversed (avoidance) vector inside the stop radius.
    pub obstacle_avoidance_weight: f32,
}

impl Default for BoidConfig {
    fn default() -> Self {
        Self {
            cell_size: 6.0,
            cell_check_radius: 1,
            separation_radius: 3.0,
            alignment_weight: 1.2,
            cohesion_weight: 1.0,
            separation_weight: 2.0,
            target_seek_weight: 1.5,
            max_steer_force: 5.0,
            target_slow_radius: 6.0,
            target_stop_radius: 4.0,
            obstacle_avoidance_weight: 4.0,
        }
    }
}

/// Combat spatial-query tunables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CombatConfig {
    /// Cell size of the per-tick hash used by projectile collision.
    pub projectile_cell_size: f32,
    /// Cells checked around a projectile when looking for hits.
    pub projectile_cell_check_radius: i32,
    /// Cell size of the per-tick hash used by weapon target acquisition.
    /// The sweep radius is derived from each weapon's attack range.
    pub weapon_target_cell_size: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            projectile_cell_size: 10.0,
            projectile_cell_check_radius: 1,
            weapon_target_cell_size: 15.0,
        }
    }
}

/// Template for enemy weapons, applied by the wave spawner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub attack_range: f32,
    pub damage: f32,
    pub cooldown: f32,
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub projectile_collision_radius: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            attack_range: 8.0,
            damage: 25.0,
            cooldown: 1.0,
            projectile_speed: 1.0,
            projectile_lifetime: 6.0,
            projectile_collision_radius: 1.0,
        }
    }
}

/// Enemy wave spawning tunables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Ring around the player where enemies appear.
    pub spawn_min_radius: f32,
    pub spawn_max_radius: f32,
    /// Hard cap on live enemy ships.
    pub max_ship_count: usize,
    pub wave_size: usize,
    /// Seconds between waves.
    pub wave_cooldown: f32,
    pub ship_max_speed: f32,
    pub ship_health: f32,
    pub enemy_faction: i32,
    pub seed: u64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            spawn_min_radius: 15.0,
            spawn_max_radius: 30.0,
            max_ship_count: 30,
            wave_size: 5,
            wave_cooldown: 3.0,
            ship_max_speed: 10.0,
            ship_health: 100.0,
            enemy_faction: 1,
            seed: 1234,
        }
    }
}

/// Complete simulation configuration resource.
#[derive(Resource, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimConfig {
    /// Fixed timestep in seconds; `SimWorld::step` accumulates toward it.
    pub fixed_timestep: f32,
    pub boid: BoidConfig,
    pub combat: CombatConfig,
    pub weapon: WeaponConfig,
    pub spawn: SpawnConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            boid: BoidConfig::default(),
            combat: CombatConfig::default(),
            weapon: WeaponConfig::default(),
            spawn: SpawnConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load a configuration blob from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let config = SimConfig::default();
        let json = config.to_json().unwrap();
        let parsed = SimConfig::from_json(&json).unwrap();
        assert_eq!(parsed.boid.cell_size, config.boid.cell_size);
        assert_eq!(parsed.spawn.max_ship_count, config.spawn.max_ship_count);
    }

    #[test]
    fn test_stop_radius_inside_slow_radius_by_default() {
        let config = BoidConfig::default();
        assert!(config.target_stop_radius < config.target_slow_radius);
    }
}
