//! Public API for the simulation.
//!
//! This module provides the main interface for a host application (renderer,
//! game shell, headless harness) to interact with the simulation.
//!
//! ## Fixed Timestep
//!
//! The simulation uses a fixed timestep internally (default 60 Hz). When
//! `step(dt)` is called, the simulation accumulates time and runs fixed
//! updates as needed. This ensures deterministic behavior regardless of
//! frame rate.

use crate::components::*;
use crate::config::SimConfig;
use crate::math::Vec2;
use crate::systems::*;
use crate::world::Snapshot;
use bevy_ecs::prelude::*;

/// The main simulation world container.
///
/// Holds the ECS world and schedule, providing a clean API for:
/// - Initializing the simulation
/// - Stepping the simulation forward
/// - Spawning ships and steering the player
/// - Extracting state snapshots
pub struct SimWorld {
    world: World,
    schedule: Schedule,
    tick: u64,
    time: f32,
    /// Accumulated time for fixed timestep.
    time_accumulator: f32,
}

impl SimWorld {
    /// Create a new empty simulation world.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Create a new simulation world with custom configuration.
    pub fn with_config(config: SimConfig) -> Self {
        let mut world = World::new();

        world.insert_resource(DeltaTime(config.fixed_timestep));
        world.insert_resource(SimTime(0.0));
        world.insert_resource(DamageEvents::default());
        world.insert_resource(SpawnState::new(config.spawn.seed));
        world.insert_resource(config);

        let mut schedule = Schedule::default();

        // Group 1: steering.
        schedule.add_systems(flocking_system);

        // Group 2: integration, after steering has written velocities.
        schedule.add_systems(
            (movement_system, projectile_movement_system).after(flocking_system),
        );

        // Group 3: targeting then firing, so a weapon can acquire and shoot
        // within one tick.
        schedule.add_systems(
            (targeting_system, weapon_fire_system)
                .chain()
                .after(movement_system),
        );

        // Group 4: resolution, sequential for correctness.
        schedule.add_systems(
            (
                projectile_collision_system,
                damage_apply_system,
                health_system,
                destroy_timer_system,
            )
                .chain()
                .after(weapon_fire_system)
                .after(projectile_movement_system),
        );

        // Group 5: population.
        schedule.add_systems(enemy_spawner_system.after(destroy_timer_system));

        Self {
            world,
            schedule,
            tick: 0,
            time: 0.0,
            time_accumulator: 0.0,
        }
    }

    /// Create a simulation world from a JSON configuration blob.
    pub fn from_json_config(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::with_config(SimConfig::from_json(json)?))
    }

    /// Create a test world with a player and a few hostile ships.
    pub fn new_demo_world() -> Self {
        let mut sim = Self::new();
        sim.spawn_player(0.0, 0.0);
        for i in 0..4 {
            let angle = (i as f32 / 4.0) * std::f32::consts::TAU;
            sim.spawn_armed_ship(1, 20.0 * angle.cos(), 20.0 * angle.sin());
        }
        sim
    }

    /// Step the simulation forward by `dt` seconds.
    ///
    /// Uses fixed timestep internally - accumulates time and runs fixed
    /// updates as needed.
    pub fn step(&mut self, dt: f32) {
        let fixed_dt = self
            .world
            .get_resource::<SimConfig>()
            .map(|c| c.fixed_timestep)
            .unwrap_or(1.0 / 60.0);

        self.time_accumulator += dt;
        while self.time_accumulator >= fixed_dt {
            self.fixed_update(fixed_dt);
            self.time_accumulator -= fixed_dt;
        }
    }

    /// Run a single fixed timestep update.
    fn fixed_update(&mut self, dt: f32) {
        if let Some(mut dt_res) = self.world.get_resource_mut::<DeltaTime>() {
            dt_res.0 = dt;
        }
        if let Some(mut time_res) = self.world.get_resource_mut::<SimTime>() {
            time_res.0 += dt;
        }

        self.schedule.run(&mut self.world);

        self.tick += 1;
        self.time += dt;
        tracing::trace!(tick = self.tick, time = self.time, "fixed update");
    }

    /// Spawn the player ship. The player skips the flocking engine and is
    /// steered via `set_player_velocity`; the flock seeks its position.
    pub fn spawn_player(&mut self, x: f32, y: f32) -> Entity {
        let (max_speed, health) = self
            .world
            .get_resource::<SimConfig>()
            .map(|c| (c.spawn.ship_max_speed, c.spawn.ship_health))
            .unwrap_or((10.0, 100.0));
        self.world
            .spawn((ShipBundle::new(0, x, y, max_speed, health), PlayerTag))
            .id()
    }

    /// Spawn an unarmed ship of the given faction.
    pub fn spawn_ship(&mut self, faction: i32, x: f32, y: f32) -> Entity {
        let (max_speed, health) = self
            .world
            .get_resource::<SimConfig>()
            .map(|c| (c.spawn.ship_max_speed, c.spawn.ship_health))
            .unwrap_or((10.0, 100.0));
        self.world
            .spawn(ShipBundle::new(faction, x, y, max_speed, health))
            .id()
    }

    /// Spawn a ship of the given faction armed with the configured weapon.
    pub fn spawn_armed_ship(&mut self, faction: i32, x: f32, y: f32) -> Entity {
        let entity = self.spawn_ship(faction, x, y);
        let weapon = self
            .world
            .get_resource::<SimConfig>()
            .map(|c| Weapon {
                attack_range: c.weapon.attack_range,
                damage: c.weapon.damage,
                cooldown: c.weapon.cooldown,
                last_fire_time: 0.0,
                target: None,
                projectile: ProjectileSpec {
                    speed: c.weapon.projectile_speed,
                    lifetime: c.weapon.projectile_lifetime,
                    collision_radius: c.weapon.projectile_collision_radius,
                },
            })
            .unwrap_or_default();
        self.world.entity_mut(entity).insert(weapon);
        entity
    }

    /// Steer the player: `dx`/`dy` is a direction, scaled to the player's
    /// max speed. Zero input stops the ship.
    pub fn set_player_velocity(&mut self, dx: f32, dy: f32) {
        let direction = Vec2::new(dx, dy).normalize_safe();
        let mut query = self
            .world
            .query_filtered::<(&mut Velocity, &Ship), With<PlayerTag>>();
        for (mut vel, ship) in query.iter_mut(&mut self.world) {
            vel.0 = direction * ship.max_speed;
        }
    }

    /// Get a snapshot of the current simulation state.
    pub fn snapshot(&mut self) -> Snapshot {
        Snapshot::from_world(&mut self.world, self.tick, self.time)
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> String {
        self.snapshot().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the current tick number.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Get the elapsed simulation time.
    pub fn current_time(&self) -> f32 {
        self.time
    }

    /// Count live ships, player included.
    pub fn ship_count(&mut self) -> usize {
        let mut query = self.world.query_filtered::<(), With<Ship>>();
        query.iter(&self.world).count()
    }

    /// Count in-flight projectiles.
    pub fn projectile_count(&mut self) -> usize {
        let mut query = self.world.query_filtered::<(), With<Projectile>>();
        query.iter(&self.world).count()
    }

    /// Get direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}
