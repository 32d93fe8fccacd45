//! Enemy wave spawner.
//!
//! Drops armed hostile ships on a ring around the player: an immediate first
//! wave, then one wave per cooldown interval, never exceeding the live-ship
//! cap. Placement uses a seeded RNG carried in a resource, so identical
//! seeds replay identical spawn sequences.

use crate::components::*;
use crate::config::SimConfig;
use crate::math::Vec2;
use crate::systems::movement::SimTime;
use bevy_ecs::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Spawner state resource: the wave RNG and pacing bookkeeping.
#[derive(Resource)]
pub struct SpawnState {
    rng: StdRng,
    last_wave_time: f32,
    initial_wave_done: bool,
}

impl SpawnState {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            last_wave_time: 0.0,
            initial_wave_done: false,
        }
    }
}

/// System that spawns enemy waves around the player.
///
/// Does nothing without a player to anchor the ring. A wave is truncated
/// when it would push the live count past the cap.
pub fn enemy_spawner_system(
    config: Option<Res<SimConfig>>,
    time: Res<SimTime>,
    mut state: ResMut<SpawnState>,
    mut commands: Commands,
    player: Query<&Position, With<PlayerTag>>,
    enemies: Query<(), (With<Ship>, Without<PlayerTag>)>,
) {
    let Some(config) = config else {
        return;
    };
    let spawn = config.spawn;

    let Ok(player_pos) = player.get_single() else {
        return;
    };

    let live = enemies.iter().count();
    if live >= spawn.max_ship_count {
        return;
    }

    let wave_due = !state.initial_wave_done
        || time.0 - state.last_wave_time >= spawn.wave_cooldown;
    if !wave_due {
        return;
    }

    let count = spawn.wave_size.min(spawn.max_ship_count - live);
    for _ in 0..count {
        let angle = state.rng.gen_range(0.0..std::f32::consts::TAU);
        let radius = state
            .rng
            .gen_range(spawn.spawn_min_radius..spawn.spawn_max_radius);
        let offset = Vec2::from_angle(angle) * radius;
        let pos = player_pos.0 + offset;

        commands.spawn((
            ShipBundle::new(
                spawn.enemy_faction,
                pos.x,
                pos.y,
                spawn.ship_max_speed,
                spawn.ship_health,
            ),
            Weapon {
                attack_range: config.weapon.attack_range,
                damage: config.weapon.damage,
                cooldown: config.weapon.cooldown,
                last_fire_time: 0.0,
                target: None,
                projectile: ProjectileSpec {
                    speed: config.weapon.projectile_speed,
                    lifetime: config.weapon.projectile_lifetime,
                    collision_radius: config.weapon.projectile_collision_radius,
                },
            },
        ));
    }
    debug!(count, live_before = live, "spawned enemy wave");

    state.initial_wave_done = true;
    state.last_wave_time = time.0;
}
