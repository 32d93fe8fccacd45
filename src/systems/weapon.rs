//! Weapon firing.
//!
//! Runs after targeting in the same tick, so a weapon can acquire and shoot
//! at a hostile within a single update. Spawned projectiles are deferred
//! through `Commands` and only exist at the next sync point; they move and
//! collide starting the following tick.

use crate::components::*;
use crate::systems::movement::SimTime;
use bevy_ecs::prelude::*;

/// Offset along the flight direction at which a projectile materializes, so
/// it never starts inside its own firer's collision radius.
const MUZZLE_OFFSET: f32 = 0.5;

/// System that fires every off-cooldown weapon at its resolved target.
///
/// A stale target handle (despawned entity) or a target that slipped out of
/// range between resolution and fire clears the lock without shooting.
pub fn weapon_fire_system(
    time: Res<SimTime>,
    mut commands: Commands,
    mut weapons: Query<(Entity, &mut Weapon, &Position, &FactionId)>,
    transforms: Query<&Position>,
) {
    for (shooter, mut weapon, pos, faction) in weapons.iter_mut() {
        let Some(target) = weapon.target else {
            continue;
        };
        let Ok(target_pos) = transforms.get(target) else {
            weapon.target = None;
            continue;
        };

        if time.0 - weapon.last_fire_time < weapon.cooldown {
            continue;
        }

        let to_target = target_pos.0 - pos.0;
        let range_sq = weapon.attack_range * weapon.attack_range;
        if to_target.length_sq() >= range_sq {
            weapon.target = None;
            continue;
        }

        let direction = to_target.normalize_safe();
        commands.spawn((
            Position(pos.0 + direction * MUZZLE_OFFSET),
            Projectile {
                direction,
                speed: weapon.projectile.speed,
                damage: weapon.damage,
                collision_radius: weapon.projectile.collision_radius,
                faction: faction.0,
                fired_by: shooter,
            },
            DestroyTimer::new(weapon.projectile.lifetime),
        ));
        weapon.last_fire_time = time.0;
    }
}
