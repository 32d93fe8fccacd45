//! Projectile flight and collision.
//!
//! Flight is plain Euler integration along a fixed unit direction. Collision
//! rebuilds a spatial hash over all damageable ships each tick; every
//! projectile checks its swept cells and lands on the first qualifying hit in
//! scan order, then despawns. Damage is queued as events so health mutation
//! happens in one place.

use crate::components::*;
use crate::config::SimConfig;
use crate::math::Vec2;
use crate::spatial::SpatialHash;
use crate::systems::lifecycle::{DamageEvent, DamageEvents};
use crate::systems::movement::DeltaTime;
use bevy_ecs::prelude::*;

/// System that advances every projectile along its flight direction.
pub fn projectile_movement_system(
    dt: Res<DeltaTime>,
    mut projectiles: Query<(&mut Position, &Projectile)>,
) {
    let delta = dt.0;
    for (mut pos, proj) in projectiles.iter_mut() {
        pos.0 += proj.direction * proj.speed * delta;
    }
}

/// Candidate snapshot entry for one damageable ship.
struct HitCandidate {
    entity: Entity,
    position: Vec2,
    faction: i32,
}

/// System that detects projectile impacts and queues damage.
///
/// Each projectile damages at most one target per tick; the firer and
/// same-faction ships are never hit. The projectile despawns on impact.
pub fn projectile_collision_system(
    config: Option<Res<SimConfig>>,
    mut commands: Commands,
    mut events: ResMut<DamageEvents>,
    projectiles: Query<(Entity, &Position, &Projectile)>,
    ships: Query<(Entity, &Position, &FactionId), (With<Health>, Without<Projectile>)>,
) {
    let Some(config) = config else {
        return;
    };

    // Gather phase: snapshot everything a projectile could hit.
    let candidates: Vec<HitCandidate> = ships
        .iter()
        .map(|(entity, pos, faction)| HitCandidate {
            entity,
            position: pos.0,
            faction: faction.0,
        })
        .collect();
    if candidates.is_empty() {
        return;
    }

    let positions: Vec<_> = candidates.iter().map(|c| c.position).collect();
    let hash = SpatialHash::build(config.combat.projectile_cell_size, &positions);

    let mut neighbors = Vec::new();
    for (proj_entity, pos, proj) in projectiles.iter() {
        let radius_sq = proj.collision_radius * proj.collision_radius;

        neighbors.clear();
        hash.collect_neighbors(
            pos.0,
            config.combat.projectile_cell_check_radius,
            &mut neighbors,
        );

        for &index in &neighbors {
            let candidate = &candidates[index];
            if candidate.entity == proj.fired_by || candidate.faction == proj.faction {
                continue;
            }
            if pos.0.distance_sq(candidate.position) < radius_sq {
                events.0.push(DamageEvent {
                    target: candidate.entity,
                    amount: proj.damage,
                });
                commands.entity(proj_entity).despawn();
                break;
            }
        }
    }
}
