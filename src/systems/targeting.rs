//! Target acquisition for mounted weapons.
//!
//! Each tick every weapon re-resolves its target from scratch against a
//! fresh spatial hash of all ship positions. Re-resolving every tick keeps
//! the weapon locked onto whichever hostile is currently closest and drops
//! targets that died or fled without any invalidation bookkeeping.

use crate::components::*;
use crate::config::SimConfig;
use crate::math::Vec2;
use crate::spatial::SpatialHash;
use bevy_ecs::prelude::*;

/// Candidate snapshot entry for one targetable ship.
struct TargetCandidate {
    entity: Entity,
    position: Vec2,
    faction: i32,
}

/// System that assigns each weapon the closest hostile ship strictly within
/// its attack range, or `None` when no hostile qualifies.
///
/// The hash cell size comes from config; the sweep radius per weapon is
/// derived from its own attack range so long-range weapons see enough cells.
pub fn targeting_system(
    config: Option<Res<SimConfig>>,
    mut weapons: Query<(Entity, &mut Weapon, &Position, &FactionId)>,
    targets: Query<(Entity, &Position, &FactionId), With<Ship>>,
) {
    let Some(config) = config else {
        return;
    };
    let cell_size = config.combat.weapon_target_cell_size;

    // Gather phase: snapshot all targetable ships.
    let candidates: Vec<TargetCandidate> = targets
        .iter()
        .map(|(entity, pos, faction)| TargetCandidate {
            entity,
            position: pos.0,
            faction: faction.0,
        })
        .collect();
    if candidates.is_empty() {
        for (_, mut weapon, _, _) in weapons.iter_mut() {
            weapon.target = None;
        }
        return;
    }

    let positions: Vec<_> = candidates.iter().map(|c| c.position).collect();
    let hash = SpatialHash::build(cell_size, &positions);

    let mut neighbors = Vec::new();
    for (weapon_entity, mut weapon, pos, faction) in weapons.iter_mut() {
        let range_sq = weapon.attack_range * weapon.attack_range;
        let search_radius = ((weapon.attack_range / cell_size).ceil() as i32).max(1);

        neighbors.clear();
        hash.collect_neighbors(pos.0, search_radius, &mut neighbors);

        let mut best: Option<Entity> = None;
        let mut best_dist_sq = f32::MAX;
        for &index in &neighbors {
            let candidate = &candidates[index];
            if candidate.entity == weapon_entity || candidate.faction == faction.0 {
                continue;
            }
            let dist_sq = pos.0.distance_sq(candidate.position);
            if dist_sq < range_sq && dist_sq < best_dist_sq {
                best_dist_sq = dist_sq;
                best = Some(candidate.entity);
            }
        }
        weapon.target = best;
    }
}
