//! Flocking engine - boid steering for non-player ships.
//!
//! ## Pipeline
//!
//! Each tick runs three phases over a per-tick snapshot:
//!
//! 1. **Gather** - copy positions/velocities/max speeds of all AI ships into
//!    flat arrays and bucket the positions into a `SpatialHash`.
//! 2. **Compute** - per ship, query the hash for neighbors and combine
//!    separation, alignment, cohesion and target-seek forces into a new
//!    velocity. Reads only the snapshot, writes only its own output slot, so
//!    scheduling order cannot change the result.
//! 3. **Apply** - copy the output buffer back into live `Velocity` components,
//!    one writer per entity.
//!
//! ## Parallel Feature
//!
//! When compiled with `--features parallel` the compute phase fans out over
//! rayon; the sequential fallback produces identical results.

use crate::components::*;
use crate::config::{BoidConfig, SimConfig};
use crate::math::Vec2;
use crate::spatial::SpatialHash;
use bevy_ecs::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Squared-distance floor below which a neighbor is treated as coincident and
/// skipped (separation) or a vector as degenerate (alignment/cohesion).
const DIST_EPSILON_SQ: f32 = 0.001;

/// Read-only snapshot of the flock for one tick's compute phase.
struct FlockSnapshot {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    max_speeds: Vec<f32>,
}

/// System that computes a new velocity for every non-player ship.
///
/// Skips the tick entirely when the configuration resource is absent or no
/// AI ships exist. The player's position, when present, is the seek target.
pub fn flocking_system(
    config: Option<Res<SimConfig>>,
    player: Query<&Position, With<PlayerTag>>,
    mut ships: Query<(Entity, &Position, &mut Velocity, &Ship), Without<PlayerTag>>,
) {
    let Some(config) = config else {
        return;
    };
    let boid = config.boid;

    let target = player.get_single().ok().map(|pos| pos.0);

    // Gather phase: snapshot the flock.
    let mut entities = Vec::new();
    let mut snapshot = FlockSnapshot {
        positions: Vec::new(),
        velocities: Vec::new(),
        max_speeds: Vec::new(),
    };
    for (entity, pos, vel, ship) in ships.iter() {
        entities.push(entity);
        snapshot.positions.push(pos.0);
        snapshot.velocities.push(vel.0);
        snapshot.max_speeds.push(ship.max_speed);
    }
    if entities.is_empty() {
        return;
    }

    let hash = SpatialHash::build(boid.cell_size, &snapshot.positions);

    // Compute phase: each index is owned by exactly one task.
    #[cfg(feature = "parallel")]
    let new_velocities: Vec<Vec2> = (0..entities.len())
        .into_par_iter()
        .map(|index| compute_new_velocity(index, &snapshot, &hash, &boid, target))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let new_velocities: Vec<Vec2> = (0..entities.len())
        .map(|index| compute_new_velocity(index, &snapshot, &hash, &boid, target))
        .collect();

    // Apply phase: write back through the live component store.
    for (index, entity) in entities.iter().enumerate() {
        if let Ok((_, _, mut vel, _)) = ships.get_mut(*entity) {
            vel.0 = new_velocities[index];
        }
    }
}

/// Combine all steering forces into the ship's next velocity.
/// Pure over the snapshot; safe to call from parallel tasks.
fn compute_new_velocity(
    index: usize,
    snapshot: &FlockSnapshot,
    hash: &SpatialHash,
    config: &BoidConfig,
    target: Option<Vec2>,
) -> Vec2 {
    let position = snapshot.positions[index];
    let velocity = snapshot.velocities[index];
    let max_speed = snapshot.max_speeds[index];

    let mut neighbors = Vec::new();
    hash.collect_neighbors(position, config.cell_check_radius, &mut neighbors);

    let separation = separation_force(index, position, &neighbors, snapshot, config);
    let alignment = alignment_force(index, position, velocity, &neighbors, snapshot, config);
    let cohesion = cohesion_force(index, position, &neighbors, snapshot, config);
    let target_seek = target_seek_force(position, target, config);

    let total_force = separation * config.separation_weight
        + alignment * config.alignment_weight
        + cohesion * config.cohesion_weight
        + target_seek;
    let total_force = total_force.clamp_length(config.max_steer_force);

    (velocity + total_force).clamp_length(max_speed)
}

/// Repulsion from neighbors closer than the separation radius; each
/// contribution is the normalized away-vector further divided by distance,
/// so the push strengthens as neighbors close in.
fn separation_force(
    index: usize,
    position: Vec2,
    neighbors: &[usize],
    snapshot: &FlockSnapshot,
    config: &BoidConfig,
) -> Vec2 {
    let separation_radius_sq = config.separation_radius * config.separation_radius;
    let mut accum = Vec2::ZERO;
    let mut count = 0;

    for &neighbor in neighbors {
        if neighbor == index {
            continue;
        }
        let diff = position - snapshot.positions[neighbor];
        let dist_sq = diff.length_sq();
        if dist_sq > DIST_EPSILON_SQ && dist_sq < separation_radius_sq {
            accum += diff.normalize_safe() / dist_sq.sqrt();
            count += 1;
        }
    }

    if count > 0 {
        (accum / count as f32).normalize_safe()
    } else {
        Vec2::ZERO
    }
}

/// Steering delta toward the average heading of neighbors within one cell
/// size. Subtracting the current normalized heading makes this a correction,
/// not an absolute direction.
fn alignment_force(
    index: usize,
    position: Vec2,
    velocity: Vec2,
    neighbors: &[usize],
    snapshot: &FlockSnapshot,
    config: &BoidConfig,
) -> Vec2 {
    let neighbor_radius_sq = config.cell_size * config.cell_size;
    let mut accum = Vec2::ZERO;
    let mut count = 0;

    for &neighbor in neighbors {
        if neighbor == index {
            continue;
        }
        if position.distance_sq(snapshot.positions[neighbor]) < neighbor_radius_sq {
            accum += snapshot.velocities[neighbor];
            count += 1;
        }
    }

    if count > 0 {
        let mut average = accum / count as f32;
        if average.length_sq() > DIST_EPSILON_SQ {
            average = average.normalize_safe();
        }
        average - velocity.normalize_safe()
    } else {
        Vec2::ZERO
    }
}

/// Pull toward the centroid of neighbors within one cell size.
fn cohesion_force(
    index: usize,
    position: Vec2,
    neighbors: &[usize],
    snapshot: &FlockSnapshot,
    config: &BoidConfig,
) -> Vec2 {
    let neighbor_radius_sq = config.cell_size * config.cell_size;
    let mut accum = Vec2::ZERO;
    let mut count = 0;

    for &neighbor in neighbors {
        if neighbor == index {
            continue;
        }
        if position.distance_sq(snapshot.positions[neighbor]) < neighbor_radius_sq {
            accum += snapshot.positions[neighbor];
            count += 1;
        }
    }

    if count > 0 {
        let desired = accum / count as f32 - position;
        if desired.length_sq() > DIST_EPSILON_SQ {
            return desired.normalize_safe();
        }
    }
    Vec2::ZERO
}

/// Seek toward the target with three distance regimes: full strength beyond
/// the slow radius, a linear ramp down to zero approaching the stop radius,
/// and reversed avoidance inside the stop radius so ships never pile onto
/// the target.
fn target_seek_force(position: Vec2, target: Option<Vec2>, config: &BoidConfig) -> Vec2 {
    let Some(target) = target else {
        return Vec2::ZERO;
    };

    let to_target = target - position;
    let dist_sq = to_target.length_sq();
    let stop_radius_sq = config.target_stop_radius * config.target_stop_radius;
    let slow_radius_sq = config.target_slow_radius * config.target_slow_radius;

    if dist_sq > slow_radius_sq {
        to_target.normalize_safe() * config.target_seek_weight
    } else if dist_sq > stop_radius_sq {
        let distance = dist_sq.sqrt();
        let slow_factor = (distance - config.target_stop_radius)
            / (config.target_slow_radius - config.target_stop_radius);
        to_target.normalize_safe() * config.target_seek_weight * slow_factor
    } else if dist_sq > 1e-6 {
        -to_target.normalize_safe() * config.obstacle_avoidance_weight
    } else {
        Vec2::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_of(entries: &[(Vec2, Vec2, f32)]) -> FlockSnapshot {
        FlockSnapshot {
            positions: entries.iter().map(|e| e.0).collect(),
            velocities: entries.iter().map(|e| e.1).collect(),
            max_speeds: entries.iter().map(|e| e.2).collect(),
        }
    }

    fn config() -> BoidConfig {
        BoidConfig::default()
    }

    #[test]
    fn test_separation_points_away_from_neighbor() {
        let config = config();
        let snapshot = snapshot_of(&[
            (Vec2::new(0.0, 0.0), Vec2::ZERO, 10.0),
            (Vec2::new(1.0, 0.0), Vec2::ZERO, 10.0),
        ]);
        let neighbors = vec![0, 1];

        let force = separation_force(0, snapshot.positions[0], &neighbors, &snapshot, &config);
        // Neighbor is at +x, so the push is toward -x.
        assert!(force.x < 0.0);
        assert!((force.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_separation_strengthens_as_distance_shrinks() {
        let config = config();
        // Two neighbors on opposite sides at different distances: the raw
        // accumulated push must be dominated by the closer one.
        for (near, far) in [(0.5_f32, 2.5_f32), (0.2, 1.0)] {
            let snapshot = snapshot_of(&[
                (Vec2::new(0.0, 0.0), Vec2::ZERO, 10.0),
                (Vec2::new(near, 0.0), Vec2::ZERO, 10.0),
                (Vec2::new(-far, 0.0), Vec2::ZERO, 10.0),
            ]);
            let neighbors = vec![0, 1, 2];
            let force =
                separation_force(0, snapshot.positions[0], &neighbors, &snapshot, &config);
            // Net push away from the nearer neighbor at +x.
            assert!(force.x < 0.0, "near={} far={}", near, far);
        }
    }

    #[test]
    fn test_separation_ignores_out_of_radius_neighbors() {
        let config = config();
        let snapshot = snapshot_of(&[
            (Vec2::new(0.0, 0.0), Vec2::ZERO, 10.0),
            (Vec2::new(config.separation_radius + 1.0, 0.0), Vec2::ZERO, 10.0),
        ]);
        let force = separation_force(0, snapshot.positions[0], &[0, 1], &snapshot, &config);
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_alignment_is_a_steering_delta() {
        let config = config();
        // Agent heading +x, neighbor heading +y: the correction leans toward
        // +y and away from +x.
        let snapshot = snapshot_of(&[
            (Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), 10.0),
            (Vec2::new(2.0, 0.0), Vec2::new(0.0, 3.0), 10.0),
        ]);
        let force = alignment_force(
            0,
            snapshot.positions[0],
            snapshot.velocities[0],
            &[0, 1],
            &snapshot,
            &config,
        );
        assert!(force.y > 0.0);
        assert!(force.x < 0.0);
    }

    #[test]
    fn test_cohesion_points_at_centroid() {
        let config = config();
        let snapshot = snapshot_of(&[
            (Vec2::new(0.0, 0.0), Vec2::ZERO, 10.0),
            (Vec2::new(4.0, 0.0), Vec2::ZERO, 10.0),
            (Vec2::new(0.0, 4.0), Vec2::ZERO, 10.0),
        ]);
        let force = cohesion_force(0, snapshot.positions[0], &[0, 1, 2], &snapshot, &config);
        // Centroid of neighbors is (2, 2): unit diagonal.
        assert!((force.x - force.y).abs() < 1e-5);
        assert!(force.x > 0.0);
    }

    #[test]
    fn test_target_seek_full_strength_beyond_slow_radius() {
        let config = config();
        let force = target_seek_force(
            Vec2::new(-20.0, 0.0),
            Some(Vec2::ZERO),
            &config,
        );
        assert!((force.length() - config.target_seek_weight).abs() < 1e-4);
        assert!(force.x > 0.0);
    }

    #[test]
    fn test_target_seek_reverses_inside_stop_radius() {
        let config = config();
        let force = target_seek_force(Vec2::new(-1.0, 0.0), Some(Vec2::ZERO), &config);
        // Inside the stop radius the vector points away from the target.
        assert!(force.x < 0.0);
        assert!((force.length() - config.obstacle_avoidance_weight).abs() < 1e-4);
    }

    #[test]
    fn test_target_seek_continuous_at_slow_radius() {
        let config = config();
        // Sample strength just inside and just outside the slow radius; the
        // ramp must meet full strength without a jump.
        let eps = 1e-3;
        let outside = target_seek_force(
            Vec2::new(-(config.target_slow_radius + eps), 0.0),
            Some(Vec2::ZERO),
            &config,
        );
        let inside = target_seek_force(
            Vec2::new(-(config.target_slow_radius - eps), 0.0),
            Some(Vec2::ZERO),
            &config,
        );
        assert!((outside.length() - inside.length()).abs() < 0.01);
    }

    #[test]
    fn test_target_seek_ramps_to_zero_at_stop_radius() {
        let config = config();
        let eps = 1e-3;
        let force = target_seek_force(
            Vec2::new(-(config.target_stop_radius + eps), 0.0),
            Some(Vec2::ZERO),
            &config,
        );
        assert!(force.length() < 0.01);
    }

    #[test]
    fn test_no_target_contributes_nothing() {
        let force = target_seek_force(Vec2::new(5.0, 5.0), None, &config());
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_steering_force_clamped() {
        let mut config = config();
        config.max_steer_force = 0.5;
        // Far target plus heavy weights would exceed the cap without the clamp.
        let snapshot = snapshot_of(&[(Vec2::new(-100.0, 0.0), Vec2::ZERO, 10.0)]);
        let hash = SpatialHash::build(config.cell_size, &snapshot.positions);
        let new_vel =
            compute_new_velocity(0, &snapshot, &hash, &config, Some(Vec2::ZERO));
        // Starting from rest, the new velocity equals the clamped force.
        assert!(new_vel.length() <= config.max_steer_force + 1e-4);
    }

    #[test]
    fn test_velocity_clamped_to_max_speed() {
        let config = config();
        let max_speed = 2.0;
        let snapshot = snapshot_of(&[(
            Vec2::new(-100.0, 0.0),
            Vec2::new(1.9, 0.0),
            max_speed,
        )]);
        let hash = SpatialHash::build(config.cell_size, &snapshot.positions);
        for _ in 0..3 {
            let new_vel =
                compute_new_velocity(0, &snapshot, &hash, &config, Some(Vec2::ZERO));
            assert!(new_vel.length() <= max_speed + 1e-4);
        }
    }

    #[test]
    fn test_zero_neighbors_leaves_only_target_seek() {
        let config = config();
        let snapshot = snapshot_of(&[(Vec2::new(-50.0, 0.0), Vec2::ZERO, 10.0)]);
        let hash = SpatialHash::build(config.cell_size, &snapshot.positions);
        let new_vel = compute_new_velocity(0, &snapshot, &hash, &config, None);
        assert_eq!(new_vel, Vec2::ZERO);
    }

    #[test]
    fn test_separation_away_from_opposing_pair() {
        // Three agents in one cell: separation from the pair at (1,0) and
        // (0,1) pushes the agent at the origin away from their centroid.
        let mut config = config();
        config.cell_size = 6.0;
        config.separation_radius = 2.0;
        let snapshot = snapshot_of(&[
            (Vec2::new(0.0, 0.0), Vec2::ZERO, 10.0),
            (Vec2::new(1.0, 0.0), Vec2::ZERO, 10.0),
            (Vec2::new(0.0, 1.0), Vec2::ZERO, 10.0),
        ]);
        let hash = SpatialHash::build(config.cell_size, &snapshot.positions);
        let neighbors = hash.neighbors(snapshot.positions[0], config.cell_check_radius);

        let force = separation_force(0, snapshot.positions[0], &neighbors, &snapshot, &config);
        assert!(force.length() > 0.0);
        // Centroid of the pair is (0.5, 0.5); the push is the opposite way.
        assert!(force.x < 0.0 && force.y < 0.0);
    }

    #[test]
    fn test_flocking_system_writes_back_velocities() {
        let mut world = World::new();
        world.insert_resource(SimConfig::default());

        world.spawn((PlayerTag, Ship::default(), Position::new(50.0, 0.0)));
        let ship = world
            .spawn((
                Ship::default(),
                FactionId(1),
                Position::new(0.0, 0.0),
                Velocity::default(),
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(flocking_system);
        schedule.run(&mut world);

        let vel = world.get::<Velocity>(ship).unwrap();
        // Seek toward the player at +x.
        assert!(vel.0.x > 0.0);
    }

    #[test]
    fn test_flocking_system_skips_without_config() {
        let mut world = World::new();
        let ship = world
            .spawn((
                Ship::default(),
                Position::new(0.0, 0.0),
                Velocity::new(1.0, 0.0),
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(flocking_system);
        schedule.run(&mut world);

        let vel = world.get::<Velocity>(ship).unwrap();
        assert_eq!(vel.0, Vec2::new(1.0, 0.0));
    }
}
