//! Movement system - applies velocity to position.

use crate::components::*;
use bevy_ecs::prelude::*;

/// Resource containing the delta time for the current tick.
#[derive(Resource, Default)]
pub struct DeltaTime(pub f32);

/// Resource containing monotonic elapsed simulation time in seconds.
/// Used for weapon cooldown stamps and spawn-wave pacing.
#[derive(Resource, Default)]
pub struct SimTime(pub f32);

/// System that integrates ship positions from their velocities.
///
/// Velocities are already clamped to each ship's max speed by the flocking
/// engine (or by `set_player_velocity` for the player), so integration is a
/// plain Euler step. Projectiles move in their own system.
pub fn movement_system(dt: Res<DeltaTime>, mut query: Query<(&mut Position, &Velocity), With<Ship>>) {
    let delta = dt.0;
    for (mut pos, vel) in query.iter_mut() {
        pos.0 += vel.0 * delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_applies_velocity() {
        let mut world = World::new();
        world.insert_resource(DeltaTime(1.0));

        world.spawn((
            Ship::default(),
            Position::new(0.0, 0.0),
            Velocity::new(5.0, 3.0),
        ));

        let mut schedule = Schedule::default();
        schedule.add_systems(movement_system);
        schedule.run(&mut world);

        let mut query = world.query::<&Position>();
        let pos = query.single(&world);
        assert!((pos.0.x - 5.0).abs() < 0.001);
        assert!((pos.0.y - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_movement_scales_with_delta_time() {
        let mut world = World::new();
        world.insert_resource(DeltaTime(0.5));

        world.spawn((
            Ship::default(),
            Position::new(1.0, 1.0),
            Velocity::new(4.0, 0.0),
        ));

        let mut schedule = Schedule::default();
        schedule.add_systems(movement_system);
        schedule.run(&mut world);

        let mut query = world.query::<&Position>();
        let pos = query.single(&world);
        assert!((pos.0.x - 3.0).abs() < 0.001);
    }
}
