//! Entity lifecycle: damage application, death, and timed destruction.
//!
//! Damage lands as queued events so only one system ever mutates `Health`.
//! Death is swept at a fixed point in the tick; between damage application
//! and the sweep an entity can be "walking dead" with health at or below
//! zero, and the sweep is where it actually leaves the world.

use crate::components::*;
use crate::systems::movement::DeltaTime;
use bevy_ecs::prelude::*;
use tracing::debug;

/// One pending hit against a target.
#[derive(Debug, Clone, Copy)]
pub struct DamageEvent {
    pub target: Entity,
    pub amount: f32,
}

/// Tick-scoped damage queue, drained by `damage_apply_system`.
#[derive(Resource, Default)]
pub struct DamageEvents(pub Vec<DamageEvent>);

/// System that drains the damage queue into `Health` components.
///
/// Events aimed at entities that despawned earlier in the tick are dropped
/// silently; a dead target is not an error.
pub fn damage_apply_system(mut events: ResMut<DamageEvents>, mut healths: Query<&mut Health>) {
    for event in events.0.drain(..) {
        if let Ok(mut health) = healths.get_mut(event.target) {
            health.damage(event.amount);
        }
    }
}

/// System that despawns every entity whose health has run out.
pub fn health_system(mut commands: Commands, query: Query<(Entity, &Health)>) {
    for (entity, health) in query.iter() {
        if !health.is_alive() {
            debug!(?entity, "entity destroyed");
            commands.entity(entity).despawn();
        }
    }
}

/// System that counts down `DestroyTimer`s and despawns expired entities.
pub fn destroy_timer_system(
    dt: Res<DeltaTime>,
    mut commands: Commands,
    mut query: Query<(Entity, &mut DestroyTimer)>,
) {
    let delta = dt.0;
    for (entity, mut timer) in query.iter_mut() {
        timer.remaining -= delta;
        if timer.remaining <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_events_accumulate() {
        let mut world = World::new();
        let target = world.spawn(Health::new(100.0)).id();
        world.insert_resource(DamageEvents(vec![
            DamageEvent { target, amount: 30.0 },
            DamageEvent { target, amount: 30.0 },
        ]));

        let mut schedule = Schedule::default();
        schedule.add_systems(damage_apply_system);
        schedule.run(&mut world);

        let health = world.get::<Health>(target).unwrap();
        assert_eq!(health.current, 40.0);
        assert!(world.resource::<DamageEvents>().0.is_empty());
    }

    #[test]
    fn test_damage_to_missing_entity_is_dropped() {
        let mut world = World::new();
        let target = world.spawn(Health::new(100.0)).id();
        world.despawn(target);
        world.insert_resource(DamageEvents(vec![DamageEvent {
            target,
            amount: 30.0,
        }]));

        let mut schedule = Schedule::default();
        schedule.add_systems(damage_apply_system);
        schedule.run(&mut world);

        assert!(world.resource::<DamageEvents>().0.is_empty());
    }

    #[test]
    fn test_death_swept_after_damage() {
        let mut world = World::new();
        let target = world.spawn(Health::new(50.0)).id();
        world.insert_resource(DamageEvents(vec![DamageEvent {
            target,
            amount: 75.0,
        }]));

        let mut schedule = Schedule::default();
        schedule.add_systems((damage_apply_system, health_system).chain());
        schedule.run(&mut world);

        assert!(world.get_entity(target).is_err());
    }

    #[test]
    fn test_healthy_entities_survive_sweep() {
        let mut world = World::new();
        let survivor = world.spawn(Health::new(50.0)).id();

        let mut schedule = Schedule::default();
        schedule.add_systems(health_system);
        schedule.run(&mut world);

        assert!(world.get_entity(survivor).is_ok());
    }

    #[test]
    fn test_destroy_timer_expires() {
        let mut world = World::new();
        world.insert_resource(DeltaTime(0.6));
        let short = world.spawn(DestroyTimer::new(1.0)).id();
        let long = world.spawn(DestroyTimer::new(10.0)).id();

        let mut schedule = Schedule::default();
        schedule.add_systems(destroy_timer_system);
        schedule.run(&mut world);
        assert!(world.get_entity(short).is_ok());

        schedule.run(&mut world);
        assert!(world.get_entity(short).is_err());
        assert!(world.get_entity(long).is_ok());
    }
}
