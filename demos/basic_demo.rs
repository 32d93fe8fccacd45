//! Basic demonstration of the squadron simulation.
//!
//! Run with: cargo run --example basic_demo

use squadron_sim::SimWorld;

fn main() {
    println!("=== Squadron Sim - Demo ===\n");

    let mut sim = SimWorld::new();
    sim.spawn_player(0.0, 0.0);

    // Cruise the player east; enemy waves spawn around it and give chase.
    sim.set_player_velocity(1.0, 0.0);

    println!("Initial state:");
    print_snapshot(&mut sim);

    // Run simulation for 20 seconds of game time at 60 Hz.
    println!("\nRunning simulation for 20 seconds...\n");
    for frame in 0..1200 {
        sim.step(1.0 / 60.0);

        // Print state every 3 seconds
        if (frame + 1) % 180 == 0 {
            println!(
                "--- Tick {} (t={:.1}s) ---",
                sim.current_tick(),
                sim.current_time()
            );
            print_snapshot(&mut sim);
        }
    }

    println!("\n=== Final State (JSON) ===\n");
    match sim.snapshot().to_json_pretty() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("snapshot serialization failed: {}", e),
    }
}

fn print_snapshot(sim: &mut SimWorld) {
    let snapshot = sim.snapshot();

    if let Some(player) = snapshot.ships.iter().find(|s| s.is_player) {
        println!(
            "  Player: pos=({:.1}, {:.1}) hp={:.0}/{:.0}",
            player.x, player.y, player.health, player.health_max
        );
    } else {
        println!("  Player: destroyed");
    }

    let enemies: Vec<_> = snapshot.ships.iter().filter(|s| !s.is_player).collect();
    println!(
        "  Enemies: {} live, {} projectiles in flight",
        enemies.len(),
        snapshot.projectiles.len()
    );
    for ship in enemies.iter().take(5) {
        println!(
            "    Ship {}: pos=({:.1}, {:.1}) vel=({:.1}, {:.1}) hp={:.0}",
            ship.id, ship.x, ship.y, ship.vx, ship.vy, ship.health
        );
    }
    if enemies.len() > 5 {
        println!("    ... and {} more", enemies.len() - 5);
    }
}
