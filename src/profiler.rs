//! Lightweight profiling for stress tests.
//!
//! Accumulates wall-clock timings for named sections and prints an
//! aggregated table. Used by the stress tests and the demo; the simulation
//! core never touches it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Accumulated timing statistics for one named section.
#[derive(Default, Clone)]
pub struct SectionStats {
    pub total_time: Duration,
    pub call_count: u64,
    pub min_time: Option<Duration>,
    pub max_time: Option<Duration>,
}

impl SectionStats {
    pub fn avg_time(&self) -> Duration {
        if self.call_count == 0 {
            Duration::ZERO
        } else {
            self.total_time / self.call_count as u32
        }
    }
}

/// A simple profiler for measuring named sections of code.
#[derive(Default)]
pub struct Profiler {
    sections: HashMap<String, SectionStats>,
    current_section: Option<(String, Instant)>,
    tick_count: u64,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing a named section. Call `end_section` to stop.
    pub fn begin_section(&mut self, name: &str) {
        self.current_section = Some((name.to_string(), Instant::now()));
    }

    /// End the current section and fold its duration into the stats.
    pub fn end_section(&mut self) {
        if let Some((name, start)) = self.current_section.take() {
            let elapsed = start.elapsed();
            let stats = self.sections.entry(name).or_default();
            stats.total_time += elapsed;
            stats.call_count += 1;
            stats.min_time = Some(stats.min_time.map_or(elapsed, |m| m.min(elapsed)));
            stats.max_time = Some(stats.max_time.map_or(elapsed, |m| m.max(elapsed)));
        }
    }

    /// Time a section using a closure.
    pub fn time_section<F, R>(&mut self, name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.begin_section(name);
        let result = f();
        self.end_section();
        result
    }

    /// Increment the tick counter.
    pub fn tick(&mut self) {
        self.tick_count += 1;
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Get statistics for a specific section.
    pub fn get_section(&self, name: &str) -> Option<&SectionStats> {
        self.sections.get(name)
    }

    /// Print an aggregated table, slowest sections first.
    pub fn print_summary(&self) {
        println!("\n=== Profiler Summary ({} ticks) ===", self.tick_count);

        let mut sections: Vec<_> = self.sections.iter().collect();
        sections.sort_by(|a, b| b.1.total_time.cmp(&a.1.total_time));
        let total: Duration = sections.iter().map(|(_, s)| s.total_time).sum();

        println!(
            "{:<20} {:>10} {:>10} {:>10} {:>10}",
            "Section", "Total", "Avg", "Min", "Max"
        );
        for (name, stats) in &sections {
            println!(
                "{:<20} {:>10.2?} {:>10.2?} {:>10.2?} {:>10.2?}",
                name,
                stats.total_time,
                stats.avg_time(),
                stats.min_time.unwrap_or(Duration::ZERO),
                stats.max_time.unwrap_or(Duration::ZERO),
            );
        }
        println!("{:<20} {:>10.2?}", "TOTAL", total);

        if self.tick_count > 0 {
            let avg_tick = total / self.tick_count as u32;
            println!("{:<20} {:>10.2?}", "Avg per tick", avg_tick);
        }
        println!();
    }

    /// Reset all profiling data.
    pub fn reset(&mut self) {
        self.sections.clear();
        self.current_section = None;
        self.tick_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_accumulate() {
        let mut profiler = Profiler::new();
        profiler.time_section("work", || std::thread::sleep(Duration::from_millis(1)));
        profiler.time_section("work", || std::thread::sleep(Duration::from_millis(1)));

        let stats = profiler.get_section("work").unwrap();
        assert_eq!(stats.call_count, 2);
        assert!(stats.total_time >= Duration::from_millis(2));
        assert!(stats.min_time.unwrap() <= stats.max_time.unwrap());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut profiler = Profiler::new();
        profiler.time_section("work", || {});
        profiler.tick();
        profiler.reset();
        assert!(profiler.get_section("work").is_none());
        assert_eq!(profiler.tick_count(), 0);
    }
}
