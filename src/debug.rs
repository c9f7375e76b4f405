/*
 * Debug Information Module
 *
 * Frame timing and the latest flock stats, shown in the debug overlay and
 * logged every few seconds.
 */

use std::time::{Duration, Instant};

use crate::stats::FlockStats;

pub const LOG_INTERVAL: Duration = Duration::from_secs(5);

pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub steps_per_frame: usize,
    pub stats: FlockStats,
    last_log: Instant,
}

impl DebugInfo {
    pub fn new(now: Instant) -> Self {
        Self {
            fps: 0.0,
            frame_time: Duration::ZERO,
            steps_per_frame: 0,
            stats: FlockStats::default(),
            last_log: now,
        }
    }

    // True once per LOG_INTERVAL
    pub fn log_due(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_log) >= LOG_INTERVAL {
            self.last_log = now;
            true
        } else {
            false
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let stats = &self.stats;
        vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Steps/frame: {}", self.steps_per_frame),
            format!("Tick: {}", stats.tick),
            format!(
                "Agents: {} ({} resting, {} fleeing)",
                stats.population, stats.resting, stats.fleeing
            ),
            format!("Bored: {}  Attracted: {}", stats.bored, stats.attracted),
            format!("Crumbs: {}", stats.crumbs),
            format!(
                "Energy: {:.2}  +{} -{}",
                stats.mean_energy, stats.births, stats.deaths
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_once_per_interval() {
        let start = Instant::now();
        let mut info = DebugInfo::new(start);
        assert!(!info.log_due(start + Duration::from_secs(1)));
        assert!(info.log_due(start + LOG_INTERVAL));
        assert!(!info.log_due(start + LOG_INTERVAL + Duration::from_secs(1)));
    }

    #[test]
    fn overlay_shows_stats() {
        let mut info = DebugInfo::new(Instant::now());
        info.stats.population = 42;
        info.stats.crumbs = 3;
        let lines = info.lines();
        assert!(lines.iter().any(|l| l.starts_with("Agents: 42")));
        assert!(lines.iter().any(|l| l == "Crumbs: 3"));
    }
}
