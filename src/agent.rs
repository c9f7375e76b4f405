/*
 * Agent Module
 *
 * This module defines the Agent struct: one boid with its position, velocity
 * and behavioural state (rest cycle, boredom, wander heading, energy).
 *
 * Each agent carries its own SmallRng seeded from the flock seed and the agent
 * id, so a run is reproducible no matter in which order (or on which thread)
 * agents are updated.
 */

use std::f32::consts::TAU;

use glam::{vec2, Vec2};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::layout::FieldLayout;
use crate::params::FlockConfig;

// Fractional part of the golden ratio, spreads consecutive ids over the seed space
const SEED_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Clone, Debug)]
pub struct Agent {
    pub id: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub resting: bool,
    pub rest_timer: i32,
    pub boredom: f32,
    pub wander_angle: f32,
    pub energy: f32,
    // Mode of the last step, for renderers and stats
    pub fleeing: bool,
    pub attracted: bool,
    pub bored: bool,
    rng: SmallRng,
}

impl Agent {
    // A quiet agent at a fixed place; hosts and tests use this to stage scenes
    pub fn new(id: u64, position: Vec2, velocity: Vec2, seed: u64) -> Self {
        Self {
            id,
            position,
            velocity,
            resting: false,
            rest_timer: 0,
            boredom: 0.0,
            wander_angle: 0.0,
            energy: 1.0,
            fleeing: false,
            attracted: false,
            bored: false,
            rng: SmallRng::seed_from_u64(seed ^ id.wrapping_mul(SEED_MIX)),
        }
    }

    // Random agent somewhere in the field
    pub fn spawn(id: u64, layout: &FieldLayout, config: &FlockConfig, seed: u64) -> Self {
        let mut agent = Self::new(id, Vec2::ZERO, Vec2::ZERO, seed);
        let rng = &mut agent.rng;

        if layout.width > 0.0 && layout.height > 0.0 {
            agent.position = vec2(
                rng.gen_range(0.0..layout.width),
                rng.gen_range(0.0..layout.height),
            );
        }

        let s = config.initial_speed;
        if s > 0.0 {
            agent.velocity = vec2(rng.gen_range(-s..=s), rng.gen_range(-s..=s));
        }

        if config.initial_rest_max > 0 {
            agent.rest_timer = rng.gen_range(0..config.initial_rest_max) as i32;
        }
        agent.resting = config.resting && rng.gen_bool(0.5);
        agent.wander_angle = rng.gen_range(0.0..TAU);
        agent.energy = config.initial_energy;
        agent
    }

    // Child of this agent: nearby, same heading, fresh rest cycle and baseline energy.
    // Newborns start in cruise mode, so a boosted parent's speed is capped.
    pub fn offspring(&mut self, id: u64, layout: &FieldLayout, config: &FlockConfig) -> Agent {
        let child_seed = self.rng.next_u64();
        let mut child = Agent::new(id, self.position, self.velocity, child_seed);
        child.limit_speed(config.cruise_speed);

        let jitter = config.offspring_jitter;
        if jitter > 0.0 {
            let offset = vec2(
                child.rng.gen_range(-jitter..=jitter),
                child.rng.gen_range(-jitter..=jitter),
            );
            child.position = layout.wrap(self.position + offset);
        }
        child.wander_angle = self.wander_angle + child.rng.gen_range(-0.5f32..=0.5);
        child.rest_timer = child.next_rest_interval(config);
        child.energy = config.offspring_energy;
        child
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    // Scale velocity down to `cap` if it is faster
    #[inline]
    pub fn limit_speed(&mut self, cap: f32) {
        let speed = self.speed();
        if speed > cap && speed > 0.0 {
            self.velocity *= cap / speed;
        }
    }

    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }

    pub(crate) fn next_rest_interval(&mut self, config: &FlockConfig) -> i32 {
        self.rng
            .gen_range(config.rest_interval_min..=config.rest_interval_max) as i32
    }

    pub(crate) fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> FieldLayout {
        FieldLayout::new(200.0, 100.0, 20, 10)
    }

    #[test]
    fn spawn_is_deterministic_per_id() {
        let config = FlockConfig::default();
        let a = Agent::spawn(3, &layout(), &config, 42);
        let b = Agent::spawn(3, &layout(), &config, 42);
        let c = Agent::spawn(4, &layout(), &config, 42);
        assert_eq!(a.position, b.position);
        assert_eq!(a.velocity, b.velocity);
        assert_ne!(a.position, c.position);
    }

    #[test]
    fn spawn_respects_bounds_and_speed() {
        let config = FlockConfig::default();
        for id in 0..200 {
            let agent = Agent::spawn(id, &layout(), &config, 9);
            assert!(layout().contains(agent.position));
            assert!(agent.velocity.x.abs() <= config.initial_speed);
            assert!(agent.velocity.y.abs() <= config.initial_speed);
            assert!((agent.rest_timer as u32) < config.initial_rest_max);
        }
    }

    #[test]
    fn no_resting_without_capability() {
        let config = FlockConfig::predator();
        assert!((0..50).all(|id| !Agent::spawn(id, &layout(), &config, 1).resting));
    }

    #[test]
    fn limit_speed_keeps_direction() {
        let mut agent = Agent::new(0, Vec2::ZERO, vec2(3.0, 4.0), 0);
        agent.limit_speed(1.0);
        assert!((agent.speed() - 1.0).abs() < 1e-6);
        assert!((agent.velocity.x - 0.6).abs() < 1e-6);

        let mut still = Agent::new(1, Vec2::ZERO, Vec2::ZERO, 0);
        still.limit_speed(0.0);
        assert_eq!(still.velocity, Vec2::ZERO);
    }

    #[test]
    fn offspring_lands_near_parent() {
        let config = FlockConfig::foraging();
        let mut parent = Agent::new(0, vec2(100.0, 50.0), vec2(0.2, 0.0), 5);
        let child = parent.offspring(1, &layout(), &config);
        assert_eq!(child.id, 1);
        assert_eq!(child.energy, config.offspring_energy);
        assert!((child.position - parent.position).abs().max_element() <= config.offspring_jitter);
        assert_eq!(child.velocity, parent.velocity);
    }

    #[test]
    fn offspring_of_boosted_parent_cruises() {
        let config = FlockConfig::foraging();
        let mut parent = Agent::new(0, vec2(100.0, 50.0), vec2(1.2, 0.0), 5);
        parent.attracted = true;
        let child = parent.offspring(1, &layout(), &config);
        assert!(!child.attracted && !child.fleeing);
        assert!(child.speed() <= config.cruise_speed + 1e-6);
        assert!(child.velocity.x > 0.0);
        assert_eq!(parent.velocity, vec2(1.2, 0.0));
    }
}
