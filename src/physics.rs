/*
 * Physics Module
 *
 * Per-agent steering for one step. Every agent reads the same snapshot of the
 * flock taken before the pass, so the pass has no ordering dependency and can
 * run on the rayon pool. Shared state the pass would need to write (crumb
 * strength) is returned as an outcome and applied afterwards.
 *
 * Order per agent:
 * 1. Predator (pointer) check - fleeing agents skip everything else
 * 2. Crumb attraction
 * 3. Boredom, rest cycle and the three flocking rules
 * 4. Speed limits, integration and wrapping
 */

use std::f32::consts::TAU;

use glam::{vec2, Vec2};
use rand::Rng;

use crate::agent::Agent;
use crate::crumb::Crumb;
use crate::density::DensityField;
use crate::layout::FieldLayout;
use crate::params::FlockConfig;

// Below this distance a direction can't be taken from the offset
const EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Neighbor {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl From<&Agent> for Neighbor {
    fn from(agent: &Agent) -> Self {
        Self {
            position: agent.position,
            velocity: agent.velocity,
        }
    }
}

// Read-only view of everything an agent may look at during the pass
pub(crate) struct StepContext<'a> {
    pub config: &'a FlockConfig,
    pub layout: &'a FieldLayout,
    pub density: &'a DensityField,
    pub crumbs: &'a [Crumb],
    pub pointer: Option<Vec2>,
    pub snapshot: &'a [Neighbor],
}

// What one agent found within reach during a single pass
#[derive(Default)]
struct Neighborhood {
    separation: Vec2,
    separation_count: usize,
    heading: Vec2,
    alignment_count: usize,
    offset: Vec2,
    cohesion_count: usize,
    crowd: usize,
}

#[inline]
fn unit(angle: f32) -> Vec2 {
    vec2(angle.cos(), angle.sin())
}

// Advance one agent by one step. Returns the crumb it is close enough to eat.
pub(crate) fn steer(agent: &mut Agent, index: usize, ctx: &StepContext) -> Option<usize> {
    let config = ctx.config;
    agent.fleeing = false;
    agent.attracted = false;
    agent.bored = false;

    if config.flee {
        flee(agent, ctx);
    }

    let mut bite = None;
    if !agent.fleeing {
        if config.crumbs {
            bite = attract(agent, ctx);
        }
        behave(agent, index, ctx);
    }

    // Speed limits
    let speed = agent.speed();
    let boosted = agent.fleeing || agent.attracted;
    let cap = if boosted {
        config.boost_speed
    } else {
        config.cruise_speed
    };
    agent.limit_speed(cap);

    // Gradual slowdown after fleeing
    if !boosted && speed > config.settle_speed {
        agent.velocity *= config.settle_damping;
    }

    if !agent.velocity.is_finite() {
        agent.velocity = Vec2::ZERO;
    }

    agent.position = ctx.layout.wrap(agent.position + agent.velocity);
    bite
}

// Push away from the pointer, harder the closer it is
fn flee(agent: &mut Agent, ctx: &StepContext) {
    let Some(pointer) = ctx.pointer else {
        return;
    };
    let config = ctx.config;
    let away = agent.position - pointer;
    let d = away.length();
    if d >= config.flee_radius {
        return;
    }

    // Sitting right on the pointer: bolt along the wander heading
    let direction = if d > EPSILON {
        away / d
    } else {
        unit(agent.wander_angle)
    };
    let factor = (config.flee_radius - d) / config.flee_radius;
    agent.velocity += direction * factor * config.flee_gain;
    agent.fleeing = true;
    agent.resting = false;
}

// Pull toward nearby crumbs weighted by strength and inverse distance. When
// none is near, a weaker lure toward the nearest one further out.
fn attract(agent: &mut Agent, ctx: &StepContext) -> Option<usize> {
    let config = ctx.config;
    let mut pull = Vec2::ZERO;
    let mut near = false;
    let mut nearest: Option<(f32, Vec2, f32)> = None;
    let mut bite: Option<(usize, f32)> = None;

    for (i, crumb) in ctx.crumbs.iter().enumerate() {
        if crumb.strength <= 0.0 {
            continue;
        }
        let delta = ctx.layout.wrapped_delta(
            agent.position,
            crumb.position,
            config.wrap_distance_x,
            config.wrap_distance_y,
        );
        let d = delta.length();

        if d <= config.eat_radius && bite.map_or(true, |(_, best)| d < best) {
            bite = Some((i, d));
        }

        if d < config.attraction_radius {
            near = true;
            if d > EPSILON {
                pull += (delta / d) * crumb.strength * config.attraction_gain / (d + 1.0);
            }
        } else if d < config.lure_radius && nearest.map_or(true, |(best, _, _)| d < best) {
            nearest = Some((d, delta, crumb.strength));
        }
    }

    if near {
        agent.velocity += pull;
        agent.attracted = true;
        agent.resting = false;
    } else if let Some((d, delta, strength)) = nearest {
        agent.velocity += (delta / d) * strength * config.lure_gain;
    }

    bite.map(|(i, _)| i)
}

// Boredom, rest cycle, flocking rules and the occasional random impulse
fn behave(agent: &mut Agent, index: usize, ctx: &StepContext) {
    let config = ctx.config;
    let hood = scan_neighbors(agent, index, ctx);

    // Attracted agents have somewhere to be
    let mut bored = false;
    if config.boredom && !agent.attracted {
        if agent.speed() < config.stall_speed || hood.crowd > config.crowd_threshold {
            agent.boredom += config.boredom_gain;
        } else {
            agent.boredom = (agent.boredom - config.boredom_decay).max(0.0);
        }

        if agent.boredom > config.boredom_threshold {
            bored = true;
            agent.resting = false;
            agent.wander_angle = emptiest_direction(agent, ctx);
            agent.velocity += unit(agent.wander_angle) * config.wander_gain;
            agent.boredom -= config.boredom_relief;
        }
    }
    agent.bored = bored;

    if config.resting && !agent.attracted {
        agent.rest_timer -= 1;
        if agent.rest_timer <= 0 {
            agent.resting = !agent.resting;
            agent.rest_timer = agent.next_rest_interval(config);
        }
    } else if !config.resting {
        agent.resting = false;
    }

    if bored {
        return;
    }

    if agent.resting {
        agent.velocity *= config.rest_damping;
        return;
    }

    if hood.separation_count > 0 {
        agent.velocity += hood.separation * config.separation_gain;
    }
    if hood.alignment_count > 0 {
        let average = hood.heading / hood.alignment_count as f32;
        agent.velocity += (average - agent.velocity) * config.alignment_gain;
    }
    if hood.cohesion_count > 0 {
        let centroid_offset = hood.offset / hood.cohesion_count as f32;
        agent.velocity += centroid_offset * config.cohesion_gain;
    }

    // Occasional random wander impulse keeps the flock from freezing into a formation
    let p = config.wander_probability.clamp(0.0, 1.0);
    if p > 0.0 && agent.rng().gen_bool(p) {
        let turn = agent.rng().gen_range(-0.5f32..0.5) * config.wander_jitter;
        agent.wander_angle += turn;
        agent.velocity += unit(agent.wander_angle) * config.wander_impulse;
    }
}

// Single pass over the snapshot gathering all three rules plus the crowd count
fn scan_neighbors(agent: &Agent, index: usize, ctx: &StepContext) -> Neighborhood {
    let config = ctx.config;
    let reach = config.max_neighbor_radius();
    let reach_sq = reach * reach;
    let mut hood = Neighborhood::default();

    for (j, other) in ctx.snapshot.iter().enumerate() {
        if j == index {
            continue;
        }
        let delta = ctx.layout.wrapped_delta(
            agent.position,
            other.position,
            config.wrap_distance_x,
            config.wrap_distance_y,
        );
        let d_squared = delta.length_squared();
        if d_squared >= reach_sq {
            continue;
        }
        let d = d_squared.sqrt();

        // Separation, softened so overlapping agents stay finite
        if d < config.separation_radius {
            hood.separation -= delta / (d + config.separation_softening);
            hood.separation_count += 1;
        }

        // Alignment
        if d < config.alignment_radius {
            hood.heading += other.velocity;
            hood.alignment_count += 1;
        }

        // Cohesion
        if d < config.cohesion_radius {
            hood.offset += delta;
            hood.cohesion_count += 1;
        }

        if d < config.crowd_radius {
            hood.crowd += 1;
        }
    }

    hood
}

// Probe the density field around the agent and head for the emptiest direction
fn emptiest_direction(agent: &Agent, ctx: &StepContext) -> f32 {
    let config = ctx.config;
    let mut best_angle = agent.wander_angle;
    let mut lowest = 1.0;

    for i in 0..config.probe_directions {
        let angle = i as f32 / config.probe_directions as f32 * TAU;
        let probe = agent.position + unit(angle) * config.probe_distance;
        let density = ctx.density.sample(ctx.layout, probe);
        if density < lowest {
            lowest = density;
            best_angle = angle;
        }
    }

    best_angle
}
