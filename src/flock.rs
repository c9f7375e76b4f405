/*
 * Flock Module
 *
 * The Flock owns every piece of simulation state: agents, crumbs, the density
 * field and the pointer feed. A host creates it once per canvas, forwards
 * pointer events, calls `step()` once per frame and draws from
 * `render_state()`. Dropping the flock releases everything.
 *
 * Steps never fail. A degenerate layout (zero-sized field or grid) turns
 * `step()` into a no-op and renders an empty field.
 */

use glam::Vec2;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::agent::Agent;
use crate::crumb::{Crumb, CrumbTrail};
use crate::density::DensityField;
use crate::error::ConfigResult;
use crate::layout::FieldLayout;
use crate::params::FlockConfig;
use crate::physics::{self, Neighbor, StepContext};
use crate::pointer::PointerFeed;
use crate::stats::FlockStats;

// Borrowed view of the flock for one frame of drawing
#[derive(Clone, Copy, Debug)]
pub struct RenderState<'a> {
    pub tick: u64,
    pub layout: &'a FieldLayout,
    pub density: &'a DensityField,
    pub agents: &'a [Agent],
    pub crumbs: &'a [Crumb],
    pub pointer: Option<Vec2>,
    pub activity: f32,
}

pub struct Flock {
    config: FlockConfig,
    layout: FieldLayout,
    agents: Vec<Agent>,
    crumbs: CrumbTrail,
    density: DensityField,
    pointer: PointerFeed,
    seed: u64,
    next_id: u64,
    tick: u64,
    births: u64,
    deaths: u64,
}

impl Flock {
    pub fn new(config: FlockConfig, layout: FieldLayout) -> ConfigResult<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());

        let mut flock = Self {
            density: DensityField::for_layout(&layout),
            config,
            layout,
            agents: Vec::new(),
            crumbs: CrumbTrail::new(),
            pointer: PointerFeed::new(),
            seed,
            next_id: 0,
            tick: 0,
            births: 0,
            deaths: 0,
        };
        flock.populate();

        info!(
            agents = flock.agents.len(),
            width = layout.width,
            height = layout.height,
            cols = layout.cols,
            rows = layout.rows,
            seed,
            "flock created"
        );
        Ok(flock)
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn initial_population(&self) -> usize {
        if self.config.foraging {
            self.config.agent_count.min(self.config.population_cap)
        } else {
            self.config.agent_count
        }
    }

    fn populate(&mut self) {
        self.agents.clear();
        let count = self.initial_population();
        self.agents.reserve(count);
        for _ in 0..count {
            let id = self.allocate_id();
            let agent = Agent::spawn(id, &self.layout, &self.config, self.seed);
            self.agents.push(agent);
        }
    }

    // Place an agent by hand. Refused when a foraging flock is at its cap.
    pub fn add_agent(&mut self, position: Vec2, velocity: Vec2) -> Option<u64> {
        if self.config.foraging && self.agents.len() >= self.config.population_cap {
            return None;
        }
        let id = self.allocate_id();
        let position = if self.layout.is_degenerate() {
            position
        } else {
            self.layout.wrap(position)
        };
        let mut agent = Agent::new(id, position, velocity, self.seed);
        agent.energy = self.config.initial_energy;
        self.agents.push(agent);
        Some(id)
    }

    pub fn remove_agent(&mut self, id: u64) -> Option<Agent> {
        let index = self.agents.iter().position(|agent| agent.id == id)?;
        Some(self.agents.remove(index))
    }

    // Respawn the configured population and forget crumbs and trails
    pub fn reset(&mut self) {
        self.populate();
        self.crumbs.clear();
        self.density.clear();
        info!(agents = self.agents.len(), "flock reset");
    }

    // New field geometry. The density grid starts over; agents and crumbs keep
    // their positions, wrapped into the new bounds.
    pub fn resize(&mut self, layout: FieldLayout) {
        self.layout = layout;
        self.density = DensityField::for_layout(&layout);
        if !layout.is_degenerate() {
            for agent in &mut self.agents {
                agent.position = layout.wrap(agent.position);
            }
        }
        self.crumbs.retain_within(&layout);
        info!(
            width = layout.width,
            height = layout.height,
            cols = layout.cols,
            rows = layout.rows,
            "flock resized"
        );
    }

    // Pointer sample in field coordinates. Outside the field counts as absent.
    pub fn pointer_moved(&mut self, position: Vec2) {
        if self.layout.is_degenerate() || !self.layout.contains(position) {
            self.pointer.leave();
            return;
        }
        let threshold = self.config.activity_move_threshold;
        let moved = self
            .pointer
            .move_to(position, threshold, self.config.activity_boost);
        if self.config.crumbs && moved > threshold {
            self.crumbs.stage(position);
        }
    }

    pub fn pointer_left(&mut self) {
        self.pointer.leave();
    }

    // Ignored unless the flock follows crumbs; nothing would ever commit it
    pub fn drop_crumb(&mut self, position: Vec2) {
        if !self.config.crumbs || self.layout.is_degenerate() {
            return;
        }
        self.crumbs.stage(position);
    }

    // Advance the simulation by one tick
    pub fn step(&mut self) {
        if self.layout.is_degenerate() {
            return;
        }
        self.tick += 1;
        let config = &self.config;

        self.pointer.decay(config.activity_decay);
        self.density.decay(config.density_decay);
        if config.crumbs {
            self.crumbs.commit(&self.layout, config.max_crumbs);
            self.crumbs.decay(config.crumb_decay, config.crumb_floor);
        } else {
            // Drops staged before crumbs were switched off
            self.crumbs.discard_staged();
        }

        // Everyone steers from the same snapshot of the flock
        let snapshot: Vec<Neighbor> = self.agents.iter().map(Neighbor::from).collect();
        let ctx = StepContext {
            config,
            layout: &self.layout,
            density: &self.density,
            crumbs: self.crumbs.crumbs(),
            pointer: self.pointer.position(),
            snapshot: &snapshot,
        };
        let bites: Vec<Option<usize>> = if config.parallel {
            self.agents
                .par_iter_mut()
                .enumerate()
                .map(|(i, agent)| physics::steer(agent, i, &ctx))
                .collect()
        } else {
            self.agents
                .iter_mut()
                .enumerate()
                .map(|(i, agent)| physics::steer(agent, i, &ctx))
                .collect()
        };

        // Crumbs are eaten in agent order; a crumb never gives more than it has
        for (agent, bite) in self.agents.iter_mut().zip(bites) {
            if let Some(index) = bite {
                let eaten = self.crumbs.bite(index, config.bite);
                if config.foraging {
                    agent.energy += eaten * config.energy_per_bite;
                }
            }
        }
        if config.crumbs {
            self.crumbs.prune(config.crumb_floor);
        }

        for agent in &self.agents {
            let scale = if config.foraging {
                agent.energy.clamp(0.0, 1.0)
            } else {
                1.0
            };
            self.density
                .deposit_at(&self.layout, agent.position, config.density_deposit * scale);
        }

        if config.foraging {
            self.metabolize();
        }

        trace!(
            tick = self.tick,
            agents = self.agents.len(),
            crumbs = self.crumbs.len(),
            "step"
        );
    }

    // Energy upkeep, starvation and reproduction
    fn metabolize(&mut self) {
        let config = &self.config;
        for agent in &mut self.agents {
            agent.energy -= config.energy_decay;
        }

        let before = self.agents.len();
        self.agents.retain(Agent::is_alive);
        let died = before - self.agents.len();

        let room = config.population_cap.saturating_sub(self.agents.len());
        let p = config.reproduction_probability.clamp(0.0, 1.0);
        let mut born = Vec::new();
        for agent in &mut self.agents {
            if born.len() >= room {
                break;
            }
            if agent.energy > config.reproduction_threshold && agent.rng().gen_bool(p) {
                agent.energy -= config.reproduction_cost;
                let id = self.next_id;
                self.next_id += 1;
                born.push(agent.offspring(id, &self.layout, config));
            }
        }

        let births = born.len();
        self.agents.extend(born);
        self.births += births as u64;
        self.deaths += died as u64;

        if births > 0 || died > 0 {
            debug!(
                tick = self.tick,
                births,
                deaths = died,
                population = self.agents.len(),
                "population changed"
            );
        }
    }

    pub fn render_state(&self) -> RenderState<'_> {
        RenderState {
            tick: self.tick,
            layout: &self.layout,
            density: &self.density,
            agents: &self.agents,
            crumbs: self.crumbs.crumbs(),
            pointer: self.pointer.position(),
            activity: self.pointer.activity(),
        }
    }

    pub fn stats(&self) -> FlockStats {
        FlockStats::collect(
            &self.agents,
            self.tick,
            self.crumbs.len(),
            self.births,
            self.deaths,
        )
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn crumbs(&self) -> &[Crumb] {
        self.crumbs.crumbs()
    }

    pub fn density(&self) -> &DensityField {
        &self.density
    }

    pub fn pointer(&self) -> &PointerFeed {
        &self.pointer
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    // Tweak parameters live; the host is expected to keep them sane
    pub fn config_mut(&mut self) -> &mut FlockConfig {
        &mut self.config
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}
