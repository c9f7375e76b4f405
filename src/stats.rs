/*
 * Stats Module
 *
 * Counts over the flock after a step: how many agents are in each mode, the
 * crumb count and the foraging bookkeeping. Births and deaths are lifetime
 * totals.
 */

use std::fmt;

use crate::agent::Agent;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlockStats {
    pub tick: u64,
    pub population: usize,
    pub resting: usize,
    pub fleeing: usize,
    pub bored: usize,
    pub attracted: usize,
    pub crumbs: usize,
    pub mean_energy: f32,
    pub births: u64,
    pub deaths: u64,
}

impl FlockStats {
    pub(crate) fn collect(agents: &[Agent], tick: u64, crumbs: usize, births: u64, deaths: u64) -> Self {
        let mut stats = FlockStats {
            tick,
            population: agents.len(),
            crumbs,
            births,
            deaths,
            ..Default::default()
        };
        let mut energy = 0.0;
        for agent in agents {
            stats.resting += usize::from(agent.resting);
            stats.fleeing += usize::from(agent.fleeing);
            stats.bored += usize::from(agent.bored);
            stats.attracted += usize::from(agent.attracted);
            energy += agent.energy;
        }
        if !agents.is_empty() {
            stats.mean_energy = energy / agents.len() as f32;
        }
        stats
    }
}

impl fmt::Display for FlockStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick {} | {} agents ({} resting, {} fleeing, {} bored, {} attracted) | {} crumbs | energy {:.2} | +{} -{}",
            self.tick,
            self.population,
            self.resting,
            self.fleeing,
            self.bored,
            self.attracted,
            self.crumbs,
            self.mean_energy,
            self.births,
            self.deaths,
        )
    }
}
