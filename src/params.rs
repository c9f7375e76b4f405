/*
 * Simulation Parameters Module
 *
 * This module defines the FlockConfig struct that holds every tunable of the
 * flocking engine. One engine serves all flock variants; the variant is picked
 * by the capability flags (flee, crumbs, foraging, boredom, resting) and the
 * presets below bundle the tunings the page demos shipped with.
 *
 * The foraging constants are hand tuned defaults. Nothing guarantees the
 * population reaches an equilibrium with them.
 */

use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    // Capabilities
    pub flee: bool,
    pub crumbs: bool,
    pub foraging: bool,
    pub boredom: bool,
    pub resting: bool,

    pub agent_count: usize,

    // Flocking rules
    pub separation_radius: f32,
    pub alignment_radius: f32,
    pub cohesion_radius: f32,
    pub separation_gain: f32,
    pub alignment_gain: f32,
    pub cohesion_gain: f32,
    pub separation_softening: f32,
    pub wrap_distance_x: bool,
    pub wrap_distance_y: bool,

    // Speed limits
    pub cruise_speed: f32,
    pub boost_speed: f32,
    pub settle_speed: f32,
    pub settle_damping: f32,
    pub initial_speed: f32,

    // Predator (pointer)
    pub flee_radius: f32,
    pub flee_gain: f32,

    // Boredom
    pub crowd_radius: f32,
    pub crowd_threshold: usize,
    pub stall_speed: f32,
    pub boredom_gain: f32,
    pub boredom_decay: f32,
    pub boredom_threshold: f32,
    pub boredom_relief: f32,
    pub wander_gain: f32,
    pub probe_directions: usize,
    pub probe_distance: f32,

    // Rest cycle
    pub rest_interval_min: u32,
    pub rest_interval_max: u32,
    pub initial_rest_max: u32,
    pub rest_damping: f32,

    // Random heading impulse
    pub wander_probability: f64,
    pub wander_jitter: f32,
    pub wander_impulse: f32,

    // Density field
    pub density_decay: f32,
    pub density_deposit: f32,

    // Pointer excitement
    pub activity_decay: f32,
    pub activity_boost: f32,
    pub activity_move_threshold: f32,

    // Crumbs
    pub attraction_radius: f32,
    pub attraction_gain: f32,
    pub lure_radius: f32,
    pub lure_gain: f32,
    pub eat_radius: f32,
    pub bite: f32,
    pub crumb_decay: f32,
    pub crumb_floor: f32,
    pub max_crumbs: usize,

    // Foraging
    pub initial_energy: f32,
    pub energy_decay: f32,
    pub energy_per_bite: f32,
    pub reproduction_threshold: f32,
    pub reproduction_probability: f64,
    pub reproduction_cost: f32,
    pub offspring_energy: f32,
    pub offspring_jitter: f32,
    pub population_cap: usize,

    pub seed: Option<u64>,
    pub parallel: bool,
}

impl Default for FlockConfig {
    // The background flock: slow, resting, bored agents that scatter from the pointer
    fn default() -> Self {
        Self {
            flee: true,
            crumbs: false,
            foraging: false,
            boredom: true,
            resting: true,

            agent_count: 80,

            separation_radius: 25.0,
            alignment_radius: 60.0,
            cohesion_radius: 100.0,
            separation_gain: 0.02,
            alignment_gain: 0.015,
            cohesion_gain: 0.0005,
            separation_softening: 1.0,
            wrap_distance_x: true,
            wrap_distance_y: false,

            cruise_speed: 0.6,
            boost_speed: 4.0,
            settle_speed: 0.7,
            settle_damping: 0.97,
            initial_speed: 0.15,

            flee_radius: 180.0,
            flee_gain: 2.5,

            crowd_radius: 60.0,
            crowd_threshold: 4,
            stall_speed: 0.1,
            boredom_gain: 0.5,
            boredom_decay: 0.1,
            boredom_threshold: 100.0,
            boredom_relief: 2.0,
            wander_gain: 0.08,
            probe_directions: 8,
            probe_distance: 80.0,

            rest_interval_min: 100,
            rest_interval_max: 400,
            initial_rest_max: 200,
            rest_damping: 0.95,

            wander_probability: 0.002,
            wander_jitter: 1.5,
            wander_impulse: 0.15,

            density_decay: 0.92,
            density_deposit: 0.25,

            activity_decay: 0.985,
            activity_boost: 0.15,
            activity_move_threshold: 2.0,

            attraction_radius: 200.0,
            attraction_gain: 4.0,
            lure_radius: 500.0,
            lure_gain: 0.02,
            eat_radius: 6.0,
            bite: 0.05,
            crumb_decay: 0.995,
            crumb_floor: 0.01,
            max_crumbs: 64,

            initial_energy: 1.0,
            energy_decay: 0.002,
            energy_per_bite: 4.0,
            reproduction_threshold: 1.6,
            reproduction_probability: 0.01,
            reproduction_cost: 0.8,
            offspring_energy: 0.5,
            offspring_jitter: 10.0,
            population_cap: 150,

            seed: None,
            parallel: false,
        }
    }
}

impl FlockConfig {
    pub fn background() -> Self {
        Self::default()
    }

    // Plain flocking with the pointer as predator: fast, no rest or boredom
    pub fn predator() -> Self {
        Self {
            boredom: false,
            resting: false,
            agent_count: 100,
            separation_radius: 20.0,
            alignment_radius: 50.0,
            cohesion_radius: 80.0,
            separation_gain: 0.05,
            alignment_gain: 0.05,
            cohesion_gain: 0.002,
            separation_softening: 0.01,
            wrap_distance_x: false,
            wrap_distance_y: false,
            cruise_speed: 4.0,
            boost_speed: 4.0,
            settle_speed: 4.0,
            settle_damping: 1.0,
            initial_speed: 1.0,
            flee_radius: 100.0,
            flee_gain: 0.8,
            wander_probability: 0.0,
            density_decay: 0.85,
            density_deposit: 0.3,
            ..Self::default()
        }
    }

    // Background flock that also follows crumbs dropped by the pointer
    pub fn crumbs() -> Self {
        Self {
            flee: false,
            crumbs: true,
            boost_speed: 1.5,
            ..Self::default()
        }
    }

    // Crumb-following flock whose agents live on the energy they eat
    pub fn foraging() -> Self {
        Self {
            foraging: true,
            boredom: false,
            ..Self::crumbs()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: FlockConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    // Largest radius an agent looks at its neighbours with
    pub fn max_neighbor_radius(&self) -> f32 {
        self.separation_radius
            .max(self.alignment_radius)
            .max(self.cohesion_radius)
            .max(if self.boredom { self.crowd_radius } else { 0.0 })
    }

    // Check every numeric parameter. Zero agents is allowed.
    pub fn validate(&self) -> ConfigResult<()> {
        let non_negative = [
            ("separation_radius", self.separation_radius),
            ("alignment_radius", self.alignment_radius),
            ("cohesion_radius", self.cohesion_radius),
            ("separation_gain", self.separation_gain),
            ("alignment_gain", self.alignment_gain),
            ("cohesion_gain", self.cohesion_gain),
            ("cruise_speed", self.cruise_speed),
            ("boost_speed", self.boost_speed),
            ("settle_speed", self.settle_speed),
            ("initial_speed", self.initial_speed),
            ("flee_radius", self.flee_radius),
            ("flee_gain", self.flee_gain),
            ("crowd_radius", self.crowd_radius),
            ("stall_speed", self.stall_speed),
            ("boredom_gain", self.boredom_gain),
            ("boredom_decay", self.boredom_decay),
            ("boredom_threshold", self.boredom_threshold),
            ("boredom_relief", self.boredom_relief),
            ("wander_gain", self.wander_gain),
            ("probe_distance", self.probe_distance),
            ("wander_jitter", self.wander_jitter),
            ("wander_impulse", self.wander_impulse),
            ("density_deposit", self.density_deposit),
            ("activity_boost", self.activity_boost),
            ("activity_move_threshold", self.activity_move_threshold),
            ("attraction_radius", self.attraction_radius),
            ("attraction_gain", self.attraction_gain),
            ("lure_radius", self.lure_radius),
            ("lure_gain", self.lure_gain),
            ("eat_radius", self.eat_radius),
            ("bite", self.bite),
            ("crumb_floor", self.crumb_floor),
            ("initial_energy", self.initial_energy),
            ("energy_decay", self.energy_decay),
            ("energy_per_bite", self.energy_per_bite),
            ("reproduction_threshold", self.reproduction_threshold),
            ("reproduction_cost", self.reproduction_cost),
            ("offspring_energy", self.offspring_energy),
            ("offspring_jitter", self.offspring_jitter),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a finite, non-negative number (got {value})"),
                ));
            }
        }

        let factors = [
            ("settle_damping", self.settle_damping),
            ("rest_damping", self.rest_damping),
            ("density_decay", self.density_decay),
            ("activity_decay", self.activity_decay),
            ("crumb_decay", self.crumb_decay),
        ];
        for (field, value) in factors {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(
                    field,
                    format!("must lie in [0, 1] (got {value})"),
                ));
            }
        }

        let probabilities = [
            ("wander_probability", self.wander_probability),
            ("reproduction_probability", self.reproduction_probability),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(
                    field,
                    format!("must lie in [0, 1] (got {value})"),
                ));
            }
        }

        if !(self.separation_softening.is_finite() && self.separation_softening > 0.0) {
            return Err(ConfigError::invalid(
                "separation_softening",
                "must be positive so overlapping agents never divide by zero",
            ));
        }
        if self.boost_speed < self.cruise_speed {
            return Err(ConfigError::invalid(
                "boost_speed",
                format!(
                    "must be at least cruise_speed ({} < {})",
                    self.boost_speed, self.cruise_speed
                ),
            ));
        }
        if self.rest_interval_min > self.rest_interval_max {
            return Err(ConfigError::invalid(
                "rest_interval_min",
                format!(
                    "must not exceed rest_interval_max ({} > {})",
                    self.rest_interval_min, self.rest_interval_max
                ),
            ));
        }
        if self.probe_directions == 0 {
            return Err(ConfigError::invalid("probe_directions", "must be at least 1"));
        }
        Ok(())
    }

    // Get parameter ranges for UI sliders
    pub fn agent_count_range() -> RangeInclusive<usize> {
        0..=500
    }

    pub fn radius_range() -> RangeInclusive<f32> {
        5.0..=300.0
    }

    pub fn speed_range() -> RangeInclusive<f32> {
        0.1..=10.0
    }

    pub fn gain_range() -> RangeInclusive<f32> {
        0.0..=0.2
    }

    pub fn decay_range() -> RangeInclusive<f32> {
        0.5..=1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Background,
    Predator,
    Crumbs,
    Foraging,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Background,
        Preset::Predator,
        Preset::Crumbs,
        Preset::Foraging,
    ];

    pub fn config(self) -> FlockConfig {
        match self {
            Preset::Background => FlockConfig::background(),
            Preset::Predator => FlockConfig::predator(),
            Preset::Crumbs => FlockConfig::crumbs(),
            Preset::Foraging => FlockConfig::foraging(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Background => "background",
            Preset::Predator => "predator",
            Preset::Crumbs => "crumbs",
            Preset::Foraging => "foraging",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}
