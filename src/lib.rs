/*
 * ASCII Flock - Module Definitions
 *
 * One parameterized boid engine for ASCII-art backgrounds. Agents flock by
 * separation, alignment and cohesion, can flee a pointer, chase crumbs, get
 * bored, rest, and (when foraging) live and breed on the energy they eat.
 * The engine leaves a decaying density field behind for a renderer to draw.
 *
 * The `viewer` feature adds a nannou window that drives the engine and
 * draws the field with the glyph ramp in `renderer`.
 */

// Re-export key components for easier access
pub use agent::Agent;
pub use crumb::{Crumb, CrumbTrail};
pub use density::DensityField;
pub use error::{ConfigError, ConfigResult};
pub use flock::{Flock, RenderState};
pub use layout::FieldLayout;
pub use params::{FlockConfig, Preset};
pub use pointer::PointerFeed;
pub use stats::FlockStats;

pub use glam::{vec2, Vec2};

// Define modules
pub mod agent;
pub mod crumb;
pub mod debug;
pub mod density;
pub mod error;
pub mod flock;
pub mod layout;
pub mod params;
pub mod pointer;
pub mod renderer;
pub mod stats;
mod physics;

#[cfg(feature = "viewer")]
pub mod app;
#[cfg(feature = "viewer")]
pub mod ui;

// Constants
pub const DEFAULT_COLS: usize = 25;
