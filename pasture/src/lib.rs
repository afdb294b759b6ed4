//! Pasture is a small predator/prey ecosystem simulation.
//!
//! ## The Pasture
//! The world is a grid of square cells, most of them covered in grass.
//! Every cell can be grazed a couple of times before it is bare,
//! and slowly grows back afterwards, one graze at a time.
//!
//! Two species live on it: grazers eat the grass, predators eat the grazers.
//! Animals are squares as well. They are born small and grow until they are as big as a cell.
//!
//! ## Animals
//! Every animal is a little state machine. Most of the time it is thinking about
//! what to do next, and that goes roughly like this:
//! 1. is something about to eat me? run! (only grazers need to worry about this)
//! 2. am I hungry? eat, or go look for food
//! 3. am I tired? rest
//! 4. am I grown up and ready? find a partner and have a baby
//! 5. nothing to do, do something random
//!
//! Everything costs: just being alive takes a little energy and hunger every tick,
//! moving takes more, having a baby takes a lot.
//! An animal that runs out of either dies, the carcass stays around for a while and then decays.
//!
//! What grazers and predators do differently is in [`species`],
//! the shared behaviour is in [`animal`].
//!
//! ## Ticks
//! The simulation runs in fixed ticks. One tick updates the grass, then all grazers, then all predators.
//! The order matters: grazers react to where the predators were last tick,
//! predators to where the grazers are now.
//!
//! Animals sense each other through a spatial index (the `footprint` crate)
//! that is rebuilt after each population moved.
//!
//! ## Deterministic
//! Everything random comes out of one seeded rng, so a config and a seed always play out the same way.
//! The only thing that runs in parallel is the grass, and grass cells do not influence each other.
//!
//! # Hacking
//! Tunables live in [`config`], a missing value in a config file just means the default.
//! [`Simulation::snapshot`] is everything a renderer needs, it serializes to json.
//! Logging goes through `tracing`, try `RUST_LOG=pasture=debug` for births and deaths.

pub mod animal;
pub mod config;
pub mod population;
pub mod sim;
pub mod snapshot;
pub mod species;
mod stablevec;
pub mod vecmath;
pub mod vegetation;

#[cfg(test)]
mod testing;

pub use animal::{Animal, Sex, Species, State};
pub use config::{Config, ConfigError};
pub use population::Population;
pub use sim::{Report, Simulation};
pub use snapshot::{Kind, Snapshot, Sprite};
pub use vegetation::VegetationField;
