//! All the knobs of the pasture.
//!
//! Every value has a default, a config file only needs to name what it changes:
//!
//! ```toml
//! seed = 7
//!
//! [world]
//! grazers = 60
//!
//! [predator]
//! speed = 6.0
//! ```
//!
//! Durations are given in seconds and turned into ticks using the tick rate,
//! see [`Config::grazer_traits`].

use serde_derive::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const GRAZE_HUNGER_GAIN: f64 = 30.;
/// a 15 point bite on top of what the grazer is worth
pub const KILL_HUNGER_GAIN: f64 = 15. + 30.;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub seed: u64,
    pub world: WorldConfig,
    pub vegetation: VegetationConfig,
    pub grazer: AnimalConfig,
    pub predator: AnimalConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub rows: usize,
    pub cols: usize,
    /// edge length of one grid square, also the size of a grown animal
    pub cell_size: u32,
    pub tick_rate: u32,
    /// initial population sizes
    pub grazers: usize,
    pub predators: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            cell_size: 30,
            tick_rate: 30,
            grazers: 35,
            predators: 35 / 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationConfig {
    /// chance for each grid square to carry vegetation at all
    pub coverage: f64,
    pub max_grazes: u8,
    /// seconds until a grazed cell grows back one graze
    pub refresh_time: f64,
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            coverage: 0.8,
            max_grazes: 5,
            refresh_time: 3.,
        }
    }
}

/// tunables shared by both species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimalConfig {
    pub max_energy: f64,
    pub max_hunger: f64,
    pub rest_energy_gain: f64,
    pub move_hunger_loss: f64,
    /// distance per tick, also the energy a tick of moving costs
    pub speed: f64,
    /// paid in energy and hunger by both parents
    pub mating_cost: f64,
    /// seconds a carcass stays around
    pub decay_time: f64,
    /// seconds per unit of growth
    pub grow_time: f64,
    pub mating_cooldown: f64,
    /// newborn edge as a fraction of the cell size
    pub birth_scale: f64,
    /// hunger gained per meal, defaults to [`GRAZE_HUNGER_GAIN`] or [`KILL_HUNGER_GAIN`]
    pub hunger_gain: Option<f64>,
}

impl Default for AnimalConfig {
    fn default() -> Self {
        Self {
            max_energy: 1000.,
            max_hunger: 1000.,
            rest_energy_gain: 10.,
            move_hunger_loss: 5.,
            speed: 5.,
            mating_cost: 50.,
            decay_time: 10.,
            grow_time: 1.,
            mating_cooldown: 1.,
            birth_scale: 0.25,
            hunger_gain: None,
        }
    }
}

/// species tunables resolved against the world, durations are in ticks
#[derive(Debug, Clone, PartialEq)]
pub struct Traits {
    pub max_energy: f64,
    pub max_hunger: f64,
    pub rest_energy_gain: f64,
    pub move_hunger_loss: f64,
    pub speed: f64,
    pub mating_cost: f64,
    pub hunger_gain: f64,
    pub decay_time: u32,
    pub grow_time: u32,
    pub mating_cooldown: u32,
    /// edge of a grown animal, equal to the cell size
    pub full_size: u32,
    pub birth_size: u32,
    /// width and height of the world
    pub bounds: [f64; 2],
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        if w.rows == 0 || w.cols == 0 {
            return Err(invalid("the grid needs at least one row and column"));
        }
        if w.cell_size == 0 {
            return Err(invalid("cell_size must be positive"));
        }
        if w.tick_rate == 0 {
            return Err(invalid("tick_rate must be positive"));
        }
        let v = &self.vegetation;
        if !(0.0..=1.).contains(&v.coverage) {
            return Err(invalid("vegetation coverage must be within 0..=1"));
        }
        if v.max_grazes == 0 {
            return Err(invalid("max_grazes must be positive"));
        }
        if v.refresh_time.is_nan() || v.refresh_time < 0. {
            return Err(invalid("refresh_time must not be negative"));
        }
        check_animal("grazer", &self.grazer)?;
        check_animal("predator", &self.predator)?;
        Ok(())
    }

    /// converts seconds into a whole number of ticks
    pub fn ticks(&self, seconds: f64) -> u32 {
        (seconds * self.world.tick_rate as f64).round() as u32
    }

    /// width and height of the world
    pub fn bounds(&self) -> [f64; 2] {
        let cell = self.world.cell_size as f64;
        [self.world.cols as f64 * cell, self.world.rows as f64 * cell]
    }

    pub fn refresh_ticks(&self) -> u32 {
        self.ticks(self.vegetation.refresh_time)
    }

    pub fn grazer_traits(&self) -> Traits {
        self.traits(&self.grazer, GRAZE_HUNGER_GAIN)
    }

    pub fn predator_traits(&self) -> Traits {
        self.traits(&self.predator, KILL_HUNGER_GAIN)
    }

    fn traits(&self, body: &AnimalConfig, default_gain: f64) -> Traits {
        let full_size = self.world.cell_size;
        let birth_size = ((body.birth_scale * full_size as f64) as u32).clamp(1, full_size);
        Traits {
            max_energy: body.max_energy,
            max_hunger: body.max_hunger,
            rest_energy_gain: body.rest_energy_gain,
            move_hunger_loss: body.move_hunger_loss,
            speed: body.speed,
            mating_cost: body.mating_cost,
            hunger_gain: body.hunger_gain.unwrap_or(default_gain),
            decay_time: self.ticks(body.decay_time),
            // growing every tick is the fastest there is
            grow_time: self.ticks(body.grow_time).max(1),
            mating_cooldown: self.ticks(body.mating_cooldown),
            full_size,
            birth_size,
            bounds: self.bounds(),
        }
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Invalid(msg.to_owned())
}

fn check_animal(species: &str, a: &AnimalConfig) -> Result<(), ConfigError> {
    if !(a.max_energy > 0. && a.max_hunger > 0.) {
        return Err(ConfigError::Invalid(format!(
            "{species}: max_energy and max_hunger must be positive"
        )));
    }
    if !(a.speed > 0.) {
        return Err(ConfigError::Invalid(format!(
            "{species}: speed must be positive"
        )));
    }
    if !(a.birth_scale > 0. && a.birth_scale <= 1.) {
        return Err(ConfigError::Invalid(format!(
            "{species}: birth_scale must be within (0, 1]"
        )));
    }
    let durations = [a.decay_time, a.grow_time, a.mating_cooldown];
    if durations.iter().any(|d| d.is_nan() || *d < 0.) {
        return Err(ConfigError::Invalid(format!(
            "{species}: durations must not be negative"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_reference_world() {
        let c = Config::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.bounds(), [600., 600.]);
        assert_eq!(c.refresh_ticks(), 90);
        assert_eq!(c.world.predators, 11);

        let g = c.grazer_traits();
        assert_eq!(g.decay_time, 300);
        assert_eq!(g.grow_time, 30);
        assert_eq!(g.mating_cooldown, 30);
        assert_eq!(g.full_size, 30);
        assert_eq!(g.birth_size, 7);
        assert_eq!(g.hunger_gain, 30.);
        assert_eq!(c.predator_traits().hunger_gain, 45.);
    }

    #[test]
    fn partial_file_keeps_the_other_defaults() {
        let c = Config::from_toml(
            r#"
            seed = 7

            [world]
            grazers = 60

            [predator]
            speed = 6.0
            "#,
        )
        .unwrap();
        assert_eq!(c.seed, 7);
        assert_eq!(c.world.grazers, 60);
        assert_eq!(c.world.rows, 20);
        assert_eq!(c.predator.speed, 6.);
        assert_eq!(c.predator.max_energy, 1000.);
        // the predator keeps its own meal size
        assert_eq!(c.predator_traits().hunger_gain, 45.);
        assert_eq!(c.grazer, AnimalConfig::default());

        let c = Config::from_toml("[grazer]
hunger_gain = 12.5
").unwrap();
        assert_eq!(c.grazer_traits().hunger_gain, 12.5);
    }

    #[test]
    fn tick_rate_scales_durations() {
        let c = Config::from_toml("[world]\ntick_rate = 60\n").unwrap();
        assert_eq!(c.refresh_ticks(), 180);
        assert_eq!(c.grazer_traits().decay_time, 600);
    }

    #[test]
    fn rejects_nonsense() {
        let e = Config::from_toml("[vegetation]\ncoverage = 1.5\n").unwrap_err();
        assert!(matches!(e, ConfigError::Invalid(_)));

        let e = Config::from_toml("[grazer]\nspeed = 0.0\n").unwrap_err();
        assert!(matches!(e, ConfigError::Invalid(_)));

        let e = Config::from_toml("[world]\nrows = \"many\"\n").unwrap_err();
        assert!(matches!(e, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let e = Config::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(e, ConfigError::Io { .. }));
    }
}
