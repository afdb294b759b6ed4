use crate::animal::Species;
use crate::config::{Config, ConfigError, Traits};
use crate::population::{PassStats, Population};
use crate::snapshot::{Snapshot, Sprite};
use crate::species::{Grazer, Predator};
use crate::vegetation::VegetationField;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg as DetRng;
use std::io::Write;
use tracing::{debug, info};

/// the whole pasture.
///
/// one tick updates the grass, then every grazer, then every predator.
/// everything random comes out of the one seeded rng,
/// so the same config always plays out the same way.
#[derive(Debug)]
pub struct Simulation {
    config: Config,
    grazer_traits: Traits,
    predator_traits: Traits,
    field: VegetationField,
    grazers: Population,
    predators: Population,
    rng: DetRng,
    time: u64,
    /// since the last report
    tally: Tally,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    births: usize,
    deaths: usize,
    decayed: usize,
}

impl Tally {
    fn add(&mut self, pass: PassStats) {
        self.births += pass.births;
        self.deaths += pass.starved;
        self.decayed += pass.decayed;
    }
}

impl Simulation {
    /// seeds a new pasture, fails on a config that does not make sense
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = DetRng::seed_from_u64(config.seed);
        let field = VegetationField::new(&config, &mut rng);
        let grazers = Population::seeded(
            Species::Grazer,
            config.world.grazers,
            &config.grazer_traits(),
            &mut rng,
        );
        let predators = Population::seeded(
            Species::Predator,
            config.world.predators,
            &config.predator_traits(),
            &mut rng,
        );
        info!(
            seed = config.seed,
            cells = field.cells().len(),
            grazers = grazers.len(),
            predators = predators.len(),
            "seeded the pasture"
        );
        Ok(Self::from_parts(config, field, grazers, predators, rng))
    }

    /// for hand made pastures
    pub fn from_parts(
        config: Config,
        field: VegetationField,
        grazers: Population,
        predators: Population,
        rng: DetRng,
    ) -> Self {
        Self {
            grazer_traits: config.grazer_traits(),
            predator_traits: config.predator_traits(),
            config,
            field,
            grazers,
            predators,
            rng,
            time: 0,
            tally: Tally::default(),
        }
    }

    pub fn tick(&mut self) {
        self.time += 1;
        self.field.tick();

        // grazers see the predators where they were last tick
        let mut grazer = Grazer::new(&mut self.field, &self.predators);
        let grazed = self
            .grazers
            .advance(&self.grazer_traits, &mut grazer, &mut self.rng);

        // predators see the grazers where they are now
        let mut predator = Predator::new(&mut self.grazers);
        let hunted = self
            .predators
            .advance(&self.predator_traits, &mut predator, &mut self.rng);
        let kills = predator.kills;

        self.tally.add(grazed);
        self.tally.add(hunted);
        self.tally.deaths += kills;
        debug!(
            time = self.time,
            births = grazed.births + hunted.births,
            starved = grazed.starved + hunted.starved,
            kills,
            "tick"
        );
    }

    pub fn time(&self) -> u64 {
        self.time
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn field(&self) -> &VegetationField {
        &self.field
    }
    pub fn grazers(&self) -> &Population {
        &self.grazers
    }
    pub fn predators(&self) -> &Population {
        &self.predators
    }

    /// nobody left, not even a carcass
    pub fn is_extinct(&self) -> bool {
        self.grazers.is_empty() && self.predators.is_empty()
    }

    pub fn snapshot(&self) -> Snapshot {
        let cell_size = self.field.cell_size();
        let max = self.field.max_grazes();
        let [width, height] = self.config.bounds();
        let sprites = self
            .field
            .cells()
            .iter()
            .map(|c| Sprite::of_cell(c, cell_size, max))
            .chain(self.grazers.iter().map(Sprite::of_animal))
            .chain(self.predators.iter().map(Sprite::of_animal))
            .collect();
        Snapshot {
            tick: self.time,
            cell_size,
            width,
            height,
            sprites,
        }
    }

    /// the state of the pasture, births and deaths count since the last report
    pub fn report(&mut self) -> Report {
        let tally = std::mem::take(&mut self.tally);
        let vegetation = self.field.total_grazes();
        let cells = self.field.cells().len();
        Report {
            time: self.time,
            grazers: self.grazers.alive(),
            dead_grazers: self.grazers.dead(),
            predators: self.predators.alive(),
            dead_predators: self.predators.dead(),
            births: tally.births,
            deaths: tally.deaths,
            decayed: tally.decayed,
            vegetation,
            avg_vegetation: if cells == 0 {
                0.
            } else {
                vegetation as f64 / cells as f64
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub time: u64,
    pub grazers: usize,
    pub dead_grazers: usize,
    pub predators: usize,
    pub dead_predators: usize,
    pub births: usize,
    /// starved, exhausted or eaten
    pub deaths: usize,
    pub decayed: usize,
    /// grazes left on the whole pasture
    pub vegetation: u64,
    pub avg_vegetation: f64,
}

impl Report {
    pub const CSV_HEADER: &'static str = "time, grazers, dead_grazers, predators, dead_predators, births, deaths, decayed, vegetation, avg_vegetation";

    pub fn log(&self) {
        info!(
            time = self.time,
            grazers = self.grazers,
            dead_grazers = self.dead_grazers,
            predators = self.predators,
            dead_predators = self.dead_predators,
            births = self.births,
            deaths = self.deaths,
            decayed = self.decayed,
            vegetation = self.vegetation,
            avg_vegetation = self.avg_vegetation,
            "report"
        );
    }

    pub fn write_csv<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        writeln!(
            out,
            "{}, {}, {}, {}, {}, {}, {}, {}, {}, {}",
            self.time,
            self.grazers,
            self.dead_grazers,
            self.predators,
            self.dead_predators,
            self.births,
            self.deaths,
            self.decayed,
            self.vegetation,
            self.avg_vegetation
        )
    }
}
