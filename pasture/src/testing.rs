//! small builders for hand made pastures, only used by the tests

use crate::animal::{Animal, Sex, Species};
use crate::config::{Config, Traits};
use crate::population::Population;
use crate::species::Grazer;
use crate::vegetation::{VegetationCell, VegetationField};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg as DetRng;

pub fn rng() -> DetRng {
    DetRng::seed_from_u64(0x5eed)
}

/// default grazer traits on the default 600x600 world
pub fn traits() -> Traits {
    traits_of(Species::Grazer)
}

pub fn traits_of(species: Species) -> Traits {
    let c = Config::default();
    match species {
        Species::Grazer => c.grazer_traits(),
        Species::Predator => c.predator_traits(),
    }
}

/// full size, fed and rested, but not ready to mate yet
pub fn grown(species: Species, pos: [f64; 2], sex: Sex) -> Animal {
    let t = traits_of(species);
    Animal::new(species, pos, t.full_size, sex, &t)
}

/// grown and ready to mate
pub fn ready(species: Species, pos: [f64; 2], sex: Sex) -> Animal {
    let t = traits_of(species);
    let mut a = grown(species, pos, sex);
    a.can_mate = true;
    a.mating_cooldown = t.mating_cooldown;
    a
}

pub fn population(species: Species, animals: Vec<Animal>) -> Population {
    Population::from_animals(species, animals)
}

pub fn empty_field() -> VegetationField {
    field_with(&[])
}

/// (row, col, grazes) on a default sized grid, all timers at zero
pub fn field_with(cells: &[(usize, usize, u8)]) -> VegetationField {
    let cells = cells
        .iter()
        .map(|&(row, col, grazes)| VegetationCell::new(row, col, grazes, 0))
        .collect();
    VegetationField::from_cells(cells, 5, 90, 30.)
}

pub fn grazer<'a>(field: &'a mut VegetationField, predators: &'a Population) -> Grazer<'a> {
    Grazer::new(field, predators)
}
