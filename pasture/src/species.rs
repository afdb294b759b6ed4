//! What sets grazers and predators apart: what they eat, how they find it
//! and what they are afraid of.
//!
//! Everything else, the state machine, growing up, mating, lives in [`Animal`].
//! A diet borrows the parts of the world its species interacts with
//! for the duration of one population pass.

use crate::animal::{Animal, DANGER_RATIO, Species};
use crate::config::Traits;
use crate::population::Population;
use crate::vecmath::{self, Vector};
use crate::vegetation::VegetationField;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::trace;

/// how far grazers look for grass, in footprints
pub const FORAGE_RATIO: f64 = 3.;
/// how far predators look for prey, in footprints
pub const HUNT_RATIO: f64 = 7.;

pub trait Diet {
    const SPECIES: Species;

    /// centre of the closest live threat, if there is one
    fn threat(&self, _me: &Animal) -> Option<Vector> {
        None
    }

    /// whether there is something to eat right under the animal
    fn nearby_food(&self, me: &Animal) -> bool;

    /// where to go for food, always returns somewhere to go
    fn find_food<R: Rng + ?Sized>(&self, me: &Animal, t: &Traits, rng: &mut R) -> Vector;

    /// takes one meal from under the animal, returns whether there was one
    fn eat(&mut self, me: &Animal) -> bool;

    fn spawn_offspring<R: Rng + ?Sized>(&self, parent: &Animal, t: &Traits, rng: &mut R) -> Animal {
        Animal::newborn(Self::SPECIES, parent.pos, t, rng)
    }
}

/// eats grass, runs from predators.
///
/// the predators are the ones of the last tick, they move after the grazers.
pub struct Grazer<'a> {
    pub field: &'a mut VegetationField,
    pub predators: &'a Population,
}

impl<'a> Grazer<'a> {
    pub fn new(field: &'a mut VegetationField, predators: &'a Population) -> Self {
        Self { field, predators }
    }
}

impl Diet for Grazer<'_> {
    const SPECIES: Species = Species::Grazer;

    fn threat(&self, me: &Animal) -> Option<Vector> {
        let fp = me.footprint();
        let center = fp.center();
        self.predators
            .within(&fp, DANGER_RATIO)
            .into_iter()
            .filter_map(|id| self.predators.get(id))
            .filter(|p| p.alive)
            .map(|p| p.footprint().center())
            .min_by(|a, b| vecmath::dist(*a, center).total_cmp(&vecmath::dist(*b, center)))
    }

    fn nearby_food(&self, me: &Animal) -> bool {
        self.field
            .overlapping(&me.footprint())
            .into_iter()
            .any(|id| self.field.cell(id).is_some_and(|c| c.grazes_left() > 0))
    }

    /// the lushest cell around, ties are broken randomly
    fn find_food<R: Rng + ?Sized>(&self, me: &Animal, t: &Traits, rng: &mut R) -> Vector {
        let mut best = 0;
        let mut lushest = Vec::new();
        for id in self.field.within(&me.footprint(), FORAGE_RATIO) {
            let Some(cell) = self.field.cell(id) else {
                continue;
            };
            let grazes = cell.grazes_left();
            if grazes > best {
                best = grazes;
                lushest.clear();
            }
            if grazes == best && grazes > 0 {
                lushest.push(cell.footprint(self.field.cell_size()).pos);
            }
        }
        match lushest.choose(rng) {
            Some(pos) => *pos,
            None => me.random_destination(t, rng),
        }
    }

    fn eat(&mut self, me: &Animal) -> bool {
        for id in self.field.overlapping(&me.footprint()) {
            if self.field.graze(id) {
                trace!(cell = id, "grazed");
                return true;
            }
        }
        false
    }
}

/// hunts grazers, fears nothing.
///
/// the grazers have already moved this tick when the predators get to think.
pub struct Predator<'a> {
    pub prey: &'a mut Population,
    /// grazers killed during this pass
    pub kills: usize,
}

impl<'a> Predator<'a> {
    pub fn new(prey: &'a mut Population) -> Self {
        Self { prey, kills: 0 }
    }
}

impl Diet for Predator<'_> {
    const SPECIES: Species = Species::Predator;

    fn nearby_food(&self, me: &Animal) -> bool {
        self.prey
            .overlapping(&me.footprint())
            .into_iter()
            .any(|id| self.prey.get(id).is_some_and(|p| p.alive))
    }

    /// straight at the closest live grazer around
    fn find_food<R: Rng + ?Sized>(&self, me: &Animal, t: &Traits, rng: &mut R) -> Vector {
        let center = me.footprint().center();
        let closest = self
            .prey
            .within(&me.footprint(), HUNT_RATIO)
            .into_iter()
            .filter_map(|id| self.prey.get(id))
            .filter(|p| p.alive)
            .map(|p| p.footprint().center())
            .min_by(|a, b| vecmath::dist(*a, center).total_cmp(&vecmath::dist(*b, center)));
        match closest {
            Some(target) => vecmath::clamp_corner(target, me.size as f64, t.bounds),
            None => me.random_destination(t, rng),
        }
    }

    /// kills the first live grazer under the predator
    fn eat(&mut self, me: &Animal) -> bool {
        let victim = self
            .prey
            .overlapping(&me.footprint())
            .into_iter()
            .find(|id| self.prey.get(*id).is_some_and(|p| p.alive));
        match victim.and_then(|id| self.prey.get_mut(id)) {
            Some(victim) => {
                victim.die();
                self.kills += 1;
                true
            }
            None => false,
        }
    }
}
