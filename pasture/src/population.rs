use crate::animal::{Animal, Outcome, Species};
use crate::config::Traits;
use crate::species::Diet;
use crate::stablevec::StableVec;
use footprint::{Square, SweepVec};
use rand::Rng;
use tracing::trace;

/// what happened during one pass over a population
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassStats {
    pub births: usize,
    /// died of hunger or exhaustion
    pub starved: usize,
    /// carcasses that finished decaying
    pub decayed: usize,
}

/// all animals of one species, living and dead.
///
/// ids are stable for as long as an animal is around.
/// the spatial index is a snapshot, it gets rebuilt after every pass,
/// so queries see where everybody was when the pass started.
#[derive(Debug)]
pub struct Population {
    species: Species,
    members: StableVec<Animal>,
    index: SweepVec<usize>,
}

impl Population {
    pub fn new(species: Species) -> Self {
        Self {
            species,
            members: StableVec::default(),
            index: SweepVec::default(),
        }
    }

    pub fn seeded<R: Rng + ?Sized>(
        species: Species,
        count: usize,
        traits: &Traits,
        rng: &mut R,
    ) -> Self {
        let animals = (0..count).map(|_| Animal::seeded(species, traits, rng));
        Self::from_animals(species, animals)
    }

    pub fn from_animals<I: IntoIterator<Item = Animal>>(species: Species, animals: I) -> Self {
        let mut new = Self {
            species,
            members: animals.into_iter().collect(),
            index: SweepVec::default(),
        };
        new.reindex();
        new
    }

    pub fn get(&self, id: usize) -> Option<&Animal> {
        self.members.get(id)
    }
    pub fn get_mut(&mut self, id: usize) -> Option<&mut Animal> {
        self.members.get_mut(id)
    }
    pub fn iter(&self) -> impl Iterator<Item = &Animal> {
        self.members.iter()
    }
    pub fn iter_indexed(&self) -> impl Iterator<Item = (usize, &Animal)> {
        self.members.iter_indexed()
    }

    /// living and dead
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    pub fn alive(&self) -> usize {
        self.iter().filter(|a| a.alive).count()
    }
    pub fn dead(&self) -> usize {
        self.iter().filter(|a| !a.alive).count()
    }

    /// ids of the animals that were under the probe at the last reindex.
    /// animals taken out for their update are skipped
    pub fn overlapping(&self, probe: &Square) -> Vec<usize> {
        self.index
            .as_sweep_slice()
            .query_overlap(probe)
            .map(|(_s, id)| *id)
            .filter(|id| self.members.get(*id).is_some())
            .collect()
    }

    /// like [`Self::overlapping`], but with both squares scaled, see [`Square::near`]
    pub fn within(&self, probe: &Square, ratio: f64) -> Vec<usize> {
        self.index
            .as_sweep_slice()
            .query_near(probe, ratio)
            .map(|(_s, id)| *id)
            .filter(|id| self.members.get(*id).is_some())
            .collect()
    }

    pub fn reindex(&mut self) {
        let entries = self
            .members
            .iter_indexed()
            .map(|(id, a)| (a.footprint(), id))
            .collect();
        self.index = SweepVec::new_from(entries);
    }

    /// updates every animal once.
    ///
    /// children are held back until everybody had their turn,
    /// they start living in the next tick.
    pub fn advance<D, R>(&mut self, traits: &Traits, diet: &mut D, rng: &mut R) -> PassStats
    where
        D: Diet,
        R: Rng + ?Sized,
    {
        let mut stats = PassStats::default();
        let mut born = Vec::new();
        for id in self.members.indices() {
            // take the animal out, so it does not meet itself in the queries
            let Some(mut animal) = self.members.remove(id) else {
                continue;
            };
            let was_alive = animal.alive;
            match animal.update(traits, diet, self, rng) {
                Outcome::Lives => {}
                Outcome::Spawned(child) => born.push(child),
                Outcome::Decayed => {
                    trace!(species = ?self.species, id, "decayed");
                    stats.decayed += 1;
                    continue;
                }
            }
            if was_alive && !animal.alive {
                stats.starved += 1;
            }
            self.members.put(id, animal);
        }
        stats.births = born.len();
        self.members.extend(born);
        self.reindex();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animal::{Sex, State};
    use crate::species::{Grazer, Predator};
    use crate::testing::*;

    #[test]
    fn carcass_is_removed_exactly_after_decay_time() {
        let t = traits();
        let mut field = empty_field();
        let predators = Population::new(Species::Predator);
        let mut rng = rng();
        let mut starving = grown(Species::Grazer, [0., 0.], Sex::Male);
        starving.hunger = 0.;
        let mut pop = population(Species::Grazer, vec![starving]);

        let stats = pop.advance(&t, &mut Grazer::new(&mut field, &predators), &mut rng);
        assert_eq!(stats.starved, 1);
        assert_eq!(pop.dead(), 1);

        for _ in 1..t.decay_time {
            let stats = pop.advance(&t, &mut Grazer::new(&mut field, &predators), &mut rng);
            assert_eq!(stats.decayed, 0);
        }
        assert_eq!(pop.len(), 1);
        let stats = pop.advance(&t, &mut Grazer::new(&mut field, &predators), &mut rng);
        assert_eq!(stats.decayed, 1);
        assert!(pop.is_empty());
    }

    #[test]
    fn newborns_wait_for_the_next_tick() {
        let t = traits();
        let mut field = empty_field();
        let predators = Population::new(Species::Predator);
        let mut rng = rng();
        let mut mum = ready(Species::Grazer, [100., 100.], Sex::Female);
        mum.state = State::Mating;
        let dad = ready(Species::Grazer, [110., 100.], Sex::Male);
        let mut pop = population(Species::Grazer, vec![mum, dad]);

        let stats = pop.advance(&t, &mut Grazer::new(&mut field, &predators), &mut rng);
        assert_eq!(stats.births, 1);
        assert_eq!(pop.len(), 3);
        let child = pop.get(2).unwrap();
        assert_eq!(child.energy, t.max_energy);
        assert_eq!(child.size, t.birth_size);
        // the child is in the index already
        assert!(pop.overlapping(&child.footprint()).contains(&2));

        // nobody is ready any more
        assert!(pop.iter().all(|a| !a.can_mate));
    }

    #[test]
    fn children_fill_the_holes_of_the_decayed() {
        let t = traits();
        let mut field = empty_field();
        let predators = Population::new(Species::Predator);
        let mut rng = rng();
        let mut corpse = grown(Species::Grazer, [300., 300.], Sex::Male);
        corpse.die();
        corpse.decay = t.decay_time - 1;
        let mut mum = ready(Species::Grazer, [100., 100.], Sex::Female);
        mum.state = State::Mating;
        let dad = ready(Species::Grazer, [110., 100.], Sex::Male);
        let mut pop = population(Species::Grazer, vec![corpse, mum, dad]);

        let stats = pop.advance(&t, &mut Grazer::new(&mut field, &predators), &mut rng);
        assert_eq!(stats, PassStats {
            births: 1,
            starved: 0,
            decayed: 1
        });
        assert_eq!(pop.len(), 3);
        assert_eq!(pop.get(0).unwrap().size, t.birth_size);
    }

    #[test]
    fn only_one_child_per_couple_and_tick() {
        let t = traits();
        let mut field = empty_field();
        let predators = Population::new(Species::Predator);
        let mut rng = rng();
        let mut mum = ready(Species::Grazer, [100., 100.], Sex::Female);
        mum.state = State::Mating;
        let mut dad = ready(Species::Grazer, [110., 100.], Sex::Male);
        dad.state = State::Mating;
        let mut pop = population(Species::Grazer, vec![mum, dad]);
        let stats = pop.advance(&t, &mut Grazer::new(&mut field, &predators), &mut rng);
        assert_eq!(stats.births, 1);
    }

    #[test]
    fn queries_skip_the_animal_being_updated() {
        let a = grown(Species::Predator, [0., 0.], Sex::Male);
        let fp = a.footprint();
        let mut pop = population(Species::Predator, vec![a]);
        assert_eq!(pop.overlapping(&fp), vec![0]);
        let taken = pop.members.remove(0).unwrap();
        assert!(pop.overlapping(&fp).is_empty());
        assert!(pop.within(&fp, 7.).is_empty());
        pop.members.put(0, taken);
        assert_eq!(pop.within(&fp, 7.), vec![0]);
    }

    #[test]
    fn kills_show_up_in_the_prey() {
        let t = traits_of(Species::Predator);
        let mut prey = population(Species::Grazer, vec![grown(
            Species::Grazer,
            [100., 100.],
            Sex::Male,
        )]);
        let mut hunter = grown(Species::Predator, [105., 105.], Sex::Female);
        hunter.hunger = 100.;
        let mut hunters = population(Species::Predator, vec![hunter]);
        let mut rng = rng();

        // thinking finds the grazer right here, eating kills it
        let mut diet = Predator::new(&mut prey);
        hunters.advance(&t, &mut diet, &mut rng);
        hunters.advance(&t, &mut diet, &mut rng);
        assert_eq!(diet.kills, 1);
        assert_eq!(prey.alive(), 0);
        assert_eq!(prey.dead(), 1);
    }
}
