use crate::config::Traits;
use crate::population::Population;
use crate::species::Diet;
use crate::vecmath::{self, Vector};
use footprint::Square;
use rand::Rng;
use serde_derive::Serialize;
use tracing::{debug, trace};

/// in a grazers thinking, a predator this close (in footprints, see [`Square::near`]) is a threat
pub const DANGER_RATIO: f64 = 3.;
/// how far animals look for a partner
pub const COURTSHIP_RATIO: f64 = 5.;
/// below this fraction of the maximum an animal goes looking for food or rest
pub const COMFORT: f64 = 0.6;

pub const DEAD_COLOR: [u8; 3] = [0, 0, 0];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum State {
    /// deciding what to do next
    Thinking,
    /// gaining energy
    Resting,
    /// on the way to the destination, costs extra energy and hunger
    Moving,
    Eating,
    /// trying to have a baby
    Mating,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Sex::Male
        } else {
            Sex::Female
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Species {
    Grazer,
    Predator,
}

/// what the population has to do with an animal after its update
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Lives,
    /// mating worked out, the child still needs a place in the population
    Spawned(Animal),
    /// the carcass is gone, drop it
    Decayed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Animal {
    pub species: Species,
    /// top left corner of the footprint
    pub pos: Vector,
    /// edge of the footprint, grows up to the cell size
    pub size: u32,
    /// can go below zero, which is what kills
    pub energy: f64,
    pub hunger: f64,
    pub state: State,
    pub destination: Option<Vector>,
    pub sex: Sex,
    pub can_mate: bool,
    pub mating_cooldown: u32,
    pub growth: u32,
    pub alive: bool,
    /// ticks since death
    pub decay: u32,
    /// the last thought was about a threat, the escape starts with the next one
    pub fleeing: bool,
}

impl Animal {
    pub fn new(species: Species, pos: Vector, size: u32, sex: Sex, t: &Traits) -> Self {
        Self {
            species,
            pos: vecmath::clamp_corner(pos, size as f64, t.bounds),
            size,
            energy: t.max_energy,
            hunger: t.max_hunger,
            state: State::Thinking,
            destination: None,
            sex,
            can_mate: false,
            mating_cooldown: 0,
            growth: 0,
            alive: true,
            decay: 0,
            fleeing: false,
        }
    }

    /// somewhere on the pasture, somewhere between a quarter and full grown
    pub fn seeded<R: Rng + ?Sized>(species: Species, t: &Traits, rng: &mut R) -> Self {
        let cell = t.full_size as f64;
        let scale = rng.random_range(0.25..1.);
        let size = ((scale * cell) as u32).clamp(1, t.full_size);
        let x = rng.random_range(0.0..=(t.bounds[0] - cell).max(0.));
        let y = rng.random_range(0.0..=(t.bounds[1] - cell).max(0.));
        let sex = Sex::random(rng);
        Self::new(species, [x, y], size, sex, t)
    }

    pub fn newborn<R: Rng + ?Sized>(species: Species, at: Vector, t: &Traits, rng: &mut R) -> Self {
        Self::new(species, at, t.birth_size, Sex::random(rng), t)
    }

    pub fn footprint(&self) -> Square {
        Square::new(self.pos, self.size as f64)
    }

    pub fn is_grown(&self, t: &Traits) -> bool {
        self.size >= t.full_size
    }

    pub fn is_hungry(&self, t: &Traits) -> bool {
        self.hunger < COMFORT * t.max_hunger
    }

    pub fn is_tired(&self, t: &Traits) -> bool {
        self.energy < COMFORT * t.max_energy
    }

    /// alive, the other sex and ready
    pub fn can_mate_with(&self, other: &Animal) -> bool {
        other.alive && other.can_mate && other.sex != self.sex
    }

    pub fn color(&self) -> [u8; 3] {
        if !self.alive {
            return DEAD_COLOR;
        }
        match (self.species, self.sex) {
            (Species::Grazer, Sex::Female) => [255, 255, 255],
            (Species::Grazer, Sex::Male) => [0xB4, 0xF0, 0xDC],
            (Species::Predator, Sex::Female) => [255, 0, 0],
            (Species::Predator, Sex::Male) => [0, 0, 255],
        }
    }

    /// kills the animal, the carcass sticks around for a while
    pub fn die(&mut self) {
        if !self.alive {
            return;
        }
        debug!(species = ?self.species, pos = ?self.pos, energy = self.energy, hunger = self.hunger, "died");
        self.alive = false;
        self.can_mate = false;
        self.destination = None;
        self.fleeing = false;
    }

    /// one tick in the life of an animal.
    ///
    /// the diet is how this animal senses and eats, `kin` is its own population
    /// (without the animal itself, which the population took out for the update).
    /// exactly one action runs per tick, none in the tick the animal dies.
    pub fn update<D, R>(
        &mut self,
        t: &Traits,
        diet: &mut D,
        kin: &mut Population,
        rng: &mut R,
    ) -> Outcome
    where
        D: Diet,
        R: Rng + ?Sized,
    {
        if !self.alive {
            self.decay += 1;
            return if self.decay >= t.decay_time {
                Outcome::Decayed
            } else {
                Outcome::Lives
            };
        }

        // just being alive costs
        self.energy -= 1.;
        self.hunger -= 1.;
        if self.energy < 0. || self.hunger < 0. {
            self.die();
            return Outcome::Lives;
        }

        self.mature(t);

        match self.state {
            State::Thinking => self.think(t, diet, kin, rng),
            State::Resting => self.rest(t, diet),
            State::Moving => self.travel(t),
            State::Eating => self.eat(t, diet),
            State::Mating => return self.mate(t, diet, kin, rng),
        }
        Outcome::Lives
    }

    fn mature(&mut self, t: &Traits) {
        if !self.is_grown(t) {
            self.growth += 1;
            if self.growth >= t.grow_time {
                self.growth = 0;
                self.size += 1;
                self.pos = vecmath::clamp_corner(self.pos, self.size as f64, t.bounds);
            }
        } else {
            if self.mating_cooldown < t.mating_cooldown {
                self.mating_cooldown += 1;
            }
            if self.mating_cooldown >= t.mating_cooldown {
                self.can_mate = true;
            }
        }
    }

    fn switch(&mut self, next: State) {
        if self.state != next {
            trace!(species = ?self.species, from = ?self.state, to = ?next, "state");
            self.state = next;
        }
    }

    fn think<D, R>(&mut self, t: &Traits, diet: &mut D, kin: &Population, rng: &mut R)
    where
        D: Diet,
        R: Rng + ?Sized,
    {
        // 0. the escape planned last time
        if self.fleeing {
            self.fleeing = false;
            if self.destination.is_some() {
                self.switch(State::Moving);
                return;
            }
        }
        // 1. avoiding immediate danger
        if let Some(threat) = diet.threat(self) {
            self.destination = Some(self.escape_from(threat, t, rng));
            self.fleeing = true;
            return;
        }
        // 2. keeping hunger up
        if self.is_hungry(t) {
            if diet.nearby_food(self) {
                self.switch(State::Eating);
            } else {
                self.destination = Some(diet.find_food(self, t, rng));
                self.switch(State::Moving);
            }
        // 3. keeping energy up
        } else if self.is_tired(t) {
            self.switch(State::Resting);
        // 4. reproducing
        } else if self.can_mate {
            if self.partner_in_reach(kin) {
                self.switch(State::Mating);
            } else {
                self.destination = Some(self.find_mate(t, kin, rng));
                self.switch(State::Moving);
            }
        // 5. nothing else to do
        } else {
            let next = match rng.random_range(0..3) {
                0 => State::Eating,
                1 => State::Resting,
                _ => State::Moving,
            };
            if next == State::Moving {
                self.destination = Some(self.random_destination(t, rng));
            }
            self.switch(next);
        }
    }

    /// one danger radius straight away from the threat
    fn escape_from<R: Rng + ?Sized>(&self, threat: Vector, t: &Traits, rng: &mut R) -> Vector {
        let away = vecmath::norm(vecmath::sub(self.footprint().center(), threat));
        let away = if away == [0., 0.] {
            // right on top of us, any direction will do
            let angle = rng.random_range(0.0..std::f64::consts::TAU);
            [angle.cos(), angle.sin()]
        } else {
            away
        };
        let run = DANGER_RATIO * t.full_size as f64;
        let target = vecmath::add(self.pos, vecmath::scale(away, run));
        vecmath::clamp_corner(target, self.size as f64, t.bounds)
    }

    fn rest<D: Diet>(&mut self, t: &Traits, diet: &D) {
        self.energy += t.rest_energy_gain;
        if self.energy >= t.max_energy {
            self.energy = t.max_energy;
            self.switch(State::Thinking);
        } else if self.is_hungry(t) || diet.threat(self).is_some() {
            self.switch(State::Thinking);
        }
    }

    /// costs the same for every tick spent moving, no matter how far the step is
    fn travel(&mut self, t: &Traits) {
        let Some(dest) = self.destination else {
            self.switch(State::Thinking);
            return;
        };
        let delta = vecmath::sub(dest, self.pos);
        let dist = vecmath::len(delta);
        if dist < t.speed {
            // don't overshoot the destination
            self.pos = vecmath::clamp_corner(dest, self.size as f64, t.bounds);
            self.destination = None;
            self.switch(State::Thinking);
        } else {
            let step = vecmath::add(self.pos, vecmath::scale(vecmath::norm(delta), t.speed));
            self.pos = vecmath::clamp_corner(step, self.size as f64, t.bounds);
        }
        self.energy -= t.speed;
        self.hunger -= t.move_hunger_loss;
    }

    fn eat<D: Diet>(&mut self, t: &Traits, diet: &mut D) {
        if diet.eat(self) {
            self.hunger = (self.hunger + t.hunger_gain).min(t.max_hunger);
        }
        self.switch(State::Thinking);
    }

    fn mate<D, R>(&mut self, t: &Traits, diet: &D, kin: &mut Population, rng: &mut R) -> Outcome
    where
        D: Diet,
        R: Rng + ?Sized,
    {
        self.switch(State::Thinking);
        if !self.can_mate {
            return Outcome::Lives;
        }
        let partner = kin
            .overlapping(&self.footprint())
            .into_iter()
            .find(|id| kin.get(*id).is_some_and(|p| self.can_mate_with(p)));
        let Some(partner) = partner.and_then(|id| kin.get_mut(id)) else {
            return Outcome::Lives;
        };
        partner.pay_for_mating(t);
        self.pay_for_mating(t);

        let child = diet.spawn_offspring(self, t, rng);
        debug!(species = ?child.species, pos = ?child.pos, "born");
        Outcome::Spawned(child)
    }

    fn pay_for_mating(&mut self, t: &Traits) {
        self.energy -= t.mating_cost;
        self.hunger -= t.mating_cost;
        self.mating_cooldown = 0;
        self.can_mate = false;
    }

    fn partner_in_reach(&self, kin: &Population) -> bool {
        kin.overlapping(&self.footprint())
            .into_iter()
            .any(|id| kin.get(id).is_some_and(|p| self.can_mate_with(p)))
    }

    /// halfway to the closest partner around, or just somewhere else
    fn find_mate<R: Rng + ?Sized>(&self, t: &Traits, kin: &Population, rng: &mut R) -> Vector {
        let center = self.footprint().center();
        let closest = kin
            .within(&self.footprint(), COURTSHIP_RATIO)
            .into_iter()
            .filter_map(|id| kin.get(id))
            .filter(|p| self.can_mate_with(p))
            .min_by(|a, b| {
                let da = vecmath::dist(a.footprint().center(), center);
                let db = vecmath::dist(b.footprint().center(), center);
                da.total_cmp(&db)
            });
        match closest {
            Some(p) => {
                let meet = vecmath::midpoint(self.pos, p.pos);
                vecmath::clamp_corner(meet, self.size as f64, t.bounds)
            }
            None => self.random_destination(t, rng),
        }
    }

    /// within one cell of the current position, kept on the pasture
    pub fn random_destination<R: Rng + ?Sized>(&self, t: &Traits, rng: &mut R) -> Vector {
        let cell = t.full_size as f64;
        let x = self.pos[0] + rng.random_range(-cell..=cell);
        let y = self.pos[1] + rng.random_range(-cell..=cell);
        vecmath::clamp_corner([x, y], self.size as f64, t.bounds)
    }
}
