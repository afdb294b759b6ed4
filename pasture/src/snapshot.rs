use crate::animal::{Animal, Species};
use crate::vegetation::{VegetationCell, grass_color};
use serde_derive::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Kind {
    Vegetation,
    Grazer,
    Predator,
}

impl From<Species> for Kind {
    fn from(s: Species) -> Self {
        match s {
            Species::Grazer => Kind::Grazer,
            Species::Predator => Kind::Predator,
        }
    }
}

/// a square to draw
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sprite {
    pub kind: Kind,
    pub pos: [f64; 2],
    pub size: f64,
    pub color: [u8; 3],
    pub alive: bool,
    pub can_mate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grazes_left: Option<u8>,
}

impl Sprite {
    pub fn of_cell(cell: &VegetationCell, cell_size: f64, max_grazes: u8) -> Self {
        Self {
            kind: Kind::Vegetation,
            pos: cell.footprint(cell_size).pos,
            size: cell_size,
            color: grass_color(cell.grazes_left(), max_grazes),
            alive: true,
            can_mate: false,
            grazes_left: Some(cell.grazes_left()),
        }
    }

    pub fn of_animal(animal: &Animal) -> Self {
        Self {
            kind: animal.species.into(),
            pos: animal.pos,
            size: animal.size as f64,
            color: animal.color(),
            alive: animal.alive,
            can_mate: animal.can_mate,
            grazes_left: None,
        }
    }
}

/// everything a renderer needs for one frame, drawn in order.
/// grass first, then grazers, then predators.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub cell_size: f64,
    pub width: f64,
    pub height: f64,
    pub sprites: Vec<Sprite>,
}

impl Snapshot {
    pub fn count(&self, kind: Kind) -> usize {
        self.sprites.iter().filter(|s| s.kind == kind).count()
    }
}
