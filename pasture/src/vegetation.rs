use crate::config::Config;
use footprint::{Square, SweepVec};
use rand::Rng;
use rayon::prelude::*;
use serde_derive::Serialize;

/// from bare soil to lush grass, one shade per graze left
pub const GRASS_COLORS: [[u8; 3]; 6] = [
    [96, 75, 9],
    [81, 100, 9],
    [58, 100, 9],
    [34, 111, 9],
    [48, 131, 11],
    [88, 174, 15],
];

/// one square of the grid that has grass on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct VegetationCell {
    pub row: usize,
    pub col: usize,
    grazes_left: u8,
    since_regrowth: u32,
}

impl VegetationCell {
    pub fn new(row: usize, col: usize, grazes_left: u8, since_regrowth: u32) -> Self {
        Self {
            row,
            col,
            grazes_left,
            since_regrowth,
        }
    }
    pub fn grazes_left(&self) -> u8 {
        self.grazes_left
    }
    pub fn since_regrowth(&self) -> u32 {
        self.since_regrowth
    }
    pub fn footprint(&self, cell_size: f64) -> Square {
        Square::new(
            [self.col as f64 * cell_size, self.row as f64 * cell_size],
            cell_size,
        )
    }

    // full cells do not count time, so a cell that just got grazed from full starts with
    // whatever its timer was when it filled up
    fn regrow(&mut self, max: u8, refresh: u32) {
        if self.grazes_left >= max {
            return;
        }
        self.since_regrowth += 1;
        if self.since_regrowth >= refresh {
            self.grazes_left += 1;
            self.since_regrowth = 0;
        }
    }
}

/// maps any graze count onto the six shades
pub fn grass_color(grazes_left: u8, max_grazes: u8) -> [u8; 3] {
    let max = max_grazes.max(1) as usize;
    let level = grazes_left.min(max_grazes) as usize * (GRASS_COLORS.len() - 1) / max;
    GRASS_COLORS[level]
}

/// the grass of the pasture.
///
/// the grid never changes shape, so the spatial index over it is built once.
/// bare squares simply have no cell.
#[derive(Debug)]
pub struct VegetationField {
    cells: Vec<VegetationCell>,
    index: SweepVec<usize>,
    max_grazes: u8,
    refresh: u32,
    cell_size: f64,
}

impl VegetationField {
    pub fn new<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Self {
        let max = config.vegetation.max_grazes;
        let refresh = config.refresh_ticks();
        let mut cells = Vec::with_capacity(config.world.rows * config.world.cols);
        for row in 0..config.world.rows {
            for col in 0..config.world.cols {
                if rng.random_bool(config.vegetation.coverage) {
                    // random timers so not all of the pasture regrows in the same tick
                    let grazes = rng.random_range(0..=max);
                    let timer = rng.random_range(0..=refresh);
                    cells.push(VegetationCell::new(row, col, grazes, timer));
                }
            }
        }
        Self::from_cells(cells, max, refresh, config.world.cell_size as f64)
    }

    /// graze counts above `max_grazes` are cut down to it
    pub fn from_cells(
        mut cells: Vec<VegetationCell>,
        max_grazes: u8,
        refresh: u32,
        cell_size: f64,
    ) -> Self {
        for c in cells.iter_mut() {
            c.grazes_left = c.grazes_left.min(max_grazes);
        }
        let index = cells
            .iter()
            .enumerate()
            .map(|(id, c)| (c.footprint(cell_size), id))
            .collect();
        Self {
            cells,
            index: SweepVec::new_from(index),
            max_grazes,
            refresh,
            cell_size,
        }
    }

    /// lets every cell that is not full grow for one tick.
    /// cells do not influence each other, so the order does not matter.
    pub fn tick(&mut self) {
        let (max, refresh) = (self.max_grazes, self.refresh);
        self.cells
            .par_iter_mut()
            .for_each(|c| c.regrow(max, refresh));
    }

    /// takes one graze off the cell, fails on an empty (or unknown) cell without touching it.
    /// the regrowth timer keeps running as it was
    pub fn graze(&mut self, id: usize) -> bool {
        match self.cells.get_mut(id) {
            Some(c) if c.grazes_left > 0 => {
                c.grazes_left -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn cell(&self, id: usize) -> Option<&VegetationCell> {
        self.cells.get(id)
    }
    pub fn cells(&self) -> &[VegetationCell] {
        &self.cells
    }
    pub fn color(&self, id: usize) -> Option<[u8; 3]> {
        self.cell(id)
            .map(|c| grass_color(c.grazes_left, self.max_grazes))
    }
    pub fn max_grazes(&self) -> u8 {
        self.max_grazes
    }
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// ids of the cells under the probe
    pub fn overlapping(&self, probe: &Square) -> Vec<usize> {
        self.index
            .as_sweep_slice()
            .query_overlap(probe)
            .map(|(_s, id)| *id)
            .collect()
    }

    /// ids of the cells near the probe, see [`Square::near`]
    pub fn within(&self, probe: &Square, ratio: f64) -> Vec<usize> {
        self.index
            .as_sweep_slice()
            .query_near(probe, ratio)
            .map(|(_s, id)| *id)
            .collect()
    }

    pub fn total_grazes(&self) -> u64 {
        self.cells.iter().map(|c| c.grazes_left as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg as DetRng;

    fn single(grazes: u8, timer: u32) -> VegetationField {
        VegetationField::from_cells(vec![VegetationCell::new(0, 0, grazes, timer)], 5, 90, 30.)
    }

    #[test]
    fn regrows_exactly_after_refresh_time() {
        let mut field = single(2, 0);
        for _ in 0..89 {
            field.tick();
        }
        assert_eq!(field.cell(0).unwrap().grazes_left(), 2);
        field.tick();
        let c = field.cell(0).unwrap();
        assert_eq!(c.grazes_left(), 3);
        assert_eq!(c.since_regrowth(), 0);

        for _ in 0..90 {
            field.tick();
        }
        assert_eq!(field.cell(0).unwrap().grazes_left(), 4);
    }

    #[test]
    fn full_cells_do_not_count() {
        let mut field = single(5, 12);
        for _ in 0..500 {
            field.tick();
        }
        let c = field.cell(0).unwrap();
        assert_eq!(c.grazes_left(), 5);
        assert_eq!(c.since_regrowth(), 12);
    }

    #[test]
    fn grazing_empty_cell_changes_nothing() {
        let mut field = single(0, 40);
        let before = *field.cell(0).unwrap();
        assert!(!field.graze(0));
        assert_eq!(*field.cell(0).unwrap(), before);
        assert!(!field.graze(17));
    }

    #[test]
    fn grazing_leaves_the_timer_alone() {
        let mut field = single(3, 40);
        assert!(field.graze(0));
        let c = field.cell(0).unwrap();
        assert_eq!(c.grazes_left(), 2);
        assert_eq!(c.since_regrowth(), 40);
    }

    #[test]
    fn grazes_stay_in_bounds() {
        let mut rng = DetRng::seed_from_u64(99);
        let mut field = VegetationField::new(&Config::default(), &mut rng);
        let n = field.cells().len();
        for _ in 0..2_000 {
            for _ in 0..20 {
                let id = rng.random_range(0..n);
                field.graze(id);
            }
            field.tick();
            assert!(field.cells().iter().all(|c| c.grazes_left() <= 5));
        }
    }

    #[test]
    fn coverage_decides_the_cell_count() {
        let mut rng = DetRng::seed_from_u64(1);
        let mut config = Config::default();
        config.vegetation.coverage = 1.;
        let field = VegetationField::new(&config, &mut rng);
        assert_eq!(field.cells().len(), 400);
        assert!(field.cells().iter().all(|c| c.since_regrowth() <= 90));

        config.vegetation.coverage = 0.;
        let field = VegetationField::new(&config, &mut rng);
        assert!(field.cells().is_empty());
        assert!(field.overlapping(&Square::new([10., 10.], 30.)).is_empty());
    }

    #[test]
    fn queries_find_the_cells_below() {
        let cells = (0..3)
            .flat_map(|row| (0..3).map(move |col| VegetationCell::new(row, col, 1, 0)))
            .collect();
        let field = VegetationField::from_cells(cells, 5, 90, 30.);
        // straddles the corner shared by the four top left cells
        let mut under = field.overlapping(&Square::new([20., 20.], 20.));
        under.sort();
        assert_eq!(under, vec![0, 1, 3, 4]);
        // ratio 3 around a centred square covers the whole 3x3 grid
        assert_eq!(field.within(&Square::new([35., 35.], 20.), 3.).len(), 9);
    }

    #[test]
    fn colors_follow_the_graze_count() {
        assert_eq!(grass_color(0, 5), GRASS_COLORS[0]);
        assert_eq!(grass_color(3, 5), GRASS_COLORS[3]);
        assert_eq!(grass_color(5, 5), GRASS_COLORS[5]);
        assert_eq!(grass_color(10, 10), GRASS_COLORS[5]);
        assert_eq!(grass_color(1, 10), GRASS_COLORS[0]);
        assert_eq!(single(4, 0).color(0), Some(GRASS_COLORS[4]));
    }
}
