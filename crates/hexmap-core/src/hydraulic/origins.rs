//! Weighted pool of river source candidates.

use rand::Rng;

use crate::climate::ClimateField;
use crate::grid::HexGrid;

/// Candidate source cells. High, wet cells appear up to four times so they
/// are drawn more often.
#[derive(Debug, Default, Clone)]
pub struct OriginPool {
    candidates: Vec<usize>,
}

impl OriginPool {
    pub fn build(grid: &HexGrid, climate: &ClimateField, water_level: i32, elevation_maximum: i32) -> Self {
        let span = (elevation_maximum - water_level).max(1) as f32;
        let mut candidates = Vec::new();
        for i in 0..grid.len() {
            let cell = grid.cell(i);
            if cell.is_underwater() {
                continue;
            }
            let weight = climate.moisture[i] * (cell.elevation - water_level) as f32 / span;
            if weight > 0.75 {
                candidates.push(i);
                candidates.push(i);
            }
            if weight > 0.5 {
                candidates.push(i);
            }
            if weight > 0.25 {
                candidates.push(i);
            }
        }
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Remove and return a uniformly chosen candidate.
    pub fn take<R: Rng>(&mut self, rng: &mut R) -> Option<usize> {
        if self.candidates.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.candidates.len());
        Some(self.candidates.swap_remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn weights_oversample_high_wet_cells() {
        let mut grid = HexGrid::new_unchecked(4, 1, false);
        for (i, e) in [0, 2, 5, 8].into_iter().enumerate() {
            grid.cell_mut(i).elevation = e;
        }
        let climate = ClimateField::new(4, 1.0);
        let pool = OriginPool::build(&grid, &climate, 0, 8);
        let count = |cell| pool.candidates.iter().filter(|&&c| c == cell).count();
        // Weights 0, 0.25, 0.625, 1.0.
        assert_eq!(count(0), 0);
        assert_eq!(count(1), 0);
        assert_eq!(count(2), 2);
        assert_eq!(count(3), 4);
    }

    #[test]
    fn underwater_and_dry_cells_are_excluded() {
        let mut grid = HexGrid::new_unchecked(3, 1, false);
        grid.cell_mut(0).elevation = 8;
        grid.cell_mut(0).water_level = 9;
        grid.cell_mut(1).elevation = 8;
        let mut climate = ClimateField::new(3, 1.0);
        climate.moisture[1] = 0.0;
        let pool = OriginPool::build(&grid, &climate, 0, 8);
        assert!(pool.is_empty());
    }

    #[test]
    fn take_drains_the_pool() {
        let mut grid = HexGrid::new_unchecked(5, 1, false);
        for i in 0..5 {
            grid.cell_mut(i).elevation = 8;
        }
        let climate = ClimateField::new(5, 1.0);
        let mut pool = OriginPool::build(&grid, &climate, 0, 8);
        let mut rng = StdRng::seed_from_u64(0);
        let mut drawn = Vec::new();
        while let Some(c) = pool.take(&mut rng) {
            drawn.push(c);
        }
        drawn.sort_unstable();
        assert_eq!(drawn.len(), 20);
        assert_eq!(drawn.iter().filter(|&&c| c == 2).count(), 4);
    }
}
