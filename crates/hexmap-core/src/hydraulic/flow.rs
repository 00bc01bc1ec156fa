//! A single river walk from a source cell down to water or a lake.

use rand::Rng;

use crate::coords::HexDirection;
use crate::grid::HexGrid;

/// Knobs for one walk.
#[derive(Debug, Clone, Copy)]
pub struct WalkParams {
    pub extra_lake_probability: f32,
    pub elevation_minimum: i32,
    /// Longest river (in cells) the walk may produce.
    pub max_length: usize,
}

/// Turn `cell` into a lake one level below its current ground.
fn flood(grid: &mut HexGrid, cell: usize, water_level: i32, elevation_minimum: i32) {
    let c = grid.cell_mut(cell);
    c.water_level = water_level;
    if c.elevation > elevation_minimum {
        c.elevation -= 1;
    }
}

/// Carve a river starting at `origin` and return the cells it runs
/// through, origin first. A river that joins another stops before the
/// junction cell, which already belongs to the other river. An empty result
/// means no river could start.
pub fn walk_river<R: Rng>(
    grid: &mut HexGrid,
    origin: usize,
    params: &WalkParams,
    rng: &mut R,
) -> Vec<usize> {
    let mut path = vec![origin];
    let mut cell = origin;
    let mut direction = HexDirection::NE;
    let mut flow_directions: Vec<HexDirection> = Vec::with_capacity(24);
    let mut joined = false;

    while !grid.cell(cell).is_underwater() && path.len() < params.max_length {
        let elevation = grid.cell(cell).elevation;
        let mut min_neighbor_elevation = i32::MAX;
        let mut confluence = None;
        flow_directions.clear();

        for (d, neighbor) in grid.neighbors(cell) {
            let n = grid.cell(neighbor);
            min_neighbor_elevation = min_neighbor_elevation.min(n.elevation);
            if neighbor == origin || n.incoming_river().is_some() {
                continue;
            }
            let delta = n.elevation - elevation;
            if delta > 0 {
                continue;
            }
            if n.outgoing_river().is_some() {
                confluence = Some((d, neighbor));
                break;
            }
            if delta < 0 {
                flow_directions.extend([d; 3]);
            }
            if path.len() == 1 || (d != direction.next2() && d != direction.previous2()) {
                flow_directions.push(d);
            }
            flow_directions.push(d);
        }

        if let Some((d, _)) = confluence {
            joined = grid.set_outgoing_river(cell, d);
            break;
        }

        if flow_directions.is_empty() {
            if path.len() == 1 {
                return Vec::new();
            }
            if min_neighbor_elevation >= elevation {
                let c = grid.cell_mut(cell);
                c.water_level = min_neighbor_elevation;
                if min_neighbor_elevation == elevation && elevation > params.elevation_minimum {
                    c.elevation -= 1;
                }
            }
            break;
        }

        direction = flow_directions[rng.gen_range(0..flow_directions.len())];
        let Some(next) = grid.neighbor(cell, direction) else {
            break;
        };
        if !grid.set_outgoing_river(cell, direction) {
            break;
        }
        path.push(next);

        if min_neighbor_elevation >= elevation
            && rng.gen::<f32>() < params.extra_lake_probability
        {
            flood(grid, cell, elevation, params.elevation_minimum);
        }
        cell = next;
    }

    if path.len() == 1 && !joined {
        path.clear();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(max_length: usize) -> WalkParams {
        WalkParams { extra_lake_probability: 0.0, elevation_minimum: -2, max_length }
    }

    /// A staircase row drains east into the sea.
    fn staircase() -> HexGrid {
        let mut grid = HexGrid::new_unchecked(8, 1, false);
        for i in 0..8 {
            grid.cell_mut(i).elevation = 7 - i as i32;
        }
        grid.cell_mut(7).water_level = 2;
        grid
    }

    #[test]
    fn river_runs_downhill_to_water() {
        let mut grid = staircase();
        let mut rng = StdRng::seed_from_u64(1);
        let path = walk_river(&mut grid, 0, &params(100), &mut rng);
        assert_eq!(path, (0..8).collect::<Vec<_>>());
        for w in path.windows(2) {
            assert_eq!(grid.cell(w[0]).outgoing_river(), Some(HexDirection::E));
            assert_eq!(grid.cell(w[1]).incoming_river(), Some(HexDirection::W));
        }
    }

    #[test]
    fn walk_is_truncated_at_max_length() {
        let mut grid = staircase();
        let mut rng = StdRng::seed_from_u64(1);
        let path = walk_river(&mut grid, 0, &params(3), &mut rng);
        assert_eq!(path, vec![0, 1, 2]);
        assert_eq!(grid.cell(2).outgoing_river(), None);
    }

    /// A pit with no way down fills to its lowest rim.
    #[test]
    fn terminal_lake_forms_in_a_pit() {
        let mut grid = HexGrid::new_unchecked(3, 1, false);
        grid.cell_mut(0).elevation = 3;
        grid.cell_mut(1).elevation = 2;
        grid.cell_mut(2).elevation = 4;
        let mut rng = StdRng::seed_from_u64(0);
        let path = walk_river(&mut grid, 0, &params(10), &mut rng);
        assert_eq!(path, vec![0, 1]);
        assert_eq!(grid.cell(1).water_level, 3);
        assert!(grid.cell(1).is_underwater());
    }

    #[test]
    fn isolated_peak_cannot_start_a_river() {
        let mut grid = HexGrid::new_unchecked(3, 1, false);
        grid.cell_mut(1).elevation = 0;
        grid.cell_mut(0).elevation = 5;
        grid.cell_mut(2).elevation = 5;
        let mut rng = StdRng::seed_from_u64(0);
        assert!(walk_river(&mut grid, 1, &params(10), &mut rng).is_empty());
        assert!(!grid.cell(1).has_river());
    }

    /// A second river joining an existing one stops at the junction, and
    /// the junction cell is not counted as part of the new river.
    #[test]
    fn confluence_joins_existing_river() {
        let mut grid = staircase();
        assert!(grid.set_outgoing_river(3, HexDirection::E));
        let mut rng = StdRng::seed_from_u64(2);
        let path = walk_river(&mut grid, 0, &params(100), &mut rng);
        assert_eq!(path, vec![0, 1, 2]);
        assert_eq!(grid.cell(2).outgoing_river(), Some(HexDirection::E));
        assert_eq!(grid.cell(3).incoming_river(), Some(HexDirection::W));
        assert_eq!(grid.cell(3).outgoing_river(), Some(HexDirection::E));
    }

    /// Leaving a cell no higher than any neighbour floods it when extra
    /// lakes are certain: water rises to the old ground and the ground
    /// drops by one.
    #[test]
    fn extra_lake_floods_flat_cell() {
        let mut grid = HexGrid::new_unchecked(4, 1, false);
        for (i, e) in [2, 2, 1, 0].into_iter().enumerate() {
            grid.cell_mut(i).elevation = e;
        }
        grid.cell_mut(3).water_level = 2;
        let walk = WalkParams { extra_lake_probability: 1.0, elevation_minimum: -2, max_length: 100 };
        let mut rng = StdRng::seed_from_u64(4);
        let path = walk_river(&mut grid, 0, &walk, &mut rng);
        assert_eq!(path, vec![0, 1, 2, 3]);

        let lake = grid.cell(0);
        assert_eq!(lake.water_level, 2);
        assert_eq!(lake.elevation, 1);
        assert!(lake.is_underwater());
        assert_eq!(lake.outgoing_river(), Some(HexDirection::E));
        // Cells with a lower neighbour are left dry.
        for i in [1, 2] {
            assert_eq!(grid.cell(i).water_level, 0, "cell {i} flooded");
            assert!(!grid.cell(i).is_underwater());
        }
    }
}
