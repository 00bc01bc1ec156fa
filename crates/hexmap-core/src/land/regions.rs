//! Partition the map into 1–4 disjoint rectangular generation regions.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Offset-coordinate rectangle, half-open on the max side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRegion {
    pub x_min: usize,
    pub x_max: usize,
    pub z_min: usize,
    pub z_max: usize,
}

impl MapRegion {
    pub fn contains(&self, col: usize, row: usize) -> bool {
        (self.x_min..self.x_max).contains(&col) && (self.z_min..self.z_max).contains(&row)
    }

    pub fn overlaps(&self, other: &MapRegion) -> bool {
        self.x_min < other.x_max
            && other.x_min < self.x_max
            && self.z_min < other.z_max
            && other.z_min < self.z_max
    }

    /// Uniform random cell `(col, row)` inside the region.
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> (usize, usize) {
        (rng.gen_range(self.x_min..self.x_max), rng.gen_range(self.z_min..self.z_max))
    }
}

/// Border margins used when laying out regions.
#[derive(Debug, Clone, Copy)]
pub struct RegionLayout {
    pub count: u32,
    pub map_border_x: usize,
    pub map_border_z: usize,
    pub region_border: usize,
    pub wrapping: bool,
}

/// Lay out `layout.count` regions over a `width × height` grid.
///
/// Two regions split along x or z with equal probability; three regions are
/// vertical strips; four are quadrants. A wrapping map swaps the outer x
/// margin for `region_border`, or for nothing when a region spans the
/// full width.
pub fn plan_regions<R: Rng>(
    width: usize,
    height: usize,
    layout: &RegionLayout,
    rng: &mut R,
) -> Vec<MapRegion> {
    let rb = layout.region_border;
    let border_z = layout.map_border_z;
    let border_x = if layout.wrapping { rb } else { layout.map_border_x };
    let full_width_x = if layout.wrapping { 0 } else { layout.map_border_x };

    let rect = |x_min: usize, x_max: usize, z_min: usize, z_max: usize| MapRegion {
        x_min,
        x_max,
        z_min,
        z_max,
    };

    let regions = match layout.count {
        2 => {
            if rng.gen_bool(0.5) {
                vec![
                    rect(border_x, (width / 2).saturating_sub(rb), border_z, height.saturating_sub(border_z)),
                    rect(width / 2 + rb, width.saturating_sub(border_x), border_z, height.saturating_sub(border_z)),
                ]
            } else {
                vec![
                    rect(full_width_x, width.saturating_sub(full_width_x), border_z, (height / 2).saturating_sub(rb)),
                    rect(full_width_x, width.saturating_sub(full_width_x), height / 2 + rb, height.saturating_sub(border_z)),
                ]
            }
        }
        3 => vec![
            rect(border_x, (width / 3).saturating_sub(rb), border_z, height.saturating_sub(border_z)),
            rect(width / 3 + rb, (width * 2 / 3).saturating_sub(rb), border_z, height.saturating_sub(border_z)),
            rect(width * 2 / 3 + rb, width.saturating_sub(border_x), border_z, height.saturating_sub(border_z)),
        ],
        4 => vec![
            rect(border_x, (width / 2).saturating_sub(rb), border_z, (height / 2).saturating_sub(rb)),
            rect(width / 2 + rb, width.saturating_sub(border_x), border_z, (height / 2).saturating_sub(rb)),
            rect(width / 2 + rb, width.saturating_sub(border_x), height / 2 + rb, height.saturating_sub(border_z)),
            rect(border_x, (width / 2).saturating_sub(rb), height / 2 + rb, height.saturating_sub(border_z)),
        ],
        _ => vec![rect(full_width_x, width.saturating_sub(full_width_x), border_z, height.saturating_sub(border_z))],
    };

    regions.into_iter().map(|r| widen_degenerate(r, width, height)).collect()
}

/// Margins larger than the grid leave empty rectangles; shrink them to a
/// single row/column so a random cell can still be drawn.
fn widen_degenerate(mut r: MapRegion, width: usize, height: usize) -> MapRegion {
    if r.x_min >= r.x_max || r.z_min >= r.z_max {
        log::warn!(
            "region {}..{} x {}..{} is empty on a {width}x{height} grid; margins too large",
            r.x_min, r.x_max, r.z_min, r.z_max
        );
    }
    if r.x_min >= r.x_max {
        r.x_min = r.x_min.min(width - 1);
        r.x_max = r.x_min + 1;
    }
    if r.z_min >= r.z_max {
        r.z_min = r.z_min.min(height - 1);
        r.z_max = r.z_min + 1;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layout(count: u32, wrapping: bool) -> RegionLayout {
        RegionLayout { count, map_border_x: 5, map_border_z: 5, region_border: 5, wrapping }
    }

    #[test]
    fn single_region_covers_grid_minus_border() {
        let mut rng = StdRng::seed_from_u64(1);
        let r = plan_regions(80, 60, &layout(1, false), &mut rng);
        assert_eq!(r, vec![MapRegion { x_min: 5, x_max: 75, z_min: 5, z_max: 55 }]);
    }

    #[test]
    fn regions_never_overlap() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            for count in 1..=4 {
                for wrapping in [false, true] {
                    let regions = plan_regions(80, 60, &layout(count, wrapping), &mut rng);
                    assert_eq!(regions.len(), count as usize);
                    for (i, a) in regions.iter().enumerate() {
                        assert!(a.x_min < a.x_max && a.z_min < a.z_max, "empty region {a:?}");
                        assert!(a.x_max <= 80 && a.z_max <= 60);
                        for b in &regions[i + 1..] {
                            assert!(!a.overlaps(b), "count={count} {a:?} overlaps {b:?}");
                        }
                    }
                }
            }
        }
    }

    /// Both split axes show up for two regions.
    #[test]
    fn two_regions_use_both_axes() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut split_x = false;
        let mut split_z = false;
        for _ in 0..64 {
            let r = plan_regions(80, 60, &layout(2, false), &mut rng);
            if r[0].z_max == r[1].z_max {
                split_x = true;
            } else {
                split_z = true;
            }
        }
        assert!(split_x && split_z);
    }

    #[test]
    fn quadrants_are_symmetric_about_midlines() {
        let mut rng = StdRng::seed_from_u64(0);
        let r = plan_regions(80, 60, &layout(4, false), &mut rng);
        assert_eq!(r[0].x_max + r[1].x_min, 80);
        assert_eq!(r[0].z_max + r[3].z_min, 60);
    }

    #[test]
    fn wrapping_single_region_spans_full_width() {
        let mut rng = StdRng::seed_from_u64(0);
        let r = plan_regions(40, 30, &layout(1, true), &mut rng);
        assert_eq!((r[0].x_min, r[0].x_max), (0, 40));
    }

    #[test]
    fn tiny_grid_still_yields_cells() {
        let mut rng = StdRng::seed_from_u64(0);
        let r = plan_regions(5, 5, &layout(4, false), &mut rng);
        for region in r {
            let (c, z) = region.random_cell(&mut rng);
            assert!(c < 5 && z < 5);
        }
    }
}
