//! Hex coordinate types and direction arithmetic.
//!
//! Cells are addressed by axial coordinates `(x, z)`; the third cube
//! component `y = -x - z` is derived on demand. Storage uses offset
//! coordinates (column, row) with odd rows shifted half a cell east.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axial coordinates of a single hex cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoordinates {
    pub x: i32,
    pub z: i32,
}

impl HexCoordinates {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Derived cube component.
    #[inline]
    pub fn y(self) -> i32 {
        -self.x - self.z
    }

    /// Convert offset (column, row) storage coordinates to axial.
    pub fn from_offset(col: i32, row: i32) -> Self {
        Self::new(col - row.div_euclid(2), row)
    }

    /// Convert back to offset (column, row).
    pub fn to_offset(self) -> (i32, i32) {
        (self.x + self.z.div_euclid(2), self.z)
    }

    /// Hex distance on an unbounded plane.
    pub fn distance_to(self, other: HexCoordinates) -> u32 {
        let xy = (self.x - other.x).unsigned_abs() + (self.y() - other.y()).unsigned_abs();
        (xy + (self.z - other.z).unsigned_abs()) / 2
    }

    /// Hex distance on a grid that wraps east/west every `wrap_size` columns.
    pub fn wrapped_distance_to(self, other: HexCoordinates, wrap_size: i32) -> u32 {
        let dz = (self.z - other.z).unsigned_abs();
        let xy = |o: HexCoordinates| {
            (self.x - o.x).unsigned_abs() + (self.y() - o.y()).unsigned_abs()
        };
        let direct = xy(other);
        let east = xy(HexCoordinates::new(other.x + wrap_size, other.z));
        let west = xy(HexCoordinates::new(other.x - wrap_size, other.z));
        (direct.min(east).min(west) + dz) / 2
    }
}

impl fmt::Display for HexCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y(), self.z)
    }
}

/// The six edge directions of a pointy-top hex, clockwise from north-east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    NE = 0,
    E = 1,
    SE = 2,
    SW = 3,
    W = 4,
    NW = 5,
}

impl HexDirection {
    pub const ALL: [HexDirection; 6] = [
        HexDirection::NE,
        HexDirection::E,
        HexDirection::SE,
        HexDirection::SW,
        HexDirection::W,
        HexDirection::NW,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Direction from its numeric index (0–5).
    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    #[inline]
    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 3) % 6]
    }

    #[inline]
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + 5) % 6]
    }

    #[inline]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % 6]
    }

    #[inline]
    pub fn previous2(self) -> Self {
        Self::ALL[(self.index() + 4) % 6]
    }

    #[inline]
    pub fn next2(self) -> Self {
        Self::ALL[(self.index() + 2) % 6]
    }

    /// Offset-coordinate step `(d_col, d_row)` from a cell in the given row.
    /// Odd rows are shifted half a cell east, so diagonal steps depend on parity.
    pub fn offset_step(self, row: i32) -> (i32, i32) {
        let odd = row & 1 == 1;
        match self {
            HexDirection::E => (1, 0),
            HexDirection::W => (-1, 0),
            HexDirection::NE => (if odd { 1 } else { 0 }, 1),
            HexDirection::NW => (if odd { 0 } else { -1 }, 1),
            HexDirection::SE => (if odd { 1 } else { 0 }, -1),
            HexDirection::SW => (if odd { 0 } else { -1 }, -1),
        }
    }
}

/// Classification of the elevation step across a shared edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HexEdgeType {
    Flat,
    Slope,
    Cliff,
}

impl HexEdgeType {
    pub fn between(elevation_a: i32, elevation_b: i32) -> Self {
        match (elevation_a - elevation_b).abs() {
            0 => HexEdgeType::Flat,
            1 => HexEdgeType::Slope,
            _ => HexEdgeType::Cliff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_roundtrip() {
        for row in 0..12 {
            for col in 0..12 {
                let c = HexCoordinates::from_offset(col, row);
                assert_eq!(c.to_offset(), (col, row), "roundtrip failed for ({col}, {row})");
                assert_eq!(c.x + c.y() + c.z, 0);
            }
        }
    }

    #[test]
    fn every_direction_step_is_distance_one() {
        for row in 0..4 {
            let origin = HexCoordinates::from_offset(5, row);
            for d in HexDirection::ALL {
                let (dc, dr) = d.offset_step(row);
                let n = HexCoordinates::from_offset(5 + dc, row + dr);
                assert_eq!(origin.distance_to(n), 1, "row {row} dir {d:?} is not adjacent");
            }
        }
    }

    #[test]
    fn opposite_and_rotation() {
        for d in HexDirection::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_eq!(d.next().previous(), d);
            assert_eq!(d.next2(), d.next().next());
            assert_eq!(d.previous2(), d.previous().previous());
        }
        assert_eq!(HexDirection::NE.opposite(), HexDirection::SW);
        assert_eq!(HexDirection::from_index(6), None);
    }

    #[test]
    fn distance_along_a_row() {
        let a = HexCoordinates::from_offset(0, 3);
        let b = HexCoordinates::from_offset(7, 3);
        assert_eq!(a.distance_to(b), 7);
    }

    /// Wrapping picks the shorter way around.
    #[test]
    fn wrapped_distance_uses_short_way() {
        let a = HexCoordinates::from_offset(0, 0);
        let b = HexCoordinates::from_offset(9, 0);
        assert_eq!(a.distance_to(b), 9);
        assert_eq!(a.wrapped_distance_to(b, 10), 1);
    }

    #[test]
    fn edge_types() {
        assert_eq!(HexEdgeType::between(3, 3), HexEdgeType::Flat);
        assert_eq!(HexEdgeType::between(3, 4), HexEdgeType::Slope);
        assert_eq!(HexEdgeType::between(5, 3), HexEdgeType::Cliff);
    }
}
