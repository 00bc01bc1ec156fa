use serde::{Deserialize, Serialize};

use crate::coords::{HexCoordinates, HexDirection, HexEdgeType};
use crate::error::GenerateError;

/// Width of an external rendering chunk, in cells.
pub const CHUNK_SIZE_X: usize = 5;
/// Height of an external rendering chunk, in cells.
pub const CHUNK_SIZE_Z: usize = 5;

/// One hexagonal tile.
///
/// Rivers and roads touch two cells at once, so they are only mutated through
/// [`HexGrid`]; everything else is plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexCell {
    pub coordinates: HexCoordinates,
    pub elevation: i32,
    pub water_level: i32,
    pub terrain_type_index: u8,
    pub urban_level: u8,
    pub farm_level: u8,
    pub plant_level: u8,
    pub special_index: u8,
    pub walled: bool,
    pub explored: bool,
    /// A unit stands here; the cell cannot be a path destination.
    pub occupied: bool,
    incoming_river: Option<HexDirection>,
    outgoing_river: Option<HexDirection>,
    roads: u8,
    visibility: u32,
}

impl HexCell {
    fn new(coordinates: HexCoordinates) -> Self {
        Self {
            coordinates,
            elevation: 0,
            water_level: 0,
            terrain_type_index: 0,
            urban_level: 0,
            farm_level: 0,
            plant_level: 0,
            special_index: 0,
            walled: false,
            explored: false,
            occupied: false,
            incoming_river: None,
            outgoing_river: None,
            roads: 0,
            visibility: 0,
        }
    }

    #[inline]
    pub fn is_underwater(&self) -> bool {
        self.water_level > self.elevation
    }

    /// Height of the visible surface: water or ground, whichever is higher.
    #[inline]
    pub fn view_elevation(&self) -> i32 {
        self.elevation.max(self.water_level)
    }

    pub fn incoming_river(&self) -> Option<HexDirection> {
        self.incoming_river
    }

    pub fn outgoing_river(&self) -> Option<HexDirection> {
        self.outgoing_river
    }

    pub fn has_river(&self) -> bool {
        self.incoming_river.is_some() || self.outgoing_river.is_some()
    }

    pub fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.incoming_river == Some(direction) || self.outgoing_river == Some(direction)
    }

    pub fn has_road_through_edge(&self, direction: HexDirection) -> bool {
        self.roads & (1 << direction.index()) != 0
    }

    /// Road flags as a bitmask, bit `i` for direction index `i`.
    pub fn roads(&self) -> u8 {
        self.roads
    }

    pub fn is_special(&self) -> bool {
        self.special_index > 0
    }

    pub fn is_visible(&self) -> bool {
        self.visibility > 0
    }

    pub fn visibility(&self) -> u32 {
        self.visibility
    }

    pub(crate) fn set_visibility(&mut self, visibility: u32) {
        self.visibility = visibility;
    }

    pub(crate) fn set_river_bytes(
        &mut self,
        incoming: Option<HexDirection>,
        outgoing: Option<HexDirection>,
        roads: u8,
    ) {
        self.incoming_river = incoming;
        self.outgoing_river = outgoing;
        self.roads = roads & 0b11_1111;
    }
}

/// Read-only per-cell record handed to rendering and UI collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub elevation: i32,
    pub water_level: i32,
    pub terrain_type_index: u8,
    pub urban_level: u8,
    pub farm_level: u8,
    pub plant_level: u8,
    pub special_index: u8,
    pub walled: bool,
    pub incoming_river: Option<HexDirection>,
    pub outgoing_river: Option<HexDirection>,
    pub roads: u8,
    pub explored: bool,
}

/// A rectangular hex map stored row-major in offset coordinates.
/// Index = `col + row * width`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexGrid {
    width: usize,
    height: usize,
    wrapping: bool,
    cells: Vec<HexCell>,
}

impl HexGrid {
    /// Reject dimensions the external rendering chunk layout cannot tile.
    pub fn validate_dimensions(width: usize, height: usize) -> Result<(), GenerateError> {
        if width == 0 || height == 0 || width % CHUNK_SIZE_X != 0 || height % CHUNK_SIZE_Z != 0 {
            return Err(GenerateError::InvalidDimensions {
                width,
                height,
                chunk_x: CHUNK_SIZE_X,
                chunk_z: CHUNK_SIZE_Z,
            });
        }
        Ok(())
    }

    /// Build a flat grid (every cell at elevation 0, water 0).
    pub fn new(width: usize, height: usize, wrapping: bool) -> Result<Self, GenerateError> {
        Self::validate_dimensions(width, height)?;
        Ok(Self::new_unchecked(width, height, wrapping))
    }

    /// Build a grid of any positive size. Used by tests and by callers that
    /// do not render through the chunk system.
    pub fn new_unchecked(width: usize, height: usize, wrapping: bool) -> Self {
        let cells = (0..height)
            .flat_map(|row| {
                (0..width).map(move |col| {
                    HexCell::new(HexCoordinates::from_offset(col as i32, row as i32))
                })
            })
            .collect();
        Self { width, height, wrapping, cells }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn wrapping(&self) -> bool {
        self.wrapping
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cell(&self, index: usize) -> &HexCell {
        &self.cells[index]
    }

    #[inline]
    pub fn cell_mut(&mut self, index: usize) -> &mut HexCell {
        &mut self.cells[index]
    }

    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    /// Index of the cell at offset `(col, row)`, if inside the grid.
    /// Columns wrap on a wrapping grid.
    pub fn offset_index(&self, col: i32, row: i32) -> Option<usize> {
        if row < 0 || row >= self.height as i32 {
            return None;
        }
        let w = self.width as i32;
        let col = if self.wrapping {
            col.rem_euclid(w)
        } else if col < 0 || col >= w {
            return None;
        } else {
            col
        };
        Some(col as usize + row as usize * self.width)
    }

    /// Index of the cell with the given axial coordinates, if inside the grid.
    pub fn index_of(&self, coordinates: HexCoordinates) -> Option<usize> {
        let (col, row) = coordinates.to_offset();
        self.offset_index(col, row)
    }

    /// Neighbour of `index` across `direction`; `None` at non-wrapping edges.
    pub fn neighbor(&self, index: usize, direction: HexDirection) -> Option<usize> {
        let col = (index % self.width) as i32;
        let row = (index / self.width) as i32;
        let (dc, dr) = direction.offset_step(row);
        self.offset_index(col + dc, row + dr)
    }

    /// All existing neighbours of `index` with the direction leading to them.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = (HexDirection, usize)> + '_ {
        HexDirection::ALL
            .into_iter()
            .filter_map(move |d| self.neighbor(index, d).map(|n| (d, n)))
    }

    /// Hex distance between two cells, honouring wrapping.
    pub fn distance(&self, a: usize, b: usize) -> u32 {
        let ca = self.cells[a].coordinates;
        let cb = self.cells[b].coordinates;
        if self.wrapping {
            ca.wrapped_distance_to(cb, self.width as i32)
        } else {
            ca.distance_to(cb)
        }
    }

    pub fn edge_type(&self, a: usize, b: usize) -> HexEdgeType {
        HexEdgeType::between(self.cells[a].elevation, self.cells[b].elevation)
    }

    /// Number of cells whose ground is at or above their water level.
    pub fn land_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_underwater()).count()
    }

    // ── Rivers ────────────────────────────────────────────────────────────────

    fn is_valid_river_destination(&self, from: usize, to: usize) -> bool {
        let a = &self.cells[from];
        let b = &self.cells[to];
        a.elevation >= b.elevation || a.water_level == b.elevation
    }

    /// Route the river leaving `index` through `direction`.
    ///
    /// Replaces any existing outgoing river of `index` and incoming river of
    /// the neighbour, and clears a road on the same edge. Returns `false`
    /// (and changes nothing) when there is no neighbour, the neighbour is
    /// higher, or the edge already carries the incoming river.
    pub fn set_outgoing_river(&mut self, index: usize, direction: HexDirection) -> bool {
        if self.cells[index].outgoing_river == Some(direction) {
            return true;
        }
        let Some(neighbor) = self.neighbor(index, direction) else {
            return false;
        };
        if !self.is_valid_river_destination(index, neighbor)
            || self.cells[index].incoming_river == Some(direction)
        {
            return false;
        }

        self.remove_outgoing_river(index);
        self.cells[index].outgoing_river = Some(direction);
        self.cells[index].special_index = 0;

        self.remove_incoming_river(neighbor);
        self.cells[neighbor].incoming_river = Some(direction.opposite());
        self.cells[neighbor].special_index = 0;

        self.remove_road(index, direction);
        true
    }

    pub fn remove_outgoing_river(&mut self, index: usize) {
        let Some(direction) = self.cells[index].outgoing_river.take() else {
            return;
        };
        if let Some(n) = self.neighbor(index, direction) {
            self.cells[n].incoming_river = None;
        }
    }

    pub fn remove_incoming_river(&mut self, index: usize) {
        let Some(direction) = self.cells[index].incoming_river.take() else {
            return;
        };
        if let Some(n) = self.neighbor(index, direction) {
            self.cells[n].outgoing_river = None;
        }
    }

    pub fn remove_river(&mut self, index: usize) {
        self.remove_outgoing_river(index);
        self.remove_incoming_river(index);
    }

    // ── Roads ─────────────────────────────────────────────────────────────────

    /// Add a road across `direction`. Roads cannot cross rivers, special
    /// features or cliffs.
    pub fn add_road(&mut self, index: usize, direction: HexDirection) -> bool {
        let Some(n) = self.neighbor(index, direction) else {
            return false;
        };
        let cell = &self.cells[index];
        let other = &self.cells[n];
        if cell.has_road_through_edge(direction)
            || cell.has_river_through_edge(direction)
            || cell.is_special()
            || other.is_special()
            || (cell.elevation - other.elevation).abs() > 1
        {
            return false;
        }
        self.cells[index].roads |= 1 << direction.index();
        self.cells[n].roads |= 1 << direction.opposite().index();
        true
    }

    fn remove_road(&mut self, index: usize, direction: HexDirection) {
        self.cells[index].roads &= !(1 << direction.index());
        if let Some(n) = self.neighbor(index, direction) {
            self.cells[n].roads &= !(1 << direction.opposite().index());
        }
    }

    pub fn remove_roads(&mut self, index: usize) {
        for d in HexDirection::ALL {
            if self.cells[index].has_road_through_edge(d) {
                self.remove_road(index, d);
            }
        }
    }

    // ── Snapshot ──────────────────────────────────────────────────────────────

    /// Flat read-only view of every cell, index = `col + row * width`.
    pub fn snapshot(&self) -> Vec<CellSnapshot> {
        self.cells
            .iter()
            .map(|c| CellSnapshot {
                elevation: c.elevation,
                water_level: c.water_level,
                terrain_type_index: c.terrain_type_index,
                urban_level: c.urban_level,
                farm_level: c.farm_level,
                plant_level: c.plant_level,
                special_index: c.special_index,
                walled: c.walled,
                incoming_river: c.incoming_river,
                outgoing_river: c.outgoing_river,
                roads: c.roads,
                explored: c.explored,
            })
            .collect()
    }
}
