//! Versioned little-endian binary map record.
//!
//! Layout:
//!   u32 version, i32 width, i32 height, u8 wrapping (v5+)
//!   per cell: terrain, elevation, water, urban, farm, plant, special,
//!   walled, incoming river, outgoing river, roads, explored (v3+)
//!
//! Elevation is stored with a +127 bias from v4 on. River bytes carry the
//! direction in the low bits and 0x80 when a river is present.

use std::io::{Read, Write};

use crate::coords::HexDirection;
use crate::error::PersistError;
use crate::grid::{HexGrid, CHUNK_SIZE_X, CHUNK_SIZE_Z};

/// Version written by [`write_map`].
pub const MAP_FORMAT_VERSION: u32 = 5;
/// Oldest version [`read_map`] accepts.
pub const OLDEST_MAP_FORMAT_VERSION: u32 = 2;

/// Largest cell count [`read_map`] will allocate for.
pub const MAX_MAP_CELLS: usize = 1 << 22;

const ELEVATION_BIAS: i32 = 127;
const RIVER_PRESENT: u8 = 0x80;

fn river_byte(direction: Option<HexDirection>) -> u8 {
    direction.map_or(0, |d| RIVER_PRESENT | d.index() as u8)
}

fn river_direction(cell: usize, byte: u8) -> Result<Option<HexDirection>, PersistError> {
    if byte & RIVER_PRESENT == 0 {
        return Ok(None);
    }
    HexDirection::from_index(usize::from(byte & !RIVER_PRESENT))
        .map(Some)
        .ok_or(PersistError::InvalidDirection { cell, byte })
}

/// Write `grid` in the current format version.
pub fn write_map<W: Write>(grid: &HexGrid, mut writer: W) -> Result<(), PersistError> {
    writer.write_all(&MAP_FORMAT_VERSION.to_le_bytes())?;
    writer.write_all(&(grid.width() as i32).to_le_bytes())?;
    writer.write_all(&(grid.height() as i32).to_le_bytes())?;
    writer.write_all(&[u8::from(grid.wrapping())])?;

    let mut record = Vec::with_capacity(grid.len() * 12);
    for c in grid.cells() {
        record.extend_from_slice(&[
            c.terrain_type_index,
            (c.elevation + ELEVATION_BIAS).clamp(0, 255) as u8,
            c.water_level.clamp(0, 255) as u8,
            c.urban_level,
            c.farm_level,
            c.plant_level,
            c.special_index,
            u8::from(c.walled),
            river_byte(c.incoming_river()),
            river_byte(c.outgoing_river()),
            c.roads(),
            u8::from(c.explored),
        ]);
    }
    writer.write_all(&record)?;
    writer.flush()?;
    Ok(())
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8, PersistError> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, PersistError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_i32<R: Read>(reader: &mut R) -> Result<i32, PersistError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Re-hydrate a grid from any supported format version. Transient state
/// (visibility, occupancy) starts cleared.
pub fn read_map<R: Read>(mut reader: R) -> Result<HexGrid, PersistError> {
    let version = read_u32(&mut reader)?;
    if !(OLDEST_MAP_FORMAT_VERSION..=MAP_FORMAT_VERSION).contains(&version) {
        return Err(PersistError::UnsupportedVersion(version));
    }

    let width = read_i32(&mut reader)?;
    let height = read_i32(&mut reader)?;
    let cell_count = (width as usize).checked_mul(height as usize);
    if width <= 0
        || height <= 0
        || width as usize % CHUNK_SIZE_X != 0
        || height as usize % CHUNK_SIZE_Z != 0
        || cell_count.map_or(true, |n| n > MAX_MAP_CELLS)
    {
        return Err(PersistError::InvalidDimensions { width, height });
    }
    let wrapping = version >= 5 && read_u8(&mut reader)? != 0;
    log::debug!("reading v{version} map {width}x{height}");

    let mut grid = HexGrid::new_unchecked(width as usize, height as usize, wrapping);
    let field_count = if version >= 3 { 12 } else { 11 };
    let mut record = [0u8; 12];

    for i in 0..grid.len() {
        reader.read_exact(&mut record[..field_count])?;
        let incoming = river_direction(i, record[8])?;
        let outgoing = river_direction(i, record[9])?;

        let c = grid.cell_mut(i);
        c.terrain_type_index = record[0];
        c.elevation = if version >= 4 {
            i32::from(record[1]) - ELEVATION_BIAS
        } else {
            i32::from(record[1])
        };
        c.water_level = i32::from(record[2]);
        c.urban_level = record[3];
        c.farm_level = record[4];
        c.plant_level = record[5];
        c.special_index = record[6];
        c.walled = record[7] != 0;
        c.set_river_bytes(incoming, outgoing, record[10]);
        c.explored = version >= 3 && record[11] != 0;
    }
    Ok(grid)
}
