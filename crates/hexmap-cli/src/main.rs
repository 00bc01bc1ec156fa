//! Offline driver for the hex map engine: generate maps to disk and run
//! path and sight queries against saved maps.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use hexmap_core::persist::{read_map, write_map};
use hexmap_core::{GeneratorConfig, HexGrid, MapGenerator, Navigator, TerrainType, TravelCosts};

#[derive(Parser, Debug)]
#[command(name = "hexmap", about = "Hex map generator and query runner")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a map and write it as a binary map record.
    Generate {
        #[arg(long, default_value_t = 80)]
        width: usize,
        #[arg(long, default_value_t = 60)]
        height: usize,
        /// JSON file with generator settings; missing keys keep defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Fixed seed; overrides the config file.
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long, default_value = "map.hexmap")]
        output: PathBuf,
        /// Also write the per-cell snapshot and report as JSON.
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Cheapest path between two cells of a saved map.
    Path {
        map: PathBuf,
        from: usize,
        to: usize,
        #[arg(long, default_value_t = 24)]
        speed: u32,
        #[arg(long, default_value_t = 1)]
        road_cost: u32,
        #[arg(long, default_value_t = 5)]
        flat_cost: u32,
        #[arg(long, default_value_t = 10)]
        slope_cost: u32,
    },
    /// Cells visible from a cell of a saved map.
    Vision {
        map: PathBuf,
        origin: usize,
        #[arg(long, default_value_t = 3)]
        range: u32,
        /// Let elevation extend and block sight.
        #[arg(long)]
        terrain: bool,
    },
    /// Summary statistics of a saved map.
    Info { map: PathBuf },
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<GeneratorConfig> {
    let mut config = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            GeneratorConfig::from_json_str(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
        config.use_fixed_seed = true;
    }
    Ok(config)
}

fn load_map(path: &Path) -> Result<HexGrid> {
    let file = File::open(path).with_context(|| format!("opening map {}", path.display()))?;
    read_map(BufReader::new(file)).with_context(|| format!("decoding map {}", path.display()))
}

fn check_cell(grid: &HexGrid, cell: usize) -> Result<()> {
    if cell >= grid.len() {
        bail!("cell {cell} is outside the map ({} cells)", grid.len());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct MapInfo {
    width: usize,
    height: usize,
    wrapping: bool,
    cells: usize,
    land_cells: usize,
    river_sources: usize,
    river_cells: usize,
    roads: usize,
    explored: usize,
    min_elevation: i32,
    max_elevation: i32,
    terrain: BTreeMap<String, usize>,
}

fn map_info(grid: &HexGrid) -> MapInfo {
    let cells = grid.cells();
    let mut terrain = BTreeMap::new();
    for c in cells {
        let name = TerrainType::from_index(c.terrain_type_index)
            .map_or_else(|| format!("unknown({})", c.terrain_type_index), |t| format!("{t:?}"));
        *terrain.entry(name).or_insert(0) += 1;
    }
    MapInfo {
        width: grid.width(),
        height: grid.height(),
        wrapping: grid.wrapping(),
        cells: grid.len(),
        land_cells: grid.land_cell_count(),
        river_sources: cells
            .iter()
            .filter(|c| c.outgoing_river().is_some() && c.incoming_river().is_none())
            .count(),
        river_cells: cells.iter().filter(|c| c.has_river()).count(),
        roads: cells.iter().map(|c| c.roads().count_ones() as usize).sum::<usize>() / 2,
        explored: cells.iter().filter(|c| c.explored).count(),
        min_elevation: cells.iter().map(|c| c.elevation).min().unwrap_or(0),
        max_elevation: cells.iter().map(|c| c.elevation).max().unwrap_or(0),
        terrain,
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Generate { width, height, config, seed, output, snapshot } => {
            let config = load_config(config.as_deref(), seed)?;
            let map = MapGenerator::new()
                .generate(width, height, &config)
                .context("generating map")?;

            let file = File::create(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            write_map(&map.grid, BufWriter::new(file))
                .with_context(|| format!("writing {}", output.display()))?;
            log::info!(
                "wrote {} (seed {}, {} land cells, {} rivers)",
                output.display(),
                map.report.seed,
                map.grid.land_cell_count(),
                map.report.rivers.rivers.len()
            );

            if let Some(path) = snapshot {
                let body = serde_json::json!({
                    "width": width,
                    "height": height,
                    "report": map.report,
                    "cells": map.grid.snapshot(),
                });
                fs::write(&path, serde_json::to_string(&body)?)
                    .with_context(|| format!("writing {}", path.display()))?;
                log::info!("wrote {}", path.display());
            }
        }
        Command::Path { map, from, to, speed, road_cost, flat_cost, slope_cost } => {
            let grid = load_map(&map)?;
            check_cell(&grid, from)?;
            check_cell(&grid, to)?;
            if road_cost == 0 || flat_cost == 0 || slope_cost == 0 {
                bail!("travel costs must be at least 1");
            }
            let costs = TravelCosts { road: road_cost, flat: flat_cost, slope: slope_cost };
            let mut navigator = Navigator::with_costs(costs);
            match navigator.find_path(&grid, from, to, speed) {
                Some(path) => {
                    let turns = path.turns(speed);
                    print_json(&serde_json::json!({
                        "cells": path.cells,
                        "cost": path.cost,
                        "turns": turns,
                    }))?;
                }
                None => {
                    log::error!("no path from {from} to {to}");
                    std::process::exit(1);
                }
            }
        }
        Command::Vision { map, origin, range, terrain } => {
            let grid = load_map(&map)?;
            check_cell(&grid, origin)?;
            let mut navigator = Navigator::new();
            let cells = if terrain {
                navigator.cells_in_sight(&grid, origin, range)
            } else {
                navigator.cells_visible_from(&grid, origin, range)
            };
            print_json(&cells)?;
        }
        Command::Info { map } => {
            let grid = load_map(&map)?;
            print_json(&map_info(&grid))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexmap_core::HexDirection;

    #[test]
    fn seed_flag_fixes_the_seed() {
        let config = load_config(None, Some(99)).unwrap();
        assert_eq!(config.seed, 99);
        assert!(config.use_fixed_seed);
        assert!(!load_config(None, None).unwrap().use_fixed_seed);
    }

    #[test]
    fn info_counts_rivers_and_roads() {
        let mut grid = HexGrid::new_unchecked(5, 5, false);
        grid.cell_mut(0).elevation = 1;
        assert!(grid.set_outgoing_river(0, HexDirection::E));
        assert!(grid.set_outgoing_river(1, HexDirection::E));
        assert!(grid.add_road(10, HexDirection::E));
        let info = map_info(&grid);
        assert_eq!(info.river_sources, 1);
        assert_eq!(info.river_cells, 3);
        assert_eq!(info.roads, 1);
        assert_eq!(info.max_elevation, 1);
        assert_eq!(info.terrain.get("Sand"), Some(&25));
    }

    #[test]
    fn cli_parses_subcommands() {
        let args = Args::try_parse_from(["hexmap", "path", "m.hexmap", "3", "17", "--speed", "12"]).unwrap();
        assert!(matches!(args.command, Command::Path { from: 3, to: 17, speed: 12, .. }));
    }
}
