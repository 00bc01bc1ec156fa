//! Diagnostic visualizer: writes PNG debug images of one generated map to
//! data/debug/. Not part of the main pipeline; no tests.

use std::fs;
use std::path::Path;

use hexmap_core::generator::temperature_model;
use hexmap_core::{generate, GeneratorConfig, HexGrid, TerrainType};

const W: usize = 120;
const H: usize = 80;
/// Pixels per cell edge. Odd rows are shifted right by half a cell.
const CELL: usize = 6;

// ── Colour helpers ────────────────────────────────────────────────────────────

fn terrain_color(index: u8) -> [u8; 3] {
    match TerrainType::from_index(index) {
        Some(TerrainType::Sand) => [222, 200, 140],
        Some(TerrainType::Grass) => [96, 160, 64],
        Some(TerrainType::Mud) => [120, 90, 60],
        Some(TerrainType::Stone) => [130, 130, 130],
        Some(TerrainType::Snow) => [245, 245, 250],
        Some(TerrainType::Water) => [40, 90, 170],
        None => [255, 0, 255], // unknown index stands out
    }
}

/// Elevation → green-to-brown ramp above water, blue depth ramp below.
fn elevation_color(elevation: i32, water_level: i32, min: i32, max: i32) -> [u8; 3] {
    if elevation < water_level {
        let t = ((water_level - elevation) as f32 / (water_level - min).max(1) as f32).clamp(0.0, 1.0);
        [0, (120.0 * (1.0 - t)) as u8, (230.0 - 120.0 * t) as u8]
    } else {
        let t = ((elevation - water_level) as f32 / (max - water_level).max(1) as f32).clamp(0.0, 1.0);
        [(60.0 + 150.0 * t) as u8, (160.0 - 40.0 * t) as u8, (50.0 + 30.0 * t) as u8]
    }
}

/// [0, 1] → white-to-blue heatmap.
fn wet(v: f32) -> [u8; 3] {
    let t = v.clamp(0.0, 1.0);
    let lo = (255.0 * (1.0 - t)) as u8;
    [lo, lo, (255.0 - 75.0 * t) as u8]
}

/// [0, 1] → blue-to-red heatmap.
fn heat(v: f32) -> [u8; 3] {
    let t = v.clamp(0.0, 1.0);
    [(255.0 * t) as u8, 40, (255.0 * (1.0 - t)) as u8]
}

/// Paint every cell as a `CELL`×`CELL` block in offset layout.
fn render(grid: &HexGrid, color: impl Fn(usize) -> [u8; 3]) -> image::RgbImage {
    let mut img = image::RgbImage::from_pixel(
        (grid.width() * CELL + CELL / 2) as u32,
        (grid.height() * CELL) as u32,
        image::Rgb([0, 0, 0]),
    );
    for i in 0..grid.len() {
        let (col, row) = (i % grid.width(), i / grid.width());
        let x0 = col * CELL + (row & 1) * CELL / 2;
        // Row 0 is the south edge; flip so north is up.
        let y0 = (grid.height() - 1 - row) * CELL;
        let rgb = image::Rgb(color(i));
        for y in y0..y0 + CELL {
            for x in x0..x0 + CELL {
                img.put_pixel(x as u32, y as u32, rgb);
            }
        }
    }
    img
}

/// Draw each river segment as a line of dots between cell centres.
fn overlay_rivers(img: &mut image::RgbImage, grid: &HexGrid) {
    let centre = |i: usize| {
        let (col, row) = (i % grid.width(), i / grid.width());
        let x = (col * CELL + (row & 1) * CELL / 2 + CELL / 2) as f32;
        let y = ((grid.height() - 1 - row) * CELL + CELL / 2) as f32;
        (x, y)
    };
    for i in 0..grid.len() {
        let Some(d) = grid.cell(i).outgoing_river() else {
            continue;
        };
        let Some(n) = grid.neighbor(i, d) else {
            continue;
        };
        let (ax, ay) = centre(i);
        let (bx, by) = centre(n);
        // Wrapped edges would streak across the image.
        if (ax - bx).abs() > (2 * CELL) as f32 {
            continue;
        }
        for s in 0..=CELL {
            let t = s as f32 / CELL as f32;
            let (x, y) = (ax + (bx - ax) * t, ay + (by - ay) * t);
            img.put_pixel(x as u32, y as u32, image::Rgb([20, 40, 220]));
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    env_logger::init();
    let config = GeneratorConfig {
        seed: 42,
        use_fixed_seed: true,
        region_count: 2,
        ..GeneratorConfig::default()
    };

    println!("Generating {W}×{H} map…");
    let map = generate(W, H, &config).expect("generation failed");
    let grid = &map.grid;

    let out_dir = Path::new("data/debug");
    fs::create_dir_all(out_dir).expect("cannot create data/debug/");

    // ── 1. terrain.png ───────────────────────────────────────────────────────
    {
        let mut img = render(grid, |i| terrain_color(grid.cell(i).terrain_type_index));
        overlay_rivers(&mut img, grid);
        let path = out_dir.join("terrain.png");
        img.save(&path).expect("failed to save terrain.png");
        println!("Wrote {}", path.display());
    }

    // ── 2. elevation.png ─────────────────────────────────────────────────────
    {
        let img = render(grid, |i| {
            let c = grid.cell(i);
            elevation_color(
                c.elevation,
                config.water_level,
                config.elevation_minimum,
                config.elevation_maximum,
            )
        });
        let path = out_dir.join("elevation.png");
        img.save(&path).expect("failed to save elevation.png");
        println!("Wrote {}", path.display());
    }

    // ── 3. moisture.png ──────────────────────────────────────────────────────
    {
        let img = render(grid, |i| wet(map.climate.moisture[i]));
        let path = out_dir.join("moisture.png");
        img.save(&path).expect("failed to save moisture.png");
        println!("Wrote {}", path.display());
    }

    // ── 4. clouds.png ────────────────────────────────────────────────────────
    {
        let img = render(grid, |i| wet(map.climate.clouds[i]));
        let path = out_dir.join("clouds.png");
        img.save(&path).expect("failed to save clouds.png");
        println!("Wrote {}", path.display());
    }

    // ── 5. temperature.png ───────────────────────────────────────────────────
    {
        let model = temperature_model(map.report.seed, &config);
        let img = render(grid, |i| heat(model.temperature(grid, i)));
        let path = out_dir.join("temperature.png");
        img.save(&path).expect("failed to save temperature.png");
        println!("Wrote {}", path.display());
    }

    println!(
        "Land {} / {} cells, {} rivers, seed {}",
        grid.land_cell_count(),
        grid.len(),
        map.report.rivers.rivers.len(),
        map.report.seed
    );
}
