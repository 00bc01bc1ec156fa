use anyhow::{bail, Context};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use hexmap_core::persist::{read_map, write_map};
use hexmap_core::{CellSnapshot, GenerationReport, GeneratorConfig, HexGrid, MapGenerator, Navigator};

#[wasm_bindgen(start)]
pub fn init() {
    // Panic hook for browser console (enabled via optional feature).
}

fn js_error(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{e:#}"))
}

/// Empty input means "all defaults".
fn parse_config(config_json: &str) -> anyhow::Result<GeneratorConfig> {
    let json = if config_json.trim().is_empty() { "{}" } else { config_json };
    GeneratorConfig::from_json_str(json).context("Invalid config")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapPayload<'a> {
    width: usize,
    height: usize,
    cells: Vec<CellSnapshot>,
    report: Option<&'a GenerationReport>,
    generation_time_ms: f64,
}

fn payload<'a>(grid: &HexGrid, report: Option<&'a GenerationReport>, generation_time_ms: f64) -> MapPayload<'a> {
    MapPayload {
        width: grid.width(),
        height: grid.height(),
        cells: grid.snapshot(),
        report,
        generation_time_ms,
    }
}

/// Generate a map from the given config JSON.
/// Returns the cell snapshot, the generation report and the wall time.
#[wasm_bindgen]
pub async fn generate(width: usize, height: usize, config_json: &str) -> Result<JsValue, JsValue> {
    let config = parse_config(config_json).map_err(js_error)?;
    let start = js_sys::Date::now();
    let map = hexmap_core::generate(width, height, &config)
        .map_err(|e| JsValue::from_str(&format!("Generation failed: {e}")))?;
    let elapsed = js_sys::Date::now() - start;
    serde_wasm_bindgen::to_value(&payload(&map.grid, Some(&map.report), elapsed))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// A generated map plus the state needed to query it from JS.
#[wasm_bindgen]
#[derive(Default)]
pub struct HexWorld {
    generator: MapGenerator,
    navigator: Navigator,
    grid: Option<HexGrid>,
    report: Option<GenerationReport>,
    generation_time_ms: f64,
}

impl HexWorld {
    fn grid(&self) -> anyhow::Result<&HexGrid> {
        self.grid.as_ref().context("No map: call generate() or load() first")
    }

    fn check_cell(&self, cell: usize) -> anyhow::Result<()> {
        let len = self.grid()?.len();
        if cell >= len {
            bail!("Cell {cell} is outside the map ({len} cells)");
        }
        Ok(())
    }
}

#[wasm_bindgen]
impl HexWorld {
    #[wasm_bindgen(constructor)]
    pub fn new() -> HexWorld {
        HexWorld::default()
    }

    /// Replace the current map. Returns the generation report.
    pub fn generate(&mut self, width: usize, height: usize, config_json: &str) -> Result<JsValue, JsValue> {
        let config = parse_config(config_json).map_err(js_error)?;
        let start = js_sys::Date::now();
        let map = self
            .generator
            .generate(width, height, &config)
            .map_err(|e| JsValue::from_str(&format!("Generation failed: {e}")))?;
        self.generation_time_ms = js_sys::Date::now() - start;
        let report = serde_wasm_bindgen::to_value(&map.report)?;
        self.grid = Some(map.grid);
        self.report = Some(map.report);
        Ok(report)
    }

    /// Per-cell snapshot of the current map.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let grid = self.grid().map_err(js_error)?;
        Ok(serde_wasm_bindgen::to_value(&payload(grid, self.report.as_ref(), self.generation_time_ms))?)
    }

    /// Cheapest route as `{ cells, cost }`, or `null` when unreachable.
    pub fn find_path(&mut self, from: usize, to: usize, speed: u32) -> Result<JsValue, JsValue> {
        self.check_cell(from).and_then(|_| self.check_cell(to)).map_err(js_error)?;
        let grid = self.grid.as_ref().ok_or_else(|| JsValue::from_str("No map"))?;
        match self.navigator.find_path(grid, from, to, speed) {
            Some(path) => Ok(serde_wasm_bindgen::to_value(&path)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Indices of every cell within `radius` steps of `origin`.
    pub fn cells_visible_from(&mut self, origin: usize, radius: u32) -> Result<Vec<u32>, JsValue> {
        self.check_cell(origin).map_err(js_error)?;
        let grid = self.grid.as_ref().ok_or_else(|| JsValue::from_str("No map"))?;
        Ok(self
            .navigator
            .cells_visible_from(grid, origin, radius)
            .into_iter()
            .map(|c| c as u32)
            .collect())
    }

    /// Encode the map as a binary map record.
    pub fn save(&self) -> Result<Vec<u8>, JsValue> {
        let grid = self.grid().map_err(js_error)?;
        let mut bytes = Vec::new();
        write_map(grid, &mut bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(bytes)
    }

    /// Replace the map with a decoded binary map record.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        let grid = read_map(bytes).map_err(|e| JsValue::from_str(&format!("Load failed: {e}")))?;
        self.grid = Some(grid);
        self.report = None;
        self.generation_time_ms = 0.0;
        Ok(())
    }
}
