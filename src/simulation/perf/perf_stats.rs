use wasm_bindgen::prelude::*;

use crate::systems::StepCounters;

/// Snapshot of the last simulation step. Only filled while perf metrics are on.
#[wasm_bindgen]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepStats {
    pub(super) step_ms: f64,
    pub(super) diffusion_ms: f64,
    pub(super) combustion_ms: f64,
    pub(super) destruction_ms: f64,
    pub(super) molten_ms: f64,

    pub(super) tiles_simulated: u32,
    pub(super) active_tiles: u32,
    pub(super) allocated_tiles: u32,
    pub(super) retired_tiles: u32,

    pub(super) cells_diffused: u32,
    pub(super) scorched: u32,
    pub(super) ignitions: u32,
    pub(super) burning_cells: u32,
    pub(super) burnouts: u32,
    pub(super) vaporized: u32,
    pub(super) leaks: u32,
    pub(super) flows: u32,
    pub(super) solidified: u32,
    pub(super) molten_cells: u32,
}

impl StepStats {
    pub(crate) fn reset(&mut self) {
        *self = StepStats::default();
    }

    pub(crate) fn absorb(&mut self, c: &StepCounters) {
        self.tiles_simulated = c.tiles_simulated;
        self.cells_diffused = c.cells_diffused;
        self.scorched = c.scorched;
        self.ignitions = c.ignitions;
        self.burning_cells = c.burning_cells;
        self.burnouts = c.burnouts;
        self.vaporized = c.vaporized;
        self.leaks = c.leaks;
        self.flows = c.flows;
        self.solidified = c.solidified;
    }
}

#[wasm_bindgen]
impl StepStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn diffusion_ms(&self) -> f64 { self.diffusion_ms }
    #[wasm_bindgen(getter)]
    pub fn combustion_ms(&self) -> f64 { self.combustion_ms }
    #[wasm_bindgen(getter)]
    pub fn destruction_ms(&self) -> f64 { self.destruction_ms }
    #[wasm_bindgen(getter)]
    pub fn molten_ms(&self) -> f64 { self.molten_ms }
    #[wasm_bindgen(getter)]
    pub fn tiles_simulated(&self) -> u32 { self.tiles_simulated }
    #[wasm_bindgen(getter)]
    pub fn active_tiles(&self) -> u32 { self.active_tiles }
    #[wasm_bindgen(getter)]
    pub fn allocated_tiles(&self) -> u32 { self.allocated_tiles }
    #[wasm_bindgen(getter)]
    pub fn retired_tiles(&self) -> u32 { self.retired_tiles }
    #[wasm_bindgen(getter)]
    pub fn cells_diffused(&self) -> u32 { self.cells_diffused }
    #[wasm_bindgen(getter)]
    pub fn scorched(&self) -> u32 { self.scorched }
    #[wasm_bindgen(getter)]
    pub fn ignitions(&self) -> u32 { self.ignitions }
    #[wasm_bindgen(getter)]
    pub fn burning_cells(&self) -> u32 { self.burning_cells }
    #[wasm_bindgen(getter)]
    pub fn burnouts(&self) -> u32 { self.burnouts }
    #[wasm_bindgen(getter)]
    pub fn vaporized(&self) -> u32 { self.vaporized }
    #[wasm_bindgen(getter)]
    pub fn leaks(&self) -> u32 { self.leaks }
    #[wasm_bindgen(getter)]
    pub fn flows(&self) -> u32 { self.flows }
    #[wasm_bindgen(getter)]
    pub fn solidified(&self) -> u32 { self.solidified }
    #[wasm_bindgen(getter)]
    pub fn molten_cells(&self) -> u32 { self.molten_cells }
}
