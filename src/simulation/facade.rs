use wasm_bindgen::prelude::*;

use crate::domain::{HeatConfig, Material};
use crate::error::SimError;
use crate::net::NetRole;
use crate::systems::{ChangeLog, WorldHooks};

use super::perf_stats::StepStats;
use super::HeatSim;

fn js_err(err: SimError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JS-facing wrapper. Holds its own `ChangeLog` as the world collaborator;
/// the host drains it after each call that can change visible state.
#[wasm_bindgen]
pub struct HeatMap {
    core: HeatSim,
    world: ChangeLog,
}

#[wasm_bindgen]
impl HeatMap {
    /// Create a heat map for a world of `width x height` tiles with default tuning.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            core: HeatSim::default(),
            world: ChangeLog::new(width, height),
        }
    }

    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(width: u32, height: u32, config_json: String) -> Result<HeatMap, JsValue> {
        let core = HeatSim::from_config_json(&config_json).map_err(js_err)?;
        Ok(Self {
            core,
            world: ChangeLog::new(width, height),
        })
    }

    pub fn load_config(&mut self, config_json: String) -> Result<(), JsValue> {
        let config = HeatConfig::from_json(&config_json).map_err(js_err)?;
        self.core.set_config(config).map_err(js_err)
    }

    pub fn config_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.core.config()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 { self.world.width() }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 { self.world.height() }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.core.frame() }

    #[wasm_bindgen(getter)]
    pub fn active_tiles(&self) -> u32 { self.core.active_tiles() as u32 }

    #[wasm_bindgen(getter)]
    pub fn tile_count(&self) -> u32 { self.core.tiles().tile_count() as u32 }

    // === Settings ===

    /// "offline", "host" or "peer".
    pub fn set_role(&mut self, role: &str) -> Result<(), JsValue> {
        let role = NetRole::from_name(role)
            .ok_or_else(|| JsValue::from_str(&format!("unknown role: {role}")))?;
        self.core.set_role(role);
        Ok(())
    }

    pub fn set_sim_interval(&mut self, frames: u32) -> Result<(), JsValue> {
        self.core.set_sim_interval(frames).map_err(js_err)
    }

    pub fn set_seed(&mut self, seed: u32) {
        self.core.set_seed(seed);
    }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Last step snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> StepStats {
        self.core.get_perf_stats()
    }

    // === World generation ===

    /// Returns false for an unknown material id or an out-of-range tile.
    pub fn set_material(&mut self, tx: u32, ty: u32, material: u8) -> bool {
        Material::from_id(material).is_some_and(|m| self.core.set_material(tx, ty, m))
    }

    /// Returns false for an unknown material id, an out-of-range tile or a
    /// sub-cell index past the tile.
    pub fn set_cell_material(&mut self, tx: u32, ty: u32, idx: u32, material: u8) -> bool {
        Material::from_id(material)
            .is_some_and(|m| self.core.set_cell_material(tx, ty, idx as usize, m))
    }

    // === Gameplay ===

    pub fn add_heat(&mut self, x: f32, y: f32, radius: f32, amount: f32) {
        self.core.add_heat(&self.world, x, y, radius, amount);
    }

    pub fn ignite_area(&mut self, x: f32, y: f32, radius: f32) -> u32 {
        self.core.ignite_area(&self.world, x, y, radius)
    }

    pub fn destroy_area(&mut self, x: f32, y: f32, radius: f32, irregular: bool) -> u32 {
        self.core.destroy_area(&mut self.world, x, y, radius, irregular)
    }

    /// Call once per frame with the frame time in seconds.
    pub fn update(&mut self, dt: f32) -> bool {
        self.core.update(&mut self.world, dt)
    }

    pub fn step(&mut self, dt: f32) {
        self.core.step(&mut self.world, dt);
    }

    // === Replication ===

    pub fn get_delta_state(&mut self) -> Result<String, JsValue> {
        self.core.get_delta_json().map_err(js_err)
    }

    pub fn apply_delta_state(&mut self, json: String) -> Result<u32, JsValue> {
        self.core
            .apply_delta_json(&mut self.world, &json)
            .map(|n| n as u32)
            .map_err(js_err)
    }

    // === Queries ===

    pub fn is_burning(&self, x: f32, y: f32) -> bool {
        self.core.is_burning(x, y)
    }

    pub fn is_destroyed(&self, x: f32, y: f32) -> bool {
        self.core.is_destroyed(x, y)
    }

    pub fn material_at(&self, x: f32, y: f32) -> u8 {
        self.core.material_at(x, y).id()
    }

    pub fn heat_at(&self, x: f32, y: f32) -> f32 {
        self.core.heat_at(x, y)
    }

    pub fn max_intensity_near(&self, x: f32, y: f32, radius: f32) -> f32 {
        self.core.max_intensity_near(x, y, radius)
    }

    /// JSON snapshot of one tile, or `undefined` if it was never touched.
    pub fn tile_snapshot(&self, tx: u32, ty: u32) -> Result<Option<String>, JsValue> {
        self.core
            .tile_snapshot(tx, ty)
            .map(|s| serde_json::to_string(&s))
            .transpose()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn fire_clusters(&self, cell_size: f32) -> Result<String, JsValue> {
        serde_json::to_string(&self.core.fire_clusters(cell_size))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Flat `[tx, ty, count, ...]` of tiles with burning sub-cells.
    pub fn burning_counts(&self) -> Vec<u32> {
        self.core
            .burning_counts()
            .iter()
            .flat_map(|(k, &n)| [k.tx(), k.ty(), n])
            .collect()
    }

    // === World callbacks, drained by the host ===

    /// Flat `[tx, ty, ...]` of tiles whose visuals changed since the last drain.
    pub fn take_changed_tiles(&mut self) -> Vec<u32> {
        self.world
            .take_changed_tiles()
            .into_iter()
            .flat_map(|k| [k.tx(), k.ty()])
            .collect()
    }

    /// Flat `[tx, ty, ...]` of tiles needing a whole-tile destruction check.
    pub fn take_destruction_checks(&mut self) -> Vec<u32> {
        self.world
            .take_destruction_checks()
            .into_iter()
            .flat_map(|k| [k.tx(), k.ty()])
            .collect()
    }

    pub fn take_mesh_dirty(&mut self) -> bool {
        self.world.take_mesh_dirty()
    }

    /// Flat `[x, y, size, ...]` of cooled-metal decals.
    pub fn take_decals(&mut self) -> Vec<f32> {
        self.world
            .take_decals()
            .into_iter()
            .flat_map(|d| [d.x, d.y, d.size])
            .collect()
    }
}
