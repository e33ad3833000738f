//! HeatSim - the destructible-terrain thermal simulation.
//!
//! Owns the tile store, the tuned constants and every per-step scratch buffer.
//! The world itself stays outside: each call that can change visible state
//! takes a `&mut dyn WorldHooks`.
//!
//! Per step: diffusion & decay -> combustion -> destruction -> molten flow.
//! Replication (host emit / peer apply) happens between steps.

use std::collections::BTreeMap;

use crate::domain::{HeatConfig, Material};
use crate::error::SimResult;
use crate::net::{DeltaCodec, DeltaRecord, NetRole};
use crate::spatial::tiles::{TileKey, TileStore};
use crate::systems::diffusion::StencilScratch;
use crate::systems::molten::MoltenScratch;
use crate::systems::{DestroyEvent, WorldHooks};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "step/step.rs"]
mod step;
#[path = "commands/commands.rs"]
mod commands;
#[path = "sync/sync.rs"]
mod sync;
#[path = "render/queries.rs"]
mod queries;
#[path = "render/clusters.rs"]
mod clusters;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
mod facade;

pub use clusters::{glow_color, FireCluster};
pub use facade::HeatMap;
pub use perf_stats::StepStats;
pub use queries::TileSnapshot;

use perf_timer::PerfTimer;

pub struct HeatSim {
    config: HeatConfig,
    tiles: TileStore,
    codec: DeltaCodec,
    role: NetRole,

    // Per-step scratch, reused
    stencil: StencilScratch,
    molten: MoltenScratch,
    events: Vec<DestroyEvent>,
    seeds: Vec<(TileKey, usize)>,
    sim_keys: Vec<TileKey>,

    // Read export for area sound
    burning: BTreeMap<TileKey, u32>,

    // State
    frame: u64,
    ticks: u64,
    pending_dt: f32,
    rng_state: u32,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: StepStats,
}

impl HeatSim {
    /// Rejects a config that fails `HeatConfig::validate`.
    pub fn new(config: HeatConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(init::create_heat_sim(config))
    }

    /// Build from a JSON config; missing keys keep their defaults.
    pub fn from_config_json(json: &str) -> SimResult<Self> {
        Self::new(HeatConfig::from_json(json)?)
    }

    pub fn config(&self) -> &HeatConfig {
        &self.config
    }

    pub fn tiles(&self) -> &TileStore {
        &self.tiles
    }

    pub fn role(&self) -> NetRole {
        self.role
    }

    /// Steps run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn active_tiles(&self) -> usize {
        self.tiles.active_len()
    }

    // === Settings ===

    pub fn set_role(&mut self, role: NetRole) {
        settings::set_role(self, role);
    }

    pub fn set_sim_interval(&mut self, frames: u32) -> SimResult<()> {
        settings::set_sim_interval(self, frames)
    }

    pub fn set_config(&mut self, config: HeatConfig) -> SimResult<()> {
        settings::set_config(self, config)
    }

    pub fn set_seed(&mut self, seed: u32) {
        settings::set_seed(self, seed);
    }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Last step snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> StepStats {
        settings::get_perf_stats(self)
    }

    // === World generation ===

    /// Returns false (and changes nothing) for a tile outside the key range.
    pub fn set_material(&mut self, tx: u32, ty: u32, material: Material) -> bool {
        commands::set_material(self, tx, ty, material)
    }

    /// Returns false for a tile outside the key range or `idx >= CELLS`.
    pub fn set_cell_material(&mut self, tx: u32, ty: u32, idx: usize, material: Material) -> bool {
        commands::set_cell_material(self, tx, ty, idx, material)
    }

    // === Gameplay commands ===

    /// Heat splash with linear falloff from the centre.
    pub fn add_heat(&mut self, hooks: &dyn WorldHooks, wx: f32, wy: f32, radius: f32, amount: f32) {
        commands::add_heat(self, hooks, wx, wy, radius, amount);
    }

    /// Forced explosion ignition of exposed flammable cells.
    pub fn ignite_area(&mut self, hooks: &dyn WorldHooks, wx: f32, wy: f32, radius: f32) -> u32 {
        commands::ignite_area(self, hooks, wx, wy, radius)
    }

    /// Carve a crater; returns the number of sub-cells destroyed.
    pub fn destroy_area(
        &mut self,
        hooks: &mut dyn WorldHooks,
        wx: f32,
        wy: f32,
        radius: f32,
        irregular: bool,
    ) -> u32 {
        commands::destroy_area(self, hooks, wx, wy, radius, irregular)
    }

    // === Stepping ===

    /// Called every frame; runs a step every `sim_interval` calls with the
    /// accumulated time. Returns whether a step ran.
    pub fn update(&mut self, hooks: &mut dyn WorldHooks, frame_dt: f32) -> bool {
        step::update(self, hooks, frame_dt)
    }

    /// Run one step with an explicit `dt`, ignoring the throttle.
    pub fn step(&mut self, hooks: &mut dyn WorldHooks, dt: f32) {
        step::step(self, hooks, dt);
    }

    // === Replication ===

    /// Host only.
    pub fn get_delta_state(&mut self) -> SimResult<Vec<DeltaRecord>> {
        sync::get_delta_state(self)
    }

    /// Peer only. Returns the number of records used.
    pub fn apply_delta_state(
        &mut self,
        hooks: &mut dyn WorldHooks,
        records: &[DeltaRecord],
    ) -> SimResult<usize> {
        sync::apply_delta_state(self, hooks, records)
    }

    pub fn get_delta_json(&mut self) -> SimResult<String> {
        sync::get_delta_json(self)
    }

    pub fn apply_delta_json(&mut self, hooks: &mut dyn WorldHooks, json: &str) -> SimResult<usize> {
        sync::apply_delta_json(self, hooks, json)
    }

    // === Read exports ===

    pub fn is_burning(&self, wx: f32, wy: f32) -> bool {
        queries::is_burning(self, wx, wy)
    }

    pub fn is_destroyed(&self, wx: f32, wy: f32) -> bool {
        queries::is_destroyed(self, wx, wy)
    }

    pub fn material_at(&self, wx: f32, wy: f32) -> Material {
        queries::material_at(self, wx, wy)
    }

    pub fn heat_at(&self, wx: f32, wy: f32) -> f32 {
        queries::heat_at(self, wx, wy)
    }

    pub fn max_intensity_near(&self, wx: f32, wy: f32, radius: f32) -> f32 {
        queries::max_intensity_near(self, wx, wy, radius)
    }

    pub fn tile_snapshot(&self, tx: u32, ty: u32) -> Option<TileSnapshot> {
        queries::tile_snapshot(self, tx, ty)
    }

    /// Burning sub-cells per tile after the last step.
    pub fn burning_counts(&self) -> &BTreeMap<TileKey, u32> {
        &self.burning
    }

    pub fn fire_clusters(&self, cell_size: f32) -> Vec<FireCluster> {
        clusters::fire_clusters(self, cell_size)
    }
}

impl Default for HeatSim {
    fn default() -> Self {
        init::create_heat_sim(HeatConfig::default())
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
