use std::collections::BTreeMap;

use crate::domain::HeatConfig;
use crate::net::{DeltaCodec, NetRole};
use crate::spatial::tiles::TileStore;
use crate::systems::diffusion::StencilScratch;
use crate::systems::molten::MoltenScratch;

use super::perf_stats::StepStats;
use super::HeatSim;

/// Host and peer start from the same seed so flow replays identically.
pub(super) const DEFAULT_SEED: u32 = 12345;

/// `config` must already be validated.
pub(super) fn create_heat_sim(config: HeatConfig) -> HeatSim {
    log::debug!("heat sim created: tile_size={}, sim_interval={}", config.tile_size, config.sim_interval);
    HeatSim {
        config,
        tiles: TileStore::new(),
        codec: DeltaCodec::new(),
        role: NetRole::Offline,

        stencil: StencilScratch::new(),
        molten: MoltenScratch::new(),
        events: Vec::with_capacity(64),
        seeds: Vec::with_capacity(64),
        sim_keys: Vec::with_capacity(64),

        burning: BTreeMap::new(),

        frame: 0,
        ticks: 0,
        pending_dt: 0.0,
        rng_state: DEFAULT_SEED,

        perf_enabled: false,
        perf_stats: StepStats::default(),
    }
}
