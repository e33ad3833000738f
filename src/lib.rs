//! HeatMap Engine - destructible-terrain thermal simulation in WASM
//!
//! Per-tile, sub-divided cellular automaton: heat diffusion, combustion,
//! impact and heat destruction, molten metal flow, scorch marking, and a
//! delta codec that keeps host and peers visually in sync.
//!
//! Layout:
//! - core/        - RNG and small helpers with no simulation knowledge
//! - domain/      - Materials and tuning (`HeatConfig`)
//! - spatial/     - Sparse tile store, neighbour lookup, world-space sweeps
//! - systems/     - The simulation passes and the `WorldHooks` seam
//! - net/         - Host/peer delta records
//! - simulation/  - `HeatSim` orchestration and the wasm facade

pub mod core;
pub mod domain;
pub mod error;
pub mod net;
pub mod simulation;
pub mod spatial;
pub mod systems;

use wasm_bindgen::prelude::*;

// Thread pool init for the `parallel` stencil.
#[cfg(feature = "parallel")]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    web_sys::console::log_1(&"HeatMap WASM engine initialized".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use domain::{HeatConfig, Material, MaterialTable};
pub use error::{SimError, SimResult};
pub use net::{DeltaRecord, NetRole};
pub use simulation::{FireCluster, HeatMap, HeatSim, StepStats, TileSnapshot};
pub use spatial::tiles::{TileFields, TileKey, TileStore, CELLS, SUB};
pub use systems::{ChangeLog, MetalDecal, WorldHooks};

// Material ids for JS
#[wasm_bindgen]
pub fn mat_none() -> u8 { domain::materials::MAT_NONE }
#[wasm_bindgen]
pub fn mat_wood() -> u8 { domain::materials::MAT_WOOD }
#[wasm_bindgen]
pub fn mat_brick() -> u8 { domain::materials::MAT_BRICK }
#[wasm_bindgen]
pub fn mat_stone() -> u8 { domain::materials::MAT_STONE }
#[wasm_bindgen]
pub fn mat_metal() -> u8 { domain::materials::MAT_METAL }
#[wasm_bindgen]
pub fn mat_indestructible() -> u8 { domain::materials::MAT_INDESTRUCTIBLE }
