//! Molten metal: hot metal walls leak into open space, puddles spread by
//! pressure and cool into floor decals.

mod flow;
mod leak;

pub use flow::flow;
pub use leak::{leak, LeakTransfer};

use crate::spatial::tiles::{TileKey, TileStore};

use super::ThermalContext;

/// Scratch reused across steps.
#[derive(Default)]
pub struct MoltenScratch {
    pub(crate) transfers: Vec<LeakTransfer>,
}

impl MoltenScratch {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Leak, then flow/solidify, over `keys`.
pub fn advance(ctx: &mut ThermalContext, scratch: &mut MoltenScratch, keys: &[TileKey]) {
    leak(ctx, &mut scratch.transfers, keys);
    flow(ctx, keys);
}

/// Sub-cells currently holding any molten volume.
pub fn molten_cells(tiles: &TileStore) -> u32 {
    tiles
        .active_keys()
        .filter_map(|k| tiles.get_key(k))
        .map(|t| t.molten.iter().filter(|&&m| m > 0.0).count() as u32)
        .sum()
}
