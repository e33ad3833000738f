//! 4-neighbour stencil over committed heat, written into a reusable arena.
//!
//! Reads never see values produced in the same step, so the result does not
//! depend on tile or sub-cell visiting order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::domain::HeatConfig;
use crate::spatial::tiles::{resolve_neighbor, Bounds, TileFields, TileKey, TileStore, CARDINAL, CELLS};

/// Next-heat buffers, one per simulated tile. Grown on demand and reused
/// every step instead of being reallocated.
#[derive(Default)]
pub struct StencilScratch {
    heat: Vec<[f32; CELLS]>,
}

impl StencilScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers currently allocated.
    pub fn capacity(&self) -> usize {
        self.heat.len()
    }

    pub(super) fn prepare(&mut self, tiles: usize) -> &mut [[f32; CELLS]] {
        if self.heat.len() < tiles {
            self.heat.resize(tiles, [0.0; CELLS]);
        }
        &mut self.heat[..tiles]
    }
}

pub(super) fn compute(
    tiles: &TileStore,
    bounds: Bounds,
    config: &HeatConfig,
    dt: f32,
    keys: &[TileKey],
    out: &mut [[f32; CELLS]],
) {
    #[cfg(feature = "parallel")]
    {
        out.par_iter_mut()
            .zip(keys.par_iter())
            .for_each(|(buf, &key)| compute_tile(tiles, bounds, config, dt, key, buf));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (buf, &key) in out.iter_mut().zip(keys) {
            compute_tile(tiles, bounds, config, dt, key, buf);
        }
    }
}

fn compute_tile(
    tiles: &TileStore,
    bounds: Bounds,
    config: &HeatConfig,
    dt: f32,
    key: TileKey,
    out: &mut [f32; CELLS],
) {
    let Some(tile) = tiles.get_key(key) else {
        out.fill(0.0);
        return;
    };

    let decay = config.decay_rate * dt;
    for i in 0..CELLS {
        let mut sum = 0.0;
        for (dx, dy) in CARDINAL {
            sum += neighbor_heat(tiles, bounds, key, tile, i, dx, dy);
        }
        let avg = sum * 0.25;
        let h = tile.heat[i];
        if h <= 0.0 && avg <= 0.0 {
            out[i] = 0.0;
            continue;
        }
        let blended = h + (avg - h) * config.spread_rate;
        out[i] = (blended - decay).clamp(0.0, config.max_heat);
    }
}

#[inline]
fn neighbor_heat(
    tiles: &TileStore,
    bounds: Bounds,
    key: TileKey,
    tile: &TileFields,
    idx: usize,
    dx: i32,
    dy: i32,
) -> f32 {
    match resolve_neighbor(key, idx, dx, dy) {
        Some((nkey, j)) if nkey == key => tile.heat[j],
        Some((nkey, j)) if !bounds.is_boundary(nkey) => tiles.heat_at(nkey, j),
        _ => 0.0,
    }
}
