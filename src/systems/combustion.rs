//! Combustion: `Unburnt -> Burning -> Consumed`.
//!
//! Ignition happens either from heat (checked by the diffusion commit) or by
//! force from an explosion via `ignite_area`, which only reaches cells exposed
//! to open space. Burning cells grow hotter, eat their own hit points and seed
//! their cardinal neighbours once the flame is strong enough.

use std::collections::BTreeMap;

use crate::domain::{HeatConfig, MaterialTable};
use crate::spatial::tiles::{
    for_each_cell_in_radius, resolve_neighbor, Bounds, TileFields, TileKey, TileStore, CARDINAL,
    CELLS,
};

use super::{DestroyCause, DestroyEvent, ThermalContext};

/// Light an unburnt flammable cell whose heat crossed the ignition threshold.
#[inline]
pub fn try_ignite(tile: &mut TileFields, idx: usize, config: &HeatConfig) -> bool {
    if tile.heat[idx] > config.ignition_threshold && can_catch(tile, idx, &config.materials) {
        tile.fire[idx] = config.ignite_intensity;
        true
    } else {
        false
    }
}

/// Flammable, still standing and not already burning.
#[inline]
fn can_catch(tile: &TileFields, idx: usize, materials: &MaterialTable) -> bool {
    tile.fire[idx] <= 0.0 && tile.hit_points[idx] > 0.0 && materials.is_flammable(tile.material[idx])
}

/// At least one cardinal neighbour is missing, empty or destroyed.
pub fn is_surface_cell(tiles: &TileStore, key: TileKey, idx: usize) -> bool {
    CARDINAL.iter().any(|&(dx, dy)| match resolve_neighbor(key, idx, dx, dy) {
        None => true,
        Some((nkey, j)) => tiles.get_key(nkey).map_or(true, |t| t.is_open(j)),
    })
}

/// Forced ignition from an explosion. Buried cells are left alone.
/// Returns the number of cells set alight.
pub fn ignite_area(
    tiles: &mut TileStore,
    config: &HeatConfig,
    bounds: Bounds,
    wx: f32,
    wy: f32,
    radius: f32,
) -> u32 {
    let mut targets = Vec::new();
    for_each_cell_in_radius(config.tile_size, wx, wy, radius, |hit| {
        if bounds.is_boundary(hit.key) {
            return;
        }
        let Some(tile) = tiles.get_key(hit.key) else {
            return;
        };
        if can_catch(tile, hit.idx, &config.materials) && is_surface_cell(tiles, hit.key, hit.idx) {
            targets.push((hit.key, hit.idx));
        }
    });

    // Decided up front so cells lit here do not change who counts as surface.
    for &(key, idx) in &targets {
        if let Some(tile) = tiles.get_mut(key) {
            tile.fire[idx] = config.ignite_intensity;
            tile.heat[idx] = tile.heat[idx].max(config.ignition_threshold);
        }
        tiles.mark_active(key);
    }
    if !targets.is_empty() {
        log::debug!("forced ignition of {} cells at ({wx:.1}, {wy:.1})", targets.len());
    }
    targets.len() as u32
}

/// Advance every burning cell on `keys` by one step.
///
/// `seeds` is reusable scratch. `burning` is refilled with the per-tile count
/// of cells still alight after the step.
pub fn burn(
    ctx: &mut ThermalContext,
    keys: &[TileKey],
    seeds: &mut Vec<(TileKey, usize)>,
    burning: &mut BTreeMap<TileKey, u32>,
) {
    let cfg = ctx.config;
    let dt = ctx.dt;
    seeds.clear();
    burning.clear();

    // Spread sources are read before any growth so order cannot matter.
    for &key in keys {
        let Some(tile) = ctx.tiles.get_key(key) else {
            continue;
        };
        for i in 0..CELLS {
            if tile.fire[i] <= cfg.fire_spread_threshold || tile.hit_points[i] <= 0.0 {
                continue;
            }
            for (dx, dy) in CARDINAL {
                let Some((nkey, j)) = resolve_neighbor(key, i, dx, dy) else {
                    continue;
                };
                if ctx.bounds.is_boundary(nkey) {
                    continue;
                }
                if ctx.tiles.get_key(nkey).is_some_and(|n| can_catch(n, j, &cfg.materials)) {
                    seeds.push((nkey, j));
                }
            }
        }
    }

    for &key in keys {
        let Some(tile) = ctx.tiles.get_mut(key) else {
            continue;
        };
        let mut alight = 0u32;
        let mut consumed = false;
        for i in 0..CELLS {
            if tile.fire[i] <= 0.0 {
                continue;
            }
            if tile.hit_points[i] <= 0.0 {
                // Knocked out by an impact; its destruction was already reported.
                tile.fire[i] = 0.0;
                continue;
            }
            tile.fire[i] += cfg.fire_growth_rate * dt;
            if tile.heat[i] < 1.0 {
                tile.heat[i] = (tile.heat[i] + tile.fire[i] * cfg.fire_heat_feedback * dt).min(1.0);
            }
            tile.hit_points[i] = (tile.hit_points[i] - cfg.burn_damage_rate * dt).max(0.0);

            if tile.hit_points[i] <= 0.0 {
                // No fuel left.
                tile.fire[i] = 0.0;
                tile.heat[i] = 0.0;
                tile.white_heat[i] = 0.0;
                ctx.events.push(DestroyEvent { key, idx: i, cause: DestroyCause::Burnout });
                ctx.counters.burnouts += 1;
                consumed = true;
                continue;
            }
            alight += 1;
        }
        if alight > 0 {
            burning.insert(key, alight);
            ctx.counters.burning_cells += alight;
        }
        if consumed {
            log::trace!("tile ({}, {}) burned out cells", key.tx(), key.ty());
        }
    }

    for &(key, idx) in seeds.iter() {
        let Some(tile) = ctx.tiles.get_mut(key) else {
            continue;
        };
        if !can_catch(tile, idx, &cfg.materials) {
            continue;
        }
        tile.fire[idx] = cfg.fire_seed_intensity;
        ctx.counters.ignitions += 1;
        ctx.tiles.mark_active(key);
        *burning.entry(key).or_insert(0) += 1;
        ctx.counters.burning_cells += 1;
    }
}
