//! Destruction & vaporization.
//!
//! Two ways a sub-cell loses its last hit point: an impact crater carved by
//! `destroy_area`, or sustained white heat (`vaporize_cell`, called from the
//! diffusion commit). Burn-out is the third source of `DestroyEvent`s. All of
//! them reach the world through `flush_events`.

use std::collections::BTreeSet;
use std::f32::consts::TAU;

use crate::core::rng::hash2;
use crate::domain::{HeatConfig, Material};
use crate::spatial::tiles::{for_each_cell_in_radius, TileFields, TileKey, TileStore};

use super::{DestroyCause, DestroyEvent, WorldHooks};

/// Destroy a cell by heat alone. Leaves afterglow heat behind and, for metal,
/// a full molten puddle. Returns `false` for cells that cannot vaporize.
pub fn vaporize_cell(tile: &mut TileFields, idx: usize, config: &HeatConfig) -> bool {
    let material = tile.material[idx];
    if matches!(material, Material::None | Material::Indestructible) || tile.hit_points[idx] <= 0.0 {
        return false;
    }
    tile.hit_points[idx] = 0.0;
    tile.heat[idx] = config.vaporize_residual_heat;
    tile.fire[idx] = 0.0;
    tile.white_heat[idx] = 0.0;
    if material == Material::Metal {
        tile.molten[idx] = tile.molten[idx].max(config.vaporize_molten).min(config.max_molten);
    }
    true
}

/// Angle-dependent crater edge.
///
/// Two harmonics keep the outline lumpy without self-intersecting;
/// `jaggedness` is the largest relative deviation from `radius`.
#[inline]
pub fn crater_radius(radius: f32, jaggedness: f32, angle: f32, phase: (f32, f32)) -> f32 {
    let wobble = 0.6 * (3.0 * angle + phase.0).sin() + 0.4 * (5.0 * angle + phase.1).cos();
    radius * (1.0 + jaggedness * wobble)
}

/// Phases derived from the impact point, so every replica carves the same shape.
pub fn crater_phase(wx: f32, wy: f32) -> (f32, f32) {
    let h = hash2(wx.to_bits(), wy.to_bits());
    let a = (h & 0xFFFF) as f32 / 65535.0;
    let b = (h >> 16) as f32 / 65535.0;
    (a * TAU, b * TAU)
}

/// Carve a crater. Hit points inside the (optionally irregular) radius drop to
/// zero except on indestructible cells; a ring just outside is scorched. Heat,
/// fire and molten are left in place. Returns the number of cells destroyed.
pub fn destroy_area(
    tiles: &mut TileStore,
    config: &HeatConfig,
    hooks: &mut dyn WorldHooks,
    wx: f32,
    wy: f32,
    radius: f32,
    irregular: bool,
) -> u32 {
    if !(radius > 0.0) {
        return 0;
    }
    let jag = if irregular { config.crater_jaggedness } else { 0.0 };
    let phase = crater_phase(wx, wy);
    let border = config.scorch_border_cells * config.sub_cell_size();
    let reach = radius * (1.0 + jag) + border;

    let mut events = Vec::new();
    let mut scorched = BTreeSet::new();
    for_each_cell_in_radius(config.tile_size, wx, wy, reach, |hit| {
        let edge = if jag > 0.0 {
            crater_radius(radius, jag, hit.dy.atan2(hit.dx), phase)
        } else {
            radius
        };
        if hit.dist > edge + border {
            return;
        }
        let Some(tile) = tiles.get_mut(hit.key) else {
            return;
        };
        let material = tile.material[hit.idx];
        if !material.is_solid() {
            return;
        }
        if hit.dist <= edge {
            if material != Material::Indestructible && tile.hit_points[hit.idx] > 0.0 {
                tile.hit_points[hit.idx] = 0.0;
                events.push(DestroyEvent { key: hit.key, idx: hit.idx, cause: DestroyCause::Impact });
            }
        } else if !tile.scorch[hit.idx] {
            tile.scorch[hit.idx] = true;
            scorched.insert(hit.key);
        }
    });

    for key in scorched {
        hooks.notify_tile_change(key.tx(), key.ty());
    }
    let destroyed = events.len() as u32;
    flush_events(hooks, &mut events);
    destroyed
}

/// Report queued destruction to the world: one change notification and one
/// destruction check per touched tile, and a single mesh rebuild.
pub fn flush_events(hooks: &mut dyn WorldHooks, events: &mut Vec<DestroyEvent>) {
    if events.is_empty() {
        return;
    }
    let mut touched: BTreeSet<TileKey> = BTreeSet::new();
    let (mut impact, mut burnout, mut vaporized) = (0u32, 0u32, 0u32);
    for ev in events.drain(..) {
        touched.insert(ev.key);
        match ev.cause {
            DestroyCause::Impact => impact += 1,
            DestroyCause::Burnout => burnout += 1,
            DestroyCause::Vaporized => vaporized += 1,
        }
    }
    for key in &touched {
        hooks.notify_tile_change(key.tx(), key.ty());
        hooks.check_tile_destruction(key.tx(), key.ty());
    }
    hooks.mark_mesh_dirty();
    log::debug!(
        "destroyed cells: impact={impact} burnout={burnout} vaporized={vaporized} tiles={}",
        touched.len()
    );
}
