use crate::domain::Material;
use crate::spatial::tiles::{for_each_cell_in_radius, TileKey, CELLS};
use crate::systems::{bounds_of, combustion, destruction, WorldHooks};

use super::HeatSim;

pub(super) fn set_material(sim: &mut HeatSim, tx: u32, ty: u32, material: Material) -> bool {
    if TileKey::checked(tx, ty).is_none() {
        log::warn!("set_material: tile ({tx}, {ty}) out of range");
        return false;
    }
    sim.tiles.set_material(tx, ty, material, &sim.config.materials);
    true
}

pub(super) fn set_cell_material(
    sim: &mut HeatSim,
    tx: u32,
    ty: u32,
    idx: usize,
    material: Material,
) -> bool {
    if TileKey::checked(tx, ty).is_none() || idx >= CELLS {
        log::warn!("set_cell_material: tile ({tx}, {ty}) sub-cell {idx} out of range");
        return false;
    }
    sim.tiles.set_cell_material(tx, ty, idx, material, &sim.config.materials);
    true
}

/// `amount` at the centre, falling off linearly to zero at `radius`.
/// Boundary tiles are skipped; heat is capped at `max_heat`. Flammable cells
/// pushed past the ignition threshold catch fire here, before the next blend.
pub(super) fn add_heat(
    sim: &mut HeatSim,
    hooks: &dyn WorldHooks,
    wx: f32,
    wy: f32,
    radius: f32,
    amount: f32,
) {
    if !(radius > 0.0) || !(amount > 0.0) {
        return;
    }
    let bounds = bounds_of(hooks);
    let config = &sim.config;
    let tiles = &mut sim.tiles;
    let mut ignited = 0u32;
    for_each_cell_in_radius(config.tile_size, wx, wy, radius, |hit| {
        if bounds.is_boundary(hit.key) {
            return;
        }
        let falloff = 1.0 - hit.dist / radius;
        if falloff <= 0.0 {
            return;
        }
        let tile = tiles.get_or_create_key(hit.key);
        tile.heat[hit.idx] = (tile.heat[hit.idx] + amount * falloff).min(config.max_heat);
        if combustion::try_ignite(tile, hit.idx, config) {
            ignited += 1;
        }
        tiles.mark_active(hit.key);
    });
    if ignited > 0 {
        log::debug!("heat splash at ({wx:.1}, {wy:.1}) ignited {ignited} cells");
    }
}

pub(super) fn ignite_area(sim: &mut HeatSim, hooks: &dyn WorldHooks, wx: f32, wy: f32, radius: f32) -> u32 {
    let bounds = bounds_of(hooks);
    combustion::ignite_area(&mut sim.tiles, &sim.config, bounds, wx, wy, radius)
}

pub(super) fn destroy_area(
    sim: &mut HeatSim,
    hooks: &mut dyn WorldHooks,
    wx: f32,
    wy: f32,
    radius: f32,
    irregular: bool,
) -> u32 {
    destruction::destroy_area(&mut sim.tiles, &sim.config, hooks, wx, wy, radius, irregular)
}
