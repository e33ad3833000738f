//! Point queries and per-tile snapshots for gameplay and rendering.

use serde::Serialize;

use crate::domain::Material;
use crate::spatial::tiles::{for_each_cell_in_radius, world_to_cell, TileFields, TileKey};

use super::HeatSim;

/// Read-only copy of one tile's visual fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSnapshot {
    pub tx: u32,
    pub ty: u32,
    pub material: Vec<u8>,
    pub hit_points: Vec<f32>,
    pub heat: Vec<f32>,
    pub fire: Vec<f32>,
    pub molten: Vec<f32>,
    pub scorch: Vec<u8>,
}

impl TileSnapshot {
    fn capture(key: TileKey, tile: &TileFields) -> Self {
        Self {
            tx: key.tx(),
            ty: key.ty(),
            material: tile.material.iter().map(|m| m.id()).collect(),
            hit_points: tile.hit_points.to_vec(),
            heat: tile.heat.to_vec(),
            fire: tile.fire.to_vec(),
            molten: tile.molten.to_vec(),
            scorch: tile.scorch.iter().map(|&s| u8::from(s)).collect(),
        }
    }
}

fn cell_at(sim: &HeatSim, wx: f32, wy: f32) -> Option<(&TileFields, usize)> {
    let (key, idx) = world_to_cell(sim.config.tile_size, wx, wy)?;
    sim.tiles.get_key(key).map(|t| (t, idx))
}

pub(super) fn is_burning(sim: &HeatSim, wx: f32, wy: f32) -> bool {
    cell_at(sim, wx, wy).is_some_and(|(t, i)| t.fire[i] > 0.0)
}

pub(super) fn is_destroyed(sim: &HeatSim, wx: f32, wy: f32) -> bool {
    cell_at(sim, wx, wy).is_some_and(|(t, i)| t.is_destroyed(i))
}

pub(super) fn material_at(sim: &HeatSim, wx: f32, wy: f32) -> Material {
    cell_at(sim, wx, wy).map_or(Material::None, |(t, i)| t.material[i])
}

pub(super) fn heat_at(sim: &HeatSim, wx: f32, wy: f32) -> f32 {
    cell_at(sim, wx, wy).map_or(0.0, |(t, i)| t.heat[i])
}

/// Strongest heat or fire within `radius`, for damage-over-time checks.
pub(super) fn max_intensity_near(sim: &HeatSim, wx: f32, wy: f32, radius: f32) -> f32 {
    let mut best = 0.0f32;
    for_each_cell_in_radius(sim.config.tile_size, wx, wy, radius.max(0.0), |hit| {
        if let Some(t) = sim.tiles.get_key(hit.key) {
            best = best.max(t.heat[hit.idx]).max(t.fire[hit.idx]);
        }
    });
    best
}

pub(super) fn tile_snapshot(sim: &HeatSim, tx: u32, ty: u32) -> Option<TileSnapshot> {
    let key = TileKey::checked(tx, ty)?;
    sim.tiles.get_key(key).map(|t| TileSnapshot::capture(key, t))
}
