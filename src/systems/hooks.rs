//! The world collaborator seam.
//!
//! The simulation never owns the tile grid geometry; it reports what changed
//! through `WorldHooks` and asks it for the world extent.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::spatial::tiles::{Bounds, TileKey};

pub trait WorldHooks {
    /// World width in tiles.
    fn width(&self) -> u32;
    /// World height in tiles.
    fn height(&self) -> u32;

    /// Visible state of a tile changed (destruction, scorch, burn-out).
    fn notify_tile_change(&mut self, _tx: u32, _ty: u32) {}

    /// Geometry must be rebuilt.
    fn mark_mesh_dirty(&mut self) {}

    /// A sub-cell of this tile reached zero hit points.
    fn check_tile_destruction(&mut self, _tx: u32, _ty: u32) {}

    /// A molten puddle cooled into a floor decal.
    fn add_metal_decal(&mut self, _x: f32, _y: f32, _size: f32) {}
}

/// World extent as a value the passes can copy around.
#[inline]
pub fn bounds_of(hooks: &dyn WorldHooks) -> Bounds {
    Bounds::new(hooks.width(), hooks.height())
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MetalDecal {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Records every callback so a host without its own world (the wasm facade,
/// tests) can drain them after a step.
#[derive(Clone, Debug, Default)]
pub struct ChangeLog {
    width: u32,
    height: u32,
    changed: BTreeSet<TileKey>,
    destruction_checks: BTreeSet<TileKey>,
    mesh_dirty: bool,
    decals: Vec<MetalDecal>,
}

impl ChangeLog {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn changed_tiles(&self) -> &BTreeSet<TileKey> {
        &self.changed
    }

    pub fn destruction_checks(&self) -> &BTreeSet<TileKey> {
        &self.destruction_checks
    }

    pub fn is_mesh_dirty(&self) -> bool {
        self.mesh_dirty
    }

    pub fn decals(&self) -> &[MetalDecal] {
        &self.decals
    }

    pub fn take_changed_tiles(&mut self) -> Vec<TileKey> {
        std::mem::take(&mut self.changed).into_iter().collect()
    }

    pub fn take_destruction_checks(&mut self) -> Vec<TileKey> {
        std::mem::take(&mut self.destruction_checks).into_iter().collect()
    }

    pub fn take_mesh_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.mesh_dirty, false)
    }

    pub fn take_decals(&mut self) -> Vec<MetalDecal> {
        std::mem::take(&mut self.decals)
    }
}

impl WorldHooks for ChangeLog {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn notify_tile_change(&mut self, tx: u32, ty: u32) {
        self.changed.insert(TileKey::new(tx, ty));
    }

    fn mark_mesh_dirty(&mut self) {
        self.mesh_dirty = true;
    }

    fn check_tile_destruction(&mut self, tx: u32, ty: u32) {
        self.destruction_checks.insert(TileKey::new(tx, ty));
    }

    fn add_metal_decal(&mut self, x: f32, y: f32, size: f32) {
        self.decals.push(MetalDecal { x, y, size });
    }
}
