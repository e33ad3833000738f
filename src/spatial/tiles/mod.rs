//! Tile Grid Store - sparse per-tile field sets.
//!
//! Each world tile is split into `SUB x SUB` sub-cells addressed by `y*SUB + x`.
//! Field sets are allocated on first touch and kept for the whole session.
//! Storage is keyed by a packed integer so the hot loops never format or parse
//! coordinates.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{Material, MaterialTable};

mod active;
mod area;
mod neighbors;

pub use area::{cell_center, for_each_cell_in_radius, world_to_cell, CellHit};
pub use neighbors::{resolve_neighbor, ALL_EIGHT, CARDINAL};

/// Sub-cells per tile edge.
pub const SUB: usize = 10;
/// Sub-cells per tile.
pub const CELLS: usize = SUB * SUB;

/// Tile coordinate packed as `(tx << 16) | ty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileKey(u32);

impl TileKey {
    pub const MAX_COORD: u32 = 0xFFFF;

    #[inline]
    pub fn new(tx: u32, ty: u32) -> Self {
        debug_assert!(
            tx <= Self::MAX_COORD && ty <= Self::MAX_COORD,
            "tile coordinate out of range: ({}, {})",
            tx,
            ty
        );
        TileKey(((tx & Self::MAX_COORD) << 16) | (ty & Self::MAX_COORD))
    }

    /// `None` when either coordinate does not fit the packed layout.
    #[inline]
    pub fn checked(tx: u32, ty: u32) -> Option<Self> {
        (tx <= Self::MAX_COORD && ty <= Self::MAX_COORD).then(|| TileKey::new(tx, ty))
    }

    #[inline]
    pub fn from_packed(packed: u32) -> Self {
        TileKey(packed)
    }

    #[inline]
    pub fn packed(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn tx(self) -> u32 {
        self.0 >> 16
    }

    #[inline]
    pub fn ty(self) -> u32 {
        self.0 & Self::MAX_COORD
    }

    /// The tile `(dx, dy)` tiles away, if representable.
    pub fn offset(self, dx: i32, dy: i32) -> Option<TileKey> {
        let tx = self.tx() as i64 + dx as i64;
        let ty = self.ty() as i64 + dy as i64;
        let max = Self::MAX_COORD as i64;
        ((0..=max).contains(&tx) && (0..=max).contains(&ty)).then(|| TileKey::new(tx as u32, ty as u32))
    }
}

/// World extent in tiles, as reported by the world collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Outermost ring of tiles (and anything outside the world).
    /// Heat never enters or diffuses through these.
    #[inline]
    pub fn is_boundary(&self, key: TileKey) -> bool {
        let (tx, ty) = (key.tx(), key.ty());
        tx == 0 || ty == 0 || tx + 1 >= self.width || ty + 1 >= self.height
    }
}

/// Every physical field of one tile, one entry per sub-cell.
#[derive(Clone, Debug, PartialEq)]
pub struct TileFields {
    pub material: [Material; CELLS],
    pub hit_points: [f32; CELLS],
    pub heat: [f32; CELLS],
    pub fire: [f32; CELLS],
    pub molten: [f32; CELLS],
    pub scorch: [bool; CELLS],
    pub white_heat: [f32; CELLS],
}

impl Default for TileFields {
    fn default() -> Self {
        Self {
            material: [Material::None; CELLS],
            hit_points: [0.0; CELLS],
            heat: [0.0; CELLS],
            fire: [0.0; CELLS],
            molten: [0.0; CELLS],
            scorch: [false; CELLS],
            white_heat: [0.0; CELLS],
        }
    }
}

impl TileFields {
    /// Destroyed or never-solid: the cell is passable and can hold a puddle.
    #[inline]
    pub fn is_open(&self, idx: usize) -> bool {
        self.hit_points[idx] <= 0.0
    }

    /// Solid material that has been knocked down to zero hit points.
    #[inline]
    pub fn is_destroyed(&self, idx: usize) -> bool {
        self.material[idx].is_solid() && self.hit_points[idx] <= 0.0
    }

    /// Any heat, fire or molten volume left anywhere in the tile.
    pub fn has_activity(&self) -> bool {
        self.heat.iter().any(|&h| h > 0.0)
            || self.fire.iter().any(|&f| f > 0.0)
            || self.molten.iter().any(|&m| m > 0.0)
    }

    pub fn burning_cells(&self) -> u32 {
        self.fire.iter().filter(|&&f| f > 0.0).count() as u32
    }

    /// Wipe transient thermal state; material, hit points and scorch stay.
    pub fn clear_thermal(&mut self) {
        self.heat = [0.0; CELLS];
        self.fire = [0.0; CELLS];
        self.molten = [0.0; CELLS];
        self.white_heat = [0.0; CELLS];
    }
}

/// Sparse tile storage plus the active-tile set.
#[derive(Default)]
pub struct TileStore {
    tiles: HashMap<TileKey, Box<TileFields>>,
    /// Ordered so passes (and therefore replays) visit tiles identically.
    active: BTreeSet<TileKey>,
}

impl TileStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, tx: u32, ty: u32) -> Option<&TileFields> {
        self.get_key(TileKey::new(tx, ty))
    }

    #[inline]
    pub fn get_key(&self, key: TileKey) -> Option<&TileFields> {
        self.tiles.get(&key).map(|t| t.as_ref())
    }

    #[inline]
    pub fn get_mut(&mut self, key: TileKey) -> Option<&mut TileFields> {
        self.tiles.get_mut(&key).map(|t| t.as_mut())
    }

    /// Allocate on first use; idempotent afterwards.
    pub fn get_or_create(&mut self, tx: u32, ty: u32) -> &mut TileFields {
        self.get_or_create_key(TileKey::new(tx, ty))
    }

    pub fn get_or_create_key(&mut self, key: TileKey) -> &mut TileFields {
        self.tiles.entry(key).or_default().as_mut()
    }

    #[inline]
    pub fn contains(&self, key: TileKey) -> bool {
        self.tiles.contains_key(&key)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Fill a whole tile with one material at full hit points.
    /// World-generation only: this is the one path that raises hit points.
    pub fn set_material(&mut self, tx: u32, ty: u32, material: Material, table: &MaterialTable) {
        let hp = table.hit_points(material);
        let tile = self.get_or_create(tx, ty);
        tile.material = [material; CELLS];
        tile.hit_points = [hp; CELLS];
    }

    /// Place one sub-cell (partial tiles at world generation).
    pub fn set_cell_material(
        &mut self,
        tx: u32,
        ty: u32,
        idx: usize,
        material: Material,
        table: &MaterialTable,
    ) {
        let hp = table.hit_points(material);
        let tile = self.get_or_create(tx, ty);
        tile.material[idx] = material;
        tile.hit_points[idx] = hp;
    }

    /// Heat of a sub-cell; unallocated tiles read as cold.
    #[inline]
    pub fn heat_at(&self, key: TileKey, idx: usize) -> f32 {
        self.get_key(key).map_or(0.0, |t| t.heat[idx])
    }

    /// Sorted keys of every allocated tile.
    pub fn keys(&self) -> Vec<TileKey> {
        let mut keys: Vec<TileKey> = self.tiles.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_packs_and_unpacks() {
        let key = TileKey::new(513, 77);
        assert_eq!(key.tx(), 513);
        assert_eq!(key.ty(), 77);
        assert_eq!(key.packed(), (513 << 16) | 77);
        assert_eq!(TileKey::from_packed(key.packed()), key);
        assert_eq!(key.offset(-1, 2), Some(TileKey::new(512, 79)));
        assert_eq!(TileKey::new(0, 3).offset(-1, 0), None);
        assert_eq!(TileKey::checked(513, 77), Some(key));
        assert_eq!(TileKey::checked(TileKey::MAX_COORD + 1, 0), None);
        assert_eq!(TileKey::checked(0, u32::MAX), None);
    }

    #[test]
    fn reads_on_missing_tiles_do_not_allocate() {
        let store = TileStore::new();
        assert!(store.get(3, 4).is_none());
        assert_eq!(store.heat_at(TileKey::new(3, 4), 12), 0.0);
        assert_eq!(store.tile_count(), 0);
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut store = TileStore::new();
        store.get_or_create(2, 2).heat[5] = 0.7;
        let again = store.get_or_create(2, 2);
        assert_eq!(again.heat[5], 0.7);
        assert_eq!(store.tile_count(), 1);
    }

    #[test]
    fn set_material_resets_hit_points_uniformly() {
        let table = MaterialTable::default();
        let mut store = TileStore::new();
        store.set_material(4, 4, Material::Stone, &table);
        let tile = store.get(4, 4).expect("allocated");
        assert!(tile.material.iter().all(|m| *m == Material::Stone));
        assert!(tile.hit_points.iter().all(|hp| *hp == 100.0));
        assert!(!tile.has_activity());
    }

    #[test]
    fn boundary_ring_is_detected() {
        let bounds = Bounds::new(8, 6);
        assert!(bounds.is_boundary(TileKey::new(0, 3)));
        assert!(bounds.is_boundary(TileKey::new(7, 3)));
        assert!(bounds.is_boundary(TileKey::new(3, 0)));
        assert!(bounds.is_boundary(TileKey::new(3, 5)));
        assert!(bounds.is_boundary(TileKey::new(9, 3)));
        assert!(!bounds.is_boundary(TileKey::new(1, 1)));
        assert!(!bounds.is_boundary(TileKey::new(6, 4)));
    }
}
