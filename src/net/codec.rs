//! Emit/apply bookkeeping for replicated tiles.

use std::collections::BTreeSet;

use crate::domain::{HeatConfig, Material};
use crate::spatial::tiles::{TileFields, TileKey, TileStore};
use crate::systems::WorldHooks;

use super::delta::{round2, DeltaRecord};

#[derive(Default)]
pub struct DeltaCodec {
    /// Host: tiles sent as data records and not cleared since.
    replicated: BTreeSet<TileKey>,
    /// Peer: tiles whose fields come from the host; the local step skips them.
    remote: BTreeSet<TileKey>,
}

impl DeltaCodec {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_remote(&self, key: TileKey) -> bool {
        self.remote.contains(&key)
    }

    pub fn remote_len(&self) -> usize {
        self.remote.len()
    }

    pub fn replicated_len(&self) -> usize {
        self.replicated.len()
    }

    /// Forget all bookkeeping (role change).
    pub fn reset(&mut self) {
        self.replicated.clear();
        self.remote.clear();
    }

    /// Records for every active tile carrying data, followed by one clear
    /// record per previously replicated tile that has left the active set.
    /// A clear record still carries the tile's scorch and destroyed bits, so a
    /// burn-out in the tile's last active tick reaches the peer.
    pub fn emit(&mut self, tiles: &TileStore, config: &HeatConfig) -> Vec<DeltaRecord> {
        let mut records = Vec::new();
        let mut sent = Vec::new();
        for key in tiles.active_keys() {
            let Some(tile) = tiles.get_key(key) else {
                continue;
            };
            if let Some(record) = encode_tile(key, tile, config.delta_epsilon) {
                records.push(record);
                sent.push(key);
            }
        }

        let gone: Vec<TileKey> = self
            .replicated
            .iter()
            .copied()
            .filter(|&k| !tiles.is_active(k))
            .collect();
        for key in gone {
            self.replicated.remove(&key);
            let mut record = DeltaRecord::clear(key);
            if let Some(tile) = tiles.get_key(key) {
                encode_residue(&mut record, tile);
            }
            records.push(record);
        }
        self.replicated.extend(sent);
        records
    }

    /// Apply host records. Returns the number of records used.
    pub fn apply(
        &mut self,
        tiles: &mut TileStore,
        records: &[DeltaRecord],
        hooks: &mut dyn WorldHooks,
        config: &HeatConfig,
    ) -> usize {
        let mut applied = 0;
        let mut destroyed_any = false;
        for record in records {
            let Some(key) = record.key() else {
                continue;
            };
            applied += 1;

            let outcome = if record.is_clear() {
                let mut outcome = FieldOutcome::default();
                let residue = record.scorch.is_some() || record.destroyed.is_some();
                let tile = if residue {
                    Some(tiles.get_or_create_key(key))
                } else {
                    tiles.get_mut(key)
                };
                if let Some(tile) = tile {
                    tile.clear_thermal();
                    outcome = merge_residue(tile, record);
                }
                tiles.deactivate(key);
                self.remote.remove(&key);
                hooks.notify_tile_change(key.tx(), key.ty());
                outcome
            } else {
                let tile = tiles.get_or_create_key(key);
                let outcome = apply_fields(tile, record, config);
                if tile.has_activity() {
                    tiles.mark_active(key);
                }
                self.remote.insert(key);
                if outcome.scorch_flipped || outcome.destroyed > 0 {
                    hooks.notify_tile_change(key.tx(), key.ty());
                }
                outcome
            };

            if outcome.destroyed > 0 {
                hooks.check_tile_destruction(key.tx(), key.ty());
                destroyed_any = true;
            }
        }
        if destroyed_any {
            hooks.mark_mesh_dirty();
        }
        log::trace!("applied {applied} of {} delta records", records.len());
        applied
    }
}

fn encode_tile(key: TileKey, tile: &TileFields, eps: f32) -> Option<DeltaRecord> {
    let floats = |field: &[f32]| -> Option<Vec<f32>> {
        field
            .iter()
            .any(|&v| v > eps)
            .then(|| field.iter().map(|&v| round2(v)).collect())
    };

    let mut record = DeltaRecord::new(key);
    record.heat = floats(&tile.heat[..]);
    record.fire = floats(&tile.fire[..]);
    record.molten = floats(&tile.molten[..]);
    encode_residue(&mut record, tile);

    let has_data = record.heat.is_some()
        || record.fire.is_some()
        || record.molten.is_some()
        || record.scorch.is_some()
        || record.destroyed.is_some();
    has_data.then_some(record)
}

/// The monotonic bits: scorch and destroyed cells, each only when any is set.
fn encode_residue(record: &mut DeltaRecord, tile: &TileFields) {
    if tile.scorch.iter().any(|&s| s) {
        record.scorch = Some(tile.scorch.iter().map(|&s| u8::from(s)).collect());
    }
    if (0..tile.material.len()).any(|i| tile.is_destroyed(i)) {
        record.destroyed = Some((0..tile.material.len()).map(|i| u8::from(tile.is_destroyed(i))).collect());
    }
}

#[derive(Default)]
struct FieldOutcome {
    scorch_flipped: bool,
    destroyed: u32,
}

fn apply_fields(tile: &mut TileFields, record: &DeltaRecord, config: &HeatConfig) -> FieldOutcome {
    if let Some(heat) = &record.heat {
        for (dst, &v) in tile.heat.iter_mut().zip(heat) {
            *dst = v.clamp(0.0, config.max_heat);
        }
    }
    if let Some(fire) = &record.fire {
        for (dst, &v) in tile.fire.iter_mut().zip(fire) {
            *dst = v.max(0.0);
        }
    }
    if let Some(molten) = &record.molten {
        for (dst, &v) in tile.molten.iter_mut().zip(molten) {
            *dst = v.clamp(0.0, config.max_molten);
        }
    }
    merge_residue(tile, record)
}

fn merge_residue(tile: &mut TileFields, record: &DeltaRecord) -> FieldOutcome {
    let mut outcome = FieldOutcome::default();
    if let Some(scorch) = &record.scorch {
        for (dst, &bit) in tile.scorch.iter_mut().zip(scorch) {
            if bit != 0 && !*dst {
                *dst = true;
                outcome.scorch_flipped = true;
            }
        }
    }
    if let Some(destroyed) = &record.destroyed {
        for (i, &bit) in destroyed.iter().enumerate().take(tile.hit_points.len()) {
            if bit != 0
                && tile.hit_points[i] > 0.0
                && tile.material[i] != Material::Indestructible
            {
                tile.hit_points[i] = 0.0;
                // An omitted fire array would otherwise leave the flame lit.
                tile.fire[i] = 0.0;
                outcome.destroyed += 1;
            }
        }
    }
    outcome
}
