//! Hot metal walls weep into adjacent open space.

use crate::spatial::tiles::{resolve_neighbor, TileKey, ALL_EIGHT, CELLS};
use crate::domain::Material;
use crate::systems::ThermalContext;

/// One pending deposit, gathered from committed state before any is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeakTransfer {
    pub key: TileKey,
    pub idx: usize,
    pub amount: f32,
    pub heat: f32,
}

/// Every standing metal cell above the leak threshold deposits
/// `leak_rate * (heat - leak_base) * dt` into each open 8-neighbour.
/// Absent interior tiles count as open and are allocated on first deposit.
pub fn leak(ctx: &mut ThermalContext, transfers: &mut Vec<LeakTransfer>, keys: &[TileKey]) {
    let cfg = ctx.config;
    transfers.clear();

    for &key in keys {
        let Some(tile) = ctx.tiles.get_key(key) else {
            continue;
        };
        for i in 0..CELLS {
            let heat = tile.heat[i];
            if tile.material[i] != Material::Metal
                || tile.hit_points[i] <= 0.0
                || heat <= cfg.leak_threshold
            {
                continue;
            }
            let amount = cfg.leak_rate * (heat - cfg.leak_base) * ctx.dt;
            if amount <= 0.0 {
                continue;
            }
            for (dx, dy) in ALL_EIGHT {
                let Some((nkey, j)) = resolve_neighbor(key, i, dx, dy) else {
                    continue;
                };
                if !ctx.accepts_heat(nkey) {
                    continue;
                }
                let open = if nkey == key {
                    tile.is_open(j)
                } else {
                    ctx.tiles.get_key(nkey).map_or(true, |t| t.is_open(j))
                };
                if open {
                    transfers.push(LeakTransfer { key: nkey, idx: j, amount, heat });
                }
            }
        }
    }

    for t in transfers.iter() {
        let dst = ctx.tiles.get_or_create_key(t.key);
        dst.molten[t.idx] = (dst.molten[t.idx] + t.amount).min(cfg.max_molten);
        dst.heat[t.idx] = dst.heat[t.idx].max(t.heat).min(cfg.max_heat);
        ctx.tiles.mark_active(t.key);
    }
    ctx.counters.leaks += transfers.len() as u32;
}
