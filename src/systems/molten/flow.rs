//! Puddle spreading and solidification.

use crate::core::rng::shuffle;
use crate::spatial::tiles::{cell_center, resolve_neighbor, TileKey, ALL_EIGHT, CELLS};
use crate::systems::ThermalContext;

/// Spread or solidify every puddle on `keys`.
///
/// A puddle below `solidify_threshold` heat turns into a decal. Otherwise, if
/// its pressure (`molten + flow_pressure_heat * heat`) is above
/// `flow_threshold`, it pushes volume toward lower-pressure open neighbours in
/// shuffled order. Volume moves; it is never created.
pub fn flow(ctx: &mut ThermalContext, keys: &[TileKey]) {
    let cfg = ctx.config;
    let k = cfg.flow_pressure_heat;

    for &key in keys {
        for i in 0..CELLS {
            let Some(src) = ctx.tiles.get_key(key) else {
                break;
            };
            let (mut molten, heat) = (src.molten[i], src.heat[i]);
            if molten <= 0.0 || !src.is_open(i) {
                continue;
            }

            if heat < cfg.solidify_threshold {
                solidify(ctx, key, i, molten);
                continue;
            }

            if molten + k * heat <= cfg.flow_threshold {
                continue;
            }
            let rate = (cfg.flow_rate * (0.5 + heat.min(1.0)) * ctx.dt).min(1.0);

            let mut dirs = ALL_EIGHT;
            shuffle(&mut dirs, ctx.rng);
            for (dx, dy) in dirs {
                if molten <= 0.0 {
                    break;
                }
                let Some((nkey, j)) = resolve_neighbor(key, i, dx, dy) else {
                    continue;
                };
                if !ctx.accepts_heat(nkey) {
                    continue;
                }
                let (dst_molten, dst_heat) = match ctx.tiles.get_key(nkey) {
                    Some(t) if !t.is_open(j) => continue,
                    Some(t) => (t.molten[j], t.heat[j]),
                    None => (0.0, 0.0),
                };
                let diff = (molten + k * heat) - (dst_molten + k * dst_heat);
                if diff <= 0.0 {
                    continue;
                }
                let amount = (diff * rate / ALL_EIGHT.len() as f32)
                    .min(molten)
                    .min(cfg.max_molten - dst_molten);
                if amount <= 0.0 {
                    continue;
                }

                let dst = ctx.tiles.get_or_create_key(nkey);
                dst.molten[j] += amount;
                dst.heat[j] = dst.heat[j].max(heat * cfg.flow_heat_carry);
                ctx.tiles.mark_active(nkey);
                molten -= amount;
                ctx.counters.flows += 1;
            }

            if let Some(src) = ctx.tiles.get_mut(key) {
                src.molten[i] = molten.max(0.0);
            }
        }
    }
}

fn solidify(ctx: &mut ThermalContext, key: TileKey, idx: usize, molten: f32) {
    let cfg = ctx.config;
    if let Some(tile) = ctx.tiles.get_mut(key) {
        tile.molten[idx] = 0.0;
    }
    let (x, y) = cell_center(cfg.tile_size, key, idx);
    let size = cfg.sub_cell_size() * (0.5 + molten);
    ctx.hooks.add_metal_decal(x, y, size);
    ctx.notify(key);
    ctx.counters.solidified += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HeatConfig, Material};
    use crate::spatial::tiles::{Bounds, TileStore, SUB};
    use crate::systems::{ChangeLog, StepCounters};

    fn run(tiles: &mut TileStore, log: &mut ChangeLog, keys: &[TileKey], seed: u32) {
        let config = HeatConfig::default();
        let mut events = Vec::new();
        let mut counters = StepCounters::default();
        let mut rng = seed;
        let mut ctx = ThermalContext {
            tiles,
            config: &config,
            bounds: Bounds::new(16, 16),
            hooks: log,
            events: &mut events,
            counters: &mut counters,
            rng: &mut rng,
            dt: 0.1,
        };
        flow(&mut ctx, keys);
    }

    fn total_molten(tiles: &TileStore) -> f32 {
        tiles
            .keys()
            .into_iter()
            .filter_map(|k| tiles.get_key(k))
            .map(|t| t.molten.iter().sum::<f32>())
            .sum()
    }

    #[test]
    fn hot_puddle_spreads_without_creating_volume() {
        let key = TileKey::new(4, 4);
        let mut tiles = TileStore::new();
        let mut log = ChangeLog::new(16, 16);
        let c = 5 * SUB + 5;
        {
            let t = tiles.get_or_create_key(key);
            t.molten[c] = 1.0;
            t.heat[c] = 0.8;
        }

        let before = total_molten(&tiles);
        run(&mut tiles, &mut log, &[key], 11);
        let after = total_molten(&tiles);
        assert!((before - after).abs() < 1e-5);

        let t = tiles.get_key(key).unwrap();
        assert!(t.molten[c] < 1.0);
        let spread = t.molten.iter().enumerate().filter(|&(i, &m)| i != c && m > 0.0).count();
        assert!(spread > 0);
        for (i, &m) in t.molten.iter().enumerate() {
            if i != c && m > 0.0 {
                // No single destination gains more than the source lost.
                assert!(m <= 1.0 - t.molten[c] + 1e-6);
            }
        }
        for (dx, dy) in ALL_EIGHT {
            let (_, j) = resolve_neighbor(key, c, dx, dy).unwrap();
            if t.molten[j] > 0.0 {
                assert!((t.heat[j] - 0.8 * 0.9).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn puddles_never_flow_into_standing_walls() {
        let cfg = HeatConfig::default();
        let key = TileKey::new(4, 4);
        let mut tiles = TileStore::new();
        let mut log = ChangeLog::new(16, 16);
        tiles.set_material(4, 4, Material::Stone, &cfg.materials);
        let c = 5 * SUB + 5;
        {
            let t = tiles.get_or_create_key(key);
            t.hit_points[c] = 0.0;
            t.molten[c] = 1.0;
            t.heat[c] = 0.8;
        }
        run(&mut tiles, &mut log, &[key], 5);
        assert_eq!(tiles.get_key(key).unwrap().molten[c], 1.0);
    }

    #[test]
    fn cooled_puddle_becomes_a_decal() {
        let key = TileKey::new(4, 4);
        let mut tiles = TileStore::new();
        let mut log = ChangeLog::new(16, 16);
        {
            let t = tiles.get_or_create_key(key);
            t.molten[0] = 1.0;
            t.heat[0] = 0.1;
        }
        run(&mut tiles, &mut log, &[key], 1);

        assert_eq!(tiles.get_key(key).unwrap().molten[0], 0.0);
        let decals = log.take_decals();
        assert_eq!(decals.len(), 1);
        assert!((decals[0].size - 3.2 * 1.5).abs() < 1e-5);
        assert!((decals[0].x - (4.0 * 32.0 + 1.6)).abs() < 1e-4);
        assert_eq!(log.take_changed_tiles(), vec![key]);
    }

    #[test]
    fn flow_order_is_reproducible_for_a_seed() {
        let build = || {
            let mut tiles = TileStore::new();
            let t = tiles.get_or_create_key(TileKey::new(4, 4));
            t.molten[44] = 2.0;
            t.heat[44] = 1.0;
            tiles
        };
        let mut a = build();
        let mut b = build();
        let mut log = ChangeLog::new(16, 16);
        run(&mut a, &mut log, &[TileKey::new(4, 4)], 99);
        run(&mut b, &mut log, &[TileKey::new(4, 4)], 99);
        assert_eq!(a.get(4, 4), b.get(4, 4));
    }
}
