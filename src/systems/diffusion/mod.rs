//! Diffusion & decay pass.
//!
//! Heat is blended toward the 4-neighbour average and then decayed. The new
//! values are computed from committed heat into `StencilScratch` and copied
//! back tile by tile, where the per-cell side effects (scorch, white heat,
//! vaporization, ignition) are applied.

mod stencil;

pub use stencil::StencilScratch;

use crate::spatial::tiles::{TileKey, CELLS};

use super::{combustion, destruction, DestroyCause, DestroyEvent, ThermalContext};

/// Advance heat on `keys`. Keys must be interior tiles; callers filter the
/// boundary ring before building the list.
pub fn diffuse(ctx: &mut ThermalContext, scratch: &mut StencilScratch, keys: &[TileKey]) {
    if keys.is_empty() {
        return;
    }
    let next = scratch.prepare(keys.len());
    stencil::compute(ctx.tiles, ctx.bounds, ctx.config, ctx.dt, keys, next);

    for (&key, heat) in keys.iter().zip(next.iter()) {
        commit_tile(ctx, key, heat);
    }
}

fn commit_tile(ctx: &mut ThermalContext, key: TileKey, next: &[f32; CELLS]) {
    let cfg = ctx.config;
    let dt = ctx.dt;
    let Some(tile) = ctx.tiles.get_mut(key) else {
        return;
    };

    let mut scorched = false;
    for i in 0..CELLS {
        let h = next[i];
        if h > 0.0 || tile.heat[i] > 0.0 {
            ctx.counters.cells_diffused += 1;
        }
        tile.heat[i] = h;

        if h > cfg.scorch_threshold && tile.material[i].is_solid() && !tile.scorch[i] {
            tile.scorch[i] = true;
            scorched = true;
            ctx.counters.scorched += 1;
        }

        if h > cfg.white_heat_threshold && tile.hit_points[i] > 0.0 {
            tile.white_heat[i] += dt;
            let limit = cfg.materials.vaporize_time(tile.material[i]);
            if limit.is_some_and(|t| tile.white_heat[i] >= t)
                && destruction::vaporize_cell(tile, i, cfg)
            {
                ctx.events.push(DestroyEvent { key, idx: i, cause: DestroyCause::Vaporized });
                ctx.counters.vaporized += 1;
                continue;
            }
        } else {
            tile.white_heat[i] = (tile.white_heat[i] - dt).max(0.0);
        }

        if combustion::try_ignite(tile, i, cfg) {
            ctx.counters.ignitions += 1;
        }
    }

    let active = tile.has_activity();
    if active {
        ctx.tiles.mark_active(key);
    }
    if scorched {
        ctx.notify(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HeatConfig, Material};
    use crate::spatial::tiles::{Bounds, TileStore, SUB};
    use crate::systems::{ChangeLog, StepCounters};

    struct Harness {
        tiles: TileStore,
        config: HeatConfig,
        log: ChangeLog,
        events: Vec<DestroyEvent>,
        counters: StepCounters,
        rng: u32,
        scratch: StencilScratch,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                tiles: TileStore::new(),
                config: HeatConfig::default(),
                log: ChangeLog::new(16, 16),
                events: Vec::new(),
                counters: StepCounters::default(),
                rng: 1,
                scratch: StencilScratch::new(),
            }
        }

        fn run(&mut self, keys: &[TileKey], dt: f32) {
            let mut ctx = ThermalContext {
                tiles: &mut self.tiles,
                config: &self.config,
                bounds: Bounds::new(16, 16),
                hooks: &mut self.log,
                events: &mut self.events,
                counters: &mut self.counters,
                rng: &mut self.rng,
                dt,
            };
            diffuse(&mut ctx, &mut self.scratch, keys);
        }
    }

    #[test]
    fn heat_spreads_into_a_cold_halo_tile_and_activates_it() {
        let mut h = Harness::new();
        let hot = TileKey::new(4, 4);
        let halo = TileKey::new(5, 4);
        h.tiles.get_or_create_key(hot).heat[3 * SUB + SUB - 1] = 1.0;
        h.tiles.get_or_create_key(halo);

        h.run(&[hot, halo], 0.1);

        assert!(h.tiles.heat_at(halo, 3 * SUB) > 0.0);
        assert!(h.tiles.is_active(halo));
        assert_eq!(h.scratch.capacity(), 2);
    }

    #[test]
    fn hot_solid_cells_are_scorched_once() {
        let mut h = Harness::new();
        let key = TileKey::new(4, 4);
        h.tiles.set_material(4, 4, Material::Stone, &h.config.materials.clone());
        h.tiles.get_or_create_key(key).heat = [0.9; CELLS];

        h.run(&[key], 0.1);
        assert!(h.tiles.get_key(key).unwrap().scorch.iter().all(|&s| s));
        assert_eq!(h.log.take_changed_tiles(), vec![key]);

        h.run(&[key], 0.1);
        assert!(h.log.take_changed_tiles().is_empty());
    }

    #[test]
    fn white_heat_timer_rises_then_bleeds_off() {
        let mut h = Harness::new();
        let key = TileKey::new(4, 4);
        h.tiles.set_material(4, 4, Material::Stone, &h.config.materials.clone());
        h.tiles.get_or_create_key(key).heat = [1.5; CELLS];

        h.run(&[key], 0.5);
        let t = h.tiles.get_key(key).unwrap().white_heat[55];
        assert!((t - 0.5).abs() < 1e-6);

        h.tiles.get_or_create_key(key).heat = [0.0; CELLS];
        h.run(&[key], 0.2);
        let t = h.tiles.get_key(key).unwrap().white_heat[55];
        assert!((t - 0.3).abs() < 1e-6);
    }

    #[test]
    fn sustained_white_heat_vaporizes_metal_into_a_puddle() {
        let mut h = Harness::new();
        let key = TileKey::new(4, 4);
        h.tiles.set_material(4, 4, Material::Metal, &h.config.materials.clone());
        {
            let tile = h.tiles.get_or_create_key(key);
            tile.heat = [1.5; CELLS];
            tile.white_heat = [2.95; CELLS];
        }

        h.run(&[key], 0.1);

        let tile = h.tiles.get_key(key).unwrap();
        assert_eq!(tile.hit_points[55], 0.0);
        assert_eq!(tile.molten[55], 1.0);
        assert_eq!(tile.heat[55], h.config.vaporize_residual_heat);
        assert_eq!(h.events.len(), CELLS);
        assert!(h.events.iter().all(|e| e.cause == DestroyCause::Vaporized));
    }

    #[test]
    fn crossing_ignition_threshold_lights_wood() {
        let mut h = Harness::new();
        let key = TileKey::new(4, 4);
        h.tiles.set_material(4, 4, Material::Wood, &h.config.materials.clone());
        h.tiles.get_or_create_key(key).heat = [0.8; CELLS];

        h.run(&[key], 0.1);

        let tile = h.tiles.get_key(key).unwrap();
        assert!(tile.fire.iter().all(|&f| f > 0.0));
        assert_eq!(h.counters.ignitions, CELLS as u32);
    }
}
