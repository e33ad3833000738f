use std::collections::BTreeSet;

use crate::spatial::tiles::{Bounds, TileKey, CARDINAL};
use crate::systems::destruction::flush_events;
use crate::systems::{
    bounds_of, combustion, diffusion, molten, StepCounters, ThermalContext, WorldHooks,
};

use super::{HeatSim, PerfTimer};

pub(super) fn update(sim: &mut HeatSim, hooks: &mut dyn WorldHooks, frame_dt: f32) -> bool {
    sim.pending_dt += frame_dt.max(0.0);
    sim.ticks += 1;
    if sim.ticks % sim.config.sim_interval.max(1) as u64 != 0 {
        return false;
    }
    let dt = std::mem::replace(&mut sim.pending_dt, 0.0);
    step(sim, hooks, dt);
    true
}

pub(super) fn step(sim: &mut HeatSim, hooks: &mut dyn WorldHooks, dt: f32) {
    let perf_on = sim.perf_enabled;
    if perf_on {
        sim.perf_stats.reset();
    }
    let mut timer = perf_on.then(PerfTimer::start);

    let bounds = bounds_of(hooks);
    collect_sim_keys(sim, bounds);

    let mut counters = StepCounters {
        tiles_simulated: sim.sim_keys.len() as u32,
        ..StepCounters::default()
    };

    {
        let mut ctx = ThermalContext {
            tiles: &mut sim.tiles,
            config: &sim.config,
            bounds,
            hooks: &mut *hooks,
            events: &mut sim.events,
            counters: &mut counters,
            rng: &mut sim.rng_state,
            dt,
        };
        let keys = &sim.sim_keys;

        diffusion::diffuse(&mut ctx, &mut sim.stencil, keys);
        if let Some(t) = timer.as_mut() {
            sim.perf_stats.diffusion_ms = t.lap_ms();
        }

        combustion::burn(&mut ctx, keys, &mut sim.seeds, &mut sim.burning);
        if let Some(t) = timer.as_mut() {
            sim.perf_stats.combustion_ms = t.lap_ms();
        }

        flush_events(&mut *ctx.hooks, &mut *ctx.events);
        if let Some(t) = timer.as_mut() {
            sim.perf_stats.destruction_ms = t.lap_ms();
        }

        molten::advance(&mut ctx, &mut sim.molten, keys);
        if let Some(t) = timer.as_mut() {
            sim.perf_stats.molten_ms = t.lap_ms();
        }
    }

    let retired = sim.tiles.retire_idle();
    sim.frame += 1;

    if counters.vaporized > 0 || counters.burnouts > 0 {
        log::debug!(
            "step {}: {} tiles, {} burning, {} burned out, {} vaporized",
            sim.frame,
            counters.tiles_simulated,
            counters.burning_cells,
            counters.burnouts,
            counters.vaporized
        );
    }

    if perf_on {
        let stats = &mut sim.perf_stats;
        stats.absorb(&counters);
        stats.active_tiles = sim.tiles.active_len() as u32;
        stats.allocated_tiles = sim.tiles.tile_count() as u32;
        stats.retired_tiles = retired as u32;
        stats.molten_cells = molten::molten_cells(&sim.tiles);
        if let Some(t) = timer {
            stats.step_ms = t.elapsed_ms();
        }
    }
}

/// Active interior tiles plus their allocated cardinal neighbours, so heat
/// can cross into cold tiles. Tiles the host owns on a peer are left out.
fn collect_sim_keys(sim: &mut HeatSim, bounds: Bounds) {
    let mut keys: BTreeSet<TileKey> = BTreeSet::new();
    for key in sim.tiles.active_keys() {
        if bounds.is_boundary(key) || sim.codec.is_remote(key) {
            continue;
        }
        keys.insert(key);
        for (dx, dy) in CARDINAL {
            let Some(nkey) = key.offset(dx, dy) else {
                continue;
            };
            if sim.tiles.contains(nkey) && !bounds.is_boundary(nkey) && !sim.codec.is_remote(nkey) {
                keys.insert(nkey);
            }
        }
    }
    sim.sim_keys.clear();
    sim.sim_keys.extend(keys);
}
