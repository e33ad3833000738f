//! Fire clusters: burning and glowing sub-cells bucketed into screen-space
//! cells so the renderer can draw one glow sprite per bucket.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::spatial::tiles::{cell_center, CELLS};

use super::HeatSim;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FireCluster {
    /// Intensity-weighted centre, world units.
    pub x: f32,
    pub y: f32,
    /// Mean intensity of the member cells.
    pub intensity: f32,
    /// Intensity-weighted blend of the member colours, RGB in `[0, 1]`.
    pub color: [f32; 3],
    pub count: u32,
}

#[derive(Default)]
struct Acc {
    wx: f32,
    wy: f32,
    weight: f32,
    color: [f32; 3],
    count: u32,
}

/// Colour of a hot or burning cell. Flames are orange-yellow; bare heat goes
/// dark red, then orange, then white.
pub fn glow_color(heat: f32, fire: f32) -> [f32; 3] {
    if fire > 0.0 {
        let f = fire.min(1.0);
        return [1.0, 0.45 + 0.35 * f, 0.1];
    }
    let h = heat.max(0.0);
    if h < 0.6 {
        [0.4 + h, 0.05, 0.0]
    } else if h < 0.95 {
        let t = (h - 0.6) / 0.35;
        [1.0, 0.3 + 0.4 * t, 0.05]
    } else {
        let t = ((h - 0.95) / 0.5).min(1.0);
        [1.0, 0.7 + 0.3 * t, 0.4 + 0.6 * t]
    }
}

pub(super) fn fire_clusters(sim: &HeatSim, cell_size: f32) -> Vec<FireCluster> {
    let cell_size = if cell_size > 0.0 { cell_size } else { sim.config.tile_size };
    let glow = sim.config.glow_threshold;
    let mut buckets: BTreeMap<(i64, i64), Acc> = BTreeMap::new();

    for key in sim.tiles.active_keys() {
        let Some(tile) = sim.tiles.get_key(key) else {
            continue;
        };
        for i in 0..CELLS {
            let (heat, fire) = (tile.heat[i], tile.fire[i]);
            if fire <= 0.0 && heat <= glow {
                continue;
            }
            let intensity = heat.max(fire.min(1.0));
            let (x, y) = cell_center(sim.config.tile_size, key, i);
            let bucket = ((x / cell_size).floor() as i64, (y / cell_size).floor() as i64);
            let acc = buckets.entry(bucket).or_default();
            let c = glow_color(heat, fire);
            acc.wx += x * intensity;
            acc.wy += y * intensity;
            acc.weight += intensity;
            for (dst, src) in acc.color.iter_mut().zip(c) {
                *dst += src * intensity;
            }
            acc.count += 1;
        }
    }

    buckets
        .into_values()
        .filter(|a| a.weight > 0.0)
        .map(|a| FireCluster {
            x: a.wx / a.weight,
            y: a.wy / a.weight,
            intensity: a.weight / a.count as f32,
            color: a.color.map(|c| c / a.weight),
            count: a.count,
        })
        .collect()
}
