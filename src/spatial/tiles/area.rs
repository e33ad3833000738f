//! World-space helpers: point to sub-cell, and radius sweeps over sub-cells.

use super::{TileKey, SUB};

/// One sub-cell visited by `for_each_cell_in_radius`.
#[derive(Clone, Copy, Debug)]
pub struct CellHit {
    pub key: TileKey,
    pub idx: usize,
    /// Offset of the sub-cell centre from the sweep centre, world units.
    pub dx: f32,
    pub dy: f32,
    pub dist: f32,
}

/// Sub-cell containing a world point, or `None` outside the non-negative quadrant.
pub fn world_to_cell(tile_size: f32, wx: f32, wy: f32) -> Option<(TileKey, usize)> {
    if !(wx >= 0.0 && wy >= 0.0) {
        return None;
    }
    let tx = (wx / tile_size).floor();
    let ty = (wy / tile_size).floor();
    if tx > TileKey::MAX_COORD as f32 || ty > TileKey::MAX_COORD as f32 {
        return None;
    }
    let sub = tile_size / SUB as f32;
    let sx = (((wx - tx * tile_size) / sub) as usize).min(SUB - 1);
    let sy = (((wy - ty * tile_size) / sub) as usize).min(SUB - 1);
    Some((TileKey::new(tx as u32, ty as u32), sy * SUB + sx))
}

/// Visit every sub-cell whose centre lies within `reach` of `(cx, cy)`.
/// Cells are visited whether or not their tile is allocated.
pub fn for_each_cell_in_radius<F>(tile_size: f32, cx: f32, cy: f32, reach: f32, mut f: F)
where
    F: FnMut(CellHit),
{
    if reach < 0.0 {
        return;
    }
    let sub = tile_size / SUB as f32;
    let max_cell = ((TileKey::MAX_COORD as i64 + 1) * SUB as i64) - 1;

    let min_gx = (((cx - reach) / sub).floor() as i64).max(0);
    let min_gy = (((cy - reach) / sub).floor() as i64).max(0);
    let max_gx = (((cx + reach) / sub).floor() as i64).min(max_cell);
    let max_gy = (((cy + reach) / sub).floor() as i64).min(max_cell);
    let reach2 = reach * reach;

    for gy in min_gy..=max_gy {
        for gx in min_gx..=max_gx {
            let px = (gx as f32 + 0.5) * sub;
            let py = (gy as f32 + 0.5) * sub;
            let dx = px - cx;
            let dy = py - cy;
            let d2 = dx * dx + dy * dy;
            if d2 > reach2 {
                continue;
            }
            let key = TileKey::new((gx / SUB as i64) as u32, (gy / SUB as i64) as u32);
            let idx = (gy % SUB as i64) as usize * SUB + (gx % SUB as i64) as usize;
            f(CellHit { key, idx, dx, dy, dist: d2.sqrt() });
        }
    }
}

/// World-space centre of a sub-cell.
#[inline]
pub fn cell_center(tile_size: f32, key: TileKey, idx: usize) -> (f32, f32) {
    let sub = tile_size / SUB as f32;
    let x = key.tx() as f32 * tile_size + ((idx % SUB) as f32 + 0.5) * sub;
    let y = key.ty() as f32 * tile_size + ((idx / SUB) as f32 + 0.5) * sub;
    (x, y)
}
