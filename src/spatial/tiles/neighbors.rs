//! The single neighbour-lookup helper.
//!
//! Diffusion, fire spread, leaking and flow all step from a sub-cell to a
//! neighbour through `resolve_neighbor`, so the tile-boundary arithmetic lives
//! in exactly one place.

use super::{TileKey, SUB};

/// Up, down, left, right.
pub const CARDINAL: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Cardinal directions followed by the diagonals.
pub const ALL_EIGHT: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Step `(dx, dy)` sub-cells from `idx` in tile `key`.
///
/// Steps that leave `[0, SUB)` carry into the adjacent tile and wrap the
/// sub-index. Returns `None` when the target tile would have a negative or
/// unrepresentable coordinate.
#[inline]
pub fn resolve_neighbor(key: TileKey, idx: usize, dx: i32, dy: i32) -> Option<(TileKey, usize)> {
    let s = SUB as i32;
    let x = (idx % SUB) as i32 + dx;
    let y = (idx / SUB) as i32 + dy;

    if (0..s).contains(&x) && (0..s).contains(&y) {
        return Some((key, (y * s + x) as usize));
    }

    let tx = key.tx() as i64 + x.div_euclid(s) as i64;
    let ty = key.ty() as i64 + y.div_euclid(s) as i64;
    let max = TileKey::MAX_COORD as i64;
    if tx < 0 || ty < 0 || tx > max || ty > max {
        return None;
    }

    let nx = x.rem_euclid(s);
    let ny = y.rem_euclid(s);
    Some((TileKey::new(tx as u32, ty as u32), (ny * s + nx) as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(x: usize, y: usize) -> usize {
        y * SUB + x
    }

    #[test]
    fn interior_steps_stay_in_tile() {
        let key = TileKey::new(5, 5);
        assert_eq!(resolve_neighbor(key, idx(4, 4), 1, 0), Some((key, idx(5, 4))));
        assert_eq!(resolve_neighbor(key, idx(4, 4), 0, -1), Some((key, idx(4, 3))));
        assert_eq!(resolve_neighbor(key, idx(4, 4), -1, 1), Some((key, idx(3, 5))));
    }

    #[test]
    fn edges_wrap_into_adjacent_tiles() {
        let key = TileKey::new(5, 5);
        assert_eq!(
            resolve_neighbor(key, idx(0, 3), -1, 0),
            Some((TileKey::new(4, 5), idx(SUB - 1, 3)))
        );
        assert_eq!(
            resolve_neighbor(key, idx(SUB - 1, 3), 1, 0),
            Some((TileKey::new(6, 5), idx(0, 3)))
        );
        assert_eq!(
            resolve_neighbor(key, idx(2, 0), 0, -1),
            Some((TileKey::new(5, 4), idx(2, SUB - 1)))
        );
        assert_eq!(
            resolve_neighbor(key, idx(2, SUB - 1), 0, 1),
            Some((TileKey::new(5, 6), idx(2, 0)))
        );
    }

    #[test]
    fn corner_diagonal_reaches_the_diagonal_tile() {
        let key = TileKey::new(5, 5);
        assert_eq!(
            resolve_neighbor(key, idx(SUB - 1, SUB - 1), 1, 1),
            Some((TileKey::new(6, 6), idx(0, 0)))
        );
        assert_eq!(
            resolve_neighbor(key, idx(0, 0), -1, -1),
            Some((TileKey::new(4, 4), idx(SUB - 1, SUB - 1)))
        );
    }

    #[test]
    fn negative_tiles_are_rejected() {
        let key = TileKey::new(0, 0);
        assert_eq!(resolve_neighbor(key, idx(0, 4), -1, 0), None);
        assert_eq!(resolve_neighbor(key, idx(4, 0), 0, -1), None);
        assert!(resolve_neighbor(key, idx(4, 4), 0, -1).is_some());
    }

    #[test]
    fn every_neighbour_is_a_valid_index() {
        let key = TileKey::new(3, 3);
        for i in 0..SUB * SUB {
            for (dx, dy) in ALL_EIGHT {
                let (_, j) = resolve_neighbor(key, i, dx, dy).expect("interior tile");
                assert!(j < SUB * SUB);
            }
        }
    }
}
