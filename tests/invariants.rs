//! Randomised session checked against the field invariants after every step.

use heatmap_engine::core::rng::xorshift32;
use heatmap_engine::{ChangeLog, HeatSim, Material, TileKey, TileStore, CELLS};

const W: u32 = 12;
const H: u32 = 12;

fn snapshot(tiles: &TileStore) -> Vec<(TileKey, Vec<f32>, Vec<bool>)> {
    tiles
        .keys()
        .into_iter()
        .filter_map(|k| tiles.get_key(k).map(|t| (k, t.hit_points.to_vec(), t.scorch.to_vec())))
        .collect()
}

#[test]
fn fields_stay_in_range_through_a_busy_session() {
    let mut sim = HeatSim::default();
    let mut world = ChangeLog::new(W, H);
    let materials = [Material::Wood, Material::Brick, Material::Stone, Material::Metal, Material::Indestructible];
    let mut rng = 0xC0FF_EE11u32;
    for ty in 0..H {
        for tx in 0..W {
            sim.set_material(tx, ty, materials[(xorshift32(&mut rng) % 5) as usize]);
        }
    }
    let span = W as f32 * sim.config().tile_size;
    let max_heat = sim.config().max_heat;
    let max_molten = sim.config().max_molten;

    let mut prev = snapshot(sim.tiles());
    for round in 0..120 {
        let x = (xorshift32(&mut rng) % 1000) as f32 / 1000.0 * span;
        let y = (xorshift32(&mut rng) % 1000) as f32 / 1000.0 * span;
        match round % 4 {
            0 => sim.add_heat(&world, x, y, 30.0, 2.0),
            1 => {
                sim.ignite_area(&world, x, y, 20.0);
            }
            2 if round % 12 == 2 => {
                sim.destroy_area(&mut world, x, y, 18.0, round % 8 == 2);
            }
            _ => {}
        }
        sim.step(&mut world, 0.1);

        let tiles = sim.tiles();
        for key in tiles.keys() {
            let t = tiles.get_key(key).unwrap();
            let boundary = key.tx() == 0 || key.ty() == 0 || key.tx() == W - 1 || key.ty() == H - 1;
            for i in 0..CELLS {
                assert!(t.heat[i] >= 0.0 && t.heat[i] <= max_heat);
                assert!(t.hit_points[i] >= 0.0);
                assert!(t.molten[i] >= 0.0 && t.molten[i] <= max_molten + 1e-5);
                assert!(t.fire[i] >= 0.0);
                if t.fire[i] > 0.0 {
                    assert!(t.hit_points[i] > 0.0, "flame on a dead cell in {key:?}");
                }
                if t.material[i] == Material::Indestructible {
                    assert!(t.hit_points[i] > 0.0);
                }
                if t.molten[i] > 0.0 {
                    assert!(t.hit_points[i] <= 0.0, "puddle inside a standing wall");
                }
                if boundary {
                    assert_eq!(t.heat[i], 0.0, "heat on boundary tile {key:?}");
                    assert_eq!(t.fire[i], 0.0, "fire on boundary tile {key:?}");
                }
            }
        }

        let next = snapshot(tiles);
        for (key, hp, scorch) in &prev {
            let (_, now_hp, now_scorch) = next.iter().find(|(k, _, _)| k == key).unwrap();
            for i in 0..CELLS {
                assert!(now_hp[i] <= hp[i], "hit points rose on {key:?}");
                if scorch[i] {
                    assert!(now_scorch[i], "scorch cleared on {key:?}");
                }
            }
        }
        prev = next;
    }
}
