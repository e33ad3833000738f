use std::f32::consts::TAU;

use heatmap_engine::net::{decode_delta, encode_delta};
use heatmap_engine::{ChangeLog, HeatSim, Material, NetRole, TileKey, CELLS};

fn stone_world(sim: &mut HeatSim, w: u32, h: u32) {
    for ty in 0..h {
        for tx in 0..w {
            sim.set_material(tx, ty, Material::Stone);
        }
    }
}

#[test]
fn irregular_crater_is_not_a_circle() {
    let mut sim = HeatSim::default();
    let mut world = ChangeLog::new(16, 16);
    stone_world(&mut sim, 16, 16);
    let (cx, cy, r) = (256.0, 256.0, 20.0);

    assert!(sim.destroy_area(&mut world, cx, cy, r, true) > 0);

    let mut destroyed = 0;
    let mut intact = 0;
    for i in 0..32 {
        let a = i as f32 * TAU / 32.0;
        if sim.is_destroyed(cx + r * a.cos(), cy + r * a.sin()) {
            destroyed += 1;
        } else {
            intact += 1;
        }
    }
    assert!(destroyed > 0 && intact > 0, "destroyed={destroyed} intact={intact}");

    // A round crater of the same size is symmetric: opposite samples agree.
    let mut round = HeatSim::default();
    stone_world(&mut round, 16, 16);
    round.destroy_area(&mut world, cx, cy, r, false);
    for (dx, dy) in [(r - 4.0, 0.0), (0.0, r - 4.0)] {
        assert!(round.is_destroyed(cx + dx, cy + dy));
        assert!(round.is_destroyed(cx - dx, cy - dy));
    }
    assert!(!round.is_destroyed(cx + r + 4.0, cy));
}

#[test]
fn host_and_peer_carve_the_same_crater() {
    let mut a = HeatSim::default();
    let mut b = HeatSim::default();
    let mut world = ChangeLog::new(16, 16);
    stone_world(&mut a, 16, 16);
    stone_world(&mut b, 16, 16);
    a.destroy_area(&mut world, 200.5, 180.25, 24.0, true);
    b.destroy_area(&mut world, 200.5, 180.25, 24.0, true);
    for key in a.tiles().keys() {
        assert_eq!(a.tiles().get_key(key), b.tiles().get_key(key));
    }
}

#[test]
fn delta_round_trip_reproduces_the_host_fields() {
    let mut host = HeatSim::default();
    let mut peer = HeatSim::default();
    let mut host_world = ChangeLog::new(16, 16);
    let mut peer_world = ChangeLog::new(16, 16);
    host.set_role(NetRole::Host);
    peer.set_role(NetRole::Peer);

    for sim in [&mut host, &mut peer] {
        for ty in 4..8 {
            sim.set_material(4, ty, Material::Metal);
            sim.set_material(5, ty, Material::Wood);
            sim.set_material(6, ty, Material::Brick);
        }
    }

    let ts = host.config().tile_size;
    host.destroy_area(&mut host_world, 4.5 * ts, 5.5 * ts, 8.0, false);
    host.add_heat(&host_world, 4.5 * ts, 5.5 * ts, 28.0, 1.2);
    host.add_heat(&host_world, 5.5 * ts, 6.5 * ts, 20.0, 1.0);
    for _ in 0..10 {
        host.step(&mut host_world, 0.1);
    }

    let json = host.get_delta_json().unwrap();
    let records = decode_delta(&json).unwrap();
    assert!(!records.is_empty());
    assert_eq!(peer.apply_delta_state(&mut peer_world, &records).unwrap(), records.len());

    let mut saw = [false; 4];
    for record in &records {
        let key = record.key().unwrap();
        let h = host.tiles().get_key(key).unwrap();
        let p = peer.tiles().get_key(key).unwrap();
        for i in 0..CELLS {
            assert!((h.heat[i] - p.heat[i]).abs() <= 0.01);
            assert!((h.fire[i] - p.fire[i]).abs() <= 0.01);
            assert!((h.molten[i] - p.molten[i]).abs() <= 0.01);
            assert_eq!(h.scorch[i], p.scorch[i]);
            assert_eq!(h.hit_points[i] <= 0.0, p.hit_points[i] <= 0.0);
            saw[0] |= h.heat[i] > 0.01;
            saw[1] |= h.fire[i] > 0.01;
            saw[2] |= h.molten[i] > 0.01;
            saw[3] |= h.scorch[i];
        }
    }
    assert_eq!(saw, [true; 4], "heat, fire, molten and scorch should all be replicated");
    assert!(!peer_world.take_changed_tiles().is_empty());
}

#[test]
fn quiet_tiles_are_omitted_and_cleared_exactly_once() {
    let mut host = HeatSim::default();
    let mut world = ChangeLog::new(16, 16);
    host.set_role(NetRole::Host);
    host.set_material(3, 3, Material::Stone);
    host.set_material(8, 8, Material::Stone);
    let ts = host.config().tile_size;

    // Below epsilon everywhere: active, but never sent.
    host.add_heat(&world, 3.5 * ts, 3.5 * ts, 1.0, 0.005);
    assert_eq!(host.active_tiles(), 1);
    assert!(host.get_delta_state().unwrap().is_empty());

    host.add_heat(&world, 8.5 * ts, 8.5 * ts, 1.0, 0.4);
    let first = host.get_delta_state().unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].key(), Some(TileKey::new(8, 8)));

    let mut clears = 0;
    for _ in 0..30 {
        host.step(&mut world, 0.5);
        let records = host.get_delta_state().unwrap();
        clears += records.iter().filter(|r| r.is_clear()).count();
        assert!(records.iter().all(|r| r.key() != Some(TileKey::new(3, 3))));
    }
    assert_eq!(clears, 1);
}

#[test]
fn clear_record_wipes_peer_state() {
    let mut peer = HeatSim::default();
    let mut world = ChangeLog::new(16, 16);
    peer.set_role(NetRole::Peer);
    peer.set_material(4, 4, Material::Stone);

    let payload = format!(
        r#"[{{"tileKey":[4,4],"heat":[{}]}}]"#,
        vec!["0.8"; CELLS].join(",")
    );
    peer.apply_delta_json(&mut world, &payload).unwrap();
    assert_eq!(peer.active_tiles(), 1);

    let clear = encode_delta(&[heatmap_engine::DeltaRecord::clear(TileKey::new(4, 4))]).unwrap();
    peer.apply_delta_json(&mut world, &clear).unwrap();
    assert_eq!(peer.active_tiles(), 0);
    assert!(peer.tiles().get(4, 4).unwrap().heat.iter().all(|&h| h == 0.0));
    assert!(world.take_changed_tiles().contains(&TileKey::new(4, 4)));
}

#[test]
fn host_burn_out_reaches_the_peer() {
    let mut host = HeatSim::default();
    let mut peer = HeatSim::default();
    let mut host_world = ChangeLog::new(16, 16);
    let mut peer_world = ChangeLog::new(16, 16);
    host.set_role(NetRole::Host);
    peer.set_role(NetRole::Peer);
    for sim in [&mut host, &mut peer] {
        sim.set_material(5, 5, Material::Stone);
        sim.set_cell_material(5, 5, 55, Material::Wood);
    }

    let ts = host.config().tile_size;
    let sub = ts / 10.0;
    let (x, y) = (5.0 * ts + 5.5 * sub, 5.0 * ts + 5.5 * sub);
    host.add_heat(&host_world, x, y, 1.0, 1.0);
    assert!(host.is_burning(x, y));

    for _ in 0..60 {
        host.step(&mut host_world, 0.1);
        let records = host.get_delta_state().unwrap();
        peer.apply_delta_state(&mut peer_world, &records).unwrap();
    }
    assert!(host.is_destroyed(x, y));
    assert!(peer.is_destroyed(x, y));
    assert!(!peer.is_burning(x, y));
    assert!(peer_world.take_destruction_checks().contains(&TileKey::new(5, 5)));
}
