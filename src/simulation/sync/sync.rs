use crate::error::{SimError, SimResult};
use crate::net::{decode_delta, encode_delta, DeltaRecord, NetRole};
use crate::systems::WorldHooks;

use super::HeatSim;

fn require(sim: &HeatSim, op: &'static str, wanted: NetRole) -> SimResult<()> {
    if sim.role == wanted {
        Ok(())
    } else {
        Err(SimError::RoleMismatch { op, role: sim.role })
    }
}

pub(super) fn get_delta_state(sim: &mut HeatSim) -> SimResult<Vec<DeltaRecord>> {
    require(sim, "get_delta_state", NetRole::Host)?;
    let records = sim.codec.emit(&sim.tiles, &sim.config);
    log::trace!("emitting {} delta records", records.len());
    Ok(records)
}

pub(super) fn apply_delta_state(
    sim: &mut HeatSim,
    hooks: &mut dyn WorldHooks,
    records: &[DeltaRecord],
) -> SimResult<usize> {
    require(sim, "apply_delta_state", NetRole::Peer)?;
    Ok(sim.codec.apply(&mut sim.tiles, records, hooks, &sim.config))
}

pub(super) fn get_delta_json(sim: &mut HeatSim) -> SimResult<String> {
    let records = get_delta_state(sim)?;
    encode_delta(&records)
}

pub(super) fn apply_delta_json(
    sim: &mut HeatSim,
    hooks: &mut dyn WorldHooks,
    json: &str,
) -> SimResult<usize> {
    require(sim, "apply_delta_state", NetRole::Peer)?;
    let records = decode_delta(json)?;
    apply_delta_state(sim, hooks, &records)
}
