use crate::domain::HeatConfig;
use crate::error::{SimError, SimResult};
use crate::net::NetRole;

use super::perf_stats::StepStats;
use super::HeatSim;

pub(super) fn set_role(sim: &mut HeatSim, role: NetRole) {
    if sim.role != role {
        log::debug!("net role {:?} -> {:?}", sim.role, role);
        sim.codec.reset();
    }
    sim.role = role;
}

pub(super) fn set_sim_interval(sim: &mut HeatSim, frames: u32) -> SimResult<()> {
    if frames == 0 {
        return Err(SimError::InvalidConfig("sim_interval must be at least 1".to_string()));
    }
    sim.config.sim_interval = frames;
    Ok(())
}

pub(super) fn set_config(sim: &mut HeatSim, config: HeatConfig) -> SimResult<()> {
    config.validate()?;
    sim.config = config;
    Ok(())
}

pub(super) fn set_seed(sim: &mut HeatSim, seed: u32) {
    sim.rng_state = seed;
}

pub(super) fn enable_perf_metrics(sim: &mut HeatSim, enabled: bool) {
    sim.perf_enabled = enabled;
    if !enabled {
        sim.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats(sim: &HeatSim) -> StepStats {
    sim.perf_stats.clone()
}
