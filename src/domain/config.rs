//! Tunable simulation constants.
//!
//! Every threshold the passes use lives here and is handed to `HeatSim` at
//! construction. The defaults are the tuned "feel" values; only their relative
//! ordering is checked by `validate`.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::spatial::tiles::SUB;

use super::materials::MaterialTable;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatConfig {
    /// World units covered by one tile edge.
    pub tile_size: f32,

    // === Diffusion & decay ===
    /// Fraction of the gap to the 4-neighbour average closed each step.
    pub spread_rate: f32,
    /// Heat lost per second, subtracted after blending.
    pub decay_rate: f32,
    pub max_heat: f32,
    pub scorch_threshold: f32,
    pub white_heat_threshold: f32,
    pub vaporize_residual_heat: f32,

    // === Combustion ===
    pub ignition_threshold: f32,
    pub ignite_intensity: f32,
    pub fire_growth_rate: f32,
    pub fire_heat_feedback: f32,
    pub burn_damage_rate: f32,
    pub fire_spread_threshold: f32,
    pub fire_seed_intensity: f32,

    // === Destruction ===
    /// Width of the scorched ring around a crater, in sub-cells.
    pub scorch_border_cells: f32,
    /// Relative amplitude of the irregular crater edge.
    pub crater_jaggedness: f32,

    // === Molten metal ===
    pub vaporize_molten: f32,
    pub max_molten: f32,
    pub leak_threshold: f32,
    pub leak_base: f32,
    pub leak_rate: f32,
    pub flow_threshold: f32,
    pub flow_pressure_heat: f32,
    pub flow_rate: f32,
    pub flow_heat_carry: f32,
    pub solidify_threshold: f32,

    // === Replication / rendering ===
    pub delta_epsilon: f32,
    pub glow_threshold: f32,

    /// Run a simulation step every Nth `update` call.
    pub sim_interval: u32,

    pub materials: MaterialTable,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            tile_size: 32.0,

            spread_rate: 0.2,
            decay_rate: 0.15,
            max_heat: 2.0,
            scorch_threshold: 0.5,
            white_heat_threshold: 0.95,
            vaporize_residual_heat: 0.5,

            ignition_threshold: 0.6,
            ignite_intensity: 0.1,
            fire_growth_rate: 0.5,
            fire_heat_feedback: 0.2,
            burn_damage_rate: 10.0,
            fire_spread_threshold: 0.3,
            fire_seed_intensity: 0.05,

            scorch_border_cells: 2.0,
            crater_jaggedness: 0.25,

            vaporize_molten: 1.0,
            max_molten: 2.0,
            leak_threshold: 0.5,
            leak_base: 0.4,
            leak_rate: 0.5,
            flow_threshold: 0.3,
            flow_pressure_heat: 0.5,
            flow_rate: 2.0,
            flow_heat_carry: 0.9,
            solidify_threshold: 0.2,

            delta_epsilon: 0.01,
            glow_threshold: 0.3,

            sim_interval: 3,

            materials: MaterialTable::default(),
        }
    }
}

impl HeatConfig {
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: HeatConfig = serde_json::from_str(json).map_err(SimError::ConfigJson)?;
        config.validate()?;
        Ok(config)
    }

    /// World units covered by one sub-cell edge.
    #[inline]
    pub fn sub_cell_size(&self) -> f32 {
        self.tile_size / SUB as f32
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.tile_size > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "tile_size must be positive, got {}",
                self.tile_size
            )));
        }
        if !(0.0..=1.0).contains(&self.spread_rate) {
            return Err(SimError::InvalidConfig(format!(
                "spread_rate must be within [0, 1], got {}",
                self.spread_rate
            )));
        }
        if self.decay_rate < 0.0 || self.max_heat <= 0.0 || self.max_molten <= 0.0 {
            return Err(SimError::InvalidConfig(
                "decay_rate must be non-negative and max_heat/max_molten positive".to_string(),
            ));
        }
        if self.materials.indestructible.hit_points == 0 {
            return Err(SimError::InvalidConfig(
                "indestructible hit_points must be positive".to_string(),
            ));
        }
        if self.sim_interval == 0 {
            return Err(SimError::InvalidConfig("sim_interval must be at least 1".to_string()));
        }

        // epsilon < solidify < spread < ignition < white heat <= max heat
        let ladder = [
            ("delta_epsilon", self.delta_epsilon),
            ("solidify_threshold", self.solidify_threshold),
            ("fire_spread_threshold", self.fire_spread_threshold),
            ("ignition_threshold", self.ignition_threshold),
            ("white_heat_threshold", self.white_heat_threshold),
        ];
        for pair in ladder.windows(2) {
            let (lo_name, lo) = pair[0];
            let (hi_name, hi) = pair[1];
            if lo >= hi {
                return Err(SimError::InvalidConfig(format!(
                    "{lo_name} ({lo}) must be below {hi_name} ({hi})"
                )));
            }
        }
        if self.white_heat_threshold > self.max_heat {
            return Err(SimError::InvalidConfig(format!(
                "white_heat_threshold ({}) exceeds max_heat ({})",
                self.white_heat_threshold, self.max_heat
            )));
        }
        Ok(())
    }
}
