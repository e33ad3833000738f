//! Simulation passes, run in a fixed order each step:
//! diffusion & decay -> combustion -> destruction -> molten flow.

pub mod combustion;
pub mod destruction;
pub mod diffusion;
pub mod hooks;
pub mod molten;

pub use hooks::{bounds_of, ChangeLog, MetalDecal, WorldHooks};

use crate::domain::HeatConfig;
use crate::spatial::tiles::{Bounds, TileKey, TileStore};

/// What removed a sub-cell's last hit point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestroyCause {
    Impact,
    Burnout,
    Vaporized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DestroyEvent {
    pub key: TileKey,
    pub idx: usize,
    pub cause: DestroyCause,
}

/// Per-step tallies; folded into `StepStats` when perf metrics are on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepCounters {
    pub tiles_simulated: u32,
    pub cells_diffused: u32,
    pub scorched: u32,
    pub ignitions: u32,
    pub burning_cells: u32,
    pub burnouts: u32,
    pub vaporized: u32,
    pub leaks: u32,
    pub flows: u32,
    pub solidified: u32,
}

/// Everything a pass may touch, borrowed for one step.
pub struct ThermalContext<'a> {
    pub tiles: &'a mut TileStore,
    pub config: &'a HeatConfig,
    pub bounds: Bounds,
    pub hooks: &'a mut dyn WorldHooks,
    pub events: &'a mut Vec<DestroyEvent>,
    pub counters: &'a mut StepCounters,
    pub rng: &'a mut u32,
    pub dt: f32,
}

impl<'a> ThermalContext<'a> {
    #[inline]
    pub fn notify(&mut self, key: TileKey) {
        self.hooks.notify_tile_change(key.tx(), key.ty());
    }

    /// A heat-carrying write may only land on an interior tile.
    #[inline]
    pub fn accepts_heat(&self, key: TileKey) -> bool {
        !self.bounds.is_boundary(key)
    }
}
