//! Domain data: materials and tunable constants.

pub mod config;
pub mod materials;

pub use config::HeatConfig;
pub use materials::{Material, MaterialProps, MaterialTable};
