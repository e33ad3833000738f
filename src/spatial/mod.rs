//! Spatial storage: sparse tiles of sub-cells.

pub mod tiles;
