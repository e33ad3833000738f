//! Core utilities with no simulation knowledge.

pub mod rng;
