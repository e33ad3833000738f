use thiserror::Error;

use crate::net::NetRole;

/// Errors surfaced by the few fallible entry points (config and wire payloads).
/// The per-tick simulation itself never fails.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid config JSON: {0}")]
    ConfigJson(#[source] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("malformed delta payload: {0}")]
    DeltaJson(#[source] serde_json::Error),

    #[error("delta payload must be a JSON array of records")]
    DeltaNotArray,

    #[error("{op} is not permitted in role {role:?}")]
    RoleMismatch { op: &'static str, role: NetRole },
}

pub type SimResult<T> = Result<T, SimError>;
