//! Host/peer replication of the thermal fields.
//!
//! The host emits `DeltaRecord`s for tiles that carry data; the peer applies
//! them and treats those tiles as externally authoritative. How the records
//! travel is up to the embedder.

mod codec;
mod delta;

pub use codec::DeltaCodec;
pub use delta::{decode_delta, encode_delta, round2, DeltaRecord};

use serde::{Deserialize, Serialize};

/// Which side of the session this simulation is on. A session never both
/// emits and applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetRole {
    /// Single player: no replication.
    #[default]
    Offline,
    Host,
    Peer,
}

impl NetRole {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "offline" | "local" => Some(NetRole::Offline),
            "host" => Some(NetRole::Host),
            "peer" | "client" => Some(NetRole::Peer),
            _ => None,
        }
    }

    #[inline]
    pub fn emits(self) -> bool {
        self == NetRole::Host
    }

    #[inline]
    pub fn applies(self) -> bool {
        self == NetRole::Peer
    }
}
