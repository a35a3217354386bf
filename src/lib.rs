pub mod error;
pub mod events;
pub mod protocol;
pub mod replay;
pub mod service;
pub mod timeline;

pub use error::ReplayError;
pub use events::types::{KillEvent, PlatformKind, PlayerRef, RarityKind, WeaponInfo};
pub use events::DecodedReplay;
pub use service::{decode_replay, decode_replay_full, decode_replay_json, DecodeError};
pub use timeline::{aggregate, MatchResult};
