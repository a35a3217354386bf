//! The single entry point offered to front ends: replay bytes in, kill
//! summary (or error) out. Nothing here touches the filesystem or network.

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::error::ReplayError;
use crate::events::types::{KillEvent, MatchStats, PlatformKind, RarityKind, SkippedEvent, TeamStats};
use crate::events::{decode_events, DecodedReplay};
use crate::replay::read_container;
use crate::timeline::{aggregate, MatchResult};

/// Error categories reported across the service boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("replay file is incomplete or corrupt: {0}")]
    TruncatedInput(String),
    #[error("not a supported replay file: {0}")]
    UnsupportedFormat(String),
    #[error("replay data could not be decompressed: {0}")]
    Decompression(String),
    #[error("replay could not be decoded")]
    Corrupt,
}

impl From<ReplayError> for DecodeError {
    fn from(err: ReplayError) -> Self {
        match err {
            ReplayError::Truncated { .. } => DecodeError::TruncatedInput(err.to_string()),
            ReplayError::UnsupportedFormat(reason) => DecodeError::UnsupportedFormat(reason),
            ReplayError::Decompression(reason) => DecodeError::Decompression(reason),
            ReplayError::Malformed(reason) => {
                debug!(%reason, "replay rejected as corrupt");
                DecodeError::Corrupt
            }
        }
    }
}

pub fn decode_replay_full(bytes: &[u8]) -> Result<DecodedReplay, DecodeError> {
    let container = read_container(bytes)?;
    Ok(decode_events(&container)?)
}

pub fn decode_replay(bytes: &[u8]) -> Result<MatchResult, DecodeError> {
    let replay = decode_replay_full(bytes)?;
    Ok(aggregate(&replay.kills))
}

/// Success or `{"error": ...}`, ready to hand to any transport.
pub fn decode_replay_json(bytes: &[u8]) -> Value {
    match decode_replay(bytes) {
        Ok(result) => serde_json::to_value(MatchReport::from(&result))
            .unwrap_or_else(|err| error_json(&err.to_string())),
        Err(err) => error_json(&err.to_string()),
    }
}

pub fn error_json(message: &str) -> Value {
    json!({ "error": message })
}

fn round_meters(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KillSummary {
    pub distance: f64,
    pub killer: String,
    pub killer_platform: PlatformKind,
    pub victim: String,
    pub victim_platform: PlatformKind,
    pub weapon: String,
    pub rarity: RarityKind,
}

impl From<&KillEvent> for KillSummary {
    fn from(kill: &KillEvent) -> Self {
        KillSummary {
            distance: round_meters(kill.distance),
            killer: kill.killer.display_name.clone(),
            killer_platform: kill.killer.platform,
            victim: kill.victim.display_name.clone(),
            victim_platform: kill.victim.platform,
            weapon: kill.weapon.name.clone(),
            rarity: kill.weapon.rarity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub furthest: Option<KillSummary>,
    #[serde(rename = "final")]
    pub final_kill: Option<KillSummary>,
}

impl From<&MatchResult> for MatchReport {
    fn from(result: &MatchResult) -> Self {
        MatchReport {
            furthest: result.furthest.as_ref().map(KillSummary::from),
            final_kill: result.final_kill.as_ref().map(KillSummary::from),
        }
    }
}

/// The summary plus every decoded kill, stats and skipped events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullReport<'a> {
    #[serde(flatten)]
    pub summary: MatchReport,
    pub kills: &'a [KillEvent],
    pub match_stats: Option<&'a MatchStats>,
    pub team_stats: Option<&'a TeamStats>,
    pub skipped: &'a [SkippedEvent],
}

impl<'a> From<&'a DecodedReplay> for FullReport<'a> {
    fn from(replay: &'a DecodedReplay) -> Self {
        FullReport {
            summary: MatchReport::from(&aggregate(&replay.kills)),
            kills: &replay.kills,
            match_stats: replay.match_stats.as_ref(),
            team_stats: replay.team_stats.as_ref(),
            skipped: &replay.skipped,
        }
    }
}
