//! Game events carried in `Event` chunks.
//!
//! Only the groups needed for kill statistics are decoded; every other group
//! is passed over. A single event that fails to decode is recorded as a
//! [`SkippedEvent`] and never aborts the replay.

pub mod elimination;
pub mod stats;
pub mod tags;
pub mod types;

use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::protocol::{self, types::NetworkHeader};
use crate::replay::decoder::decode_event;
use crate::replay::types::{ReplayContainer, ReplayEvent, ReplayInfo};
use elimination::{decode_elimination, EliminationLayout};
use types::*;

pub const ELIMINATION_GROUP: &str = "playerElims";
pub const MATCH_STATS_GROUP: &str = "AthenaMatchStats";
pub const TEAM_STATS_GROUP: &str = "AthenaMatchTeamStats";

/// Everything extracted from one replay.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedReplay {
    pub info: ReplayInfo,
    pub header: Option<NetworkHeader>,
    /// In order of occurrence.
    pub kills: Vec<KillEvent>,
    pub match_stats: Option<MatchStats>,
    pub team_stats: Option<TeamStats>,
    pub skipped: Vec<SkippedEvent>,
}

impl DecodedReplay {
    fn apply(&mut self, event: &ReplayEvent, layout: EliminationLayout) -> Result<()> {
        match event.group.as_str() {
            ELIMINATION_GROUP => {
                let kill = decode_elimination(&event.data, layout, event.start_time_ms)?;
                self.kills.push(kill);
            }
            MATCH_STATS_GROUP => {
                self.match_stats = Some(stats::decode_match_stats(&event.data)?);
            }
            TEAM_STATS_GROUP => {
                self.team_stats = Some(stats::decode_team_stats(&event.data)?);
            }
            other => trace!(group = other, id = %event.id, "ignoring event group"),
        }
        Ok(())
    }

    fn skip(&mut self, skipped: SkippedEvent) {
        warn!(
            id = %skipped.id,
            group = %skipped.group,
            start_time_ms = skipped.start_time_ms,
            reason = %skipped.reason,
            "skipping undecodable event"
        );
        self.skipped.push(skipped);
    }
}

/// Decodes the header and every `Event` chunk of `container`.
///
/// Fails only when the `Header` chunk itself cannot be read.
pub fn decode_events(container: &ReplayContainer) -> Result<DecodedReplay> {
    let header = container
        .header_chunk()
        .map(|chunk| protocol::decode_header(&chunk.payload))
        .transpose()?;
    let layout = EliminationLayout::for_header(header.as_ref());
    debug!(?layout, branch = ?header.as_ref().map(|h| h.branch.as_str()), "decoding events");

    let mut replay = DecodedReplay {
        info: container.info.clone(),
        header,
        kills: Vec::new(),
        match_stats: None,
        team_stats: None,
        skipped: Vec::new(),
    };

    for chunk in container.event_chunks() {
        let event = match decode_event(&chunk.payload, &container.info) {
            Ok(event) => event,
            Err(err) => {
                replay.skip(SkippedEvent {
                    id: String::new(),
                    group: String::new(),
                    start_time_ms: 0,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        if let Err(err) = replay.apply(&event, layout) {
            replay.skip(SkippedEvent {
                id: event.id,
                group: event.group,
                start_time_ms: event.start_time_ms,
                reason: err.to_string(),
            });
        }
    }
    debug!(
        kills = replay.kills.len(),
        skipped = replay.skipped.len(),
        "decoded events"
    );

    Ok(replay)
}
