use crate::events::types::KillEvent;

/// The two kills reported for a match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchResult {
    pub furthest: Option<KillEvent>,
    pub final_kill: Option<KillEvent>,
}

/// Picks the furthest and the final kill in one pass over `kills`.
///
/// Furthest: largest distance, then earliest timestamp, then first seen.
/// Final: latest timestamp, then last seen.
pub fn aggregate(kills: &[KillEvent]) -> MatchResult {
    let mut furthest: Option<&KillEvent> = None;
    let mut final_kill: Option<&KillEvent> = None;

    for kill in kills {
        let further = furthest.map_or(true, |best| {
            kill.distance > best.distance
                || (kill.distance == best.distance && kill.timestamp < best.timestamp)
        });
        if further {
            furthest = Some(kill);
        }
        if final_kill.map_or(true, |last| kill.timestamp >= last.timestamp) {
            final_kill = Some(kill);
        }
    }

    MatchResult {
        furthest: furthest.cloned(),
        final_kill: final_kill.cloned(),
    }
}
