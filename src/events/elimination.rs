//! `playerElims` event records.
//!
//! Seasons 9 and later write both players as typed references followed by the
//! death tags, distance and time of the elimination. Older seasons only carry
//! the two player names.

use super::types::{KillEvent, PlatformKind, PlayerRef, WeaponInfo};
use crate::error::{ReplayError, Result};
use crate::protocol::types::NetworkHeader;
use crate::replay::buffer::{to_hex, ReplayBuffer};
use crate::replay::writer::ReplayWriter;

/// Replay distances are stored in Unreal units (centimeters).
pub const UNREAL_UNITS_PER_METER: f64 = 100.0;

pub const BOT_DISPLAY_NAME: &str = "Bot";

const FIRST_MODERN_SEASON: u16 = 9;

const PLAYER_BOT: u8 = 0x03;
const PLAYER_NAMED: u8 = 0x10;
const PLAYER_ACCOUNT: u8 = 0x11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationLayout {
    Legacy,
    Modern,
}

impl EliminationLayout {
    /// Picks the layout from the season in the header's branch; anything
    /// without a parsable release branch is treated as current.
    pub fn for_header(header: Option<&NetworkHeader>) -> Self {
        match header.and_then(|h| h.branch_version()) {
            Some(version) if version.major < FIRST_MODERN_SEASON => EliminationLayout::Legacy,
            _ => EliminationLayout::Modern,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawPlayer {
    Bot,
    Named { name: String, platform: String },
    Account { id: Vec<u8>, name: String, platform: String },
}

impl RawPlayer {
    fn read(buffer: &mut ReplayBuffer) -> Result<Self> {
        match buffer.read_u8()? {
            PLAYER_BOT => Ok(RawPlayer::Bot),
            PLAYER_NAMED => Ok(RawPlayer::Named {
                name: buffer.read_fstring()?,
                platform: buffer.read_fstring()?,
            }),
            PLAYER_ACCOUNT => {
                let id_len = buffer.read_u8()? as usize;
                let id = buffer.read_bytes(id_len)?.to_vec();
                Ok(RawPlayer::Account {
                    id,
                    name: buffer.read_fstring()?,
                    platform: buffer.read_fstring()?,
                })
            }
            other => Err(ReplayError::Malformed(format!(
                "unknown player reference kind {other:#04x}"
            ))),
        }
    }

    fn write(&self, writer: &mut ReplayWriter) -> Result<()> {
        match self {
            RawPlayer::Bot => {
                writer.write_u8(PLAYER_BOT);
            }
            RawPlayer::Named { name, platform } => {
                writer
                    .write_u8(PLAYER_NAMED)
                    .write_fstring(name)
                    .write_fstring(platform);
            }
            RawPlayer::Account { id, name, platform } => {
                let id_len = u8::try_from(id.len()).map_err(|_| {
                    ReplayError::Malformed(format!(
                        "account id of {} bytes does not fit a one-byte length",
                        id.len()
                    ))
                })?;
                writer
                    .write_u8(PLAYER_ACCOUNT)
                    .write_u8(id_len)
                    .write_bytes(id)
                    .write_fstring(name)
                    .write_fstring(platform);
            }
        }
        Ok(())
    }

    /// Resolves the display name and platform; `None` when the reference names nobody.
    pub fn resolve(&self) -> Option<PlayerRef> {
        let (display_name, platform) = match self {
            RawPlayer::Bot => (BOT_DISPLAY_NAME.to_string(), PlatformKind::Unknown),
            RawPlayer::Named { name, platform } => (name.clone(), PlatformKind::from_code(platform)),
            RawPlayer::Account { id, name, platform } => {
                let display_name = if name.is_empty() { to_hex(id) } else { name.clone() };
                (display_name, PlatformKind::from_code(platform))
            }
        };
        (!display_name.is_empty()).then_some(PlayerRef {
            display_name,
            platform,
        })
    }
}

/// An elimination exactly as recorded, before lookups are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct EliminationRecord {
    pub killer: RawPlayer,
    pub victim: RawPlayer,
    pub death_tags: Vec<String>,
    pub gun_type: u8,
    pub knocked: bool,
    pub distance_cm: f32,
    pub time_ms: u32,
}

impl EliminationRecord {
    pub fn read(data: &[u8], layout: EliminationLayout, event_time_ms: u32) -> Result<Self> {
        let mut buffer = ReplayBuffer::new(data);
        match layout {
            EliminationLayout::Modern => Ok(EliminationRecord {
                killer: RawPlayer::read(&mut buffer)?,
                victim: RawPlayer::read(&mut buffer)?,
                death_tags: buffer.read_array(|b| b.read_fstring())?,
                gun_type: buffer.read_u8()?,
                knocked: buffer.read_u32_bool()?,
                distance_cm: buffer.read_f32()?,
                time_ms: buffer.read_u32()?,
            }),
            EliminationLayout::Legacy => {
                let killer = buffer.read_fstring()?;
                let victim = buffer.read_fstring()?;
                Ok(EliminationRecord {
                    killer: RawPlayer::Named {
                        name: killer,
                        platform: String::new(),
                    },
                    victim: RawPlayer::Named {
                        name: victim,
                        platform: String::new(),
                    },
                    death_tags: Vec::new(),
                    gun_type: buffer.read_u8()?,
                    knocked: buffer.read_u32_bool()?,
                    distance_cm: 0.0,
                    time_ms: event_time_ms,
                })
            }
        }
    }

    pub fn write(&self, layout: EliminationLayout) -> Result<Vec<u8>> {
        let mut writer = ReplayWriter::new();
        match layout {
            EliminationLayout::Modern => {
                self.killer.write(&mut writer)?;
                self.victim.write(&mut writer)?;
                writer
                    .write_array(&self.death_tags, |w, tag| {
                        w.write_fstring(tag);
                    })
                    .write_u8(self.gun_type)
                    .write_u32_bool(self.knocked)
                    .write_f32(self.distance_cm)
                    .write_u32(self.time_ms);
            }
            EliminationLayout::Legacy => {
                writer
                    .write_fstring(legacy_name(&self.killer))
                    .write_fstring(legacy_name(&self.victim))
                    .write_u8(self.gun_type)
                    .write_u32_bool(self.knocked);
            }
        }
        Ok(writer.into_bytes())
    }

    pub fn to_kill_event(&self) -> Result<KillEvent> {
        if !self.distance_cm.is_finite() || self.distance_cm < 0.0 {
            return Err(ReplayError::Malformed(format!(
                "invalid elimination distance {}",
                self.distance_cm
            )));
        }
        let killer = self
            .killer
            .resolve()
            .ok_or_else(|| ReplayError::Malformed("elimination without killer".to_string()))?;
        let victim = self
            .victim
            .resolve()
            .ok_or_else(|| ReplayError::Malformed("elimination without victim".to_string()))?;

        Ok(KillEvent {
            killer,
            victim,
            distance: f64::from(self.distance_cm) / UNREAL_UNITS_PER_METER,
            weapon: WeaponInfo::from_death_tags(&self.death_tags),
            timestamp: f64::from(self.time_ms) / 1000.0,
            knocked: self.knocked,
        })
    }
}

fn legacy_name(player: &RawPlayer) -> &str {
    match player {
        RawPlayer::Bot => BOT_DISPLAY_NAME,
        RawPlayer::Named { name, .. } | RawPlayer::Account { name, .. } => name,
    }
}

/// Decodes one `playerElims` payload into a [`KillEvent`].
pub fn decode_elimination(
    data: &[u8],
    layout: EliminationLayout,
    event_time_ms: u32,
) -> Result<KillEvent> {
    EliminationRecord::read(data, layout, event_time_ms)?.to_kill_event()
}
