use super::elimination::UNREAL_UNITS_PER_METER;
use super::types::{MatchStats, TeamStats};
use crate::error::Result;
use crate::replay::buffer::ReplayBuffer;
use crate::replay::writer::ReplayWriter;

pub fn decode_match_stats(data: &[u8]) -> Result<MatchStats> {
    let mut buffer = ReplayBuffer::new(data);
    buffer.skip_bytes(4)?;

    Ok(MatchStats {
        accuracy: buffer.read_f32()?,
        assists: buffer.read_u32()?,
        eliminations: buffer.read_u32()?,
        weapon_damage: buffer.read_u32()?,
        other_damage: buffer.read_u32()?,
        revives: buffer.read_u32()?,
        damage_taken: buffer.read_u32()?,
        damage_to_structures: buffer.read_u32()?,
        materials_gathered: buffer.read_u32()?,
        materials_used: buffer.read_u32()?,
        total_traveled_m: f64::from(buffer.read_u32()?) / UNREAL_UNITS_PER_METER,
    })
}

pub fn encode_match_stats(stats: &MatchStats) -> Vec<u8> {
    let mut writer = ReplayWriter::new();
    writer
        .write_u32(0)
        .write_f32(stats.accuracy)
        .write_u32(stats.assists)
        .write_u32(stats.eliminations)
        .write_u32(stats.weapon_damage)
        .write_u32(stats.other_damage)
        .write_u32(stats.revives)
        .write_u32(stats.damage_taken)
        .write_u32(stats.damage_to_structures)
        .write_u32(stats.materials_gathered)
        .write_u32(stats.materials_used)
        .write_u32((stats.total_traveled_m * UNREAL_UNITS_PER_METER).round() as u32);
    writer.into_bytes()
}

pub fn decode_team_stats(data: &[u8]) -> Result<TeamStats> {
    let mut buffer = ReplayBuffer::new(data);
    buffer.skip_bytes(4)?;

    Ok(TeamStats {
        position: buffer.read_u32()?,
        total_players: buffer.read_u32()?,
    })
}

pub fn encode_team_stats(stats: &TeamStats) -> Vec<u8> {
    let mut writer = ReplayWriter::new();
    writer
        .write_u32(0)
        .write_u32(stats.position)
        .write_u32(stats.total_players);
    writer.into_bytes()
}
