pub mod parsers;
pub mod types;

use crate::error::Result;
use crate::replay::buffer::ReplayBuffer;
use crate::replay::writer::ReplayWriter;
use types::{EngineVersion, LevelName, NetworkHeader};

pub const NETWORK_MAGIC: u32 = 0x2CF5_A13D;

const HISTORY_HEADER_FLAGS: u32 = 9;
const HISTORY_SAVE_FULL_ENGINE_VERSION: u32 = 11;
const HISTORY_HEADER_GUID: u32 = 12;

pub fn decode_header(payload: &[u8]) -> Result<NetworkHeader> {
    let mut buffer = ReplayBuffer::new(payload);
    buffer.expect_magic(NETWORK_MAGIC, "network header")?;
    let network_version = buffer.read_u32()?;
    let network_checksum = buffer.read_u32()?;
    let engine_network_version = buffer.read_u32()?;
    let game_network_protocol = buffer.read_u32()?;

    let guid = if network_version >= HISTORY_HEADER_GUID {
        Some(buffer.read_guid()?)
    } else {
        None
    };

    let (engine_version, changelist, branch) =
        if network_version >= HISTORY_SAVE_FULL_ENGINE_VERSION {
            let engine_version = EngineVersion {
                major: buffer.read_u16()?,
                minor: buffer.read_u16()?,
                patch: buffer.read_u16()?,
            };
            let changelist = buffer.read_u32()?;
            let branch = buffer.read_fstring()?;
            (Some(engine_version), changelist, branch)
        } else {
            (None, buffer.read_u32()?, String::new())
        };

    let levels = buffer.read_array(|b| {
        Ok(LevelName {
            name: b.read_fstring()?,
            time_ms: b.read_u32()?,
        })
    })?;
    let flags = if network_version >= HISTORY_HEADER_FLAGS {
        buffer.read_u32()?
    } else {
        0
    };
    let game_specific_data = buffer.read_array(|b| b.read_fstring())?;

    Ok(NetworkHeader {
        network_version,
        network_checksum,
        engine_network_version,
        game_network_protocol,
        guid,
        engine_version,
        changelist,
        branch,
        levels,
        flags,
        game_specific_data,
    })
}

pub fn encode_header(header: &NetworkHeader) -> Vec<u8> {
    let mut writer = ReplayWriter::new();
    writer
        .write_u32(NETWORK_MAGIC)
        .write_u32(header.network_version)
        .write_u32(header.network_checksum)
        .write_u32(header.engine_network_version)
        .write_u32(header.game_network_protocol);
    if header.network_version >= HISTORY_HEADER_GUID {
        writer.write_bytes(&header.guid.unwrap_or_default());
    }
    if header.network_version >= HISTORY_SAVE_FULL_ENGINE_VERSION {
        let version = header.engine_version.unwrap_or(EngineVersion {
            major: 0,
            minor: 0,
            patch: 0,
        });
        writer
            .write_u16(version.major)
            .write_u16(version.minor)
            .write_u16(version.patch)
            .write_u32(header.changelist)
            .write_fstring(&header.branch);
    } else {
        writer.write_u32(header.changelist);
    }
    writer.write_array(&header.levels, |w, level| {
        w.write_fstring(&level.name).write_u32(level.time_ms);
    });
    if header.network_version >= HISTORY_HEADER_FLAGS {
        writer.write_u32(header.flags);
    }
    writer.write_array(&header.game_specific_data, |w, data| {
        w.write_fstring(data);
    });
    writer.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReplayError;
    use types::BranchVersion;

    fn header(network_version: u32, branch: &str) -> NetworkHeader {
        NetworkHeader {
            network_version,
            network_checksum: 0xdead_beef,
            engine_network_version: 30,
            game_network_protocol: 0,
            guid: (network_version >= HISTORY_HEADER_GUID).then_some([7; 16]),
            engine_version: (network_version >= HISTORY_SAVE_FULL_ENGINE_VERSION).then_some(
                EngineVersion {
                    major: 5,
                    minor: 3,
                    patch: 0,
                },
            ),
            changelist: 32_116_959,
            branch: if network_version >= HISTORY_SAVE_FULL_ENGINE_VERSION {
                branch.to_string()
            } else {
                String::new()
            },
            levels: vec![LevelName {
                name: String::from("/Game/Athena/Maps/Athena_Terrain"),
                time_ms: 0,
            }],
            flags: if network_version >= HISTORY_HEADER_FLAGS { 3 } else { 0 },
            game_specific_data: vec![String::from("SubGame=Athena")],
        }
    }

    #[test]
    fn it_decodes_header_with_no_error() {
        let expected = header(17, "++Fortnite+Release-28.10-CL-32116959");
        let decoded = decode_header(&encode_header(&expected)).unwrap();
        assert_eq!(decoded, expected);
        assert_eq!(
            decoded.branch_version(),
            Some(BranchVersion {
                major: 28,
                minor: 10,
                changelist: Some(32116959)
            })
        );
    }

    #[test]
    fn it_decodes_headers_across_network_versions() {
        for network_version in [2, 9, 11, 12] {
            let expected = header(network_version, "++Fortnite+Release-8.51");
            assert_eq!(decode_header(&encode_header(&expected)).unwrap(), expected);
        }
    }

    #[test]
    fn it_has_no_branch_version_before_full_engine_version() {
        let decoded = decode_header(&encode_header(&header(10, ""))).unwrap();
        assert_eq!(decoded.branch_version(), None);
    }

    #[test]
    fn it_rejects_bad_header_magic() {
        let data: [u8; 8] = [0, 0, 0, 0, 17, 0, 0, 0];
        assert!(matches!(
            decode_header(&data),
            Err(ReplayError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn it_reports_truncated_header() {
        let bytes = encode_header(&header(17, "++Fortnite+Release-28.10"));
        assert!(matches!(
            decode_header(&bytes[..bytes.len() - 2]),
            Err(ReplayError::Truncated { .. })
        ));
    }
}
