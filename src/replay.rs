pub mod buffer;
pub mod crypto;
pub mod decoder;
pub mod types;
pub mod writer;

use buffer::ReplayBuffer;
use decoder::Decoder;
use tracing::debug;
use types::*;

use crate::error::Result;

/// Reads the file preamble and every chunk, in file order, until the end of `data`.
pub fn read_container(data: &[u8]) -> Result<ReplayContainer> {
    let mut decoder = Decoder::new(ReplayBuffer::new(data));
    let info = decoder.decode_info()?;
    debug!(
        file_version = info.file_version,
        length_in_ms = info.length_in_ms,
        is_compressed = info.is_compressed,
        "read replay info"
    );

    let mut chunks = Vec::new();
    while !decoder.done() {
        chunks.push(decoder.decode_chunk(&info)?);
    }
    debug!(chunks = chunks.len(), bytes = data.len(), "read replay container");

    Ok(ReplayContainer { info, chunks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReplayError;
    use writer::{encode_container, encode_event};

    fn container() -> ReplayContainer {
        let event = encode_event(&ReplayEvent {
            id: String::from("e"),
            group: String::from("playerElims"),
            metadata: String::new(),
            start_time_ms: 0,
            end_time_ms: 0,
            data: vec![0; 8],
        });
        ReplayContainer {
            info: ReplayInfo {
                file_version: decoder::LATEST_FILE_VERSION,
                custom_versions: Vec::new(),
                length_in_ms: 1000,
                network_version: 2,
                changelist: 1,
                friendly_name: String::from("Replay"),
                is_live: false,
                timestamp: Some(0),
                is_compressed: true,
                is_encrypted: false,
                encryption_key: Vec::new(),
            },
            chunks: vec![
                Chunk {
                    kind: ChunkKind::ReplayData,
                    size: 0,
                    payload: vec![1; 100],
                },
                Chunk {
                    kind: ChunkKind::Event,
                    size: event.len() as u32,
                    payload: event,
                },
            ],
        }
    }

    #[test]
    fn it_reads_container_with_no_error() {
        let bytes = encode_container(&container()).unwrap();
        let replay = read_container(&bytes).unwrap();
        assert_eq!(replay.chunks.len(), 2);
        assert_eq!(replay.event_chunks().count(), 1);
        assert!(replay.header_chunk().is_none());
        assert_eq!(replay.chunks[0].payload, vec![1; 100]);
    }

    #[test]
    fn it_reads_preamble_only_file() {
        let mut empty = container();
        empty.chunks.clear();
        let replay = read_container(&encode_container(&empty).unwrap()).unwrap();
        assert!(replay.chunks.is_empty());
    }

    #[test]
    fn it_reports_truncation_inside_any_chunk() {
        let bytes = encode_container(&container()).unwrap();
        let event_len = container().chunks[1].payload.len();
        // cut inside the last chunk body and inside its frame header
        for cut in [bytes.len() - 1, bytes.len() - event_len - 3] {
            assert!(matches!(
                read_container(&bytes[..cut]),
                Err(ReplayError::Truncated { .. })
            ));
        }
    }

    #[test]
    fn it_rejects_empty_input() {
        assert!(matches!(
            read_container(&[]),
            Err(ReplayError::Truncated { .. })
        ));
    }
}
