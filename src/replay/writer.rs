use super::crypto;
use super::decoder::{FILE_MAGIC, LATEST_FILE_VERSION};
use super::types::*;
use crate::error::{ReplayError, Result};

const COMPRESSION_LEVEL: i32 = 3;

/// Little-endian byte sink mirroring the reads of [`ReplayBuffer`](super::buffer::ReplayBuffer).
#[derive(Debug, Default, Clone)]
pub struct ReplayWriter {
    bytes: Vec<u8>,
}

impl ReplayWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn write_u8(&mut self, v: u8) -> &mut Self {
        self.bytes.push(v);
        self
    }

    pub fn write_u16(&mut self, v: u16) -> &mut Self {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_u32(&mut self, v: u32) -> &mut Self {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_i32(&mut self, v: i32) -> &mut Self {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_i64(&mut self, v: i64) -> &mut Self {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_f32(&mut self, v: f32) -> &mut Self {
        self.write_bytes(&v.to_le_bytes())
    }

    pub fn write_u32_bool(&mut self, v: bool) -> &mut Self {
        self.write_u32(u32::from(v))
    }

    /// ASCII strings are written as single-byte units, anything else as UTF-16.
    pub fn write_fstring(&mut self, s: &str) -> &mut Self {
        if s.is_empty() {
            return self.write_i32(0);
        }
        if s.is_ascii() {
            self.write_i32(s.len() as i32 + 1)
                .write_bytes(s.as_bytes())
                .write_u8(0)
        } else {
            let units: Vec<u16> = s.encode_utf16().chain(std::iter::once(0)).collect();
            self.write_i32(-(units.len() as i32));
            for unit in units {
                self.write_u16(unit);
            }
            self
        }
    }

    pub fn write_array<T>(&mut self, items: &[T], mut write: impl FnMut(&mut Self, &T)) -> &mut Self {
        self.write_u32(items.len() as u32);
        for item in items {
            write(self, item);
        }
        self
    }
}

/// Compresses `data` into a block that [`inflate`](super::decoder::inflate) accepts.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let compressed = zstd::bulk::compress(data, COMPRESSION_LEVEL)
        .map_err(|e| ReplayError::Decompression(e.to_string()))?;
    let mut block = ReplayWriter::new();
    block
        .write_i32(data.len() as i32)
        .write_i32(compressed.len() as i32)
        .write_bytes(&compressed);
    Ok(block.into_bytes())
}

pub fn encode_event(event: &ReplayEvent) -> Vec<u8> {
    let mut writer = ReplayWriter::new();
    writer
        .write_fstring(&event.id)
        .write_fstring(&event.group)
        .write_fstring(&event.metadata)
        .write_u32(event.start_time_ms)
        .write_u32(event.end_time_ms)
        .write_u32(event.data.len() as u32)
        .write_bytes(&event.data);
    writer.into_bytes()
}

/// Like [`encode_event`], with the event data encrypted under `key`.
pub fn encode_encrypted_event(event: &ReplayEvent, key: &[u8]) -> Result<Vec<u8>> {
    Ok(encode_event(&ReplayEvent {
        data: crypto::encrypt(key, &event.data)?,
        ..event.clone()
    }))
}

fn encode_info(writer: &mut ReplayWriter, info: &ReplayInfo) {
    writer
        .write_u32(FILE_MAGIC)
        .write_u32(LATEST_FILE_VERSION)
        .write_array(&info.custom_versions, |w, custom| {
            w.write_bytes(&custom.guid).write_i32(custom.version);
        })
        .write_u32(info.length_in_ms)
        .write_u32(info.network_version)
        .write_u32(info.changelist)
        .write_fstring(&info.friendly_name)
        .write_u32_bool(info.is_live)
        .write_i64(info.timestamp.unwrap_or_default())
        .write_u32_bool(info.is_compressed)
        .write_u32_bool(info.is_encrypted)
        .write_u32(info.encryption_key.len() as u32)
        .write_bytes(&info.encryption_key);
}

/// Re-serializes a container in the latest file version.
///
/// `ReplayData` payloads are re-framed with zeroed stream times, then compressed
/// and encrypted when the container is; every other payload is written
/// verbatim, so event data must already be sealed (see
/// [`encode_encrypted_event`]). Declared chunk sizes are recomputed.
pub fn encode_container(container: &ReplayContainer) -> Result<Vec<u8>> {
    let info = &container.info;
    let mut writer = ReplayWriter::new();
    encode_info(&mut writer, info);

    for chunk in &container.chunks {
        let body = match chunk.kind {
            ChunkKind::ReplayData => {
                let mut data = if info.is_compressed {
                    deflate(&chunk.payload)?
                } else {
                    chunk.payload.clone()
                };
                if info.is_encrypted {
                    data = crypto::encrypt(&info.encryption_key, &data)?;
                }
                let mut body = ReplayWriter::new();
                body.write_u32(0)
                    .write_u32(0)
                    .write_u32(data.len() as u32)
                    .write_bytes(&data);
                body.into_bytes()
            }
            _ => chunk.payload.clone(),
        };
        writer
            .write_u32(chunk.kind.tag())
            .write_i32(body.len() as i32)
            .write_bytes(&body);
    }

    Ok(writer.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::{decoder::decode_event, read_container};

    fn info(is_compressed: bool) -> ReplayInfo {
        ReplayInfo {
            file_version: LATEST_FILE_VERSION,
            custom_versions: Vec::new(),
            length_in_ms: 600_000,
            network_version: 2,
            changelist: 31_000_000,
            friendly_name: String::from("Unsaved Replay"),
            is_live: false,
            timestamp: Some(638_000_000_000_000_000),
            is_compressed,
            is_encrypted: false,
            encryption_key: Vec::new(),
        }
    }

    fn chunks() -> Vec<Chunk> {
        let event = encode_event(&ReplayEvent {
            id: String::from("kill-1"),
            group: String::from("playerElims"),
            metadata: String::from("versionedEvent"),
            start_time_ms: 95_000,
            end_time_ms: 95_000,
            data: vec![1, 2, 3],
        });
        vec![
            Chunk {
                kind: ChunkKind::Header,
                size: 4,
                payload: vec![0, 1, 2, 3],
            },
            Chunk {
                kind: ChunkKind::ReplayData,
                size: 0,
                payload: b"bunches bunches bunches bunches".to_vec(),
            },
            Chunk {
                kind: ChunkKind::Event,
                size: event.len() as u32,
                payload: event,
            },
            Chunk {
                kind: ChunkKind::Unknown(7),
                size: 1,
                payload: vec![0xee],
            },
        ]
    }

    #[test]
    fn it_round_trips_encrypted_containers() {
        let key: Vec<u8> = (0u8..32).rev().collect();
        let mut info = info(true);
        info.is_encrypted = true;
        info.encryption_key = key.clone();
        info.custom_versions = vec![CustomVersion {
            guid: [9; 16],
            version: 3,
        }];
        let event = ReplayEvent {
            id: String::from("kill-1"),
            group: String::from("playerElims"),
            metadata: String::new(),
            start_time_ms: 95_000,
            end_time_ms: 95_000,
            data: vec![1, 2, 3],
        };
        let sealed = encode_encrypted_event(&event, &key).unwrap();
        let original = ReplayContainer {
            info: info.clone(),
            chunks: vec![
                Chunk {
                    kind: ChunkKind::ReplayData,
                    size: 0,
                    payload: b"bunches bunches bunches".to_vec(),
                },
                Chunk {
                    kind: ChunkKind::Event,
                    size: sealed.len() as u32,
                    payload: sealed,
                },
            ],
        };

        let decoded = read_container(&encode_container(&original).unwrap()).unwrap();
        assert_eq!(decoded.info, info);
        assert_eq!(decoded.chunks[0].payload, original.chunks[0].payload);
        assert_eq!(decode_event(&decoded.chunks[1].payload, &info).unwrap(), event);
        assert_ne!(
            decode_event(&decoded.chunks[1].payload, &self::info(true)).unwrap().data,
            event.data
        );
    }

    #[test]
    fn it_refuses_encrypted_container_without_key() {
        let mut info = info(false);
        info.is_encrypted = true;
        let container = ReplayContainer {
            info,
            chunks: chunks(),
        };
        assert!(matches!(
            encode_container(&container),
            Err(ReplayError::Malformed(_))
        ));
    }

    #[test]
    fn it_writes_ascii_and_utf16_fstrings() {
        let mut writer = ReplayWriter::new();
        writer.write_fstring("ab").write_fstring("é").write_fstring("");
        assert_eq!(
            writer.into_bytes(),
            vec![3, 0, 0, 0, b'a', b'b', 0, 0xfe, 0xff, 0xff, 0xff, 0xe9, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn it_round_trips_event_framing() {
        let event = ReplayEvent {
            id: String::from("Æ-1"),
            group: String::from("AthenaMatchStats"),
            metadata: String::new(),
            start_time_ms: 1,
            end_time_ms: 2,
            data: vec![9; 40],
        };
        assert_eq!(event, decode_event(&encode_event(&event), &info(false)).unwrap());
    }

    #[test]
    fn it_reencodes_decoded_containers_to_the_same_chunks() {
        for is_compressed in [false, true] {
            let original = ReplayContainer {
                info: info(is_compressed),
                chunks: chunks(),
            };
            let decoded = read_container(&encode_container(&original).unwrap()).unwrap();
            let reencoded = read_container(&encode_container(&decoded).unwrap()).unwrap();

            assert_eq!(decoded, reencoded);
            assert_eq!(decoded.info, original.info);
            let kinds: Vec<ChunkKind> = decoded.chunks.iter().map(|c| c.kind).collect();
            assert_eq!(
                kinds,
                [
                    ChunkKind::Header,
                    ChunkKind::ReplayData,
                    ChunkKind::Event,
                    ChunkKind::Unknown(7)
                ]
            );
            assert_eq!(decoded.chunks[1].payload, original.chunks[1].payload);
        }
    }
}
