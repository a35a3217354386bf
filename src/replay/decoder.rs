use std::borrow::Cow;
use std::io::Read;

use tracing::debug;

use super::buffer::ReplayBuffer;
use super::crypto;
use super::types::*;
use crate::error::{ReplayError, Result};

pub const FILE_MAGIC: u32 = 0x1CA2_E27F;
pub const MIN_FILE_VERSION: u32 = 2;
pub const LATEST_FILE_VERSION: u32 = 7;

/// Upper bounds on what a single compressed block may inflate to.
pub const MAX_INFLATE_RATIO: usize = 1024;
pub const MAX_INFLATED_BLOCK: usize = 256 * 1024 * 1024;

const HISTORY_RECORDED_TIMESTAMP: u32 = 3;
const HISTORY_STREAM_CHUNK_TIMES: u32 = 4;
const HISTORY_ENCRYPTION: u32 = 6;
const HISTORY_CUSTOM_VERSIONS: u32 = 7;

pub struct Decoder<'a> {
    buffer: ReplayBuffer<'a>,
}

impl<'a> Decoder<'a> {
    pub fn new(buffer: ReplayBuffer<'a>) -> Self {
        Self { buffer }
    }

    pub fn done(&self) -> bool {
        self.buffer.done()
    }

    pub fn position(&self) -> usize {
        self.buffer.position()
    }

    pub fn decode_info(&mut self) -> Result<ReplayInfo> {
        self.buffer.expect_magic(FILE_MAGIC, "file")?;
        let file_version = self.buffer.read_u32()?;
        if !(MIN_FILE_VERSION..=LATEST_FILE_VERSION).contains(&file_version) {
            return Err(ReplayError::UnsupportedFormat(format!(
                "file version {file_version} outside {MIN_FILE_VERSION}..={LATEST_FILE_VERSION}"
            )));
        }

        let custom_versions = if file_version >= HISTORY_CUSTOM_VERSIONS {
            self.buffer.read_array(|b| {
                Ok(CustomVersion {
                    guid: b.read_guid()?,
                    version: b.read_i32()?,
                })
            })?
        } else {
            Vec::new()
        };

        let length_in_ms = self.buffer.read_u32()?;
        let network_version = self.buffer.read_u32()?;
        let changelist = self.buffer.read_u32()?;
        let friendly_name = self.buffer.read_fstring()?;
        let is_live = self.buffer.read_u32_bool()?;
        let timestamp = if file_version >= HISTORY_RECORDED_TIMESTAMP {
            Some(self.buffer.read_i64()?)
        } else {
            None
        };
        let is_compressed = self.buffer.read_u32_bool()?;
        let (is_encrypted, encryption_key) = if file_version >= HISTORY_ENCRYPTION {
            let is_encrypted = self.buffer.read_u32_bool()?;
            let key_len = self.buffer.read_u32()? as usize;
            (is_encrypted, self.buffer.read_bytes(key_len)?.to_vec())
        } else {
            (false, Vec::new())
        };
        if is_encrypted && encryption_key.len() != crypto::KEY_LEN {
            return Err(ReplayError::Malformed(format!(
                "encrypted replay carries a {}-byte key, expected {}",
                encryption_key.len(),
                crypto::KEY_LEN
            )));
        }

        Ok(ReplayInfo {
            file_version,
            custom_versions,
            length_in_ms,
            network_version,
            changelist,
            friendly_name,
            is_live,
            timestamp,
            is_compressed,
            is_encrypted,
            encryption_key,
        })
    }

    pub fn decode_chunk(&mut self, info: &ReplayInfo) -> Result<Chunk> {
        let offset = self.buffer.position();
        let kind = ChunkKind::from_tag(self.buffer.read_u32()?);
        let size = self.buffer.read_i32()?;
        if size < 0 {
            return Err(ReplayError::Malformed(format!(
                "chunk at offset {offset} declares negative size {size}"
            )));
        }
        let mut body = self.buffer.sub_buffer(size as usize)?;
        debug!(offset, ?kind, size, "read chunk");

        let payload = match kind {
            ChunkKind::ReplayData => decode_replay_data(&mut body, info)?,
            _ => body.data.to_vec(),
        };

        Ok(Chunk {
            kind,
            size: size as u32,
            payload,
        })
    }
}

fn decode_replay_data(body: &mut ReplayBuffer, info: &ReplayInfo) -> Result<Vec<u8>> {
    let mut data = if info.file_version >= HISTORY_STREAM_CHUNK_TIMES {
        let _start_ms = body.read_u32()?;
        let _end_ms = body.read_u32()?;
        let length = body.read_u32()? as usize;
        body.sub_buffer(length)?
    } else {
        *body
    };

    let stream = data.read_bytes(data.remaining())?;
    let stream = if info.is_encrypted {
        Cow::Owned(crypto::decrypt(&info.encryption_key, stream)?)
    } else {
        Cow::Borrowed(stream)
    };

    if info.is_compressed {
        inflate(&mut ReplayBuffer::new(&stream))
    } else {
        Ok(stream.into_owned())
    }
}

/// Reads a compressed block (`i32 decompressed_size, i32 compressed_size, bytes`)
/// and inflates it, requiring the output to match the declared size exactly.
pub fn inflate(block: &mut ReplayBuffer) -> Result<Vec<u8>> {
    let decompressed_size = block.read_i32()?;
    let compressed_size = block.read_i32()?;
    if decompressed_size < 0 || compressed_size < 0 {
        return Err(ReplayError::Decompression(format!(
            "negative block sizes (decompressed {decompressed_size}, compressed {compressed_size})"
        )));
    }
    let compressed = block.read_bytes(compressed_size as usize)?;
    let expected = decompressed_size as usize;
    let limit = compressed
        .len()
        .saturating_mul(MAX_INFLATE_RATIO)
        .min(MAX_INFLATED_BLOCK);
    if expected > limit {
        return Err(ReplayError::Decompression(format!(
            "block declares {expected} bytes from {} compressed, limit is {limit}",
            compressed.len()
        )));
    }

    let mut inflated = Vec::new();
    zstd::stream::read::Decoder::new(compressed)
        .and_then(|decoder| {
            decoder
                .take(expected as u64 + 1)
                .read_to_end(&mut inflated)
        })
        .map_err(|e| ReplayError::Decompression(e.to_string()))?;

    if inflated.len() > expected {
        return Err(ReplayError::Decompression(format!(
            "block inflates past its declared {expected} bytes"
        )));
    }
    if inflated.len() < expected {
        return Err(ReplayError::Decompression(format!(
            "declared {expected} bytes, inflated to {}",
            inflated.len()
        )));
    }
    Ok(inflated)
}

/// Decodes the framing of an `Event` chunk body. The event data of an
/// encrypted replay is decrypted with the preamble key.
pub fn decode_event(payload: &[u8], info: &ReplayInfo) -> Result<ReplayEvent> {
    let mut buffer = ReplayBuffer::new(payload);
    let id = buffer.read_fstring()?;
    let group = buffer.read_fstring()?;
    let metadata = buffer.read_fstring()?;
    let start_time_ms = buffer.read_u32()?;
    let end_time_ms = buffer.read_u32()?;
    let size = buffer.read_u32()? as usize;
    let data = buffer.read_bytes(size)?;
    let data = if info.is_encrypted {
        crypto::decrypt(&info.encryption_key, data)?
    } else {
        data.to_vec()
    };

    Ok(ReplayEvent {
        id,
        group,
        metadata,
        start_time_ms,
        end_time_ms,
        data,
    })
}
