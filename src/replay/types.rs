/// Engine serialization version recorded for one subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomVersion {
    pub guid: [u8; 16],
    pub version: i32,
}

/// Preamble of a local replay file, read before the first chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayInfo {
    pub file_version: u32,
    /// Present from file version 7 onwards.
    pub custom_versions: Vec<CustomVersion>,
    pub length_in_ms: u32,
    pub network_version: u32,
    pub changelist: u32,
    pub friendly_name: String,
    pub is_live: bool,
    /// .NET ticks; present from file version 3 onwards.
    pub timestamp: Option<i64>,
    pub is_compressed: bool,
    pub is_encrypted: bool,
    pub encryption_key: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    Header,
    ReplayData,
    Checkpoint,
    Event,
    Unknown(u32),
}

impl ChunkKind {
    pub fn from_tag(tag: u32) -> Self {
        match tag {
            0 => ChunkKind::Header,
            1 => ChunkKind::ReplayData,
            2 => ChunkKind::Checkpoint,
            3 => ChunkKind::Event,
            other => ChunkKind::Unknown(other),
        }
    }

    pub fn tag(&self) -> u32 {
        match self {
            ChunkKind::Header => 0,
            ChunkKind::ReplayData => 1,
            ChunkKind::Checkpoint => 2,
            ChunkKind::Event => 3,
            ChunkKind::Unknown(tag) => *tag,
        }
    }
}

/// One length-framed section of the container.
///
/// `size` is the size declared on the wire. `payload` is the chunk body,
/// except for [`ChunkKind::ReplayData`] where it is the inflated stream data.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub kind: ChunkKind,
    pub size: u32,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayContainer {
    pub info: ReplayInfo,
    pub chunks: Vec<Chunk>,
}

impl ReplayContainer {
    pub fn header_chunk(&self) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.kind == ChunkKind::Header)
    }

    pub fn event_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter().filter(|c| c.kind == ChunkKind::Event)
    }
}

/// Framing of an `Event` chunk body.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayEvent {
    pub id: String,
    pub group: String,
    pub metadata: String,
    pub start_time_ms: u32,
    pub end_time_ms: u32,
    pub data: Vec<u8>,
}
