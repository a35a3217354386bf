use super::parsers::parse_branch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

/// Season version parsed from a branch string such as `++Fortnite+Release-28.10-CL-32116959`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchVersion {
    pub major: u16,
    pub minor: u16,
    pub changelist: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelName {
    pub name: String,
    pub time_ms: u32,
}

/// Body of the `Header` chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkHeader {
    pub network_version: u32,
    pub network_checksum: u32,
    pub engine_network_version: u32,
    pub game_network_protocol: u32,
    pub guid: Option<[u8; 16]>,
    pub engine_version: Option<EngineVersion>,
    pub changelist: u32,
    pub branch: String,
    pub levels: Vec<LevelName>,
    pub flags: u32,
    pub game_specific_data: Vec<String>,
}

impl NetworkHeader {
    pub fn branch_version(&self) -> Option<BranchVersion> {
        parse_branch(&self.branch).ok().map(|(_, version)| version)
    }
}
