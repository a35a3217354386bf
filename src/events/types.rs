use serde::Serialize;

/// Hardware platform of a player, as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlatformKind {
    #[serde(rename = "PC")]
    Pc,
    #[serde(rename = "Xbox One")]
    XboxOne,
    #[serde(rename = "Xbox Series X/S")]
    XboxSeriesXS,
    PlayStation,
    #[serde(rename = "Nintendo Switch")]
    Switch,
    #[serde(rename = "iOS")]
    Ios,
    Android,
    Mac,
    Unknown,
}

impl PlatformKind {
    /// Maps a raw platform code; unrecognized codes are [`PlatformKind::Unknown`].
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "WIN" => PlatformKind::Pc,
            "XBL" => PlatformKind::XboxOne,
            "XSX" => PlatformKind::XboxSeriesXS,
            "PSN" | "PS5" => PlatformKind::PlayStation,
            "SWT" => PlatformKind::Switch,
            "IOS" => PlatformKind::Ios,
            "AND" => PlatformKind::Android,
            "MAC" => PlatformKind::Mac,
            _ => PlatformKind::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlatformKind::Pc => "PC",
            PlatformKind::XboxOne => "Xbox One",
            PlatformKind::XboxSeriesXS => "Xbox Series X/S",
            PlatformKind::PlayStation => "PlayStation",
            PlatformKind::Switch => "Nintendo Switch",
            PlatformKind::Ios => "iOS",
            PlatformKind::Android => "Android",
            PlatformKind::Mac => "Mac",
            PlatformKind::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RarityKind {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Unknown,
}

impl RarityKind {
    /// Maps the suffix of a `Rarity.*` tag.
    pub fn from_tag_suffix(suffix: &str) -> Self {
        match suffix.to_ascii_lowercase().as_str() {
            "common" => RarityKind::Common,
            "uncommon" => RarityKind::Uncommon,
            "rare" => RarityKind::Rare,
            "veryrare" | "epic" => RarityKind::Epic,
            "superrare" | "ultrarare" | "legendary" => RarityKind::Legendary,
            "mythic" => RarityKind::Mythic,
            _ => RarityKind::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RarityKind::Common => "Common",
            RarityKind::Uncommon => "Uncommon",
            RarityKind::Rare => "Rare",
            RarityKind::Epic => "Epic",
            RarityKind::Legendary => "Legendary",
            RarityKind::Mythic => "Mythic",
            RarityKind::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRef {
    pub display_name: String,
    pub platform: PlatformKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponInfo {
    pub name: String,
    pub rarity: RarityKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KillEvent {
    pub killer: PlayerRef,
    pub victim: PlayerRef,
    /// Shooter to victim, in meters.
    pub distance: f64,
    pub weapon: WeaponInfo,
    /// Seconds since match start.
    pub timestamp: f64,
    pub knocked: bool,
}

/// End-of-match statistics of the recording player (`AthenaMatchStats`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchStats {
    pub accuracy: f32,
    pub assists: u32,
    pub eliminations: u32,
    pub weapon_damage: u32,
    pub other_damage: u32,
    pub revives: u32,
    pub damage_taken: u32,
    pub damage_to_structures: u32,
    pub materials_gathered: u32,
    pub materials_used: u32,
    pub total_traveled_m: f64,
}

/// Final placement of the recording player's team (`AthenaMatchTeamStats`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamStats {
    pub position: u32,
    pub total_players: u32,
}

/// An event that could not be decoded and was left out of the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEvent {
    pub id: String,
    pub group: String,
    pub start_time_ms: u32,
    pub reason: String,
}
