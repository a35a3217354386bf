use super::types::{RarityKind, WeaponInfo};

pub const UNKNOWN_WEAPON: &str = "Unknown";

const RARITY_PREFIX: &str = "rarity.";

// Checked in order; the more specific tag must come before its prefix.
const WEAPON_TAGS: [(&str, &str); 7] = [
    ("weapon.ranged.sniper.heavy", "Heavy Sniper"),
    ("weapon.ranged.sniper.bolt", "Bolt-Action Sniper"),
    ("weapon.ranged.sniper.hunting", "Hunting Rifle"),
    ("weapon.ranged.shotgun.pump", "Pump Shotgun"),
    ("weapon.ranged.smg.suppressed", "Suppressed SMG"),
    ("weapon.ranged.smg", "SMG"),
    ("weapon.ranged.assault.standard", "Assault Rifle"),
];

pub fn identify_weapon(tags: &[String]) -> &'static str {
    let lowered: Vec<String> = tags.iter().map(|t| t.to_ascii_lowercase()).collect();
    WEAPON_TAGS
        .iter()
        .find(|(needle, _)| lowered.iter().any(|tag| tag.contains(needle)))
        .map_or(UNKNOWN_WEAPON, |&(_, name)| name)
}

pub fn identify_rarity(tags: &[String]) -> RarityKind {
    tags.iter()
        .find(|tag| {
            tag.get(..RARITY_PREFIX.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(RARITY_PREFIX))
        })
        .map_or(RarityKind::Unknown, |tag| {
            RarityKind::from_tag_suffix(&tag[RARITY_PREFIX.len()..])
        })
}

impl WeaponInfo {
    pub fn from_death_tags(tags: &[String]) -> Self {
        WeaponInfo {
            name: identify_weapon(tags).to_string(),
            rarity: identify_rarity(tags),
        }
    }

    pub fn unknown() -> Self {
        WeaponInfo {
            name: UNKNOWN_WEAPON.to_string(),
            rarity: RarityKind::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn it_identifies_weapons() {
        assert_eq!(
            identify_weapon(&tags(&["Gameplay.Damage", "Weapon.Ranged.Sniper.Heavy"])),
            "Heavy Sniper"
        );
        assert_eq!(
            identify_weapon(&tags(&["Item.Weapon.Ranged.SMG.Suppressed"])),
            "Suppressed SMG"
        );
        assert_eq!(identify_weapon(&tags(&["Weapon.Ranged.SMG.Burst"])), "SMG");
        assert_eq!(
            identify_weapon(&tags(&["weapon.ranged.assault.standard.scar"])),
            "Assault Rifle"
        );
    }

    #[test]
    fn it_prefers_table_order_over_tag_order() {
        assert_eq!(
            identify_weapon(&tags(&["Weapon.Ranged.SMG", "Weapon.Ranged.Shotgun.Pump"])),
            "Pump Shotgun"
        );
    }

    #[test]
    fn it_falls_back_to_unknown_weapon() {
        assert_eq!(identify_weapon(&[]), "Unknown");
        assert_eq!(identify_weapon(&tags(&["Weapon.Melee.Pickaxe"])), "Unknown");
    }

    #[test]
    fn it_identifies_rarity() {
        assert_eq!(
            identify_rarity(&tags(&["Weapon.Ranged.SMG", "Rarity.VeryRare"])),
            RarityKind::Epic
        );
        assert_eq!(identify_rarity(&tags(&["rarity.Rare"])), RarityKind::Rare);
        assert_eq!(identify_rarity(&tags(&["Rarity.Mythic"])), RarityKind::Mythic);
        assert_eq!(identify_rarity(&tags(&["Rarity.Shiny"])), RarityKind::Unknown);
        assert_eq!(identify_rarity(&tags(&["Rar", "é"])), RarityKind::Unknown);
        assert_eq!(identify_rarity(&[]), RarityKind::Unknown);
    }

    #[test]
    fn it_builds_weapon_info_from_death_tags() {
        assert_eq!(
            WeaponInfo::from_death_tags(&tags(&[
                "Weapon.Ranged.Sniper.Bolt",
                "Rarity.SuperRare"
            ])),
            WeaponInfo {
                name: String::from("Bolt-Action Sniper"),
                rarity: RarityKind::Legendary
            }
        );
    }
}
