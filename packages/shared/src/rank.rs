//! Rank labels ("Gold 2", "Immortal 1", "Radiant") mapped onto an ordinal used
//! for sorting and bucketed filtering of the player list.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const UNRANKED: u8 = 0;
pub const RADIANT: u8 = 25;

/// Tiers with three divisions each, lowest first.
const DIVISIONED_TIERS: [&str; 8] = [
    "iron",
    "bronze",
    "silver",
    "gold",
    "platinum",
    "diamond",
    "ascendant",
    "immortal",
];

/// Maps a free-text rank label to 0..=25.
///
/// Each tier owns three consecutive values (Iron 1..=3, Bronze 4..=6, ...
/// Immortal 22..=24) and Radiant is 25. The division is the first of `1`, `2`,
/// `3` found anywhere in the label, defaulting to the middle one. Labels that
/// carry unrelated digits can therefore land on the wrong division.
pub fn rank_tier(label: &str) -> u8 {
    let lower = label.to_lowercase();

    for (index, tier) in DIVISIONED_TIERS.iter().enumerate() {
        if lower.contains(tier) {
            let base = (index as u8) * 3;
            let division = if lower.contains('1') {
                1
            } else if lower.contains('2') {
                2
            } else if lower.contains('3') {
                3
            } else {
                2
            };
            return base + division;
        }
    }

    if lower.contains("radiant") {
        return RADIANT;
    }
    UNRANKED
}

/// Rank buckets offered by the player list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankFilter {
    #[default]
    All,
    IronBronze,
    SilverGold,
    GoldPlatinum,
    PlatinumDiamond,
    DiamondAscendant,
    AscendantImmortal,
    ImmortalRadiant,
    Radiant,
}

impl RankFilter {
    fn tier_names(&self) -> &'static [&'static str] {
        match self {
            RankFilter::All => &[],
            RankFilter::IronBronze => &["iron", "bronze"],
            RankFilter::SilverGold => &["silver", "gold"],
            RankFilter::GoldPlatinum => &["gold", "platinum"],
            RankFilter::PlatinumDiamond => &["platinum", "diamond"],
            RankFilter::DiamondAscendant => &["diamond", "ascendant"],
            RankFilter::AscendantImmortal => &["ascendant", "immortal"],
            RankFilter::ImmortalRadiant => &["immortal", "radiant"],
            RankFilter::Radiant => &["radiant"],
        }
    }

    /// Whether a player with this rank label belongs in the bucket. Players
    /// without a rank only show up under `All`.
    pub fn matches(&self, label: Option<&str>) -> bool {
        if *self == RankFilter::All {
            return true;
        }
        let Some(label) = label else {
            return false;
        };
        let lower = label.to_lowercase();
        self.tier_names().iter().any(|name| lower.contains(name))
    }
}

impl FromStr for RankFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(RankFilter::All),
            "iron-bronze" => Ok(RankFilter::IronBronze),
            "silver-gold" => Ok(RankFilter::SilverGold),
            "gold-platinum" => Ok(RankFilter::GoldPlatinum),
            "platinum-diamond" => Ok(RankFilter::PlatinumDiamond),
            "diamond-ascendant" => Ok(RankFilter::DiamondAscendant),
            "ascendant-immortal" => Ok(RankFilter::AscendantImmortal),
            "immortal-radiant" => Ok(RankFilter::ImmortalRadiant),
            "radiant" => Ok(RankFilter::Radiant),
            other => Err(format!("Unknown rank filter: {}", other)),
        }
    }
}
