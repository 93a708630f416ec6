//! Data models for the mood ledger.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five mood levels, ordered by rank. The rank is the ordinal value
/// used for averaging in trend and review computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MoodLevel {
    Happy,
    Calm,
    Neutral,
    Tense,
    Upset,
}

impl MoodLevel {
    pub const ALL: [MoodLevel; 5] = [
        MoodLevel::Happy,
        MoodLevel::Calm,
        MoodLevel::Neutral,
        MoodLevel::Tense,
        MoodLevel::Upset,
    ];

    /// Ordinal rank: HAPPY=5 down to UPSET=1.
    pub fn rank(&self) -> u8 {
        match self {
            MoodLevel::Happy => 5,
            MoodLevel::Calm => 4,
            MoodLevel::Neutral => 3,
            MoodLevel::Tense => 2,
            MoodLevel::Upset => 1,
        }
    }

    pub fn from_rank(rank: i64) -> Option<MoodLevel> {
        match rank {
            5 => Some(MoodLevel::Happy),
            4 => Some(MoodLevel::Calm),
            3 => Some(MoodLevel::Neutral),
            2 => Some(MoodLevel::Tense),
            1 => Some(MoodLevel::Upset),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoodLevel::Happy => "HAPPY",
            MoodLevel::Calm => "CALM",
            MoodLevel::Neutral => "NEUTRAL",
            MoodLevel::Tense => "TENSE",
            MoodLevel::Upset => "UPSET",
        }
    }
}

impl fmt::Display for MoodLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MoodLevel {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HAPPY" => Ok(MoodLevel::Happy),
            "CALM" => Ok(MoodLevel::Calm),
            "NEUTRAL" => Ok(MoodLevel::Neutral),
            "TENSE" => Ok(MoodLevel::Tense),
            "UPSET" => Ok(MoodLevel::Upset),
            other => Err(ApiError::Validation(format!(
                "unknown mood level '{}', expected one of HAPPY, CALM, NEUTRAL, TENSE, UPSET",
                other
            ))),
        }
    }
}

/// A single observation in the mood ledger.
///
/// The `id` is the creation timestamp in milliseconds and doubles as the
/// lookup key. Observations are immutable after creation except for
/// `playlist_id`, which is set once when a playlist is generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodObservation {
    pub id: i64,
    pub level: MoodLevel,
    pub context: Option<String>,
    pub activities: Vec<String>,
    pub tags: Vec<String>,
    pub playlist_id: Option<String>,
}
