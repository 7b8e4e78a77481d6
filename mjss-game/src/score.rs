//! Recorded score sheets as they arrive from disk.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validate::ErrorPolicy;

/// Table position of a player within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    East,
    South,
    West,
    North,
}

impl Seat {
    pub const ALL: [Self; 4] = [Self::East, Self::South, Self::West, Self::North];
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seat::East => write!(f, "east"),
            Seat::South => write!(f, "south"),
            Seat::West => write!(f, "west"),
            Seat::North => write!(f, "north"),
        }
    }
}

/// One player's final point total for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player: String,
    pub point: i64,
    #[serde(default)]
    pub seat: Option<Seat>,
}

impl PlayerScore {
    #[must_use]
    pub fn new(player: impl Into<String>, point: i64, seat: Option<Seat>) -> Self {
        Self {
            player: player.into(),
            point,
            seat,
        }
    }
}

/// A single recorded game together with the violations its recorder declared
/// as expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScore {
    pub result: Vec<PlayerScore>,
    #[serde(default, deserialize_with = "nullable_policy")]
    pub known_errors: ErrorPolicy,
}

impl GameScore {
    /// A game with no declared tolerance; validation will be strict.
    #[must_use]
    pub fn new(result: Vec<PlayerScore>) -> Self {
        Self {
            result,
            known_errors: ErrorPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_known_errors(mut self, known_errors: ErrorPolicy) -> Self {
        self.known_errors = known_errors;
        self
    }

    /// Sum of raw points, widened so extreme totals cannot overflow.
    #[must_use]
    pub fn point_sum(&self) -> i128 {
        self.result.iter().map(|entry| i128::from(entry.point)).sum()
    }
}

fn nullable_policy<'de, D>(deserializer: D) -> Result<ErrorPolicy, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<ErrorPolicy>::deserialize(deserializer)?.unwrap_or_default())
}

/// Seat rotation applied between hanchan in a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Reseat {
    One = 1,
    Three = 3,
}

impl TryFrom<u8> for Reseat {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            3 => Ok(Self::Three),
            other => Err(format!("reseat must be 1 or 3 (got {other})")),
        }
    }
}

impl From<Reseat> for u8 {
    fn from(value: Reseat) -> Self {
        value as u8
    }
}

/// Rule variant shared by every game of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub flower: Option<bool>,
    #[serde(default)]
    pub reseat: Option<Reseat>,
}

/// All games recorded for one reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub variant: Option<Variant>,
    pub scores: Vec<GameScore>,
}

impl SetScore {
    #[must_use]
    pub fn new(date: Option<NaiveDate>, scores: Vec<GameScore>) -> Self {
        Self {
            date,
            variant: None,
            scores,
        }
    }

    /// Load a set from its JSON score sheet
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a valid set.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
