//! Score-sheet engine
//!
//! Platform-agnostic core logic for four-player zero-sum score sheets: structural
//! validation of recorded games, the declared-error tolerance protocol, placement
//! points and per-player day standings. This crate performs no I/O and does not
//! log; tolerated violations are returned to the caller as diagnostics.

pub mod numbers;
pub mod ranking;
pub mod score;
pub mod standings;
pub mod validate;

// Re-export commonly used types
pub use numbers::format_points;
pub use ranking::{RANKING_UNIT, ranking_scores};
pub use score::{GameScore, PlayerScore, Reseat, Seat, SetScore, Variant};
pub use standings::{DayStandings, PersonalStanding};
pub use validate::{
    ErrorAction, ErrorPolicy, GameValidationError, SetValidationError, Tolerance,
    ToleratedViolation, ValidatedGame, ValidatedSet, ViolationKind, classify, date_label,
};

/// Decode, validate and fold a JSON score sheet in one step.
///
/// # Errors
///
/// Returns an error if the sheet cannot be decoded or fails validation.
pub fn standings_from_json(json: &str) -> Result<(ValidatedSet, DayStandings), SheetError> {
    let set = SetScore::from_json(json)?;
    let validated = set.validate()?;
    let standings = DayStandings::from_validated_set(&validated);
    Ok((validated, standings))
}

/// Failure while turning a raw score sheet into standings.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("malformed score sheet: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] SetValidationError),
}
