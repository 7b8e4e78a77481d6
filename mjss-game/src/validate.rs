//! Structural validation of recorded games and the declared-error protocol.
//!
//! A game is clean when exactly four distinct players appear, the seats are
//! either fully assigned or fully unknown, and the points sum to zero. A
//! recorder may declare that a particular violation is expected for a game by
//! listing it in `known_errors` together with an [`ErrorAction`]. Declarations
//! must match the violations actually found in both directions: an undeclared
//! violation is fatal, and so is a declaration for a violation that did not
//! occur.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::score::{GameScore, PlayerScore, Seat, SetScore, Variant};

/// Structural rule a game can break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    #[serde(rename = "not 4-player", alias = "NOT_FOUR_PLAYERS")]
    NotFourPlayers,
    #[serde(rename = "seats mismatch", alias = "SEATS_MISMATCH")]
    SeatsMismatch,
    #[serde(rename = "non-zero-sum points", alias = "NON_ZERO_SUM")]
    NonZeroSum,
}

impl ViolationKind {
    pub const ALL: [Self; 3] = [Self::NotFourPlayers, Self::SeatsMismatch, Self::NonZeroSum];
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationKind::NotFourPlayers => write!(f, "not 4-player"),
            ViolationKind::SeatsMismatch => write!(f, "seats mismatch"),
            ViolationKind::NonZeroSum => write!(f, "non-zero-sum points"),
        }
    }
}

/// What to do with a declared violation once it has been found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorAction {
    /// Tolerate the violation and leave the game out of standings
    Drop,
    /// Tolerate the violation and keep the game in standings
    Resume,
    /// Treat the violation as fatal even though it was declared
    Raise,
}

impl ErrorAction {
    /// The tolerance this action grants, or `None` for [`ErrorAction::Raise`].
    #[must_use]
    pub const fn tolerance(self) -> Option<Tolerance> {
        match self {
            ErrorAction::Drop => Some(Tolerance::Drop),
            ErrorAction::Resume => Some(Tolerance::Resume),
            ErrorAction::Raise => None,
        }
    }
}

impl std::fmt::Display for ErrorAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorAction::Drop => write!(f, "drop"),
            ErrorAction::Resume => write!(f, "resume"),
            ErrorAction::Raise => write!(f, "raise"),
        }
    }
}

/// How a tolerated violation was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tolerance {
    Drop,
    Resume,
}

impl From<Tolerance> for ErrorAction {
    fn from(value: Tolerance) -> Self {
        match value {
            Tolerance::Drop => ErrorAction::Drop,
            Tolerance::Resume => ErrorAction::Resume,
        }
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ErrorAction::from(*self).fmt(f)
    }
}

/// Declared violations for one game, keyed by kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorPolicy(BTreeMap<ViolationKind, ErrorAction>);

impl ErrorPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, kind: ViolationKind, action: ErrorAction) -> Self {
        self.0.insert(kind, action);
        self
    }

    #[must_use]
    pub fn get(&self, kind: ViolationKind) -> Option<ErrorAction> {
        self.0.get(&kind).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Declared kinds in kind order.
    pub fn kinds(&self) -> impl Iterator<Item = ViolationKind> + '_ {
        self.0.keys().copied()
    }
}

impl FromIterator<(ViolationKind, ErrorAction)> for ErrorPolicy {
    fn from_iter<T: IntoIterator<Item = (ViolationKind, ErrorAction)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Report every structural violation present in `game`.
///
/// All rules are checked; an empty set means the game is clean.
#[must_use]
pub fn classify(game: &GameScore) -> BTreeSet<ViolationKind> {
    let players: BTreeSet<&str> = game
        .result
        .iter()
        .map(|entry| entry.player.as_str())
        .collect();
    let seats: BTreeSet<Option<Seat>> = game.result.iter().map(|entry| entry.seat).collect();
    let full_table: BTreeSet<Option<Seat>> = Seat::ALL.into_iter().map(Some).collect();
    let seat_blind = seats.len() == 1 && seats.contains(&None);

    let mut found = BTreeSet::new();
    if players.len() != 4 {
        found.insert(ViolationKind::NotFourPlayers);
    }
    if seats != full_table && !seat_blind {
        found.insert(ViolationKind::SeatsMismatch);
    }
    if game.point_sum() != 0 {
        found.insert(ViolationKind::NonZeroSum);
    }
    found
}

/// Errors raised when a game's violations disagree with its declarations.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GameValidationError {
    #[error("undeclared violation found: {kind}")]
    Undeclared { kind: ViolationKind },
    #[error("expected violation not found: {kind}")]
    ExpectedNotFound { kind: ViolationKind },
    #[error("declared violation raised: {kind}")]
    Raised { kind: ViolationKind },
}

impl GameValidationError {
    #[must_use]
    pub const fn kind(&self) -> ViolationKind {
        match self {
            Self::Undeclared { kind } | Self::ExpectedNotFound { kind } | Self::Raised { kind } => {
                *kind
            }
        }
    }
}

/// A game that passed validation, with the violations it was allowed to carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedGame {
    result: Vec<PlayerScore>,
    tolerated: Vec<(ViolationKind, Tolerance)>,
}

impl ValidatedGame {
    #[must_use]
    pub fn result(&self) -> &[PlayerScore] {
        &self.result
    }

    #[must_use]
    pub fn tolerated(&self) -> &[(ViolationKind, Tolerance)] {
        &self.tolerated
    }

    /// Points in entry order when the game has exactly four entries.
    #[must_use]
    pub fn points(&self) -> Option<[i64; 4]> {
        match self.result.as_slice() {
            [a, b, c, d] => Some([a.point, b.point, c.point, d.point]),
            _ => None,
        }
    }
}

impl GameScore {
    /// Check this game against its declared error policy.
    ///
    /// # Errors
    ///
    /// Returns an error if a violation was found but not declared, if a
    /// declared violation was not found, or if a found violation is declared
    /// with [`ErrorAction::Raise`].
    pub fn validate(&self) -> Result<ValidatedGame, GameValidationError> {
        let found = classify(self);

        if let Some(&kind) = found
            .iter()
            .find(|kind| self.known_errors.get(**kind).is_none())
        {
            return Err(GameValidationError::Undeclared { kind });
        }
        if let Some(kind) = self.known_errors.kinds().find(|kind| !found.contains(kind)) {
            return Err(GameValidationError::ExpectedNotFound { kind });
        }

        // Every found kind is declared at this point.
        let mut tolerated = Vec::with_capacity(found.len());
        for kind in found {
            if let Some(tolerance) = self.known_errors.get(kind).and_then(ErrorAction::tolerance) {
                tolerated.push((kind, tolerance));
            } else {
                return Err(GameValidationError::Raised { kind });
            }
        }

        Ok(ValidatedGame {
            result: self.result.clone(),
            tolerated,
        })
    }
}

/// A tolerated violation tagged with the position of its game in the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToleratedViolation {
    pub game_index: usize,
    pub kind: ViolationKind,
    pub tolerance: Tolerance,
}

/// Set validation failure naming the offending game.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}[{game_index}]: {source}", set_label(.date))]
pub struct SetValidationError {
    pub date: Option<NaiveDate>,
    pub game_index: usize,
    #[source]
    pub source: GameValidationError,
}

fn set_label(date: &Option<NaiveDate>) -> String {
    date_label(*date)
}

/// Label used for a set in diagnostics.
#[must_use]
pub fn date_label(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "undated".to_string(), |date| date.to_string())
}

/// A set whose every game passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedSet {
    date: Option<NaiveDate>,
    variant: Option<Variant>,
    games: Vec<ValidatedGame>,
}

impl ValidatedSet {
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    #[must_use]
    pub const fn variant(&self) -> Option<Variant> {
        self.variant
    }

    #[must_use]
    pub fn games(&self) -> &[ValidatedGame] {
        &self.games
    }

    /// Every tolerated violation in game order.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<ToleratedViolation> {
        self.games
            .iter()
            .enumerate()
            .flat_map(|(game_index, game)| {
                game.tolerated
                    .iter()
                    .map(move |&(kind, tolerance)| ToleratedViolation {
                        game_index,
                        kind,
                        tolerance,
                    })
            })
            .collect()
    }
}

impl SetScore {
    /// Validate every game in order.
    ///
    /// # Errors
    ///
    /// Returns the first game failure; no partial result is produced.
    pub fn validate(&self) -> Result<ValidatedSet, SetValidationError> {
        let games = self
            .scores
            .iter()
            .enumerate()
            .map(|(game_index, game)| {
                game.validate().map_err(|source| SetValidationError {
                    date: self.date,
                    game_index,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedSet {
            date: self.date,
            variant: self.variant,
            games,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seated(points: [i64; 4]) -> GameScore {
        let names = ["A", "B", "C", "D"];
        GameScore::new(
            names
                .iter()
                .zip(Seat::ALL)
                .zip(points)
                .map(|((name, seat), point)| PlayerScore::new(*name, point, Some(seat)))
                .collect(),
        )
    }

    fn blind(points: [i64; 4]) -> GameScore {
        let mut game = seated(points);
        for entry in &mut game.result {
            entry.seat = None;
        }
        game
    }

    #[test]
    fn clean_games_classify_empty() {
        assert!(classify(&seated([30, 10, -10, -30])).is_empty());
        assert!(classify(&blind([25, 25, -20, -30])).is_empty());
    }

    #[test]
    fn extreme_totals_are_not_wrapped_to_zero() {
        let found = classify(&blind([i64::MAX, i64::MAX, 2, 0]));
        assert_eq!(found, BTreeSet::from([ViolationKind::NonZeroSum]));
        assert!(classify(&blind([i64::MAX, i64::MIN, 1, 0])).is_empty());
    }

    #[test]
    fn resumed_overflowing_game_validates() {
        let game = blind([i64::MAX, 1, 0, 0]).with_known_errors(
            ErrorPolicy::new().with(ViolationKind::NonZeroSum, ErrorAction::Resume),
        );
        let set = SetScore::new(None, vec![game]).validate().unwrap();
        assert_eq!(
            set.diagnostics(),
            vec![ToleratedViolation {
                game_index: 0,
                kind: ViolationKind::NonZeroSum,
                tolerance: Tolerance::Resume,
            }]
        );
    }

    #[test]
    fn nonzero_sum_is_always_reported() {
        let mut game = seated([30, 10, -10, -29]);
        game.result[1].player = "A".to_string();
        game.result[2].seat = None;
        let found = classify(&game);
        assert!(found.contains(&ViolationKind::NonZeroSum));
        assert_eq!(found.len(), 3, "all rules are reported together");
    }

    #[test]
    fn partial_seating_mismatches() {
        let mut game = seated([0, 0, 0, 0]);
        game.result[3].seat = None;
        assert_eq!(
            classify(&game).into_iter().collect::<Vec<_>>(),
            vec![ViolationKind::SeatsMismatch]
        );

        let mut repeated = seated([0, 0, 0, 0]);
        repeated.result[3].seat = Some(Seat::East);
        assert!(classify(&repeated).contains(&ViolationKind::SeatsMismatch));
    }

    #[test]
    fn empty_game_breaks_every_rule_but_the_sum() {
        let found = classify(&GameScore::new(Vec::new()));
        assert!(found.contains(&ViolationKind::NotFourPlayers));
        assert!(found.contains(&ViolationKind::SeatsMismatch));
        assert!(!found.contains(&ViolationKind::NonZeroSum));
    }

    #[test]
    fn undeclared_violation_is_fatal() {
        let err = seated([1, 0, 0, 0]).validate().unwrap_err();
        assert_eq!(
            err,
            GameValidationError::Undeclared {
                kind: ViolationKind::NonZeroSum
            }
        );
        assert_eq!(err.to_string(), "undeclared violation found: non-zero-sum points");
    }

    #[test]
    fn stale_declaration_is_fatal() {
        let game = seated([1, 0, 0, -1]).with_known_errors(
            ErrorPolicy::new().with(ViolationKind::SeatsMismatch, ErrorAction::Resume),
        );
        let err = game.validate().unwrap_err();
        assert_eq!(
            err,
            GameValidationError::ExpectedNotFound {
                kind: ViolationKind::SeatsMismatch
            }
        );
    }

    #[test]
    fn stale_declaration_wins_over_raise() {
        let game = seated([1, 0, 0, 0]).with_known_errors(
            ErrorPolicy::new()
                .with(ViolationKind::NonZeroSum, ErrorAction::Raise)
                .with(ViolationKind::NotFourPlayers, ErrorAction::Drop),
        );
        assert_eq!(
            game.validate().unwrap_err().kind(),
            ViolationKind::NotFourPlayers
        );
    }

    #[test]
    fn raise_is_fatal_even_when_declared() {
        let game = seated([1, 0, 0, 0]).with_known_errors(
            ErrorPolicy::new().with(ViolationKind::NonZeroSum, ErrorAction::Raise),
        );
        assert_eq!(
            game.validate().unwrap_err(),
            GameValidationError::Raised {
                kind: ViolationKind::NonZeroSum
            }
        );
    }

    #[test]
    fn declared_violations_are_tolerated() {
        let mut game = seated([1, 0, 0, 0]).with_known_errors(
            ErrorPolicy::new()
                .with(ViolationKind::NonZeroSum, ErrorAction::Resume)
                .with(ViolationKind::SeatsMismatch, ErrorAction::Drop),
        );
        game.result[0].seat = None;
        let validated = game.validate().unwrap();
        assert_eq!(
            validated.tolerated(),
            &[
                (ViolationKind::SeatsMismatch, Tolerance::Drop),
                (ViolationKind::NonZeroSum, Tolerance::Resume)
            ]
        );
        assert_eq!(validated.result(), game.result.as_slice());
    }

    #[test]
    fn set_failure_names_game_index() {
        let set = SetScore::new(
            NaiveDate::from_ymd_opt(2024, 5, 1),
            vec![seated([1, -1, 0, 0]), blind([2, 0, 0, 0])],
        );
        let err = set.validate().unwrap_err();
        assert_eq!(err.game_index, 1);
        assert_eq!(err.source.kind(), ViolationKind::NonZeroSum);
        assert_eq!(
            err.to_string(),
            "2024-05-01[1]: undeclared violation found: non-zero-sum points"
        );
    }

    #[test]
    fn set_diagnostics_are_index_tagged() {
        let tolerated = blind([2, 0, 0, 0]).with_known_errors(
            ErrorPolicy::new().with(ViolationKind::NonZeroSum, ErrorAction::Resume),
        );
        let set = SetScore::new(None, vec![seated([1, -1, 0, 0]), tolerated]);
        let validated = set.validate().unwrap();
        assert_eq!(validated.games().len(), 2);
        assert!(validated.games()[0].tolerated().is_empty());
        assert_eq!(
            validated.diagnostics(),
            vec![ToleratedViolation {
                game_index: 1,
                kind: ViolationKind::NonZeroSum,
                tolerance: Tolerance::Resume,
            }]
        );
    }

    #[test]
    fn policy_keys_accept_both_spellings() {
        let policy: ErrorPolicy =
            serde_json::from_str(r#"{ "NOT_FOUR_PLAYERS": "drop", "seats mismatch": "raise" }"#)
                .unwrap();
        assert_eq!(policy.get(ViolationKind::NotFourPlayers), Some(ErrorAction::Drop));
        assert_eq!(policy.get(ViolationKind::SeatsMismatch), Some(ErrorAction::Raise));
        assert_eq!(policy.get(ViolationKind::NonZeroSum), None);
    }
}
