//! Per-player day standings folded from a validated set.
use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::numbers::format_points;
use crate::ranking::ranking_scores;
use crate::validate::ValidatedSet;

/// Accumulated results of one player over a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonalStanding {
    pub player: String,
    pub games: u32,
    /// Placement points in twelfths.
    pub score: i64,
    /// Sum of raw points.
    pub raw: i64,
}

impl PersonalStanding {
    #[must_use]
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            games: 0,
            score: 0,
            raw: 0,
        }
    }

    // Totals saturate instead of wrapping on extreme raw points.
    fn record(&mut self, score: i64, raw: i64) {
        self.games = self.games.saturating_add(1);
        self.score = self.score.saturating_add(score);
        self.raw = self.raw.saturating_add(raw);
    }
}

// Ascending by player, then by the accumulated fields.
impl Ord for PersonalStanding {
    fn cmp(&self, other: &Self) -> Ordering {
        self.player
            .cmp(&other.player)
            .then(self.games.cmp(&other.games))
            .then(self.score.cmp(&other.score))
            .then(self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for PersonalStanding {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for PersonalStanding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:\t{}\t{}\t/{}",
            self.player,
            format_points(self.score),
            self.raw,
            self.games
        )
    }
}

/// Standings for one reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DayStandings {
    standings: Vec<PersonalStanding>,
    excluded: Vec<usize>,
}

impl DayStandings {
    /// Fold every contributing game of `set` into per-player standings.
    ///
    /// Tolerated violations do not affect the fold. Games that cannot be
    /// ranked because they do not have exactly four entries are skipped and
    /// listed in [`DayStandings::excluded`].
    #[must_use]
    pub fn from_validated_set(set: &ValidatedSet) -> Self {
        let mut by_player: HashMap<&str, PersonalStanding> = HashMap::new();
        let mut excluded = Vec::new();

        for (index, game) in set.games().iter().enumerate() {
            let Some(points) = game.points() else {
                excluded.push(index);
                continue;
            };
            let ranks = ranking_scores(points);
            for (entry, rank) in game.result().iter().zip(ranks) {
                by_player
                    .entry(entry.player.as_str())
                    .or_insert_with(|| PersonalStanding::new(entry.player.as_str()))
                    .record(rank, entry.point);
            }
        }

        let mut standings: Vec<PersonalStanding> = by_player.into_values().collect();
        standings.sort();
        Self {
            standings,
            excluded,
        }
    }

    #[must_use]
    pub fn standings(&self) -> &[PersonalStanding] {
        &self.standings
    }

    /// Indices of games left out of the standings.
    #[must_use]
    pub fn excluded(&self) -> &[usize] {
        &self.excluded
    }

    #[must_use]
    pub fn get(&self, player: &str) -> Option<&PersonalStanding> {
        self.standings.iter().find(|standing| standing.player == player)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }
}

impl std::fmt::Display for DayStandings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, standing) in self.standings.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{standing}")?;
        }
        Ok(())
    }
}
