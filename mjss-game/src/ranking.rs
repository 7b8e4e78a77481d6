//! Placement points computed from raw point totals.

/// Ranking points are kept in twelfths so that tie splits stay integral.
pub const RANKING_UNIT: i64 = 12;

/// Convert four raw totals into placement points, in units of
/// `1 / RANKING_UNIT`.
///
/// Each entry earns two half-steps per opponent it strictly beats and one per
/// opponent it ties, giving a rank count in `0..=6`. Counts are scaled by six
/// and the entries sharing the top count split the winner's bonus
/// `12 / (7 - top)`. The best total always beats or ties the other three, so
/// `top` lies in `3..=6` and the bonus is one of 3, 4, 6 or 12.
///
/// A clean 1st/2nd/3rd/4th yields `[48, 24, 12, 0]`; a four-way tie yields
/// 21 for everybody.
#[must_use]
pub fn ranking_scores(points: [i64; 4]) -> [i64; 4] {
    let mut counts = [0_i64; 4];
    for (i, count) in counts.iter_mut().enumerate() {
        for (j, other) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            *count += i64::from(*other < points[i]) + i64::from(*other <= points[i]);
        }
    }

    let top = counts.iter().copied().max().unwrap_or(0);
    let bonus = RANKING_UNIT / (7 - top);
    counts.map(|count| {
        let scaled = count * 6;
        if count == top { scaled + bonus } else { scaled }
    })
}
