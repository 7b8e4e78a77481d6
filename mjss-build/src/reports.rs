use anyhow::Result;
use colored::Colorize;
use mjss_game::ToleratedViolation;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use crate::pipeline::ProcessedSet;

/// Per-sheet line of the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct SetSummary {
    pub source: String,
    pub page: String,
    pub date: Option<String>,
    pub games: usize,
    pub counted_games: usize,
    pub players: usize,
    pub tolerated: Vec<ToleratedViolation>,
    pub excluded: Vec<usize>,
}

impl SetSummary {
    #[must_use]
    pub fn new(set: &ProcessedSet, page: String) -> Self {
        let games = set.validated.games().len();
        let excluded = set.standings.excluded().to_vec();
        Self {
            source: set.source.display().to_string(),
            page,
            date: set.validated.date().map(|date| date.to_string()),
            games,
            counted_games: games.saturating_sub(excluded.len()),
            players: set.standings.standings().len(),
            tolerated: set.validated.diagnostics(),
            excluded,
        }
    }

    fn date_or_undated(&self) -> &str {
        self.date.as_deref().unwrap_or("undated")
    }
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    summaries: &[SetSummary],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Standings Build Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==========================".cyan())?;

    let total_games: usize = summaries.iter().map(|s| s.games).sum();
    let counted_games: usize = summaries.iter().map(|s| s.counted_games).sum();
    let tolerated: usize = summaries.iter().map(|s| s.tolerated.len()).sum();

    writeln!(out, "Score sheets: {}", summaries.len())?;
    writeln!(out, "Games: {total_games} ({counted_games} counted)")?;
    if tolerated == 0 {
        writeln!(out, "Tolerated violations: {}", tolerated.to_string().green())?;
    } else {
        writeln!(out, "Tolerated violations: {}", tolerated.to_string().yellow())?;
    }
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for summary in summaries {
        writeln!(
            out,
            "{} {}",
            "✅".green(),
            summary.date_or_undated().bold()
        )?;
        writeln!(out, "   Source: {}", summary.source)?;
        writeln!(out, "   Page: {}", summary.page)?;
        writeln!(
            out,
            "   Games: {}/{} counted, {} players",
            summary.counted_games, summary.games, summary.players
        )?;
        if !summary.tolerated.is_empty() {
            writeln!(out, "   Tolerated:")?;
            for violation in &summary.tolerated {
                let line = format!(
                    "[{}] {} ({})",
                    violation.game_index, violation.kind, violation.tolerance
                );
                writeln!(out, "     • {}", line.yellow())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, summaries: &[SetSummary]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(summaries)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    summaries: &[SetSummary],
) -> Result<()> {
    writeln!(out, "# Standings Build Results\n")?;

    let total_games: usize = summaries.iter().map(|s| s.games).sum();
    let counted_games: usize = summaries.iter().map(|s| s.counted_games).sum();

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Score sheets**: {}", summaries.len())?;
    writeln!(out, "- **Games**: {total_games}")?;
    writeln!(out, "- **Counted games**: {counted_games}\n")?;

    writeln!(out, "## Sheets\n")?;
    for summary in summaries {
        writeln!(out, "### {}\n", summary.date_or_undated())?;
        writeln!(out, "- **Source**: `{}`", summary.source)?;
        writeln!(out, "- **Page**: [{0}]({0})", summary.page)?;
        writeln!(
            out,
            "- **Games**: {}/{} counted",
            summary.counted_games, summary.games
        )?;
        writeln!(out, "- **Players**: {}", summary.players)?;
        if !summary.tolerated.is_empty() {
            writeln!(out, "- **Tolerated violations**:")?;
            for violation in &summary.tolerated {
                writeln!(
                    out,
                    "  - game {}: {} ({})",
                    violation.game_index, violation.kind, violation.tolerance
                )?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
