//! Text rendering of match snapshots and stats

use std::fmt::Write;

use crate::domain::entities::{LeaderboardEntry, MatchRecord, PlayerStats};
use crate::domain::value_objects::{MatchPhase, MatchState, PlayerRole, Winner};

/// Prompt shown while waiting for input in a phase
pub fn prompt_for(state: &MatchState) -> &'static str {
    match state.phase {
        MatchPhase::Toss => "Heads or tails? [h/t]",
        MatchPhase::TossResult => "Bat or bowl? [bat/bowl]",
        MatchPhase::Innings1 | MatchPhase::Innings2 => match state.user_role {
            PlayerRole::Batting => "Your shot (1-6)",
            PlayerRole::Bowling => "Your delivery (1-6)",
        },
        MatchPhase::MidInnings => "Press Enter to start the 2nd innings",
        MatchPhase::GameOver => "[r]ematch, [m]enu or [q]uit",
    }
}

/// Scoreboard plus the latest narration
pub fn render_state(state: &MatchState) -> String {
    let mut out = String::new();

    if state.phase >= MatchPhase::Innings1 {
        let role = match state.user_role {
            PlayerRole::Batting => "batting",
            PlayerRole::Bowling => "bowling",
        };
        let _ = write!(
            out,
            "[Innings {} | you {} | You {} - Computer {}",
            state.current_innings, role, state.score, state.computer_score
        );
        if let Some(target) = state.target {
            let _ = write!(out, " | Target {}", target);
        }
        if let Some(needed) = state.runs_needed() {
            let _ = write!(out, " | Need {}", needed);
        }
        out.push_str("]\n");
    }

    if let (Some(user), Some(ai)) = (state.user_last_choice, state.ai_last_choice) {
        let _ = writeln!(out, "You showed {}, computer showed {}.", user, ai);
    }

    out.push_str(&state.message);
    out
}

pub fn render_stats(stats: &PlayerStats) -> String {
    format!(
        "{}: played {} | W {} L {} T {} | HS {} | avg {:.1}",
        stats.name,
        stats.matches_played,
        stats.wins,
        stats.losses,
        stats.ties,
        stats.high_score,
        stats.average_score()
    )
}

pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    let mut out = String::from("Local Leaderboard\n");
    for (idx, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<16} {:>4} runs  {} wins",
            idx + 1,
            entry.name,
            entry.high_score,
            entry.wins
        );
    }
    out
}

pub fn render_match_line(record: &MatchRecord) -> String {
    let result = match record.winner {
        Winner::User => "won",
        Winner::Computer => "lost",
        Winner::Tie => "tied",
    };
    format!(
        "{} vs {} computer: you {} - computer {} ({} turns)",
        result,
        record.difficulty.as_str(),
        record.user_score,
        record.computer_score,
        record.turns()
    )
}
