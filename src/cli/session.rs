//! Interactive terminal session
//!
//! Drives the match engine from text input. The engine never waits;
//! the pause before a turn is resolved lives here and can be abandoned.
//! A shutdown request ends the session at any prompt or pending turn.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::watch;

use crate::application::match_results::{
    GetLeaderboard, GetPlayerStats, RecordMatchResult, DEFAULT_LEADERBOARD_SIZE,
};
use crate::cli::render;
use crate::domain::errors::MatchError;
use crate::domain::repositories::StatsRepository;
use crate::domain::services::{
    parse_choice, parse_difficulty, parse_role, parse_toss_choice, validate_player_name,
    MatchEngine,
};
use crate::domain::value_objects::{Difficulty, MatchPhase, MatchState};
use crate::infrastructure::app_state::AppConfig;

/// What the player picked once a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchEnd {
    Rematch,
    Menu,
    Quit,
}

/// Result of waiting out the turn delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pacing {
    Ready,
    Cancelled,
}

/// Terminal front-end reading lines from `R` and writing to `W`
pub struct Session<S, R, W>
where
    S: StatsRepository,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    stats_repo: Arc<S>,
    input: Lines<R>,
    out: W,
    turn_delay: Duration,
    seed: Option<u64>,
    matches_started: u64,
    shutdown: watch::Receiver<bool>,
}

impl<S, R, W> Session<S, R, W>
where
    S: StatsRepository,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(config: &AppConfig, stats_repo: Arc<S>, input: R, out: W) -> Self {
        Self {
            stats_repo,
            input: input.lines(),
            out,
            turn_delay: config.turn_delay,
            seed: None,
            matches_started: 0,
            shutdown: watch::channel(false).1,
        }
    }

    /// End the session once `true` is sent on this channel
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Make every match reproducible: match `n` uses `seed + n`
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until the player quits or input ends
    pub async fn run(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "HAND CRICKET PRO")?;

        loop {
            self.show_leaderboard().await?;

            let Some(name) = self.prompt_name().await? else {
                return Ok(());
            };
            let Some(difficulty) = self.prompt_difficulty().await? else {
                return Ok(());
            };
            self.show_player_stats(&name).await?;

            loop {
                match self.play_match(&name, difficulty).await? {
                    MatchEnd::Rematch => continue,
                    MatchEnd::Menu => break,
                    MatchEnd::Quit => {
                        writeln!(self.out, "Thanks for playing!")?;
                        return Ok(());
                    }
                }
            }
        }
    }

    async fn play_match(&mut self, name: &str, difficulty: Difficulty) -> anyhow::Result<MatchEnd> {
        let mut engine = match self.seed {
            Some(seed) => MatchEngine::with_seed(name, difficulty, seed.wrapping_add(self.matches_started))?,
            None => MatchEngine::new(name, difficulty)?,
        };
        self.matches_started += 1;

        writeln!(self.out, "\n{}", render::render_state(engine.state()))?;

        loop {
            let phase = engine.state().phase;
            if phase == MatchPhase::GameOver {
                self.record_result(engine.state()).await?;
                return self.prompt_after_match().await;
            }

            let prompt = render::prompt_for(engine.state());
            let Some(line) = self.read_line(prompt).await? else {
                return Ok(MatchEnd::Quit);
            };
            if is_quit(&line) {
                tracing::info!("Match abandoned by player");
                writeln!(self.out, "Match abandoned.")?;
                return Ok(MatchEnd::Menu);
            }

            let result = match phase {
                MatchPhase::Toss => parse_toss_choice(&line).and_then(|c| engine.perform_toss(c)),
                MatchPhase::TossResult => parse_role(&line).and_then(|r| engine.set_role(r)),
                MatchPhase::Innings1 | MatchPhase::Innings2 => match parse_choice(&line) {
                    Ok(number) => {
                        // Input stays closed until the pending turn resolves or is dropped
                        if self.pace().await == Pacing::Cancelled {
                            tracing::info!("Pending turn discarded");
                            writeln!(self.out, "\nTurn abandoned.")?;
                            return Ok(MatchEnd::Quit);
                        }
                        engine.play_turn(number)
                    }
                    Err(e) => Err(e),
                },
                MatchPhase::MidInnings => engine.start_second_innings(),
                MatchPhase::GameOver => Err(MatchError::phase("read input", phase)),
            };

            match result {
                Ok(state) => writeln!(self.out, "{}", render::render_state(&state))?,
                Err(e) => {
                    tracing::debug!("Rejected input {:?}: {}", line, e);
                    writeln!(self.out, "{}", e)?;
                }
            }
        }
    }

    /// Wait out the turn delay unless shutdown is requested
    async fn pace(&mut self) -> Pacing {
        if *self.shutdown.borrow() {
            return Pacing::Cancelled;
        }
        if self.turn_delay.is_zero() {
            return Pacing::Ready;
        }
        tokio::select! {
            _ = tokio::time::sleep(self.turn_delay) => Pacing::Ready,
            _ = shutdown_requested(&mut self.shutdown) => Pacing::Cancelled,
        }
    }

    async fn record_result(&mut self, state: &MatchState) -> anyhow::Result<()> {
        let use_case = RecordMatchResult::new(self.stats_repo.clone());
        match use_case.execute(state).await {
            Ok(output) => {
                writeln!(self.out, "{}", render::render_stats(&output.stats))?;
            }
            Err(e) => {
                tracing::error!("Failed to record match: {}", e);
                writeln!(self.out, "Could not save stats: {}", e)?;
            }
        }
        Ok(())
    }

    async fn prompt_after_match(&mut self) -> anyhow::Result<MatchEnd> {
        loop {
            let Some(line) = self.read_line("[r]ematch, [m]enu or [q]uit").await? else {
                return Ok(MatchEnd::Quit);
            };
            match line.to_lowercase().as_str() {
                "r" | "rematch" => return Ok(MatchEnd::Rematch),
                "m" | "menu" => return Ok(MatchEnd::Menu),
                "q" | "quit" => return Ok(MatchEnd::Quit),
                _ => writeln!(self.out, "Please enter r, m or q.")?,
            }
        }
    }

    async fn prompt_name(&mut self) -> anyhow::Result<Option<String>> {
        loop {
            let Some(line) = self.read_line("Player name").await? else {
                return Ok(None);
            };
            match validate_player_name(&line) {
                Ok(name) => return Ok(Some(name)),
                Err(e) => writeln!(self.out, "{}", e)?,
            }
        }
    }

    async fn prompt_difficulty(&mut self) -> anyhow::Result<Option<Difficulty>> {
        loop {
            let Some(line) = self.read_line("Difficulty [easy/medium/hard] (medium)").await? else {
                return Ok(None);
            };
            if line.is_empty() {
                return Ok(Some(Difficulty::default()));
            }
            match parse_difficulty(&line) {
                Ok(difficulty) => return Ok(Some(difficulty)),
                Err(e) => writeln!(self.out, "{}", e)?,
            }
        }
    }

    async fn show_leaderboard(&mut self) -> anyhow::Result<()> {
        let use_case = GetLeaderboard::new(self.stats_repo.clone());
        match use_case.execute(DEFAULT_LEADERBOARD_SIZE).await {
            Ok(entries) if !entries.is_empty() => {
                writeln!(self.out, "{}", render::render_leaderboard(&entries))?;
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to load leaderboard: {}", e),
        }
        Ok(())
    }

    async fn show_player_stats(&mut self, name: &str) -> anyhow::Result<()> {
        let use_case = GetPlayerStats::new(self.stats_repo.clone());
        match use_case.execute(name).await {
            Ok(output) if output.stats.matches_played > 0 => {
                writeln!(self.out, "{}", render::render_stats(&output.stats))?;
                for record in &output.recent_matches {
                    writeln!(self.out, "  {}", render::render_match_line(record))?;
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to load stats for {}: {}", name, e),
        }
        Ok(())
    }

    async fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        write!(self.out, "{}> ", prompt)?;
        self.out.flush()?;
        // Shutdown reads like end of input
        let line = tokio::select! {
            line = self.input.next_line() => line?,
            _ = shutdown_requested(&mut self.shutdown) => {
                tracing::info!("Shutdown requested at prompt");
                None
            }
        };
        Ok(line.map(|l| l.trim().to_string()))
    }
}

/// Resolves once `true` is sent; never if the sender is dropped first
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let closed = shutdown.wait_for(|&stop| stop).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

fn is_quit(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "q" | "quit")
}
