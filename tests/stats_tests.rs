//! Persistence and stats use case tests
//!
//! Each test gets its own in-memory SQLite database.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::mock::StepRng;
use rand::RngCore;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::io::BufReader;
use tokio::sync::watch;

use hand_cricket::application::match_results::{
    GetLeaderboard, GetPlayerStats, RecordMatchResult, RecordMatchResultError,
};
use hand_cricket::cli::Session;
use hand_cricket::domain::entities::{MatchRecord, PlayerStats};
use hand_cricket::domain::repositories::{RepositoryError, StatsRepository};
use hand_cricket::domain::services::{MatchEngine, MatchSummary, Winner};
use hand_cricket::domain::value_objects::{
    Difficulty, MatchState, PlayerRole, TossChoice, TurnRecord,
};
use hand_cricket::infrastructure::app_state::{AppConfig, AppState};
use hand_cricket::infrastructure::bot::strategies::BotStrategy;
use hand_cricket::infrastructure::database::repositories::SqliteStatsRepository;

struct ScriptedStrategy(Vec<u8>);

impl BotStrategy for ScriptedStrategy {
    fn choose(&self, history: &[TurnRecord], _user_role: PlayerRole, _rng: &mut dyn RngCore) -> u8 {
        self.0[history.len() % self.0.len()]
    }
}

/// Helper to create a repository on a fresh in-memory database
async fn create_test_repo() -> Arc<SqliteStatsRepository> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let repo = Arc::new(SqliteStatsRepository::new(pool));
    repo.init().await.unwrap();
    repo
}

/// Helper to create app state on a fresh in-memory database
async fn create_test_app(turn_delay: Duration) -> AppState {
    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        turn_delay,
    };
    AppState::new(config).await.unwrap()
}

/// Finished match: user bats first for `runs`, computer is out first ball of the chase
fn finished_match(name: &str, runs: u8) -> MatchState {
    // Ball 1: user scores `runs` against 6 (or 5), ball 2: out, ball 3: computer out
    let miss = if runs == 6 { 5 } else { 6 };
    let mut engine = MatchEngine::with_parts(
        name,
        Difficulty::Hard,
        StepRng::new(0, 0),
        Box::new(ScriptedStrategy(vec![miss, 1, 2])),
    )
    .unwrap();
    engine.perform_toss(TossChoice::Heads).unwrap();
    engine.set_role(PlayerRole::Batting).unwrap();
    engine.play_turn(runs).unwrap();
    engine.play_turn(1).unwrap();
    engine.start_second_innings().unwrap();
    engine.play_turn(2).unwrap();
    engine.into_state()
}

// ============================================================================
// Repository
// ============================================================================

#[tokio::test]
async fn test_unknown_player_has_zeroed_stats() {
    let repo = create_test_repo().await;

    let stats = repo.get_stats("Nobody").await.unwrap();
    assert_eq!(stats, PlayerStats::new("Nobody"));
}

#[tokio::test]
async fn test_save_stats_upserts() {
    let repo = create_test_repo().await;

    let mut stats = PlayerStats::new("Asha");
    stats.matches_played = 2;
    stats.wins = 1;
    stats.losses = 1;
    stats.total_runs = 30;
    stats.high_score = 21;
    repo.save_stats(&stats).await.unwrap();

    stats.matches_played = 3;
    stats.ties = 1;
    repo.save_stats(&stats).await.unwrap();

    assert_eq!(repo.get_stats("Asha").await.unwrap(), stats);
}

#[tokio::test]
async fn test_leaderboard_orders_by_high_score() {
    let repo = create_test_repo().await;

    for (name, high_score, wins) in [("Asha", 20, 5), ("Ravi", 44, 1), ("Meera", 20, 7), ("Dev", 3, 0)] {
        let mut stats = PlayerStats::new(name);
        stats.matches_played = 10;
        stats.high_score = high_score;
        stats.wins = wins;
        repo.save_stats(&stats).await.unwrap();
    }

    let board = repo.get_leaderboard(3).await.unwrap();
    let names: Vec<&str> = board.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Ravi", "Meera", "Asha"]);
}

#[tokio::test]
async fn test_record_match_rolls_back_stats_when_log_insert_fails() {
    let repo = create_test_repo().await;

    let state = finished_match("Asha", 4);
    let summary = MatchSummary::from_state(&state).unwrap();
    let record = MatchRecord::new(&summary, &state);
    repo.save_match(&record).await.unwrap();

    // Same id again: the log insert fails after the stats upsert ran
    let mut stats = PlayerStats::new("Asha");
    stats.record_match(summary.final_score, &summary.outcome);
    let err = repo.record_match(&stats, &record).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Database(_)));

    assert_eq!(repo.get_stats("Asha").await.unwrap(), PlayerStats::new("Asha"));
    assert_eq!(repo.recent_matches("Asha", 10).await.unwrap().len(), 1);
}

// ============================================================================
// Use cases
// ============================================================================

#[tokio::test]
async fn test_record_match_result_updates_stats_and_log() {
    let repo = create_test_repo().await;
    let use_case = RecordMatchResult::new(repo.clone());

    let state = finished_match("Asha", 4);
    let output = use_case.execute(&state).await.unwrap();

    assert_eq!(output.outcome.winner, Winner::User);
    assert_eq!(output.stats.matches_played, 1);
    assert_eq!(output.stats.wins, 1);
    assert_eq!(output.stats.high_score, 4);

    let history = GetPlayerStats::new(repo.clone()).execute("Asha").await.unwrap();
    assert_eq!(history.stats, output.stats);
    assert_eq!(history.recent_matches.len(), 1);

    let record = &history.recent_matches[0];
    assert_eq!(record.id, output.match_id);
    assert_eq!(record.winner, Winner::User);
    assert_eq!(record.history, state.history);
    assert_eq!(record.target, 5);
}

#[tokio::test]
async fn test_record_match_result_accumulates() {
    let repo = create_test_repo().await;
    let use_case = RecordMatchResult::new(repo.clone());

    use_case.execute(&finished_match("Asha", 3)).await.unwrap();
    use_case.execute(&finished_match("Asha", 6)).await.unwrap();
    use_case.execute(&finished_match("Ravi", 2)).await.unwrap();

    let stats = repo.get_stats("Asha").await.unwrap();
    assert_eq!(stats.matches_played, 2);
    assert_eq!(stats.total_runs, 9);
    assert_eq!(stats.high_score, 6);

    let board = GetLeaderboard::new(repo.clone()).execute(0).await.unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].name, "Asha");
}

#[tokio::test]
async fn test_unfinished_match_is_not_recorded() {
    let repo = create_test_repo().await;
    let use_case = RecordMatchResult::new(repo.clone());

    let engine = MatchEngine::new("Asha", Difficulty::Easy).unwrap();
    let err = use_case.execute(engine.state()).await.err().unwrap();

    assert!(matches!(err, RecordMatchResultError::NotFinished(_)));
    assert_eq!(repo.get_stats("Asha").await.unwrap().matches_played, 0);
}

// ============================================================================
// Terminal session
// ============================================================================

#[tokio::test]
async fn test_session_plays_and_records_a_match() {
    let state = create_test_app(Duration::ZERO).await;

    // Name, difficulty, toss, role, then plenty of shots; the match ends
    // long before the 1s run out and the final q quits.
    let mut script = String::from("\nAsha\neasy\nheads\nbat\n");
    for _ in 0..400 {
        script.push_str("1\n");
    }
    script.push_str("q\n");

    let mut session = Session::new(
        &state.config,
        state.stats_repo.clone(),
        script.as_bytes(),
        Vec::new(),
    )
    .with_seed(7);
    session.run().await.unwrap();

    let output = String::from_utf8(session.into_output()).unwrap();
    assert!(output.contains("Player name is required"));
    assert!(output.contains("Innings 2"));
    assert!(output.contains("Thanks for playing!"));

    let stats = state.stats_repo.get_stats("Asha").await.unwrap();
    assert_eq!(stats.matches_played, 1);
    assert_eq!(stats.wins + stats.losses + stats.ties, 1);
}

#[tokio::test]
async fn test_shutdown_discards_pending_turn() {
    let state = create_test_app(Duration::from_secs(30)).await;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Whether or not the toss is won, "3" is the first shot played
    let script = "Asha\neasy\nheads\nbat\n3\n4\n";
    let mut session = Session::new(
        &state.config,
        state.stats_repo.clone(),
        script.as_bytes(),
        Vec::new(),
    )
    .with_seed(7)
    .with_shutdown(shutdown_rx);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = shutdown_tx.send(true);
    });

    tokio::time::timeout(Duration::from_secs(5), session.run())
        .await
        .expect("session kept waiting after shutdown")
        .unwrap();

    let output = String::from_utf8(session.into_output()).unwrap();
    assert!(output.contains("Turn abandoned."));
    assert!(!output.contains("You showed"));

    let stats = state.stats_repo.get_stats("Asha").await.unwrap();
    assert_eq!(stats.matches_played, 0);
    assert!(state.stats_repo.recent_matches("Asha", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_shutdown_ends_session_waiting_at_prompt() {
    let state = create_test_app(Duration::ZERO).await;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Nothing is ever written, so the name prompt blocks until shutdown
    let (_keyboard, stdin) = tokio::io::duplex(64);
    let mut session = Session::new(
        &state.config,
        state.stats_repo.clone(),
        BufReader::new(stdin),
        Vec::new(),
    )
    .with_shutdown(shutdown_rx);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = shutdown_tx.send(true);
    });

    tokio::time::timeout(Duration::from_secs(5), session.run())
        .await
        .expect("session kept waiting after shutdown")
        .unwrap();

    let output = String::from_utf8(session.into_output()).unwrap();
    assert!(output.contains("Player name> "));
}
