mod get_leaderboard;
mod get_player_stats;
mod record_match_result;

pub use get_leaderboard::*;
pub use get_player_stats::*;
pub use record_match_result::*;
