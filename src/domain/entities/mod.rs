mod match_record;
mod player_stats;

pub use match_record::*;
pub use player_stats::*;
