mod match_outcome;
mod match_state;

pub use match_outcome::*;
pub use match_state::*;
