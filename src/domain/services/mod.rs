mod match_engine;
mod outcome;

pub use match_engine::*;
pub use outcome::*;
