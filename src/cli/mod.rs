//! Terminal front-end

pub mod render;
mod session;

pub use session::*;
