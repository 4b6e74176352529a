//! Hand cricket against the computer
//!
//! `domain` holds the match engine and its rules, `infrastructure` the
//! opponent strategies and SQLite storage, `application` the stats use
//! cases and `cli` the terminal front-end.

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
