//! Utilities shared by the command-line front end.

pub mod timer;

pub use timer::{Timer, TimingStats};
