//! Utilities shared by the Stagecast binaries: logging setup and clocks.

pub mod logger;
pub mod time;
