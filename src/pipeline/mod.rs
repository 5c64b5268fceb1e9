//! Run orchestration for the four subcommands. Each run is a single
//! synchronous pass: build records in memory, write the artifact, exit.

pub mod fetch;
pub mod merge;
pub mod predict;
pub mod verify;
