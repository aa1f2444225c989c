//! Monte Carlo estimator for tabletop wargame attack sequences.
//!
//! [combat] holds the engine: difficulty derivation, the touch → hurt →
//! armor save → invulnerability save pipeline and the batch drivers.
//! Everything else is plumbing around it.

pub mod cli;
pub mod combat;
pub mod config;
pub mod error;
pub mod parallel;
pub mod report;
pub mod server;
