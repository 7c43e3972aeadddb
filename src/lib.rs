//! VYRE — friendly predictions with pari-mutuel settlement.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod settlement;
pub mod prediction;
pub mod group;
pub mod payments;
pub mod router;
pub mod input;
