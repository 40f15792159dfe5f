//! ichimoku — Ichimoku Cloud hot/cold analyzer.
//!
//! Hexagonal architecture: the pure indicator engine lives in [`domain`],
//! port traits in [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
