//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod config_validation;
pub mod error;
