//! Rule-based diabetes screening.
//!
//! A read-only knowledge base of diagnostic rules is evaluated against a
//! patient's intake data, producing ordered rule matches and one consolidated
//! recommendation.

pub mod api;
pub mod config;
pub mod error;
pub mod screening;
pub mod telemetry;
