//! Configuration, domain types and the credential store seam.

pub mod config;
pub mod models;
pub mod user_tokens;
