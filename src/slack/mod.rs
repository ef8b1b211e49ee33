//! All Slack-specific functionality

pub mod client;
pub mod command_parser;
pub mod response_builder;

// Re-export main types for convenience
pub use client::{PostMessageResponse, SlackClient};
pub use command_parser::SlackCommandEvent;
