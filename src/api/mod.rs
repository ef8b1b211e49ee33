//! API Lambda handler and request processing

pub mod event_handler;
pub mod handler;
pub mod helpers;
pub mod oauth;
pub mod parsing;
pub mod signature;
pub mod slash_handler;
pub mod state;

// Re-export the main handler for convenience
pub use handler::{function_handler, route};
pub use state::AppState;
