/// Persistence layer implementations.
///
/// This module contains data persistence implementations:
/// - SQLite token storage

pub mod sqlite;

pub use sqlite::SqliteTokenStore;
