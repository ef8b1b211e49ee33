/// Infrastructure layer for external integrations.
///
/// This module contains:
/// - AWS services integration (SSM Parameter Store)
/// - Local persistence (SQLite)

pub mod aws;
pub mod persistence;
