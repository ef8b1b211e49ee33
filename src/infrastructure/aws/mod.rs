/// AWS services integration.
///
/// This module contains AWS service implementations:
/// - SSM Parameter Store token storage

pub mod ssm;

pub use ssm::SsmTokenStore;
