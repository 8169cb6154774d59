//! Configuration validation errors

use thiserror::Error;

/// Errors raised while turning raw settings into an [`AuditConfig`](crate::AuditConfig)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was not provided
    #[error("{0} is not set")]
    Missing(&'static str),

    /// IGNORE_WINDOW is not an integer
    #[error("IGNORE_WINDOW must be an integer number of days, got: {0:?}")]
    InvalidIgnoreWindow(String),

    /// IGNORE_WINDOW is outside the accepted range
    #[error("IGNORE_WINDOW must be between 1 and 90 days, got {0}")]
    IgnoreWindowOutOfRange(i64),

    /// DETAILED_NOTIFICATIONS is not TRUE or FALSE
    #[error("DETAILED_NOTIFICATIONS must be TRUE or FALSE, got: {0:?}")]
    InvalidNotificationToggle(String),

    /// SNS_ARN is blank
    #[error("SNS_ARN cannot be empty")]
    EmptySnsArn,

    /// REGIONS contains no region identifiers
    #[error("REGIONS must list at least one region, got: {0:?}")]
    EmptyRegions(String),

    /// Any other field rule failed
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
