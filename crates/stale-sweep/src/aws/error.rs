//! AWS error classification
//!
//! Labels AWS SDK failures by their error code (via `ProvideErrorMetadata`)
//! so degraded queries and failed notifications are logged with a useful
//! category. Nothing here retries.

use thiserror::Error;

/// AWS error categories
#[derive(Debug, Error)]
pub enum AwsError {
    /// Target resource (e.g. SNS topic) does not exist
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    /// Caller lacks permission for the operation
    #[error("Access denied: {message}")]
    AccessDenied { message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    Throttled,

    /// Request was rejected as malformed (bad ARN, bad filter, ...)
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Generic AWS SDK error with code and message
    #[error("AWS error: {message}")]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

impl AwsError {
    /// Short machine-friendly label for log fields
    pub fn category(&self) -> &'static str {
        match self {
            AwsError::NotFound { .. } => "not_found",
            AwsError::AccessDenied { .. } => "access_denied",
            AwsError::Throttled => "throttled",
            AwsError::InvalidParameter { .. } => "invalid_parameter",
            AwsError::Sdk { .. } => "sdk",
        }
    }
}

/// Error codes meaning the target does not exist
const NOT_FOUND_CODES: &[&str] = &["NotFound", "NotFoundException", "TrailNotFoundException"];

/// Error codes meaning the caller is not allowed
const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "AuthorizationError",
    "UnauthorizedOperation",
    "AuthFailure",
];

/// Error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &["Throttling", "ThrottlingException", "RequestLimitExceeded"];

/// Error codes for rejected parameters
const INVALID_PARAMETER_CODES: &[&str] = &[
    "InvalidParameter",
    "InvalidParameterValue",
    "InvalidParameterException",
    "InvalidParameterCombination",
    "InvalidLookupAttributesException",
    "InvalidTimeRangeException",
    "InvalidNextTokenException",
];

/// Classify an AWS error from its code and message.
pub fn classify_aws_error(code: Option<&str>, message: Option<&str>) -> AwsError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if NOT_FOUND_CODES.contains(&c) => AwsError::NotFound { message },
        Some(c) if ACCESS_DENIED_CODES.contains(&c) => AwsError::AccessDenied { message },
        Some(c) if THROTTLING_CODES.contains(&c) => AwsError::Throttled,
        Some(c) if INVALID_PARAMETER_CODES.contains(&c) => AwsError::InvalidParameter { message },
        _ => AwsError::Sdk {
            code: code.map(|s| s.to_string()),
            message,
        },
    }
}

/// Classify an `anyhow::Error` by walking its chain for a known SDK error.
pub fn classify_anyhow_error(error: &anyhow::Error) -> AwsError {
    use aws_sdk_ec2::error::ProvideErrorMetadata;

    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<aws_sdk_ec2::error::SdkError<
            aws_sdk_ec2::operation::describe_volumes::DescribeVolumesError,
        >>() {
            let meta = ProvideErrorMetadata::meta(e);
            return classify_aws_error(meta.code(), meta.message());
        }
        if let Some(e) = cause.downcast_ref::<aws_sdk_ec2::error::SdkError<
            aws_sdk_ec2::operation::describe_instances::DescribeInstancesError,
        >>() {
            let meta = ProvideErrorMetadata::meta(e);
            return classify_aws_error(meta.code(), meta.message());
        }
        if let Some(e) = cause.downcast_ref::<aws_sdk_cloudtrail::error::SdkError<
            aws_sdk_cloudtrail::operation::lookup_events::LookupEventsError,
        >>() {
            let meta = ProvideErrorMetadata::meta(e);
            return classify_aws_error(meta.code(), meta.message());
        }
        if let Some(e) = cause.downcast_ref::<aws_sdk_sns::error::SdkError<
            aws_sdk_sns::operation::publish::PublishError,
        >>() {
            let meta = ProvideErrorMetadata::meta(e);
            return classify_aws_error(meta.code(), meta.message());
        }
    }

    // Fallback: look for a `code: Some("...")` pattern in the debug output
    let debug_str = format!("{:?}", error);
    if let Some(code) = extract_error_code(&debug_str) {
        return classify_aws_error(Some(&code), Some(&error.to_string()));
    }

    AwsError::Sdk {
        code: None,
        message: error.to_string(),
    }
}

/// Extract an AWS error code from a debug string representation
fn extract_error_code(debug_str: &str) -> Option<String> {
    let start = debug_str.find("code: Some(\"")?;
    let rest = &debug_str[start + 12..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}
