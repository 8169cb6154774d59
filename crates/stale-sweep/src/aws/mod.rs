//! AWS client modules
//!
//! This module provides wrappers around AWS SDK clients for:
//! - EC2: idle volume and instance listing
//! - CloudTrail: activity event lookup
//! - SNS: report notification
//! - STS: Account ID lookup

pub mod account;
pub mod cloudtrail;
pub mod context;
pub mod ec2;
pub mod error;
pub mod regional;
pub mod sns;

pub use account::{AccountId, get_current_account_id};
pub use cloudtrail::CloudTrailLog;
pub use context::{AwsContext, FromAwsContext};
pub use ec2::Ec2Inventory;
pub use error::{AwsError, classify_anyhow_error, classify_aws_error};
pub use regional::Regional;
pub use sns::SnsNotifier;

use chrono::{DateTime, Utc};

/// Convert an SDK timestamp into a chrono UTC timestamp.
pub(crate) fn to_utc(dt: &aws_sdk_ec2::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}
