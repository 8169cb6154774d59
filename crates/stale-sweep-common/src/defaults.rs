//! Names and limits shared by the loader and the binary

/// Environment variable holding the ignore window in days
pub const ENV_IGNORE_WINDOW: &str = "IGNORE_WINDOW";

/// Environment variable holding the SNS topic ARN
pub const ENV_SNS_ARN: &str = "SNS_ARN";

/// Environment variable holding the TRUE/FALSE notification toggle
pub const ENV_DETAILED_NOTIFICATIONS: &str = "DETAILED_NOTIFICATIONS";

/// Environment variable holding the region list
pub const ENV_REGIONS: &str = "REGIONS";

/// Smallest accepted ignore window, in days
pub const MIN_IGNORE_WINDOW_DAYS: u32 = 1;

/// Largest accepted ignore window, in days (CloudTrail event history retention)
pub const MAX_IGNORE_WINDOW_DAYS: u32 = 90;

/// Page size requested from CloudTrail `LookupEvents` (the API maximum)
pub const LOOKUP_EVENTS_PAGE_SIZE: i32 = 50;
