//! stale-sweep-common - Domain types for the stale resource audit
//!
//! Everything here is independent of the AWS SDK so the audit rules can be
//! exercised with synthetic inputs.
//!
//! ## Modules
//!
//! - [`activity`]: CloudTrail activity records and touched-id extraction
//! - [`config`]: Settings loading and validation
//! - [`defaults`]: Setting names and limits
//! - [`error`]: Configuration errors
//! - [`report`]: Stale report and the resolver
//! - [`resource`]: Candidate volume/instance records
//! - [`resource_kind`]: Per-kind descriptors
//! - [`window`]: Ignore-window cutoff arithmetic

pub mod activity;
pub mod config;
pub mod defaults;
pub mod error;
pub mod report;
pub mod resource;
pub mod resource_kind;
pub mod window;

// Re-export commonly used types
pub use activity::{ActivityRecord, ActivityResource};
pub use config::{AuditConfig, RawSettings};
pub use error::ConfigError;
pub use report::{ActivityIndex, Inventory, KindMap, RegionMap, StaleReport};
pub use resource::{
    BlockDeviceMapping, CandidateResource, EbsAttachment, InstanceRecord, VolumeRecord,
};
pub use resource_kind::ResourceKind;
