//! stale-sweep - idle EC2 resource auditor
//!
//! Finds EBS volumes and EC2 instances that sit in an idle state, predate the
//! ignore window, and have no CloudTrail activity inside it. The report is
//! printed as JSON and optionally published to SNS.

pub mod audit;
pub mod aws;
