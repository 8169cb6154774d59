//! End-to-end audit scenarios against in-memory collaborators
//!
//! These run the full pipeline (enumerate, scan, resolve, report, notify)
//! without touching AWS.

use anyhow::{Result, bail};
use chrono::{DateTime, Duration, TimeZone, Utc};
use stale_sweep::audit::{
    ActivityOperations, ActivityPage, AuditStage, Auditor, InventoryOperations,
    NotificationStatus, NotifyOperations, ResourcePage,
};
use stale_sweep_common::{
    ActivityRecord, ActivityResource, AuditConfig, CandidateResource, InstanceRecord,
    RawSettings, ResourceKind, VolumeRecord,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

fn config(regions: &str, detailed: &str) -> AuditConfig {
    AuditConfig::try_from(RawSettings {
        ignore_window: Some("30".to_string()),
        sns_arn: Some("arn:aws:sns:us-east-1:123456789012:stale".to_string()),
        detailed_notifications: Some(detailed.to_string()),
        regions: Some(regions.to_string()),
    })
    .unwrap()
}

fn volume(id: &str, age_days: i64) -> CandidateResource {
    VolumeRecord {
        state: "available".to_string(),
        volume_id: id.to_string(),
        create_time: now() - Duration::days(age_days),
        size: Some(100),
        volume_type: Some("gp3".to_string()),
        availability_zone: None,
    }
    .into()
}

fn instance(id: &str, state: &str, age_days: i64) -> CandidateResource {
    InstanceRecord {
        instance_id: id.to_string(),
        launch_time: now() - Duration::days(age_days),
        state: state.to_string(),
        instance_type: Some("t3.micro".to_string()),
        block_device_mappings: Vec::new(),
    }
    .into()
}

fn touched(kind: ResourceKind, id: &str, age_days: i64) -> ActivityRecord {
    ActivityRecord {
        event_name: Some("AttachVolume".to_string()),
        event_time: Some(now() - Duration::days(age_days)),
        resources: vec![ActivityResource::new(kind.cloudtrail_type(), id)],
        ..Default::default()
    }
}

/// Serves fixed pages keyed by (region, kind, token)
#[derive(Default)]
struct FakeInventory {
    pages: HashMap<(String, ResourceKind, Option<String>), ResourcePage>,
    failing: Vec<(String, ResourceKind)>,
}

impl FakeInventory {
    fn single_page(
        mut self,
        region: &str,
        kind: ResourceKind,
        resources: Vec<CandidateResource>,
    ) -> Self {
        self.pages.insert(
            (region.to_string(), kind, None),
            ResourcePage {
                resources,
                next_token: None,
            },
        );
        self
    }
}

impl InventoryOperations for FakeInventory {
    async fn list_resources_page(
        &self,
        region: &str,
        kind: ResourceKind,
        next_token: Option<String>,
    ) -> Result<ResourcePage> {
        if self.failing.iter().any(|(r, k)| r == region && *k == kind) {
            bail!("UnauthorizedOperation: not allowed in {region}");
        }
        Ok(self
            .pages
            .get(&(region.to_string(), kind, next_token))
            .cloned()
            .unwrap_or_default())
    }
}

/// Serves a chain of pages per (region, kind); token `n` selects page `n`
#[derive(Default)]
struct FakeActivity {
    pages: HashMap<(String, ResourceKind), Vec<Vec<ActivityRecord>>>,
    starts: Arc<Mutex<Vec<DateTime<Utc>>>>,
}

impl FakeActivity {
    fn with_pages(
        mut self,
        region: &str,
        kind: ResourceKind,
        pages: Vec<Vec<ActivityRecord>>,
    ) -> Self {
        self.pages.insert((region.to_string(), kind), pages);
        self
    }
}

impl ActivityOperations for FakeActivity {
    async fn lookup_events_page(
        &self,
        region: &str,
        kind: ResourceKind,
        start_time: DateTime<Utc>,
        next_token: Option<String>,
    ) -> Result<ActivityPage> {
        self.starts.lock().unwrap().push(start_time);

        let Some(pages) = self.pages.get(&(region.to_string(), kind)) else {
            return Ok(ActivityPage::default());
        };
        let index: usize = next_token.map_or(0, |t| t.parse().unwrap());
        let next_token = (index + 1 < pages.len()).then(|| (index + 1).to_string());
        Ok(ActivityPage {
            events: pages[index].clone(),
            next_token,
        })
    }
}

#[derive(Default)]
struct FakeNotifier {
    fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl NotifyOperations for FakeNotifier {
    async fn publish(&self, destination: &str, message: &str) -> Result<String> {
        if self.fail {
            bail!("AuthorizationError: not authorized to publish");
        }
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), message.to_string()));
        Ok("message-1".to_string())
    }
}

#[tokio::test]
async fn test_single_region_scenario() {
    let inventory = FakeInventory::default()
        .single_page(
            "us-east-1",
            ResourceKind::Volume,
            vec![volume("vol-idle", 40), volume("vol-busy", 40)],
        )
        .single_page(
            "us-east-1",
            ResourceKind::Instance,
            vec![instance("i-young", "stopped", 10)],
        );
    let activity = FakeActivity::default().with_pages(
        "us-east-1",
        ResourceKind::Volume,
        vec![vec![touched(ResourceKind::Volume, "vol-busy", 5)]],
    );

    let auditor = Auditor::new(inventory, activity, FakeNotifier::default());
    let mut out = Vec::new();
    let outcome = auditor
        .run(&config("us-east-1", "FALSE"), now(), &mut out)
        .await
        .unwrap();

    let ids: Vec<_> = outcome
        .report
        .resources("us-east-1", ResourceKind::Volume)
        .iter()
        .map(|r| r.id())
        .collect();
    assert_eq!(ids, vec!["vol-idle"]);
    assert!(
        outcome
            .report
            .resources("us-east-1", ResourceKind::Instance)
            .is_empty()
    );
    assert_eq!(outcome.notification, NotificationStatus::Disabled);

    let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        printed["us-east-1"]["AWS::EC2::Volume"][0]["VolumeId"],
        "vol-idle"
    );
    assert_eq!(printed["us-east-1"]["AWS::EC2::Instance"], serde_json::json!([]));
}

#[tokio::test]
async fn test_activity_lookup_starts_at_cutoff() {
    let activity = FakeActivity::default();
    let starts = activity.starts.clone();

    let auditor = Auditor::new(FakeInventory::default(), activity, FakeNotifier::default());
    let mut out = Vec::new();
    auditor
        .run(&config("us-east-1 us-east-1", "FALSE"), now(), &mut out)
        .await
        .unwrap();

    // One lookup per kind; the duplicate region is visited once
    let starts = starts.lock().unwrap();
    assert_eq!(starts.len(), 2);
    assert!(starts.iter().all(|s| *s == now() - Duration::days(30)));
}

#[tokio::test]
async fn test_activity_on_any_page_exempts_resource() {
    let inventory = FakeInventory::default().single_page(
        "us-west-2",
        ResourceKind::Instance,
        vec![
            instance("i-1", "stopped", 60),
            instance("i-2", "running", 60),
            instance("i-3", "stopped", 60),
        ],
    );
    let activity = FakeActivity::default().with_pages(
        "us-west-2",
        ResourceKind::Instance,
        vec![
            vec![touched(ResourceKind::Instance, "i-1", 1)],
            vec![],
            vec![touched(ResourceKind::Instance, "i-3", 29)],
        ],
    );

    let auditor = Auditor::new(inventory, activity, FakeNotifier::default());
    let mut out = Vec::new();
    let outcome = auditor
        .run(&config("us-west-2", "false"), now(), &mut out)
        .await
        .unwrap();

    let ids: Vec<_> = outcome
        .report
        .resources("us-west-2", ResourceKind::Instance)
        .iter()
        .map(|r| r.id())
        .collect();
    assert_eq!(ids, vec!["i-2"]);
}

#[tokio::test]
async fn test_notification_failure_still_prints_report() {
    let inventory = FakeInventory::default().single_page(
        "us-east-1",
        ResourceKind::Volume,
        vec![volume("vol-idle", 40)],
    );
    let notifier = FakeNotifier {
        fail: true,
        ..Default::default()
    };

    let auditor = Auditor::new(inventory, FakeActivity::default(), notifier);
    let mut out = Vec::new();
    let outcome = auditor
        .run(&config("us-east-1", "TRUE"), now(), &mut out)
        .await
        .unwrap();

    match &outcome.notification {
        NotificationStatus::Failed { reason } => assert!(reason.contains("AuthorizationError")),
        other => panic!("expected failed notification, got {other:?}"),
    }
    let printed = String::from_utf8(out).unwrap();
    assert_eq!(printed, format!("{}\n", outcome.payload));
    assert!(printed.contains("vol-idle"));
}

#[tokio::test]
async fn test_published_message_matches_printed_report() {
    let inventory = FakeInventory::default().single_page(
        "eu-west-1",
        ResourceKind::Volume,
        vec![volume("vol-a", 90)],
    );
    let auditor = Auditor::new(inventory, FakeActivity::default(), FakeNotifier::default());
    let mut out = Vec::new();
    let outcome = auditor
        .run(&config("eu-west-1", "True"), now(), &mut out)
        .await
        .unwrap();

    assert_eq!(
        outcome.notification,
        NotificationStatus::Sent {
            message_id: "message-1".to_string()
        }
    );
    let printed = String::from_utf8(out).unwrap();
    assert_eq!(printed.trim_end(), outcome.payload);
}

#[tokio::test]
async fn test_failed_region_is_degraded_not_fatal() {
    let mut inventory = FakeInventory::default().single_page(
        "us-east-1",
        ResourceKind::Volume,
        vec![volume("vol-east", 40)],
    );
    inventory
        .failing
        .push(("ap-south-1".to_string(), ResourceKind::Volume));

    let auditor = Auditor::new(inventory, FakeActivity::default(), FakeNotifier::default());
    let mut out = Vec::new();
    let outcome = auditor
        .run(&config("us-east-1, ap-south-1", "FALSE"), now(), &mut out)
        .await
        .unwrap();

    assert_eq!(outcome.degraded.len(), 1);
    assert_eq!(outcome.degraded[0].region, "ap-south-1");
    assert_eq!(outcome.degraded[0].stage, AuditStage::Enumeration);

    // Report shape is unchanged for the failed pair; regions keep REGIONS order
    let regions: Vec<_> = outcome.report.regions().collect();
    assert_eq!(regions, vec!["us-east-1", "ap-south-1"]);
    assert!(
        outcome
            .report
            .resources("ap-south-1", ResourceKind::Volume)
            .is_empty()
    );
    assert_eq!(outcome.report.total(), 1);
}

#[tokio::test]
async fn test_nothing_stale_prints_empty_lists() {
    let auditor = Auditor::new(
        FakeInventory::default(),
        FakeActivity::default(),
        FakeNotifier::default(),
    );
    let mut out = Vec::new();
    let outcome = auditor
        .run(&config("us-east-1", "FALSE"), now(), &mut out)
        .await
        .unwrap();

    assert_eq!(outcome.report.total(), 0);
    let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        printed,
        serde_json::json!({
            "us-east-1": {
                "AWS::EC2::Instance": [],
                "AWS::EC2::Volume": []
            }
        })
    );
}
