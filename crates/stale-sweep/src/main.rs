//! stale-sweep: report idle EBS volumes and EC2 instances
//!
//! Reads its settings from the environment (or the equivalent flags), audits
//! each region, prints the JSON report to stdout and logs to stderr.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use stale_sweep::audit::Auditor;
use stale_sweep::aws::{
    AwsContext, CloudTrailLog, Ec2Inventory, Regional, SnsNotifier, get_current_account_id,
};
use stale_sweep_common::{AuditConfig, RawSettings};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "stale-sweep")]
#[command(about = "Report idle EBS volumes and EC2 instances with no recent activity")]
#[command(version)]
struct Args {
    /// Days of recent activity that exempt a resource (1-90)
    #[arg(long, env = "IGNORE_WINDOW")]
    ignore_window: Option<String>,

    /// SNS topic ARN that receives the report
    #[arg(long, env = "SNS_ARN")]
    sns_arn: Option<String>,

    /// Publish the full report to SNS (TRUE or FALSE)
    #[arg(long, env = "DETAILED_NOTIFICATIONS")]
    detailed_notifications: Option<String>,

    /// Comma or space separated regions to audit
    #[arg(long, env = "REGIONS")]
    regions: Option<String>,
}

impl From<Args> for RawSettings {
    fn from(args: Args) -> Self {
        Self {
            ignore_window: args.ignore_window,
            sns_arn: args.sns_arn,
            detailed_notifications: args.detailed_notifications,
            regions: args.regions,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    // stdout carries only the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = AuditConfig::try_from(RawSettings::from(args))
        .inspect_err(|e| error!(error = %e, "Configuration rejected"))
        .context("Invalid audit configuration")?;

    let regions = config.unique_regions();
    let mut contexts = Vec::with_capacity(regions.len());
    for region in &regions {
        contexts.push(AwsContext::new(region).await);
    }

    if let Some(ctx) = contexts.first() {
        if let Err(e) = get_current_account_id(ctx).await {
            warn!(error = %format!("{e:#}"), "Could not determine AWS account, continuing");
        }
    }

    let inventory: Regional<Ec2Inventory> = Regional::from_contexts(&contexts);
    let activity: Regional<CloudTrailLog> = Regional::from_contexts(&contexts);
    let notifier = SnsNotifier::for_topic(&config.sns_arn).await;

    let auditor = Auditor::new(inventory, activity, notifier);
    let outcome = auditor
        .run(&config, Utc::now(), &mut std::io::stdout().lock())
        .await?;

    info!(
        stale = outcome.report.total(),
        degraded = outcome.degraded.len(),
        notification = ?outcome.notification,
        "Finished"
    );

    Ok(())
}
