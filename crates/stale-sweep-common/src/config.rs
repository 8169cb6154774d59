//! Audit configuration loading and validation
//!
//! Settings arrive as raw strings (the binary reads them from the
//! environment through clap) and are validated once into an [`AuditConfig`],
//! which is then passed explicitly into every pipeline stage.

use crate::defaults::{
    ENV_DETAILED_NOTIFICATIONS, ENV_IGNORE_WINDOW, ENV_REGIONS, ENV_SNS_ARN,
    MAX_IGNORE_WINDOW_DAYS, MIN_IGNORE_WINDOW_DAYS,
};
use crate::error::ConfigError;
use garde::Validate;

/// Unvalidated settings as provided by the caller
#[derive(Debug, Clone, Default)]
pub struct RawSettings {
    pub ignore_window: Option<String>,
    pub sns_arn: Option<String>,
    pub detailed_notifications: Option<String>,
    pub regions: Option<String>,
}

/// Validated configuration for one audit run
///
/// Field constraints are checked with `garde::Validate` once the raw strings
/// have been parsed.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct AuditConfig {
    /// Resources with activity inside this many trailing days are not flagged
    #[garde(range(min = MIN_IGNORE_WINDOW_DAYS, max = MAX_IGNORE_WINDOW_DAYS))]
    pub ignore_window_days: u32,
    /// SNS topic that receives the report
    #[garde(length(min = 1))]
    pub sns_arn: String,
    /// Publish the full report to `sns_arn`
    #[garde(skip)]
    pub detailed_notifications: bool,
    /// Regions to audit, in the order given (duplicates preserved)
    #[garde(length(min = 1))]
    pub regions: Vec<String>,
}

impl AuditConfig {
    /// Regions to visit: each distinct region once, in first-seen order
    pub fn unique_regions(&self) -> Vec<&str> {
        let mut seen = Vec::with_capacity(self.regions.len());
        for region in &self.regions {
            if !seen.contains(&region.as_str()) {
                seen.push(region.as_str());
            }
        }
        seen
    }
}

impl TryFrom<RawSettings> for AuditConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let ignore_window = raw
            .ignore_window
            .ok_or(ConfigError::Missing(ENV_IGNORE_WINDOW))?;
        let toggle = raw
            .detailed_notifications
            .ok_or(ConfigError::Missing(ENV_DETAILED_NOTIFICATIONS))?;
        let sns_arn = raw.sns_arn.ok_or(ConfigError::Missing(ENV_SNS_ARN))?;
        let regions = raw.regions.ok_or(ConfigError::Missing(ENV_REGIONS))?;

        let days = parse_ignore_window(&ignore_window)?;
        let config = Self {
            // Values that do not fit fail the range rule below
            ignore_window_days: u32::try_from(days).unwrap_or(0),
            sns_arn: sns_arn.trim().to_string(),
            detailed_notifications: parse_toggle(&toggle)?,
            regions: parse_regions(&regions),
        };

        config
            .validate()
            .map_err(|report| config_error(&report, days, &regions))?;
        Ok(config)
    }
}

/// Map the first failed field rule onto its setting's error
fn config_error(report: &garde::Report, days: i64, regions: &str) -> ConfigError {
    let field = report
        .iter()
        .next()
        .map(|(path, _)| path.to_string())
        .unwrap_or_default();

    match field.as_str() {
        "ignore_window_days" => ConfigError::IgnoreWindowOutOfRange(days),
        "sns_arn" => ConfigError::EmptySnsArn,
        "regions" => ConfigError::EmptyRegions(regions.to_string()),
        _ => ConfigError::Invalid(report.to_string()),
    }
}

/// Parse the ignore window as a whole number of days
pub fn parse_ignore_window(value: &str) -> Result<i64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidIgnoreWindow(value.to_string()))
}

/// Parse a case-insensitive `TRUE`/`FALSE` literal
pub fn parse_toggle(value: &str) -> Result<bool, ConfigError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::InvalidNotificationToggle(value.to_string()))
    }
}

/// Split a comma and/or whitespace separated region list
pub fn parse_regions(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
