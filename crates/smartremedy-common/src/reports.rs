//! Report records, report links and the upload/compare responses.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::SmartRemedyError;

// ---------------------------------------------------------------------------
// Report links
// ---------------------------------------------------------------------------

/// Links to the HTML artifacts generated for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
}

impl ReportUrls {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.action_plan.is_none() && self.trend.is_none()
    }
}

// ---------------------------------------------------------------------------
// Upload / compare
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub report_urls: ReportUrls,
    #[serde(default)]
    pub kpi_summary: Option<crate::dashboard::KpiSummary>,
    #[serde(default)]
    pub quick_diagnosis_html: Option<String>,
    #[serde(default)]
    pub date_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareResponse {
    pub report_url: String,
}

// ---------------------------------------------------------------------------
// History records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Standard,
    Comparative,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Comparative => "comparative",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// `<kind>-<n>`, e.g. `standard-12`.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub timestamp: String,
    pub original_filename: String,
    #[serde(default)]
    pub date_range: Option<String>,
    pub url: String,
}

impl Report {
    /// Timestamp as `dd/mm/yyyy, HH:MM:SS`, or verbatim when it cannot be parsed.
    pub fn display_timestamp(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    pub fn display_date_range(&self) -> &str {
        match self.date_range.as_deref() {
            Some(range) if !range.trim().is_empty() => range,
            _ => "N/A",
        }
    }
}

const DISPLAY_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// The backend serialises timestamps either as ISO-8601 or as HTTP dates
/// ("Sun, 26 Oct 2025 10:00:00 GMT").
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format(DISPLAY_FORMAT).to_string();
        }
    }
    raw.to_string()
}

// ---------------------------------------------------------------------------
// Report id
// ---------------------------------------------------------------------------

/// Parsed history id. Only the numeric part travels to the delete endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportId {
    pub kind: ReportKind,
    pub number: u64,
}

impl FromStr for ReportId {
    type Err = SmartRemedyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || SmartRemedyError::InvalidReportId(raw.to_string());
        let (kind, number) = raw.split_once('-').ok_or_else(invalid)?;
        let kind = match kind {
            "standard" => ReportKind::Standard,
            "comparative" => ReportKind::Comparative,
            _ => return Err(invalid()),
        };
        let number = number.parse::<u64>().map_err(|_| invalid())?;
        Ok(Self { kind, number })
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.number)
    }
}
