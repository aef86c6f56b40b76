//! Dashboard summary payloads returned by `GET /api/v1/dashboard-summary`.
//!
//! Field names follow the backend's JSON verbatim.

use serde::{Deserialize, Serialize};

use crate::reports::ReportUrls;

// ---------------------------------------------------------------------------
// KPI summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiSummary {
    /// Cases that had no successful remediation.
    pub casos_atuacao: u64,
    pub alertas_atuacao: u64,
    /// Cases remediated too often (instability).
    pub casos_instabilidade: u64,
    pub alertas_instabilidade: u64,
    /// Cases that only partially succeeded.
    pub casos_sucesso_parcial: u64,
    pub alertas_sucesso_parcial: u64,
    /// Pre-formatted rate, e.g. "85.0%".
    pub taxa_sucesso_automacao: String,
    /// Same rate as a number in percent.
    pub taxa_sucesso_valor: f64,
    pub casos_sucesso: u64,
    pub total_casos: u64,
}

// ---------------------------------------------------------------------------
// Trend history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendHistoryItem {
    pub run_folder: String,
    pub filename: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Summary envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// `null` until the first CSV has been analysed.
    pub kpi_summary: Option<KpiSummary>,
    #[serde(default)]
    pub trend_history: Vec<TrendHistoryItem>,
    #[serde(default)]
    pub latest_report_urls: Option<ReportUrls>,
    #[serde(default)]
    pub quick_diagnosis_html: Option<String>,
    #[serde(default)]
    pub latest_report_date_range: Option<String>,
}
