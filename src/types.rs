use crate::facts::FactReport;
use crate::loader::LoadReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One line of the incident export, every field still raw text.
///
/// Both the upper-case headers of the public export and plain lower-case
/// column names are accepted. Columns not listed here are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIncidentRow {
    #[serde(default, alias = "INCIDENT_NUMBER")]
    pub incident_number: Option<String>,
    #[serde(default, alias = "DISTRICT")]
    pub district: Option<String>,
    #[serde(default, alias = "OFFENSE_CODE")]
    pub offense_code: Option<String>,
    #[serde(default, alias = "YEAR")]
    pub year: Option<String>,
    #[serde(default, alias = "MONTH")]
    pub month: Option<String>,
    #[serde(default, alias = "Lat", alias = "LAT")]
    pub lat: Option<String>,
    #[serde(default, alias = "Long", alias = "LONG")]
    pub long: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOffenseRow {
    #[serde(default, alias = "CODE")]
    pub code: Option<String>,
    #[serde(default, alias = "NAME")]
    pub name: Option<String>,
}

/// Offense code mapped to its canonical crime type.
///
/// `crime_type` is `None` only when the first name for the code was missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOffense {
    pub code: i32,
    pub crime_type: Option<String>,
}

/// A cleaned incident: typed, deduplicated, inside the geo window.
#[derive(Debug, Clone, PartialEq)]
pub struct FactRecord {
    pub crime_id: String,
    pub district: String,
    pub crime_type: Option<String>,
    pub period_id: i32,
    pub lat: f64,
    pub long: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DistrictSummary {
    #[tabled(rename = "District")]
    pub district: String,
    #[tabled(rename = "CrimesTotal", display_with = "display_count")]
    pub crimes_total: Option<usize>,
    #[tabled(rename = "CrimesMonthly", display_with = "display_float")]
    pub crimes_monthly: Option<f64>,
    #[tabled(rename = "FrequentCrimeTypes", display_with = "display_text")]
    pub frequent_crime_types: Option<String>,
    #[tabled(rename = "Lat", display_with = "display_float")]
    pub lat: Option<f64>,
    #[tabled(rename = "Long", display_with = "display_float")]
    pub long: Option<f64>,
}

impl DistrictSummary {
    /// Output column order, also the CSV header.
    pub const COLUMNS: [&'static str; 6] = [
        "district",
        "crimes_total",
        "crimes_monthly",
        "frequent_crime_types",
        "lat",
        "long",
    ];
}

fn display_count(v: &Option<usize>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

fn display_float(v: &Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

fn display_text(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

/// Run statistics written next to the summary table.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub incidents: LoadReport,
    pub offense_codes: LoadReport,
    pub resolved_codes: usize,
    pub facts: FactReport,
    pub districts: usize,
}
