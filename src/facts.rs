use crate::types::{FactRecord, RawIncidentRow, ResolvedOffense};
use crate::util::{parse_f64_safe, parse_i32_safe, period_id};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Centre of the geo sanity window (downtown Boston).
pub const CENTER_LAT: f64 = 42.361145;
pub const CENTER_LONG: f64 = -71.057083;
/// Maximum distance from the centre, in degrees, on each axis (exclusive).
pub const MAX_OFFSET_DEG: f64 = 1.0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FactReport {
    pub raw_rows: usize,
    pub duplicates: usize,
    pub missing_fields: usize,
    pub outside_window: usize,
    pub unresolved_codes: usize,
    pub fact_rows: usize,
}

/// A raw row after casting, before any filtering.
#[derive(Debug, Clone)]
struct Typed {
    incident_number: Option<String>,
    district: Option<String>,
    offense_code: Option<i32>,
    period_id: Option<i32>,
    lat: Option<f64>,
    long: Option<f64>,
}

impl Typed {
    fn from_raw(r: &RawIncidentRow) -> Self {
        Self {
            incident_number: non_empty(r.incident_number.as_deref()),
            district: non_empty(r.district.as_deref()),
            offense_code: parse_i32_safe(r.offense_code.as_deref()),
            period_id: period_id(
                parse_i32_safe(r.year.as_deref()),
                parse_i32_safe(r.month.as_deref()),
            ),
            lat: parse_f64_safe(r.lat.as_deref()),
            long: parse_f64_safe(r.long.as_deref()),
        }
    }

    // Floats are compared bit-wise so identical observations collapse.
    fn key(&self) -> DedupKey {
        (
            self.incident_number.clone(),
            self.district.clone(),
            self.offense_code,
            self.period_id,
            self.lat.map(f64::to_bits),
            self.long.map(f64::to_bits),
        )
    }
}

type DedupKey = (
    Option<String>,
    Option<String>,
    Option<i32>,
    Option<i32>,
    Option<u64>,
    Option<u64>,
);

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|v| !v.is_empty()).map(str::to_string)
}

pub fn in_geo_window(lat: f64, long: f64) -> bool {
    (CENTER_LAT - lat).abs() < MAX_OFFSET_DEG && (CENTER_LONG - long).abs() < MAX_OFFSET_DEG
}

/// Build the fact table: cast, deduplicate, drop incomplete rows, apply the
/// geo window, then attach the resolved crime type.
pub fn build_fact_table(
    rows: &[RawIncidentRow],
    offenses: &BTreeMap<i32, ResolvedOffense>,
) -> (Vec<FactRecord>, FactReport) {
    let mut report = FactReport {
        raw_rows: rows.len(),
        ..FactReport::default()
    };

    let mut seen: HashSet<DedupKey> = HashSet::with_capacity(rows.len());
    let mut facts = Vec::new();
    for raw in rows {
        let t = Typed::from_raw(raw);
        if !seen.insert(t.key()) {
            report.duplicates += 1;
            continue;
        }

        let (Some(crime_id), Some(district), Some(code), Some(period_id), Some(lat), Some(long)) =
            (t.incident_number, t.district, t.offense_code, t.period_id, t.lat, t.long)
        else {
            report.missing_fields += 1;
            continue;
        };

        if !in_geo_window(lat, long) {
            report.outside_window += 1;
            continue;
        }

        let crime_type = match offenses.get(&code) {
            Some(resolved) => resolved.crime_type.clone(),
            None => {
                report.unresolved_codes += 1;
                None
            }
        };

        facts.push(FactRecord {
            crime_id,
            district,
            crime_type,
            period_id,
            lat,
            long,
        });
    }

    report.fact_rows = facts.len();
    (facts, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, district: &str, code: &str, lat: &str, long: &str) -> RawIncidentRow {
        RawIncidentRow {
            incident_number: Some(id.to_string()),
            district: Some(district.to_string()),
            offense_code: Some(code.to_string()),
            year: Some("2015".to_string()),
            month: Some("1".to_string()),
            lat: Some(lat.to_string()),
            long: Some(long.to_string()),
        }
    }

    fn offenses() -> BTreeMap<i32, ResolvedOffense> {
        BTreeMap::from([(
            100,
            ResolvedOffense {
                code: 100,
                crime_type: Some("LARCENY".to_string()),
            },
        )])
    }

    #[test]
    fn collapses_exact_duplicates() {
        let rows = vec![
            raw("I1", "A1", "100", "42.35", "-71.05"),
            raw("I1", "A1", "100", "42.35", "-71.05"),
            raw("I1", "A1", "100", "42.36", "-71.05"),
        ];
        let (facts, report) = build_fact_table(&rows, &offenses());
        assert_eq!(facts.len(), 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(facts[0].period_id, 201_501);
        assert_eq!(facts[0].crime_type.as_deref(), Some("LARCENY"));
    }

    #[test]
    fn drops_rows_outside_geo_window() {
        let rows = vec![
            raw("I1", "A1", "100", "-1", "-1"),
            raw("I2", "A1", "100", "43.5", "-71.05"),
            raw("I3", "A1", "100", "42.35", "-72.06"),
            raw("I4", "A1", "100", "NaN", "-71.05"),
            raw("I5", "A1", "100", "42.35", "-71.05"),
        ];
        let (facts, report) = build_fact_table(&rows, &offenses());
        assert_eq!(report.outside_window, 4);
        assert_eq!(facts.len(), 1);
        assert!(facts.iter().all(|f| in_geo_window(f.lat, f.long)));
    }

    #[test]
    fn drops_rows_with_missing_or_malformed_fields() {
        let mut no_district = raw("I1", "A1", "100", "42.35", "-71.05");
        no_district.district = Some(String::new());
        let mut bad_month = raw("I2", "A1", "100", "42.35", "-71.05");
        bad_month.month = Some("June".to_string());
        let bad_code = raw("I3", "A1", "x100", "42.35", "-71.05");
        let mut no_lat = raw("I4", "A1", "100", "42.35", "-71.05");
        no_lat.lat = None;

        let rows = [no_district, bad_month, bad_code, no_lat];
        let (facts, report) = build_fact_table(&rows, &offenses());
        assert!(facts.is_empty());
        assert_eq!(report.missing_fields, 4);
    }

    #[test]
    fn keeps_unresolved_codes_without_type() {
        let rows = vec![raw("I1", "B2", "999", "42.35", "-71.05")];
        let (facts, report) = build_fact_table(&rows, &offenses());
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].crime_type, None);
        assert_eq!(report.unresolved_codes, 1);
    }
}
