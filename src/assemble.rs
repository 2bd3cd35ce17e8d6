use crate::aggregate::{self, Axis};
use crate::types::{DistrictSummary, FactRecord};
use std::collections::{BTreeMap, BTreeSet};

/// The per-district aggregates, each keyed by district.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    pub crimes_total: BTreeMap<String, usize>,
    pub crimes_monthly: BTreeMap<String, f64>,
    pub frequent_crime_types: BTreeMap<String, String>,
    pub lat: BTreeMap<String, f64>,
    pub long: BTreeMap<String, f64>,
}

impl Aggregates {
    pub fn compute(facts: &[FactRecord]) -> Self {
        Self {
            crimes_total: aggregate::crimes_total(facts),
            crimes_monthly: aggregate::crimes_monthly(facts),
            frequent_crime_types: aggregate::frequent_crime_types(facts),
            lat: aggregate::weighted_centroid(facts, Axis::Lat),
            long: aggregate::weighted_centroid(facts, Axis::Long),
        }
    }
}

pub fn districts(facts: &[FactRecord]) -> BTreeSet<String> {
    facts.iter().map(|r| r.district.clone()).collect()
}

/// Left-join every aggregate onto the district list.
///
/// Exactly one row per listed district, in district order. A district
/// missing from an aggregate gets `None` there; keys only present in an
/// aggregate are ignored.
pub fn assemble(districts: &BTreeSet<String>, agg: &Aggregates) -> Vec<DistrictSummary> {
    districts
        .iter()
        .map(|d| DistrictSummary {
            district: d.clone(),
            crimes_total: agg.crimes_total.get(d).copied(),
            crimes_monthly: agg.crimes_monthly.get(d).copied(),
            frequent_crime_types: agg.frequent_crime_types.get(d).cloned(),
            lat: agg.lat.get(d).copied(),
            long: agg.long.get(d).copied(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(id: &str, district: &str, crime_type: Option<&str>) -> FactRecord {
        FactRecord {
            crime_id: id.to_string(),
            district: district.to_string(),
            crime_type: crime_type.map(str::to_string),
            period_id: 201_501,
            lat: 42.35,
            long: -71.05,
        }
    }

    #[test]
    fn keeps_districts_missing_from_an_aggregate() {
        let facts = vec![fact("1", "A1", Some("LARCENY")), fact("2", "B2", None)];
        let rows = assemble(&districts(&facts), &Aggregates::compute(&facts));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].frequent_crime_types.as_deref(), Some("LARCENY"));
        assert_eq!(rows[1].district, "B2");
        assert_eq!(rows[1].crimes_total, Some(1));
        assert_eq!(rows[1].frequent_crime_types, None);
    }

    #[test]
    fn output_keys_match_fact_districts() {
        let facts = vec![fact("1", "A1", None), fact("2", "C11", None)];
        let mut agg = Aggregates::compute(&facts);
        agg.crimes_total.insert("Z9".to_string(), 5);
        agg.lat.remove("C11");

        let rows = assemble(&districts(&facts), &agg);
        let keys: Vec<&str> = rows.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(keys, ["A1", "C11"]);
        assert_eq!(rows[1].lat, None);
        assert_eq!(rows[1].long, Some(-71.05));
    }

    #[test]
    fn empty_fact_table_yields_no_rows() {
        let rows = assemble(&districts(&[]), &Aggregates::compute(&[]));
        assert!(rows.is_empty());
    }
}
