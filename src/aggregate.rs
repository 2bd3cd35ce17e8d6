// Per-district aggregates over the fact table.
//
// Every function counts *distinct* crime ids, so an incident number that
// survives dedup twice (e.g. two offense codes) is still one crime.
use crate::types::FactRecord;
use crate::util::{median, round_half_up};
use std::collections::{BTreeMap, HashMap, HashSet};

pub const TOP_CRIME_TYPES: usize = 3;
pub const CENTROID_DECIMALS: i64 = 2;

/// Group distinct crime ids under an arbitrary key.
fn distinct_ids<'a, K, F>(data: &'a [FactRecord], key: F) -> HashMap<K, HashSet<&'a str>>
where
    K: std::hash::Hash + Eq,
    F: Fn(&'a FactRecord) -> Option<K>,
{
    let mut map: HashMap<K, HashSet<&str>> = HashMap::new();
    for r in data {
        if let Some(k) = key(r) {
            map.entry(k).or_default().insert(r.crime_id.as_str());
        }
    }
    map
}

pub fn crimes_total(data: &[FactRecord]) -> BTreeMap<String, usize> {
    distinct_ids(data, |r| Some(r.district.as_str()))
        .into_iter()
        .map(|(district, ids)| (district.to_string(), ids.len()))
        .collect()
}

/// Median over the district's periods of the distinct crimes per period.
pub fn crimes_monthly(data: &[FactRecord]) -> BTreeMap<String, f64> {
    let per_period = distinct_ids(data, |r| Some((r.district.as_str(), r.period_id)));

    let mut counts: HashMap<&str, Vec<f64>> = HashMap::new();
    for ((district, _), ids) in per_period {
        counts.entry(district).or_default().push(ids.len() as f64);
    }
    counts
        .into_iter()
        .map(|(district, v)| (district.to_string(), median(v)))
        .collect()
}

/// The top three crime types per district, most frequent first, joined
/// with `", "`.
///
/// Incidents without a crime type are not ranked. Equal counts fall back to
/// alphabetical order; anything past the third rank is cut even when tied
/// with it.
pub fn frequent_crime_types(data: &[FactRecord]) -> BTreeMap<String, String> {
    let per_type = distinct_ids(data, |r| {
        r.crime_type
            .as_deref()
            .map(|t| (r.district.as_str(), t))
    });

    let mut ranked: HashMap<&str, Vec<(usize, &str)>> = HashMap::new();
    for ((district, crime_type), ids) in per_type {
        ranked.entry(district).or_default().push((ids.len(), crime_type));
    }
    ranked
        .into_iter()
        .map(|(district, mut types)| {
            types.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
            let labels: Vec<&str> = types
                .into_iter()
                .take(TOP_CRIME_TYPES)
                .map(|(_, t)| t)
                .collect();
            (district.to_string(), labels.join(", "))
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub enum Axis {
    Lat,
    Long,
}

impl Axis {
    fn of(self, r: &FactRecord) -> f64 {
        match self {
            Self::Lat => r.lat,
            Self::Long => r.long,
        }
    }
}

/// Crime-weighted mean of one coordinate axis per district.
///
/// Each distinct value on the axis is weighted by its distinct crime count;
/// the axes are weighted independently, not as paired points.
pub fn weighted_centroid(data: &[FactRecord], axis: Axis) -> BTreeMap<String, f64> {
    let per_value = distinct_ids(data, |r| Some((r.district.as_str(), axis.of(r).to_bits())));

    #[derive(Default)]
    struct Acc {
        weighted: f64,
        weight: f64,
    }
    let mut sums: HashMap<&str, Acc> = HashMap::new();
    for ((district, bits), ids) in per_value {
        let count = ids.len() as f64;
        let e = sums.entry(district).or_default();
        e.weighted += f64::from_bits(bits) * count;
        e.weight += count;
    }
    sums.into_iter()
        .filter(|(_, acc)| acc.weight > 0.0)
        .map(|(district, acc)| {
            let mean = acc.weighted / acc.weight;
            (district.to_string(), round_half_up(mean, CENTROID_DECIMALS))
        })
        .collect()
}
