use crate::types::{RawOffenseRow, ResolvedOffense};
use crate::util::parse_i32_safe;
use std::collections::BTreeMap;

/// Collapse the offense table to one crime type per code.
///
/// For each code the name that sorts first wins (a missing name sorts before
/// any present one). The crime type is the text before its first `-`,
/// trimmed of spaces. Rows whose code does not cast to an integer are dropped.
pub fn resolve_offense_codes(rows: &[RawOffenseRow]) -> BTreeMap<i32, ResolvedOffense> {
    let mut first_name: BTreeMap<i32, Option<&str>> = BTreeMap::new();
    for r in rows {
        let Some(code) = parse_i32_safe(r.code.as_deref()) else {
            continue;
        };
        let name = r.name.as_deref();
        first_name
            .entry(code)
            .and_modify(|best| {
                // `None < Some(_)` and `&str` orders byte-wise.
                if name < *best {
                    *best = name;
                }
            })
            .or_insert(name);
    }

    first_name
        .into_iter()
        .map(|(code, name)| {
            let crime_type = name.map(crime_type_of);
            (code, ResolvedOffense { code, crime_type })
        })
        .collect()
}

// Only ASCII spaces are trimmed; tabs and other whitespace are kept.
fn crime_type_of(name: &str) -> String {
    name.split('-').next().unwrap_or_default().trim_matches(' ').to_string()
}
