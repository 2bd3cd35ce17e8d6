// The batch job end to end: read both tables, build the fact table, run the
// district aggregates and join them back onto the district list.
use crate::assemble::{assemble, districts, Aggregates};
use crate::error::PipelineError;
use crate::facts::build_fact_table;
use crate::loader::IncidentSource;
use crate::lookup::resolve_offense_codes;
use crate::types::{DistrictSummary, RunSummary};
use crate::util::format_int;

pub fn summarize(source: &dyn IncidentSource) -> Result<(Vec<DistrictSummary>, RunSummary), PipelineError> {
    let (offense_rows, offense_report) = source.offense_codes()?;
    let (incident_rows, incident_report) = source.incidents()?;
    log::info!(
        "Read {} incident rows ({} malformed) and {} offense rows ({} malformed)",
        format_int(incident_report.total_rows),
        format_int(incident_report.parse_errors),
        format_int(offense_report.total_rows),
        format_int(offense_report.parse_errors),
    );

    let offenses = resolve_offense_codes(&offense_rows);
    log::info!("Resolved {} offense codes", format_int(offenses.len()));

    let (facts, fact_report) = build_fact_table(&incident_rows, &offenses);
    log::info!(
        "Fact table: {} rows ({} duplicates, {} incomplete, {} outside geo window dropped; {} with unknown offense code)",
        format_int(fact_report.fact_rows),
        format_int(fact_report.duplicates),
        format_int(fact_report.missing_fields),
        format_int(fact_report.outside_window),
        format_int(fact_report.unresolved_codes),
    );

    let districts = districts(&facts);
    let summaries = assemble(&districts, &Aggregates::compute(&facts));
    log::info!("Summarized {} districts", format_int(summaries.len()));

    let run = RunSummary {
        generated_at: chrono::Utc::now(),
        incidents: incident_report,
        offense_codes: offense_report,
        resolved_codes: offenses.len(),
        facts: fact_report,
        districts: summaries.len(),
    };
    Ok((summaries, run))
}
