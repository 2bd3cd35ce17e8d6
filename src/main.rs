// Entry point: summarize crime incidents per police district.
//
// Reads `crime.csv` and `offense_codes.csv` from the data directory, builds
// one summary row per district and replaces the result directory with the
// summary table and run statistics. Set `RUST_LOG=info` to see stage counts.
mod aggregate;
mod assemble;
mod error;
mod facts;
mod loader;
mod lookup;
mod output;
mod pipeline;
mod types;
mod util;

use clap::Parser;
use loader::CsvDirectory;
use std::path::PathBuf;

const PREVIEW_ROWS: usize = 5;

#[derive(Parser)]
#[command(name = "crime_summary", about = "Per-district crime incident summary")]
struct Cli {
    /// Directory containing crime.csv and offense_codes.csv
    #[arg(long = "path-to-data", alias = "path_to_data")]
    path_to_data: PathBuf,
    /// Output directory; replaced on every run
    #[arg(long = "path-to-result", alias = "path_to_result")]
    path_to_result: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let source = CsvDirectory::new(&cli.path_to_data);
    let (summaries, run) = pipeline::summarize(&source)?;
    let written = output::write_result_dir(&cli.path_to_result, &summaries, &run)?;
    log::info!("Wrote {}", written.display());

    println!(
        "District Crime Summary ({} districts, {} incidents)\n",
        util::format_int(summaries.len()),
        util::format_int(run.facts.fact_rows)
    );
    output::preview_table_rows(&summaries, PREVIEW_ROWS);
    println!("(Full table exported to {})", written.display());
    Ok(())
}
