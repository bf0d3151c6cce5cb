use anyhow::Result;

use roster_merge::config::{self, PipelineConfig};
use roster_merge::logging;
use roster_merge::pipeline;

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init_tracing();

    let cfg = PipelineConfig::from_env_and_args(&config::cli_args())?;
    println!("Building player records");
    println!("Ratings: {}", cfg.ratings_path.display());
    println!("Contracts: {}", cfg.salary_path.display());
    println!("Season: {} (ages as of {})", cfg.season, cfg.reference_date);

    let summary = pipeline::run(&cfg)?;

    println!();
    for line in summary.diagnostics.summary_lines(summary.report.records.len()) {
        println!("{line}");
    }
    println!(
        "Done: {} players -> {}",
        summary.report.records.len(),
        summary.output_path.display()
    );
    Ok(())
}
