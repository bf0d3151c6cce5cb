use anyhow::{Context, Result};

use roster_merge::config::{self, path_setting};
use roster_merge::diagnostics::{PREVIEW_LIMIT, preview};
use roster_merge::{contracts, logging, merge, pipeline};

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init_tracing();

    let args = config::cli_args();
    let players_path = path_setting(&args, "players", "ROSTER_PLAYERS_PATH", "players.json");
    let salary_path = path_setting(
        &args,
        "salaries",
        "ROSTER_SALARY_PATH",
        config::DEFAULT_SALARY_PATH,
    );
    let out_path = path_setting(
        &args,
        "out",
        "ROSTER_SALARY_OUTPUT_PATH",
        "players_with_salary.json",
    );

    // The contract table is read first: without it there is nothing to merge.
    let lines = contracts::load_contract_lines(&salary_path)?;
    let table = pipeline::prepare_contracts(&lines)
        .with_context(|| format!("parse contract table {}", salary_path.display()))?;
    println!("Contract rows parsed: {}", table.len());

    let records = pipeline::read_players_json(&players_path)?;
    let report = merge::apply_contracts(records, &table);

    println!("Players updated: {}", report.matched);
    if !report.unmatched.is_empty() {
        println!(
            "No contract found for {} players (FA, rookies, ...):",
            report.unmatched.len()
        );
        println!("{}", preview(&report.unmatched, PREVIEW_LIMIT));
    }

    pipeline::write_players_json(&out_path, &report.records)?;
    println!("Done: {}", out_path.display());
    Ok(())
}
