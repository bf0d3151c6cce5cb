use anyhow::{Context, Result};

use roster_merge::config::{self, PipelineConfig, path_setting};
use roster_merge::jersey::build_jersey_map;
use roster_merge::nba_stats::NbaStatsClient;
use roster_merge::{logging, pipeline};

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init_tracing();

    let args = config::cli_args();
    let cfg = PipelineConfig::from_env_and_args(&args)?;
    let out_path = path_setting(
        &args,
        "jersey-out",
        "ROSTER_JERSEY_OUTPUT_PATH",
        "players_jersey_map.json",
    );

    let stats = NbaStatsClient::new(&cfg.season, cfg.http_timeout)?;
    let players = stats
        .fetch_all_players()
        .context("fetch current player list")?;
    println!("Looking up jersey numbers for {} players", players.len());

    let entries = build_jersey_map(&players, &stats, cfg.detail_pacing);
    let missing = entries.iter().filter(|e| e.backnumber.is_empty()).count();

    pipeline::write_json_atomic(&out_path, &entries)?;
    println!(
        "Done: {} players ({} without a number) -> {}",
        entries.len(),
        missing,
        out_path.display()
    );
    Ok(())
}
