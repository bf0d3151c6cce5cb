use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::biography::{BiographySource, DetailLookup};
use crate::config::PipelineConfig;
use crate::contracts::{self, ContractProjection};
use crate::diagnostics::Diagnostics;
use crate::merge::{self, MergeReport, PlayerRecord};
use crate::name_key::NameKey;
use crate::nba_stats::{self, NbaStatsClient};
use crate::ratings::{self, RatingsRow};
use crate::roster_join::{self, JoinOptions};

#[derive(Debug, Deserialize)]
struct PlayersFile {
    players: Vec<PlayerRecord>,
}

#[derive(Serialize)]
struct PlayersFileRef<'a> {
    players: &'a [PlayerRecord],
}

#[derive(Debug)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub report: MergeReport,
    pub diagnostics: Diagnostics,
}

pub fn prepare_contracts(lines: &[String]) -> Result<HashMap<NameKey, ContractProjection>> {
    let contracts = contracts::process(lines.iter().map(String::as_str));
    if contracts.is_empty() {
        return Err(anyhow!(
            "contract table has no contract rows ({} lines read)",
            lines.len()
        ));
    }
    Ok(contracts)
}

pub fn assemble(
    ratings: Vec<RatingsRow>,
    biography: &BiographySource,
    lookup: &dyn DetailLookup,
    contracts: &HashMap<NameKey, ContractProjection>,
    opts: &JoinOptions,
    diag: &mut Diagnostics,
) -> MergeReport {
    let partials = roster_join::join(ratings, biography, lookup, opts, diag);
    let report = merge::merge(partials, contracts);
    diag.contract_rows = contracts.len();
    diag.contract_unmatched = report.unmatched.clone();
    report
}

/// Every source is read (and the contract table validated) before the first network
/// call, and the output file is only written once the full record list exists.
pub fn run(cfg: &PipelineConfig) -> Result<RunSummary> {
    let ratings = ratings::load_ratings(&cfg.ratings_path)?;
    info!(rows = ratings.len(), path = %cfg.ratings_path.display(), "loaded ratings");

    let lines = contracts::load_contract_lines(&cfg.salary_path)?;
    let contracts = prepare_contracts(&lines)
        .with_context(|| format!("parse contract table {}", cfg.salary_path.display()))?;
    info!(contracts = contracts.len(), "parsed contract table");

    let mut diagnostics = Diagnostics::new();
    let stats = NbaStatsClient::new(&cfg.season, cfg.http_timeout)?;
    let biography = nba_stats::fetch_biography_source(&stats, cfg.team_pacing, &mut diagnostics)?;

    let opts = JoinOptions {
        reference: cfg.reference_date,
        detail_pacing: cfg.detail_pacing,
    };
    let report = assemble(
        ratings,
        &biography,
        &stats,
        &contracts,
        &opts,
        &mut diagnostics,
    );

    write_players_json(&cfg.output_path, &report.records)?;
    Ok(RunSummary {
        output_path: cfg.output_path.clone(),
        report,
        diagnostics,
    })
}

pub fn read_players_json(path: &Path) -> Result<Vec<PlayerRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read players file {}", path.display()))?;
    let parsed: PlayersFile = serde_json::from_str(&raw)
        .with_context(|| format!("parse players file {}", path.display()))?;
    Ok(parsed.players)
}

/// Writes `{ "players": [...] }` through a temp file so a failed run never leaves a
/// truncated output behind.
pub fn write_players_json(path: &Path, records: &[PlayerRecord]) -> Result<()> {
    write_json_atomic(path, &PlayersFileRef { players: records })
}

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_table_without_rows_is_fatal() {
        let lines = vec!["Rk\tPlayer\tTm\t2025-26".to_string(), String::new()];
        assert!(prepare_contracts(&lines).is_err());
        assert!(prepare_contracts(&[]).is_err());
    }
}
