use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};

use crate::http_client::DEFAULT_TIMEOUT_SECS;

pub const DEFAULT_RATINGS_PATH: &str = "nba2k-player-ratings/data/league.json";
pub const DEFAULT_SALARY_PATH: &str = "salary_data.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "Assets/players.json";
pub const DEFAULT_SEASON: &str = "2024-25";
const DEFAULT_DETAIL_PACING_MS: u64 = 600;
const DEFAULT_TEAM_PACING_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub ratings_path: PathBuf,
    pub salary_path: PathBuf,
    pub output_path: PathBuf,
    pub season: String,
    pub reference_date: NaiveDate,
    pub detail_pacing: Duration,
    pub team_pacing: Duration,
    pub http_timeout: Duration,
}

impl PipelineConfig {
    pub fn from_env_and_args(args: &[String]) -> Result<Self> {
        let reference_date = match arg_value(args, "as-of").or_else(|| env_value("ROSTER_AS_OF")) {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .with_context(|| format!("invalid reference date {raw:?} (expected YYYY-MM-DD)"))?,
            None => Utc::now().date_naive(),
        };

        Ok(Self {
            ratings_path: path_setting(args, "ratings", "ROSTER_RATINGS_PATH", DEFAULT_RATINGS_PATH),
            salary_path: path_setting(args, "salaries", "ROSTER_SALARY_PATH", DEFAULT_SALARY_PATH),
            output_path: path_setting(args, "out", "ROSTER_OUTPUT_PATH", DEFAULT_OUTPUT_PATH),
            season: arg_value(args, "season")
                .or_else(|| env_value("ROSTER_SEASON"))
                .unwrap_or_else(|| DEFAULT_SEASON.to_string()),
            reference_date,
            detail_pacing: Duration::from_millis(env_u64(
                "ROSTER_DETAIL_PACING_MS",
                DEFAULT_DETAIL_PACING_MS,
            )),
            team_pacing: Duration::from_millis(env_u64(
                "ROSTER_TEAM_PACING_MS",
                DEFAULT_TEAM_PACING_MS,
            )),
            http_timeout: Duration::from_secs(
                env_u64("ROSTER_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS).max(1),
            ),
        })
    }
}

/// Reads `.env.local` then `.env`; variables already set in the process win.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

pub fn cli_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

/// Accepts both `--name=value` and `--name value`.
pub fn arg_value(args: &[String], name: &str) -> Option<String> {
    let flag = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

pub fn path_setting(args: &[String], flag: &str, env_key: &str, default: &str) -> PathBuf {
    arg_value(args, flag)
        .or_else(|| env_value(env_key))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_value(key)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn arg_value_accepts_both_forms() {
        let a = args(&["--out=players.json", "--season", "2025-26", "--ratings"]);
        assert_eq!(arg_value(&a, "out").as_deref(), Some("players.json"));
        assert_eq!(arg_value(&a, "season").as_deref(), Some("2025-26"));
        assert_eq!(arg_value(&a, "ratings"), None);
        assert_eq!(arg_value(&a, "missing"), None);
    }

    #[test]
    fn flag_is_not_taken_as_value() {
        let a = args(&["--out", "--season=2025-26"]);
        assert_eq!(arg_value(&a, "out"), None);
    }

    #[test]
    fn flags_set_paths_and_reference_date() {
        let a = args(&[
            "--ratings=r.json",
            "--salaries",
            "s.txt",
            "--out=o.json",
            "--season=2023-24",
            "--as-of=2024-10-22",
        ]);
        let cfg = PipelineConfig::from_env_and_args(&a).expect("config should resolve");
        assert_eq!(cfg.ratings_path, PathBuf::from("r.json"));
        assert_eq!(cfg.salary_path, PathBuf::from("s.txt"));
        assert_eq!(cfg.output_path, PathBuf::from("o.json"));
        assert_eq!(cfg.season, "2023-24");
        assert_eq!(
            cfg.reference_date,
            NaiveDate::from_ymd_opt(2024, 10, 22).expect("valid date")
        );
    }

    #[test]
    fn bad_reference_date_is_rejected() {
        let a = args(&["--as-of=22/10/2024"]);
        assert!(PipelineConfig::from_env_and_args(&a).is_err());
    }
}
