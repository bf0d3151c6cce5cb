use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub overall_attribute: u32,
    pub close_shot: u32,
    pub mid_range_shot: u32,
    pub three_point_shot: u32,
    pub free_throw: u32,
    pub layup: u32,
    pub driving_dunk: u32,
    pub draw_foul: u32,
    pub interior_defense: u32,
    pub perimeter_defense: u32,
    pub steal: u32,
    pub block: u32,
    pub speed: u32,
    pub stamina: u32,
    #[serde(rename = "passIQ")]
    pub pass_iq: u32,
    pub ball_handle: u32,
    pub offensive_rebound: u32,
    pub defensive_rebound: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingsRow {
    pub name: String,
    pub team: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RatingsFile {
    Wrapped { players: Vec<RatingsRow> },
    Bare(Vec<RatingsRow>),
}

pub fn parse_ratings_json(raw: &str) -> Result<Vec<RatingsRow>> {
    let parsed: RatingsFile = serde_json::from_str(raw.trim()).context("invalid ratings json")?;
    Ok(match parsed {
        RatingsFile::Wrapped { players } => players,
        RatingsFile::Bare(players) => players,
    })
}

pub fn load_ratings(path: &Path) -> Result<Vec<RatingsRow>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read ratings table {}", path.display()))?;
    parse_ratings_json(&raw).with_context(|| format!("parse ratings table {}", path.display()))
}
