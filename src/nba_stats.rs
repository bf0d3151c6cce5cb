use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::biography::{BiographySource, DetailLookup, LeaguePlayer, PlayerInfo, RawBio};
use crate::diagnostics::Diagnostics;
use crate::http_client::http_client;
use crate::pacing::Pacer;

const STATS_BASE_URL: &str = "https://stats.nba.com/stats";
const LEAGUE_ID: &str = "00";

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(rename = "resultSets", default)]
    result_sets: Vec<ResultSet>,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    #[serde(default)]
    name: String,
    #[serde(default)]
    headers: Vec<String>,
    #[serde(rename = "rowSet", default)]
    row_set: Vec<Vec<Value>>,
}

impl ResultSet {
    fn table(&self) -> Table<'_> {
        let columns = self
            .headers
            .iter()
            .enumerate()
            .map(|(idx, h)| (h.as_str(), idx))
            .collect::<HashMap<_, _>>();
        Table {
            columns,
            rows: &self.row_set,
        }
    }
}

struct Table<'a> {
    columns: HashMap<&'a str, usize>,
    rows: &'a [Vec<Value>],
}

impl Table<'_> {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(|values| TableRow {
            columns: &self.columns,
            values,
        })
    }
}

struct TableRow<'a> {
    columns: &'a HashMap<&'a str, usize>,
    values: &'a [Value],
}

impl TableRow<'_> {
    fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column).and_then(|idx| self.values.get(*idx))
    }

    fn string(&self, column: &str) -> Option<String> {
        self.get(column).and_then(value_to_string)
    }

    fn id(&self, column: &str) -> Option<u32> {
        match self.get(column)? {
            Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        }
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_response(raw: &str) -> Result<StatsResponse> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("empty stats response"));
    }
    serde_json::from_str(trimmed).context("invalid stats json")
}

/// Picks the named table, falling back to the first one carrying `id_column`.
fn find_set<'a>(resp: &'a StatsResponse, name: &str, id_column: &str) -> Result<&'a ResultSet> {
    resp.result_sets
        .iter()
        .find(|set| set.name.eq_ignore_ascii_case(name))
        .or_else(|| {
            resp.result_sets
                .iter()
                .find(|set| set.headers.iter().any(|h| h == id_column))
        })
        .ok_or_else(|| anyhow!("result set {name} missing"))
}

pub fn parse_all_players_json(raw: &str) -> Result<Vec<LeaguePlayer>> {
    let resp = parse_response(raw)?;
    let table = find_set(&resp, "CommonAllPlayers", "PERSON_ID")?.table();
    let mut players = Vec::with_capacity(table.len());
    for row in table.rows() {
        let (Some(player_id), Some(display_name)) =
            (row.id("PERSON_ID"), row.string("DISPLAY_FIRST_LAST"))
        else {
            continue;
        };
        players.push(LeaguePlayer {
            player_id,
            display_name,
            team_id: row.id("TEAM_ID").filter(|id| *id != 0),
            team_name: row.string("TEAM_NAME"),
        });
    }
    Ok(players)
}

pub fn parse_team_roster_json(raw: &str) -> Result<Vec<(u32, RawBio)>> {
    let resp = parse_response(raw)?;
    let table = find_set(&resp, "CommonTeamRoster", "PLAYER_ID")?.table();
    let mut out = Vec::with_capacity(table.len());
    for row in table.rows() {
        let Some(player_id) = row.id("PLAYER_ID") else {
            continue;
        };
        out.push((
            player_id,
            RawBio {
                position: row.string("POSITION"),
                height: row.string("HEIGHT"),
                weight: row.string("WEIGHT"),
                birth_date: row.string("BIRTH_DATE"),
            },
        ));
    }
    Ok(out)
}

pub fn parse_player_info_json(raw: &str) -> Result<PlayerInfo> {
    let resp = parse_response(raw)?;
    let table = find_set(&resp, "CommonPlayerInfo", "PERSON_ID")?.table();
    let row = table
        .rows()
        .next()
        .ok_or_else(|| anyhow!("player info has no rows"))?;
    Ok(PlayerInfo {
        bio: RawBio {
            position: row.string("POSITION"),
            height: row.string("HEIGHT"),
            weight: row.string("WEIGHT"),
            birth_date: row.string("BIRTHDATE"),
        },
        jersey: row.string("JERSEY"),
    })
}

pub struct NbaStatsClient {
    client: &'static Client,
    season: String,
}

impl NbaStatsClient {
    pub fn new(season: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            season: season.to_string(),
        })
    }

    pub fn fetch_all_players(&self) -> Result<Vec<LeaguePlayer>> {
        let url = format!(
            "{STATS_BASE_URL}/commonallplayers?IsOnlyCurrentSeason=1&LeagueID={LEAGUE_ID}&Season={}",
            self.season
        );
        let body = self.fetch_body(&url)?;
        parse_all_players_json(&body)
    }

    pub fn fetch_team_roster(&self, team_id: u32) -> Result<Vec<(u32, RawBio)>> {
        let url = format!(
            "{STATS_BASE_URL}/commonteamroster?LeagueID={LEAGUE_ID}&Season={}&TeamID={team_id}",
            self.season
        );
        let body = self.fetch_body(&url)?;
        parse_team_roster_json(&body)
    }

    pub fn fetch_player_info(&self, player_id: u32) -> Result<PlayerInfo> {
        let url =
            format!("{STATS_BASE_URL}/commonplayerinfo?LeagueID={LEAGUE_ID}&PlayerID={player_id}");
        let body = self.fetch_body(&url)?;
        parse_player_info_json(&body)
    }

    fn fetch_body(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().context("request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {}: {}", status, truncate(&body, 200)));
        }
        Ok(body)
    }
}

impl DetailLookup for NbaStatsClient {
    fn player_info(&self, player_id: u32) -> Result<PlayerInfo> {
        self.fetch_player_info(player_id)
    }
}

/// Bulk list first (fatal if unavailable), then one roster call per team. A team whose
/// roster cannot be fetched is skipped; its players fall back to detail lookups.
pub fn fetch_biography_source(
    stats: &NbaStatsClient,
    team_pacing: Duration,
    diag: &mut Diagnostics,
) -> Result<BiographySource> {
    let players = stats
        .fetch_all_players()
        .context("fetch current player list")?;
    info!(players = players.len(), "loaded current player list");

    let mut source = BiographySource {
        players,
        roster: HashMap::new(),
    };
    let mut pacer = Pacer::new(team_pacing);
    for team_id in source.team_ids() {
        let label = source
            .team_name(team_id)
            .map(str::to_string)
            .unwrap_or_else(|| team_id.to_string());
        pacer.wait();
        match stats.fetch_team_roster(team_id) {
            Ok(rows) => {
                info!(team = %label, players = rows.len(), "loaded team roster");
                source.roster.extend(rows);
            }
            Err(err) => {
                warn!(team = %label, "roster fetch failed: {err:#}");
                diag.roster_errors.push(format!("{label} ({team_id}): {err}"));
            }
        }
    }
    Ok(source)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
