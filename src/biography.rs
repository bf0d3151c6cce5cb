use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;

use crate::bio_fields::{BioFields, age_on, map_position, parse_height, parse_weight};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaguePlayer {
    pub player_id: u32,
    pub display_name: String,
    pub team_id: Option<u32>,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBio {
    pub position: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub birth_date: Option<String>,
}

impl RawBio {
    pub fn to_fields(&self, reference: NaiveDate) -> BioFields {
        BioFields {
            height: parse_height(self.height.as_deref()),
            weight: parse_weight(self.weight.as_deref()),
            age: age_on(self.birth_date.as_deref(), reference),
            position: map_position(self.position.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerInfo {
    pub bio: RawBio,
    pub jersey: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BiographySource {
    pub players: Vec<LeaguePlayer>,
    pub roster: HashMap<u32, RawBio>,
}

impl BiographySource {
    pub fn team_ids(&self) -> Vec<u32> {
        let mut ids = self
            .players
            .iter()
            .filter_map(|p| p.team_id)
            .filter(|id| *id != 0)
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn team_name(&self, team_id: u32) -> Option<&str> {
        self.players
            .iter()
            .find(|p| p.team_id == Some(team_id))
            .and_then(|p| p.team_name.as_deref())
    }
}

/// Per-player lookup against the authoritative (and slow) detail source.
pub trait DetailLookup {
    fn player_info(&self, player_id: u32) -> Result<PlayerInfo>;
}

impl<F> DetailLookup for F
where
    F: Fn(u32) -> Result<PlayerInfo>,
{
    fn player_info(&self, player_id: u32) -> Result<PlayerInfo> {
        self(player_id)
    }
}
