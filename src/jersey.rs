use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::biography::{DetailLookup, LeaguePlayer};
use crate::pacing::Pacer;

const PROGRESS_EVERY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JerseyEntry {
    pub player_id: u32,
    pub name: String,
    pub backnumber: String,
}

/// One detail lookup per player. A failed lookup, or a player without a listed number,
/// yields an empty `backnumber`; the list always covers every input player.
pub fn build_jersey_map(
    players: &[LeaguePlayer],
    lookup: &dyn DetailLookup,
    pacing: Duration,
) -> Vec<JerseyEntry> {
    let mut pacer = Pacer::new(pacing);
    let mut out = Vec::with_capacity(players.len());
    for (idx, player) in players.iter().enumerate() {
        pacer.wait();
        let backnumber = match lookup.player_info(player.player_id) {
            Ok(info) => info.jersey.unwrap_or_default(),
            Err(err) => {
                warn!(player_id = player.player_id, "jersey lookup failed: {err:#}");
                String::new()
            }
        };
        out.push(JerseyEntry {
            player_id: player.player_id,
            name: player.display_name.clone(),
            backnumber,
        });
        if (idx + 1) % PROGRESS_EVERY == 0 {
            info!("processed {}/{} players", idx + 1, players.len());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow};

    use super::*;
    use crate::biography::PlayerInfo;

    fn player(id: u32, name: &str) -> LeaguePlayer {
        LeaguePlayer {
            player_id: id,
            display_name: name.to_string(),
            team_id: None,
            team_name: None,
        }
    }

    #[test]
    fn failures_and_missing_numbers_become_empty() {
        let lookup = |id: u32| -> Result<PlayerInfo> {
            match id {
                1 => Ok(PlayerInfo {
                    jersey: Some("30".to_string()),
                    ..PlayerInfo::default()
                }),
                2 => Ok(PlayerInfo::default()),
                _ => Err(anyhow!("503")),
            }
        };
        let map = build_jersey_map(
            &[player(1, "Stephen Curry"), player(2, "Two Way"), player(3, "Gone")],
            &lookup,
            Duration::ZERO,
        );
        assert_eq!(map.len(), 3);
        assert_eq!(map[0].backnumber, "30");
        assert_eq!(map[1].backnumber, "");
        assert_eq!(map[2].backnumber, "");
        assert_eq!(map[2].name, "Gone");
    }
}
