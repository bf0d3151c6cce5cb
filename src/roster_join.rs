use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::bio_fields::BioFields;
use crate::biography::{BiographySource, DetailLookup, LeaguePlayer};
use crate::diagnostics::Diagnostics;
use crate::name_key::NameKey;
use crate::pacing::Pacer;
use crate::ratings::RatingsRow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRecord {
    pub player_id: Option<u32>,
    pub ratings: RatingsRow,
    pub bio: BioFields,
}

impl PartialRecord {
    pub fn unmatched(ratings: RatingsRow) -> Self {
        Self {
            player_id: None,
            ratings,
            bio: BioFields::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JoinOptions {
    pub reference: NaiveDate,
    pub detail_pacing: Duration,
}

/// Later entries win when two display names share a key.
pub fn build_name_index(players: &[LeaguePlayer]) -> HashMap<NameKey, u32> {
    let mut index = HashMap::with_capacity(players.len());
    for player in players {
        let key = NameKey::new(&player.display_name);
        if key.is_empty() {
            continue;
        }
        if let Some(previous) = index.insert(key, player.player_id)
            && previous != player.player_id
        {
            debug!(
                name = %player.display_name,
                previous,
                player_id = player.player_id,
                "name key collision in player list"
            );
        }
    }
    index
}

/// Ratings rows drive the output: every row comes back exactly once, in order. Roster
/// snapshot values take precedence; the detail lookup only runs for rows whose snapshot
/// is missing something, and its failure leaves those fields empty.
pub fn join(
    ratings: Vec<RatingsRow>,
    source: &BiographySource,
    lookup: &dyn DetailLookup,
    opts: &JoinOptions,
    diag: &mut Diagnostics,
) -> Vec<PartialRecord> {
    let index = build_name_index(&source.players);
    let mut claimed: HashSet<u32> = HashSet::new();
    let mut pacer = Pacer::new(opts.detail_pacing);
    let mut out = Vec::with_capacity(ratings.len());

    for row in ratings {
        let key = NameKey::new(&row.name);
        let Some(&player_id) = index.get(&key) else {
            diag.bio_unmatched.push(row.name.clone());
            out.push(PartialRecord::unmatched(row));
            continue;
        };

        if !claimed.insert(player_id) {
            warn!(name = %row.name, player_id, "player id already assigned to an earlier row");
            diag.duplicate_ids.push(format!("{} ({player_id})", row.name));
            diag.bio_unmatched.push(row.name.clone());
            out.push(PartialRecord::unmatched(row));
            continue;
        }

        let snapshot = source
            .roster
            .get(&player_id)
            .map(|raw| raw.to_fields(opts.reference))
            .unwrap_or_default();

        let bio = if snapshot.is_complete() {
            snapshot
        } else {
            pacer.wait();
            diag.detail_lookups += 1;
            match lookup.player_info(player_id) {
                Ok(info) => snapshot.or_fill_from(info.bio.to_fields(opts.reference)),
                Err(err) => {
                    warn!(name = %row.name, player_id, "detail lookup failed: {err:#}");
                    diag.detail_failures.push(format!("{} ({player_id}): {err}", row.name));
                    snapshot
                }
            }
        };

        out.push(PartialRecord {
            player_id: Some(player_id),
            ratings: row,
            bio,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use anyhow::{Result, anyhow};

    use super::*;
    use crate::biography::{PlayerInfo, RawBio};
    use crate::ratings::Attributes;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")
    }

    fn opts() -> JoinOptions {
        JoinOptions {
            reference: reference(),
            detail_pacing: Duration::ZERO,
        }
    }

    fn row(name: &str) -> RatingsRow {
        RatingsRow {
            name: name.to_string(),
            team: "XYZ".to_string(),
            attributes: Attributes::default(),
        }
    }

    fn league_player(id: u32, name: &str) -> LeaguePlayer {
        LeaguePlayer {
            player_id: id,
            display_name: name.to_string(),
            team_id: Some(1),
            team_name: Some("XYZ".to_string()),
        }
    }

    fn full_bio() -> RawBio {
        RawBio {
            position: Some("Guard".to_string()),
            height: Some("6-3".to_string()),
            weight: Some("190".to_string()),
            birth_date: Some("1995-06-01T00:00:00".to_string()),
        }
    }

    struct RecordingLookup {
        calls: RefCell<Vec<u32>>,
        fail: HashSet<u32>,
    }

    impl RecordingLookup {
        fn new(fail: &[u32]) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail: fail.iter().copied().collect(),
            }
        }
    }

    impl DetailLookup for RecordingLookup {
        fn player_info(&self, player_id: u32) -> Result<PlayerInfo> {
            self.calls.borrow_mut().push(player_id);
            if self.fail.contains(&player_id) {
                return Err(anyhow!("timed out"));
            }
            Ok(PlayerInfo {
                bio: RawBio {
                    position: Some("Guard-Forward".to_string()),
                    height: Some("6-4".to_string()),
                    weight: Some("200".to_string()),
                    birth_date: Some("1990-01-01".to_string()),
                },
                jersey: Some("7".to_string()),
            })
        }
    }

    #[test]
    fn unmatched_rows_are_kept_with_empty_metadata() {
        let source = BiographySource {
            players: vec![league_player(1, "Known Player")],
            roster: HashMap::new(),
        };
        let lookup = RecordingLookup::new(&[]);
        let mut diag = Diagnostics::new();
        let out = join(
            vec![row("Known Player"), row("Mystery Man")],
            &source,
            &lookup,
            &opts(),
            &mut diag,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].player_id, Some(1));
        assert_eq!(out[1].player_id, None);
        assert_eq!(out[1].bio, BioFields::default());
        assert_eq!(diag.bio_unmatched, vec!["Mystery Man".to_string()]);
    }

    #[test]
    fn complete_snapshot_skips_detail_lookup() {
        let mut roster = HashMap::new();
        roster.insert(1, full_bio());
        let source = BiographySource {
            players: vec![league_player(1, "Known Player")],
            roster,
        };
        let lookup = RecordingLookup::new(&[]);
        let mut diag = Diagnostics::new();
        let out = join(vec![row("known player")], &source, &lookup, &opts(), &mut diag);
        assert!(lookup.calls.borrow().is_empty());
        assert_eq!(diag.detail_lookups, 0);
        assert_eq!(out[0].bio.height.as_deref(), Some("6-3"));
        assert_eq!(out[0].bio.age, Some(29));
        assert_eq!(out[0].bio.position, Some(1));
    }

    #[test]
    fn detail_fills_only_missing_fields() {
        let mut roster = HashMap::new();
        roster.insert(
            1,
            RawBio {
                position: Some("SF".to_string()),
                height: Some("6-8".to_string()),
                weight: None,
                birth_date: None,
            },
        );
        let source = BiographySource {
            players: vec![league_player(1, "Known Player")],
            roster,
        };
        let lookup = RecordingLookup::new(&[]);
        let mut diag = Diagnostics::new();
        let out = join(vec![row("Known Player")], &source, &lookup, &opts(), &mut diag);
        assert_eq!(*lookup.calls.borrow(), vec![1]);
        let bio = &out[0].bio;
        assert_eq!(bio.height.as_deref(), Some("6-8"));
        assert_eq!(bio.position, Some(3));
        assert_eq!(bio.weight, Some(200));
        assert_eq!(bio.age, Some(35));
    }

    #[test]
    fn failed_lookup_degrades_only_that_row() {
        let source = BiographySource {
            players: vec![league_player(1, "First One"), league_player(2, "Second One")],
            roster: HashMap::new(),
        };
        let lookup = RecordingLookup::new(&[1]);
        let mut diag = Diagnostics::new();
        let out = join(
            vec![row("First One"), row("Second One")],
            &source,
            &lookup,
            &opts(),
            &mut diag,
        );
        assert_eq!(*lookup.calls.borrow(), vec![1, 2]);
        assert_eq!(out[0].player_id, Some(1));
        assert_eq!(out[0].bio, BioFields::default());
        assert_eq!(out[1].bio.weight, Some(200));
        assert_eq!(diag.detail_failures.len(), 1);
        assert!(diag.detail_failures[0].starts_with("First One (1)"));
    }

    #[test]
    fn second_claim_on_same_id_is_unmatched() {
        let source = BiographySource {
            players: vec![league_player(1, "Gary Trent Jr.")],
            roster: HashMap::new(),
        };
        let lookup = RecordingLookup::new(&[]);
        let mut diag = Diagnostics::new();
        let out = join(
            vec![row("Gary Trent Jr."), row("Gary Trent")],
            &source,
            &lookup,
            &opts(),
            &mut diag,
        );
        assert_eq!(out[0].player_id, Some(1));
        assert_eq!(out[1].player_id, None);
        assert_eq!(diag.duplicate_ids, vec!["Gary Trent (1)".to_string()]);
    }

    #[test]
    fn index_prefers_later_duplicates() {
        let index = build_name_index(&[league_player(1, "Same Name"), league_player(2, "same-name")]);
        assert_eq!(index.get(&NameKey::new("Same Name")), Some(&2));
    }
}
