use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::contracts::ContractProjection;
use crate::name_key::NameKey;
use crate::ratings::Attributes;
use crate::roster_join::PartialRecord;

pub const NO_CONTRACT_DATA: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: Option<u32>,
    pub name: String,
    pub team: String,
    pub height: Option<String>,
    pub weight: Option<u32>,
    pub age: Option<u32>,
    pub position: Option<u8>,
    #[serde(flatten)]
    pub attributes: Attributes,
    // Absent in records written before contracts were merged in.
    #[serde(default)]
    pub contract_years_left: i32,
    #[serde(default)]
    pub contract_value: i64,
}

impl PlayerRecord {
    pub fn key(&self) -> NameKey {
        NameKey::new(&self.name)
    }

    fn apply_contract(&mut self, contract: Option<&ContractProjection>) {
        match contract {
            Some(c) => {
                self.contract_years_left = c.years_left;
                self.contract_value = c.value;
            }
            None => {
                self.contract_years_left = NO_CONTRACT_DATA;
                self.contract_value = 0;
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    pub records: Vec<PlayerRecord>,
    pub matched: usize,
    pub unmatched: Vec<String>,
}

pub fn merge(
    partials: Vec<PartialRecord>,
    contracts: &HashMap<NameKey, ContractProjection>,
) -> MergeReport {
    let records = partials
        .into_iter()
        .map(|partial| PlayerRecord {
            player_id: partial.player_id,
            name: partial.ratings.name,
            team: partial.ratings.team,
            height: partial.bio.height,
            weight: partial.bio.weight,
            age: partial.bio.age,
            position: partial.bio.position,
            attributes: partial.ratings.attributes,
            contract_years_left: NO_CONTRACT_DATA,
            contract_value: 0,
        })
        .collect();
    apply_contracts(records, contracts)
}

pub fn apply_contracts(
    mut records: Vec<PlayerRecord>,
    contracts: &HashMap<NameKey, ContractProjection>,
) -> MergeReport {
    let mut matched = 0usize;
    let mut unmatched = Vec::new();
    for record in &mut records {
        let contract = contracts.get(&record.key());
        if contract.is_some() {
            matched += 1;
        } else {
            unmatched.push(record.name.clone());
        }
        record.apply_contract(contract);
    }
    MergeReport {
        records,
        matched,
        unmatched,
    }
}
