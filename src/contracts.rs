use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::name_key::NameKey;

const MIN_FIELDS: usize = 4;
const NAME_COL: usize = 1;
const FIRST_SEASON_COL: usize = 3;

// `years_left` and `value` are simulated: one extra season at the current salary.
// `actual_years_left` and `current_salary` keep what the table said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractProjection {
    pub display_name: String,
    pub years_left: i32,
    pub value: i64,
    pub actual_years_left: i32,
    pub current_salary: i64,
}

impl ContractProjection {
    pub fn from_fields(fields: &[&str]) -> Self {
        let display_name = fields.get(NAME_COL).map(|s| s.trim()).unwrap_or_default();
        let current_salary = clean_salary(fields.get(FIRST_SEASON_COL).copied());
        let actual_years_left = funded_seasons(fields);

        let simulated = actual_years_left + 1;
        let (years_left, value) = match current_salary.checked_mul(i64::from(simulated)) {
            Some(value) if current_salary > 0 && actual_years_left > 0 => (simulated, value),
            None => {
                warn!(name = display_name, current_salary, "contract value out of range");
                (0, 0)
            }
            _ => (0, 0),
        };

        Self {
            display_name: display_name.to_string(),
            years_left,
            value,
            actual_years_left,
            current_salary,
        }
    }
}

pub fn clean_salary(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return 0;
    };
    let cleaned = raw
        .trim()
        .chars()
        .filter(|ch| *ch != '$' && *ch != ',')
        .collect::<String>();
    cleaned.trim().parse::<i64>().unwrap_or(0)
}

/// Contract rows start with a numeric rank column; headers and blanks do not.
pub fn split_contract_row(line: &str) -> Option<Vec<&str>> {
    let fields = line.trim().split('\t').collect::<Vec<_>>();
    if fields.len() < MIN_FIELDS {
        return None;
    }
    let rank = fields[0].trim();
    if rank.is_empty() || !rank.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(fields)
}

// The scan ends at the first cell without a `$`; `$0` cells are skipped, not fatal.
fn funded_seasons(fields: &[&str]) -> i32 {
    let mut count = 0;
    for cell in fields.iter().skip(FIRST_SEASON_COL).copied() {
        if !cell.contains('$') {
            break;
        }
        if clean_salary(Some(cell)) > 0 {
            count += 1;
        }
    }
    count
}

pub fn process<'a, I>(lines: I) -> HashMap<NameKey, ContractProjection>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut contracts = HashMap::new();
    for line in lines {
        let Some(fields) = split_contract_row(line) else {
            continue;
        };
        let projection = ContractProjection::from_fields(&fields);
        let key = NameKey::new(&projection.display_name);
        if let Some(previous) = contracts.insert(key, projection) {
            debug!(name = %previous.display_name, "contract row replaced by a later row");
        }
    }
    contracts
}

pub fn load_contract_lines(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read contract table {}", path.display()))?;
    Ok(raw.lines().map(str::to_string).collect())
}
