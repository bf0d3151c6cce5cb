pub const PREVIEW_LIMIT: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub bio_unmatched: Vec<String>,
    pub contract_unmatched: Vec<String>,
    pub duplicate_ids: Vec<String>,
    pub detail_failures: Vec<String>,
    pub roster_errors: Vec<String>,
    pub detail_lookups: usize,
    pub contract_rows: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary_lines(&self, total_records: usize) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(format!(
            "Biography matched: {}/{}",
            total_records.saturating_sub(self.bio_unmatched.len()),
            total_records
        ));
        lines.push(format!(
            "Contracts matched: {}/{} (contract rows parsed: {})",
            total_records.saturating_sub(self.contract_unmatched.len()),
            total_records,
            self.contract_rows
        ));
        lines.push(format!("Detail lookups: {}", self.detail_lookups));

        push_preview(&mut lines, "No biography match", &self.bio_unmatched);
        push_preview(&mut lines, "No contract match (FA, rookies, ...)", &self.contract_unmatched);
        push_preview(&mut lines, "Duplicate player ids", &self.duplicate_ids);
        push_preview(&mut lines, "Detail lookup failures", &self.detail_failures);
        push_preview(&mut lines, "Roster fetch failures", &self.roster_errors);
        lines
    }
}

pub fn preview(names: &[String], limit: usize) -> String {
    let shown = names
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > limit {
        format!("{shown}...")
    } else {
        shown
    }
}

fn push_preview(lines: &mut Vec<String>, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("{label} ({}): {}", items.len(), preview(items, PREVIEW_LIMIT)));
}
