use crate::error::UnionFeesError;
use crate::parsing::values::parse_identifier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Company details printed at the top of the payroll report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHeader {
    pub company_name: Option<String>,
    /// Organisation number as printed, e.g. "556234-4639".
    pub company_id: Option<String>,
    pub period: Option<String>,
}

impl ReportHeader {
    /// Organisation number as a plain integer.
    pub fn company_number(&self) -> Option<Result<u64, UnionFeesError>> {
        self.company_id.as_deref().map(parse_identifier)
    }
}

/// Extract the report header from the rows of the first page.
///
/// Labelled values ("Namn: X" in one cell, or "Namn:" followed by a value
/// cell) win. Without labels the first cells of the first two rows are used,
/// which is where older report layouts print the company name and number.
pub fn parse_header(rows: &[Vec<String>]) -> ReportHeader {
    let labelled = labelled_values(rows);

    let company_name = labelled
        .get("namn")
        .cloned()
        .or_else(|| first_cell(rows, 0));
    let company_id = labelled
        .get("organisationsnr")
        .or_else(|| labelled.get("organisationsnummer"))
        .cloned()
        .or_else(|| first_cell(rows, 1));
    let period = labelled.get("period").cloned();

    ReportHeader {
        company_name,
        company_id,
        period,
    }
}

/// Collect "label: value" pairs, keyed by the lowercased label.
/// The first occurrence of a label is kept.
fn labelled_values(rows: &[Vec<String>]) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for row in rows {
        for (j, cell) in row.iter().enumerate() {
            let Some((label, rest)) = cell.split_once(':') else {
                continue;
            };
            let label = label.trim().to_lowercase();
            if label.is_empty() || values.contains_key(&label) {
                continue;
            }
            let value = rest.trim();
            let value = if value.is_empty() {
                match row.get(j + 1) {
                    Some(next) if !next.contains(':') => next.trim(),
                    _ => continue,
                }
            } else {
                value
            };
            if !value.is_empty() {
                values.insert(label, value.to_string());
            }
        }
    }
    values
}

fn first_cell(rows: &[Vec<String>], row: usize) -> Option<String> {
    rows.get(row)
        .and_then(|r| r.first())
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty() && !c.contains(':'))
}
