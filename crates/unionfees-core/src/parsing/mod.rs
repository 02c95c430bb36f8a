pub mod header;
pub mod names;
pub mod sections;
pub mod values;

use crate::config::ConvertOptions;
use crate::error::UnionFeesError;
use crate::model::{FeeLine, PayCode, Section};
use names::normalize_name;
use rust_decimal::Decimal;
use values::{parse_amount, parse_identifier};

/// Convert one 4-column data row (name, person number, amount, remark) into
/// a fee line. The remark column is not used.
pub fn convert_data_row(
    location: u16,
    cells: &[String; 4],
    options: &ConvertOptions,
) -> Result<FeeLine, UnionFeesError> {
    let name = normalize_name(&cells[0]);
    let person_id = parse_identifier(&cells[1])?;
    let amount = parse_amount(&cells[2], options.amount_sign)?;

    Ok(FeeLine {
        location,
        person_id,
        name,
        amount,
        control_amount: Decimal::new(0, 2),
        pay_code: PayCode::AmountPaid,
    })
}

/// Convert every data row of a section. The first bad row aborts the whole
/// conversion; the error names the section and the document row.
pub fn convert_section(
    section: &Section,
    options: &ConvertOptions,
) -> Result<Vec<FeeLine>, UnionFeesError> {
    section
        .rows
        .iter()
        .enumerate()
        .map(|(i, cells)| {
            convert_data_row(options.location, cells, options).map_err(|e| {
                UnionFeesError::InRow {
                    section: section.name.clone(),
                    row: section.row_indices.get(i).copied().unwrap_or(i),
                    source: Box::new(e),
                }
            })
        })
        .collect()
}
