pub mod encoder;
pub mod field;

use crate::error::UnionFeesError;
use crate::model::{CompanyContext, FeeLine, LocationBundle};
use std::collections::BTreeMap;

pub use encoder::{encode, write_remittance};

/// Group fee lines by location. Bundles are created on first use and keep
/// their lines in input order.
pub fn build_locations(
    company: &CompanyContext,
    lines: impl IntoIterator<Item = FeeLine>,
) -> Result<BTreeMap<u16, LocationBundle>, UnionFeesError> {
    let mut bundles: BTreeMap<u16, LocationBundle> = BTreeMap::new();
    for line in lines {
        bundles
            .entry(line.location)
            .or_insert_with(|| LocationBundle::new(company, line.location))
            .push(line)?;
    }
    Ok(bundles)
}

/// File name for one section's remittance, e.g. `IF Metall-1204.txt`.
pub fn output_file_name(section: &str, year: u32, period: u32) -> String {
    format!("{}-{year:02}{period:02}.txt", file_name_part(section))
}

/// Make text from the report usable inside a single file name: path
/// separators and NUL become `_`.
pub fn file_name_part(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}
