use crate::config::{PageBreak, SectionOptions};
use crate::error::UnionFeesError;
use crate::extraction::table::DocumentRow;
use crate::model::Section;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Number of columns of a remittance data row.
pub const DATA_COLUMNS: usize = 4;

#[derive(Debug)]
enum State {
    Idle,
    Open { section: Section, skip: usize },
}

/// Walks the document's row matrix and splits it into named sections.
struct SectionExtractor<'a> {
    options: &'a SectionOptions,
    marker: String,
    state: State,
    page: Option<usize>,
    sections: BTreeMap<String, Section>,
}

impl<'a> SectionExtractor<'a> {
    fn new(options: &'a SectionOptions) -> Self {
        SectionExtractor {
            options,
            marker: format!("{}: ", options.label),
            state: State::Idle,
            page: None,
            sections: BTreeMap::new(),
        }
    }

    fn feed(&mut self, index: usize, row: &DocumentRow) -> Result<(), UnionFeesError> {
        if self.page != Some(row.page) {
            if self.page.is_some() && self.options.page_break == PageBreak::Close {
                self.finalize()?;
            }
            self.page = Some(row.page);
        }

        if let Some(name) = self.marker_name(&row.cells) {
            self.finalize()?;
            if name.is_empty() {
                return Err(UnionFeesError::EmptySectionName { row: index });
            }
            debug!(section = %name, row = index, "section opened");
            self.state = State::Open {
                section: Section::new(name),
                skip: self.options.skip_after_marker,
            };
            return Ok(());
        }

        if let State::Open { section, skip } = &mut self.state {
            if *skip > 0 {
                *skip -= 1;
            } else if row.cells.len() == DATA_COLUMNS {
                section.rows.push([
                    row.cells[0].clone(),
                    row.cells[1].clone(),
                    row.cells[2].clone(),
                    row.cells[3].clone(),
                ]);
                section.row_indices.push(index);
            }
        }
        Ok(())
    }

    fn marker_name(&self, cells: &[String]) -> Option<String> {
        cells
            .iter()
            .find(|c| c.starts_with(&self.marker))
            .and_then(|c| c.split_once(':'))
            .map(|(_, name)| name.trim().to_string())
    }

    fn finalize(&mut self) -> Result<(), UnionFeesError> {
        let State::Open { section, .. } = std::mem::replace(&mut self.state, State::Idle) else {
            return Ok(());
        };
        if self.sections.contains_key(&section.name) {
            if self.options.strict_names {
                return Err(UnionFeesError::AmbiguousSection { name: section.name });
            }
            warn!(section = %section.name, "section name repeated, keeping the last one");
        }
        debug!(section = %section.name, rows = section.len(), "section closed");
        self.sections.insert(section.name.clone(), section);
        Ok(())
    }
}

/// Split the document's row matrix into named sections of data rows.
///
/// A row with a cell starting with `"<label>: "` opens a section named by
/// the rest of that cell. Rows with exactly four cells are collected until
/// the next marker, the end of the document, or (with `PageBreak::Close`)
/// the end of the page.
pub fn extract_sections(
    rows: &[DocumentRow],
    options: &SectionOptions,
) -> Result<BTreeMap<String, Section>, UnionFeesError> {
    let mut extractor = SectionExtractor::new(options);
    for (index, row) in rows.iter().enumerate() {
        extractor.feed(index, row)?;
    }
    extractor.finalize()?;
    Ok(extractor.sections)
}
