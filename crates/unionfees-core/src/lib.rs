pub mod config;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod remittance;

use config::{MergeOptions, Options};
use error::UnionFeesError;
use extraction::merge::build_document;
use extraction::table::Document;
use extraction::RunExtractor;
use model::{CompanyContext, FeeLine, LocationBundle, Section, UnionCode};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub use parsing::header::{parse_header, ReportHeader};

/// Extract positioned runs from document bytes and rebuild the page tables.
pub fn read_document(
    bytes: &[u8],
    extractor: &dyn RunExtractor,
    options: &MergeOptions,
) -> Result<Document, UnionFeesError> {
    let pages = extractor.extract_runs(bytes)?;
    debug!(
        backend = extractor.backend_name(),
        pages = pages.len(),
        "runs extracted"
    );
    Ok(build_document(&pages, options))
}

/// The named remittance tables of one payroll document, ready to encode.
#[derive(Debug, Clone)]
pub struct Remittance {
    company: CompanyContext,
    options: Options,
    sections: BTreeMap<String, Section>,
}

impl Remittance {
    /// Split a document into sections. Sections are only converted when
    /// they are encoded, so a bad row in one section does not affect others.
    pub fn from_document(
        document: &Document,
        company: CompanyContext,
        options: &Options,
    ) -> Result<Self, UnionFeesError> {
        let rows = document.row_matrix();
        let sections = parsing::sections::extract_sections(&rows, &options.sections)?;
        debug!(
            rows = rows.len(),
            sections = sections.len(),
            "document split into sections"
        );
        Ok(Self::from_sections(sections, company, options))
    }

    pub fn from_sections(
        sections: BTreeMap<String, Section>,
        company: CompanyContext,
        options: &Options,
    ) -> Self {
        Remittance {
            company,
            options: options.clone(),
            sections,
        }
    }

    pub fn company(&self) -> &CompanyContext {
        &self.company
    }

    /// Section names in sorted order.
    pub fn list_sections(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    fn require(&self, name: &str) -> Result<&Section, UnionFeesError> {
        self.section(name)
            .ok_or_else(|| UnionFeesError::UnknownSection(name.to_string()))
    }

    /// Convert every data row of a section into a fee line.
    pub fn fee_lines(&self, name: &str) -> Result<Vec<FeeLine>, UnionFeesError> {
        parsing::convert_section(self.require(name)?, &self.options.convert)
    }

    /// Fee lines of a section grouped by location.
    pub fn locations(&self, name: &str) -> Result<BTreeMap<u16, LocationBundle>, UnionFeesError> {
        let lines = self.fee_lines(name)?;
        remittance::build_locations(&self.company, lines)
    }

    /// Encode one section as a remittance file for the given union.
    pub fn encode_section(&self, name: &str, union: UnionCode) -> Result<Vec<u8>, UnionFeesError> {
        let bundles = self.locations(name)?;
        let bytes = remittance::encode(&bundles, union)?;
        info!(
            section = name,
            union = union.value(),
            locations = bundles.len(),
            bytes = bytes.len(),
            "section encoded"
        );
        Ok(bytes)
    }
}
