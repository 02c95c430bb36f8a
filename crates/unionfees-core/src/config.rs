use crate::error::UnionFeesError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Marker label that opens a remittance table in the payroll report.
pub const DEFAULT_SECTION_LABEL: &str = "Fackförbund";

/// Tuning knobs for the whole pipeline, loadable from a JSON file.
///
/// Every field has a default, so `{}` is a valid options file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub merge: MergeOptions,
    pub sections: SectionOptions,
    pub convert: ConvertOptions,
}

/// Which baseline a finished row is stored under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushKey {
    /// Baseline of the last run added to the row.
    #[default]
    LastRun,
    /// Baseline the row was opened at.
    OpenedAt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// How many average character widths a run may start after the end of
    /// the previous run and still continue the same cell.
    pub column_tolerance_chars: f32,
    /// Maximum baseline difference for two runs to share a row.
    /// `0.0` requires exact equality.
    pub baseline_tolerance: f32,
    pub flush_key: FlushKey,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            column_tolerance_chars: 5.0,
            baseline_tolerance: 0.0,
            flush_key: FlushKey::LastRun,
        }
    }
}

/// What happens to an open section when a new page begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageBreak {
    /// The section is finalized at the end of its page.
    #[default]
    Close,
    /// The section keeps collecting rows until the next marker.
    Continue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionOptions {
    /// Label of the marker cell, matched as `"<label>: "` at the start of a cell.
    pub label: String,
    /// Rows directly after the marker that are never collected (column captions).
    pub skip_after_marker: usize,
    pub page_break: PageBreak,
    /// Reject a section name that occurs twice instead of keeping the last one.
    pub strict_names: bool,
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self {
            label: DEFAULT_SECTION_LABEL.to_string(),
            skip_after_marker: 1,
            page_break: PageBreak::Close,
            strict_names: false,
        }
    }
}

/// Treatment of a minus sign in the amount column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSign {
    /// Every hyphen is removed, so amounts are always non-negative.
    #[default]
    Discard,
    /// A leading minus is kept. Negative amounts fail at encode time.
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Location number assigned to every fee line read from the report.
    pub location: u16,
    pub amount_sign: AmountSign,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            location: 1,
            amount_sign: AmountSign::Discard,
        }
    }
}

/// Load options from a JSON file.
pub fn load_options(path: &Path) -> Result<Options, UnionFeesError> {
    let content = std::fs::read_to_string(path).map_err(|e| UnionFeesError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let options: Options =
        serde_json::from_str(&content).map_err(|e| UnionFeesError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_options(&options)?;
    Ok(options)
}

/// Parse options from a JSON string (no file path context).
pub fn parse_options_str(json: &str) -> Result<Options, UnionFeesError> {
    let options: Options = serde_json::from_str(json)?;
    validate_options(&options)?;
    Ok(options)
}

pub fn validate_options(options: &Options) -> Result<(), UnionFeesError> {
    let merge = &options.merge;
    if !merge.column_tolerance_chars.is_finite() || merge.column_tolerance_chars < 0.0 {
        return Err(UnionFeesError::ConfigInvalid(format!(
            "merge.column_tolerance_chars must be a non-negative number, got {}",
            merge.column_tolerance_chars
        )));
    }
    if !merge.baseline_tolerance.is_finite() || merge.baseline_tolerance < 0.0 {
        return Err(UnionFeesError::ConfigInvalid(format!(
            "merge.baseline_tolerance must be a non-negative number, got {}",
            merge.baseline_tolerance
        )));
    }
    if options.sections.label.trim().is_empty() {
        return Err(UnionFeesError::ConfigInvalid(
            "sections.label must not be empty".into(),
        ));
    }
    if options.convert.location > 9999 {
        return Err(UnionFeesError::ConfigInvalid(format!(
            "convert.location must be at most 4 digits, got {}",
            options.convert.location
        )));
    }
    Ok(())
}
