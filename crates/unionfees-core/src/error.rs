use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum UnionFeesError {
    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("malformed person identifier '{value}'")]
    MalformedIdentifier { value: String },

    #[error("malformed amount '{value}'")]
    MalformedAmount { value: String },

    #[error("union code {0} is out of range (1-99)")]
    InvalidUnionCode(i64),

    #[error("union code '{value}' is not a number")]
    MalformedUnionCode { value: String },

    #[error("period {0} is out of range (1-12)")]
    InvalidPeriod(u32),

    #[error("year {0} is out of range (0-99)")]
    InvalidYear(u32),

    #[error("value '{value}' does not fit the {width}-digit field '{field}'")]
    FieldOverflow {
        field: &'static str,
        value: String,
        width: usize,
    },

    #[error("negative amount {value} cannot be written to field '{field}'")]
    NegativeAmount { field: &'static str, value: String },

    #[error("section marker on row {row} has an empty name")]
    EmptySectionName { row: usize },

    #[error("section '{name}' appears more than once in the document")]
    AmbiguousSection { name: String },

    #[error("no section named '{0}' in the document")]
    UnknownSection(String),

    #[error("{0} not found in the report header, pass it explicitly")]
    MissingHeaderField(&'static str),

    #[error("section '{section}', row {row}: {source}")]
    InRow {
        section: String,
        row: usize,
        #[source]
        source: Box<UnionFeesError>,
    },

    #[error("failed to load options from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid options: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
