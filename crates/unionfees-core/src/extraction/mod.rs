pub mod json;
pub mod merge;
pub mod pdftotext;
pub mod table;

use crate::error::UnionFeesError;
use serde::{Deserialize, Serialize};

/// A positioned piece of text as delivered by an extraction backend.
///
/// Coordinates follow the PDF convention: `y` grows upward, so the top of a
/// page has the largest baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    #[serde(default)]
    pub font_id: String,
    pub font_size: f32,
}

impl TextRun {
    /// Runs that only signal a line break carry no cell content.
    pub fn is_line_break(&self) -> bool {
        self.text == "\n"
    }
}

/// The ordered run stream of a single page.
#[derive(Debug, Clone, Default)]
pub struct PageRuns {
    pub page_number: usize,
    pub runs: Vec<TextRun>,
}

/// Trait for text extraction backends.
pub trait RunExtractor: Send + Sync {
    /// Extract positioned runs from document bytes, one `PageRuns` per page.
    fn extract_runs(&self, bytes: &[u8]) -> Result<Vec<PageRuns>, UnionFeesError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
