use crate::error::UnionFeesError;
use crate::extraction::{PageRuns, RunExtractor, TextRun};

/// Backend for runs that were extracted ahead of time and saved as JSON:
/// an array of pages, each an array of run objects.
///
/// ```json
/// [[{"text": "Namn:", "x": 56.0, "y": 780.0, "width": 24.0,
///    "font_id": "F1", "font_size": 9.0}]]
/// ```
pub struct JsonRunExtractor;

impl RunExtractor for JsonRunExtractor {
    fn extract_runs(&self, bytes: &[u8]) -> Result<Vec<PageRuns>, UnionFeesError> {
        let pages: Vec<Vec<TextRun>> = serde_json::from_slice(bytes)?;
        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(i, runs)| PageRuns {
                page_number: i + 1,
                runs,
            })
            .collect())
    }

    fn backend_name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_pages_in_order() {
        let json = br#"[
            [{"text": "Namn:", "x": 56.0, "y": 780.0, "width": 24.0, "font_id": "F1", "font_size": 9.0}],
            [],
            [{"text": "Sida 3", "x": 500.0, "y": 20.0, "width": 30.0, "font_size": 8.0}]
        ]"#;
        let pages = JsonRunExtractor.extract_runs(json).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].runs[0].text, "Namn:");
        assert!(pages[1].runs.is_empty());
        assert_eq!(pages[2].page_number, 3);
        assert_eq!(pages[2].runs[0].font_id, "");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = JsonRunExtractor.extract_runs(b"{not json").unwrap_err();
        assert!(matches!(err, UnionFeesError::Json(_)));
    }
}
