//! Rebuilds table rows from the run stream of a page.
//!
//! Extraction backends hand over text in small pieces: single glyphs,
//! words, or fragments of a word split wherever the font's kerning changes.
//! Runs sharing a baseline form a row, and a run that starts close enough to
//! the end of the previous one (same font, same size) continues its cell.

use crate::config::{FlushKey, MergeOptions};
use crate::extraction::table::{Cell, Document, Page, Row};
use crate::extraction::{PageRuns, TextRun};
use tracing::debug;

/// Whether `run` continues `prev` as part of the same cell.
///
/// The run must use the same font and size and start no further right than
/// the end of `prev` plus `tolerance_chars` of its average character width.
pub fn continues_cell(prev: &Cell, run: &TextRun, tolerance_chars: f32) -> bool {
    if prev.font_id != run.font_id || prev.font_size != run.font_size {
        return false;
    }
    let acceptable = prev.end() + tolerance_chars * prev.avg_char_width();
    run.x <= acceptable
}

/// Add a run to a row, merging it into the last cell when it continues it.
///
/// Returns the baseline of the cell that received the run.
pub fn add_run(row: &mut Row, run: &TextRun, tolerance_chars: f32) -> f32 {
    let cells = row.cells_mut();
    if let Some(last) = cells.last_mut() {
        if continues_cell(last, run, tolerance_chars) {
            last.text.push_str(&run.text);
            last.width = run.x - last.x + run.width;
            return last.y;
        }
    }
    cells.push(Cell::from_run(run));
    run.y
}

#[derive(Debug)]
struct OpenRow {
    opened_at: f32,
    last_baseline: f32,
    row: Row,
}

/// Incremental page builder: one open row plus the rows already stored.
#[derive(Debug)]
pub struct PageBuilder<'a> {
    options: &'a MergeOptions,
    page: Page,
    open: Option<OpenRow>,
}

impl<'a> PageBuilder<'a> {
    pub fn new(options: &'a MergeOptions) -> Self {
        PageBuilder {
            options,
            page: Page::new(),
            open: None,
        }
    }

    pub fn push(&mut self, run: &TextRun) {
        if run.is_line_break() {
            return;
        }

        let mut open = match self.open.take() {
            Some(open) if self.same_baseline(open.last_baseline, run.y) => open,
            previous => {
                if let Some(previous) = previous {
                    self.store(previous);
                }
                self.resume_or_open(run.y)
            }
        };
        open.last_baseline = add_run(&mut open.row, run, self.options.column_tolerance_chars);
        self.open = Some(open);
    }

    pub fn finish(mut self) -> Page {
        if let Some(open) = self.open.take() {
            self.store(open);
        }
        self.page
    }

    fn same_baseline(&self, a: f32, b: f32) -> bool {
        (a - b).abs() <= self.options.baseline_tolerance
    }

    fn resume_or_open(&mut self, baseline: f32) -> OpenRow {
        match self.page.take_row(baseline, self.options.baseline_tolerance) {
            Some((stored_at, row)) => OpenRow {
                opened_at: stored_at,
                last_baseline: stored_at,
                row,
            },
            None => OpenRow {
                opened_at: baseline,
                last_baseline: baseline,
                row: Row::default(),
            },
        }
    }

    // The one place that decides the key of a finished row.
    fn store(&mut self, open: OpenRow) {
        let key = match self.options.flush_key {
            FlushKey::LastRun => open.last_baseline,
            FlushKey::OpenedAt => open.opened_at,
        };
        self.page.store_row(key, open.row);
    }
}

/// Build one page from its run stream.
pub fn build_page(runs: &[TextRun], options: &MergeOptions) -> Page {
    let mut builder = PageBuilder::new(options);
    for run in runs {
        builder.push(run);
    }
    builder.finish()
}

/// Build a document from the run streams of all pages, in the given order.
pub fn build_document(pages: &[PageRuns], options: &MergeOptions) -> Document {
    let doc = Document::new();
    for page_runs in pages {
        let page = build_page(&page_runs.runs, options);
        debug!(
            page = page_runs.page_number,
            runs = page_runs.runs.len(),
            rows = page.len(),
            "merged page"
        );
        doc.add_page(page);
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, x: f32, y: f32) -> TextRun {
        TextRun {
            text: text.into(),
            x,
            y,
            // 5 points per character
            width: text.chars().count() as f32 * 5.0,
            font_id: "Helvetica".into(),
            font_size: 9.0,
        }
    }

    #[test]
    fn test_fragments_of_one_cell_merge() {
        let runs = vec![
            run("Allan", 50.0, 700.0),
            run(" ", 75.0, 700.0),
            run("Karl", 80.0, 700.0),
            run("sson", 101.0, 700.0),
            run("19500101-1234", 250.0, 700.0),
        ];
        let page = build_page(&runs, &MergeOptions::default());
        assert_eq!(
            page.rows(),
            vec![vec!["Allan Karlsson", "19500101-1234"]]
        );
    }

    #[test]
    fn test_tolerance_window_is_inclusive() {
        let opts = MergeOptions::default();
        // "ab" ends at 10, avg width 5, window ends at 10 + 5 * 5 = 35
        let runs = vec![run("ab", 0.0, 10.0), run("c", 35.0, 10.0)];
        assert_eq!(build_page(&runs, &opts).rows(), vec![vec!["abc"]]);

        let runs = vec![run("ab", 0.0, 10.0), run("c", 35.5, 10.0)];
        assert_eq!(build_page(&runs, &opts).rows(), vec![vec!["ab", "c"]]);
    }

    #[test]
    fn test_merged_width_spans_both_runs() {
        let mut row = Row::default();
        add_run(&mut row, &run("570", 100.0, 50.0), 5.0);
        add_run(&mut row, &run(",35", 116.0, 50.0), 5.0);
        let cell = &row.cells()[0];
        assert_eq!(cell.text, "570,35");
        assert_eq!(cell.width, 31.0);
    }

    #[test]
    fn test_font_change_starts_new_cell() {
        let mut bold = run("Summa", 20.0, 300.0);
        bold.font_id = "Helvetica-Bold".into();
        let runs = vec![bold, run("1210,35", 48.0, 300.0)];
        let page = build_page(&runs, &MergeOptions::default());
        assert_eq!(page.rows(), vec![vec!["Summa", "1210,35"]]);

        let mut larger = run("1210,35", 48.0, 300.0);
        larger.font_size = 12.0;
        let runs = vec![run("Summa", 20.0, 300.0), larger];
        let page = build_page(&runs, &MergeOptions::default());
        assert_eq!(page.rows(), vec![vec!["Summa", "1210,35"]]);
    }

    #[test]
    fn test_rows_in_reading_order() {
        let runs = vec![
            run("second", 10.0, 680.0),
            run("first", 10.0, 700.0),
            run("third", 10.0, 660.0),
        ];
        let page = build_page(&runs, &MergeOptions::default());
        assert_eq!(
            page.rows(),
            vec![vec!["first"], vec!["second"], vec!["third"]]
        );
    }

    #[test]
    fn test_revisited_baseline_resumes_row() {
        // Column-wise output: the extractor returns to an earlier line.
        let runs = vec![
            run("Allan Karlsson", 10.0, 700.0),
            run("Evert Johansson", 10.0, 680.0),
            run("570,35", 300.0, 700.0),
            run("640,00", 300.0, 680.0),
        ];
        let page = build_page(&runs, &MergeOptions::default());
        assert_eq!(
            page.rows(),
            vec![
                vec!["Allan Karlsson", "570,35"],
                vec!["Evert Johansson", "640,00"],
            ]
        );
    }

    #[test]
    fn test_line_break_is_ignored() {
        let runs = vec![
            run("Namn:", 10.0, 700.0),
            run("\n", 0.0, 690.0),
            run("Verkstad AB", 200.0, 700.0),
        ];
        let page = build_page(&runs, &MergeOptions::default());
        assert_eq!(page.rows(), vec![vec!["Namn:", "Verkstad AB"]]);
    }

    #[test]
    fn test_last_row_of_page_is_kept() {
        let runs = vec![run("header", 10.0, 700.0), run("Sida 1 av 1", 10.0, 20.0)];
        let page = build_page(&runs, &MergeOptions::default());
        assert_eq!(page.len(), 2);
        assert_eq!(page.rows()[1], vec!["Sida 1 av 1"]);
    }

    #[test]
    fn test_empty_stream_gives_empty_page() {
        let page = build_page(&[], &MergeOptions::default());
        assert!(page.is_empty());
    }

    #[test]
    fn test_exact_baseline_by_default() {
        let runs = vec![run("a", 10.0, 700.0), run("b", 200.0, 700.25)];
        let page = build_page(&runs, &MergeOptions::default());
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn test_flush_key_policy_with_drift() {
        let runs = vec![run("a", 10.0, 700.0), run("b", 200.0, 700.5)];

        let legacy = MergeOptions {
            baseline_tolerance: 1.0,
            ..MergeOptions::default()
        };
        let page = build_page(&runs, &legacy);
        assert_eq!(page.rows(), vec![vec!["a", "b"]]);
        assert_eq!(page.baselines(), vec![700.5]);

        let opened_at = MergeOptions {
            baseline_tolerance: 1.0,
            flush_key: FlushKey::OpenedAt,
            ..MergeOptions::default()
        };
        let page = build_page(&runs, &opened_at);
        assert_eq!(page.baselines(), vec![700.0]);
    }

    #[test]
    fn test_drift_onto_occupied_baseline_overwrites() {
        // With the legacy key, a row that drifts onto the baseline of a row
        // stored earlier replaces it.
        let opts = MergeOptions {
            baseline_tolerance: 1.0,
            ..MergeOptions::default()
        };
        let runs = vec![
            run("upper", 10.0, 701.6),
            run("lower", 10.0, 700.0),
            run("mid", 200.0, 700.8),
            run("drift", 300.0, 701.6),
            run("footer", 10.0, 20.0),
        ];
        let page = build_page(&runs, &opts);
        assert_eq!(
            page.rows(),
            vec![vec!["lower", "mid", "drift"], vec!["footer"]]
        );

        let opts = MergeOptions {
            flush_key: FlushKey::OpenedAt,
            ..opts
        };
        let page = build_page(&runs, &opts);
        assert_eq!(
            page.rows(),
            vec![
                vec!["upper"],
                vec!["lower", "mid", "drift"],
                vec!["footer"]
            ]
        );
    }

    #[test]
    fn test_build_document_keeps_page_order() {
        let pages = vec![
            PageRuns {
                page_number: 1,
                runs: vec![run("one", 10.0, 700.0)],
            },
            PageRuns {
                page_number: 2,
                runs: vec![run("two", 10.0, 700.0)],
            },
        ];
        let doc = build_document(&pages, &MergeOptions::default());
        let matrix = doc.row_matrix();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix[0].cells, vec!["one"]);
        assert_eq!(matrix[1].page, 1);
    }
}
