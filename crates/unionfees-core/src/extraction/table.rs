use crate::extraction::TextRun;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One cell of a row: the text of one or more merged runs plus the
/// geometry of the merged span.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub font_id: String,
    pub font_size: f32,
}

impl Cell {
    pub fn from_run(run: &TextRun) -> Self {
        Cell {
            text: run.text.clone(),
            x: run.x,
            y: run.y,
            width: run.width,
            font_id: run.font_id.clone(),
            font_size: run.font_size,
        }
    }

    /// Right edge of the cell.
    pub fn end(&self) -> f32 {
        self.x + self.width
    }

    pub fn avg_char_width(&self) -> f32 {
        let chars = self.text.chars().count();
        if chars == 0 {
            0.0
        } else {
            self.width / chars as f32
        }
    }
}

/// Cells sharing one baseline, in the order they were read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut Vec<Cell> {
        &mut self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn strings(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.text.clone()).collect()
    }
}

/// Rows of one page keyed by baseline. At most one row per baseline.
#[derive(Debug, Clone, Default)]
pub struct Page {
    rows: Vec<(f32, Row)>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a row under `baseline`, replacing any row already stored there.
    pub(crate) fn store_row(&mut self, baseline: f32, row: Row) {
        match self.rows.iter_mut().find(|(b, _)| *b == baseline) {
            Some(slot) => slot.1 = row,
            None => self.rows.push((baseline, row)),
        }
    }

    /// Remove and return the row stored closest to `baseline`, if one lies
    /// within `tolerance`.
    pub(crate) fn take_row(&mut self, baseline: f32, tolerance: f32) -> Option<(f32, Row)> {
        let idx = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, (b, _))| (b - baseline).abs() <= tolerance)
            .min_by(|(_, (a, _)), (_, (b, _))| {
                (a - baseline).abs().total_cmp(&(b - baseline).abs())
            })
            .map(|(i, _)| i)?;
        Some(self.rows.swap_remove(idx))
    }

    /// Baselines of the non-empty rows, top of page first.
    pub fn baselines(&self) -> Vec<f32> {
        self.sorted().into_iter().map(|(b, _)| b).collect()
    }

    /// Cell strings of every non-empty row, top of page first.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.sorted().into_iter().map(|(_, r)| r.strings()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.iter().filter(|(_, r)| !r.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sorted(&self) -> Vec<(f32, &Row)> {
        let mut rows: Vec<(f32, &Row)> = self
            .rows
            .iter()
            .filter(|(_, r)| !r.is_empty())
            .map(|(b, r)| (*b, r))
            .collect();
        rows.sort_by(|a, b| b.0.total_cmp(&a.0));
        rows
    }

    pub fn print<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for (i, row) in self.rows().iter().enumerate() {
            writeln!(w, " {:02}: {}", i, row.join("; "))?;
        }
        Ok(())
    }
}

/// A row of the flattened document matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRow {
    /// Zero-based page index.
    pub page: usize,
    pub cells: Vec<String>,
}

/// All pages of one input document, in document order.
///
/// Pages may be appended from several threads; the page list is the only
/// shared state and sits behind a single mutex.
#[derive(Debug, Default)]
pub struct Document {
    pages: Mutex<Vec<Page>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Page>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a page and return its zero-based index.
    pub fn add_page(&self, page: Page) -> usize {
        let mut pages = self.lock();
        pages.push(page);
        pages.len() - 1
    }

    pub fn pages(&self) -> Vec<Page> {
        self.lock().clone()
    }

    pub fn page_count(&self) -> usize {
        self.lock().len()
    }

    /// Cell rows of the first page, top first. Empty for an empty document.
    pub fn first_page_rows(&self) -> Vec<Vec<String>> {
        self.lock().first().map(Page::rows).unwrap_or_default()
    }

    /// Every page's rows concatenated in page order.
    pub fn row_matrix(&self) -> Vec<DocumentRow> {
        self.lock()
            .iter()
            .enumerate()
            .flat_map(|(page, p)| {
                p.rows()
                    .into_iter()
                    .map(move |cells| DocumentRow { page, cells })
            })
            .collect()
    }

    /// Diagnostic dump of the whole document.
    pub fn print<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for (i, page) in self.lock().iter().enumerate() {
            writeln!(w, "--- Page {} ---", i)?;
            page.print(w)?;
        }
        Ok(())
    }
}
