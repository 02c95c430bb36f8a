use crate::error::UnionFeesError;
use crate::extraction::{PageRuns, RunExtractor, TextRun};
use std::io::Write;
use std::process::Command;
use tracing::debug;

/// Font id given to every run; pdftotext does not report fonts.
const PDFTOTEXT_FONT: &str = "pdftotext";

/// Extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox-layout`, which reports every word with its bounding
/// box grouped into lines. Each word becomes one run; a space run is put
/// between neighbouring words of the same line so the merge step can join
/// them into one cell.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RunExtractor for PdftotextExtractor {
    fn extract_runs(&self, pdf_bytes: &[u8]) -> Result<Vec<PageRuns>, UnionFeesError> {
        // Removed when dropped, on every return path.
        let mut tmpfile = tempfile::NamedTempFile::new()
            .map_err(|e| UnionFeesError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| UnionFeesError::Extraction(e.to_string()))?;
        tmpfile
            .flush()
            .map_err(|e| UnionFeesError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox-layout")
            .arg(tmpfile.path())
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    UnionFeesError::PdftotextNotFound
                } else {
                    UnionFeesError::Extraction(format!("pdftotext -bbox-layout failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(UnionFeesError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let pages = parse_bbox_xml(&xml);
        debug!(pages = pages.len(), "pdftotext extraction done");
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

#[derive(Debug, Clone)]
struct Word {
    text: String,
    x_min: f32,
    y_min: f32,
    x_max: f32,
    y_max: f32,
}

fn parse_bbox_xml(xml: &str) -> Vec<PageRuns> {
    let mut pages = Vec::new();
    let mut current: Option<PageRuns> = None;
    let mut page_height = 0.0_f32;
    let mut line_words: Vec<Word> = Vec::new();

    for raw in xml.lines() {
        let line = raw.trim();

        if line.starts_with("<page ") {
            if let Some(done) = current.take() {
                pages.push(done);
            }
            page_height = parse_attr_f32(line, "height").unwrap_or(0.0);
            current = Some(PageRuns {
                page_number: pages.len() + 1,
                runs: Vec::new(),
            });
            continue;
        }

        if line.starts_with("<line") {
            line_words.clear();
            continue;
        }

        if line.starts_with("<word ") {
            if let Some(word) = parse_word(line) {
                line_words.push(word);
            }
            continue;
        }

        if line.starts_with("</line>") {
            if let Some(page) = current.as_mut() {
                line_to_runs(&line_words, page_height, &mut page.runs);
            }
            line_words.clear();
            continue;
        }

        if line.starts_with("</page>") {
            if let Some(done) = current.take() {
                pages.push(done);
            }
        }
    }

    if let Some(done) = current.take() {
        pages.push(done);
    }
    pages
}

/// Turn the words of one pdftotext line into runs, flipping `y` so that it
/// grows upward like PDF user space.
fn line_to_runs(words: &[Word], page_height: f32, runs: &mut Vec<TextRun>) {
    for (i, word) in words.iter().enumerate() {
        let font_size = round2(word.y_max - word.y_min);
        let y = round2(page_height - word.y_max);
        runs.push(TextRun {
            text: word.text.clone(),
            x: word.x_min,
            y,
            width: word.x_max - word.x_min,
            font_id: PDFTOTEXT_FONT.to_string(),
            font_size,
        });

        if let Some(next) = words.get(i + 1) {
            runs.push(TextRun {
                text: " ".to_string(),
                x: word.x_max,
                y,
                width: (next.x_min - word.x_max).max(0.0),
                font_id: PDFTOTEXT_FONT.to_string(),
                font_size,
            });
        }
    }
}

// Word boxes within one line differ in the last float digits.
fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

fn parse_word(tag: &str) -> Option<Word> {
    let text = decode_xml_entities(parse_word_text(tag)?.trim());
    if text.is_empty() {
        return None;
    }
    Some(Word {
        text,
        x_min: parse_attr_f32(tag, "xMin")?,
        y_min: parse_attr_f32(tag, "yMin")?,
        x_max: parse_attr_f32(tag, "xMax")?,
        y_max: parse_attr_f32(tag, "yMax")?,
    })
}

fn parse_attr_f32(tag: &str, name: &str) -> Option<f32> {
    parse_attr(tag, name)?.parse().ok()
}

fn parse_attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!(" {}=\"", name);
    let start = tag.find(&needle)? + needle.len();
    let rest = &tag[start..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

fn parse_word_text(word_tag: &str) -> Option<&str> {
    let start = word_tag.find('>')? + 1;
    let end = word_tag.rfind("</word>")?;
    word_tag.get(start..end)
}

fn decode_xml_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
