pub mod convert;
pub mod dump;
pub mod sections;

use std::path::{Path, PathBuf};
use unionfees_core::config::{self, Options};
use unionfees_core::error::UnionFeesError;
use unionfees_core::extraction::json::JsonRunExtractor;
use unionfees_core::extraction::pdftotext::PdftotextExtractor;
use unionfees_core::extraction::table::Document;
use unionfees_core::extraction::RunExtractor;

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Options from the given file, or the defaults.
pub fn load_options(path: Option<&PathBuf>) -> Result<Options, UnionFeesError> {
    match path {
        Some(path) => config::load_options(path),
        None => Ok(Options::default()),
    }
}

/// Read an input file into a document. `.json` files hold pre-extracted
/// runs, anything else goes through pdftotext.
pub fn load_document(path: &Path, options: &Options) -> Result<Document, UnionFeesError> {
    let bytes = std::fs::read(path)?;
    let extractor: Box<dyn RunExtractor> = if is_json(path) {
        Box::new(JsonRunExtractor)
    } else {
        Box::new(PdftotextExtractor::new())
    };
    unionfees_core::read_document(&bytes, extractor.as_ref(), &options.merge)
}
