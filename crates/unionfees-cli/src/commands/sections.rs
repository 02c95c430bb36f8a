use std::path::PathBuf;
use unionfees_core::error::UnionFeesError;
use unionfees_core::parsing::sections::extract_sections;

use crate::commands::{load_document, load_options};
use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    config: Option<PathBuf>,
) -> Result<(), UnionFeesError> {
    let options = load_options(config.as_ref())?;
    let document = load_document(&input_file, &options)?;
    let sections = extract_sections(&document.row_matrix(), &options.sections)?;

    match output_format {
        "json" => output::json::print(&sections)?,
        _ => output::table::print_sections(&sections),
    }
    Ok(())
}
