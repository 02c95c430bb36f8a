use std::io::Write;
use std::path::PathBuf;
use unionfees_core::error::UnionFeesError;
use unionfees_core::parse_header;

use crate::commands::{load_document, load_options};

/// Print every page's rows as the merge step rebuilt them, followed by the
/// header fields found on the first page.
pub fn run(input_file: PathBuf, config: Option<PathBuf>) -> Result<(), UnionFeesError> {
    let options = load_options(config.as_ref())?;
    let document = load_document(&input_file, &options)?;

    let mut stdout = std::io::stdout().lock();
    document.print(&mut stdout)?;

    let header = parse_header(&document.first_page_rows());
    writeln!(stdout, "--- Header ---")?;
    writeln!(
        stdout,
        " company: {}",
        header.company_name.as_deref().unwrap_or("-")
    )?;
    writeln!(
        stdout,
        " orgnr:   {}",
        header.company_id.as_deref().unwrap_or("-")
    )?;
    if let Some(period) = &header.period {
        writeln!(stdout, " period:  {period}")?;
    }
    Ok(())
}
