use std::fs::File;
use std::io::Write;
use std::path::Path;
use unionfees_core::error::UnionFeesError;
use unionfees_core::remittance::file_name_part;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archive name for one company and accounting period.
pub fn archive_name(company: &str, year: u32, period: u32) -> String {
    format!("{}-{year:02}{period:02}.zip", file_name_part(company))
}

/// Write `(file name, contents)` pairs into a new zip archive at `path`.
pub fn write_zip(path: &Path, files: &[(String, Vec<u8>)]) -> Result<(), UnionFeesError> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in files {
        zip.start_file(name.as_str(), options)
            .map_err(std::io::Error::from)?;
        zip.write_all(bytes)?;
    }
    zip.finish().map_err(std::io::Error::from)?;
    Ok(())
}
