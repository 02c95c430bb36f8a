use chrono::{Datelike, NaiveDate};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};
use unionfees_core::error::UnionFeesError;
use unionfees_core::model::{CompanyContext, UnionCode};
use unionfees_core::parsing::values::parse_identifier;
use unionfees_core::remittance::output_file_name;
use unionfees_core::{parse_header, Remittance, ReportHeader};

use crate::commands::{load_document, load_options};
use crate::output;

#[derive(Args)]
pub struct ConvertArgs {
    /// Path to PDF or pre-extracted JSON runs
    pub input_file: PathBuf,

    /// Transaction date, YYMMDD
    #[arg(short, long, value_parser = parse_date)]
    pub date: NaiveDate,

    /// Organisation number (default: from the report header)
    #[arg(short, long)]
    pub orgnr: Option<String>,

    /// Company name (default: from the report header)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Accounting month 1-12 (default: month of --date)
    #[arg(short = 'm', long)]
    pub period: Option<u32>,

    /// Accounting year, two digits (default: year of --date)
    #[arg(short, long)]
    pub year: Option<u32>,

    /// Union code written on every record
    #[arg(short, long, default_value = "38", value_parser = parse_union)]
    pub union: UnionCode,

    /// Only convert these sections (repeatable)
    #[arg(short, long = "section", value_name = "NAME")]
    pub sections: Vec<String>,

    /// Directory for the output files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Pack all files into "<company>-<YY><MM>.zip" instead
    #[arg(long)]
    pub zip: bool,

    /// JSON options file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write the records to stdout
    #[arg(long)]
    pub print: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%y%m%d").map_err(|e| format!("expected YYMMDD: {e}"))
}

fn parse_union(s: &str) -> Result<UnionCode, String> {
    UnionCode::parse(s).map_err(|e| e.to_string())
}

/// Company context from the arguments, falling back to the report header.
fn company_context(
    args: &ConvertArgs,
    header: &ReportHeader,
) -> Result<CompanyContext, UnionFeesError> {
    let company_id = match (&args.orgnr, header.company_number()) {
        (Some(orgnr), _) => parse_identifier(orgnr)?,
        (None, Some(parsed)) => parsed?,
        (None, None) => return Err(UnionFeesError::MissingHeaderField("organisation number")),
    };
    let company_name = args
        .name
        .clone()
        .or_else(|| header.company_name.clone())
        .ok_or(UnionFeesError::MissingHeaderField("company name"))?;

    let period = args.period.unwrap_or_else(|| args.date.month());
    let year = match args.year {
        Some(year) => year,
        None => {
            let year = args.date.year() - 2000;
            u32::try_from(year).map_err(|_| UnionFeesError::InvalidYear(year.unsigned_abs()))?
        }
    };
    CompanyContext::new(company_id, company_name, period, year, args.date)
}

pub fn run(args: ConvertArgs) -> Result<(), UnionFeesError> {
    let options = load_options(args.config.as_ref())?;
    let document = load_document(&args.input_file, &options)?;
    let header = parse_header(&document.first_page_rows());
    let company = company_context(&args, &header)?;
    info!(
        company = %company.company_name,
        id = company.company_id,
        period = company.period,
        year = company.year,
        "company"
    );

    let remittance = Remittance::from_document(&document, company, &options)?;
    let names: Vec<String> = if args.sections.is_empty() {
        remittance
            .list_sections()
            .into_iter()
            .map(String::from)
            .collect()
    } else {
        args.sections.clone()
    };

    let company = remittance.company();
    let mut files = Vec::new();
    for name in &names {
        if remittance.section(name).is_some_and(|s| s.is_empty()) {
            warn!(section = %name, "section has no data rows, skipped");
            continue;
        }
        let bytes = remittance.encode_section(name, args.union)?;
        files.push((output_file_name(name, company.year, company.period), bytes));
    }

    if files.is_empty() {
        eprintln!("No sections with data rows in {}", args.input_file.display());
        return Ok(());
    }

    if args.print {
        let mut stdout = std::io::stdout().lock();
        for (_, bytes) in &files {
            stdout.write_all(bytes)?;
        }
        stdout.flush()?;
    }

    std::fs::create_dir_all(&args.out_dir)?;
    if args.zip {
        let archive_name =
            output::archive::archive_name(&company.company_name, company.year, company.period);
        let path = args.out_dir.join(archive_name);
        output::archive::write_zip(&path, &files)?;
        eprintln!("Wrote {} file(s) to {}", files.len(), path.display());
    } else {
        for (file_name, bytes) in &files {
            let path = args.out_dir.join(file_name);
            std::fs::write(&path, bytes)?;
            eprintln!("Wrote {}", path.display());
        }
    }

    Ok(())
}
