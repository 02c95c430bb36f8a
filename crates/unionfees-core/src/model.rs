use crate::error::UnionFeesError;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason code written on every fee line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayCode {
    #[default]
    AmountPaid,
    TimeOff,
    Other,
    EndOfEmployment,
    MissingPermission,
}

impl PayCode {
    /// Numeric code used in the remittance file.
    pub fn code(self) -> u8 {
        match self {
            PayCode::AmountPaid => 1,
            PayCode::TimeOff => 3,
            PayCode::Other => 8,
            PayCode::EndOfEmployment => 19,
            PayCode::MissingPermission => 33,
        }
    }
}

impl fmt::Display for PayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayCode::AmountPaid => write!(f, "Avgift betald"),
            PayCode::TimeOff => write!(f, "Tjänstledig"),
            PayCode::Other => write!(f, "Övrigt"),
            PayCode::EndOfEmployment => write!(f, "Slutat"),
            PayCode::MissingPermission => write!(f, "Medgivande saknas"),
        }
    }
}

/// Two-digit number identifying the receiving union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UnionCode(u8);

impl UnionCode {
    pub const IF_METALL: UnionCode = UnionCode(38);
    pub const GS: UnionCode = UnionCode(43);

    pub fn new(code: i64) -> Result<Self, UnionFeesError> {
        if (1..=99).contains(&code) {
            Ok(UnionCode(code as u8))
        } else {
            Err(UnionFeesError::InvalidUnionCode(code))
        }
    }

    /// Parse a union code typed by a user, e.g. `" 38 "`.
    pub fn parse(s: &str) -> Result<Self, UnionFeesError> {
        let code: i64 = s
            .trim()
            .parse()
            .map_err(|_| UnionFeesError::MalformedUnionCode {
                value: s.to_string(),
            })?;
        Self::new(code)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for UnionCode {
    type Error = UnionFeesError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        UnionCode::new(code)
    }
}

impl From<UnionCode> for i64 {
    fn from(code: UnionCode) -> i64 {
        i64::from(code.0)
    }
}

impl fmt::Display for UnionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            UnionCode::IF_METALL => write!(f, "IF Metall ({})", self.0),
            UnionCode::GS => write!(f, "GS-facket ({})", self.0),
            _ => write!(f, "{}", self.0),
        }
    }
}

/// Company data shared by all headers and trailers of one remittance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyContext {
    pub company_id: u64,
    pub company_name: String,
    /// Accounting month, 1-12.
    pub period: u32,
    /// Accounting year within the century, 0-99.
    pub year: u32,
    pub transaction_date: NaiveDate,
}

impl CompanyContext {
    pub fn new(
        company_id: u64,
        company_name: impl Into<String>,
        period: u32,
        year: u32,
        transaction_date: NaiveDate,
    ) -> Result<Self, UnionFeesError> {
        if !(1..=12).contains(&period) {
            return Err(UnionFeesError::InvalidPeriod(period));
        }
        if year > 99 {
            return Err(UnionFeesError::InvalidYear(year));
        }
        Ok(CompanyContext {
            company_id,
            company_name: company_name.into(),
            period,
            year,
            transaction_date,
        })
    }

    /// Period and year taken from the transaction date.
    pub fn from_date(
        company_id: u64,
        company_name: impl Into<String>,
        transaction_date: NaiveDate,
    ) -> Result<Self, UnionFeesError> {
        let year = transaction_date.year() - 2000;
        if !(0..=99).contains(&year) {
            return Err(UnionFeesError::InvalidYear(year.unsigned_abs()));
        }
        Self::new(
            company_id,
            company_name,
            transaction_date.month(),
            year as u32,
            transaction_date,
        )
    }
}

/// One person's deduction (record S2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLine {
    pub location: u16,
    pub person_id: u64,
    pub name: String,
    pub amount: Decimal,
    pub control_amount: Decimal,
    pub pay_code: PayCode,
}

/// Record S1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationHeader {
    pub location: u16,
    pub company_id: u64,
    pub company_name: String,
    pub period: u32,
    pub year: u32,
    pub transaction_date: NaiveDate,
}

/// Record S3, accumulated while lines are added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTrailer {
    pub location: u16,
    pub company_id: u64,
    pub company_name: String,
    pub record_count: u32,
    pub sum_amount: Decimal,
    pub sum_control_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationBundle {
    pub header: LocationHeader,
    pub lines: Vec<FeeLine>,
    pub trailer: LocationTrailer,
}

impl LocationBundle {
    pub fn new(company: &CompanyContext, location: u16) -> Self {
        LocationBundle {
            header: LocationHeader {
                location,
                company_id: company.company_id,
                company_name: company.company_name.clone(),
                period: company.period,
                year: company.year,
                transaction_date: company.transaction_date,
            },
            lines: Vec::new(),
            trailer: LocationTrailer {
                location,
                company_id: company.company_id,
                company_name: company.company_name.clone(),
                record_count: 0,
                sum_amount: Decimal::ZERO,
                sum_control_amount: Decimal::ZERO,
            },
        }
    }

    /// Append a line and add it to the trailer totals. A total that no
    /// longer fits a decimal is a `FieldOverflow` and leaves the bundle as
    /// it was.
    pub fn push(&mut self, line: FeeLine) -> Result<(), UnionFeesError> {
        let sum_amount = checked_sum("sum_amount", self.trailer.sum_amount, line.amount)?;
        let sum_control_amount = checked_sum(
            "sum_control_amount",
            self.trailer.sum_control_amount,
            line.control_amount,
        )?;
        let record_count = self.trailer.record_count.checked_add(1).ok_or_else(|| {
            UnionFeesError::FieldOverflow {
                field: "record_count",
                value: self.trailer.record_count.to_string(),
                width: 6,
            }
        })?;

        self.trailer.sum_amount = sum_amount;
        self.trailer.sum_control_amount = sum_control_amount;
        self.trailer.record_count = record_count;
        self.lines.push(line);
        Ok(())
    }
}

fn checked_sum(field: &'static str, total: Decimal, add: Decimal) -> Result<Decimal, UnionFeesError> {
    total
        .checked_add(add)
        .ok_or_else(|| UnionFeesError::FieldOverflow {
            field,
            value: format!("{total} + {add}"),
            width: 7,
        })
}

/// A named remittance table found in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub rows: Vec<[String; 4]>,
    /// Index of each collected row in the document's row matrix.
    pub row_indices: Vec<usize>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Section {
            name: name.into(),
            rows: Vec::new(),
            row_indices: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
