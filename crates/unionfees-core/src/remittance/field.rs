//! Fixed-width field writer for remittance records.
//!
//! Numbers are zero-padded and must fit their width; text is uppercased,
//! space-padded and cut to width. A record is built as a `String` whose
//! characters all map to single Windows-1252 bytes.

use crate::error::UnionFeesError;
use chrono::{Datelike, NaiveDate};
use encoding_rs::WINDOWS_1252;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Width of every record, excluding the CRLF terminator.
pub const RECORD_WIDTH: usize = 66;

/// Written for characters Windows-1252 cannot represent.
const REPLACEMENT: u8 = b'?';

#[derive(Debug)]
pub struct RecordBuilder {
    buf: String,
}

impl RecordBuilder {
    pub fn new(tag: &str) -> Self {
        let mut buf = String::with_capacity(RECORD_WIDTH + 2);
        buf.push_str(tag);
        RecordBuilder { buf }
    }

    pub fn literal(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self
    }

    /// Append `n` zero characters.
    pub fn zeros(&mut self, n: usize) -> &mut Self {
        self.buf.extend(std::iter::repeat('0').take(n));
        self
    }

    pub fn number(
        &mut self,
        field: &'static str,
        value: u64,
        width: usize,
    ) -> Result<&mut Self, UnionFeesError> {
        let digits = value.to_string();
        if digits.len() > width {
            return Err(UnionFeesError::FieldOverflow {
                field,
                value: digits,
                width,
            });
        }
        self.buf.push_str(&format!("{:0>width$}", digits, width = width));
        Ok(self)
    }

    /// Append an amount as `int_width` integer digits followed by two
    /// fraction digits, without separator.
    pub fn amount(
        &mut self,
        field: &'static str,
        value: Decimal,
        int_width: usize,
    ) -> Result<&mut Self, UnionFeesError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(UnionFeesError::NegativeAmount {
                field,
                value: value.to_string(),
            });
        }
        let overflow = || UnionFeesError::FieldOverflow {
            field,
            value: value.to_string(),
            width: int_width,
        };
        let cents = value
            .round_dp(2)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.to_u64())
            .ok_or_else(overflow)?;
        let whole = cents / 100;
        if whole.to_string().len() > int_width {
            return Err(overflow());
        }
        self.buf.push_str(&format!(
            "{:0>width$}{:02}",
            whole,
            cents % 100,
            width = int_width
        ));
        Ok(self)
    }

    /// Append a date as YYMMDD. Only years 2000-2099 fit.
    pub fn date(&mut self, field: &'static str, date: NaiveDate) -> Result<&mut Self, UnionFeesError> {
        let year = date.year() - 2000;
        if !(0..=99).contains(&year) {
            return Err(UnionFeesError::FieldOverflow {
                field,
                value: date.to_string(),
                width: 6,
            });
        }
        self.buf.push_str(&format!(
            "{:02}{:02}{:02}",
            year,
            date.month(),
            date.day()
        ));
        Ok(self)
    }

    /// Append uppercased text, padded with spaces or cut to `width`.
    pub fn text(&mut self, value: &str, width: usize) -> &mut Self {
        let upper = value.to_uppercase();
        let mut written = 0;
        for c in upper.chars().take(width) {
            self.buf.push(c);
            written += 1;
        }
        self.buf.extend(std::iter::repeat(' ').take(width - written));
        self
    }

    /// The record without terminator.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Encode the record to Windows-1252 and append it, CRLF-terminated.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        debug_assert_eq!(self.buf.chars().count(), RECORD_WIDTH, "{}", self.buf);
        out.extend(encode_legacy(&self.buf));
        out.extend_from_slice(b"\r\n");
    }
}

/// Encode text to Windows-1252, one byte per character.
pub fn encode_legacy(s: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = WINDOWS_1252.encode(s);
    if !had_errors {
        return bytes.into_owned();
    }
    let mut buf = [0u8; 4];
    s.chars()
        .map(|c| {
            let (b, _, bad) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
            if bad || b.len() != 1 {
                REPLACEMENT
            } else {
                b[0]
            }
        })
        .collect()
}
