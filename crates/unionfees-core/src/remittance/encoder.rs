use crate::error::UnionFeesError;
use crate::model::{FeeLine, LocationBundle, LocationHeader, LocationTrailer, UnionCode};
use crate::remittance::field::RecordBuilder;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::debug;

const NAME_WIDTH: usize = 24;

fn header_record(h: &LocationHeader, union: UnionCode) -> Result<RecordBuilder, UnionFeesError> {
    let mut r = RecordBuilder::new("S1");
    r.number("union_code", union.value().into(), 2)?
        .number("location", h.location.into(), 4)?
        .number("company_id", h.company_id, 10)?
        .text(&h.company_name, NAME_WIDTH)
        .literal("0")
        .number("period", h.period.into(), 2)?
        .number("year", h.year.into(), 2)?
        .date("transaction_date", h.transaction_date)?
        .zeros(13);
    Ok(r)
}

fn line_record(line: &FeeLine, union: UnionCode) -> Result<RecordBuilder, UnionFeesError> {
    let mut r = RecordBuilder::new("S2");
    r.number("union_code", union.value().into(), 2)?
        .number("location", line.location.into(), 4)?
        .number("person_id", line.person_id, 10)?
        .text(&line.name, NAME_WIDTH)
        .amount("amount", line.amount, 4)?
        .amount("control_amount", line.control_amount, 4)?
        .number("pay_code", line.pay_code.code().into(), 2)?
        .zeros(10);
    Ok(r)
}

fn trailer_record(t: &LocationTrailer, union: UnionCode) -> Result<RecordBuilder, UnionFeesError> {
    let mut r = RecordBuilder::new("S3");
    r.number("union_code", union.value().into(), 2)?
        .number("location", t.location.into(), 4)?
        .number("company_id", t.company_id, 10)?
        .text(&t.company_name, NAME_WIDTH)
        .number("record_count", t.record_count.into(), 6)?
        .amount("sum_amount", t.sum_amount, 7)?
        .zeros(9);
    Ok(r)
}

/// Encode location bundles into a remittance file.
///
/// Bundles are written in ascending location order: header, one record per
/// fee line in stored order, trailer. Nothing is returned if any field
/// fails to encode.
pub fn encode(
    bundles: &BTreeMap<u16, LocationBundle>,
    union: UnionCode,
) -> Result<Vec<u8>, UnionFeesError> {
    let mut out = Vec::new();
    for (location, bundle) in bundles {
        header_record(&bundle.header, union)?.write_to(&mut out);
        for line in &bundle.lines {
            line_record(line, union)?.write_to(&mut out);
        }
        trailer_record(&bundle.trailer, union)?.write_to(&mut out);
        debug!(
            location,
            lines = bundle.lines.len(),
            sum = %bundle.trailer.sum_amount,
            "encoded location"
        );
    }
    Ok(out)
}

/// Encode and write a remittance file. The writer only sees complete output.
pub fn write_remittance<W: Write>(
    writer: &mut W,
    bundles: &BTreeMap<u16, LocationBundle>,
    union: UnionCode,
) -> Result<(), UnionFeesError> {
    let bytes = encode(bundles, union)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompanyContext, PayCode};
    use crate::remittance::build_locations;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn company() -> CompanyContext {
        CompanyContext::new(
            5562344639,
            "Magnetbands Redovisning",
            4,
            12,
            NaiveDate::from_ymd_opt(2012, 4, 25).unwrap(),
        )
        .unwrap()
    }

    fn line(location: u16, person_id: u64, name: &str, amount: Decimal) -> FeeLine {
        FeeLine {
            location,
            person_id,
            name: name.into(),
            amount,
            control_amount: Decimal::ZERO,
            pay_code: PayCode::AmountPaid,
        }
    }

    fn records(bytes: &[u8]) -> Vec<String> {
        let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
        text.split_terminator("\r\n").map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_magnetbands_sample() {
        let lines = vec![
            line(1, 1234567890, "Karlsson Allan", dec!(570.35)),
            line(1, 987654321, "Johansson Evert", dec!(640.00)),
            FeeLine {
                pay_code: PayCode::EndOfEmployment,
                ..line(1, 1122334455, "Marklund Petrånella", dec!(0))
            },
        ];
        let bundles = build_locations(&company(), lines).unwrap();
        let bytes = encode(&bundles, UnionCode::IF_METALL).unwrap();

        let expected = concat!(
            "S1380001556234463", "9MAGNETBANDS REDOVISNING 004121204250000000000000\r\n",
            "S2380001123456789", "0KARLSSON ALLAN          057035000000010000000000\r\n",
            "S2380001098765432", "1JOHANSSON EVERT         064000000000010000000000\r\n",
            "S2380001112233445", "5MARKLUND PETR\u{c5}NELLA     000000000000190000000000\r\n",
            "S3380001556234463", "9MAGNETBANDS REDOVISNING 000003000121035000000000\r\n",
        );
        let (expected, _, _) = encoding_rs::WINDOWS_1252.encode(expected);
        assert_eq!(bytes, expected.into_owned());
    }

    #[test]
    fn test_every_record_is_fixed_width() {
        let bundles = build_locations(
            &company(),
            vec![line(1, 1, "Åsa Öberg-Ärlig med ett mycket långt namn", dec!(1.5))],
        ).unwrap();
        let bytes = encode(&bundles, UnionCode::GS).unwrap();
        assert!(bytes.ends_with(b"\r\n"));
        for record in records(&bytes) {
            assert_eq!(record.chars().count(), 66, "{record}");
        }
        assert_eq!(bytes.len(), 3 * 68);
    }

    #[test]
    fn test_locations_in_ascending_order() {
        let bundles = build_locations(
            &company(),
            vec![
                line(30, 3, "C", dec!(3)),
                line(2, 2, "B", dec!(2)),
                line(100, 1, "A", dec!(1)),
                line(2, 4, "D", dec!(4)),
            ],
        ).unwrap();
        let bytes = encode(&bundles, UnionCode::IF_METALL).unwrap();
        let tags: Vec<String> = records(&bytes).iter().map(|r| r[..8].to_string()).collect();
        assert_eq!(
            tags,
            vec![
                "S1380002", "S2380002", "S2380002", "S3380002", "S1380030", "S2380030",
                "S3380030", "S1380100", "S2380100", "S3380100",
            ]
        );
    }

    #[test]
    fn test_company_name_boundaries() {
        let mut ctx = company();
        ctx.company_name = "ABCDEFGHIJKLMNOPQRSTUVWX".into();
        let bundles = build_locations(&ctx, vec![line(1, 1, "A", dec!(1))]).unwrap();
        let recs = records(&encode(&bundles, UnionCode::IF_METALL).unwrap());
        assert_eq!(&recs[0][18..42], "ABCDEFGHIJKLMNOPQRSTUVWX");

        ctx.company_name = "ABCDEFGHIJKLMNOPQRSTUVWXY".into();
        let bundles = build_locations(&ctx, vec![line(1, 1, "A", dec!(1))]).unwrap();
        let recs = records(&encode(&bundles, UnionCode::IF_METALL).unwrap());
        assert_eq!(&recs[0][18..42], "ABCDEFGHIJKLMNOPQRSTUVWX");
        assert_eq!(&recs[0][42..43], "0");
    }

    #[test]
    fn test_overflow_aborts_encode() {
        let bundles = build_locations(
            &company(),
            vec![line(1, 195001011234, "Karlsson Allan", dec!(1))],
        ).unwrap();
        let err = encode(&bundles, UnionCode::IF_METALL).unwrap_err();
        assert!(matches!(
            err,
            UnionFeesError::FieldOverflow {
                field: "person_id",
                ..
            }
        ));
    }

    #[test]
    fn test_trailer_sum_overflow() {
        let lines: Vec<_> = (0..3)
            .map(|i| line(1, i, "A", dec!(9999.99)))
            .chain((0..1100).map(|i| line(1, 100 + i, "B", dec!(9999.99))))
            .collect();
        let bundles = build_locations(&company(), lines).unwrap();
        let err = encode(&bundles, UnionCode::IF_METALL).unwrap_err();
        assert!(matches!(
            err,
            UnionFeesError::FieldOverflow {
                field: "sum_amount",
                ..
            }
        ));
    }

    #[test]
    fn test_write_remittance_writes_nothing_on_error() {
        let bundles = build_locations(&company(), vec![line(10000, 1, "A", dec!(1))]).unwrap();
        let mut out = Vec::new();
        assert!(write_remittance(&mut out, &bundles, UnionCode::IF_METALL).is_err());
        assert!(out.is_empty());
    }
}
