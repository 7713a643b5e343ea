//! # Fixed-Width Line Parser
//!
//! Turns an uploaded text file into transaction records, one per line.
//!
//! ## Record Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  column   0  1                        26                             56 │
//! │           │  │                         │                              │ │
//! │           1  2022-01-15T19:20:30-03:00 CURSO DE BEM-ESTAR             … │
//! │          type        date (25)              product (30)                │
//! │                                                                         │
//! │  column  56          66                  86                             │
//! │           │           │                   │                             │
//! │           0000012750  JOSE CARLOS                                       │
//! │          value (10)   seller (20)                                       │
//! │          cents, no decimal point                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lenient Parsing
//! The parser never fails. A field that cannot be read becomes an in-band
//! marker on the record (`TransactionType::Malformed`, `value: None`), a
//! short line yields empty trailing fields, and a blank line still yields a
//! record. Downstream aggregation skips the markers.
//!
//! Offsets count `char`s, not bytes, so a non-ASCII name never splits a
//! code point.

use std::ops::Range;

use crate::error::{FieldError, FieldResult};
use crate::money::Money;
use crate::types::{TransactionRecord, TransactionType};

// =============================================================================
// Layout
// =============================================================================

/// Full width of a well-formed record.
pub const RECORD_WIDTH: usize = 86;

pub const TYPE_COLUMNS: Range<usize> = 0..1;
pub const DATE_COLUMNS: Range<usize> = 1..26;
pub const PRODUCT_COLUMNS: Range<usize> = 26..56;
pub const VALUE_COLUMNS: Range<usize> = 56..66;
pub const SELLER_COLUMNS: Range<usize> = 66..RECORD_WIDTH;

// =============================================================================
// Parsing
// =============================================================================

/// Parses a whole upload.
///
/// Lines are split on `\n` only, so the output has exactly one record per
/// `\n`-separated line, including a trailing blank record when the file ends
/// with a newline.
///
/// ## Example
/// ```rust
/// use tally_core::parser::parse;
/// use tally_core::TransactionType;
///
/// let line = format!(
///     "1{}{:<30}{}{:<20}",
///     "2022-01-15T19:20:30-03:00", "CURSO", "0000001275", "JOSE CARLOS"
/// );
/// let records = parse(&line);
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].transaction_type, TransactionType::PrimarySale);
/// assert_eq!(records[0].value.map(|v| v.cents()), Some(1275));
/// assert_eq!(records[0].seller, "JOSE CARLOS");
/// ```
pub fn parse(file_data: &str) -> Vec<TransactionRecord> {
    file_data.split('\n').map(parse_line).collect()
}

/// Parses one line. Surrounding whitespace (including a CR) and a byte
/// order mark are ignored.
pub fn parse_line(line: &str) -> TransactionRecord {
    let chars: Vec<char> = line.trim_matches(is_padding).chars().collect();

    TransactionRecord {
        transaction_type: parse_type_code(&columns(&chars, TYPE_COLUMNS))
            .unwrap_or(TransactionType::Malformed),
        date: columns(&chars, DATE_COLUMNS),
        product: columns(&chars, PRODUCT_COLUMNS).trim().to_string(),
        value: parse_cents(&columns(&chars, VALUE_COLUMNS)).ok(),
        seller: columns(&chars, SELLER_COLUMNS).trim().to_string(),
    }
}

/// Reads the type column: a single ASCII digit.
///
/// ## Example
/// ```rust
/// use tally_core::parser::parse_type_code;
/// use tally_core::TransactionType;
///
/// assert_eq!(parse_type_code("3"), Ok(TransactionType::CommissionPaid));
/// assert_eq!(parse_type_code("8"), Ok(TransactionType::Other(8)));
/// assert!(parse_type_code("X").is_err());
/// ```
pub fn parse_type_code(raw: &str) -> FieldResult<TransactionType> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err(FieldError::Empty { field: "type" }),
        (Some(c), None) => c
            .to_digit(10)
            .map(|digit| TransactionType::from_code(i64::from(digit)))
            .ok_or_else(|| FieldError::NotNumeric {
                field: "type",
                raw: raw.to_string(),
            }),
        _ => Err(FieldError::NotNumeric {
            field: "type",
            raw: raw.to_string(),
        }),
    }
}

/// Reads the value column as a cent amount.
///
/// Leading whitespace and a sign are accepted, then a decimal number with an
/// optional fraction and an optional `e`/`E` exponent. Anything after the
/// number is ignored, and a result below one cent truncates toward zero.
///
/// ## Example
/// ```rust
/// use tally_core::parser::parse_cents;
///
/// assert_eq!(parse_cents("0000001275").unwrap().cents(), 1275);
/// assert_eq!(parse_cents("  12abc").unwrap().cents(), 12);
/// assert_eq!(parse_cents("00001e0005").unwrap().cents(), 100_000);
/// assert!(parse_cents("ABCDEFGHIJ").is_err());
/// ```
pub fn parse_cents(raw: &str) -> FieldResult<Money> {
    let text = raw.trim_start();
    if text.is_empty() {
        return Err(FieldError::Empty { field: "value" });
    }

    let (negative, unsigned) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let whole = &unsigned[..leading_digits(unsigned)];
    let mut rest = &unsigned[whole.len()..];
    let mut fraction = "";
    if let Some(after_point) = rest.strip_prefix('.') {
        fraction = &after_point[..leading_digits(after_point)];
        rest = &after_point[fraction.len()..];
    }

    if whole.is_empty() && fraction.is_empty() {
        return Err(FieldError::NotNumeric {
            field: "value",
            raw: raw.to_string(),
        });
    }

    let out_of_range = || FieldError::OutOfRange {
        field: "value",
        raw: raw.to_string(),
    };

    // whole.fraction × 10^exponent == digits × 10^scale
    let digits = format!("{}{}", whole, fraction);
    let scale = exponent(rest).saturating_sub(fraction.len() as i64);

    let cents = if scale >= 0 {
        let mantissa: i64 = digits.parse().map_err(|_| out_of_range())?;
        if mantissa == 0 {
            0
        } else {
            u32::try_from(scale)
                .ok()
                .and_then(|scale| 10i64.checked_pow(scale))
                .and_then(|factor| mantissa.checked_mul(factor))
                .ok_or_else(out_of_range)?
        }
    } else {
        let dropped = usize::try_from(scale.unsigned_abs()).unwrap_or(usize::MAX);
        let kept = &digits[..digits.len().saturating_sub(dropped)];
        if kept.is_empty() {
            0
        } else {
            kept.parse::<i64>().map_err(|_| out_of_range())?
        }
    };

    Ok(Money::from_cents(if negative { -cents } else { cents }))
}

/// Reads an `e`/`E` exponent at the start of `text`; 0 when there is none.
fn exponent(text: &str) -> i64 {
    let Some(after) = text.strip_prefix(|c: char| c == 'e' || c == 'E') else {
        return 0;
    };

    let (negative, unsigned) = match after.as_bytes().first() {
        Some(b'-') => (true, &after[1..]),
        Some(b'+') => (false, &after[1..]),
        _ => (false, after),
    };

    let digits = &unsigned[..leading_digits(unsigned)];
    if digits.is_empty() {
        return 0;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn is_padding(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn leading_digits(text: &str) -> usize {
    text.bytes().take_while(|b| b.is_ascii_digit()).count()
}

/// Slices `range` out of the line, clamped to its length.
fn columns(chars: &[char], range: Range<usize>) -> String {
    let end = range.end.min(chars.len());
    let start = range.start.min(end);
    chars[start..end].iter().collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: &str = "2022-01-15T19:20:30-03:00";

    fn record_line(kind: &str, product: &str, value: &str, seller: &str) -> String {
        format!("{}{}{:<30}{}{:<20}", kind, DATE, product, value, seller)
    }

    #[test]
    fn test_parses_full_record() {
        let line = record_line("1", "CURSO", "0000001275", "JOSE CARLOS");
        assert_eq!(line.chars().count(), RECORD_WIDTH);

        let records = parse(&line);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.transaction_type, TransactionType::PrimarySale);
        assert_eq!(record.date, DATE);
        assert_eq!(record.product, "CURSO");
        assert_eq!(record.value, Some(Money::from_cents(1275)));
        assert_eq!(record.seller, "JOSE CARLOS");
    }

    #[test]
    fn test_preserves_line_order() {
        let input = [
            record_line("1", "CURSO DE BEM-ESTAR", "0000012750", "JOSE CARLOS"),
            record_line("2", "CURSO DE BEM-ESTAR", "0000012750", "THIAGO OLIVEIRA"),
            record_line("3", "CURSO DE BEM-ESTAR", "0000004500", "THIAGO OLIVEIRA"),
            record_line("4", "CURSO DE BEM-ESTAR", "0000004500", "JOSE CARLOS"),
        ]
        .join("\n");

        let records = parse(&input);
        let kinds: Vec<_> = records.iter().map(|r| r.transaction_type.code()).collect();
        assert_eq!(kinds, vec![Some(1), Some(2), Some(3), Some(4)]);
        assert_eq!(records[1].seller, "THIAGO OLIVEIRA");
    }

    #[test]
    fn test_one_record_per_line_including_trailing_newline() {
        let line = record_line("1", "CURSO", "0000001275", "JOSE CARLOS");
        let input = format!("{}\n{}\n", line, line);

        let records = parse(&input);
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].transaction_type, TransactionType::Malformed);
    }

    #[test]
    fn test_blank_line_yields_empty_record() {
        let records = parse("");
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.transaction_type, TransactionType::Malformed);
        assert_eq!(record.date, "");
        assert_eq!(record.product, "");
        assert_eq!(record.value, None);
        assert_eq!(record.seller, "");
    }

    #[test]
    fn test_whitespace_only_line_is_blank() {
        let record = parse_line("   \t  ");
        assert_eq!(record.transaction_type, TransactionType::Malformed);
        assert_eq!(record.value, None);
    }

    #[test]
    fn test_short_line_degrades_gracefully() {
        let record = parse_line(&format!("2{}CURSO", DATE));
        assert_eq!(record.transaction_type, TransactionType::AffiliateSale);
        assert_eq!(record.date, DATE);
        assert_eq!(record.product, "CURSO");
        assert_eq!(record.value, None);
        assert_eq!(record.seller, "");

        let record = parse_line("4 2022");
        assert_eq!(record.transaction_type, TransactionType::CommissionReceived);
        assert_eq!(record.date, " 2022");
        assert_eq!(record.product, "");
    }

    #[test]
    fn test_missing_seller_still_parses_value() {
        let line = format!("3{}{:<30}0000004500", DATE, "CURSO");
        let record = parse_line(&line);
        assert_eq!(record.value, Some(Money::from_cents(4500)));
        assert_eq!(record.seller, "");
    }

    #[test]
    fn test_crlf_line_endings() {
        let line = record_line("1", "CURSO", "0000001275", "JOSE CARLOS");
        let records = parse(&format!("{}\r\n{}", line, line));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].seller, "JOSE CARLOS");
        assert_eq!(records[0], records[1]);
    }

    #[test]
    fn test_non_numeric_fields_become_markers() {
        let record = parse_line(&record_line("X", "CURSO", "ABCDEFGHIJ", "MARIA"));
        assert_eq!(record.transaction_type, TransactionType::Malformed);
        assert_eq!(record.value, None);
        assert_eq!(record.product, "CURSO");
        assert_eq!(record.seller, "MARIA");
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let record = parse_line(&record_line("7", "CURSO", "0000000100", "MARIA"));
        assert_eq!(record.transaction_type, TransactionType::Other(7));
        assert_eq!(record.value, Some(Money::from_cents(100)));

        let record = parse_line(&record_line("0", "CURSO", "0000000100", "MARIA"));
        assert_eq!(record.transaction_type, TransactionType::Other(0));
    }

    #[test]
    fn test_date_is_kept_verbatim() {
        let odd_date = "not a date at all, 25 ch";
        let line = format!("1{:<25}{:<30}0000000100{:<20}", odd_date, "P", "S");
        let record = parse_line(&line);
        assert_eq!(record.date, format!("{:<25}", odd_date));
    }

    #[test]
    fn test_non_ascii_names_use_char_offsets() {
        let line = record_line("1", "CURSO DE PROGRAMAÇÃO", "0000050000", "JOÃO ÇÃO");
        let record = parse_line(&line);
        assert_eq!(record.product, "CURSO DE PROGRAMAÇÃO");
        assert_eq!(record.value, Some(Money::from_cents(50000)));
        assert_eq!(record.seller, "JOÃO ÇÃO");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let input = [
            record_line("1", "CURSO", "0000001275", "JOSE CARLOS"),
            String::new(),
            record_line("X", "?", "??????????", "?"),
        ]
        .join("\n");

        assert_eq!(parse(&input), parse(&input));
    }

    #[test]
    fn test_parse_type_code() {
        assert_eq!(parse_type_code("1"), Ok(TransactionType::PrimarySale));
        assert_eq!(parse_type_code("9"), Ok(TransactionType::Other(9)));
        assert_eq!(parse_type_code(""), Err(FieldError::Empty { field: "type" }));
        assert!(matches!(
            parse_type_code("-"),
            Err(FieldError::NotNumeric { .. })
        ));
        assert!(matches!(
            parse_type_code("12"),
            Err(FieldError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_parse_cents_lenient_forms() {
        assert_eq!(parse_cents("0000001275").unwrap().cents(), 1275);
        assert_eq!(parse_cents("   1275").unwrap().cents(), 1275);
        assert_eq!(parse_cents("-000000500").unwrap().cents(), -500);
        assert_eq!(parse_cents("+000000500").unwrap().cents(), 500);
        assert_eq!(parse_cents("00012AB").unwrap().cents(), 12);
        assert_eq!(parse_cents("12.99").unwrap().cents(), 12);
        assert_eq!(parse_cents(".5").unwrap().cents(), 0);
        assert_eq!(parse_cents("0000000000").unwrap().cents(), 0);
    }

    #[test]
    fn test_parse_cents_exponent() {
        assert_eq!(parse_cents("00001e0005").unwrap().cents(), 100_000);
        assert_eq!(parse_cents("1E2").unwrap().cents(), 100);
        assert_eq!(parse_cents("1.5e1").unwrap().cents(), 15);
        assert_eq!(parse_cents("-2e+3").unwrap().cents(), -2000);
        assert_eq!(parse_cents("15e-1").unwrap().cents(), 1);
        assert_eq!(parse_cents("5e-9").unwrap().cents(), 0);
        assert_eq!(parse_cents("0e999999").unwrap().cents(), 0);

        // No exponent digits: the "e" is trailing garbage
        assert_eq!(parse_cents("0000012e").unwrap().cents(), 12);
        assert_eq!(parse_cents("12e+XX").unwrap().cents(), 12);

        assert!(matches!(
            parse_cents("1e19"),
            Err(FieldError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let line = record_line("1", "CURSO", "0000001275", "JOSE CARLOS");
        let records = parse(&format!("\u{feff}{}\n{}", line, line));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
        assert_eq!(records[0].transaction_type, TransactionType::PrimarySale);
        assert_eq!(records[0].date, DATE);
        assert_eq!(records[0].value, Some(Money::from_cents(1275)));
        assert_eq!(records[0].seller, "JOSE CARLOS");
    }

    #[test]
    fn test_parse_cents_rejects() {
        assert_eq!(parse_cents(""), Err(FieldError::Empty { field: "value" }));
        assert_eq!(parse_cents("    "), Err(FieldError::Empty { field: "value" }));
        assert!(matches!(parse_cents("-"), Err(FieldError::NotNumeric { .. })));
        assert!(matches!(parse_cents("."), Err(FieldError::NotNumeric { .. })));
        assert!(matches!(
            parse_cents("AB00001275"),
            Err(FieldError::NotNumeric { .. })
        ));
        assert!(matches!(
            parse_cents("99999999999999999999"),
            Err(FieldError::OutOfRange { .. })
        ));
    }
}
