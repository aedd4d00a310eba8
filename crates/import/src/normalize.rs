use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static FULL_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$").expect("valid regex"));
static SHORT_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{2})$").expect("valid regex"));

static PLAIN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+(\.\d+)?$").expect("valid regex"));

/// Largest magnitude read from a statement: one trillion.
const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Two-digit years above this belong to the 1900s, the rest to the 2000s.
const CENTURY_PIVOT: i32 = 50;

/// Parses `DD/MM/YYYY`, `DD-MM-YYYY`, `DD/MM/YY` or `DD-MM-YY`.
///
/// `None` means the text is not a date (or not a real calendar day), which
/// callers read as "this is not a transaction row".
pub fn normalize_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    let (day, month, year): (u32, u32, i32) = if let Some(caps) = FULL_YEAR.captures(text) {
        (caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
    } else if let Some(caps) = SHORT_YEAR.captures(text) {
        let yy: i32 = caps[3].parse().ok()?;
        let year = if yy > CENTURY_PIVOT { 1900 + yy } else { 2000 + yy };
        (caps[1].parse().ok()?, caps[2].parse().ok()?, year)
    } else {
        return None;
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses a Spanish-formatted amount such as `-1.234,56 €`.
///
/// Currency symbols and whitespace are dropped, every `.` is taken as a
/// thousands separator and `,` as the decimal separator. The sign is kept.
/// What remains must be plain digits with at most one decimal part, and
/// magnitudes above one trillion are refused.
pub fn normalize_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '€' | '$' | '.') && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if !PLAIN_NUMBER.is_match(&cleaned) {
        return None;
    }
    Decimal::from_str(&cleaned)
        .ok()
        .filter(|amount| amount.abs() <= MAX_AMOUNT)
}
