use reparto_core::Money;
use serde::Serialize;

use crate::bbva::BbvaFormat;
use crate::normalize::{normalize_amount, normalize_date};
use crate::santander::SantanderFormat;
use crate::tokenizer::tokenize;
use crate::transaction::{Bank, Transaction, DEFAULT_CURRENCY};

/// What a statement line is, as far as one bank's layout is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Column titles. Skipped, and rows are accepted from here on.
    Header,
    /// Anything before the data starts.
    Noise,
    /// A candidate transaction row.
    Data,
}

/// Field positions picked out of a tokenized row.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowFields<'a> {
    pub date: &'a str,
    pub concept: &'a str,
    pub amount: &'a str,
    pub currency: Option<&'a str>,
    pub movement_type: Option<&'a str>,
    pub observations: Option<&'a str>,
}

/// The parts of a bank's export layout that differ between banks.
/// Tokenizing and date/amount normalization are shared.
pub trait StatementFormat {
    fn bank(&self) -> Bank;

    /// Rows with fewer fields are rejected before mapping.
    fn min_fields(&self) -> usize;

    /// Classifies a non-blank line. `data_started` latches once a `Header` or
    /// `Data` line has been seen.
    fn classify(&self, line: &str, data_started: bool) -> LineKind;

    /// Picks the fixed columns. `fields` has at least `min_fields()` entries.
    fn map_fields<'a>(&self, fields: &'a [String]) -> RowFields<'a>;

    fn parse_text(&self, text: &str) -> ParseReport
    where
        Self: Sized,
    {
        parse_with(self, text)
    }
}

/// Result of running one format over a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub bank: Bank,
    pub transactions: Vec<Transaction>,
    /// Header and preamble lines.
    pub skipped: usize,
    /// Data lines dropped for too few fields or an unreadable date or amount.
    pub rejected: usize,
}

impl ParseReport {
    fn new(bank: Bank) -> Self {
        ParseReport {
            bank,
            transactions: Vec::new(),
            skipped: 0,
            rejected: 0,
        }
    }

    pub fn accepted(&self) -> usize {
        self.transactions.len()
    }
}

impl Bank {
    /// Parses `text` with this bank's layout.
    pub fn parse(self, text: &str) -> ParseReport {
        match self {
            Bank::Santander => SantanderFormat.parse_text(text),
            Bank::Bbva => BbvaFormat.parse_text(text),
        }
    }
}

/// Runs `format` over every non-blank line of `text`. Unreadable rows are
/// counted, never raised.
pub fn parse_with<F: StatementFormat + ?Sized>(format: &F, text: &str) -> ParseReport {
    let mut report = ParseReport::new(format.bank());
    let mut data_started = false;

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        match format.classify(line, data_started) {
            LineKind::Header => {
                data_started = true;
                report.skipped += 1;
            }
            LineKind::Noise => report.skipped += 1,
            LineKind::Data => {
                data_started = true;
                match read_row(format, line) {
                    Some(tx) => report.transactions.push(tx),
                    None => report.rejected += 1,
                }
            }
        }
    }

    tracing::debug!(
        "Parsed {} statement: {} accepted, {} skipped, {} rejected",
        report.bank,
        report.accepted(),
        report.skipped,
        report.rejected
    );

    report
}

fn read_row<F: StatementFormat + ?Sized>(format: &F, line: &str) -> Option<Transaction> {
    let fields = tokenize(line);
    if fields.len() < format.min_fields() {
        return None;
    }
    let row = format.map_fields(&fields);

    let date = normalize_date(row.date)?;
    let amount = normalize_amount(row.amount)?;

    Some(Transaction {
        date,
        concept: row.concept.to_string(),
        amount: Money::from(amount),
        bank: format.bank(),
        currency: non_empty(row.currency).unwrap_or(DEFAULT_CURRENCY).to_string(),
        movement_type: non_empty(row.movement_type).map(str::to_string),
        observations: non_empty(row.observations).map(str::to_string),
        raw: line.to_string(),
    })
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.filter(|f| !f.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-column layout used to exercise the driver on its own.
    struct Minimal;

    impl StatementFormat for Minimal {
        fn bank(&self) -> Bank {
            Bank::Santander
        }

        fn min_fields(&self) -> usize {
            2
        }

        fn classify(&self, line: &str, data_started: bool) -> LineKind {
            if line.starts_with("DATE") {
                LineKind::Header
            } else if data_started {
                LineKind::Data
            } else {
                LineKind::Noise
            }
        }

        fn map_fields<'a>(&self, fields: &'a [String]) -> RowFields<'a> {
            RowFields {
                date: &fields[0],
                concept: "row",
                amount: &fields[1],
                ..RowFields::default()
            }
        }
    }

    #[test]
    fn driver_counts_skipped_and_rejected_lines() {
        let text = "preamble\nDATE,AMOUNT\n01/02/2024,10\n\n   \nnot a date,5\n02/02/2024\n03/02/2024,\"-1,5\"\n";
        let report = parse_with(&Minimal, text);

        assert_eq!(report.accepted(), 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.rejected, 2);
        assert_eq!(report.transactions[1].amount, "-1.5".parse::<Money>().unwrap());
    }

    #[test]
    fn driver_fills_defaults() {
        let report = parse_with(&Minimal, "DATE\n01/02/2024,10\n");
        let tx = &report.transactions[0];

        assert_eq!(tx.currency, "EUR");
        assert_eq!(tx.movement_type, None);
        assert_eq!(tx.observations, None);
        assert_eq!(tx.raw, "01/02/2024,10");
    }

    #[test]
    fn empty_text_yields_empty_report() {
        let report = Bank::Bbva.parse("");
        assert_eq!(report.bank, Bank::Bbva);
        assert_eq!(report.accepted(), 0);
        assert_eq!(report.skipped + report.rejected, 0);
    }
}
