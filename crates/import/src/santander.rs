use regex::Regex;
use std::sync::LazyLock;

use crate::format::{LineKind, RowFields, StatementFormat};
use crate::transaction::Bank;

static STARTS_WITH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*"?\d{2}[/-]\d{2}[/-]\d{4}"#).expect("valid regex"));

/// Banco Santander account export.
///
/// ```text
/// Cuenta: ES12 0049 ...
/// Fecha;Concepto;Importe;Saldo
/// 03/01/2024;TRANSFERENCIA DE LUIS;"250,00";"1.250,00"
/// ```
///
/// Columns are date, concept, amount and an optional balance we ignore.
/// Everything before the first line starting with a date is preamble.
pub struct SantanderFormat;

impl StatementFormat for SantanderFormat {
    fn bank(&self) -> Bank {
        Bank::Santander
    }

    fn min_fields(&self) -> usize {
        3
    }

    fn classify(&self, line: &str, data_started: bool) -> LineKind {
        if data_started || STARTS_WITH_DATE.is_match(line) {
            LineKind::Data
        } else {
            LineKind::Noise
        }
    }

    fn map_fields<'a>(&self, fields: &'a [String]) -> RowFields<'a> {
        RowFields {
            date: &fields[0],
            concept: &fields[1],
            amount: &fields[2],
            ..RowFields::default()
        }
    }
}
