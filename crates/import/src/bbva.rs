use regex::Regex;
use std::sync::LazyLock;

use crate::format::{LineKind, RowFields, StatementFormat};
use crate::transaction::Bank;

const HEADER_MARKERS: [&str; 3] = ["F.VALOR", "CONCEPTO", "IMPORTE"];

static HAS_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}[/-]\d{2}[/-]\d{2,4}").expect("valid regex"));

const VALUE_DATE: usize = 1;
const POSTING_DATE: usize = 2;
const CONCEPT: usize = 3;
const MOVEMENT_TYPE: usize = 4;
const AMOUNT: usize = 5;
const CURRENCY: usize = 6;
const OBSERVATIONS: usize = 7;

/// BBVA account export.
///
/// Rows have a leading empty column, then value date, posting date, concept,
/// movement type, amount, and optionally currency and observations:
///
/// ```text
/// ;F.Valor;Fecha;Concepto;Movimiento;Importe;Divisa;Observaciones
/// ;02/01/2024;03/01/2024;Mercadona;Pago con tarjeta;"-45,30";EUR;
/// ```
pub struct BbvaFormat;

impl StatementFormat for BbvaFormat {
    fn bank(&self) -> Bank {
        Bank::Bbva
    }

    fn min_fields(&self) -> usize {
        AMOUNT + 1
    }

    /// Before any data, a line naming a column title is the header. Without
    /// a header, the first line carrying a date starts the data.
    fn classify(&self, line: &str, data_started: bool) -> LineKind {
        if data_started {
            return LineKind::Data;
        }
        let upper = line.to_uppercase();
        if HEADER_MARKERS.iter().any(|marker| upper.contains(marker)) {
            LineKind::Header
        } else if HAS_DATE.is_match(line) {
            LineKind::Data
        } else {
            LineKind::Noise
        }
    }

    fn map_fields<'a>(&self, fields: &'a [String]) -> RowFields<'a> {
        let date = if fields[VALUE_DATE].is_empty() {
            &fields[POSTING_DATE]
        } else {
            &fields[VALUE_DATE]
        };

        RowFields {
            date,
            concept: &fields[CONCEPT],
            amount: &fields[AMOUNT],
            movement_type: Some(&fields[MOVEMENT_TYPE]),
            currency: fields.get(CURRENCY).map(String::as_str),
            observations: fields.get(OBSERVATIONS).map(String::as_str),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use reparto_core::Money;

    fn m(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap()
    }

    const STATEMENT: &str = "\
Últimos movimientos
Cuenta;ES91 0182 0000 0000 0000 0000
;F.Valor;Fecha;Concepto;Movimiento;Importe;Divisa;Observaciones
;02/01/2024;03/01/2024;Mercadona;Pago con tarjeta;\"-45,30\";;
;;05/01/2024;Nómina enero;Transferencia recibida;\"1.850,00\";EUR;Empresa SL
;08/01/2024;08/01/2024;\"Cena; amigos\";Bizum enviado;\"-23,10\";USD;Pagado a Ana
";

    #[test]
    fn header_is_skipped_and_each_row_becomes_a_transaction() {
        let report = BbvaFormat.parse_text(STATEMENT);

        assert_eq!(report.accepted(), 3);
        assert_eq!(report.skipped, 3);
        assert_eq!(report.rejected, 0);
        assert!(report.transactions.iter().all(|t| t.bank == Bank::Bbva));
    }

    #[test]
    fn maps_fixed_columns() {
        let report = BbvaFormat.parse_text(STATEMENT);
        let tx = &report.transactions[2];

        assert_eq!(tx.date, date(2024, 1, 8));
        assert_eq!(tx.concept, "Cena; amigos");
        assert_eq!(tx.movement_type.as_deref(), Some("Bizum enviado"));
        assert_eq!(tx.amount, m("-23.10"));
        assert_eq!(tx.currency, "USD");
        assert_eq!(tx.observations.as_deref(), Some("Pagado a Ana"));
    }

    #[test]
    fn empty_currency_defaults_to_eur() {
        let report = BbvaFormat.parse_text(STATEMENT);
        assert_eq!(report.transactions[0].currency, "EUR");
        assert_eq!(report.transactions[0].observations, None);
    }

    #[test]
    fn value_date_preferred_over_posting_date() {
        let report = BbvaFormat.parse_text(STATEMENT);
        assert_eq!(report.transactions[0].date, date(2024, 1, 2));
        // No value date: falls back to the posting date.
        assert_eq!(report.transactions[1].date, date(2024, 1, 5));
        assert_eq!(report.transactions[1].amount, m("1850"));
    }

    #[test]
    fn six_columns_are_enough() {
        let text = ";F.VALOR;FECHA;CONCEPTO;MOVIMIENTO;IMPORTE\n;10/02/2024;10/02/2024;Farmacia;Tarjeta;\"-8,95\"\n";
        let report = BbvaFormat.parse_text(text);

        assert_eq!(report.accepted(), 1);
        assert_eq!(report.transactions[0].currency, "EUR");
        assert_eq!(report.transactions[0].observations, None);
    }

    #[test]
    fn short_rows_are_rejected() {
        let text = ";F.Valor;Fecha;Concepto;Movimiento;Importe\n;10/02/2024;10/02/2024;Farmacia;\"-8,95\"\n";
        let report = BbvaFormat.parse_text(text);

        assert_eq!(report.accepted(), 0);
        assert_eq!(report.rejected, 1);
    }

    #[test]
    fn without_header_data_starts_at_first_dated_line() {
        let text = "\
Informe de movimientos
;12/03/2024;12/03/2024;Gasolinera;Tarjeta;\"-60,00\";EUR;
;13/03/2024;13/03/2024;Devolución;Abono;\"12,00\";EUR;
";
        let report = BbvaFormat.parse_text(text);

        assert_eq!(report.accepted(), 2);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn column_words_inside_rows_do_not_hide_them() {
        let text = "\
;F.Valor;Fecha;Concepto;Movimiento;Importe;Divisa;Observaciones
;14/03/2024;14/03/2024;DEVOLUCION IMPORTE COMPRA;Abono;\"19,99\";EUR;
";
        let report = BbvaFormat.parse_text(text);
        assert_eq!(report.accepted(), 1);
    }

    #[test]
    fn header_match_is_case_insensitive() {
        let text = ";f.valor;fecha;concepto;movimiento;importe\n;10/02/2024;;Taxi;Tarjeta;\"-12,00\"\n";
        let report = BbvaFormat.parse_text(text);

        assert_eq!(report.skipped, 1);
        assert_eq!(report.accepted(), 1);
    }
}
