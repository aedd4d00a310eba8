use serde::Serialize;
use std::io::Write;
use thiserror::Error;

use crate::transaction::Transaction;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Serialize)]
struct Row<'a> {
    date: String,
    concept: &'a str,
    amount: String,
    bank: &'a str,
    currency: &'a str,
    movement_type: &'a str,
    observations: &'a str,
}

impl<'a> From<&'a Transaction> for Row<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Row {
            date: tx.date.format("%Y-%m-%d").to_string(),
            concept: &tx.concept,
            amount: tx.amount.to_string(),
            bank: tx.bank.name(),
            currency: &tx.currency,
            movement_type: tx.movement_type.as_deref().unwrap_or_default(),
            observations: tx.observations.as_deref().unwrap_or_default(),
        }
    }
}

/// Writes transactions as comma-separated values with ISO dates and
/// dot-decimal signed amounts, one header row first.
pub fn write_transactions<W: Write>(transactions: &[Transaction], writer: W) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    for tx in transactions {
        out.serialize(Row::from(tx))?;
    }
    if transactions.is_empty() {
        out.write_record([
            "date",
            "concept",
            "amount",
            "bank",
            "currency",
            "movement_type",
            "observations",
        ])?;
    }
    out.flush()?;
    Ok(())
}
