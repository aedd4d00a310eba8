pub mod bbva;
pub mod config;
pub mod detect;
pub mod export;
pub mod format;
pub mod normalize;
pub mod pipeline;
pub mod santander;
pub mod tokenizer;
pub mod transaction;

pub use config::{ConfigError, ImportConfig};
pub use detect::detect_format;
pub use export::{write_transactions, ExportError};
pub use format::{parse_with, LineKind, ParseReport, RowFields, StatementFormat};
pub use normalize::{normalize_amount, normalize_date};
pub use pipeline::{ExpenseStore, ImportError, ImportMetadata, ImportSession, ImportSummary, NewExpense};
pub use tokenizer::tokenize;
pub use transaction::{Bank, Transaction};

pub mod import {
    use crate::*;

    /// Detects the bank and parses the statement.
    pub fn parse_statement(text: &str) -> ParseReport {
        detect_format(text).parse(text)
    }

    /// Parses with an explicitly named bank format.
    pub fn parse_statement_as(text: &str, format: &str) -> Result<ParseReport, ImportError> {
        let bank = format
            .parse::<Bank>()
            .map_err(|_| ImportError::UnsupportedFormat(format.to_string()))?;
        Ok(bank.parse(text))
    }

    pub fn load_config(toml_content: &str) -> Result<ImportConfig, ConfigError> {
        ImportConfig::from_toml(toml_content)
    }

}
