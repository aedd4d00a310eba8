use chrono::NaiveDate;
use reparto_core::{even_split, DateRange, GroupId, MemberId, Money, Share};
use serde::Serialize;
use thiserror::Error;

use crate::config::ImportConfig;
use crate::detect::detect_format;
use crate::format::ParseReport;
use crate::transaction::{Bank, Transaction};

/// Name accepted in place of a bank to request detection.
pub const AUTO_FORMAT: &str = "auto";

/// Where imported expenses are written. Implemented by the host on top of
/// its storage backend.
pub trait ExpenseStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_expenses(&mut self, expenses: &[NewExpense]) -> Result<(), Self::Error>;
}

/// Statement details kept alongside an imported expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMetadata {
    pub bank: Bank,
    /// Signed amount as it appeared on the statement.
    pub original_amount: Money,
    pub movement_type: Option<String>,
    pub observations: Option<String>,
}

/// An expense record ready to be created in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub group_id: GroupId,
    pub description: String,
    /// Always non-negative; the sign lives in `metadata.original_amount`.
    pub amount: Money,
    pub paid_by: MemberId,
    pub category: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shares: Vec<Share>,
    pub metadata: ImportMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub bank: Bank,
    pub imported: usize,
    /// Parsed transactions the user left unselected.
    pub unselected: usize,
    /// Statement lines that could not be read as transactions.
    pub rejected: usize,
    /// First and last date among the imported expenses.
    pub period: Option<DateRange>,
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unsupported bank format: '{0}'")]
    UnsupportedFormat(String),
    #[error("No transactions selected for import")]
    NothingSelected,
    #[error("Failed to store imported expenses: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A parsed statement plus the user's selection of which rows to import.
#[derive(Debug, Clone)]
pub struct ImportSession {
    report: ParseReport,
    selected: Vec<bool>,
    config: ImportConfig,
}

impl ImportSession {
    /// Parses `text` with the named format, or detects it when `format` is
    /// `None`, empty or `"auto"`. An unknown name is an error; it is never
    /// guessed.
    pub fn open(text: &str, format: Option<&str>, config: ImportConfig) -> Result<Self, ImportError> {
        let bank = match format.map(str::trim) {
            None | Some("") => detect_format(text),
            Some(name) if name.eq_ignore_ascii_case(AUTO_FORMAT) => detect_format(text),
            Some(name) => name
                .parse::<Bank>()
                .map_err(|_| ImportError::UnsupportedFormat(name.to_string()))?,
        };
        Ok(Self::from_report(bank.parse(text), config))
    }

    pub fn from_report(report: ParseReport, config: ImportConfig) -> Self {
        let selected = vec![config.preselect; report.transactions.len()];
        ImportSession {
            report,
            selected,
            config,
        }
    }

    pub fn bank(&self) -> Bank {
        self.report.bank
    }

    pub fn report(&self) -> &ParseReport {
        &self.report
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.report.transactions
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    /// Returns `false` when `index` is out of range.
    pub fn set_selected(&mut self, index: usize, selected: bool) -> bool {
        match self.selected.get_mut(index) {
            Some(flag) => {
                *flag = selected;
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, index: usize) -> bool {
        let current = self.is_selected(index);
        self.set_selected(index, !current)
    }

    pub fn select_all(&mut self) {
        self.selected.fill(true);
    }

    pub fn deselect_all(&mut self) {
        self.selected.fill(false);
    }

    /// Selects exactly the transactions dated inside `range`.
    pub fn select_within(&mut self, range: DateRange) {
        for (flag, tx) in self.selected.iter_mut().zip(&self.report.transactions) {
            *flag = range.contains(tx.date);
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.report
            .transactions
            .iter()
            .zip(&self.selected)
            .filter_map(|(tx, &on)| on.then_some(tx))
    }

    /// Dates covered by the whole statement, `None` when nothing was parsed.
    pub fn statement_period(&self) -> Option<DateRange> {
        DateRange::spanning(self.report.transactions.iter().map(|tx| tx.date))
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|&&on| on).count()
    }

    /// Expense records for the selected transactions, paid by `importer`.
    ///
    /// Shares stay empty unless `auto_split` is configured, in which case each
    /// amount is split evenly across `members`.
    pub fn drafts(&self, group: &GroupId, importer: &MemberId, members: &[MemberId]) -> Vec<NewExpense> {
        self.selected()
            .map(|tx| {
                let amount = tx.amount.abs();
                let shares = if self.config.auto_split {
                    even_split(amount, members)
                } else {
                    Vec::new()
                };

                NewExpense {
                    group_id: group.clone(),
                    description: tx.concept.clone(),
                    amount,
                    paid_by: importer.clone(),
                    category: self.config.category.clone(),
                    date: tx.date,
                    shares,
                    metadata: ImportMetadata {
                        bank: tx.bank,
                        original_amount: tx.amount,
                        movement_type: tx.movement_type.clone(),
                        observations: tx.observations.clone(),
                    },
                }
            })
            .collect()
    }

    /// Hands the selected transactions to `store` as new expenses.
    pub fn commit<S: ExpenseStore>(
        &self,
        store: &mut S,
        group: &GroupId,
        importer: &MemberId,
        members: &[MemberId],
    ) -> Result<ImportSummary, ImportError> {
        let drafts = self.drafts(group, importer, members);
        if drafts.is_empty() {
            return Err(ImportError::NothingSelected);
        }

        store
            .create_expenses(&drafts)
            .map_err(|e| ImportError::Store(Box::new(e)))?;

        let summary = ImportSummary {
            bank: self.bank(),
            imported: drafts.len(),
            unselected: self.report.accepted() - drafts.len(),
            rejected: self.report.rejected,
            period: DateRange::spanning(drafts.iter().map(|d| d.date)),
        };
        tracing::info!(
            "Imported {} {} transactions into group {}",
            summary.imported,
            summary.bank,
            group
        );
        Ok(summary)
    }
}
