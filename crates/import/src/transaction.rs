use chrono::NaiveDate;
use reparto_core::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CURRENCY: &str = "EUR";

/// Banks whose statement exports can be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bank {
    Santander,
    #[serde(rename = "BBVA")]
    Bbva,
}

impl Bank {
    pub const ALL: [Bank; 2] = [Bank::Santander, Bank::Bbva];

    pub fn name(self) -> &'static str {
        match self {
            Bank::Santander => "Santander",
            Bank::Bbva => "BBVA",
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Bank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "santander" => Ok(Bank::Santander),
            "bbva" => Ok(Bank::Bbva),
            other => Err(format!("Unknown bank format: '{other}'")),
        }
    }
}

/// One movement read from a statement. Only built when both the date and
/// the amount parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub date: NaiveDate,
    pub concept: String,
    /// Signed; debits are negative.
    pub amount: Money,
    pub bank: Bank,
    pub currency: String,
    pub movement_type: Option<String>,
    pub observations: Option<String>,
    /// The statement line this was read from.
    pub raw: String,
}
