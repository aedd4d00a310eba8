use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::member::MemberId;
use super::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub String);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One member's portion of one expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub member_id: MemberId,
    pub amount: Money,
}

impl Share {
    pub fn new(member_id: MemberId, amount: Money) -> Self {
        Share { member_id, amount }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Money,
    pub paid_by: MemberId,
    pub shares: Vec<Share>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExpenseError {
    #[error("Expense {0} must have a positive amount")]
    NonPositiveAmount(ExpenseId),
    #[error("Shares of expense {0} add up to more than can be represented")]
    ShareOverflow(ExpenseId),
    #[error("Expense {id} is {amount} but its shares add up to {shares}")]
    ShareMismatch {
        id: ExpenseId,
        amount: Money,
        shares: Money,
    },
}

impl Expense {
    /// Sum of the shares, or `None` if it does not fit.
    pub fn share_total(&self) -> Option<Money> {
        self.shares
            .iter()
            .try_fold(Money::zero(), |total, s| total.checked_add(s.amount))
    }

    /// Strict check for callers that want to reject partially shared expenses.
    /// Balance computation itself tolerates them.
    pub fn validate(&self) -> Result<(), ExpenseError> {
        if !self.amount.is_positive() {
            return Err(ExpenseError::NonPositiveAmount(self.id.clone()));
        }
        let shares = self
            .share_total()
            .ok_or_else(|| ExpenseError::ShareOverflow(self.id.clone()))?;
        if shares != self.amount {
            return Err(ExpenseError::ShareMismatch {
                id: self.id.clone(),
                amount: self.amount,
                shares,
            });
        }
        Ok(())
    }
}

/// Even split of `amount` across `members`; leftover cents go to the first members.
pub fn even_split(amount: Money, members: &[MemberId]) -> Vec<Share> {
    members
        .iter()
        .zip(amount.split_even(members.len()))
        .map(|(member, part)| Share::new(member.clone(), part))
        .collect()
}
