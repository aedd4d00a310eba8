use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::expense::Expense;
use super::member::{Member, MemberId};
use super::money::Money;

/// A member's net position within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub member_id: MemberId,
    /// Total of the expenses this member funded.
    pub paid: Money,
    /// Total of the shares assigned to this member.
    pub owes: Money,
    /// `paid - owes`; positive means the group owes this member.
    pub net: Money,
}

impl Balance {
    pub fn new(member_id: MemberId, paid: Money, owes: Money) -> Self {
        Balance {
            member_id,
            paid,
            owes,
            net: paid - owes,
        }
    }

    pub fn zero(member_id: MemberId) -> Self {
        Balance::new(member_id, Money::zero(), Money::zero())
    }

    /// Adds to `paid` and `owes`, leaving the balance untouched and returning
    /// `false` if a total or the net would overflow.
    pub fn try_credit(&mut self, paid: Money, owes: Money) -> bool {
        let next = self
            .paid
            .checked_add(paid)
            .zip(self.owes.checked_add(owes))
            .and_then(|(paid, owes)| paid.checked_sub(owes).map(|net| (paid, owes, net)));

        match next {
            Some((paid, owes, net)) => {
                self.paid = paid;
                self.owes = owes;
                self.net = net;
                true
            }
            None => false,
        }
    }
}

struct Totals {
    balances: Vec<Balance>,
    ignored: usize,
    overflowed: usize,
}

impl Totals {
    fn credit(mut self, slot: Option<usize>, paid: Money, owes: Money) -> Self {
        match slot {
            Some(i) => {
                if !self.balances[i].try_credit(paid, owes) {
                    self.overflowed += 1;
                }
            }
            None => self.ignored += 1,
        }
        self
    }
}

/// Folds expenses and their shares into one balance per member, in member order.
///
/// Payers and share owners missing from `members` are skipped, as are amounts
/// too large to add to a member's totals. Shares are
/// summed independently of the expense total, so partially shared expenses
/// leave the group out of balance instead of failing.
pub fn compute_balances(expenses: &[Expense], members: &[Member]) -> Vec<Balance> {
    let mut slots: HashMap<&MemberId, usize> = HashMap::with_capacity(members.len());
    for (i, member) in members.iter().enumerate() {
        slots.entry(&member.id).or_insert(i);
    }
    let slot = |id: &MemberId| slots.get(id).copied();

    let initial = Totals {
        balances: members.iter().map(|m| Balance::zero(m.id.clone())).collect(),
        ignored: 0,
        overflowed: 0,
    };

    let totals = expenses.iter().fold(initial, |totals, expense| {
        let totals = totals.credit(slot(&expense.paid_by), expense.amount, Money::zero());
        expense.shares.iter().fold(totals, |totals, share| {
            totals.credit(slot(&share.member_id), Money::zero(), share.amount)
        })
    });

    if totals.ignored > 0 {
        tracing::warn!(
            "Ignored {} payer/share references to members outside the group",
            totals.ignored
        );
    }
    if totals.overflowed > 0 {
        tracing::warn!(
            "Dropped {} amounts that would overflow a member's totals",
            totals.overflowed
        );
    }

    totals.balances
}
