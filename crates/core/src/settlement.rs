use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::balance::Balance;
use super::member::MemberId;
use super::money::Money;

/// A recommended payment from one member to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

struct Side<'a> {
    member: &'a MemberId,
    remaining: Money,
}

/// Reduces net balances to a short list of payments.
///
/// Debtors and creditors are each sorted by magnitude, largest first (stable,
/// so equal magnitudes keep their input order), then matched with two
/// pointers. Amounts at or below one cent are treated as settled. If the
/// balances do not net to zero the leftover stays unmatched.
pub fn simplify_debts(balances: &[Balance]) -> Vec<Settlement> {
    let mut debtors: Vec<Side<'_>> = balances
        .iter()
        .filter(|b| b.net.is_negative())
        .map(|b| Side { member: &b.member_id, remaining: -b.net })
        .collect();
    let mut creditors: Vec<Side<'_>> = balances
        .iter()
        .filter(|b| b.net.is_positive())
        .map(|b| Side { member: &b.member_id, remaining: b.net })
        .collect();

    debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    let mut settlements = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let amount = debtors[i].remaining.min(creditors[j].remaining);

        if amount > Money::CENT {
            settlements.push(Settlement {
                from: debtors[i].member.clone(),
                to: creditors[j].member.clone(),
                amount: amount.round(),
            });
        }

        debtors[i].remaining -= amount;
        creditors[j].remaining -= amount;

        if debtors[i].remaining < Money::CENT {
            i += 1;
        }
        if creditors[j].remaining < Money::CENT {
            j += 1;
        }
    }

    tracing::debug!(
        "Simplified {} balances into {} settlements",
        balances.len(),
        settlements.len()
    );

    settlements
}

/// Returns the balances as they stand once every settlement has been paid.
///
/// The payer's `paid` grows by the amount and the receiver's `owes` grows by
/// the same amount. Settlements naming members absent from `balances` are
/// skipped, as are payments that would overflow a member's totals.
pub fn apply_settlements(balances: &[Balance], settlements: &[Settlement]) -> Vec<Balance> {
    let slots: HashMap<&MemberId, usize> = balances
        .iter()
        .enumerate()
        .rev()
        .map(|(i, b)| (&b.member_id, i))
        .collect();

    let mut settled = balances.to_vec();
    let mut dropped = 0;
    for s in settlements {
        if let Some(&i) = slots.get(&s.from) {
            if !settled[i].try_credit(s.amount, Money::zero()) {
                dropped += 1;
            }
        }
        if let Some(&i) = slots.get(&s.to) {
            if !settled[i].try_credit(Money::zero(), s.amount) {
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        tracing::warn!("Dropped {} settlement payments that would overflow", dropped);
    }
    settled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn id(s: &str) -> MemberId {
        MemberId::new(s)
    }

    fn net(member: &str, amount: &str) -> Balance {
        let amount = m(amount);
        if amount.is_negative() {
            Balance::new(id(member), Money::zero(), -amount)
        } else {
            Balance::new(id(member), amount, Money::zero())
        }
    }

    fn settle(from: &str, to: &str, amount: &str) -> Settlement {
        Settlement { from: id(from), to: id(to), amount: m(amount) }
    }

    #[test]
    fn single_debtor_pays_single_creditor() {
        let balances = vec![net("a", "50"), net("b", "-50")];
        assert_eq!(simplify_debts(&balances), vec![settle("b", "a", "50.00")]);
    }

    #[test]
    fn three_members_two_payments() {
        let balances = vec![net("a", "-30"), net("b", "-20"), net("c", "50")];
        let settlements = simplify_debts(&balances);

        assert_eq!(
            settlements,
            vec![settle("a", "c", "30"), settle("b", "c", "20")]
        );
        assert_eq!(settlements.iter().map(|s| s.amount).sum::<Money>(), m("50"));
        assert!(settlements.iter().all(|s| s.amount > Money::CENT));
    }

    #[test]
    fn largest_debts_are_matched_first() {
        let balances = vec![
            net("a", "-10"),
            net("b", "40"),
            net("c", "-70"),
            net("d", "40"),
        ];
        let settlements = simplify_debts(&balances);

        assert_eq!(
            settlements,
            vec![
                settle("c", "b", "40"),
                settle("c", "d", "30"),
                settle("a", "d", "10"),
            ]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let balances = vec![net("x", "-25"), net("y", "-25"), net("z", "50")];
        let settlements = simplify_debts(&balances);

        assert_eq!(settlements[0].from, id("x"));
        assert_eq!(settlements[1].from, id("y"));
    }

    #[test]
    fn amounts_are_rounded_to_cents() {
        let balances = vec![net("a", "-33.333"), net("b", "33.333")];
        assert_eq!(simplify_debts(&balances), vec![settle("a", "b", "33.33")]);
    }

    #[test]
    fn dust_is_not_emitted() {
        let balances = vec![net("a", "-0.01"), net("b", "0.005"), net("c", "0.005")];
        assert!(simplify_debts(&balances).is_empty());
    }

    #[test]
    fn all_settled_yields_nothing() {
        let balances = vec![net("a", "0"), net("b", "0")];
        assert!(simplify_debts(&balances).is_empty());
        assert!(simplify_debts(&[]).is_empty());
    }

    #[test]
    fn unbalanced_input_leaves_residual() {
        // Debts exceed credits: the surplus debt simply stays unmatched.
        let balances = vec![net("a", "-80"), net("b", "30")];
        assert_eq!(simplify_debts(&balances), vec![settle("a", "b", "30")]);
    }

    #[test]
    fn rerunning_after_applying_settlements_is_empty() {
        let balances = vec![
            Balance::new(id("a"), m("100"), m("50")),
            Balance::new(id("b"), Money::zero(), m("50")),
        ];
        let settlements = simplify_debts(&balances);
        let settled = apply_settlements(&balances, &settlements);

        assert!(settled.iter().all(|b| b.net.is_zero()));
        assert!(simplify_debts(&settled).is_empty());
    }

    #[test]
    fn rerunning_larger_group_is_empty() {
        let balances = vec![
            net("a", "-12.34"),
            net("b", "45.67"),
            net("c", "-20.00"),
            net("d", "-13.33"),
        ];
        let settlements = simplify_debts(&balances);
        assert!(settlements.len() <= balances.len() - 1);

        let settled = apply_settlements(&balances, &settlements);
        assert!(simplify_debts(&settled).is_empty());
    }

    #[test]
    fn apply_settlements_skips_unknown_members() {
        let balances = vec![net("a", "10")];
        let settled = apply_settlements(&balances, &[settle("ghost", "a", "10")]);
        assert_eq!(settled[0].net, Money::zero());
    }

    #[test]
    fn settlements_carry_two_decimals_on_the_wire() {
        let balances = vec![net("a", "50"), net("b", "-50")];
        let settlements = simplify_debts(&balances);
        let json = serde_json::to_value(&settlements[0]).unwrap();

        assert_eq!(json["amount"], "50.00");
        assert_eq!(json["from"], "b");
        assert_eq!(json["to"], "a");
    }

    #[test]
    fn apply_settlements_drops_payments_that_would_overflow() {
        let max = "79228162514264337593543950335";
        let balances = vec![net("a", max), net("b", "-5")];
        let settled = apply_settlements(&balances, &[settle("a", "b", max)]);

        assert_eq!(settled[0], balances[0]);
        assert_eq!(settled[1], balances[1]);
    }
}
