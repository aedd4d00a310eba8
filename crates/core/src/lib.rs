pub mod balance;
pub mod expense;
pub mod member;
pub mod money;
pub mod period;
pub mod settlement;

pub use balance::{compute_balances, Balance};
pub use expense::{even_split, Expense, ExpenseError, ExpenseId, Share};
pub use member::{GroupId, Member, MemberId};
pub use money::Money;
pub use period::DateRange;
pub use settlement::{apply_settlements, simplify_debts, Settlement};
