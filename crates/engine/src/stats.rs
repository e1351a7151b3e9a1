//! Aggregate statistics over a set of expenses.

use crate::{Expense, Money};

/// Sum, mean, and count over one user's filtered expenses.
///
/// The sum is carried in exact cents; the mean keeps full precision and is
/// only turned into a float at the serialization boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: Money,
    pub count: u64,
}

impl Summary {
    /// Total in currency units, for the JSON boundary.
    pub fn total_units(&self) -> f64 {
        self.total.units()
    }

    /// Mean amount in currency units; `0` for an empty set, never NaN.
    pub fn average_units(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total.cents() as f64 / self.count as f64 / 100.0
        }
    }
}

/// Computes the summary for an already-filtered, owner-scoped set.
pub fn summarize(expenses: &[Expense]) -> Summary {
    let total = expenses
        .iter()
        .fold(Money::ZERO, |acc, expense| acc + expense.amount);

    Summary {
        total,
        count: expenses.len() as u64,
    }
}
