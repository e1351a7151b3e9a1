//! Query filters for listing and aggregating expenses.
//!
//! Filters are conjunctive; an absent field imposes no constraint. Bounds
//! are inclusive on both ends. The cross-field date check runs before any
//! query is built so a reversed range surfaces as an error instead of an
//! empty result.

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, QueryFilter};

use crate::{EngineError, Money, ResultEngine, expenses};

/// Optional predicates over a user's expenses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Inclusive lower bound on `date`.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `date`.
    pub end_date: Option<NaiveDate>,
    /// Exact match on the stored category code. No case-normalization
    /// happens here; an unknown code simply matches nothing.
    pub category: Option<String>,
    /// Inclusive lower bound on `amount`.
    pub min_amount: Option<Money>,
    /// Inclusive upper bound on `amount`.
    pub max_amount: Option<Money>,
}

impl ExpenseFilter {
    /// Cross-field checks, run before the filter touches a query.
    pub fn validate(&self) -> ResultEngine<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(EngineError::InvalidDateRange(
                "start_date must be before end_date".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sort order for expense listings.
///
/// The default mirrors the model's natural ordering: newest first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpenseOrdering {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl ExpenseOrdering {
    /// Parses the `ordering` query value (`date`, `-date`, `amount`,
    /// `-amount`).
    pub fn parse(value: &str) -> ResultEngine<Self> {
        match value {
            "-date" => Ok(Self::DateDesc),
            "date" => Ok(Self::DateAsc),
            "-amount" => Ok(Self::AmountDesc),
            "amount" => Ok(Self::AmountAsc),
            other => Err(EngineError::InvalidOrdering(format!(
                "unknown ordering \"{other}\", expected one of date, -date, amount, -amount"
            ))),
        }
    }
}

pub(crate) trait ApplyExpenseFilters: QueryFilter + Sized {
    fn apply_expense_filters(self, filter: &ExpenseFilter) -> Self;
}

impl<T> ApplyExpenseFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_expense_filters(mut self, filter: &ExpenseFilter) -> Self {
        if let Some(start) = filter.start_date {
            self = self.filter(expenses::Column::Date.gte(start));
        }
        if let Some(end) = filter.end_date {
            self = self.filter(expenses::Column::Date.lte(end));
        }
        if let Some(category) = &filter.category {
            self = self.filter(expenses::Column::Category.eq(category.clone()));
        }
        if let Some(min) = filter.min_amount {
            self = self.filter(expenses::Column::AmountCents.gte(min.cents()));
        }
        if let Some(max) = filter.max_amount {
            self = self.filter(expenses::Column::AmountCents.lte(max.cents()));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_filter_is_valid() {
        assert!(ExpenseFilter::default().validate().is_ok());
    }

    #[test]
    fn reversed_date_range_is_an_error() {
        let filter = ExpenseFilter {
            start_date: Some(date(2025, 1, 10)),
            end_date: Some(date(2025, 1, 1)),
            ..Default::default()
        };
        assert!(matches!(
            filter.validate(),
            Err(EngineError::InvalidDateRange(_))
        ));
    }

    #[test]
    fn equal_bounds_are_allowed() {
        let filter = ExpenseFilter {
            start_date: Some(date(2025, 1, 10)),
            end_date: Some(date(2025, 1, 10)),
            ..Default::default()
        };
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn ordering_parses_the_four_codes() {
        assert_eq!(
            ExpenseOrdering::parse("-date").unwrap(),
            ExpenseOrdering::DateDesc
        );
        assert_eq!(
            ExpenseOrdering::parse("date").unwrap(),
            ExpenseOrdering::DateAsc
        );
        assert_eq!(
            ExpenseOrdering::parse("-amount").unwrap(),
            ExpenseOrdering::AmountDesc
        );
        assert_eq!(
            ExpenseOrdering::parse("amount").unwrap(),
            ExpenseOrdering::AmountAsc
        );
        assert!(matches!(
            ExpenseOrdering::parse("id"),
            Err(EngineError::InvalidOrdering(_))
        ));
    }
}
