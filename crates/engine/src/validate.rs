//! The Validation Layer for expense writes.
//!
//! A draft is validated as a whole: every broken field is reported in one
//! pass and nothing is applied until all rules hold. Ownership is not a
//! draft field at all; the caller identity is attached by the engine when
//! the record is persisted.

use std::str::FromStr;

use chrono::{Days, NaiveDate};

use crate::{Category, EngineError, FieldError, FieldErrorKind, Money};

/// How far back an expense date may lie: 5 years (1825 days), inclusive.
pub const MAX_DATE_AGE_DAYS: u64 = 1825;

/// Raw candidate fields for a create or update, before validation.
#[derive(Clone, Debug)]
pub struct ExpenseDraft {
    /// Decimal string, e.g. `"12.34"`.
    pub amount: String,
    /// Category code, matched case-insensitively.
    pub category: String,
    pub date: NaiveDate,
    pub description: Option<String>,
}

/// A draft that passed every rule, with normalized values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidExpense {
    pub amount: Money,
    pub category: Category,
    pub date: NaiveDate,
    pub description: String,
}

/// Validates a draft against `today` (the server date).
///
/// Returns the normalized record, or every field-scoped failure at once.
pub fn validate(draft: &ExpenseDraft, today: NaiveDate) -> Result<ValidExpense, Vec<FieldError>> {
    let mut errors = Vec::new();

    let amount = match Money::from_str(&draft.amount) {
        Ok(amount) if amount.is_positive() && amount <= Money::MAX_EXPENSE => Some(amount),
        Ok(_) => {
            errors.push(FieldError::new(
                "amount",
                FieldErrorKind::InvalidAmount,
                "Amount must be greater than zero and at most 1,000,000.",
            ));
            None
        }
        Err(EngineError::Validation(mut parse_errors)) => {
            errors.append(&mut parse_errors);
            None
        }
        Err(_) => {
            errors.push(FieldError::new(
                "amount",
                FieldErrorKind::InvalidAmount,
                "invalid amount",
            ));
            None
        }
    };

    let category = match Category::parse(&draft.category) {
        Some(category) => Some(category),
        None => {
            errors.push(FieldError::new(
                "category",
                FieldErrorKind::InvalidCategory,
                format!("Invalid category. Choose from: {}", Category::valid_codes()),
            ));
            None
        }
    };

    let oldest = today
        .checked_sub_days(Days::new(MAX_DATE_AGE_DAYS))
        .unwrap_or(NaiveDate::MIN);
    if draft.date > today {
        errors.push(FieldError::new(
            "date",
            FieldErrorKind::FutureDate,
            "Future dates are not allowed.",
        ));
    } else if draft.date < oldest {
        errors.push(FieldError::new(
            "date",
            FieldErrorKind::DateTooOld,
            "Date cannot be older than 5 years.",
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // Both are Some once errors is empty.
    let (Some(amount), Some(category)) = (amount, category) else {
        return Err(errors);
    };

    Ok(ValidExpense {
        amount,
        category,
        date: draft.date,
        description: draft.description.clone().unwrap_or_default(),
    })
}
