//! Domain core of the expense tracker.
//!
//! The engine owns the validation rules, the query filter builder, the
//! aggregation math, and the chart renderer, and exposes them through
//! owner-scoped operations on [`Engine`]. Persistence goes through
//! sea-orm; the HTTP layer lives in the `server` crate.

pub use category::Category;
pub use error::{EngineError, FieldError, FieldErrorKind};
pub use expenses::Expense;
pub use filters::{ExpenseFilter, ExpenseOrdering};
pub use money::Money;
pub use ops::{CreateExpenseCmd, Engine, EngineBuilder, UpdateExpenseCmd};
pub use stats::{Summary, summarize};
pub use validate::{ExpenseDraft, MAX_DATE_AGE_DAYS, ValidExpense, validate};

pub mod expenses;
pub mod users;

mod category;
mod error;
mod filters;
mod money;
mod ops;
mod report;
mod stats;
mod validate;

type ResultEngine<T> = Result<T, EngineError>;
