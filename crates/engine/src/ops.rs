//! Owner-scoped expense operations.
//!
//! Every operation takes the acting user's id and only ever touches that
//! user's rows. Foreign records are indistinguishable from absent ones:
//! both come back as [`EngineError::KeyNotFound`].

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseFilter, ExpenseOrdering, ResultEngine, Summary, expenses,
    filters::ApplyExpenseFilters, report, stats,
    validate::{self, ExpenseDraft},
};

/// Fields for a new expense. Ownership comes from `user_id` and nothing
/// else; there is no client-settable owner field.
#[derive(Clone, Debug)]
pub struct CreateExpenseCmd {
    pub user_id: Uuid,
    pub amount: String,
    pub category: String,
    pub date: NaiveDate,
    pub description: Option<String>,
}

/// Partial update of an owned expense. Absent fields keep their stored
/// value; the merged record passes the full validation again.
#[derive(Clone, Debug)]
pub struct UpdateExpenseCmd {
    pub user_id: Uuid,
    pub expense_id: Uuid,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    async fn owned_expense(
        &self,
        user_id: Uuid,
        expense_id: Uuid,
    ) -> ResultEngine<expenses::Model> {
        let model = expenses::Entity::find_by_id(expense_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;

        if model.user_id != user_id {
            return Err(EngineError::KeyNotFound("expense not exists".to_string()));
        }
        Ok(model)
    }

    /// Validates and inserts a new expense for `cmd.user_id`.
    pub async fn create_expense(&self, cmd: CreateExpenseCmd) -> ResultEngine<Expense> {
        let draft = ExpenseDraft {
            amount: cmd.amount,
            category: cmd.category,
            date: cmd.date,
            description: cmd.description,
        };
        let valid = validate::validate(&draft, Utc::now().date_naive())
            .map_err(EngineError::Validation)?;

        let now = Utc::now();
        let model = expenses::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(cmd.user_id),
            amount_cents: ActiveValue::Set(valid.amount.cents()),
            category: ActiveValue::Set(valid.category.as_str().to_string()),
            date: ActiveValue::Set(valid.date),
            description: ActiveValue::Set(valid.description),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        let model = model.insert(&self.database).await?;
        Expense::try_from(model)
    }

    /// Returns one owned expense.
    pub async fn expense(&self, user_id: Uuid, expense_id: Uuid) -> ResultEngine<Expense> {
        let model = self.owned_expense(user_id, expense_id).await?;
        Expense::try_from(model)
    }

    /// Lists the caller's expenses matching `filter`, sorted by `ordering`.
    pub async fn list_expenses(
        &self,
        user_id: Uuid,
        filter: &ExpenseFilter,
        ordering: ExpenseOrdering,
    ) -> ResultEngine<Vec<Expense>> {
        filter.validate()?;

        let mut query = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id))
            .apply_expense_filters(filter);

        // created_at breaks ties so listings stay stable across requests.
        query = match ordering {
            ExpenseOrdering::DateDesc => query
                .order_by_desc(expenses::Column::Date)
                .order_by_desc(expenses::Column::CreatedAt),
            ExpenseOrdering::DateAsc => query
                .order_by_asc(expenses::Column::Date)
                .order_by_asc(expenses::Column::CreatedAt),
            ExpenseOrdering::AmountDesc => query
                .order_by_desc(expenses::Column::AmountCents)
                .order_by_desc(expenses::Column::Date),
            ExpenseOrdering::AmountAsc => query
                .order_by_asc(expenses::Column::AmountCents)
                .order_by_desc(expenses::Column::Date),
        };

        let models = query.all(&self.database).await?;
        models.into_iter().map(Expense::try_from).collect()
    }

    /// Re-validates and updates an owned expense.
    ///
    /// The stored values fill any field the command leaves out, so the
    /// whole record passes the same validation as a create; nothing is
    /// written when any rule fails.
    pub async fn update_expense(&self, cmd: UpdateExpenseCmd) -> ResultEngine<Expense> {
        let model = self.owned_expense(cmd.user_id, cmd.expense_id).await?;

        let draft = ExpenseDraft {
            amount: cmd
                .amount
                .unwrap_or_else(|| crate::Money::new(model.amount_cents).to_string()),
            category: cmd.category.unwrap_or_else(|| model.category.clone()),
            date: cmd.date.unwrap_or(model.date),
            description: Some(cmd.description.unwrap_or_else(|| model.description.clone())),
        };
        let valid = validate::validate(&draft, Utc::now().date_naive())
            .map_err(EngineError::Validation)?;

        let mut active: expenses::ActiveModel = model.into();
        active.amount_cents = ActiveValue::Set(valid.amount.cents());
        active.category = ActiveValue::Set(valid.category.as_str().to_string());
        active.date = ActiveValue::Set(valid.date);
        active.description = ActiveValue::Set(valid.description);
        active.updated_at = ActiveValue::Set(Utc::now());

        let model = active.update(&self.database).await?;
        Expense::try_from(model)
    }

    /// Deletes an owned expense.
    pub async fn delete_expense(&self, user_id: Uuid, expense_id: Uuid) -> ResultEngine<()> {
        let model = self.owned_expense(user_id, expense_id).await?;
        expenses::Entity::delete_by_id(model.id)
            .exec(&self.database)
            .await?;
        Ok(())
    }

    /// Total, average, and count over the caller's filtered expenses.
    pub async fn summary(&self, user_id: Uuid, filter: &ExpenseFilter) -> ResultEngine<Summary> {
        let expenses = self
            .list_expenses(user_id, filter, ExpenseOrdering::default())
            .await?;
        Ok(stats::summarize(&expenses))
    }

    /// Renders the spending-by-category chart over all the caller's
    /// records. Reports are owner-scoped only; list filters do not apply.
    pub async fn spending_chart(&self, user_id: Uuid) -> ResultEngine<Option<Vec<u8>>> {
        let expenses = self
            .list_expenses(user_id, &ExpenseFilter::default(), ExpenseOrdering::default())
            .await?;
        report::spending_chart(&expenses)
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
