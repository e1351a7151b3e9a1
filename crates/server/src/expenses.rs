//! Expense CRUD endpoints.

use api_types::expense::{ExpenseListParams, ExpenseNew, ExpenseUpdate, ExpenseView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{
    CreateExpenseCmd, EngineError, Expense, ExpenseFilter, ExpenseOrdering, FieldError,
    FieldErrorKind, Money, UpdateExpenseCmd, users,
};

/// Expense endpoints are reserved for regular-user accounts.
pub(crate) fn require_regular_user(user: &users::Model) -> Result<(), ServerError> {
    if user.is_regular_user() {
        Ok(())
    } else {
        Err(ServerError::Engine(EngineError::Forbidden(
            "only regular users may access expenses".to_string(),
        )))
    }
}

fn parse_amount(value: &str, field: &'static str) -> Result<Money, ServerError> {
    value.parse::<Money>().map_err(|_| {
        ServerError::Engine(EngineError::Validation(vec![FieldError::new(
            field,
            FieldErrorKind::InvalidAmount,
            "invalid decimal amount",
        )]))
    })
}

/// Turns the raw query parameters into an engine filter plus ordering.
///
/// The cross-field date check itself lives in the engine; this only
/// parses the decimal strings and the ordering code.
pub(crate) fn parse_filter(
    params: &ExpenseListParams,
) -> Result<(ExpenseFilter, ExpenseOrdering), ServerError> {
    let min_amount = params
        .min_amount
        .as_deref()
        .map(|raw| parse_amount(raw, "min_amount"))
        .transpose()?;
    let max_amount = params
        .max_amount
        .as_deref()
        .map(|raw| parse_amount(raw, "max_amount"))
        .transpose()?;
    let ordering = params
        .ordering
        .as_deref()
        .map(ExpenseOrdering::parse)
        .transpose()?
        .unwrap_or_default();

    Ok((
        ExpenseFilter {
            start_date: params.start_date,
            end_date: params.end_date,
            category: params.category.clone(),
            min_amount,
            max_amount,
        },
        ordering,
    ))
}

fn view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount: expense.amount.to_string(),
        category: expense.category.as_str().to_string(),
        date: expense.date,
        description: expense.description,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(params): Query<ExpenseListParams>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    require_regular_user(&user)?;
    let (filter, ordering) = parse_filter(&params)?;

    let records = state.engine.list_expenses(user.id, &filter, ordering).await?;
    Ok(Json(records.into_iter().map(view).collect()))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    require_regular_user(&user)?;

    let record = state
        .engine
        .create_expense(CreateExpenseCmd {
            user_id: user.id,
            amount: payload.amount,
            category: payload.category,
            date: payload.date,
            description: payload.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(record))))
}

pub async fn detail(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    require_regular_user(&user)?;
    let record = state.engine.expense(user.id, id).await?;
    Ok(Json(view(record)))
}

/// `PUT`: a full replacement, so every validated field must be present.
pub async fn replace(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    require_regular_user(&user)?;

    if payload.amount.is_none() || payload.category.is_none() || payload.date.is_none() {
        return Err(ServerError::Generic(
            "amount, category and date are required".to_string(),
        ));
    }

    apply_update(&state, user.id, id, payload).await
}

/// `PATCH`: partial; absent fields keep their stored values.
pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    require_regular_user(&user)?;
    apply_update(&state, user.id, id, payload).await
}

async fn apply_update(
    state: &ServerState,
    user_id: Uuid,
    expense_id: Uuid,
    payload: ExpenseUpdate,
) -> Result<Json<ExpenseView>, ServerError> {
    let record = state
        .engine
        .update_expense(UpdateExpenseCmd {
            user_id,
            expense_id,
            amount: payload.amount,
            category: payload.category,
            date: payload.date,
            description: payload.description,
        })
        .await?;

    Ok(Json(view(record)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    require_regular_user(&user)?;
    state.engine.delete_expense(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
