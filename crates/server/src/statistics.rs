//! Aggregate figures over the caller's expenses.

use api_types::expense::{ExpenseListParams, SummaryView};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{
    ServerError,
    expenses::{parse_filter, require_regular_user},
    server::ServerState,
};
use engine::users;

/// Totals, average and count over the records matching the same
/// filters accepted by the expense list endpoint.
pub async fn summary(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(params): Query<ExpenseListParams>,
) -> Result<Json<SummaryView>, ServerError> {
    require_regular_user(&user)?;
    let (filter, _) = parse_filter(&params)?;

    let summary = state.engine.summary(user.id, &filter).await?;
    Ok(Json(SummaryView {
        total_expenses: summary.total_units(),
        average_expense: summary.average_units(),
        transaction_count: summary.count,
    }))
}
