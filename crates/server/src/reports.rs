//! Rendered spending reports.

use api_types::expense::ChartView;
use axum::{Extension, Json, extract::State};
use base64::Engine as _;

use crate::{ServerError, expenses::require_regular_user, server::ServerState};
use engine::users;

/// Bar chart of per-category totals across all of the caller's
/// expenses, delivered as a base64 PNG. An account with no expenses
/// gets a null chart.
pub async fn spending_chart(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ChartView>, ServerError> {
    require_regular_user(&user)?;

    let png = state.engine.spending_chart(user.id).await?;
    Ok(Json(ChartView {
        chart: png.map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes)),
    }))
}
