use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Accepts a JSON string or number and keeps the raw decimal text; the
/// engine does the actual parsing and validation.
fn amount_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

fn optional_amount_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignupUser {
        pub email: String,
        pub name: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginUser {
        pub email: String,
        pub password: String,
    }

    /// An access/refresh token pair, as issued at login.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenPair {
        pub access: String,
        pub refresh: String,
    }

    /// Request body for refreshing an access token.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenRefresh {
        pub refresh: String,
    }

    /// A fresh access token.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccessToken {
        pub access: String,
    }
}

pub mod expense {
    use super::*;

    /// Request body for creating an expense.
    ///
    /// There is no owner field: ownership always comes from the
    /// authenticated caller.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        /// Decimal amount; a JSON string or number.
        #[serde(deserialize_with = "amount_string")]
        pub amount: String,
        /// Category code, matched case-insensitively.
        pub category: String,
        /// ISO `YYYY-MM-DD`.
        pub date: NaiveDate,
        pub description: Option<String>,
    }

    /// Request body for updating an expense. For `PATCH` every field is
    /// optional; `PUT` requires all of them semantically, which the server
    /// checks before handing the update to the engine.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        #[serde(default, deserialize_with = "optional_amount_string")]
        pub amount: Option<String>,
        pub category: Option<String>,
        pub date: Option<NaiveDate>,
        pub description: Option<String>,
    }

    /// One expense record as returned by the API.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        /// Two-decimal string, e.g. `"12.34"`.
        pub amount: String,
        pub category: String,
        /// ISO `YYYY-MM-DD`.
        pub date: NaiveDate,
        pub description: String,
    }

    /// Filter query parameters for list and summary.
    ///
    /// Amount bounds arrive as decimal strings, exactly as they appear in
    /// the query string.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseListParams {
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub category: Option<String>,
        pub min_amount: Option<String>,
        pub max_amount: Option<String>,
        /// One of `date`, `-date`, `amount`, `-amount`; default `-date`.
        pub ordering: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryView {
        pub total_expenses: f64,
        pub average_expense: f64,
        pub transaction_count: u64,
    }

    /// The spending report: a base64-encoded PNG, or `null` when the
    /// caller has no expenses.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChartView {
        pub chart: Option<String>,
    }
}
