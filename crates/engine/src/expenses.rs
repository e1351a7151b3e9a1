//! Expense primitives.
//!
//! An `Expense` is a single recorded transaction owned by one user. The
//! database model stores the normalized form (cents, upper-case category
//! code); the domain struct re-exposes the typed values.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{Category, EngineError, Money};

/// A user-owned expense record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Money,
    pub category: Category,
    pub date: NaiveDate,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub category: String,
    pub date: Date,
    pub description: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let category = Category::parse(&model.category).ok_or_else(|| {
            EngineError::Internal(format!("stored category is not valid: {}", model.category))
        })?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            amount: Money::new(model.amount_cents),
            category,
            date: model.date,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
