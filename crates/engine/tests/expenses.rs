use chrono::{Days, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, Database, DatabaseConnection};
use uuid::Uuid;

use engine::{
    CreateExpenseCmd, Engine, EngineError, ExpenseFilter, ExpenseOrdering, UpdateExpenseCmd, users,
};
use migration::MigratorTrait;

async fn engine_with_user() -> (Engine, DatabaseConnection, Uuid) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let user_id = insert_user(&db, "alice@example.com").await;
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db, user_id)
}

async fn insert_user(db: &DatabaseConnection, email: &str) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    users::ActiveModel {
        id: ActiveValue::Set(id),
        email: ActiveValue::Set(email.to_string()),
        name: ActiveValue::Set("Alice".to_string()),
        password_hash: ActiveValue::Set("not-a-real-hash".to_string()),
        role: ActiveValue::Set("user".to_string()),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

fn cmd(user_id: Uuid, amount: &str, category: &str, days_ago: u64) -> CreateExpenseCmd {
    CreateExpenseCmd {
        user_id,
        amount: amount.to_string(),
        category: category.to_string(),
        date: Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(days_ago))
            .unwrap(),
        description: None,
    }
}

#[tokio::test]
async fn create_and_fetch_expense() {
    let (engine, _db, user_id) = engine_with_user().await;

    let created = engine
        .create_expense(CreateExpenseCmd {
            user_id,
            amount: "12.50".to_string(),
            category: "groceries".to_string(),
            date: Utc::now().date_naive(),
            description: Some("weekly shop".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(created.amount.cents(), 1250);
    assert_eq!(created.category.as_str(), "GROCERIES");
    assert_eq!(created.description, "weekly shop");

    let fetched = engine.expense(user_id, created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_rejects_invalid_fields() {
    let (engine, _db, user_id) = engine_with_user().await;

    let err = engine
        .create_expense(CreateExpenseCmd {
            user_id,
            amount: "0.00".to_string(),
            category: "travel".to_string(),
            date: Utc::now()
                .date_naive()
                .checked_add_days(Days::new(1))
                .unwrap(),
            description: None,
        })
        .await
        .unwrap_err();

    match err {
        EngineError::Validation(fields) => {
            let names: Vec<&str> = fields.iter().map(|f| f.field).collect();
            assert_eq!(names, vec!["amount", "category", "date"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn list_orders_by_date_descending_by_default() {
    let (engine, _db, user_id) = engine_with_user().await;

    engine.create_expense(cmd(user_id, "10.00", "GROCERIES", 2)).await.unwrap();
    engine.create_expense(cmd(user_id, "20.00", "UTILITIES", 0)).await.unwrap();
    engine.create_expense(cmd(user_id, "30.00", "ENTERTAINMENT", 1)).await.unwrap();

    let records = engine
        .list_expenses(user_id, &ExpenseFilter::default(), ExpenseOrdering::default())
        .await
        .unwrap();

    let cents: Vec<i64> = records.iter().map(|e| e.amount.cents()).collect();
    assert_eq!(cents, vec![2000, 3000, 1000]);
}

#[tokio::test]
async fn list_orders_by_amount() {
    let (engine, _db, user_id) = engine_with_user().await;

    engine.create_expense(cmd(user_id, "30.00", "GROCERIES", 0)).await.unwrap();
    engine.create_expense(cmd(user_id, "10.00", "GROCERIES", 1)).await.unwrap();
    engine.create_expense(cmd(user_id, "20.00", "GROCERIES", 2)).await.unwrap();

    let records = engine
        .list_expenses(user_id, &ExpenseFilter::default(), ExpenseOrdering::AmountAsc)
        .await
        .unwrap();
    let cents: Vec<i64> = records.iter().map(|e| e.amount.cents()).collect();
    assert_eq!(cents, vec![1000, 2000, 3000]);
}

#[tokio::test]
async fn filters_apply_conjunctively() {
    let (engine, _db, user_id) = engine_with_user().await;

    engine.create_expense(cmd(user_id, "10.00", "GROCERIES", 2)).await.unwrap();
    engine.create_expense(cmd(user_id, "20.00", "GROCERIES", 1)).await.unwrap();
    engine.create_expense(cmd(user_id, "30.00", "UTILITIES", 1)).await.unwrap();
    engine.create_expense(cmd(user_id, "40.00", "GROCERIES", 0)).await.unwrap();

    let filter = ExpenseFilter {
        start_date: Utc::now().date_naive().checked_sub_days(Days::new(1)),
        end_date: Some(Utc::now().date_naive()),
        category: Some("GROCERIES".to_string()),
        min_amount: Some("15.00".parse().unwrap()),
        max_amount: Some("25.00".parse().unwrap()),
    };

    let records = engine
        .list_expenses(user_id, &filter, ExpenseOrdering::default())
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount.cents(), 2000);
}

#[tokio::test]
async fn reversed_date_range_is_rejected() {
    let (engine, _db, user_id) = engine_with_user().await;

    let today = Utc::now().date_naive();
    let filter = ExpenseFilter {
        start_date: Some(today),
        end_date: today.checked_sub_days(Days::new(3)),
        ..Default::default()
    };

    let err = engine
        .list_expenses(user_id, &filter, ExpenseOrdering::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDateRange(_)));
}

#[tokio::test]
async fn expenses_are_scoped_per_user() {
    let (engine, db, alice) = engine_with_user().await;
    let bob = insert_user(&db, "bob@example.com").await;

    let record = engine.create_expense(cmd(alice, "10.00", "GROCERIES", 0)).await.unwrap();

    let err = engine.expense(bob, record.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let visible = engine
        .list_expenses(bob, &ExpenseFilter::default(), ExpenseOrdering::default())
        .await
        .unwrap();
    assert!(visible.is_empty());
}

#[tokio::test]
async fn partial_update_keeps_unset_fields() {
    let (engine, _db, user_id) = engine_with_user().await;
    let record = engine.create_expense(cmd(user_id, "10.00", "GROCERIES", 1)).await.unwrap();

    let updated = engine
        .update_expense(UpdateExpenseCmd {
            user_id,
            expense_id: record.id,
            amount: Some("99.99".to_string()),
            category: None,
            date: None,
            description: None,
        })
        .await
        .unwrap();

    assert_eq!(updated.amount.cents(), 9999);
    assert_eq!(updated.category, record.category);
    assert_eq!(updated.date, record.date);
    assert_eq!(updated.created_at, record.created_at);
    assert!(updated.updated_at >= record.updated_at);
}

#[tokio::test]
async fn update_revalidates_merged_record() {
    let (engine, _db, user_id) = engine_with_user().await;
    let record = engine.create_expense(cmd(user_id, "10.00", "GROCERIES", 1)).await.unwrap();

    let err = engine
        .update_expense(UpdateExpenseCmd {
            user_id,
            expense_id: record.id,
            amount: Some("1000000.01".to_string()),
            category: None,
            date: None,
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn delete_removes_record() {
    let (engine, _db, user_id) = engine_with_user().await;
    let record = engine.create_expense(cmd(user_id, "10.00", "GROCERIES", 0)).await.unwrap();

    engine.delete_expense(user_id, record.id).await.unwrap();

    let err = engine.expense(user_id, record.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn summary_matches_filtered_records() {
    let (engine, _db, user_id) = engine_with_user().await;

    engine.create_expense(cmd(user_id, "10.00", "GROCERIES", 2)).await.unwrap();
    engine.create_expense(cmd(user_id, "20.00", "UTILITIES", 1)).await.unwrap();
    engine.create_expense(cmd(user_id, "30.00", "ENTERTAINMENT", 0)).await.unwrap();

    let all = engine.summary(user_id, &ExpenseFilter::default()).await.unwrap();
    assert_eq!(all.count, 3);
    assert_eq!(all.total.cents(), 6000);
    assert_eq!(all.average_units(), 20.0);

    let filter = ExpenseFilter {
        category: Some("UTILITIES".to_string()),
        ..Default::default()
    };
    let scoped = engine.summary(user_id, &filter).await.unwrap();
    assert_eq!(scoped.count, 1);
    assert_eq!(scoped.total.cents(), 2000);
}

#[tokio::test]
async fn spending_chart_is_png_and_empty_is_none() {
    let (engine, _db, user_id) = engine_with_user().await;

    assert_eq!(engine.spending_chart(user_id).await.unwrap(), None);

    engine.create_expense(cmd(user_id, "10.00", "GROCERIES", 0)).await.unwrap();
    engine.create_expense(cmd(user_id, "25.00", "UTILITIES", 1)).await.unwrap();

    let png = engine.spending_chart(user_id).await.unwrap().unwrap();
    assert_eq!(&png[..4], b"\x89PNG");
}
