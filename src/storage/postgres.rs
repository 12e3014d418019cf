use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::models::{Expense, NewExpense};
use crate::shared::AppResult;
use crate::storage::ExpenseStore;

/// Primary backend: a server-side PostgreSQL database.
pub struct PostgresStore {
    pool: PgPool,
}

const COLUMNS: &str = "id, owner_id, category, description, amount, date, created_at";

impl PostgresStore {
    /// Connects to the given database and bootstraps the schema.
    ///
    /// The connection attempt is bounded so an unreachable server makes the
    /// startup selection fall through to the fallback backend quickly.
    pub async fn connect(url: &str) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS expenses (
                id BIGSERIAL PRIMARY KEY,
                owner_id BIGINT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                amount DOUBLE PRECISION NOT NULL,
                date DATE NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_expenses_owner_date
             ON expenses (owner_id, date DESC)",
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_expenses_owner_category
             ON expenses (owner_id, category)",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl ExpenseStore for PostgresStore {
    async fn add_expense(&self, owner: i64, new: NewExpense) -> AppResult<Expense> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "INSERT INTO expenses (owner_id, category, description, amount, date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        ))
        .bind(owner)
        .bind(&new.category)
        .bind(&new.description)
        .bind(new.amount)
        .bind(new.date)
        .fetch_one(&self.pool)
        .await?;
        Ok(expense)
    }

    async fn last_expense(&self, owner: i64) -> AppResult<Option<Expense>> {
        // Creation order, deliberately not the pagination ordering.
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {COLUMNS} FROM expenses
             WHERE owner_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        ))
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(expense)
    }

    async fn delete_expense(&self, id: i64, owner: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn expenses_count(&self, owner: i64) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses WHERE owner_id = $1")
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn paginated_expenses(
        &self,
        owner: i64,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {COLUMNS} FROM expenses
             WHERE owner_id = $1
             ORDER BY date DESC, created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(owner)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;
        Ok(expenses)
    }

    async fn period_report(
        &self,
        owner: i64,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> AppResult<Vec<Expense>> {
        let expenses = match end {
            Some(end) => {
                sqlx::query_as::<_, Expense>(&format!(
                    "SELECT {COLUMNS} FROM expenses
                     WHERE owner_id = $1 AND date >= $2 AND date <= $3
                     ORDER BY date DESC, created_at DESC, id DESC"
                ))
                .bind(owner)
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Expense>(&format!(
                    "SELECT {COLUMNS} FROM expenses
                     WHERE owner_id = $1 AND date >= $2
                     ORDER BY date DESC, created_at DESC, id DESC"
                ))
                .bind(owner)
                .bind(start)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(expenses)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
