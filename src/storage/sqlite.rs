use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use tokio::sync::Mutex;

use crate::models::{Expense, NewExpense};
use crate::shared::AppResult;
use crate::storage::ExpenseStore;

/// Fallback backend: an embedded SQLite database file.
///
/// rusqlite is synchronous, so the connection lives behind an async mutex
/// and each operation holds it for the duration of the query.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS expenses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id INTEGER NOT NULL,
        category TEXT NOT NULL,
        description TEXT NOT NULL,
        amount REAL NOT NULL,
        date TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_owner_date
        ON expenses (owner_id, date DESC);
    CREATE INDEX IF NOT EXISTS idx_expenses_owner_category
        ON expenses (owner_id, category);
";

impl SqliteStore {
    /// Opens (creating if needed) the database file and bootstraps the schema.
    pub fn open(path: &str) -> AppResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

const COLUMNS: &str = "id, owner_id, category, description, amount, date, created_at";

fn row_to_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        category: row.get(2)?,
        description: row.get(3)?,
        amount: row.get(4)?,
        date: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[async_trait]
impl ExpenseStore for SqliteStore {
    async fn add_expense(&self, owner: i64, new: NewExpense) -> AppResult<Expense> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO expenses (owner_id, category, description, amount, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                owner,
                new.category,
                new.description,
                new.amount,
                new.date,
                Utc::now()
            ],
        )?;

        let id = conn.last_insert_rowid();
        let expense = conn.query_row(
            &format!("SELECT {COLUMNS} FROM expenses WHERE id = ?1"),
            params![id],
            row_to_expense,
        )?;
        Ok(expense)
    }

    async fn last_expense(&self, owner: i64) -> AppResult<Option<Expense>> {
        let conn = self.conn.lock().await;
        // Creation order, which for SQLite is rowid order.
        match conn.query_row(
            &format!(
                "SELECT {COLUMNS} FROM expenses
                 WHERE owner_id = ?1
                 ORDER BY id DESC LIMIT 1"
            ),
            params![owner],
            row_to_expense,
        ) {
            Ok(expense) => Ok(Some(expense)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_expense(&self, id: i64, owner: i64) -> AppResult<u64> {
        let conn = self.conn.lock().await;
        let changes = conn.execute(
            "DELETE FROM expenses WHERE id = ?1 AND owner_id = ?2",
            params![id, owner],
        )?;
        Ok(changes as u64)
    }

    async fn expenses_count(&self, owner: i64) -> AppResult<u64> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE owner_id = ?1",
            params![owner],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    async fn paginated_expenses(
        &self,
        owner: i64,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<Expense>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM expenses
             WHERE owner_id = ?1
             ORDER BY date DESC, id DESC
             LIMIT ?2 OFFSET ?3"
        ))?;
        // Clamped casts: a huge offset must stay a huge positive number,
        // never a negative LIMIT/OFFSET.
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let expenses = stmt
            .query_map(params![owner, limit, offset], row_to_expense)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    async fn period_report(
        &self,
        owner: i64,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> AppResult<Vec<Expense>> {
        let conn = self.conn.lock().await;

        let mut query =
            format!("SELECT {COLUMNS} FROM expenses WHERE owner_id = ? AND date >= ?");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(owner), Box::new(start)];

        if let Some(end) = end {
            query.push_str(" AND date <= ?");
            params.push(Box::new(end));
        }

        query.push_str(" ORDER BY date DESC, id DESC");

        let mut stmt = conn.prepare(&query)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let expenses = stmt
            .query_map(param_refs.as_slice(), row_to_expense)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_expense(category: &str, amount: f64, date: &str) -> NewExpense {
        NewExpense {
            category: category.to_string(),
            description: "test".to_string(),
            amount,
            date: date.parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_add_and_count_are_owner_scoped() {
        let store = SqliteStore::open_in_memory().unwrap();

        for _ in 0..3 {
            store
                .add_expense(1, new_expense("🍔 Food", 100.0, "2024-01-01"))
                .await
                .unwrap();
        }

        assert_eq!(store.expenses_count(1).await.unwrap(), 3);
        assert_eq!(store.expenses_count(2).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_never_crosses_owners() {
        let store = SqliteStore::open_in_memory().unwrap();

        let expense = store
            .add_expense(1, new_expense("🍔 Food", 100.0, "2024-01-01"))
            .await
            .unwrap();

        // Wrong owner: nothing deleted, record intact.
        assert_eq!(store.delete_expense(expense.id, 2).await.unwrap(), 0);
        assert_eq!(store.expenses_count(1).await.unwrap(), 1);

        // Right owner: deleted exactly once.
        assert_eq!(store.delete_expense(expense.id, 1).await.unwrap(), 1);
        assert_eq!(store.delete_expense(expense.id, 1).await.unwrap(), 0);
        assert_eq!(store.expenses_count(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_last_expense_follows_creation_order_not_date() {
        let store = SqliteStore::open_in_memory().unwrap();

        store
            .add_expense(1, new_expense("🍔 Food", 100.0, "2024-05-20"))
            .await
            .unwrap();
        // Older date, but created later.
        let last = store
            .add_expense(1, new_expense("🚕 Transport", 50.0, "2024-01-01"))
            .await
            .unwrap();

        let fetched = store.last_expense(1).await.unwrap().unwrap();
        assert_eq!(fetched.id, last.id);
        assert_eq!(fetched.category, "🚕 Transport");

        assert!(store.last_expense(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pagination_orders_by_date_then_creation() {
        let store = SqliteStore::open_in_memory().unwrap();

        let a = store
            .add_expense(1, new_expense("🍔 Food", 1.0, "2024-01-01"))
            .await
            .unwrap();
        let b = store
            .add_expense(1, new_expense("🍔 Food", 2.0, "2024-03-01"))
            .await
            .unwrap();
        let c = store
            .add_expense(1, new_expense("🍔 Food", 3.0, "2024-03-01"))
            .await
            .unwrap();

        let page = store.paginated_expenses(1, 10, 0).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|e| e.id).collect();
        // Same date: later creation first.
        assert_eq!(ids, vec![c.id, b.id, a.id]);

        let second_page = store.paginated_expenses(1, 2, 2).await.unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].id, a.id);

        let past_end = store.paginated_expenses(1, 2, 10).await.unwrap();
        assert!(past_end.is_empty());

        // An absurd offset must come back empty, not unlimited.
        let huge = store.paginated_expenses(1, 2, usize::MAX).await.unwrap();
        assert!(huge.is_empty());
    }

    #[tokio::test]
    async fn test_period_report_filters_by_date_range() {
        let store = SqliteStore::open_in_memory().unwrap();

        store
            .add_expense(1, new_expense("🍔 Food", 1.0, "2024-01-15"))
            .await
            .unwrap();
        store
            .add_expense(1, new_expense("🍔 Food", 2.0, "2024-02-10"))
            .await
            .unwrap();
        store
            .add_expense(1, new_expense("🍔 Food", 3.0, "2024-03-05"))
            .await
            .unwrap();

        // Open-ended range.
        let from_feb = store
            .period_report(1, "2024-02-01".parse().unwrap(), None)
            .await
            .unwrap();
        assert_eq!(from_feb.len(), 2);

        // Bounded range, inclusive on both ends.
        let feb_only = store
            .period_report(
                1,
                "2024-02-10".parse().unwrap(),
                Some("2024-02-10".parse().unwrap()),
            )
            .await
            .unwrap();
        assert_eq!(feb_only.len(), 1);
        assert_eq!(feb_only[0].amount, 2.0);

        // Other owners see nothing.
        let other = store
            .period_report(2, "2024-01-01".parse().unwrap(), None)
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_open_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.db");
        let path = path.to_str().unwrap();

        {
            let store = SqliteStore::open(path).unwrap();
            store
                .add_expense(1, new_expense("🍔 Food", 100.0, "2024-01-01"))
                .await
                .unwrap();
        }

        let reopened = SqliteStore::open(path).unwrap();
        assert_eq!(reopened.expenses_count(1).await.unwrap(), 1);
    }
}
