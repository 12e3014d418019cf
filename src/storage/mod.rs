use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{info, warn};

use crate::models::{Expense, NewExpense};
use crate::shared::AppResult;

pub mod postgres;
pub mod sqlite;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

/// Owner-scoped expense persistence.
///
/// Every operation takes the owner (chat) id and never returns or touches
/// another owner's records; the owner id is the sole authorization boundary.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Persists a new expense and returns the stored record.
    async fn add_expense(&self, owner: i64, new: NewExpense) -> AppResult<Expense>;

    /// The most recently *created* expense for the owner, or `None`.
    ///
    /// Ordered by creation, not by expense date. Pagination deliberately
    /// orders differently; see `paginated_expenses`.
    async fn last_expense(&self, owner: i64) -> AppResult<Option<Expense>>;

    /// Deletes at most one record matching both id and owner. Returns the
    /// number of deleted rows (0 or 1).
    async fn delete_expense(&self, id: i64, owner: i64) -> AppResult<u64>;

    /// Number of expenses recorded for the owner.
    async fn expenses_count(&self, owner: i64) -> AppResult<u64>;

    /// A page of the owner's expenses, ordered by date descending and then
    /// creation order descending.
    async fn paginated_expenses(
        &self,
        owner: i64,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<Expense>>;

    /// All expenses with date >= `start` and, when given, date <= `end`.
    /// Same ordering as `paginated_expenses`.
    async fn period_report(
        &self,
        owner: i64,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> AppResult<Vec<Expense>>;

    /// Short name of the backend, for logs.
    fn backend_name(&self) -> &'static str;
}

/// Selects the storage backend, once, at startup.
///
/// The primary backend (PostgreSQL) is attempted first; on any failure the
/// embedded SQLite fallback is opened and used for the rest of the process.
/// There is no re-selection later: a backend outage mid-session surfaces as
/// a storage error from the individual call.
pub async fn connect(
    database_url: Option<&str>,
    sqlite_path: &str,
) -> AppResult<Arc<dyn ExpenseStore>> {
    if let Some(url) = database_url {
        match PostgresStore::connect(url).await {
            Ok(store) => {
                info!("connected to PostgreSQL, using it as the expense store");
                return Ok(Arc::new(store));
            }
            Err(e) => {
                warn!("PostgreSQL connection failed ({e}), falling back to SQLite");
            }
        }
    } else {
        warn!("DATABASE_URL is not set, using the SQLite fallback");
    }

    let store = SqliteStore::open(sqlite_path)?;
    info!("using SQLite database at {sqlite_path}");
    Ok(Arc::new(store))
}
