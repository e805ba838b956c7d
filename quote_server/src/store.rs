//! SQLite-backed storage handle.
//!
//! The connection is opened once at startup and shared by every request. The
//! schema is created at open time with `CREATE TABLE IF NOT EXISTS`, so opening
//! an existing database is harmless. Rows are append-only: this module only
//! ever inserts.
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use quote_common::{Quote, QuoteError, Result};
use rusqlite::{Connection, ErrorCode, TransactionBehavior, params};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS cotacao (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT,
    codein TEXT,
    name TEXT,
    high TEXT,
    low TEXT,
    varBid TEXT,
    pctChange TEXT,
    bid TEXT,
    ask TEXT,
    timestamp TEXT,
    create_date TEXT
)";

const INSERT_QUOTE: &str = "INSERT INTO cotacao
    (code, codein, name, high, low, varBid, pctChange, bid, ask, timestamp, create_date)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

/// Outcome of a deadline-bounded insert that did not write a row.
#[derive(Debug)]
pub enum InsertError {
    /// The deadline passed before the row was committed.
    Expired,
    /// The engine rejected the statement.
    Failed(QuoteError),
}

/// Shared handle to the quote database.
#[derive(Clone)]
pub struct QuoteStore {
    conn: Arc<Mutex<Connection>>,
}

impl QuoteStore {
    /// Opens (or creates) the database file at `path` and ensures the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(QuoteError::storage)?;
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database with the schema in place.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(QuoteError::storage)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Creates the `cotacao` table if it is absent. Idempotent.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn.lock()?;
        conn.execute(CREATE_TABLE, [])
            .map_err(QuoteError::storage)?;
        Ok(())
    }

    /// Number of stored quotes.
    pub fn count(&self) -> Result<u64> {
        let conn = self.conn.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM cotacao", [], |row| row.get(0))
            .map_err(QuoteError::storage)?;
        Ok(count as u64)
    }

    /// Most recently inserted quote, if any.
    pub fn latest(&self) -> Result<Option<Quote>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT code, codein, name, high, low, varBid, pctChange, bid, ask, timestamp, create_date
                 FROM cotacao ORDER BY id DESC LIMIT 1",
            )
            .map_err(QuoteError::storage)?;
        let mut rows = stmt
            .query_map([], |row| {
                Ok(Quote {
                    code: row.get(0)?,
                    counter_code: row.get(1)?,
                    name: row.get(2)?,
                    high: row.get(3)?,
                    low: row.get(4)?,
                    variation_bid: row.get(5)?,
                    percent_change: row.get(6)?,
                    bid: row.get(7)?,
                    ask: row.get(8)?,
                    timestamp: row.get(9)?,
                    create_date: row.get(10)?,
                })
            })
            .map_err(QuoteError::storage)?;
        let latest = rows.next().transpose().map_err(QuoteError::storage)?;
        Ok(latest)
    }

    /// Inserts `quote` unless `deadline` passes first.
    ///
    /// Blocks the calling thread. The insert runs in its own transaction; the
    /// deadline is checked once the connection is acquired and again before
    /// `COMMIT`, and a late insert is rolled back. `Ok` means the row is
    /// committed, `Expired` means nothing was written.
    pub fn insert_before(&self, quote: &Quote, deadline: Instant) -> Result<(), InsertError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| InsertError::Failed(e.into()))?;

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(InsertError::Expired);
        }
        conn.busy_timeout(remaining.max(Duration::from_millis(1)))
            .map_err(|e| InsertError::Failed(QuoteError::storage(e)))?;

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| classify(e, deadline))?;
        tx.execute(
            INSERT_QUOTE,
            params![
                quote.code,
                quote.counter_code,
                quote.name,
                quote.high,
                quote.low,
                quote.variation_bid,
                quote.percent_change,
                quote.bid,
                quote.ask,
                quote.timestamp,
                quote.create_date,
            ],
        )
        .map_err(|e| classify(e, deadline))?;

        if Instant::now() >= deadline {
            tx.rollback()
                .map_err(|e| InsertError::Failed(QuoteError::storage(e)))?;
            return Err(InsertError::Expired);
        }
        tx.commit().map_err(|e| classify(e, deadline))
    }

    #[cfg(test)]
    pub(crate) fn hold_for_test(&self, hold: Duration) {
        let _conn = self.conn.lock().unwrap();
        std::thread::sleep(hold);
    }
}

/// Busy or interrupted statements past the deadline count as expiry.
fn classify(err: rusqlite::Error, deadline: Instant) -> InsertError {
    match err.sqlite_error_code() {
        Some(ErrorCode::OperationInterrupted) => InsertError::Expired,
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) if Instant::now() >= deadline => {
            InsertError::Expired
        }
        _ => InsertError::Failed(QuoteError::storage(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_quote() -> Quote {
        Quote {
            code: "USD".into(),
            counter_code: "BRL".into(),
            name: "Dólar Americano/Real Brasileiro".into(),
            high: "5.4712".into(),
            low: "5.4123".into(),
            variation_bid: "0.0121".into(),
            percent_change: "0.22".into(),
            bid: "5.4301".into(),
            ask: "5.4311".into(),
            timestamp: "1729260000".into(),
            create_date: "2024-10-18 11:00:00".into(),
        }
    }

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    #[test]
    fn schema_creation_is_idempotent() {
        let store = QuoteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();

        let conn = store.conn.lock().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'cotacao'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn reopening_a_file_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cotacao.db");

        let store = QuoteStore::open(&path).unwrap();
        store.insert_before(&sample_quote(), far_deadline()).unwrap();
        drop(store);

        let store = QuoteStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn insert_stores_all_fields() {
        let store = QuoteStore::open_in_memory().unwrap();
        let quote = sample_quote();
        store.insert_before(&quote, far_deadline()).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.latest().unwrap(), Some(quote));
    }

    #[test]
    fn rows_are_appended() {
        let store = QuoteStore::open_in_memory().unwrap();
        let mut quote = sample_quote();
        store.insert_before(&quote, far_deadline()).unwrap();
        quote.bid = "5.5000".into();
        store.insert_before(&quote, far_deadline()).unwrap();

        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.latest().unwrap().unwrap().bid, "5.5000");
    }

    #[test]
    fn values_are_bound_not_interpolated() {
        let store = QuoteStore::open_in_memory().unwrap();
        let mut quote = sample_quote();
        quote.name = "x'); DROP TABLE cotacao; --".into();
        store.insert_before(&quote, far_deadline()).unwrap();

        assert_eq!(store.latest().unwrap().unwrap().name, quote.name);
    }

    #[test]
    fn expired_deadline_writes_nothing() {
        let store = QuoteStore::open_in_memory().unwrap();
        let result = store.insert_before(&sample_quote(), Instant::now());

        assert!(matches!(result, Err(InsertError::Expired)));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn latest_on_empty_table() {
        let store = QuoteStore::open_in_memory().unwrap();
        assert_eq!(store.latest().unwrap(), None);
    }
}
