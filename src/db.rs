use crate::errors::{AppError, AppResult};
use crate::models::{OptionPrices, PricingInputs};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub type DbPool = Arc<Mutex<Connection>>;

/// Default page size for `list_recent`.
pub const RECENT_LIMIT: usize = 100;

/// SQLite's text form for the `timestamp` column, kept in JSON output.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const SELECT_COLUMNS: &str = "id, stock_price, strike_price, time_to_maturity, risk_free_rate, dividend_yield, volatility, call_option_price, put_option_price, timestamp";

/// Append-only log of priced calculations.
///
/// One connection, shared behind a mutex. Every operation takes the lock for
/// exactly its own scope, so the guard is released on success and on error.
/// SQLite's `busy_timeout` bounds waits on the file lock.
#[derive(Clone)]
pub struct Store {
    db: DbPool,
}

impl Store {
    pub fn open(db_path: &Path, busy_timeout: Duration) -> AppResult<Self> {
        if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| AppError::Storage(format!("create dir {}: {e}", dir.display())))?;
        }
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(busy_timeout)?;
        let mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous=NORMAL;")?;

        let store = Self::migrate(conn)?;
        tracing::info!(journal_mode = %mode, "database initialized at {}", db_path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::migrate(Connection::open_in_memory()?)
    }

    fn migrate(conn: Connection) -> AppResult<Self> {
        let schema = include_str!("../migrations/001_init.sql");
        conn.execute_batch(schema)?;
        Ok(Self { db: Arc::new(Mutex::new(conn)) })
    }

    fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|e| AppError::Storage(format!("lock poisoned: {e}")))
    }

    /// Insert one calculation and return it with the store-assigned id and
    /// timestamp. A single statement, so the row is either fully visible or
    /// absent.
    pub fn create(&self, inputs: &PricingInputs, prices: &OptionPrices) -> AppResult<Calculation> {
        let conn = self.conn()?;
        let (id, timestamp) = conn.query_row(
            "INSERT INTO calculations (stock_price, strike_price, time_to_maturity, risk_free_rate, dividend_yield, volatility, call_option_price, put_option_price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING id, timestamp",
            rusqlite::params![
                inputs.stock_price,
                inputs.strike_price,
                inputs.time_to_maturity,
                inputs.risk_free_rate,
                inputs.dividend_yield,
                inputs.volatility,
                prices.call,
                prices.put,
            ],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, NaiveDateTime>(1)?)),
        )?;

        Ok(Calculation {
            id,
            stock_price: inputs.stock_price,
            strike_price: inputs.strike_price,
            time_to_maturity: inputs.time_to_maturity,
            risk_free_rate: inputs.risk_free_rate,
            dividend_yield: inputs.dividend_yield,
            volatility: inputs.volatility,
            call_option_price: prices.call,
            put_option_price: prices.put,
            timestamp,
        })
    }

    /// Newest first by timestamp, ties broken by id. Empty store yields an
    /// empty vec.
    pub fn list_recent(&self, limit: usize) -> AppResult<Vec<Calculation>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM calculations ORDER BY timestamp DESC, id DESC LIMIT ?1"
        ))?;
        let rows = stmt.query_map(rusqlite::params![limit as i64], Calculation::from_row)?;
        let calcs = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(calcs)
    }

    /// `Ok(None)` when no row has this id.
    pub fn get(&self, id: i64) -> AppResult<Option<Calculation>> {
        let conn = self.conn()?;
        let calc = conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM calculations WHERE id = ?1"),
                rusqlite::params![id],
                Calculation::from_row,
            )
            .optional()?;
        Ok(calc)
    }

    /// Flush the WAL back into the main file. The connection itself closes
    /// when the last handle is dropped.
    pub fn close(&self) -> AppResult<()> {
        let conn = self.conn()?;
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        tracing::info!("database checkpointed");
        Ok(())
    }
}

// ── Row types ──

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Calculation {
    pub id: i64,
    pub stock_price: f64,
    pub strike_price: f64,
    pub time_to_maturity: f64,
    pub risk_free_rate: f64,
    pub dividend_yield: f64,
    pub volatility: f64,
    pub call_option_price: f64,
    pub put_option_price: f64,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
}

fn serialize_timestamp<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

impl Calculation {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            stock_price: row.get(1)?,
            strike_price: row.get(2)?,
            time_to_maturity: row.get(3)?,
            risk_free_rate: row.get(4)?,
            dividend_yield: row.get(5)?,
            volatility: row.get(6)?,
            call_option_price: row.get(7)?,
            put_option_price: row.get(8)?,
            timestamp: row.get(9)?,
        })
    }
}
