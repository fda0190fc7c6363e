//! SQLite engine binding over `rusqlite`

use std::path::Path;
use std::sync::Mutex;

use rusqlite::types::Value;
use rusqlite::{Connection, InterruptHandle, OpenFlags};

use crate::cancel::CancelFlag;
use crate::value::{ResultSet, Row, Scalar};

use super::engine::QueryEngine;
use super::errors::EngineFault;

/// Virtual machine instructions between cancellation polls
const PROGRESS_OPS: i32 = 1000;

/// One SQLite connection used as a grading handle
///
/// The connection sits behind a mutex so the engine can be shared with a
/// deadline worker. The interrupt handle is kept outside the mutex: it must
/// stay usable while a worker holds the lock.
pub struct SqliteEngine {
    conn: Mutex<Connection>,
    interrupt: InterruptHandle,
}

impl SqliteEngine {
    /// Opens an existing database file read-only
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self, EngineFault> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_URI;
        let conn = Connection::open_with_flags(path, flags).map_err(fault)?;
        Ok(Self::from_connection(conn))
    }

    /// Opens a private in-memory database, writable through [`Self::setup`]
    pub fn open_in_memory() -> Result<Self, EngineFault> {
        let conn = Connection::open_in_memory().map_err(fault)?;
        Ok(Self::from_connection(conn))
    }

    /// Wraps an already-open connection
    pub fn from_connection(conn: Connection) -> Self {
        let interrupt = conn.get_interrupt_handle();
        Self {
            conn: Mutex::new(conn),
            interrupt,
        }
    }

    /// Runs a batch of statements, typically fixture DDL and inserts
    pub fn setup(&self, sql: &str) -> Result<(), EngineFault> {
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(fault)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, EngineFault> {
        self.conn
            .lock()
            .map_err(|_| EngineFault::new("connection lock poisoned"))
    }
}

impl QueryEngine for SqliteEngine {
    fn execute(&self, query: &str) -> Result<ResultSet, EngineFault> {
        let conn = self.lock()?;
        fetch_all(&conn, query)
    }

    /// Polls `cancel` from SQLite's progress handler while the statement runs.
    ///
    /// The flag is checked after the connection lock is taken, so a query
    /// queued behind a cancelled one never starts.
    fn execute_cancellable(
        &self,
        query: &str,
        cancel: &CancelFlag,
    ) -> Result<ResultSet, EngineFault> {
        let conn = self.lock()?;
        if cancel.is_cancelled() {
            return Err(EngineFault::new("interrupted"));
        }

        let watched = cancel.clone();
        conn.progress_handler(PROGRESS_OPS, Some(move || watched.is_cancelled()));
        let result = fetch_all(&conn, query);
        conn.progress_handler(0, None::<fn() -> bool>);
        result
    }

    fn interrupt(&self) {
        self.interrupt.interrupt();
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

fn fetch_all(conn: &Connection, query: &str) -> Result<ResultSet, EngineFault> {
    let mut stmt = conn.prepare(query).map_err(fault)?;
    let width = stmt.column_count();

    let rows = stmt
        .query_map([], |row| {
            let mut values: Row = Vec::with_capacity(width);
            for i in 0..width {
                let value: Value = row.get(i)?;
                values.push(to_scalar(value));
            }
            Ok(values)
        })
        .map_err(fault)?;

    rows.collect::<Result<ResultSet, _>>().map_err(fault)
}

fn to_scalar(value: Value) -> Scalar {
    match value {
        Value::Null => Scalar::Null,
        Value::Integer(v) => Scalar::Integer(v),
        Value::Real(v) => Scalar::Real(v),
        Value::Text(v) => Scalar::Text(v),
        Value::Blob(v) => Scalar::Blob(v),
    }
}

fn fault(err: rusqlite::Error) -> EngineFault {
    EngineFault::new(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::FaultCategory;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    const RUNAWAY: &str =
        "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c) SELECT count(*) FROM c";

    fn fixture() -> SqliteEngine {
        let engine = SqliteEngine::open_in_memory().unwrap();
        engine
            .setup(
                "CREATE TABLE t (a INTEGER, b TEXT, c REAL, d BLOB);
                 INSERT INTO t VALUES (1, 'x', 1.5, x'00ff');
                 INSERT INTO t VALUES (2, NULL, NULL, NULL);",
            )
            .unwrap();
        engine
    }

    #[test]
    fn test_fetch_all_types() {
        let engine = fixture();
        let rows = engine.execute("SELECT a, b, c, d FROM t ORDER BY a").unwrap();
        assert_eq!(
            rows,
            vec![
                vec![
                    Scalar::Integer(1),
                    Scalar::Text("x".into()),
                    Scalar::Real(1.5),
                    Scalar::Blob(vec![0x00, 0xff]),
                ],
                vec![Scalar::Integer(2), Scalar::Null, Scalar::Null, Scalar::Null],
            ]
        );
    }

    #[test]
    fn test_empty_result() {
        let engine = fixture();
        let rows = engine.execute("SELECT a FROM t WHERE a > 100").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_faults_are_classified() {
        let engine = fixture();

        let err = engine.execute("SELEC a FROM t").unwrap_err();
        assert_eq!(err.category(), FaultCategory::SyntaxError);

        let err = engine.execute("SELECT a FROM missing").unwrap_err();
        assert_eq!(err.category(), FaultCategory::NoSuchTable);

        let err = engine.execute("SELECT zzz FROM t").unwrap_err();
        assert_eq!(err.category(), FaultCategory::NoSuchColumn);

        let err = engine.execute("SELECT nosuchfn(a) FROM t").unwrap_err();
        assert_eq!(err.category(), FaultCategory::NoSuchFunction);
    }

    #[test]
    fn test_cancelled_before_start() {
        let engine = fixture();
        let cancel = CancelFlag::new();
        cancel.cancel();

        let err = engine.execute_cancellable(RUNAWAY, &cancel).unwrap_err();
        assert_eq!(err.message(), "interrupted");
    }

    #[test]
    fn test_cancel_stops_running_statement() {
        let engine = Arc::new(fixture());
        let cancel = CancelFlag::new();

        let trigger = cancel.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            trigger.cancel();
        });

        let start = Instant::now();
        let err = engine.execute_cancellable(RUNAWAY, &cancel).unwrap_err();
        canceller.join().unwrap();

        assert!(err.message().contains("interrupted"), "{}", err.message());
        assert!(start.elapsed() < Duration::from_secs(3));

        // The progress handler is removed with the statement
        let rows = engine
            .execute_cancellable("SELECT count(*) FROM t", &CancelFlag::new())
            .unwrap();
        assert_eq!(rows, vec![vec![Scalar::Integer(2)]]);
    }
}
