//! SQLite-backed record store for the tourism-arrivals table.
//!
//! Every SQL identifier comes from the SchemaRegistry; request input only ever
//! reaches the database as a bound parameter.

use crate::domain::model::registry::AVERAGE_COLUMN;
use crate::domain::model::{
    ColumnType, FieldChanges, Record, ScalarValue, SchemaRegistry, YearProjection, TOURISM_ARRIVALS,
};
use crate::storage::records::StoreError;
use sqlx::query::Query;
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Row, Transaction};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// How long a connection waits on a locked database file before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident)
}

fn select_columns(schema: &SchemaRegistry) -> String {
    schema
        .column_names()
        .map(quote)
        .collect::<Vec<_>>()
        .join(", ")
}

fn bind_scalar<'q>(query: SqliteQuery<'q>, value: &ScalarValue) -> SqliteQuery<'q> {
    match value {
        ScalarValue::Null => query.bind(None::<String>),
        ScalarValue::Text(s) => query.bind(s.clone()),
        ScalarValue::Int(n) => query.bind(*n),
    }
}

fn read_scalar(row: &SqliteRow, column: &str, col_type: ColumnType) -> Result<ScalarValue, sqlx::Error> {
    let value = match col_type {
        ColumnType::Text => row
            .try_get::<Option<String>, _>(column)?
            .map(ScalarValue::Text),
        ColumnType::Int => row.try_get::<Option<i64>, _>(column)?.map(ScalarValue::Int),
    };
    Ok(value.unwrap_or_default())
}

fn record_from_row(schema: &'static SchemaRegistry, row: &SqliteRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::empty(schema);
    for column in schema.columns() {
        let value = read_scalar(row, column.name, column.col_type)?;
        record.set(column.name, value);
    }
    Ok(record)
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateKey,
        other => StoreError::Sqlx(other),
    }
}

/// Read access plus transaction factory over a SQLite pool.
///
/// Write transactions are handed out one at a time: a deferred SQLite
/// transaction that reads before it writes gets `SQLITE_BUSY` rather than
/// waiting for the write lock.
#[derive(Clone)]
pub struct RecordStore {
    pool: SqlitePool,
    schema: &'static SchemaRegistry,
    writer: Arc<Mutex<()>>,
}

impl RecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            schema: &TOURISM_ARRIVALS,
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Opens a pool for `database_url`, creating the database file if needed.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// A private in-memory database. One connection that never expires, so the
    /// data lives as long as the pool.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn schema(&self) -> &'static SchemaRegistry {
        self.schema
    }

    /// Creates the dataset table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(&self.schema.create_table_sql())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Registry columns the live table lacks, or `None` if the table is absent.
    pub async fn missing_columns(&self) -> Result<Option<Vec<&'static str>>, StoreError> {
        let rows = sqlx::query("SELECT name FROM pragma_table_info(?)")
            .bind(self.schema.table_name())
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Ok(None);
        }
        let mut present = Vec::with_capacity(rows.len());
        for row in rows {
            present.push(row.try_get::<String, _>("name")?);
        }
        Ok(Some(
            self.schema
                .column_names()
                .filter(|name| !present.iter().any(|p| p == name))
                .collect(),
        ))
    }

    pub async fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            select_columns(self.schema),
            self.schema.table_name(),
            quote(self.schema.primary_key_field())
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(record_from_row(self.schema, row)?);
        }
        Ok(records)
    }

    pub async fn fetch_by_key(&self, name: &str) -> Result<Option<Record>, StoreError> {
        let sql = select_by_key_sql(self.schema);
        let row = sqlx::query(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row
            .map(|r| record_from_row(self.schema, &r))
            .transpose()?)
    }

    /// `(Country_Name, year_<year>)` for every record. `year` is the raw path segment.
    pub async fn fetch_year_projection(&self, year: &str) -> Result<YearProjection, StoreError> {
        let column = self
            .schema
            .year_column(year)
            .ok_or_else(|| StoreError::InvalidYear(year.to_string()))?;
        let pk = self.schema.primary_key_field();
        let sql = format!(
            "SELECT {pk}, {col} FROM {table} ORDER BY {pk}",
            pk = quote(pk),
            col = quote(column.name),
            table = self.schema.table_name()
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let mut projected = Vec::with_capacity(rows.len());
        for row in &rows {
            let name: String = row.try_get(pk)?;
            projected.push((name, read_scalar(row, column.name, column.col_type)?));
        }
        Ok(YearProjection {
            column: column.name,
            rows: projected,
        })
    }

    /// Records ranked by the stored 10-year average, highest first.
    ///
    /// The average is stored as text and compared numerically. Rows without an
    /// average sort last; equal averages fall back to the primary key.
    pub async fn top_n_by_average(&self, n: u32) -> Result<Vec<Record>, StoreError> {
        let avg = quote(AVERAGE_COLUMN);
        let sql = format!(
            "SELECT {cols} FROM {table} ORDER BY ({avg} IS NULL), CAST({avg} AS REAL) DESC, {pk} ASC LIMIT ?",
            cols = select_columns(self.schema),
            table = self.schema.table_name(),
            avg = avg,
            pk = quote(self.schema.primary_key_field())
        );
        let rows = sqlx::query(&sql)
            .bind(i64::from(n))
            .fetch_all(&self.pool)
            .await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(record_from_row(self.schema, row)?);
        }
        Ok(records)
    }

    /// Starts the transaction a single write request runs in. Waits while
    /// another write transaction of this store is open.
    pub async fn begin(&self) -> Result<RecordTx, StoreError> {
        let writer = Arc::clone(&self.writer).lock_owned().await;
        Ok(RecordTx {
            tx: self.pool.begin().await?,
            _writer: writer,
            schema: self.schema,
        })
    }
}

fn select_by_key_sql(schema: &SchemaRegistry) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = ?",
        select_columns(schema),
        schema.table_name(),
        quote(schema.primary_key_field())
    )
}

/// One write request's transaction. Dropping it without `commit` rolls back.
///
/// `tx` is declared before `_writer` so the rollback is issued before the next
/// writer is let in.
pub struct RecordTx {
    tx: Transaction<'static, Sqlite>,
    _writer: OwnedMutexGuard<()>,
    schema: &'static SchemaRegistry,
}

impl RecordTx {
    pub async fn fetch_by_key(&mut self, name: &str) -> Result<Option<Record>, StoreError> {
        let sql = select_by_key_sql(self.schema);
        let row = sqlx::query(&sql)
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row
            .map(|r| record_from_row(self.schema, &r))
            .transpose()?)
    }

    /// Inserts a new record and returns it as stored.
    pub async fn insert(&mut self, record: &Record) -> Result<Record, StoreError> {
        if self.fetch_by_key(record.key()).await?.is_some() {
            return Err(StoreError::DuplicateKey);
        }

        let columns = self.schema.columns();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.schema.table_name(),
            select_columns(self.schema),
            vec!["?"; columns.len()].join(", ")
        );
        let mut query = sqlx::query(&sql);
        for (_, value) in record.fields() {
            query = bind_scalar(query, value);
        }
        query
            .execute(&mut *self.tx)
            .await
            .map_err(map_insert_error)?;

        self.fetch_by_key(record.key())
            .await?
            .ok_or_else(|| StoreError::NotFound(record.key().to_string()))
    }

    /// Writes only the changed columns of `record` and returns the row as stored.
    pub async fn apply_update(
        &mut self,
        record: &Record,
        changes: &FieldChanges,
    ) -> Result<Record, StoreError> {
        let pk = self.schema.primary_key_field();
        let assignments: Vec<String> = changes
            .iter()
            .filter(|c| c.column.name != pk)
            .map(|c| format!("{} = ?", quote(c.column.name)))
            .collect();

        if !assignments.is_empty() {
            let sql = format!(
                "UPDATE {} SET {} WHERE {} = ?",
                self.schema.table_name(),
                assignments.join(", "),
                quote(pk)
            );
            let mut query = sqlx::query(&sql);
            for change in changes.iter().filter(|c| c.column.name != pk) {
                query = bind_scalar(query, &change.value);
            }
            let result = query.bind(record.key().to_string()).execute(&mut *self.tx).await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(record.key().to_string()));
            }
        }

        self.fetch_by_key(record.key())
            .await?
            .ok_or_else(|| StoreError::NotFound(record.key().to_string()))
    }

    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
