//! Relational sink backed by an embedded SQLite database

use crate::error::{EtlError, Result};
use crate::table::{DATE_FORMAT, DataType, Table, Value};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, OpenFlags, Transaction, params_from_iter};
use std::path::{Path, PathBuf};

/// Writes a table into a SQLite database, replacing any previous table
pub struct SqliteSink {
    path: PathBuf,
    table_name: String,
    index_columns: Vec<String>,
}

impl SqliteSink {
    pub fn new(path: impl AsRef<Path>, table_name: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            table_name: table_name.into(),
            index_columns: Vec::new(),
        }
    }

    /// Columns to index after insertion; absent columns are skipped
    pub fn with_index_columns(mut self, columns: &[&str]) -> Self {
        self.index_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Write every row of `table`; returns the row count read back from the database
    pub fn write(&self, table: &Table) -> Result<usize> {
        let mut conn = Connection::open(&self.path)?;

        let tx = conn.transaction()?;
        self.create_table(&tx, table)?;
        self.insert_rows(&tx, table)?;
        self.create_indexes(&tx, table)?;
        tx.commit()?;

        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(&self.table_name)),
            [],
            |row| row.get(0),
        )?;
        if count as usize != table.num_rows() {
            return Err(EtlError::SinkWrite {
                format: "SQLite",
                path: self.path.clone(),
                detail: format!("wrote {} rows but found {count}", table.num_rows()),
            });
        }

        conn.close().map_err(|(_, e)| e)?;
        Ok(count as usize)
    }

    fn create_table(&self, tx: &Transaction<'_>, table: &Table) -> Result<()> {
        let name = quote_ident(&self.table_name);
        let columns = table
            .fields()
            .iter()
            .map(|f| format!("{} {}", quote_ident(&f.name), sql_type(f.dtype)))
            .collect::<Vec<_>>()
            .join(", ");

        tx.execute(&format!("DROP TABLE IF EXISTS {name}"), [])?;
        tx.execute(&format!("CREATE TABLE {name} ({columns})"), [])?;
        Ok(())
    }

    fn insert_rows(&self, tx: &Transaction<'_>, table: &Table) -> Result<()> {
        let columns = table
            .fields()
            .iter()
            .map(|f| quote_ident(&f.name))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; table.num_columns()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({columns}) VALUES ({placeholders})",
            quote_ident(&self.table_name)
        );

        let mut stmt = tx.prepare(&sql)?;
        for row in table.rows() {
            stmt.execute(params_from_iter(row.iter().map(to_sql_value)))?;
        }
        Ok(())
    }

    fn create_indexes(&self, tx: &Transaction<'_>, table: &Table) -> Result<()> {
        for column in self.index_columns.iter().filter(|c| table.has_column(c)) {
            let index = quote_ident(&format!("idx_{}_{}", self.table_name, column));
            tx.execute(
                &format!(
                    "CREATE INDEX {index} ON {} ({})",
                    quote_ident(&self.table_name),
                    quote_ident(column)
                ),
                [],
            )?;
        }
        Ok(())
    }
}

/// Run a read-only query against a database written by [`SqliteSink`]
///
/// With no `sql`, selects every row of `table_name`. Column types in the
/// result are inferred from the returned values.
pub fn query_sqlite(db_path: &Path, table_name: &str, sql: Option<&str>) -> Result<Table> {
    if !db_path.exists() {
        return Err(EtlError::NotFound {
            path: db_path.to_path_buf(),
        });
    }

    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let sql = match sql {
        Some(sql) => sql.to_string(),
        None => format!("SELECT * FROM {}", quote_ident(table_name)),
    };

    let mut stmt = conn.prepare(&sql)?;
    let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
    let width = names.len();

    let mut rows = Vec::new();
    let mut cursor = stmt.query([])?;
    while let Some(row) = cursor.next()? {
        let mut values = Vec::with_capacity(width);
        for idx in 0..width {
            values.push(from_sql_ref(row.get_ref(idx)?));
        }
        rows.push(values);
    }

    Table::from_rows_inferred(names, rows)
}

fn sql_type(dtype: DataType) -> &'static str {
    match dtype {
        DataType::Int64 => "INTEGER",
        DataType::Float64 => "REAL",
        DataType::Utf8 | DataType::Date => "TEXT",
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Int(v) => SqlValue::Integer(*v),
        Value::Float(v) => SqlValue::Real(*v),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Date(d) => SqlValue::Text(d.format(DATE_FORMAT).to_string()),
    }
}

fn from_sql_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Int(v),
        ValueRef::Real(v) => Value::Float(v),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Text(format!("<{} byte blob>", bytes.len())),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
