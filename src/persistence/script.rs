use std::io::Write;

use crate::error::{ImportError, ImportResult};
use crate::registry::SheetConfig;
use crate::types::Value;

use super::schema::{create_table_sql, insert_sql};
use super::Store;

/// [`Store`] that writes SQL statements to `W` instead of executing them.
///
/// The rows of one [`Store::append`] call are wrapped in a single transaction. When a write
/// fails part-way, a `ROLLBACK` is attempted before the error is returned.
#[derive(Debug)]
pub struct SqlScriptStore<W: Write> {
    out: W,
}

impl<W: Write> SqlScriptStore<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, table: &str, line: &str) -> ImportResult<()> {
        writeln!(self.out, "{line};").map_err(|e| ImportError::Persistence {
            table: table.to_string(),
            message: e.to_string(),
        })
    }
}

impl<W: Write> Store for SqlScriptStore<W> {
    fn ensure_table(&mut self, sheet: &SheetConfig) -> ImportResult<()> {
        self.write_line(sheet.table_name, &create_table_sql(sheet))
    }

    fn append(&mut self, sheet: &SheetConfig, rows: &[Vec<Value>]) -> ImportResult<usize> {
        self.write_line(sheet.table_name, "BEGIN")?;
        let body = rows
            .iter()
            .try_for_each(|row| self.write_line(sheet.table_name, &insert_sql(sheet, row)))
            .and_then(|()| self.write_line(sheet.table_name, "COMMIT"));
        if let Err(e) = body {
            // Best effort: the first write error is returned.
            let _ = self.write_line(sheet.table_name, "ROLLBACK");
            return Err(e);
        }
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::SqlScriptStore;
    use crate::persistence::Store;
    use crate::registry::get_config;
    use crate::types::Value;

    /// Accepts everything except `INSERT` statements.
    struct RejectInserts(Vec<u8>);

    impl Write for RejectInserts {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.windows(6).any(|w| w == b"INSERT") {
                return Err(io::Error::other("disk full"));
            }
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn script_contains_ddl_and_wrapped_inserts() {
        let sheet = &get_config("Risk").unwrap().sheets[0];
        let mut store = SqlScriptStore::new(Vec::new());
        store.ensure_table(sheet).unwrap();
        let n = store
            .append(sheet, &[vec![Value::Null, Value::from("fx"), Value::Float64(0.5)]])
            .unwrap();
        assert_eq!(n, 1);

        let script = String::from_utf8(store.into_inner()).unwrap();
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(
            lines,
            vec![
                "CREATE TABLE IF NOT EXISTS risk (id INTEGER PRIMARY KEY AUTOINCREMENT, date DATE, risk_factor STRING, exposure FLOAT);",
                "BEGIN;",
                "INSERT INTO risk (date, risk_factor, exposure) VALUES (NULL, 'fx', 0.5);",
                "COMMIT;",
            ]
        );
    }

    #[test]
    fn failed_insert_rolls_back_the_open_transaction() {
        let sheet = &get_config("Risk").unwrap().sheets[0];
        let mut store = SqlScriptStore::new(RejectInserts(Vec::new()));
        let err = store
            .append(sheet, &[vec![Value::Null, Value::from("fx"), Value::Float64(0.5)]])
            .unwrap_err();
        assert!(err.to_string().contains("disk full"));

        let script = String::from_utf8(store.into_inner().0).unwrap();
        assert_eq!(script.lines().collect::<Vec<_>>(), vec!["BEGIN;", "ROLLBACK;"]);
    }
}
