use tablescout_core::{ExecutionError, SqlExecutor, Value};

use crate::guard::is_plain_identifier;

pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

/// Fetches up to `limit` values of one column, in whatever order the database returns them.
///
/// Both identifiers must be plain SQL identifiers; they are interpolated, not bound.
pub async fn column_samples<E>(
    executor: &E,
    table_name: &str,
    column_name: &str,
    limit: usize,
) -> Result<Vec<Value>, ExecutionError>
where
    E: SqlExecutor + ?Sized,
{
    for identifier in [table_name, column_name] {
        if !is_plain_identifier(identifier) {
            return Err(ExecutionError::Rejected(format!(
                "'{identifier}' is not a plain SQL identifier"
            )));
        }
    }
    if column_name.contains('.') {
        return Err(ExecutionError::Rejected(format!(
            "column '{column_name}' must not be qualified"
        )));
    }

    let sql = format!("SELECT {column_name} FROM {table_name} LIMIT {limit}");
    let rows = executor.execute(&sql).await?;
    Ok(rows
        .into_iter()
        .map(|mut row| {
            // Postgres folds unquoted identifiers to lower case.
            row.remove(column_name)
                .or_else(|| row.remove(&column_name.to_ascii_lowercase()))
                .unwrap_or(Value::Null)
        })
        .collect())
}
