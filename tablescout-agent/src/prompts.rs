use crate::TableRef;

pub const PLAN_SYSTEM_PROMPT: &str = "You are a database expert. Extract the key terms from the user query to search for relevant database tables. Return just the terms as a comma-separated list.";

pub const GENERATE_SYSTEM_PROMPT: &str = "You are a strict SQL generator. Return only SQL.";

/// `Table: <name>\nDDL:\n<ddl>\n` per table, joined by newlines.
pub fn schema_context(tables: &[TableRef]) -> String {
    tables
        .iter()
        .map(|table| format!("Table: {}\nDDL:\n{}\n", table.name, table.ddl_minimal))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn generation_prompt(dialect: &str, context: &str, query: &str) -> String {
    format!(
        "You are a {dialect} expert. Write a SQL query to answer the user's request.\n\
         \n\
         Schema Context:\n\
         {context}\n\
         \n\
         User Request: {query}\n\
         \n\
         Rules:\n\
         1. Return ONLY the valid SQL query. Do not include markdown formatting (```sql ... ```).\n\
         2. Use correct {dialect} syntax.\n\
         3. Do not invent columns that are not in the schema.\n"
    )
}

/// Removes a markdown code fence the model adds despite being told not to.
///
/// The opening fence line is dropped whole, whatever its info string
/// (`sql`, `postgresql`, `sqlite`, none).
pub fn strip_code_fences(text: &str) -> String {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.split_once('\n') {
            Some((_, after_fence_line)) => after_fence_line,
            None => rest,
        };
    }
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_sql_fence() {
        assert_eq!(strip_code_fences("```sql\nSELECT 1\n```"), "SELECT 1");
        assert_eq!(strip_code_fences("  SELECT 2  "), "SELECT 2");
        assert_eq!(strip_code_fences("```\nSELECT 3;\n```\n"), "SELECT 3;");
    }

    #[test]
    fn strips_fence_line_with_any_info_string() {
        assert_eq!(strip_code_fences("```postgresql\nSELECT 1\n```"), "SELECT 1");
        assert_eq!(strip_code_fences("```sqlite\nSELECT 1\n```"), "SELECT 1");
        assert_eq!(strip_code_fences("```SQL  \r\nSELECT 1\r\n```"), "SELECT 1");
        assert_eq!(strip_code_fences("  ```\nSELECT 1\n```  "), "SELECT 1");
    }

    #[test]
    fn keeps_multiline_sql_and_unfenced_text() {
        assert_eq!(
            strip_code_fences("```sql\nSELECT id\nFROM orders\n```"),
            "SELECT id\nFROM orders"
        );
        assert_eq!(strip_code_fences("SELECT '```' AS tick"), "SELECT '```' AS tick");
        assert_eq!(strip_code_fences("```"), "");
    }

    #[test]
    fn context_joins_tables() {
        let tables = vec![
            TableRef {
                name: "orders".to_string(),
                ddl_minimal: "TABLE orders (id int4)".to_string(),
            },
            TableRef {
                name: "customers".to_string(),
                ddl_minimal: "TABLE customers (id int4)".to_string(),
            },
        ];
        assert_eq!(
            schema_context(&tables),
            "Table: orders\nDDL:\nTABLE orders (id int4)\n\nTable: customers\nDDL:\nTABLE customers (id int4)\n"
        );
        assert_eq!(schema_context(&[]), "");
    }

    #[test]
    fn prompt_mentions_dialect_context_and_request() {
        let prompt = generation_prompt("SQLite", "Table: t\nDDL:\nTABLE t (a int)\n", "count t");
        assert!(prompt.starts_with("You are a SQLite expert."));
        assert!(prompt.contains("Schema Context:\nTable: t\n"));
        assert!(prompt.contains("User Request: count t"));
        assert!(prompt.contains("2. Use correct SQLite syntax."));
    }
}
