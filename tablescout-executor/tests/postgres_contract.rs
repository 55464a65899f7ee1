use tablescout_core::{ExecutionError, SchemaSource, SqlExecutor};
use tablescout_executor::PostgresSqlExecutor;

fn postgres_contract_enabled() -> bool {
    std::env::var("RUN_POSTGRES_CONTRACT").ok().as_deref() == Some("1")
}

fn postgres_database_url() -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .expect("set DATABASE_URL to run postgres contract tests")
}

#[test]
fn builder_accepts_pool_configuration() {
    let _builder = PostgresSqlExecutor::builder("postgres://localhost/example")
        .max_connections(5)
        .min_connections(1)
        .schema("analytics")
        .read_only(false);
}

#[tokio::test]
async fn contract_select_returns_json_rows() {
    if !postgres_contract_enabled() {
        return;
    }

    let executor = PostgresSqlExecutor::builder(postgres_database_url())
        .build()
        .await
        .expect("executor should connect");
    let rows = executor
        .execute("SELECT 1 AS one, 'a' AS letter;")
        .await
        .expect("select should succeed");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("one"), Some(&serde_json::json!(1)));
    assert_eq!(rows[0].get("letter"), Some(&serde_json::json!("a")));
}

#[tokio::test]
async fn contract_trailing_line_comments_do_not_break_the_query() {
    if !postgres_contract_enabled() {
        return;
    }

    let executor = PostgresSqlExecutor::builder(postgres_database_url())
        .build()
        .await
        .expect("executor should connect");

    for sql in [
        "SELECT 1 AS one -- the answer",
        "SELECT 1 AS one; -- note",
        "SELECT 1 AS one\n-- first\n-- second",
        "SELECT 1 AS one -- pick one\nWHERE true",
    ] {
        let rows = executor
            .execute(sql)
            .await
            .unwrap_or_else(|err| panic!("{sql:?} should succeed: {err}"));
        assert_eq!(rows.len(), 1, "{sql:?}");
        assert_eq!(rows[0].get("one"), Some(&serde_json::json!(1)), "{sql:?}");
    }
}

#[tokio::test]
async fn contract_read_only_mode_rejects_writes() {
    if !postgres_contract_enabled() {
        return;
    }

    let executor = PostgresSqlExecutor::builder(postgres_database_url())
        .build()
        .await
        .expect("executor should connect");

    let err = executor
        .execute("DELETE FROM pg_catalog.pg_class")
        .await
        .expect_err("write should be rejected");
    assert!(matches!(err, ExecutionError::Rejected(_)));

    let err = executor.execute("  ;  ").await.expect_err("empty sql");
    assert!(matches!(err, ExecutionError::Rejected(_)));
}

#[tokio::test]
async fn contract_database_errors_surface_as_backend() {
    if !postgres_contract_enabled() {
        return;
    }

    let executor = PostgresSqlExecutor::builder(postgres_database_url())
        .build()
        .await
        .expect("executor should connect");
    let err = executor
        .execute("SELECT * FROM table_that_does_not_exist")
        .await
        .expect_err("missing table should fail");
    assert!(matches!(err, ExecutionError::Backend(_)));
}

#[tokio::test]
async fn contract_inspect_schema_lists_base_tables() {
    if !postgres_contract_enabled() {
        return;
    }

    let executor = PostgresSqlExecutor::builder(postgres_database_url())
        .build()
        .await
        .expect("executor should connect");
    let tables = executor
        .inspect_schema()
        .await
        .expect("inspection should succeed");

    let mut names: Vec<_> = tables.iter().map(|table| table.name.clone()).collect();
    let sorted = {
        let mut sorted = names.clone();
        sorted.sort();
        sorted
    };
    assert_eq!(names, sorted);
    names.dedup();
    assert_eq!(names.len(), tables.len());
}
