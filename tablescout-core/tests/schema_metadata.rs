use serde_json::json;
use tablescout_core::TableMetadata;

fn orders() -> TableMetadata {
    serde_json::from_value(json!({
        "name": "orders",
        "columns": [
            {"name": "id", "type": "int4"},
            {"name": "customer_id", "type": "int4"},
            {"name": "created_at", "type": "date"}
        ],
        "foreign_keys": [
            {"target_table": "customers", "fk_column": "customer_id", "pk_column": "id"}
        ]
    }))
    .expect("table metadata")
}

#[test]
fn minimal_ddl_is_single_line() {
    assert_eq!(
        orders().ddl_minimal(),
        "TABLE orders (id int4, customer_id int4, created_at date)"
    );
}

#[test]
fn raw_ddl_is_create_table_statement() {
    assert_eq!(
        orders().ddl_raw(),
        "CREATE TABLE orders (\n  id int4,\n  customer_id int4,\n  created_at date\n);"
    );
}

#[test]
fn description_lists_column_names() {
    assert_eq!(
        orders().description(),
        "Table orders with columns: id, customer_id, created_at"
    );
}

#[test]
fn join_condition_uses_both_sides_of_the_key() {
    let table = orders();
    let fk = &table.foreign_keys[0];
    assert_eq!(table.join_condition(fk), "orders.customer_id = customers.id");
}

#[test]
fn missing_columns_and_keys_default_to_empty() {
    let table: TableMetadata =
        serde_json::from_value(json!({"name": "audit"})).expect("table metadata");
    assert!(table.columns.is_empty());
    assert_eq!(table.ddl_minimal(), "TABLE audit ()");
}
