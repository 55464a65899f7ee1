use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use tablescout_core::{TableHit, TableMetadata};
use uuid::Uuid;

use crate::{Vectorizer, WeaviateIndexError};

pub const NAME_PROPERTY: &str = "name";
pub const DESCRIPTION_PROPERTY: &str = "description";
pub const DDL_MINIMAL_PROPERTY: &str = "ddl_minimal";
pub const DDL_RAW_PROPERTY: &str = "ddl_raw";
pub const JOIN_HINTS_PROPERTY: &str = "join_hints";
pub const RELATED_TABLES_PROPERTY: &str = "relatedTables";

#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<JsonValue>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaCreateRequest {
    pub class: String,
    pub vectorizer: String,
    pub properties: Vec<SchemaProperty>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaProperty {
    pub name: String,
    #[serde(rename = "dataType")]
    pub data_type: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenization: Option<String>,
    #[serde(rename = "moduleConfig", skip_serializing_if = "Option::is_none")]
    pub module_config: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeaviateObject {
    pub class: String,
    pub id: String,
    pub properties: JsonMap<String, JsonValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchObjectsRequest {
    pub objects: Vec<WeaviateObject>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BatchReference {
    pub from: String,
    pub to: String,
}

/// Deterministic object id for a table, stable across rebuilds.
pub fn table_uuid(table_name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, table_name.as_bytes())
}

/// Quotes a value as a GraphQL string literal.
pub fn graphql_string(value: &str) -> String {
    JsonValue::String(value.to_string()).to_string()
}

fn name_equals(table_name: &str) -> String {
    format!(
        "{{path:[\"{NAME_PROPERTY}\"],operator:Equal,valueText:{}}}",
        graphql_string(table_name)
    )
}

pub fn build_hybrid_query(
    class_name: &str,
    query: &str,
    limit: usize,
    alpha: Option<f32>,
) -> String {
    let alpha = alpha
        .map(|alpha| format!(",alpha:{alpha}"))
        .unwrap_or_default();
    format!(
        "{{Get{{{class_name}(hybrid:{{query:{}{alpha}}},limit:{limit}){{{NAME_PROPERTY} {DESCRIPTION_PROPERTY} _additional{{id score}}}}}}}}",
        graphql_string(query)
    )
}

/// One query fetching the requested DDL variant for every named table.
pub fn build_ddl_query(class_name: &str, table_names: &[&str], minimal: bool) -> String {
    let where_clause = match table_names {
        [single] => name_equals(single),
        many => format!(
            "{{operator:Or,operands:[{}]}}",
            many.iter()
                .map(|name| name_equals(name))
                .collect::<Vec<_>>()
                .join(",")
        ),
    };
    let property = if minimal {
        DDL_MINIMAL_PROPERTY
    } else {
        DDL_RAW_PROPERTY
    };
    format!(
        "{{Get{{{class_name}(where:{where_clause},limit:{}){{{NAME_PROPERTY} {property}}}}}}}",
        table_names.len()
    )
}

pub fn build_neighbors_query(class_name: &str, table_name: &str) -> String {
    format!(
        "{{Get{{{class_name}(where:{},limit:1){{{NAME_PROPERTY} {JOIN_HINTS_PROPERTY} {RELATED_TABLES_PROPERTY}{{... on {class_name}{{{NAME_PROPERTY}}}}}}}}}}}",
        name_equals(table_name)
    )
}

pub fn class_schema_request(class_name: &str, vectorizer: Vectorizer) -> SchemaCreateRequest {
    let skip_vectorization = match vectorizer {
        Vectorizer::None => None,
        Vectorizer::Text2VecOpenAi => {
            let mut config = JsonMap::new();
            config.insert(
                vectorizer.module_name().to_string(),
                serde_json::json!({"skip": true}),
            );
            Some(JsonValue::Object(config))
        }
    };
    let text = |name: &str| SchemaProperty {
        name: name.to_string(),
        data_type: vec!["text".to_string()],
        tokenization: None,
        module_config: None,
    };

    SchemaCreateRequest {
        class: class_name.to_string(),
        vectorizer: vectorizer.module_name().to_string(),
        properties: vec![
            SchemaProperty {
                tokenization: Some("field".to_string()),
                module_config: skip_vectorization.clone(),
                ..text(NAME_PROPERTY)
            },
            text(DESCRIPTION_PROPERTY),
            text(DDL_MINIMAL_PROPERTY),
            text(DDL_RAW_PROPERTY),
            SchemaProperty {
                module_config: skip_vectorization,
                ..text(JOIN_HINTS_PROPERTY)
            },
            SchemaProperty {
                name: RELATED_TABLES_PROPERTY.to_string(),
                data_type: vec![class_name.to_string()],
                tokenization: None,
                module_config: None,
            },
        ],
    }
}

/// Join conditions keyed by target table, in foreign-key order.
pub fn join_hints(table: &TableMetadata) -> JsonMap<String, JsonValue> {
    let mut hints: JsonMap<String, JsonValue> = JsonMap::new();
    for fk in &table.foreign_keys {
        let condition = JsonValue::String(table.join_condition(fk));
        match hints.get_mut(&fk.target_table) {
            Some(JsonValue::Array(conditions)) => conditions.push(condition),
            _ => {
                hints.insert(fk.target_table.clone(), JsonValue::Array(vec![condition]));
            }
        }
    }
    hints
}

pub fn table_to_object(
    table: &TableMetadata,
    class_name: &str,
) -> Result<WeaviateObject, WeaviateIndexError> {
    if table.name.trim().is_empty() {
        return Err(WeaviateIndexError::InvalidTableName(table.name.clone()));
    }

    let hints = serde_json::to_string(&join_hints(table)).map_err(|err| {
        WeaviateIndexError::InvalidResponse {
            message: format!("failed to serialize join hints: {err}"),
        }
    })?;

    let mut properties = JsonMap::new();
    properties.insert(NAME_PROPERTY.to_string(), JsonValue::String(table.name.clone()));
    properties.insert(
        DESCRIPTION_PROPERTY.to_string(),
        JsonValue::String(table.description()),
    );
    properties.insert(
        DDL_MINIMAL_PROPERTY.to_string(),
        JsonValue::String(table.ddl_minimal()),
    );
    properties.insert(DDL_RAW_PROPERTY.to_string(), JsonValue::String(table.ddl_raw()));
    properties.insert(JOIN_HINTS_PROPERTY.to_string(), JsonValue::String(hints));

    Ok(WeaviateObject {
        class: class_name.to_string(),
        id: table_uuid(&table.name).to_string(),
        properties,
    })
}

pub fn reference_beacon(class_name: &str, table_name: &str) -> String {
    format!("weaviate://localhost/{class_name}/{}", table_uuid(table_name))
}

pub fn reference_source(class_name: &str, table_name: &str) -> String {
    format!(
        "{}/{RELATED_TABLES_PROPERTY}",
        reference_beacon(class_name, table_name)
    )
}

fn class_hits<'a>(
    data: &'a JsonValue,
    class_name: &str,
) -> Result<&'a Vec<JsonValue>, WeaviateIndexError> {
    data.get("Get")
        .and_then(|value| value.get(class_name))
        .and_then(JsonValue::as_array)
        .ok_or_else(|| WeaviateIndexError::InvalidResponse {
            message: format!("missing data.Get.{class_name} array in GraphQL response"),
        })
}

fn hit_name(hit: &JsonValue) -> Result<&str, WeaviateIndexError> {
    hit.get(NAME_PROPERTY)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| WeaviateIndexError::InvalidResponse {
            message: format!("missing '{NAME_PROPERTY}' in GraphQL hit"),
        })
}

/// Hybrid scores come back as strings on current Weaviate releases, numbers on older ones.
fn parse_score(value: Option<&JsonValue>) -> f32 {
    match value {
        Some(JsonValue::Number(number)) => number.as_f64().unwrap_or_default() as f32,
        Some(JsonValue::String(text)) => text.parse::<f32>().unwrap_or_default(),
        _ => 0.0,
    }
}

pub fn graphql_hits_to_table_hits(
    data: &JsonValue,
    class_name: &str,
) -> Result<Vec<TableHit>, WeaviateIndexError> {
    let hits = class_hits(data, class_name)?;
    let mut results = Vec::with_capacity(hits.len());
    for hit in hits {
        results.push(TableHit {
            table_name: hit_name(hit)?.to_string(),
            description: hit
                .get(DESCRIPTION_PROPERTY)
                .and_then(JsonValue::as_str)
                .map(str::to_string),
            relevance_score: parse_score(
                hit.get("_additional").and_then(|additional| additional.get("score")),
            ),
        });
    }
    Ok(results)
}

/// Maps DDL hits by table name; the first hit for a name wins.
pub fn graphql_hits_to_ddl(
    data: &JsonValue,
    class_name: &str,
    minimal: bool,
) -> Result<HashMap<String, String>, WeaviateIndexError> {
    let property = if minimal {
        DDL_MINIMAL_PROPERTY
    } else {
        DDL_RAW_PROPERTY
    };
    let mut ddl = HashMap::new();
    for hit in class_hits(data, class_name)? {
        let name = hit_name(hit)?.to_string();
        let text = hit
            .get(property)
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();
        ddl.entry(name).or_insert(text);
    }
    Ok(ddl)
}

pub struct NeighborHit {
    pub related: Vec<String>,
    pub join_hints: HashMap<String, Vec<String>>,
}

pub fn graphql_hit_to_neighbors(
    data: &JsonValue,
    class_name: &str,
    table_name: &str,
) -> Result<Option<NeighborHit>, WeaviateIndexError> {
    let Some(hit) = class_hits(data, class_name)?
        .iter()
        .find(|hit| hit_name(hit).map(|name| name == table_name).unwrap_or(false))
    else {
        return Ok(None);
    };

    let mut related = Vec::new();
    if let Some(refs) = hit.get(RELATED_TABLES_PROPERTY).and_then(JsonValue::as_array) {
        for reference in refs {
            if let Some(name) = reference.get(NAME_PROPERTY).and_then(JsonValue::as_str) {
                if !related.iter().any(|existing: &String| existing == name) {
                    related.push(name.to_string());
                }
            }
        }
    }

    let join_hints = match hit.get(JOIN_HINTS_PROPERTY).and_then(JsonValue::as_str) {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw).map_err(|err| {
            WeaviateIndexError::InvalidResponse {
                message: format!("invalid join hints on '{table_name}': {err}"),
            }
        })?,
        _ => HashMap::new(),
    };

    Ok(Some(NeighborHit {
        related,
        join_hints,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_string_escapes_quotes() {
        assert_eq!(graphql_string(r#"say "hi""#), r#""say \"hi\"""#);
    }

    #[test]
    fn hybrid_query_includes_alpha_only_when_set() {
        let query = build_hybrid_query("TableSchema", "orders", 5, None);
        assert_eq!(
            query,
            r#"{Get{TableSchema(hybrid:{query:"orders"},limit:5){name description _additional{id score}}}}"#
        );
        let query = build_hybrid_query("TableSchema", "orders", 3, Some(0.5));
        assert!(query.contains(r#"hybrid:{query:"orders",alpha:0.5}"#));
    }

    #[test]
    fn ddl_query_uses_or_filter_for_many_names() {
        let single = build_ddl_query("TableSchema", &["orders"], true);
        assert!(single.contains(r#"where:{path:["name"],operator:Equal,valueText:"orders"}"#));
        assert!(single.contains("{name ddl_minimal}"));

        let many = build_ddl_query("TableSchema", &["orders", "customers"], false);
        assert!(many.contains("operator:Or,operands:["));
        assert!(many.contains("limit:2"));
        assert!(many.contains("{name ddl_raw}"));
    }

    #[test]
    fn score_accepts_strings_and_numbers() {
        assert_eq!(parse_score(Some(&JsonValue::String("0.75".to_string()))), 0.75);
        assert_eq!(parse_score(Some(&serde_json::json!(0.5))), 0.5);
        assert_eq!(parse_score(None), 0.0);
    }

    #[test]
    fn table_uuid_is_deterministic() {
        assert_eq!(table_uuid("orders"), table_uuid("orders"));
        assert_ne!(table_uuid("orders"), table_uuid("customers"));
    }
}
