use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tablescout_core::TableMetadata;

use crate::mapper::{
    class_schema_request, reference_beacon, reference_source, table_to_object, BatchObjectsRequest,
    BatchReference,
};
use crate::{WeaviateIndexError, WeaviateSchemaIndex};

/// Outcome of a full index rebuild.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub tables_indexed: usize,
    pub references_added: usize,
}

impl WeaviateSchemaIndex {
    /// Drops the index class and re-populates it from `tables`.
    ///
    /// Not transactional: a failure part way leaves the class partially filled.
    pub async fn rebuild(
        &self,
        tables: &[TableMetadata],
    ) -> Result<IngestReport, WeaviateIndexError> {
        let objects = tables
            .iter()
            .map(|table| table_to_object(table, &self.class_name))
            .collect::<Result<Vec<_>, _>>()?;

        self.drop_class().await?;
        self.create_class().await?;

        if objects.is_empty() {
            tracing::info!(class = %self.class_name, "index rebuilt with no tables");
            return Ok(IngestReport::default());
        }

        let tables_indexed = objects.len();
        let response = self
            .send_json(
                self.request_builder(reqwest::Method::POST, "v1/batch/objects")
                    .json(&BatchObjectsRequest { objects }),
            )
            .await?;
        check_batch_results(&response, "objects")?;

        let references = self.references_for(tables);
        let references_added = references.len();
        if !references.is_empty() {
            let response = self
                .send_json(
                    self.request_builder(reqwest::Method::POST, "v1/batch/references")
                        .json(&references),
                )
                .await?;
            check_batch_results(&response, "references")?;
        }

        tracing::info!(
            class = %self.class_name,
            tables_indexed,
            references_added,
            "index rebuilt"
        );
        Ok(IngestReport {
            tables_indexed,
            references_added,
        })
    }

    async fn drop_class(&self) -> Result<(), WeaviateIndexError> {
        let path = format!("v1/schema/{}", self.class_name);
        match self
            .send_json(self.request_builder(reqwest::Method::DELETE, &path))
            .await
        {
            Ok(_) => Ok(()),
            Err(WeaviateIndexError::HttpStatus { status: 404, .. })
            | Err(WeaviateIndexError::ClassNotFound { .. }) => Ok(()),
            Err(err) => Err(err),
        }
    }

    async fn create_class(&self) -> Result<(), WeaviateIndexError> {
        let schema = class_schema_request(&self.class_name, self.vectorizer);
        self.send_json(
            self.request_builder(reqwest::Method::POST, "v1/schema")
                .json(&schema),
        )
        .await
        .map(|_| ())
    }

    /// One reference per distinct foreign-key target that is itself being indexed.
    fn references_for(&self, tables: &[TableMetadata]) -> Vec<BatchReference> {
        let indexed: HashSet<&str> = tables.iter().map(|table| table.name.as_str()).collect();
        let mut seen = HashSet::new();
        let mut references = Vec::new();
        for table in tables {
            for fk in &table.foreign_keys {
                if !indexed.contains(fk.target_table.as_str()) {
                    continue;
                }
                if !seen.insert((table.name.as_str(), fk.target_table.as_str())) {
                    continue;
                }
                references.push(BatchReference {
                    from: reference_source(&self.class_name, &table.name),
                    to: reference_beacon(&self.class_name, &fk.target_table),
                });
            }
        }
        references
    }
}

/// Batch endpoints answer 200 with per-item errors; surface the first one.
fn check_batch_results(response: &JsonValue, operation: &str) -> Result<(), WeaviateIndexError> {
    let Some(items) = response.as_array() else {
        return Ok(());
    };

    for item in items {
        let message = item
            .get("result")
            .and_then(|result| result.get("errors"))
            .and_then(|errors| errors.get("error"))
            .and_then(JsonValue::as_array)
            .and_then(|errors| errors.first())
            .and_then(|error| error.get("message"))
            .and_then(JsonValue::as_str);
        if let Some(message) = message {
            return Err(WeaviateIndexError::BatchFailed {
                operation: operation.to_string(),
                message: message.to_string(),
            });
        }
    }
    Ok(())
}
