use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForeignKeyMetadata {
    pub target_table: String,
    pub fk_column: String,
    pub pk_column: String,
}

/// Structural description of one table as reported by a schema source.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableMetadata {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyMetadata>,
}

impl TableMetadata {
    /// One-line form used as retrieval context, e.g. `TABLE orders (id int4, created_at date)`.
    pub fn ddl_minimal(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|column| format!("{} {}", column.name, column.data_type))
            .collect::<Vec<_>>()
            .join(", ");
        format!("TABLE {} ({columns})", self.name)
    }

    pub fn ddl_raw(&self) -> String {
        let mut lines = vec![format!("CREATE TABLE {} (", self.name)];
        let last = self.columns.len().saturating_sub(1);
        for (idx, column) in self.columns.iter().enumerate() {
            let separator = if idx == last { "" } else { "," };
            lines.push(format!("  {} {}{separator}", column.name, column.data_type));
        }
        lines.push(");".to_string());
        lines.join("\n")
    }

    pub fn description(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|column| column.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Table {} with columns: {columns}", self.name)
    }

    pub fn join_condition(&self, foreign_key: &ForeignKeyMetadata) -> String {
        format!(
            "{}.{} = {}.{}",
            self.name, foreign_key.fk_column, foreign_key.target_table, foreign_key.pk_column
        )
    }
}
