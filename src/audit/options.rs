use std::collections::HashMap;

use crate::audit::error::Result;
use crate::audit::schema::SchemaInspector;

/// Which columns of a type are tracked before the deny-list is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnPolicy {
    /// Every column the schema lists for the entity's table.
    #[default]
    All,
    Only(Vec<String>),
}

impl ColumnPolicy {
    /// `["*"]` (a leading wildcard) selects every column.
    pub fn from_list<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        match columns.first() {
            Some(first) if first == "*" => ColumnPolicy::All,
            _ => ColumnPolicy::Only(columns),
        }
    }
}

/// Per-type audit configuration, bound once at registration.
#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    pub columns: ColumnPolicy,
    pub avoid: Vec<String>,
    /// Column key to human label.
    pub formatted: HashMap<String, String>,
    /// Column key to dot-notated relation path.
    pub means: HashMap<String, String>,
}

impl AuditOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = ColumnPolicy::from_list(columns);
        self
    }

    pub fn avoiding<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.avoid = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn format_column(mut self, column: impl Into<String>, label: impl Into<String>) -> Self {
        self.formatted.insert(column.into(), label.into());
        self
    }

    pub fn mean_column(mut self, column: impl Into<String>, path: impl Into<String>) -> Self {
        self.means.insert(column.into(), path.into());
        self
    }

    pub fn is_avoided(&self, column: &str) -> bool {
        self.avoid.iter().any(|c| c == column)
    }

    pub fn without_avoided(&self, columns: Vec<String>) -> Vec<String> {
        columns.into_iter().filter(|c| !self.is_avoided(c)).collect()
    }

    pub async fn tracked_columns<I>(&self, schema: &I, table: &str) -> Result<Vec<String>>
    where
        I: SchemaInspector + ?Sized,
    {
        let columns = match &self.columns {
            ColumnPolicy::All => schema.list_columns(table).await?,
            ColumnPolicy::Only(columns) => columns.clone(),
        };
        Ok(self.without_avoided(columns))
    }
}
