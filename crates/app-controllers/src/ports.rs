//! Collaborators controllers call out to

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::errors::ControllerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,

    #[serde(rename = "type")]
    pub data_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        self.columns.push(ColumnSchema {
            name: name.into(),
            data_type: data_type.into(),
            description: None,
        });
        self
    }
}

/// Schema metadata of the host application's tables or event streams.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// `Ok(None)` when the table does not exist.
    async fn table_schema(&self, table: &str) -> Result<Option<TableSchema>, ControllerError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxOutput {
    pub stdout: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Isolated code execution for spreadsheet automation.
#[async_trait]
pub trait CodeSandbox: Send + Sync {
    async fn run(&self, code: &str) -> Result<SandboxOutput, ControllerError>;
}

/// Schemas held in memory.
#[derive(Debug, Default)]
pub struct StaticSchemaSource {
    tables: RwLock<BTreeMap<String, TableSchema>>,
}

impl StaticSchemaSource {
    pub fn new<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = TableSchema>,
    {
        let source = Self::default();
        for table in tables {
            source.insert(table);
        }
        source
    }

    pub fn insert(&self, table: TableSchema) {
        self.tables.write().insert(table.name.clone(), table);
    }
}

#[async_trait]
impl SchemaSource for StaticSchemaSource {
    async fn table_schema(&self, table: &str) -> Result<Option<TableSchema>, ControllerError> {
        Ok(self.tables.read().get(table).cloned())
    }
}

/// Stand-in used when no collaborator is wired up; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

#[async_trait]
impl SchemaSource for Unavailable {
    async fn table_schema(&self, _table: &str) -> Result<Option<TableSchema>, ControllerError> {
        Err(ControllerError::collaborator(
            "schema source",
            "no schema source configured",
        ))
    }
}

#[async_trait]
impl CodeSandbox for Unavailable {
    async fn run(&self, _code: &str) -> Result<SandboxOutput, ControllerError> {
        Err(ControllerError::collaborator(
            "code sandbox",
            "no code sandbox configured",
        ))
    }
}
