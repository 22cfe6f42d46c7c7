use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{BridgeError, Result};

/// Which identifier table a lookup went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingTable {
    Person,
    Project,
    Task,
    Company,
}

impl fmt::Display for MappingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Person => "Person",
            Self::Project => "Project",
            Self::Task => "Task",
            Self::Company => "Company",
        };
        f.write_str(name)
    }
}

/// A source report layout plus the source→destination identifier tables.
///
/// `column_index` is derived from `required_columns` and rebuilt whenever the
/// column list changes; it is never read from configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportSchema {
    #[serde(rename = "reportName")]
    pub name: String,
    #[serde(rename = "columns")]
    required_columns: Vec<String>,
    #[serde(skip)]
    column_index: HashMap<String, usize>,
    #[serde(rename = "userMappings", default)]
    pub person_map: HashMap<String, String>,
    #[serde(rename = "projectMappings", default)]
    pub project_map: HashMap<String, String>,
    #[serde(rename = "taskMappings", default)]
    pub task_map: HashMap<String, String>,
    #[serde(rename = "companyMappings", default)]
    pub company_map: HashMap<String, String>,
}

impl ReportSchema {
    #[cfg(test)]
    pub fn new(name: &str, columns: &[&str]) -> Result<Self> {
        let mut schema = Self {
            name: name.to_string(),
            ..Self::default()
        };
        schema.set_required_columns(columns.iter().map(|c| c.to_string()).collect())?;
        Ok(schema)
    }

    /// Load a mapping configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Settings(format!("cannot read mapping file {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let mut schema: ReportSchema = serde_json::from_str(content)?;
        let columns = std::mem::take(&mut schema.required_columns);
        schema.set_required_columns(columns)?;
        Ok(schema)
    }

    pub fn required_columns(&self) -> &[String] {
        &self.required_columns
    }

    /// Replace the column list and rebuild the positional index.
    pub fn set_required_columns(&mut self, columns: Vec<String>) -> Result<()> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.as_str()) {
                return Err(BridgeError::Settings(format!(
                    "duplicate column '{col}' in report {}",
                    self.name
                )));
            }
        }
        self.column_index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        self.required_columns = columns;
        Ok(())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    pub fn lookup_column_index(&self, name: &str) -> Result<usize> {
        self.column_index
            .get(name)
            .copied()
            .ok_or_else(|| BridgeError::UnknownColumn(name.to_string()))
    }

    pub fn resolve(&self, table: MappingTable, key: &str) -> Result<&str> {
        let map = match table {
            MappingTable::Person => &self.person_map,
            MappingTable::Project => &self.project_map,
            MappingTable::Task => &self.task_map,
            MappingTable::Company => &self.company_map,
        };
        map.get(key)
            .map(String::as_str)
            .ok_or_else(|| BridgeError::UnmappedIdentifier {
                table,
                key: key.to_string(),
            })
    }

    pub fn resolve_person(&self, key: &str) -> Result<&str> {
        self.resolve(MappingTable::Person, key)
    }

    pub fn resolve_project(&self, key: &str) -> Result<&str> {
        self.resolve(MappingTable::Project, key)
    }

    pub fn resolve_task(&self, key: &str) -> Result<&str> {
        self.resolve(MappingTable::Task, key)
    }
}
