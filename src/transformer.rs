use std::collections::HashMap;

use chrono::NaiveDate;

use crate::dates::{format_destination, parse_source_date};
use crate::error::{BridgeError, Result};
use crate::models::{Person, TimeEntryDraft};
use crate::remote::TimeEntryService;
use crate::schema::ReportSchema;

pub const COL_PERSON: &str = "Person";
pub const COL_PROJECT: &str = "ProjectCode";
pub const COL_TASK: &str = "TaskNumber";
pub const COL_DATE: &str = "Date";
pub const COL_HOURS: &str = "Hours";

/// Persons already confirmed against the destination, keyed by source key.
/// Lives for exactly one parse.
#[derive(Debug, Default)]
pub struct PersonCache {
    persons: HashMap<String, Person>,
    lookups: usize,
}

impl PersonCache {
    pub fn get(&self, source_key: &str) -> Option<&Person> {
        self.persons.get(source_key)
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    /// Number of remote lookups made so far.
    pub fn lookups(&self) -> usize {
        self.lookups
    }
}

pub fn default_description(schema: &ReportSchema) -> String {
    format!("Imported from {} report.", schema.name)
}

pub struct RowTransformer<'a, S: TimeEntryService + ?Sized> {
    schema: &'a ReportSchema,
    service: &'a S,
    cache: PersonCache,
    description: String,
}

impl<'a, S: TimeEntryService + ?Sized> RowTransformer<'a, S> {
    pub fn new(schema: &'a ReportSchema, service: &'a S) -> Self {
        Self {
            schema,
            service,
            cache: PersonCache::default(),
            description: default_description(schema),
        }
    }

    pub fn cache(&self) -> &PersonCache {
        &self.cache
    }

    fn cell<'r>(&self, row: &'r [String], column: &str) -> Result<&'r str> {
        let idx = self.schema.lookup_column_index(column)?;
        row.get(idx)
            .map(String::as_str)
            .ok_or_else(|| BridgeError::UnknownColumn(column.to_string()))
    }

    fn resolve_person(&mut self, source_key: &str) -> Result<String> {
        if let Some(p) = self.cache.get(source_key) {
            return Ok(p.id.clone());
        }
        let schema = self.schema;
        let dest_id = schema.resolve_person(source_key)?;
        log::debug!("Verifying person {source_key} -> {dest_id}");
        self.cache.lookups += 1;
        let person = self
            .service
            .get_person(dest_id)
            .map_err(|e| BridgeError::PersonResolutionFailed {
                key: source_key.to_string(),
                id: dest_id.to_string(),
                reason: e.to_string(),
            })?;
        log::debug!("Verified {} {} ({})", person.first_name, person.last_name, person.id);
        let id = person.id.clone();
        self.cache.persons.insert(source_key.to_string(), person);
        Ok(id)
    }

    /// Build one draft from one row. Any unmapped reference fails the row.
    pub fn transform(&mut self, row: &[String]) -> Result<(TimeEntryDraft, NaiveDate)> {
        let schema = self.schema;
        let person_key = self.cell(row, COL_PERSON)?;
        let person_id = self.resolve_person(person_key)?;

        let project_id = schema.resolve_project(self.cell(row, COL_PROJECT)?)?;
        let task_id = schema.resolve_task(self.cell(row, COL_TASK)?)?;

        let date = parse_source_date(self.cell(row, COL_DATE)?)?;
        let hours = self.cell(row, COL_HOURS)?;

        let draft = TimeEntryDraft {
            person_id,
            date: format_destination(date),
            hours: hours.to_string(),
            minutes: "0".to_string(),
            description: self.description.clone(),
            project_id: project_id.to_string(),
            task_id: task_id.to_string(),
        };
        Ok((draft, date))
    }
}
