//! Column alias table for the execution feed.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Canonical execution-feed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Project,
    Job,
    ExecId,
    StartTime,
    Status,
    Duration,
    EndTime,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Project,
        Field::Job,
        Field::ExecId,
        Field::StartTime,
        Field::Status,
        Field::Duration,
        Field::EndTime,
    ];

    pub fn canonical(&self) -> &'static str {
        match self {
            Field::Project => "project",
            Field::Job => "job",
            Field::ExecId => "exec_id",
            Field::StartTime => "start_time",
            Field::Status => "status",
            Field::Duration => "duration_seconds",
            Field::EndTime => "end_time",
        }
    }

    /// Accepted header spellings, in priority order.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Project => &["project", "projeto", "project_name"],
            Field::Job => &["job", "job_name", "name", "application"],
            Field::ExecId => &["exec_id", "execution_id", "job_id"],
            Field::StartTime => &["start_time", "inicio", "started_at", "start"],
            Field::Status => &["status", "result", "state", "ended status"],
            Field::Duration => &["duration_seconds", "duration_sec", "duracao_s"],
            Field::EndTime => &["end_time", "fim", "ended_at", "end"],
        }
    }
}

/// Trimmed, lower-cased header with any byte-order mark removed.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Resolved position of each canonical field in a concrete header row.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: HashMap<Field, usize>,
}

impl ColumnMap {
    pub fn resolve<'a, I>(headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let normalized: Vec<String> = headers.into_iter().map(normalize_header).collect();
        let mut indices = HashMap::new();
        for field in Field::ALL {
            let hit = field
                .aliases()
                .iter()
                .find_map(|alias| normalized.iter().position(|h| h == alias));
            if let Some(idx) = hit {
                indices.insert(field, idx);
            }
        }

        let mut missing: Vec<String> = [Field::Job, Field::ExecId, Field::StartTime, Field::Status]
            .iter()
            .filter(|f| !indices.contains_key(f))
            .map(|f| f.canonical().to_string())
            .collect();
        if !indices.contains_key(&Field::Duration) && !indices.contains_key(&Field::EndTime) {
            missing.push(Field::Duration.canonical().to_string());
        }
        if !missing.is_empty() {
            return Err(Error::missing_columns("execution feed", missing));
        }
        Ok(Self { indices })
    }

    pub fn index(&self, field: Field) -> Option<usize> {
        self.indices.get(&field).copied()
    }
}
