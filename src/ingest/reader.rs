//! CSV reader/writer for the execution feed.

use super::{derive_exec_id, ColumnMap, ExecutionRecord, Field, Status, TIMESTAMP_FORMAT};
use crate::error::{Error, Result};
use crate::storage::write_atomic;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::{debug, info};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parse ISO-8601 or day-first timestamps; offsets are dropped (local wall-clock time kept).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Numeric coercion shared by every table: comma decimal separators accepted,
/// non-finite or garbage → `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim().replace(',', ".");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

/// Read and normalize the execution feed.
pub fn read_executions(path: &Path) -> Result<Vec<ExecutionRecord>> {
    if !path.exists() {
        return Err(Error::MissingInput {
            what: "execution feed",
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let content = content.trim_start_matches('\u{feff}');
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(content))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = rdr.headers()?.clone();
    let columns = ColumnMap::resolve(headers.iter())?;
    let cell = |row: &csv::StringRecord, field: Field| -> Option<String> {
        columns
            .index(field)
            .and_then(|i| row.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let project = cell(&row, Field::Project);
        let job = cell(&row, Field::Job).unwrap_or_else(|| "UNKNOWN".to_string());
        let start_time = cell(&row, Field::StartTime).and_then(|s| parse_timestamp(&s));
        let status = Status::normalize(&cell(&row, Field::Status).unwrap_or_default());

        let duration_seconds = match columns.index(Field::Duration) {
            Some(_) => cell(&row, Field::Duration).and_then(|s| parse_number(&s)),
            None => {
                let end = cell(&row, Field::EndTime).and_then(|s| parse_timestamp(&s));
                match (start_time, end) {
                    (Some(s), Some(e)) => Some((e - s).num_milliseconds() as f64 / 1000.0),
                    _ => None,
                }
            }
        }
        .map(|d| d.max(0.0));

        let exec_id = cell(&row, Field::ExecId).unwrap_or_else(|| {
            derive_exec_id(project.as_deref(), &job, start_time.as_ref())
        });

        out.push(ExecutionRecord {
            project,
            job,
            exec_id,
            start_time,
            status,
            duration_seconds,
        });
    }

    if out.is_empty() {
        return Err(Error::EmptyInput(format!(
            "no execution rows in {}",
            path.display()
        )));
    }
    info!(path = %path.display(), rows = out.len(), "execution feed loaded");
    debug!(
        missing_duration = out.iter().filter(|r| r.duration_seconds.is_none()).count(),
        missing_start = out.iter().filter(|r| r.start_time.is_none()).count(),
        "feed gaps"
    );
    Ok(out)
}

/// Write records with canonical headers.
pub fn write_executions(path: &Path, records: &[ExecutionRecord]) -> Result<()> {
    write_atomic(path, |w| {
        let mut wtr = csv::Writer::from_writer(w);
        wtr.write_record(
            [
                Field::Project,
                Field::Job,
                Field::ExecId,
                Field::StartTime,
                Field::Status,
                Field::Duration,
            ]
            .iter()
            .map(|f| f.canonical()),
        )?;
        for r in records {
            let start = r
                .start_time
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default();
            let duration = r
                .duration_seconds
                .map(|d| d.to_string())
                .unwrap_or_default();
            wtr.write_record([
                r.project.as_deref().unwrap_or(""),
                r.job.as_str(),
                r.exec_id.as_str(),
                start.as_str(),
                r.status.as_str(),
                duration.as_str(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    })
}
