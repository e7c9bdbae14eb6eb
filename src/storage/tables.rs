//! Feature file and score file (CSV).

use super::write_atomic;
use crate::error::{Error, Result};
use crate::features::FeatureTable;
use crate::ingest::{normalize_header, parse_number};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

const EXEC_ID: &str = "exec_id";

/// Reconstruction error of one scored execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub exec_id: String,
    pub re: f64,
}

fn reader_for(path: &Path, what: &'static str) -> Result<csv::Reader<std::fs::File>> {
    if !path.exists() {
        return Err(Error::MissingInput {
            what,
            path: path.to_path_buf(),
        });
    }
    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?)
}

pub fn write_features(path: &Path, table: &FeatureTable) -> Result<()> {
    write_atomic(path, |w| {
        let mut wtr = csv::Writer::from_writer(w);
        wtr.write_record(std::iter::once(EXEC_ID).chain(table.columns.iter().map(String::as_str)))?;
        for (id, row) in table.exec_ids.iter().zip(&table.rows) {
            let cells = row
                .iter()
                .map(|v| v.map(|x| x.to_string()).unwrap_or_default());
            wtr.write_record(std::iter::once(id.clone()).chain(cells))?;
        }
        wtr.flush()?;
        Ok(())
    })?;
    info!(path = %path.display(), rows = table.len(), columns = table.columns.len(), "feature file written");
    Ok(())
}

/// Every column except `exec_id` is read as numeric; unparseable cells become `None`.
/// Rows without an id fall back to their row index.
pub fn read_features(path: &Path) -> Result<FeatureTable> {
    let mut rdr = reader_for(path, "feature file")?;
    let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
    let id_idx = headers.iter().position(|h| h == EXEC_ID);
    if id_idx.is_none() {
        warn!(path = %path.display(), "feature file has no exec_id column; using row index");
    }
    let value_idx: Vec<usize> = (0..headers.len()).filter(|i| Some(*i) != id_idx).collect();

    let mut table = FeatureTable {
        columns: value_idx.iter().map(|&i| headers[i].clone()).collect(),
        ..FeatureTable::default()
    };
    for (n, row) in rdr.records().enumerate() {
        let row = row?;
        let id = id_idx
            .and_then(|i| row.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| n.to_string());
        table.exec_ids.push(id);
        table.rows.push(
            value_idx
                .iter()
                .map(|&i| row.get(i).and_then(parse_number))
                .collect(),
        );
    }
    Ok(table)
}

pub fn write_scores(path: &Path, scores: &[ScoreRecord]) -> Result<()> {
    write_atomic(path, |w| {
        let mut wtr = csv::Writer::from_writer(w);
        for s in scores {
            wtr.serialize(s)?;
        }
        if scores.is_empty() {
            wtr.write_record([EXEC_ID, "re"])?;
        }
        wtr.flush()?;
        Ok(())
    })?;
    info!(path = %path.display(), rows = scores.len(), "score file written");
    Ok(())
}

/// Rows with an empty id or a non-finite score are discarded.
pub fn read_scores(path: &Path) -> Result<Vec<ScoreRecord>> {
    let mut rdr = reader_for(path, "score file")?;
    let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
    let id_idx = headers.iter().position(|h| h == EXEC_ID);
    let re_idx = headers.iter().position(|h| h == "re");
    let (id_idx, re_idx) = match (id_idx, re_idx) {
        (Some(i), Some(r)) => (i, r),
        _ => {
            let missing = [(EXEC_ID, id_idx), ("re", re_idx)]
                .iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            return Err(Error::missing_columns("score file", missing));
        }
    };

    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let exec_id = row.get(id_idx).map(str::trim).unwrap_or_default();
        let re = row.get(re_idx).and_then(parse_number);
        if let (false, Some(re)) = (exec_id.is_empty(), re) {
            out.push(ScoreRecord {
                exec_id: exec_id.to_string(),
                re,
            });
        }
    }
    Ok(out)
}
