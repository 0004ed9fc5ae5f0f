//! Input-file readers for actlog.
//!
//! Two on-disk formats are understood: delimited text with a header row
//! (comma or semicolon, auto-detected) and the plain activity-log format
//! (`<timestamp> <N> time(s) <kind>` lines). Both produce a `Vec<Record>`
//! sorted by timestamp ascending.

use std::io::BufRead;
use std::path::Path;

use actlog_core::error::{ActlogError, Result};
use actlog_core::models::Record;
use actlog_core::time_utils::TimestampParser;
use tracing::{debug, warn};

/// Header names accepted as the timestamp column.
const TIMESTAMP_COLUMNS: &[&str] = &["timestamp", "startdate", "time", "datetime", "date"];
/// Header names accepted as the category column.
const KIND_COLUMNS: &[&str] = &["kind", "category", "type", "activity"];
/// Header names accepted as the repeat-count column.
const REPEAT_COLUMNS: &[&str] = &["repeat", "value", "count", "times"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load records from `path`, dispatching on the file extension.
///
/// `.log` and `.txt` files parse as plain activity logs; everything else is
/// treated as delimited text with a header row. With `skip_invalid`, bad
/// rows are logged and excluded instead of aborting the load.
pub fn load_records(
    path: &Path,
    parser: &TimestampParser,
    skip_invalid: bool,
) -> Result<Vec<Record>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut records = match ext.as_str() {
        "log" | "txt" => read_activity_log(path, parser, skip_invalid)?,
        _ => read_delimited(path, parser, skip_invalid)?,
    };

    records.sort_by_key(|r| r.timestamp);
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Pick `;` or `,` by counting occurrences in the header row.
pub fn detect_delimiter(header: &str) -> char {
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas {
        ';'
    } else {
        ','
    }
}

/// Read a delimited export with a header row.
///
/// Unrecognised columns (`unit`, `source`, …) are ignored. A header-only
/// file yields an empty table.
pub fn read_delimited(
    path: &Path,
    parser: &TimestampParser,
    skip_invalid: bool,
) -> Result<Vec<Record>> {
    let lines = read_lines(path)?;
    let mut rows = lines.iter().enumerate();

    // The first non-empty line is the header.
    let header = loop {
        match rows.next() {
            Some((_, line)) if !line.trim().is_empty() => break line,
            Some(_) => continue,
            None => return Ok(Vec::new()),
        }
    };

    let delimiter = detect_delimiter(header);
    let columns: Vec<String> = split_row(header, delimiter)
        .iter()
        .map(|c| normalise_column(c))
        .collect();

    let ts_col = columns
        .iter()
        .position(|c| TIMESTAMP_COLUMNS.contains(&c.as_str()))
        .ok_or_else(|| ActlogError::MissingTimestampColumn(path.to_path_buf()))?;
    let kind_col = columns
        .iter()
        .position(|c| KIND_COLUMNS.contains(&c.as_str()));
    let repeat_col = columns
        .iter()
        .position(|c| REPEAT_COLUMNS.contains(&c.as_str()));

    let mut records = Vec::new();
    for (idx, line) in rows {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields = split_row(trimmed, delimiter);
        if fields.len() <= ts_col {
            if skip_invalid {
                warn!("Skipping malformed row at line {}: {}", line_no, trimmed);
                continue;
            }
            return Err(ActlogError::MalformedRow {
                line: line_no,
                content: trimmed.to_string(),
            });
        }

        let raw_ts = clean_field(&fields[ts_col]);
        let Some(timestamp) = parser.parse(&raw_ts) else {
            if skip_invalid {
                warn!(
                    "Skipping row with invalid timestamp at line {}: {}",
                    line_no, raw_ts
                );
                continue;
            }
            return Err(ActlogError::TimestampParse {
                line: line_no,
                value: raw_ts,
            });
        };

        let kind = kind_col
            .and_then(|c| fields.get(c))
            .map(|f| clean_field(f))
            .filter(|f| !f.is_empty());
        let repeat = repeat_col
            .and_then(|c| fields.get(c))
            .and_then(|f| parse_repeat(&clean_field(f)))
            .unwrap_or(1);

        records.push(Record {
            timestamp,
            repeat,
            kind,
        });
    }

    Ok(records)
}

/// Read a plain activity log: one header line, then lines of the form
/// `<timestamp> <N> time(s) <kind>`.
pub fn read_activity_log(
    path: &Path,
    parser: &TimestampParser,
    skip_invalid: bool,
) -> Result<Vec<Record>> {
    let lines = read_lines(path)?;

    let line_re = regex::Regex::new(r"^(?P<ts>.+?)\s+(?P<repeat>\d+)\s+times?\s+(?P<kind>\w+(?: \(\w+\))?)\s*$")
        .map_err(|e| ActlogError::Other(anyhow::anyhow!(e)))?;

    let mut records = Vec::new();
    // The log format carries a single header line before the data rows.
    for (idx, line) in lines.iter().enumerate().skip(1) {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(caps) = line_re.captures(trimmed) else {
            if skip_invalid {
                warn!("Skipping malformed log line {}: {}", line_no, trimmed);
                continue;
            }
            return Err(ActlogError::MalformedRow {
                line: line_no,
                content: trimmed.to_string(),
            });
        };

        let raw_ts = caps["ts"].trim().to_string();
        let Some(timestamp) = parser.parse(&raw_ts) else {
            if skip_invalid {
                warn!(
                    "Skipping log line with invalid timestamp at line {}: {}",
                    line_no, raw_ts
                );
                continue;
            }
            return Err(ActlogError::TimestampParse {
                line: line_no,
                value: raw_ts,
            });
        };

        let repeat = caps["repeat"].parse::<u32>().unwrap_or(1);
        let kind = Some(caps["kind"].to_string());

        records.push(Record {
            timestamp,
            repeat,
            kind,
        });
    }

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path).map_err(|e| ActlogError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let reader = std::io::BufReader::new(file);
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line.map_err(|e| ActlogError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?);
    }
    Ok(lines)
}

fn split_row(row: &str, delimiter: char) -> Vec<String> {
    row.split(delimiter).map(|f| f.to_string()).collect()
}

fn normalise_column(name: &str) -> String {
    name.trim().trim_matches('"').to_lowercase()
}

fn clean_field(field: &str) -> String {
    field.trim().trim_matches('"').to_string()
}

/// Parse a repeat count; health-app exports write it as a float (`"1.0"`).
fn parse_repeat(value: &str) -> Option<u32> {
    if let Ok(v) = value.parse::<u32>() {
        return Some(v);
    }
    value.parse::<f64>().ok().map(|v| v.round() as u32)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
