//! Raw index table reader
//!
//! A table is a header line followed by whitespace-separated rows of
//! `identifier sign region sampling ieta iphi`. Everything after `#` on a line
//! is a comment, and blank lines are skipped. All numeric columns are parsed
//! here so that resolution only sees typed records.

use std::path::Path;

use tracing::debug;

use super::error::ResolveError;
use super::types::{RawElementRecord, SignFlag};

/// Number of columns in every data row
pub const COLUMNS: usize = 6;

/// Parse a whole table, failing on the first malformed row
pub fn parse_table(source: &str) -> Result<Vec<RawElementRecord>, ResolveError> {
    source
        .lines()
        .enumerate()
        .skip(1)
        .filter_map(|(index, raw)| {
            let content = strip_comment(raw).trim();
            (!content.is_empty()).then_some((index + 1, content))
        })
        .map(|(line, content)| parse_row(content, line))
        .collect()
}

/// Read and parse a table file
pub fn read_table(path: &Path) -> Result<Vec<RawElementRecord>, ResolveError> {
    let content = std::fs::read_to_string(path)?;
    let records = parse_table(&content)?;
    debug!(path = %path.display(), records = records.len(), "read index table");
    Ok(records)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse one data row; `line` is 1-based
pub fn parse_row(content: &str, line: usize) -> Result<RawElementRecord, ResolveError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    if tokens.len() != COLUMNS {
        return Err(ResolveError::malformed(
            line,
            format!("expected {} fields, found {}", COLUMNS, tokens.len()),
        ));
    }

    let integer = |column: &str, token: &str| {
        token.parse::<i64>().map_err(|_| {
            ResolveError::malformed(line, format!("{} '{}' is not an integer", column, token))
        })
    };

    let raw_sign = integer("sign flag", tokens[1])?;
    let sign = SignFlag::from_raw(raw_sign)
        .ok_or_else(|| ResolveError::malformed(line, "sign flag is zero"))?;

    Ok(RawElementRecord {
        identifier: tokens[0].to_string(),
        sign,
        region_token: tokens[2].to_string(),
        region_index: integer("region index", tokens[2])?,
        sampling: integer("sampling", tokens[3])?,
        ieta: integer("eta index", tokens[4])?,
        iphi: integer("phi index", tokens[5])?,
        line,
    })
}
