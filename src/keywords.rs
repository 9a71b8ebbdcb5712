use crate::error::Result;
use std::fs;
use std::path::Path;

/// Read a keyword list: the first column of each line, with comma or tab as
/// the column separator. Lines whose first column is empty are dropped, the
/// way empty spreadsheet cells are.
pub fn keywords_from_str(input: &str) -> Vec<String> {
    input
        .lines()
        .map(first_column)
        .filter(|cell| !cell.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a keyword list from a file, see [`keywords_from_str`]
pub fn keywords_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(keywords_from_str(&contents))
}

fn first_column(line: &str) -> &str {
    let cell = line
        .split(['\t', ','])
        .next()
        .unwrap_or_default()
        .trim_end_matches('\r');

    let trimmed = cell.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(cell)
}
