use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidAssignment(String),

    #[error("Key cannot be empty in assignment '{0}'.")]
    EmptyKey(String),

    #[error("Invalid {expected} value for {key}: '{value}'")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Splits a `--set` argument into its trimmed key and value.
pub fn parse_assignment(assignment: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidAssignment(assignment.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(assignment.to_string()));
    }
    Ok((key, value.trim()))
}

pub fn parse_float(key: &str, value: &str) -> Result<f64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: "float",
    })
}

/// Inserts a zero-padded run index before the extension: `out.json` becomes `out_007.json`.
pub fn run_output_path(path: &Path, run_index: Option<u32>) -> PathBuf {
    let Some(index) = run_index else {
        return path.to_path_buf();
    };
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{index:03}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{index:03}"),
    };
    path.with_file_name(name)
}
