//! TOML parser with helpful error messages

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// TOML (de)serialization failure with a rendered excerpt of the bad line.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TomlError {
    pub line: Option<usize>,
    message: String,
}

/// Parse TOML content from string
pub fn from_toml_str<T: DeserializeOwned>(content: &str) -> Result<T, TomlError> {
    toml::from_str(content).map_err(|e| enhance_toml_error(e, content))
}

/// Serialize a value to a TOML string
pub fn to_toml<T: Serialize>(value: &T) -> Result<String, TomlError> {
    toml::to_string_pretty(value).map_err(|e| TomlError {
        line: None,
        message: format!("TOML serialization error: {}", e),
    })
}

/// Enhance TOML parsing errors with helpful context
fn enhance_toml_error(error: toml::de::Error, content: &str) -> TomlError {
    let error_msg = error.to_string();

    // Try to extract line number from error message
    let line_hint = error_msg
        .lines()
        .find(|line| line.contains("line "))
        .and_then(|line| {
            line.split("line ")
                .nth(1)
                .and_then(|s| s.split(|c: char| !c.is_ascii_digit()).next())
                .and_then(|s| s.parse::<usize>().ok())
        });

    match line_hint {
        Some(line_num) => TomlError {
            line: Some(line_num),
            message: format!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                get_line_context(content, line_num),
                error_msg
            ),
        },
        None => TomlError {
            line: None,
            message: format!("TOML parsing error: {}", error_msg),
        },
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2).min(lines.len());
    let end = (line_num + 2).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
