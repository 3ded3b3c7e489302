//! Configuration loading and validation errors.

use std::path::PathBuf;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid configuration:\n{}", render_validation_errors(.0))]
    Validation(#[source] ValidationErrors),

    #[error("Configuration parsing error: {0}")]
    Parsing(#[from] figment::Error),

    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}

/// Renders one line per offending field, sorted so the output is stable
/// across runs.
fn render_validation_errors(errors: &ValidationErrors) -> String {
    use std::fmt::Write;

    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut output = String::new();
    for (field, field_errors) in fields {
        for error in field_errors {
            let reason = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            let _ = writeln!(output, "  {}: {}", field, reason);
        }
    }
    output
}
