use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Validation failed: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),

    #[error("Sign-in required")]
    Unauthenticated,

    #[error("Not permitted: {0}")]
    Forbidden(&'static str),

    #[error("Sighting not found: {0}")]
    NotFound(String),

    #[error("Data service error: {0}")]
    Backend(#[from] anyhow::Error),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_every_issue() {
        let err = BoardError::Validation(vec![
            ValidationIssue::new("region_name", "Location is required"),
            ValidationIssue::new("date", "Observation date is required"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: region_name: Location is required; date: Observation date is required"
        );
    }
}
