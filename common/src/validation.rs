//! Required-field rules for a [`Submission`].
//!
//! `validate` never stops at the first problem: the caller gets one message
//! per failing field, header fields first and then rows in input order, so the
//! form can show the complete list with row numbers.

use crate::model::submission::{Row, Submission};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NO_ROWS_MESSAGE: &str = "At least one row is required";

/// The complete, ordered list of problems found in a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parses a quantity as typed by the user.
///
/// Blank, non-numeric, negative and zero values all yield `None`.
pub fn parse_quantity(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|q| *q >= 1)
}

pub fn validate(submission: &Submission) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("CreatedBy", &submission.created_by),
        ("Source", &submission.source),
        ("Destination", &submission.destination),
    ] {
        if is_blank(value) {
            errors.push(format!("{} is required", field));
        }
    }

    if submission.rows.is_empty() {
        errors.push(NO_ROWS_MESSAGE.to_string());
    }

    for (idx, row) in submission.rows.iter().enumerate() {
        errors.extend(validate_row(idx + 1, row));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Checks a single row; `number` is the 1-based position used in messages.
pub fn validate_row(number: usize, row: &Row) -> Vec<String> {
    let mut errors = Vec::new();
    if is_blank(&row.parent_code) {
        errors.push(format!("Row {}: ParentCode is required", number));
    }
    if is_blank(&row.parent_name) {
        errors.push(format!("Row {}: ParentName is required", number));
    }
    if parse_quantity(&row.quantity).is_none() {
        errors.push(format!(
            "Row {}: Quantity is required and must be ≥ 1",
            number
        ));
    }
    errors
}
