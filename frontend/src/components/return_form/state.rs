//! Component state for the store-return form.

use common::model::submission::{Row, Submission};
use common::requests::SubmitResponse;

use super::messages::{HeaderField, RowField};

/// Main state container for the `ReturnFormComponent`.
///
/// Fields are `pub` because they are accessed by `view` and `update` modules.
pub struct ReturnFormComponent {
    /// What the user has typed so far, untrimmed.
    pub submission: Submission,

    /// Messages from the last client-side check or server rejection.
    pub errors: Vec<String>,

    /// Last server answer, kept to show the success banner.
    pub outcome: Option<SubmitResponse>,

    /// True while a POST is in flight; blocks double submission.
    pub submitting: bool,
}

impl ReturnFormComponent {
    /// An empty form with one blank row ready for input.
    pub fn new() -> Self {
        Self {
            submission: Submission {
                rows: vec![Row::default()],
                ..Submission::default()
            },
            errors: Vec::new(),
            outcome: None,
            submitting: false,
        }
    }

    pub fn header_value(&self, field: HeaderField) -> &str {
        match field {
            HeaderField::CreatedBy => &self.submission.created_by,
            HeaderField::DocumentNumber => &self.submission.document_number,
            HeaderField::Source => &self.submission.source,
            HeaderField::Destination => &self.submission.destination,
        }
    }

    pub fn set_header(&mut self, field: HeaderField, value: String) {
        match field {
            HeaderField::CreatedBy => self.submission.created_by = value,
            HeaderField::DocumentNumber => self.submission.document_number = value,
            HeaderField::Source => self.submission.source = value,
            HeaderField::Destination => self.submission.destination = value,
        }
    }

    pub fn set_row(&mut self, idx: usize, field: RowField, value: String) {
        if let Some(row) = self.submission.rows.get_mut(idx) {
            match field {
                RowField::ParentCode => row.parent_code = value,
                RowField::ParentName => row.parent_name = value,
                RowField::Quantity => row.quantity = value,
                RowField::DamageReason => row.damage_reason = value,
            }
        }
    }

    pub fn header_has_error(&self, field: HeaderField) -> bool {
        let prefix = format!("{} ", field.column());
        self.errors.iter().any(|e| e.starts_with(&prefix))
    }

    /// `number` is the 1-based row position used in messages.
    pub fn row_has_error(&self, number: usize, field: RowField) -> bool {
        let prefix = format!("Row {}: {} ", number, field.column());
        self.errors.iter().any(|e| e.starts_with(&prefix))
    }
}
