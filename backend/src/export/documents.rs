//! Builds the two CSV documents produced for every accepted submission.
//!
//! Both documents share the same ten summary columns; the damage document adds
//! `DamageReason`. Bytes start with a UTF-8 BOM so Excel detects the encoding.

use crate::error::ExportError;
use chrono::{DateTime, Utc};
use common::model::submission::Submission;
use common::validation::parse_quantity;

pub const COLUMNS: [&str; 10] = [
    "Sno",
    "CreatedDate",
    "CreatedBy",
    "DocumentNumber",
    "ParentCode",
    "ParentName",
    "TransactionType",
    "Quantity",
    "Source",
    "Destination",
];

pub const DAMAGE_COLUMNS: [&str; 1] = ["DamageReason"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// `STORE_RETURN…`: summary of every returned item.
    Return,
    /// `STORE_RET_DAMAGE…`: the same items with the damage detail columns.
    Damage,
}

impl ExportKind {
    pub const ALL: [ExportKind; 2] = [ExportKind::Return, ExportKind::Damage];

    pub fn prefix(self) -> &'static str {
        match self {
            ExportKind::Return => "STORE_RETURN",
            ExportKind::Damage => "STORE_RET_DAMAGE",
        }
    }

    pub fn transaction_type(self) -> &'static str {
        match self {
            ExportKind::Return => "Return",
            ExportKind::Damage => "Damage",
        }
    }

    pub fn header(self) -> Vec<&'static str> {
        let mut header = COLUMNS.to_vec();
        if self == ExportKind::Damage {
            header.extend(DAMAGE_COLUMNS);
        }
        header
    }

    pub fn file_name(self, now: DateTime<Utc>) -> String {
        format!("{}{}.CSV", self.prefix(), timestamp(now))
    }
}

/// `YYMMDDhhmmss`, always 12 digits.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.format("%y%m%d%H%M%S").to_string()
}

#[derive(Debug, Clone)]
pub struct CsvDocument {
    pub kind: ExportKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Encodes one document. `submission` must already be validated and trimmed.
pub fn build_document(
    kind: ExportKind,
    submission: &Submission,
    now: DateTime<Utc>,
) -> Result<CsvDocument, ExportError> {
    let created_date = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(kind.header())?;
    for (idx, row) in submission.rows.iter().enumerate() {
        let quantity = parse_quantity(&row.quantity)
            .map(|q| q.to_string())
            .unwrap_or_default();
        let sno = (idx + 1).to_string();
        let mut record = vec![
            sno.as_str(),
            created_date.as_str(),
            submission.created_by.as_str(),
            submission.document_number.as_str(),
            row.parent_code.as_str(),
            row.parent_name.as_str(),
            kind.transaction_type(),
            quantity.as_str(),
            submission.source.as_str(),
            submission.destination.as_str(),
        ];
        if kind == ExportKind::Damage {
            record.push(row.damage_reason.as_str());
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Storage(e.into_error()))?;
    Ok(CsvDocument {
        kind,
        file_name: kind.file_name(now),
        bytes,
    })
}

/// The return document followed by the damage document.
pub fn build_documents(
    submission: &Submission,
    now: DateTime<Utc>,
) -> Result<Vec<CsvDocument>, ExportError> {
    ExportKind::ALL
        .iter()
        .map(|kind| build_document(*kind, submission, now))
        .collect()
}
