//! The store-return form as it travels from the browser to the server.
//!
//! Field names on the wire follow the CSV column names (`CreatedBy`,
//! `ParentCode`, ...). `Quantity` is kept as the raw text the user typed so
//! that a non-numeric entry reaches validation instead of failing JSON
//! decoding.

use serde::{Deserialize, Deserializer, Serialize};

/// One form post: the header fields plus the ordered line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Submission {
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub document_number: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// One line item of a submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Row {
    #[serde(default)]
    pub parent_code: String,
    #[serde(default)]
    pub parent_name: String,
    #[serde(default, deserialize_with = "quantity_text")]
    pub quantity: String,
    #[serde(default)]
    pub damage_reason: String,
}

impl Submission {
    /// Returns a copy with every text field trimmed.
    pub fn normalized(&self) -> Submission {
        Submission {
            created_by: self.created_by.trim().to_string(),
            document_number: self.document_number.trim().to_string(),
            source: self.source.trim().to_string(),
            destination: self.destination.trim().to_string(),
            rows: self.rows.iter().map(Row::normalized).collect(),
        }
    }
}

impl Row {
    pub fn new(parent_code: &str, parent_name: &str, quantity: &str) -> Self {
        Row {
            parent_code: parent_code.to_string(),
            parent_name: parent_name.to_string(),
            quantity: quantity.to_string(),
            damage_reason: String::new(),
        }
    }

    pub fn normalized(&self) -> Row {
        Row {
            parent_code: self.parent_code.trim().to_string(),
            parent_name: self.parent_name.trim().to_string(),
            quantity: self.quantity.trim().to_string(),
            damage_reason: self.damage_reason.trim().to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// Accepts `"5"`, `5`, `5.5` or `null`; everything becomes text and the
/// numeric rules are applied later by validation.
fn quantity_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawQuantity> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawQuantity::Text(s)) => s,
        Some(RawQuantity::Integer(n)) => n.to_string(),
        Some(RawQuantity::Float(f)) => f.to_string(),
        None => String::new(),
    })
}
