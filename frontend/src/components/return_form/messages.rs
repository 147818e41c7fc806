use common::requests::SubmitResponse;

#[derive(Clone, Copy, PartialEq)]
pub enum HeaderField {
    CreatedBy,
    DocumentNumber,
    Source,
    Destination,
}

#[derive(Clone, Copy, PartialEq)]
pub enum RowField {
    ParentCode,
    ParentName,
    Quantity,
    DamageReason,
}

impl HeaderField {
    /// Column name, also the word validation messages start with.
    pub fn column(self) -> &'static str {
        match self {
            HeaderField::CreatedBy => "CreatedBy",
            HeaderField::DocumentNumber => "DocumentNumber",
            HeaderField::Source => "Source",
            HeaderField::Destination => "Destination",
        }
    }
}

impl RowField {
    pub fn column(self) -> &'static str {
        match self {
            RowField::ParentCode => "ParentCode",
            RowField::ParentName => "ParentName",
            RowField::Quantity => "Quantity",
            RowField::DamageReason => "DamageReason",
        }
    }
}

pub enum Msg {
    SetHeader(HeaderField, String),
    SetRow(usize, RowField, String),
    AddRow,
    RemoveRow(usize),
    Submit,
    Submitted(Result<SubmitResponse, String>),
    Reset,
}
