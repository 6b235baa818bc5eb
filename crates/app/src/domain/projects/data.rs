//! Projects Data

use jiff::civil::Date;

use crate::domain::{
    projects::records::{AttachmentUuid, ProjectUuid, QuotationUuid},
    users::UserUuid,
};

/// New Project Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub uuid: ProjectUuid,
    pub name: String,
    pub description: String,
    pub owner: UserUuid,
    pub budget: u64,
    pub due_date: Date,
}

/// New Attachment Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttachment {
    pub uuid: AttachmentUuid,
    pub file_name: String,

    /// Location of the already stored file.
    pub storage_path: String,
}

/// New Quotation Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuotation {
    pub uuid: QuotationUuid,
    pub provider: String,
    pub submitted_by: UserUuid,
    pub price: u64,
    pub attachment_path: Option<String>,
}
