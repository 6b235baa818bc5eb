//! Association Data

use crate::domain::associations::records::AssociationUuid;

/// New Association Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssociation {
    /// UUID to assign to the association row.
    pub uuid: AssociationUuid,

    /// Building or association name.
    pub name: String,
}
