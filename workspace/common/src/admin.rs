use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Tabular list view of one entity, as shown in the management console.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ChangeListDto {
    /// Resource name, e.g. `activities`
    pub entity: String,
    /// Column headers in display order
    pub columns: Vec<String>,
    /// One row per record, cells aligned with `columns`
    pub rows: Vec<Vec<String>>,
}
