//! Sort keys shared by document and paraphrase listings.

use crate::wire_enum::wire_enum;

wire_enum! {
    /// Field a document or paraphrase listing is ordered by.
    pub enum SortField {
        /// Identifier order.
        Id => "id",
        /// Last modification time.
        ModifiedAt => "modified_at",
    }
}
