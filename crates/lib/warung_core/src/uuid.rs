// Identifier generation.
//
// Orders, users and menu rows all carry opaque string ids. We generate
// UUIDv7 app-side so that transaction ids sort by creation time.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Generate a new opaque identifier string.
pub fn generate_id() -> String {
    uuidv7().to_string()
}
