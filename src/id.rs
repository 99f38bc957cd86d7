//! Identifiers for stored records.

use uuid::Uuid;

/// Generate a random version 4 UUID in its hyphenated, lowercase text form,
/// e.g. `"67e55044-10b1-426f-9247-bb680e5fe0c8"`.
pub fn generate_id() -> String {
    Uuid::new_v4().hyphenated().to_string()
}
