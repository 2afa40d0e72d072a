use uuid::Uuid;

/// Returns a new opaque identifier.
///
/// Identifiers are unique within the process. Callers must not rely on
/// their length, ordering or content.
pub fn new_id() -> String {
    Uuid::now_v7().simple().to_string()
}
