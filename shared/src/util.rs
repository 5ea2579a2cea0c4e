//! Record id helpers

use uuid::Uuid;

/// Generate a new record id (UUID v4, hyphenated).
///
/// Used for orders, categories and products alike.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Whether `s` has the shape of a record id.
///
/// Only the format is checked, not existence.
pub fn is_record_id(s: &str) -> bool {
    Uuid::parse_str(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_id_is_record_id() {
        let id = new_record_id();
        assert!(is_record_id(&id));
        assert_ne!(id, new_record_id());
    }

    #[test]
    fn test_is_record_id_rejects_free_text() {
        assert!(!is_record_id("combo-7"));
        assert!(!is_record_id(""));
        assert!(!is_record_id("ORD0001"));
    }
}
