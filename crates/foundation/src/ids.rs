/// Generates a fresh identifier for a persisted entry.
///
/// Identity of favorites and history entries is this string; de-duplication is
/// positional and never compares ids.
pub fn new_entry_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::new_entry_id;

    #[test]
    fn ids_are_unique() {
        let a = new_entry_id();
        let b = new_entry_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
