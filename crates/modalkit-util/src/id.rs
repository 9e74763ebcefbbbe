//! ULID-based identifier generation with prefixes.
//!
//! Identifiers in modalkit follow the pattern: `prefix_ulid`
//! For example: `view_01hqxyz...` for modal views.

use ulid::Ulid;

/// Known identifier prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    /// A modal view handle.
    View,
    /// One run of an alert/confirm/prompt flow.
    Flow,
}

impl IdPrefix {
    /// Get the string prefix for this identifier type.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::View => "view",
            IdPrefix::Flow => "flw",
        }
    }
}

/// Identifier generation.
pub struct Identifier;

impl Identifier {
    /// Generate a new ascending identifier (newer = larger).
    pub fn ascending(prefix: IdPrefix) -> String {
        format!(
            "{}_{}",
            prefix.as_str(),
            Ulid::new().to_string().to_lowercase()
        )
    }

    /// Generate a view ID.
    pub fn view() -> String {
        Self::ascending(IdPrefix::View)
    }

    /// Generate a flow ID.
    pub fn flow() -> String {
        Self::ascending(IdPrefix::Flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_id() {
        let id = Identifier::view();
        assert!(id.starts_with("view_"));
        assert_eq!(id.len(), 31); // "view_" (5) + ULID (26)
        assert_eq!(id, id.to_lowercase());
    }

    #[test]
    fn test_flow_id() {
        let id = Identifier::flow();
        let ulid = id.strip_prefix("flw_").unwrap();
        assert!(Ulid::from_string(ulid).is_ok());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Identifier::view();
        let b = Identifier::view();
        assert_ne!(a, b);
    }
}
