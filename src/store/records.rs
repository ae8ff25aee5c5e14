//! Record store wire types
//!
//! Serde shapes exchanged with the external record store. Field names match
//! the store's JSON contract; everything here is plain data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Site vertical. The set is closed: vocabulary pools and identity pools are
/// keyed by it, so an unknown tag means the entity is skipped, not guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hosting,
    Vpn,
    Antivirus,
}

impl Category {
    /// Parse the free-form category tag carried on a site record.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "hosting" => Some(Self::Hosting),
            "vpn" => Some(Self::Vpn),
            "antivirus" => Some(Self::Antivirus),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hosting => "hosting",
            Self::Vpn => "vpn",
            Self::Antivirus => "antivirus",
        }
    }
}

/// A site record as returned by the record store.
///
/// Read-only here except for the ledger field, which the scheduler rewrites
/// through `update_ledger_field`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityRecord {
    pub id: String,

    /// Category tag, parsed via [`Category::from_tag`]
    pub category: String,

    /// Quality tier string, classified via `QualityTier::classify`
    #[serde(default)]
    pub quality_tier: String,

    /// Seed reviews posted so far (maintained by the store)
    #[serde(default)]
    pub review_count: u32,

    /// Opaque repetition-ledger field
    #[serde(default)]
    pub ledger: String,
}

/// A review to be created in the record store.
#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    pub entity_id: String,
    pub rating: u8,
    pub title: String,
    pub body: String,
    pub username: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_tag() {
        assert_eq!(Category::from_tag("hosting"), Some(Category::Hosting));
        assert_eq!(Category::from_tag(" VPN "), Some(Category::Vpn));
        assert_eq!(Category::from_tag("Antivirus"), Some(Category::Antivirus));
        assert_eq!(Category::from_tag("casino"), None);
        assert_eq!(Category::from_tag(""), None);
    }

    #[test]
    fn test_entity_record_defaults() {
        let record: EntityRecord =
            serde_json::from_str(r#"{"id": "site-1", "category": "vpn"}"#).unwrap();
        assert_eq!(record.id, "site-1");
        assert_eq!(record.review_count, 0);
        assert!(record.quality_tier.is_empty());
        assert!(record.ledger.is_empty());
    }
}
