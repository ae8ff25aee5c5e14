//! Record store collaborator
//!
//! The external store owns site records, their review collections, and the
//! opaque ledger field. This module defines the narrow contract the
//! scheduler needs and an HTTP implementation of it; tests substitute an
//! in-memory mock.

pub mod http;
pub mod records;

use async_trait::async_trait;

use crate::types::Result;
use records::{EntityRecord, NewReview};

pub use http::{HttpRecordStore, StoreConfig};

/// The scheduler's view of the external record store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All approved site records with category, tier, count, and ledger.
    async fn list_eligible_entities(&self) -> Result<Vec<EntityRecord>>;

    /// Star values of reviews already posted against one site.
    async fn list_ratings_for_entity(&self, entity_id: &str) -> Result<Vec<u8>>;

    /// Create a review; returns the store-assigned review id.
    async fn create_review(&self, review: &NewReview) -> Result<String>;

    /// Persist a rewritten ledger string on the site record.
    async fn update_ledger_field(&self, entity_id: &str, ledger: &str) -> Result<()>;
}
