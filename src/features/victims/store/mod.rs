//! Persistence contract for victims and their evidence images.
//!
//! The service and the death sweeper only ever talk to a `dyn VictimStore`;
//! `PgVictimStore` is the production backend and `InMemoryVictimStore` backs
//! tests and local runs without a database.

mod memory_store;
mod pg_store;

pub use memory_store::InMemoryVictimStore;
pub use pg_store::PgVictimStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::victims::models::{NewVictim, Victim, VictimFilter, VictimImage, VictimPatch};

#[async_trait]
pub trait VictimStore: Send + Sync {
    /// Insert a victim row, alive and without images
    async fn insert_victim(&self, new_victim: NewVictim) -> Result<Victim>;

    /// Insert one image owned by `owner_id`
    async fn insert_image(&self, url: &str, owner_id: Uuid) -> Result<VictimImage>;

    /// List victims ordered by `created_at, id` with images loaded
    async fn find_all_victims(
        &self,
        limit: i64,
        offset: i64,
        filter: VictimFilter,
    ) -> Result<Vec<Victim>>;

    async fn find_victim_by_id(&self, id: Uuid) -> Result<Option<Victim>>;

    /// Lookup by normalized full name, used for the roster uniqueness check
    async fn find_victim_by_full_name(&self, name: &str, last_name: &str)
        -> Result<Option<Victim>>;

    /// Apply `patch` and return the stored result, `None` when `id` does not exist
    async fn merge_and_save(&self, id: Uuid, patch: VictimPatch) -> Result<Option<Victim>>;

    /// Delete a single image row
    async fn delete_image(&self, image: &VictimImage) -> Result<()>;

    /// Delete a victim and, by cascade, its images
    async fn delete_victim(&self, victim: &Victim) -> Result<()>;

    /// Delete every victim, returning the number of rows removed
    async fn delete_all_victims(&self) -> Result<u64>;

    /// Fire-and-forget partial update keyed by id; a missing id is not an error
    async fn bulk_update(&self, id: Uuid, patch: VictimPatch) -> Result<()>;
}
