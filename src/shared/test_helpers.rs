use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::victims::dtos::CreateVictimDto;
use crate::features::victims::models::{
    NewVictim, Victim, VictimFilter, VictimImage, VictimPatch,
};
use crate::features::victims::store::{InMemoryVictimStore, VictimStore};

pub fn create_victim_dto(name: &str, last_name: &str, images: &[&str]) -> CreateVictimDto {
    CreateVictimDto {
        name: name.to_string(),
        last_name: last_name.to_string(),
        death_type: None,
        details: None,
        images: images.iter().map(|s| s.to_string()).collect(),
    }
}

/// A living victim created `age_secs` before `now`
pub fn victim_created_ago(
    now: DateTime<Utc>,
    age_secs: i64,
    death_type: &str,
    image_urls: &[&str],
) -> Victim {
    let id = Uuid::new_v4();
    let created_at = now - Duration::seconds(age_secs);
    Victim {
        id,
        name: format!("VICTIM-{}", id.simple()),
        last_name: "DOE".to_string(),
        is_alive: true,
        death_type: Some(death_type.to_string()),
        details: None,
        created_at,
        edited_at: None,
        images: image_urls
            .iter()
            .enumerate()
            .map(|(i, url)| VictimImage {
                id: i as i64 + 1,
                url: url.to_string(),
                victim_id: id,
                created_at,
            })
            .collect(),
    }
}

/// In-memory store that records writes and can be told to fail some of them
#[derive(Default)]
pub struct RecordingStore {
    pub inner: InMemoryVictimStore,
    pub bulk_updates: Mutex<Vec<(Uuid, VictimPatch)>>,
    pub failing_updates: Mutex<HashSet<Uuid>>,
    /// 1-based index of the image insert that fails; `Some(1)` fails the first
    pub fail_image_insert_at: Option<usize>,
    pub image_inserts: AtomicUsize,
    pub fail_reads: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_update_for(&self, id: Uuid) {
        self.failing_updates.lock().unwrap().insert(id);
    }

    pub fn recorded_updates(&self) -> Vec<(Uuid, VictimPatch)> {
        self.bulk_updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl VictimStore for RecordingStore {
    async fn insert_victim(&self, new_victim: NewVictim) -> Result<Victim> {
        self.inner.insert_victim(new_victim).await
    }

    async fn insert_image(&self, url: &str, owner_id: Uuid) -> Result<VictimImage> {
        let attempt = self.image_inserts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_image_insert_at == Some(attempt) {
            return Err(AppError::Internal("image insert failed".to_string()));
        }
        self.inner.insert_image(url, owner_id).await
    }

    async fn find_all_victims(
        &self,
        limit: i64,
        offset: i64,
        filter: VictimFilter,
    ) -> Result<Vec<Victim>> {
        if self.fail_reads {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.find_all_victims(limit, offset, filter).await
    }

    async fn find_victim_by_id(&self, id: Uuid) -> Result<Option<Victim>> {
        self.inner.find_victim_by_id(id).await
    }

    async fn find_victim_by_full_name(
        &self,
        name: &str,
        last_name: &str,
    ) -> Result<Option<Victim>> {
        self.inner.find_victim_by_full_name(name, last_name).await
    }

    async fn merge_and_save(&self, id: Uuid, patch: VictimPatch) -> Result<Option<Victim>> {
        self.inner.merge_and_save(id, patch).await
    }

    async fn delete_image(&self, image: &VictimImage) -> Result<()> {
        self.inner.delete_image(image).await
    }

    async fn delete_victim(&self, victim: &Victim) -> Result<()> {
        self.inner.delete_victim(victim).await
    }

    async fn delete_all_victims(&self) -> Result<u64> {
        self.inner.delete_all_victims().await
    }

    async fn bulk_update(&self, id: Uuid, patch: VictimPatch) -> Result<()> {
        if self.failing_updates.lock().unwrap().contains(&id) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        self.bulk_updates.lock().unwrap().push((id, patch.clone()));
        self.inner.bulk_update(id, patch).await
    }
}
