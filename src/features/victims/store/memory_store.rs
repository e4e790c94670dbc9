use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::VictimStore;
use crate::core::error::{AppError, Result};
use crate::features::victims::models::{NewVictim, Victim, VictimFilter, VictimImage, VictimPatch};

#[derive(Default)]
struct Tables {
    victims: HashMap<Uuid, Victim>,
    next_image_id: i64,
}

/// Process-local `VictimStore`
///
/// Images are kept inline on each victim, so deleting a victim drops its
/// images with it.
#[derive(Default)]
pub struct InMemoryVictimStore {
    tables: RwLock<Tables>,
}

impl InMemoryVictimStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a fully-formed victim, bypassing normalization and timestamps
    #[cfg(test)]
    pub async fn seed(&self, victim: Victim) {
        let mut tables = self.tables.write().await;
        let max_image = victim.images.iter().map(|i| i.id).max().unwrap_or(0);
        tables.next_image_id = tables.next_image_id.max(max_image);
        tables.victims.insert(victim.id, victim);
    }
}

#[async_trait]
impl VictimStore for InMemoryVictimStore {
    async fn insert_victim(&self, new_victim: NewVictim) -> Result<Victim> {
        let mut tables = self.tables.write().await;

        let duplicate = tables
            .victims
            .values()
            .any(|v| v.name == new_victim.name && v.last_name == new_victim.last_name);
        if duplicate {
            return Err(AppError::Conflict(format!(
                "Victim '{} {}' already exists",
                new_victim.name, new_victim.last_name
            )));
        }

        let victim = Victim {
            id: Uuid::now_v7(),
            name: new_victim.name,
            last_name: new_victim.last_name,
            is_alive: true,
            death_type: new_victim.death_type,
            details: new_victim.details,
            created_at: Utc::now(),
            edited_at: None,
            images: Vec::new(),
        };
        tables.victims.insert(victim.id, victim.clone());

        Ok(victim)
    }

    async fn insert_image(&self, url: &str, owner_id: Uuid) -> Result<VictimImage> {
        let mut tables = self.tables.write().await;
        tables.next_image_id += 1;
        let id = tables.next_image_id;

        let owner = tables.victims.get_mut(&owner_id).ok_or_else(|| {
            AppError::Internal(format!("Image owner {} does not exist", owner_id))
        })?;

        let image = VictimImage {
            id,
            url: url.to_string(),
            victim_id: owner_id,
            created_at: Utc::now(),
        };
        owner.images.push(image.clone());

        Ok(image)
    }

    async fn find_all_victims(
        &self,
        limit: i64,
        offset: i64,
        filter: VictimFilter,
    ) -> Result<Vec<Victim>> {
        let tables = self.tables.read().await;

        let mut victims: Vec<&Victim> = tables
            .victims
            .values()
            .filter(|v| filter.matches(v))
            .collect();
        victims.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(victims
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find_victim_by_id(&self, id: Uuid) -> Result<Option<Victim>> {
        Ok(self.tables.read().await.victims.get(&id).cloned())
    }

    async fn find_victim_by_full_name(
        &self,
        name: &str,
        last_name: &str,
    ) -> Result<Option<Victim>> {
        let tables = self.tables.read().await;
        Ok(tables
            .victims
            .values()
            .find(|v| v.name == name && v.last_name == last_name)
            .cloned())
    }

    async fn merge_and_save(&self, id: Uuid, patch: VictimPatch) -> Result<Option<Victim>> {
        let mut tables = self.tables.write().await;
        Ok(tables.victims.get_mut(&id).map(|victim| {
            patch.apply(victim, Utc::now());
            victim.clone()
        }))
    }

    async fn delete_image(&self, image: &VictimImage) -> Result<()> {
        if let Some(owner) = self.tables.write().await.victims.get_mut(&image.victim_id) {
            owner.images.retain(|i| i.id != image.id);
        }
        Ok(())
    }

    async fn delete_victim(&self, victim: &Victim) -> Result<()> {
        self.tables.write().await.victims.remove(&victim.id);
        Ok(())
    }

    async fn delete_all_victims(&self) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let affected = tables.victims.len() as u64;
        tables.victims.clear();
        Ok(affected)
    }

    async fn bulk_update(&self, id: Uuid, patch: VictimPatch) -> Result<()> {
        if let Some(victim) = self.tables.write().await.victims.get_mut(&id) {
            patch.apply(victim, Utc::now());
        }
        Ok(())
    }
}
