use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::victims::dtos::{
    AddVictimImagesDto, CreateVictimDto, DeleteAllResponseDto, UpdateDeathTypeDto,
    UpdateDetailsDto, VictimResponseDto,
};
use crate::features::victims::models::{NewVictim, Victim, VictimFilter, VictimPatch};
use crate::features::victims::store::VictimStore;
use crate::shared::constants::MAX_NAME_LENGTH;
use crate::shared::types::PaginationQuery;

/// Service for victim CRUD operations
pub struct VictimService {
    store: Arc<dyn VictimStore>,
}

impl VictimService {
    pub fn new(store: Arc<dyn VictimStore>) -> Self {
        Self { store }
    }

    /// Create a victim and its evidence images
    ///
    /// Image rows are inserted in input order. If one of them fails the victim
    /// row is deleted again so no half-created record is left behind.
    pub async fn create(&self, dto: CreateVictimDto) -> Result<VictimResponseDto> {
        let new_victim = NewVictim::new(&dto.name, &dto.last_name, dto.death_type, dto.details);

        // Upper-casing can lengthen a name ("ß" -> "SS")
        for (field, value) in [
            ("name", &new_victim.name),
            ("lastName", &new_victim.last_name),
        ] {
            if value.chars().count() > MAX_NAME_LENGTH {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    field, MAX_NAME_LENGTH
                )));
            }
        }

        if self
            .store
            .find_victim_by_full_name(&new_victim.name, &new_victim.last_name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Victim '{} {}' already exists",
                new_victim.name, new_victim.last_name
            )));
        }

        let mut victim = self.store.insert_victim(new_victim).await?;

        for url in &dto.images {
            match self.store.insert_image(url, victim.id).await {
                Ok(image) => victim.images.push(image),
                Err(e) => {
                    tracing::error!(
                        "Failed to attach image to new victim {}, rolling back: {:?}",
                        victim.id,
                        e
                    );
                    if let Err(cleanup) = self.store.delete_victim(&victim).await {
                        tracing::error!(
                            "Failed to roll back victim {}: {:?}",
                            victim.id,
                            cleanup
                        );
                    }
                    return Err(e);
                }
            }
        }

        tracing::info!(
            "Victim created: id={}, name={}, images={}",
            victim.id,
            victim.full_name(),
            victim.images.len()
        );

        Ok(victim.into())
    }

    /// List victims page by page
    pub async fn find_all(
        &self,
        pagination: PaginationQuery,
        filter: VictimFilter,
    ) -> Result<Vec<VictimResponseDto>> {
        let victims = self
            .store
            .find_all_victims(pagination.limit(), pagination.offset(), filter)
            .await?;

        Ok(victims.into_iter().map(|v| v.into()).collect())
    }

    /// One page of living victims, the read side of the death sweep
    pub async fn find_alive_batch(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VictimResponseDto>> {
        let victims = self
            .store
            .find_all_victims(limit, offset, VictimFilter::alive())
            .await?;

        Ok(victims.into_iter().map(|v| v.into()).collect())
    }

    /// Get the stored victim entity by id
    pub async fn find_one(&self, id: Uuid) -> Result<Victim> {
        self.store
            .find_victim_by_id(id)
            .await?
            .ok_or_else(|| AppError::victim_not_found(id))
    }

    /// Get a victim by id with images flattened to URLs
    pub async fn find_one_plain(&self, id: Uuid) -> Result<VictimResponseDto> {
        Ok(self.find_one(id).await?.into())
    }

    pub async fn update_death_type(
        &self,
        id: Uuid,
        dto: UpdateDeathTypeDto,
    ) -> Result<VictimResponseDto> {
        let victim = self.merge(id, VictimPatch::death_type(dto.death_type)).await?;

        tracing::info!(
            "Victim death type updated: id={}, death_type={:?}",
            victim.id,
            victim.death_type
        );

        Ok(victim)
    }

    pub async fn update_details(
        &self,
        id: Uuid,
        dto: UpdateDetailsDto,
    ) -> Result<VictimResponseDto> {
        let victim = self.merge(id, VictimPatch::details(dto.details)).await?;

        tracing::info!("Victim details updated: id={}", victim.id);

        Ok(victim)
    }

    /// Attach evidence images to an existing victim
    ///
    /// All or nothing: when one insert fails the images added by this call
    /// are deleted again and the victim is left untouched.
    pub async fn add_images(&self, id: Uuid, dto: AddVictimImagesDto) -> Result<VictimResponseDto> {
        let victim = self.find_one(id).await?;

        let mut inserted = Vec::with_capacity(dto.images.len());
        for url in &dto.images {
            match self.store.insert_image(url, victim.id).await {
                Ok(image) => inserted.push(image),
                Err(e) => {
                    tracing::error!(
                        "Failed to attach image to victim {}, rolling back {} image(s): {:?}",
                        victim.id,
                        inserted.len(),
                        e
                    );
                    for image in &inserted {
                        if let Err(cleanup) = self.store.delete_image(image).await {
                            tracing::error!(
                                "Failed to roll back image {} of victim {}: {:?}",
                                image.id,
                                victim.id,
                                cleanup
                            );
                        }
                    }
                    return Err(e);
                }
            }
        }

        let victim = self.merge(id, VictimPatch::touch()).await?;

        tracing::info!(
            "Evidence attached: id={}, added={}, total={}",
            victim.id,
            inserted.len(),
            victim.images.len()
        );

        Ok(victim)
    }

    /// Delete a victim together with its images
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let victim = self.find_one(id).await?;
        self.store.delete_victim(&victim).await?;

        tracing::info!("Victim removed: id={}, name={}", victim.id, victim.full_name());

        Ok(())
    }

    pub async fn delete_all(&self) -> Result<DeleteAllResponseDto> {
        let affected = self.store.delete_all_victims().await?;

        tracing::warn!("All victims deleted: affected={}", affected);

        Ok(DeleteAllResponseDto { affected })
    }

    async fn merge(&self, id: Uuid, patch: VictimPatch) -> Result<VictimResponseDto> {
        self.store
            .merge_and_save(id, patch)
            .await?
            .map(|v| v.into())
            .ok_or_else(|| AppError::victim_not_found(id))
    }
}
