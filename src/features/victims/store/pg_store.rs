use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::VictimStore;
use crate::core::error::{AppError, Result};
use crate::features::victims::models::{NewVictim, Victim, VictimFilter, VictimImage, VictimPatch};

const VICTIM_COLUMNS: &str =
    "id, name, last_name, is_alive, death_type, details, created_at, edited_at";

/// PostgreSQL-backed `VictimStore`
pub struct PgVictimStore {
    pool: PgPool,
}

impl PgVictimStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Eager-load images for a page of victims with one query
    async fn load_images(&self, victims: &mut [Victim]) -> Result<()> {
        if victims.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = victims.iter().map(|v| v.id).collect();
        let images = sqlx::query_as::<_, VictimImage>(
            r#"
            SELECT id, url, victim_id, created_at
            FROM victim_images
            WHERE victim_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load victim images: {:?}", e);
            AppError::Database(e)
        })?;

        let mut by_owner: HashMap<Uuid, Vec<VictimImage>> = HashMap::new();
        for image in images {
            by_owner.entry(image.victim_id).or_default().push(image);
        }
        for victim in victims.iter_mut() {
            victim.images = by_owner.remove(&victim.id).unwrap_or_default();
        }

        Ok(())
    }

    async fn load_one(&self, victim: Option<Victim>) -> Result<Option<Victim>> {
        match victim {
            Some(victim) => {
                let mut victims = [victim];
                self.load_images(&mut victims).await?;
                let [victim] = victims;
                Ok(Some(victim))
            }
            None => Ok(None),
        }
    }

    /// Run the UPDATE for a patch, returning the updated row without images
    async fn update_row(&self, id: Uuid, patch: &VictimPatch) -> Result<Option<Victim>> {
        let sql = format!(
            r#"
            UPDATE victims
            SET death_type = COALESCE($2, death_type),
                details = COALESCE($3, details),
                is_alive = CASE WHEN $4 THEN FALSE ELSE is_alive END,
                edited_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VICTIM_COLUMNS
        );

        sqlx::query_as::<_, Victim>(&sql)
            .bind(id)
            .bind(patch.death_type.as_deref())
            .bind(patch.details.as_deref())
            .bind(patch.mark_dead)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update victim {}: {:?}", id, e);
                AppError::Database(e)
            })
    }
}

#[async_trait]
impl VictimStore for PgVictimStore {
    async fn insert_victim(&self, new_victim: NewVictim) -> Result<Victim> {
        let sql = format!(
            r#"
            INSERT INTO victims (id, name, last_name, death_type, details)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            VICTIM_COLUMNS
        );

        sqlx::query_as::<_, Victim>(&sql)
            .bind(Uuid::now_v7())
            .bind(&new_victim.name)
            .bind(&new_victim.last_name)
            .bind(new_victim.death_type.as_deref())
            .bind(new_victim.details.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(
                    format!(
                        "Victim '{} {}' already exists",
                        new_victim.name, new_victim.last_name
                    ),
                ),
                e => {
                    tracing::error!("Failed to insert victim: {:?}", e);
                    AppError::Database(e)
                }
            })
    }

    async fn insert_image(&self, url: &str, owner_id: Uuid) -> Result<VictimImage> {
        sqlx::query_as::<_, VictimImage>(
            r#"
            INSERT INTO victim_images (url, victim_id)
            VALUES ($1, $2)
            RETURNING id, url, victim_id, created_at
            "#,
        )
        .bind(url)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert image for victim {}: {:?}", owner_id, e);
            AppError::Database(e)
        })
    }

    async fn find_all_victims(
        &self,
        limit: i64,
        offset: i64,
        filter: VictimFilter,
    ) -> Result<Vec<Victim>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM victims
            WHERE ($1::BOOLEAN IS NULL OR is_alive = $1)
            ORDER BY created_at, id
            LIMIT $2 OFFSET $3
            "#,
            VICTIM_COLUMNS
        );

        let mut victims = sqlx::query_as::<_, Victim>(&sql)
            .bind(filter.is_alive)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list victims: {:?}", e);
                AppError::Database(e)
            })?;

        self.load_images(&mut victims).await?;
        Ok(victims)
    }

    async fn find_victim_by_id(&self, id: Uuid) -> Result<Option<Victim>> {
        let sql = format!("SELECT {} FROM victims WHERE id = $1", VICTIM_COLUMNS);

        let victim = sqlx::query_as::<_, Victim>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get victim {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        self.load_one(victim).await
    }

    async fn find_victim_by_full_name(
        &self,
        name: &str,
        last_name: &str,
    ) -> Result<Option<Victim>> {
        let sql = format!(
            "SELECT {} FROM victims WHERE name = $1 AND last_name = $2",
            VICTIM_COLUMNS
        );

        let victim = sqlx::query_as::<_, Victim>(&sql)
            .bind(name)
            .bind(last_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up victim by name: {:?}", e);
                AppError::Database(e)
            })?;

        self.load_one(victim).await
    }

    async fn merge_and_save(&self, id: Uuid, patch: VictimPatch) -> Result<Option<Victim>> {
        if patch.is_empty() {
            return self.find_victim_by_id(id).await;
        }
        let victim = self.update_row(id, &patch).await?;
        self.load_one(victim).await
    }

    async fn delete_image(&self, image: &VictimImage) -> Result<()> {
        sqlx::query("DELETE FROM victim_images WHERE id = $1")
            .bind(image.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete image {}: {:?}", image.id, e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    async fn delete_victim(&self, victim: &Victim) -> Result<()> {
        sqlx::query("DELETE FROM victims WHERE id = $1")
            .bind(victim.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete victim {}: {:?}", victim.id, e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    async fn delete_all_victims(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM victims")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete all victims: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected())
    }

    async fn bulk_update(&self, id: Uuid, patch: VictimPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        self.update_row(id, &patch).await?;
        Ok(())
    }
}
