use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::victims::models::{Victim, VictimFilter};
use crate::shared::validation::{validate_image_urls, PERSON_NAME_REGEX};

/// Request DTO for creating a victim
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVictimDto {
    /// First name
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        regex(path = *PERSON_NAME_REGEX, message = "Name contains invalid characters")
    )]
    #[schema(example = "John")]
    pub name: String,

    /// Last name
    #[validate(
        length(min = 1, max = 100, message = "Last name must be 1-100 characters"),
        regex(path = *PERSON_NAME_REGEX, message = "Last name contains invalid characters")
    )]
    #[schema(example = "Doe")]
    pub last_name: String,

    /// Optional cause of death
    #[validate(length(min = 1, max = 100, message = "Death type must be 1-100 characters"))]
    #[schema(example = "Heart Attack")]
    pub death_type: Option<String>,

    /// Optional elaboration on the death
    #[validate(length(max = 2000, message = "Details must not exceed 2000 characters"))]
    pub details: Option<String>,

    /// Evidence image URLs, kept in the given order
    #[serde(default)]
    #[validate(custom(function = "validate_image_urls"))]
    #[schema(example = json!(["/static/products/00db3e43-abb2-42b8-a80d-12cdc6b1a3ea.jpeg"]))]
    pub images: Vec<String>,
}

/// Request DTO for changing the cause of death
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeathTypeDto {
    #[validate(length(min = 1, max = 100, message = "Death type must be 1-100 characters"))]
    #[schema(example = "Heart Attack")]
    pub death_type: String,
}

/// Request DTO for changing the death details
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailsDto {
    #[validate(length(min = 1, max = 2000, message = "Details must be 1-2000 characters"))]
    pub details: String,
}

/// Request DTO for attaching evidence images to an existing victim
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddVictimImagesDto {
    #[validate(
        length(min = 1, message = "At least one image URL is required"),
        custom(function = "validate_image_urls")
    )]
    pub images: Vec<String>,
}

/// Query params for listing victims
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListVictimsQuery {
    /// Only return victims in this state
    pub is_alive: Option<bool>,
}

impl From<ListVictimsQuery> for VictimFilter {
    fn from(q: ListVictimsQuery) -> Self {
        Self {
            is_alive: q.is_alive,
        }
    }
}

/// Response DTO for victim, images flattened to their URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VictimResponseDto {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub is_alive: bool,
    pub death_type: Option<String>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub images: Vec<String>,
}

impl From<Victim> for VictimResponseDto {
    fn from(v: Victim) -> Self {
        Self {
            id: v.id,
            name: v.name,
            last_name: v.last_name,
            is_alive: v.is_alive,
            death_type: v.death_type,
            details: v.details,
            created_at: v.created_at,
            edited_at: v.edited_at,
            images: v.images.into_iter().map(|image| image.url).collect(),
        }
    }
}

/// Response DTO for bulk deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteAllResponseDto {
    pub affected: u64,
}
