use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath};
use crate::features::victims::dtos::{
    AddVictimImagesDto, CreateVictimDto, DeleteAllResponseDto, ListVictimsQuery,
    UpdateDeathTypeDto, UpdateDetailsDto, VictimResponseDto,
};
use crate::features::victims::services::VictimService;
use crate::shared::types::{ApiResponse, PaginationQuery};

/// Create a victim
#[utoipa::path(
    post,
    path = "/api/victims",
    request_body = CreateVictimDto,
    responses(
        (status = 201, description = "Victim created", body = ApiResponse<VictimResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "A victim with the same full name already exists")
    ),
    tag = "victims"
)]
pub async fn create_victim(
    State(service): State<Arc<VictimService>>,
    AppJson(dto): AppJson<CreateVictimDto>,
) -> Result<(StatusCode, Json<ApiResponse<VictimResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let victim = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(victim), None, None)),
    ))
}

/// List victims
#[utoipa::path(
    get,
    path = "/api/victims",
    params(PaginationQuery, ListVictimsQuery),
    responses(
        (status = 200, description = "List of victims", body = ApiResponse<Vec<VictimResponseDto>>),
    ),
    tag = "victims"
)]
pub async fn list_victims(
    State(service): State<Arc<VictimService>>,
    Query(pagination): Query<PaginationQuery>,
    Query(query): Query<ListVictimsQuery>,
) -> Result<Json<ApiResponse<Vec<VictimResponseDto>>>> {
    let victims = service.find_all(pagination, query.into()).await?;
    Ok(Json(ApiResponse::success(Some(victims), None, None)))
}

/// Get a victim by id
#[utoipa::path(
    get,
    path = "/api/victims/{id}",
    params(
        ("id" = Uuid, Path, description = "Victim ID")
    ),
    responses(
        (status = 200, description = "Victim found", body = ApiResponse<VictimResponseDto>),
        (status = 404, description = "Victim not found")
    ),
    tag = "victims"
)]
pub async fn get_victim(
    State(service): State<Arc<VictimService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<VictimResponseDto>>> {
    let victim = service.find_one_plain(id).await?;
    Ok(Json(ApiResponse::success(Some(victim), None, None)))
}

/// Change a victim's cause of death
#[utoipa::path(
    patch,
    path = "/api/victims/{id}/death-type",
    params(
        ("id" = Uuid, Path, description = "Victim ID")
    ),
    request_body = UpdateDeathTypeDto,
    responses(
        (status = 200, description = "Death type updated", body = ApiResponse<VictimResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Victim not found")
    ),
    tag = "victims"
)]
pub async fn update_death_type(
    State(service): State<Arc<VictimService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<UpdateDeathTypeDto>,
) -> Result<Json<ApiResponse<VictimResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let victim = service.update_death_type(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(victim), None, None)))
}

/// Change the free-form details of a victim's death
#[utoipa::path(
    patch,
    path = "/api/victims/{id}/details",
    params(
        ("id" = Uuid, Path, description = "Victim ID")
    ),
    request_body = UpdateDetailsDto,
    responses(
        (status = 200, description = "Details updated", body = ApiResponse<VictimResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Victim not found")
    ),
    tag = "victims"
)]
pub async fn update_details(
    State(service): State<Arc<VictimService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<UpdateDetailsDto>,
) -> Result<Json<ApiResponse<VictimResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let victim = service.update_details(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(victim), None, None)))
}

/// Attach evidence images to a victim
#[utoipa::path(
    post,
    path = "/api/victims/{id}/images",
    params(
        ("id" = Uuid, Path, description = "Victim ID")
    ),
    request_body = AddVictimImagesDto,
    responses(
        (status = 200, description = "Images attached", body = ApiResponse<VictimResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Victim not found")
    ),
    tag = "victims"
)]
pub async fn add_victim_images(
    State(service): State<Arc<VictimService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<AddVictimImagesDto>,
) -> Result<Json<ApiResponse<VictimResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let victim = service.add_images(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(victim), None, None)))
}

/// Delete a victim and its images
#[utoipa::path(
    delete,
    path = "/api/victims/{id}",
    params(
        ("id" = Uuid, Path, description = "Victim ID")
    ),
    responses(
        (status = 200, description = "Victim deleted"),
        (status = 404, description = "Victim not found")
    ),
    tag = "victims"
)]
pub async fn delete_victim(
    State(service): State<Arc<VictimService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.remove(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some(format!("Victim {} deleted", id)),
        None,
    )))
}

/// Delete every victim
#[utoipa::path(
    delete,
    path = "/api/victims",
    responses(
        (status = 200, description = "All victims deleted", body = ApiResponse<DeleteAllResponseDto>),
    ),
    tag = "victims"
)]
pub async fn delete_all_victims(
    State(service): State<Arc<VictimService>>,
) -> Result<Json<ApiResponse<DeleteAllResponseDto>>> {
    let result = service.delete_all().await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}
