use utoipa::{Modify, OpenApi};

use crate::features::victims::{dtos as victims_dtos, handlers as victims_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        victims_handlers::create_victim,
        victims_handlers::list_victims,
        victims_handlers::get_victim,
        victims_handlers::update_death_type,
        victims_handlers::update_details,
        victims_handlers::add_victim_images,
        victims_handlers::delete_victim,
        victims_handlers::delete_all_victims,
    ),
    components(
        schemas(
            Meta,
            victims_dtos::CreateVictimDto,
            victims_dtos::UpdateDeathTypeDto,
            victims_dtos::UpdateDetailsDto,
            victims_dtos::AddVictimImagesDto,
            victims_dtos::VictimResponseDto,
            victims_dtos::DeleteAllResponseDto,
            ApiResponse<victims_dtos::VictimResponseDto>,
            ApiResponse<Vec<victims_dtos::VictimResponseDto>>,
            ApiResponse<victims_dtos::DeleteAllResponseDto>,
        )
    ),
    tags(
        (name = "victims", description = "Victim records and evidence images"),
    ),
    info(
        title = "Victim Tracker API",
        version = "0.1.0",
        description = "API documentation for the victim tracker",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_victim_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/victims"));
        assert!(doc.paths.paths.contains_key("/api/victims/{id}/death-type"));
        assert!(doc.paths.paths.contains_key("/api/victims/{id}/images"));
    }

    #[test]
    fn test_swagger_info_modifier_overrides_info() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Custom".to_string(),
            version: "9.9.9".to_string(),
            description: "Described".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Custom");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("Described"));
    }
}
