use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::victims::handlers;
use crate::features::victims::services::VictimService;

/// Create routes for the victims feature
pub fn routes(service: Arc<VictimService>) -> Router {
    Router::new()
        .route(
            "/api/victims",
            post(handlers::create_victim)
                .get(handlers::list_victims)
                .delete(handlers::delete_all_victims),
        )
        .route(
            "/api/victims/{id}",
            get(handlers::get_victim).delete(handlers::delete_victim),
        )
        .route(
            "/api/victims/{id}/death-type",
            patch(handlers::update_death_type),
        )
        .route("/api/victims/{id}/details", patch(handlers::update_details))
        .route("/api/victims/{id}/images", post(handlers::add_victim_images))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::victims::store::InMemoryVictimStore;

    fn server() -> TestServer {
        let service = Arc::new(VictimService::new(Arc::new(InMemoryVictimStore::new())));
        TestServer::new(routes(service)).unwrap()
    }

    async fn create(server: &TestServer, name: &str, images: &[&str]) -> Value {
        let response = server
            .post("/api/victims")
            .json(&json!({
                "name": name,
                "lastName": "Doe",
                "deathType": "Heart Attack",
                "images": images,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["data"].clone()
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let server = server();
        let created = create(&server, "John", &["u1.jpg", "u2.jpg"]).await;

        assert_eq!(created["images"], json!(["u1.jpg", "u2.jpg"]));
        assert_eq!(created["isAlive"], true);
        assert_eq!(created["name"], "JOHN");

        let id = created["id"].as_str().unwrap();
        let response = server.get(&format!("/api/victims/{}", id)).await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], created);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_body() {
        let server = server();

        let response = server
            .post("/api/victims")
            .json(&json!({"name": "", "lastName": "Doe"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/victims")
            .json(&json!({"name": "John"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let server = server();
        create(&server, "John", &[]).await;

        let response = server
            .post("/api/victims")
            .json(&json!({"name": "john", "lastName": "DOE"}))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_list_filters_by_alive_state() {
        let server = server();
        create(&server, "Ann", &[]).await;
        create(&server, "Bob", &[]).await;

        let response = server
            .get("/api/victims")
            .add_query_param("limit", 1)
            .add_query_param("offset", 0)
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 1);

        let response = server
            .get("/api/victims")
            .add_query_param("isAlive", false)
            .await;
        assert!(response.json::<Value>()["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_endpoints() {
        let server = server();
        let created = create(&server, "John", &[]).await;
        let id = created["id"].as_str().unwrap();

        let response = server
            .patch(&format!("/api/victims/{}/death-type", id))
            .json(&json!({"deathType": "suicidio"}))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"]["deathType"], "suicidio");

        let response = server
            .patch(&format!("/api/victims/{}/details", id))
            .json(&json!({"details": "Fell asleep and never woke up"}))
            .await;
        response.assert_status_ok();
        let data = response.json::<Value>()["data"].clone();
        assert_eq!(data["details"], "Fell asleep and never woke up");
        assert!(!data["editedAt"].is_null());

        let response = server
            .post(&format!("/api/victims/{}/images", id))
            .json(&json!({"images": ["evidence.jpg"]}))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"]["images"], json!(["evidence.jpg"]));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let server = server();
        let missing = uuid::Uuid::new_v4();

        server
            .get(&format!("/api/victims/{}", missing))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .patch(&format!("/api/victims/{}/death-type", missing))
            .json(&json!({"deathType": "X"}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete(&format!("/api/victims/{}", missing))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let server = server();
        server
            .get("/api/victims/not-a-uuid")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_one_and_delete_all() {
        let server = server();
        let created = create(&server, "Ann", &["a.jpg"]).await;
        create(&server, "Bob", &[]).await;
        create(&server, "Cid", &[]).await;

        server
            .delete(&format!("/api/victims/{}", created["id"].as_str().unwrap()))
            .await
            .assert_status_ok();

        let response = server.delete("/api/victims").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"], json!({"affected": 2}));
    }
}
