#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::tests::support::{
        app_with_store, delete, get, json_request, memory_app, send, send_json, sqlite_store,
    };

    async fn create(app: &axum::Router, body: Value) -> Value {
        let (status, created) = send_json(app, json_request("POST", "/characters", &body)).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", created);
        created
    }

    async fn seed_roster(app: &axum::Router) {
        create(app, json!({"name": "Superman", "realName": "Clark Kent", "origin": "Krypton",
            "affiliation": "Justice League", "status": "ATIVO"})).await;
        create(app, json!({"name": "Supergirl", "realName": "Kara Zor-El", "origin": "Krypton",
            "affiliation": "Super Family", "status": "ATIVO"})).await;
        create(app, json!({"name": "Batman", "realName": "Bruce Wayne", "origin": "Gotham City",
            "affiliation": "Justice League", "status": "INATIVO"})).await;
        create(app, json!({"name": "Jason Todd", "realName": "Jason Todd", "origin": "Gotham City",
            "affiliation": "Bat Family", "status": "MORTO"})).await;
    }

    fn names(list: &Value) -> Vec<String> {
        list.as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_record() {
        let (app, _state, _uploads) = memory_app();

        let created = create(&app, json!({"name": "Superman", "status": "ATIVO"})).await;
        let id = created["id"].as_i64().unwrap();
        assert!(id > 0);
        assert_eq!(created["name"], "Superman");
        assert_eq!(created["status"], "ATIVO");
        assert_eq!(created["realName"], Value::Null);

        let (status, fetched) = send_json(&app, get(&format!("/characters/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_ignores_client_id_and_defaults_status() {
        let (app, _state, _uploads) = memory_app();

        let created = create(&app, json!({"id": 999, "name": "Cyborg"})).await;
        assert_eq!(created["id"], 1);
        assert_eq!(created["status"], "ATIVO");
    }

    #[tokio::test]
    async fn test_create_accepts_english_status_names() {
        let (app, _state, _uploads) = memory_app();

        let created = create(&app, json!({"name": "Jason Todd", "status": "deceased"})).await;
        assert_eq!(created["status"], "MORTO");
    }

    #[tokio::test]
    async fn test_create_without_name_is_validation_error() {
        let (app, _state, _uploads) = memory_app();

        let (status, body) =
            send_json(&app, json_request("POST", "/characters", &json!({"origin": "Krypton"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["details"]["validationErrors"]["name"].is_string());

        let (status, _) =
            send_json(&app, json_request("POST", "/characters", &json!({"name": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, list) = send_json(&app, get("/characters")).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_create_reports_every_overlong_field() {
        let (app, _state, _uploads) = memory_app();

        let payload = json!({
            "name": "x".repeat(101),
            "firstAppearance": "y".repeat(51),
            "description": "z".repeat(1000),
        });
        let (status, body) = send_json(&app, json_request("POST", "/characters", &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = body["error"]["details"]["validationErrors"].as_object().unwrap();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("firstAppearance"));
        assert!(!errors.contains_key("description"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _state, _uploads) = memory_app();

        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/characters")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{\"name\": "))
            .unwrap();
        let (status, body) = send_json(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");

        let (status, _) = send_json(
            &app,
            json_request("POST", "/characters", &json!({"name": "Batman", "status": "RETIRED"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_and_non_numeric_ids() {
        let (app, _state, _uploads) = memory_app();

        let (status, body) = send_json(&app, get("/characters/42")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["status"], 404);

        let (status, _) = send_json(&app, get("/characters/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let (app, _state, _uploads) = memory_app();

        let created = create(&app, json!({
            "name": "Batman",
            "realName": "Bruce Wayne",
            "imageUrl": "/uploads/image/old.png",
            "status": "ATIVO"
        }))
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, updated) = send_json(
            &app,
            json_request(
                "PUT",
                &format!("/characters/{}", id),
                &json!({"id": 77, "name": "Batman", "status": "INATIVO"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], id);
        assert_eq!(updated["status"], "INATIVO");
        assert_eq!(updated["realName"], Value::Null);
        assert_eq!(updated["imageUrl"], Value::Null);

        let (_, fetched) = send_json(&app, get(&format!("/characters/{}", id))).await;
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_update_missing_or_invalid() {
        let (app, _state, _uploads) = memory_app();

        let (status, _) = send_json(
            &app,
            json_request("PUT", "/characters/5", &json!({"name": "Nobody"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let created = create(&app, json!({"name": "Flash"})).await;
        let (status, body) = send_json(
            &app,
            json_request("PUT", &format!("/characters/{}", created["id"]), &json!({"name": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (_, fetched) = send_json(&app, get(&format!("/characters/{}", created["id"]))).await;
        assert_eq!(fetched["name"], "Flash");
    }

    #[tokio::test]
    async fn test_delete_then_get_and_delete_again() {
        let (app, _state, _uploads) = memory_app();

        let created = create(&app, json!({"name": "Aquaman"})).await;
        let uri = format!("/characters/{}", created["id"]);

        let (status, _, body) = send(&app, delete(&uri)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());

        let (status, _) = send_json(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send_json(&app, delete(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let (app, _state, _uploads) = memory_app();
        seed_roster(&app).await;

        let (status, list) = send_json(&app, get("/characters")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&list), vec!["Superman", "Supergirl", "Batman", "Jason Todd"]);
    }

    #[tokio::test]
    async fn test_search_by_each_field() {
        let (app, _state, _uploads) = memory_app();
        seed_roster(&app).await;

        let (status, list) = send_json(&app, get("/characters/search?name=SUPER")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&list), vec!["Superman", "Supergirl"]);

        let (_, list) = send_json(&app, get("/characters/search?realName=wayne")).await;
        assert_eq!(names(&list), vec!["Batman"]);

        let (_, list) = send_json(&app, get("/characters/search?origin=gotham")).await;
        assert_eq!(names(&list), vec!["Batman", "Jason Todd"]);

        let (_, list) = send_json(&app, get("/characters/search?name=zzz")).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_search_requires_exactly_one_parameter() {
        let (app, _state, _uploads) = memory_app();

        let (status, body) = send_json(&app, get("/characters/search")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");

        let (status, _) = send_json(&app, get("/characters/search?name=a&origin=b")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_affiliation_is_exact_match() {
        let (app, _state, _uploads) = memory_app();
        seed_roster(&app).await;

        let (status, list) = send_json(&app, get("/characters/affiliation/Justice%20League")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&list), vec!["Superman", "Batman"]);

        let (_, list) = send_json(&app, get("/characters/affiliation/Justice")).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_status_lookup() {
        let (app, _state, _uploads) = memory_app();
        seed_roster(&app).await;

        let (status, list) = send_json(&app, get("/characters/status/MORTO")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&list), vec!["Jason Todd"]);

        let (_, list) = send_json(&app, get("/characters/status/active")).await;
        assert_eq!(names(&list), vec!["Superman", "Supergirl"]);

        let (status, body) = send_json(&app, get("/characters/status/RETIRED")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_filter_combinations() {
        let (app, _state, _uploads) = memory_app();
        seed_roster(&app).await;

        let (status, list) = send_json(&app, get("/characters/filter")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 4);

        let (_, list) = send_json(&app, get("/characters/filter?name=super&status=ATIVO")).await;
        assert_eq!(names(&list), vec!["Superman", "Supergirl"]);

        let (_, list) =
            send_json(&app, get("/characters/filter?name=super&affiliation=Justice%20League")).await;
        assert_eq!(names(&list), vec!["Superman"]);

        let (_, list) = send_json(&app, get("/characters/filter?name=&affiliation=&status=")).await;
        assert_eq!(list.as_array().unwrap().len(), 4);

        let (_, list) = send_json(&app, get("/characters/filter?status=INATIVO&name=super")).await;
        assert_eq!(list, json!([]));

        let (status, _) = send_json(&app, get("/characters/filter?status=unknown")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    async fn assert_filter_needs_all_three(app: &axum::Router) {
        seed_roster(app).await;
        create(app, json!({"name": "Superboy", "origin": "Krypton",
            "affiliation": "Justice League", "status": "INATIVO"})).await;

        // Name alone matches three, affiliation alone three, status alone two.
        let (status, list) = send_json(
            app,
            get("/characters/filter?name=SUP&affiliation=Justice%20League&status=ATIVO"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&list), vec!["Superman"]);

        let (_, list) = send_json(
            app,
            get("/characters/filter?name=sup&affiliation=Justice%20League&status=INATIVO"),
        )
        .await;
        assert_eq!(names(&list), vec!["Superboy"]);
    }

    #[tokio::test]
    async fn test_filter_with_all_criteria_on_memory_store() {
        let (app, _state, _uploads) = memory_app();
        assert_filter_needs_all_three(&app).await;
    }

    #[tokio::test]
    async fn test_filter_with_all_criteria_on_sqlite_store() {
        let (store, _db_dir) = sqlite_store().await;
        let (app, _state, _uploads) = app_with_store(store);
        assert_filter_needs_all_three(&app).await;
    }

    #[tokio::test]
    async fn test_search_folds_accented_names_on_sqlite_store() {
        let (store, _db_dir) = sqlite_store().await;
        let (app, _state, _uploads) = app_with_store(store);
        create(&app, json!({"name": "ÉTRIGAN", "origin": "ÁTLANTIS"})).await;

        let (_, list) = send_json(&app, get("/characters/search?name=%C3%A9trigan")).await;
        assert_eq!(names(&list), vec!["ÉTRIGAN"]);

        let (_, list) = send_json(&app, get("/characters/search?origin=%C3%A1tlan")).await;
        assert_eq!(names(&list), vec!["ÉTRIGAN"]);

        let (_, body) = send_json(&app, get("/characters/exists/%C3%A9trigan")).await;
        assert_eq!(body, json!(true));
    }

    #[tokio::test]
    async fn test_exists_by_name_ignores_case() {
        let (app, _state, _uploads) = memory_app();
        seed_roster(&app).await;

        let (status, body) = send_json(&app, get("/characters/exists/superman")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(true));

        let (_, body) = send_json(&app, get("/characters/exists/JASON%20TODD")).await;
        assert_eq!(body, json!(true));

        let (_, body) = send_json(&app, get("/characters/exists/Super")).await;
        assert_eq!(body, json!(false));
    }

    #[tokio::test]
    async fn test_security_headers_on_json_responses() {
        let (app, _state, _uploads) = memory_app();

        let (status, headers, _) = send(&app, get("/characters")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
        assert_eq!(headers.get("referrer-policy").unwrap(), "no-referrer");
        assert_eq!(headers.get("cache-control").unwrap(), "no-store");
        assert!(headers.get("strict-transport-security").is_none());
    }

    #[tokio::test]
    async fn test_permissive_cors_answers_any_origin() {
        let (app, _state, _uploads) = memory_app();

        let req = axum::http::Request::builder()
            .uri("/characters")
            .header("origin", "http://localhost:3000")
            .body(axum::body::Body::empty())
            .unwrap();
        let (status, headers, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    }

    #[tokio::test]
    async fn test_path_traversal_is_rejected() {
        let (app, _state, _uploads) = memory_app();

        let (status, body) = send_json(&app, get("/uploads/image/%2e%2e%2fsecret")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_PATH");
    }
}
