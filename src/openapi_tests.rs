#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::OpenApi;
    use utoipa::openapi::PathItemType;

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        assert!(openapi.components.is_some());
        let components = openapi.components.as_ref().unwrap();

        for name in ["ErrorResponse", "HealthResponse", "ApiRoot", "UserDto", "LeaderboardEntryDto"] {
            assert!(components.schemas.contains_key(name), "missing schema {}", name);
        }

        let json_result = serde_json::to_string(&openapi);
        assert!(json_result.is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let error_response_schema = components.schemas.get("ErrorResponse").unwrap();

        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) = error_response_schema {
            let properties = &obj.properties;
            assert!(properties.contains_key("error"));
            assert!(properties.contains_key("code"));
            assert!(properties.contains_key("success"));
            assert!(properties.contains_key("fields"));
        } else {
            panic!("ErrorResponse should be an object schema");
        }
    }

    #[test]
    fn test_user_dto_schema_has_no_password() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let user_schema = components.schemas.get("UserDto").unwrap();

        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) = user_schema {
            let properties = &obj.properties;
            assert!(properties.contains_key("username"));
            assert!(properties.contains_key("email"));
            assert!(!properties.contains_key("password"));
        } else {
            panic!("UserDto should be an object schema");
        }
    }

    #[test]
    fn test_openapi_paths_contain_health_endpoint() {
        let openapi = ApiDoc::openapi();

        let health_path = openapi.paths.paths.get("/health").unwrap();
        let health_get = health_path.operations.get(&PathItemType::Get).unwrap();

        let responses = &health_get.responses;
        assert!(responses.responses.contains_key("200"));
        assert!(responses.responses.contains_key("500"));
    }

    #[test]
    fn test_every_resource_exposes_crud_operations() {
        let openapi = ApiDoc::openapi();

        for (collection, item) in [
            ("/api/v1/users", "/api/v1/users/{user_id}"),
            ("/api/v1/teams", "/api/v1/teams/{team_id}"),
            ("/api/v1/activities", "/api/v1/activities/{activity_id}"),
            ("/api/v1/workouts", "/api/v1/workouts/{workout_id}"),
            ("/api/v1/leaderboard", "/api/v1/leaderboard/{entry_id}"),
        ] {
            let collection_ops = &openapi.paths.paths.get(collection).unwrap().operations;
            assert!(collection_ops.contains_key(&PathItemType::Get), "{} GET", collection);
            assert!(collection_ops.contains_key(&PathItemType::Post), "{} POST", collection);

            let item_ops = &openapi.paths.paths.get(item).unwrap().operations;
            assert!(item_ops.contains_key(&PathItemType::Get), "{} GET", item);
            assert!(item_ops.contains_key(&PathItemType::Put), "{} PUT", item);
            assert!(item_ops.contains_key(&PathItemType::Delete), "{} DELETE", item);
        }

        assert!(openapi.paths.paths.contains_key("/api/v1/"));
        assert!(openapi.paths.paths.contains_key("/api/v1/admin/{entity}"));
    }

    #[test]
    fn test_all_error_responses_reference_correct_schema() {
        let openapi = ApiDoc::openapi();
        let openapi_json = serde_json::to_string(&openapi).unwrap();

        assert!(!openapi_json.contains("crate.schemas.ErrorResponse"));
        assert!(!openapi_json.contains("crate::schemas::ErrorResponse"));
        assert!(openapi_json.contains("ErrorResponse"));
    }
}
