#[cfg(test)]
mod tests {
    use crate::client::{moment_topic_message, FirebaseClient, FirebaseError};
    use serde_json::json;
    use stayreal_common::{Event, Region, StayrealError, TopicBroadcaster};
    use stayreal_config::FirebaseConfig;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn moment() -> Event {
        Event {
            id: "xyz".to_string(),
            region: Region::UsCentral,
            start_date: "2024-05-02T16:21:08.000Z".to_string(),
            end_date: "2024-05-02T16:23:08.000Z".to_string(),
            timezone: "America/Chicago".to_string(),
            local_time: None,
            local_date: None,
        }
    }

    fn config(base_url: &str) -> FirebaseConfig {
        FirebaseConfig {
            project_id: Some("stayreal-test".to_string()),
            key_path: None,
            api_base_url: Some(base_url.to_string()),
        }
    }

    fn expected_body() -> serde_json::Value {
        json!({
            "message": {
                "topic": "us-central",
                "data": {
                    "id": "xyz",
                    "region": "us-central",
                    "timezone": "America/Chicago",
                    "startDate": "2024-05-02T16:21:08.000Z",
                    "endDate": "2024-05-02T16:23:08.000Z"
                }
            }
        })
    }

    #[test]
    fn test_topic_message_is_data_only() {
        let message = serde_json::to_value(moment_topic_message(Region::UsCentral, &moment())).unwrap();
        assert_eq!(message, expected_body());
    }

    #[tokio::test]
    async fn test_broadcast_posts_one_message_to_region_topic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/projects/stayreal-test/messages:send"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(expected_body()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "name": "projects/stayreal-test/messages/1" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = FirebaseClient::with_access_token(config(&server.uri()), "test-token");
        let name = client.broadcast(Region::UsCentral, &moment()).await.unwrap();

        assert_eq!(name, "projects/stayreal-test/messages/1");
    }

    #[tokio::test]
    async fn test_api_error_is_reported_as_external_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("PERMISSION_DENIED"))
            .mount(&server)
            .await;

        let client = FirebaseClient::with_access_token(config(&server.uri()), "test-token");

        let message = moment_topic_message(Region::UsCentral, &moment());
        match client.send_message(&message).await {
            Err(FirebaseError::ApiError { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "PERMISSION_DENIED");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let err = client.broadcast(Region::UsCentral, &moment()).await.unwrap_err();
        assert!(matches!(err, StayrealError::ExternalServiceError { .. }));
    }

    #[tokio::test]
    async fn test_service_account_client_fails_at_construction() {
        let missing_key_path = FirebaseConfig {
            project_id: Some("stayreal-test".to_string()),
            key_path: None,
            api_base_url: None,
        };
        assert!(matches!(
            FirebaseClient::new(missing_key_path).await,
            Err(FirebaseError::ConfigError(_))
        ));

        let unreadable_key = FirebaseConfig {
            project_id: Some("stayreal-test".to_string()),
            key_path: Some("/nonexistent/service-account.json".to_string()),
            api_base_url: None,
        };
        assert!(matches!(
            FirebaseClient::new(unreadable_key).await,
            Err(FirebaseError::ConfigError(_))
        ));

        let missing_project = FirebaseConfig {
            project_id: None,
            key_path: Some("/nonexistent/service-account.json".to_string()),
            api_base_url: None,
        };
        assert!(matches!(
            FirebaseClient::new(missing_project).await,
            Err(FirebaseError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_project_id_is_a_config_error() {
        let client = FirebaseClient::with_access_token(FirebaseConfig::default(), "test-token");
        let message = moment_topic_message(Region::AsiaEast, &moment());

        assert!(matches!(
            client.send_message(&message).await,
            Err(FirebaseError::ConfigError(_))
        ));
    }
}
