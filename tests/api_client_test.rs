//! Integration tests for the backend API client
//!
//! Tests HTTP client behavior using wiremock for request/response mocking.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cardiopredict::api::{ApiClient, PredictRequest};
use cardiopredict::config::BackendConfig;
use cardiopredict::error::ApiError;
use cardiopredict::store::{Gender, HealthInput, Level, PatientInfo};

/// Create a test client pointing to the mock server
fn create_test_client(base_url: &str) -> ApiClient {
    let config = BackendConfig {
        base_url: base_url.to_string(),
    };
    ApiClient::new(&config).expect("Failed to create client")
}

/// A valid prediction payload for testing
fn create_test_request() -> PredictRequest {
    PredictRequest::new(HealthInput {
        age: 52,
        gender: Gender::Male,
        height: 170.0,
        weight: 85.0,
        ap_hi: 140,
        ap_lo: 90,
        cholesterol: Level::AboveNormal,
        gluc: Level::Normal,
        smoke: true,
        alco: false,
        active: true,
    })
}

#[cfg(test)]
mod predict_tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_predict() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "prediction_id": "a1b2c3d4",
                "prediction": 1,
                "has_disease": true,
                "disease_probability": 0.72,
                "healthy_probability": 0.28,
                "risk_percentage": 72.0,
                "risk_level": "High Risk",
                "color": "red",
                "timestamp": "2025-01-15T10:30:00"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.predict(&create_test_request()).await;

        assert!(result.is_ok(), "Predict should succeed: {:?}", result.err());
        let response = result.unwrap();
        assert_eq!(response.prediction_id.as_deref(), Some("a1b2c3d4"));
        assert!(response.has_disease);
        assert!((response.risk_percentage - 72.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_predict_sends_wire_encoded_payload() {
        let mock_server = MockServer::start().await;

        // Flags go out as 0/1 and patient metadata is flattened in
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_json(json!({
                "age": 52,
                "gender": 1,
                "height": 170.0,
                "weight": 85.0,
                "ap_hi": 140,
                "ap_lo": 90,
                "cholesterol": 2,
                "gluc": 1,
                "smoke": 1,
                "alco": 0,
                "active": 1,
                "patientName": "Jane Doe"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "prediction_id": "a1b2c3d4",
                "has_disease": false,
                "disease_probability": 0.1,
                "healthy_probability": 0.9,
                "risk_percentage": 10.0,
                "risk_level": "Low Risk"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let request =
            create_test_request().with_patient(PatientInfo::default().with_name("Jane Doe"));
        let result = client.predict(&request).await;

        assert!(result.is_ok(), "Predict should succeed: {:?}", result.err());
    }

    #[tokio::test]
    async fn test_predict_surfaces_backend_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "error",
                "message": "Age must be between 1 and 120",
                "error_code": "VALIDATION_ERROR"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.predict(&create_test_request()).await;

        match result {
            Err(ApiError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Age must be between 1 and 120");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_predict_error_field_wins_over_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "No JSON data provided",
                "message": "ignored"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.predict(&create_test_request()).await;

        match result {
            Err(ApiError::Api { message, .. }) => {
                assert_eq!(message, "No JSON data provided");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_predict_falls_back_to_status_code() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.predict(&create_test_request()).await;

        match result {
            Err(ApiError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "HTTP 500");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_predict_single_attempt_on_server_error() {
        let mock_server = MockServer::start().await;

        // expect(1) verifies there is no retry loop behind the call
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "status": "error",
                "message": "Prediction error"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.predict(&create_test_request()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_predict_malformed_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.predict(&create_test_request()).await;

        assert!(
            matches!(result, Err(ApiError::InvalidResponse { .. })),
            "Should fail on malformed JSON"
        );
    }
}

#[cfg(test)]
mod endpoint_tests {
    use super::*;

    #[tokio::test]
    async fn test_statistics() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/statistics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_records": 70000,
                "disease_cases": 34979,
                "healthy_cases": 35021,
                "disease_percentage": 49.97,
                "features": {
                    "age": { "min": 30.0, "max": 65.0, "mean": 53.0 },
                    "weight": { "min": 10.0, "max": 200.0, "mean": 74.2 },
                    "height": { "min": 55.0, "max": 250.0, "mean": 164.4 }
                },
                "high_bp_count": 12000,
                "high_cholesterol_count": 18000,
                "smokers_count": 6100
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let stats = client.statistics().await.unwrap();

        assert_eq!(stats.total_records, 70000);
        assert_eq!(stats.disease_cases, 34979);
        assert!((stats.features.age.mean - 53.0).abs() < f64::EPSILON);
        assert_eq!(stats.smokers_count, 6100);
    }

    #[tokio::test]
    async fn test_model_info() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/model-info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "model_type": "RandomForestClassifier",
                "model_loaded": true,
                "features": ["age", "gender", "ap_hi"],
                "feature_count": 3,
                "version": "2.0.0",
                "timestamp": "2025-01-15T10:30:00"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let info = client.model_info().await.unwrap();

        assert_eq!(info.model_type, "RandomForestClassifier");
        assert!(info.model_loaded);
        assert_eq!(info.feature_count, 3);
    }

    #[tokio::test]
    async fn test_health() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "healthy",
                "message": "API is running",
                "version": "2.0.0"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let health = client.health().await.unwrap();

        assert_eq!(health.status, "healthy");
        assert_eq!(health.message, "API is running");
    }

    #[tokio::test]
    async fn test_prediction_lookup() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/prediction/a1b2c3d4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {
                    "id": "a1b2c3d4",
                    "risk_percentage": 35.5,
                    "risk_level": "Moderate Risk",
                    "has_disease": false,
                    "age_years": 52,
                    "bp_systolic": 130,
                    "bp_diastolic": 85
                },
                "timestamp": "2025-01-15T10:30:00"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let lookup = client.prediction("a1b2c3d4").await.unwrap();

        assert_eq!(lookup.data.id, "a1b2c3d4");
        assert_eq!(lookup.data.age_years, Some(52));
    }

    #[tokio::test]
    async fn test_prediction_lookup_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/prediction/nope"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": "error",
                "message": "Prediction not found",
                "error_code": "NOT_FOUND"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.prediction("nope").await;

        match result {
            Err(ApiError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Prediction not found");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_prediction_history_pagination_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/prediction-history"))
            .and(query_param("limit", "25"))
            .and(query_param("offset", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "total_records": 120,
                "returned": 25,
                "limit": 25,
                "offset": 50,
                "has_more": true,
                "predictions": [
                    {
                        "id": "p1",
                        "risk_percentage": 72.0,
                        "risk_level": "High Risk",
                        "has_disease": true,
                        "age_years": 61
                    }
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let page = client.prediction_history(25, 50).await.unwrap();

        assert_eq!(page.total_records, 120);
        assert!(page.has_more);
        assert_eq!(page.predictions.len(), 1);
        assert_eq!(page.predictions[0].id, "p1");
    }

    #[tokio::test]
    async fn test_prediction_stats_no_data() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/prediction-stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "no_data",
                "total_predictions": 0,
                "message": "No predictions made yet"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let stats = client.prediction_stats().await.unwrap();

        assert_eq!(stats.status, "no_data");
        assert_eq!(stats.total_predictions, 0);
        assert!(stats.risk_percentage_stats.is_none());
        assert_eq!(stats.risk_distribution.high_risk, 0);
    }

    #[tokio::test]
    async fn test_prediction_stats_with_data() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/prediction-stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "total_predictions": 12,
                "risk_distribution": { "low_risk": 5, "moderate_risk": 4, "high_risk": 3 },
                "disease_rate": 41.67,
                "risk_percentage_stats": { "min": 8.2, "max": 91.4, "average": 44.3 },
                "age_stats": { "min": 29, "max": 64, "average": 51.5 },
                "weight_stats": { "min": 54.0, "max": 110.0, "average": 78.25 }
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let stats = client.prediction_stats().await.unwrap();

        assert_eq!(stats.total_predictions, 12);
        assert_eq!(stats.risk_distribution.moderate_risk, 4);
        let risk = stats.risk_percentage_stats.unwrap();
        assert!((risk.average - 44.3).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_prediction_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/prediction-status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "active",
                "total_predictions": 3,
                "risk_distribution": { "low_risk": 1, "moderate_risk": 1, "high_risk": 1 },
                "disease_rate": 33.33,
                "recent_predictions": [
                    { "id": "p1", "risk_percentage": 12.0, "risk_level": "Low Risk" }
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let status = client.prediction_status().await.unwrap();

        assert_eq!(status.status, "active");
        assert_eq!(status.recent_predictions.len(), 1);
    }

    #[tokio::test]
    async fn test_prediction_health() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/prediction-health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "healthy",
                "model_loaded": true,
                "predictions_made": 42,
                "message": "All systems operational",
                "timestamp": "2025-01-15T10:30:00"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let health = client.prediction_health().await.unwrap();

        assert_eq!(health.status, "healthy");
        assert_eq!(health.predictions_made, 42);
    }

    #[tokio::test]
    async fn test_clear_history() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/clear-history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "message": "Prediction history cleared",
                "cleared_count": 7
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let response = client.clear_history().await.unwrap();

        assert_eq!(response.status, "success");
        assert_eq!(response.cleared_count, Some(7));
    }
}
