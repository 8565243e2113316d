//! End-to-end tests for the flow executor against mock backends.

use std::sync::Arc;

use serde_json::json;

use bloom_flows::{FlowError, FlowExecutor, MockBackend};
use bloom_types::{BloomQuery, BLOOM_DETECTION_FLOW, BLOOM_FORECAST_FLOW};

fn executor_with(mock: Arc<MockBackend>) -> FlowExecutor {
    FlowExecutor::builtin(mock).expect("built-in flows must compile")
}

#[tokio::test]
async fn test_forecast_flow_returns_model_text_unmodified() {
    let mock = Arc::new(MockBackend::replying(json!({
        "forecast": "Peak cherry blossom expected around March 25.",
    })));
    let executor = executor_with(mock.clone());

    let query = BloomQuery::new("Kyoto, Japan", "2024-03-01", "2024-03-31");
    let forecast = executor.generate_bloom_forecast(&query).await.unwrap();

    assert_eq!(
        forecast.forecast,
        "Peak cherry blossom expected around March 25."
    );
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_detection_flow_preserves_fields_and_array_order() {
    let mock = Arc::new(MockBackend::replying(json!({
        "bloomStatus": "Active Bloom",
        "confidenceLevel": 0.82,
        "satelliteDataUsed": ["MODIS", "Landsat"],
    })));
    let executor = executor_with(mock);

    let query = BloomQuery::new("California, USA", "2024-02-01", "2024-03-01");
    let detection = executor.detect_and_monitor_blooms(&query).await.unwrap();

    assert_eq!(detection.bloom_status, "Active Bloom");
    assert_eq!(detection.confidence_level, 0.82);
    assert_eq!(detection.satellite_data_used, vec!["MODIS", "Landsat"]);
}

#[tokio::test]
async fn test_missing_input_field_never_reaches_the_backend() {
    let mock = Arc::new(MockBackend::canned());
    let executor = executor_with(mock.clone());

    let input = json!({ "location": "Kyoto, Japan", "startDate": "2024-03-01" });
    let error = executor
        .invoke_flow(BLOOM_FORECAST_FLOW, &input)
        .await
        .unwrap_err();

    match error {
        FlowError::Validation(violations) => assert!(violations.mentions("endDate")),
        other => panic!("expected Validation, got {other:?}"),
    }
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_every_invalid_input_field_is_reported_at_once() {
    let mock = Arc::new(MockBackend::canned());
    let executor = executor_with(mock.clone());

    let input = json!({ "location": "", "startDate": "soon", "endDate": 42 });
    let error = executor
        .invoke_flow(BLOOM_DETECTION_FLOW, &input)
        .await
        .unwrap_err();

    match error {
        FlowError::Validation(violations) => {
            assert_eq!(violations.violations().len(), 3);
            assert!(violations.mentions("location"));
            assert!(violations.mentions("startDate"));
            assert!(violations.mentions("endDate"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_reply_missing_required_field_is_output_validation_error() {
    // Reply omits confidenceLevel: must fail, never a partially-filled success.
    let mock = Arc::new(MockBackend::replying(json!({
        "bloomStatus": "Active Bloom",
        "satelliteDataUsed": ["MODIS"],
    })));
    let executor = executor_with(mock.clone());

    let query = BloomQuery::new("California, USA", "2024-02-01", "2024-03-01");
    let error = executor
        .detect_and_monitor_blooms(&query)
        .await
        .unwrap_err();

    match error {
        FlowError::OutputValidation(violations) => {
            assert!(violations.mentions("confidenceLevel"));
        }
        other => panic!("expected OutputValidation, got {other:?}"),
    }
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_reply_with_wrong_basic_type_is_rejected() {
    let mock = Arc::new(MockBackend::replying(json!({
        "bloomStatus": "Active Bloom",
        "confidenceLevel": "high",
        "satelliteDataUsed": ["MODIS"],
    })));
    let executor = executor_with(mock);

    let query = BloomQuery::new("California, USA", "2024-02-01", "2024-03-01");
    let error = executor
        .detect_and_monitor_blooms(&query)
        .await
        .unwrap_err();
    assert!(matches!(error, FlowError::OutputValidation(_)));
}

#[tokio::test]
async fn test_backend_failure_is_surfaced_as_backend_error() {
    let mock = Arc::new(MockBackend::failing("quota exhausted"));
    let executor = executor_with(mock.clone());

    let query = BloomQuery::new("Kyoto, Japan", "2024-03-01", "2024-03-31");
    let error = executor.generate_bloom_forecast(&query).await.unwrap_err();

    match error {
        FlowError::Backend(message) => assert!(message.contains("quota exhausted")),
        other => panic!("expected Backend, got {other:?}"),
    }
    // Exactly one attempt: the executor never retries.
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_extra_reply_fields_are_dropped_not_rejected() {
    let mock = Arc::new(MockBackend::replying(json!({
        "forecast": "Early bloom likely.",
        "reasoning": "models often narrate",
        "confidence": 0.5,
    })));
    let executor = executor_with(mock);

    let query = BloomQuery::new("Kyoto, Japan", "2024-03-01", "2024-03-31");
    let output = executor
        .invoke_flow(BLOOM_FORECAST_FLOW, &serde_json::to_value(&query).unwrap())
        .await
        .unwrap();

    assert_eq!(output, json!({ "forecast": "Early bloom likely." }));
}

#[tokio::test]
async fn test_inverted_date_range_is_accepted() {
    // Present behavior: no cross-field ordering check on the date range.
    // The backend is handed whatever range the caller supplies.
    let mock = Arc::new(MockBackend::canned());
    let executor = executor_with(mock.clone());

    let query = BloomQuery::new("Kyoto, Japan", "2024-04-01", "2024-03-01");
    executor.generate_bloom_forecast(&query).await.unwrap();
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_unknown_flow_name_is_an_error() {
    let mock = Arc::new(MockBackend::canned());
    let executor = executor_with(mock.clone());

    let error = executor
        .invoke_flow("bloom-classification", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(error, FlowError::UnknownFlow(name) if name == "bloom-classification"));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let mock = Arc::new(MockBackend::canned());
    let executor = Arc::new(executor_with(mock.clone()));

    let detection = {
        let executor = executor.clone();
        tokio::spawn(async move {
            let query = BloomQuery::new("California, USA", "2024-02-01", "2024-03-01");
            executor.detect_and_monitor_blooms(&query).await
        })
    };
    let forecast = {
        let executor = executor.clone();
        tokio::spawn(async move {
            let query = BloomQuery::new("Kyoto, Japan", "2024-03-01", "2024-03-31");
            executor.generate_bloom_forecast(&query).await
        })
    };

    detection.await.unwrap().unwrap();
    forecast.await.unwrap().unwrap();
    assert_eq!(mock.calls(), 2);
}
