use rank_math::MathError;
use std::io;
use traffic_forecast::error::ForecastError;
use traffic_forecast::{CurveSettings, KeywordRecord};

#[test]
fn test_error_conversion() {
    // IO errors
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    // Math errors from the curve crate
    let math_error = MathError::OutOfRange("ctr 1.5".to_string());
    let forecast_error = ForecastError::from(math_error.clone());

    match forecast_error {
        ForecastError::MathError(inner) => assert_eq!(inner, math_error),
        other => panic!("Expected MathError variant, got {:?}", other),
    }

    // JSON errors
    let json_error = serde_json::from_str::<KeywordRecord>("{").unwrap_err();
    assert!(matches!(
        ForecastError::from(json_error),
        ForecastError::SerializationError(_)
    ));
}

#[test]
fn test_question_mark_propagates_curve_errors() {
    fn short_fallback() -> traffic_forecast::Result<CurveSettings> {
        Ok(CurveSettings::new(3, vec![0.3, 0.2])?)
    }

    let error = short_fallback().unwrap_err();
    assert!(matches!(error, ForecastError::MathError(_)));
    assert!(error.to_string().starts_with("Math error:"));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidParameter("top threshold must be at least 1".to_string());
    assert_eq!(
        error.to_string(),
        "Invalid parameter: top threshold must be at least 1"
    );

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));

    let error = ForecastError::InvalidScenario("unknown scenario 'sideways'".to_string());
    assert_eq!(error.to_string(), "Invalid scenario: unknown scenario 'sideways'");
}

#[test]
fn test_record_validation_errors() {
    assert!(KeywordRecord::new("seo tools", 4.0, 1000).validate().is_ok());

    let error = KeywordRecord::new("seo tools", 4.0, 1000)
        .without_search_volume()
        .validate()
        .unwrap_err();

    match error {
        ForecastError::InvalidRecord(msg) => {
            assert_eq!(msg, "'seo tools': missing search volume");
        }
        other => panic!("Expected InvalidRecord, got {:?}", other),
    }

    let error = KeywordRecord::new("seo tools", 0.5, 1000).validate().unwrap_err();
    assert_eq!(
        error.to_string(),
        "Invalid record: 'seo tools': current position below 1"
    );
}
