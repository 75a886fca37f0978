use approx::assert_abs_diff_eq;
use rstest::rstest;
use traffic_forecast::value::DEFAULT_CPC;
use traffic_forecast::{
    CpcTable, CtrCurve, ForecastError, ForecastSettings, Forecaster, KeywordRecord, Scenario,
    ScenarioTable, TrafficEstimator,
};

#[test]
fn test_traffic_estimate_scales_monthly_volume() {
    let curve = CtrCurve::default();
    let estimator = TrafficEstimator::new(&curve);

    let monthly = estimator.estimate(1.0, 1000, 30);
    assert_abs_diff_eq!(monthly.impressions, 1000.0, epsilon = 1e-12);
    assert_abs_diff_eq!(monthly.clicks, 315.0, epsilon = 1e-9);

    let quarter = estimator.estimate(1.0, 1000, 90);
    assert_abs_diff_eq!(quarter.impressions, 3000.0, epsilon = 1e-12);
    assert_abs_diff_eq!(quarter.clicks, 945.0, epsilon = 1e-9);
}

#[rstest]
#[case(1.0, 30)]
#[case(7.5, 90)]
#[case(40.0, 360)]
fn test_zero_volume_estimate(#[case] position: f64, #[case] horizon: u32) {
    let curve = CtrCurve::default();
    let estimate = TrafficEstimator::new(&curve).estimate(position, 0, horizon);

    assert_eq!(estimate.impressions, 0.0);
    assert_eq!(estimate.clicks, 0.0);
}

#[test]
fn test_custom_volume_window() {
    let curve = CtrCurve::default();
    let estimator = TrafficEstimator::new(&curve).with_volume_window(7);

    assert_abs_diff_eq!(estimator.impressions_for(700, 14), 1400.0, epsilon = 1e-12);
}

#[rstest]
#[case("seo tools", Some("software"))]
#[case("Best Mortgage Rates", Some("finance"))]
#[case("personal injury lawyer near me", Some("legal"))]
#[case("keyword-research course", Some("marketing"))]
#[case("blue widgets", None)]
#[case("toolshed", None)]
fn test_categorize(#[case] query: &str, #[case] expected: Option<&str>) {
    let table = CpcTable::default();
    let category = table.categorize(query).map(|c| c.name.as_str());

    assert_eq!(category, expected);
}

#[test]
fn test_default_rate_is_flagged() {
    let table = CpcTable::default();

    let rate = table.rate_for("blue widgets");
    assert!(rate.is_default());
    assert_eq!(rate.cpc, DEFAULT_CPC);
    assert_abs_diff_eq!(table.value(100.0, "blue widgets"), 150.0, epsilon = 1e-9);

    let rate = table.rate_for("crm software");
    assert!(!rate.is_default());
    assert_eq!(rate.category.as_deref(), Some("software"));
    assert_abs_diff_eq!(rate.value(10.0), 35.0, epsilon = 1e-9);
}

#[test]
fn test_custom_cpc_table() {
    let table = CpcTable::new(0.75).with_category("pets", &["Dog", "cat"], 2.0);

    assert_eq!(table.categories().len(), 1);
    assert_eq!(table.rate_for("dog food").cpc, 2.0);
    assert_eq!(table.rate_for("fish food").cpc, 0.75);
}

#[test]
fn test_invalid_settings_are_rejected() {
    let settings = ForecastSettings::default().with_cpc(CpcTable::new(-1.0));
    assert!(matches!(
        Forecaster::new(settings),
        Err(ForecastError::InvalidParameter(_))
    ));

    let settings = ForecastSettings::default()
        .with_cpc(CpcTable::new(1.0).with_category("broken", &["x"], f64::NAN));
    assert!(Forecaster::new(settings).is_err());

    let settings = ForecastSettings::default().with_top_threshold(0.0);
    assert!(Forecaster::new(settings).is_err());

    let settings = ForecastSettings::default().with_volume_window(0);
    assert!(Forecaster::new(settings).is_err());

    let settings = ForecastSettings::default().with_scenarios(ScenarioTable {
        aggressive: f64::INFINITY,
        ..ScenarioTable::default()
    });
    assert!(Forecaster::new(settings).is_err());
}

#[rstest]
#[case("conservative", Scenario::Conservative)]
#[case("Moderate", Scenario::Moderate)]
#[case(" aggressive ", Scenario::Aggressive)]
#[case("custom", Scenario::Custom(None))]
fn test_scenario_from_str(#[case] text: &str, #[case] expected: Scenario) {
    assert_eq!(text.parse::<Scenario>().unwrap(), expected);
}

#[test]
fn test_scenario_improvements_and_labels() {
    let table = ScenarioTable::default();

    assert_eq!(Scenario::Conservative.improvement(&table).unwrap(), 5.0);
    assert_eq!(Scenario::Moderate.improvement(&table).unwrap(), 10.0);
    assert_eq!(Scenario::Aggressive.improvement(&table).unwrap(), 15.0);
    assert_eq!(Scenario::custom(8.0).improvement(&table).unwrap(), 8.0);
    assert!(Scenario::Custom(None).improvement(&table).is_err());
    assert!(Scenario::custom(0.0).improvement(&table).is_err());
    assert!(Scenario::custom(f64::NAN).improvement(&table).is_err());

    assert_eq!(Scenario::Moderate.label(&table), "Moderate (10 positions)");
    assert_eq!(Scenario::custom(7.5).label(&table), "Custom (7.5 positions)");
    assert_eq!(Scenario::Custom(None).label(&table), "Custom");
    assert!("sideways".parse::<Scenario>().is_err());
}

#[test]
fn test_keyword_record_ctr_and_observation() {
    let record = KeywordRecord::new("seo tools", 4.2, 1000).with_clicks(50, 500);
    assert_abs_diff_eq!(record.ctr().unwrap(), 0.1, epsilon = 1e-12);

    let observation = record.observation().unwrap();
    assert_eq!(observation.clicks, 50);
    assert_eq!(observation.impressions, 500);

    // Reported CTR without clicks is turned into clicks
    let record = KeywordRecord::new("seo tools", 4.2, 1000)
        .with_clicks(0, 400)
        .with_observed_ctr(0.05);
    assert_eq!(record.ctr(), Some(0.05));
    assert_eq!(record.observation().unwrap().clicks, 20);

    // No impressions, no observation
    let record = KeywordRecord::new("seo tools", 4.2, 1000);
    assert_eq!(record.ctr(), None);
    assert!(record.observation().is_none());
}

#[test]
fn test_deserialized_curve_settings_are_checked() {
    let mut value = serde_json::to_value(ForecastSettings::default()).unwrap();
    value["curve"]["fallback"] = serde_json::json!([0.3, 0.2]);
    let settings: ForecastSettings = serde_json::from_value(value).unwrap();

    assert!(matches!(
        Forecaster::new(settings),
        Err(ForecastError::InvalidParameter(_))
    ));
}
