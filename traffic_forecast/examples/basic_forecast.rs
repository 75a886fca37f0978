use traffic_forecast::analysis::{competitive_overview, difficulty_breakdown};
use traffic_forecast::planning::{scenario_grid, timeline};
use traffic_forecast::{ForecastRequest, Forecaster, KeywordRecord, Scenario, ScenarioConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Sample keyword set: search console clicks plus keyword research metrics
    let records = vec![
        KeywordRecord::new("seo tools", 8.5, 8100)
            .with_clicks(1200, 25000)
            .with_difficulty(78.0),
        KeywordRecord::new("keyword research", 12.3, 5400)
            .with_clicks(800, 18000)
            .with_difficulty(65.0),
        KeywordRecord::new("backlink analysis", 15.7, 2900)
            .with_clicks(600, 12000)
            .with_difficulty(72.0),
        KeywordRecord::new("technical seo", 18.2, 1600)
            .with_clicks(400, 8000)
            .with_difficulty(68.0),
        KeywordRecord::new("content optimization", 22.1, 1300)
            .with_clicks(350, 6000)
            .with_difficulty(58.0),
    ];

    let forecaster = Forecaster::default();

    // Single scenario across the default horizons
    let request = ForecastRequest::new(records.clone(), Scenario::Moderate);
    let report = forecaster.run(&request)?;

    println!("Moderate scenario:");
    for summary in &report.aggregate {
        println!(
            "  {:>3} days: {:>8.0} clicks ({:+.1}%), value {:>10.2}, top 10: {}",
            summary.horizon_days,
            summary.total_projected_clicks,
            summary.clicks_increase_pct(),
            summary.total_projected_value,
            summary.projected_top_keywords
        );
    }

    // Every named scenario side by side
    println!("\nScenario grid:");
    for comparison in scenario_grid(&forecaster, &records, &[90, 120, 360])? {
        if let Some(summary) = comparison.report.summary_for(360) {
            println!(
                "  {:<28} {:>8.0} clicks at 360 days",
                comparison.label, summary.total_projected_clicks
            );
        }
    }

    // Twelve month timeline
    println!("\nTimeline:");
    for point in timeline(&forecaster, &records, ScenarioConfig::new(Scenario::Aggressive), 12)? {
        println!(
            "  month {:>2}: {:>8.0} clicks, value {:>10.2}",
            point.month, point.projected_clicks, point.projected_value
        );
    }

    let overview = competitive_overview(&records);
    println!(
        "\nMean position {:.2}, median {:.2}, market share {:.1}%",
        overview.mean_position, overview.median_position, overview.market_share_pct
    );

    for band in difficulty_breakdown(&records) {
        println!("  {:<10} {} keywords", band.tier.label(), band.keywords);
    }

    Ok(())
}
