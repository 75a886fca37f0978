use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use traffic_forecast::analysis::{find_opportunities, OpportunityFilter};
use traffic_forecast::config::DEFAULT_HORIZONS;
use traffic_forecast::planning::roi_potential;
use traffic_forecast::utils::round_to;
use traffic_forecast::{
    DataLoader, Dampening, ForecastRequest, ForecastSettings, Forecaster, Scenario, ScenarioConfig,
};

/// Forecast organic search clicks and traffic value for a keyword set
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Search console performance export (CSV)
    #[arg(long)]
    gsc: PathBuf,

    /// Keyword research export (CSV)
    #[arg(long)]
    keywords: PathBuf,

    /// Scenario: conservative, moderate, aggressive or custom
    #[arg(short, long, default_value = "moderate")]
    scenario: String,

    /// Positions gained under the custom scenario
    #[arg(long)]
    improvement: Option<f64>,

    /// Forecast horizons in days
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_HORIZONS.to_vec())]
    horizons: Vec<u32>,

    /// Start date for target dates (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Scale gains down for keywords already near the top
    #[arg(long)]
    dampen: bool,

    /// Also list the top ranking opportunities
    #[arg(long)]
    opportunities: bool,

    /// Investment to evaluate over one year
    #[arg(long)]
    investment: Option<f64>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let scenario = match args.scenario.parse::<Scenario>()? {
        Scenario::Custom(_) => Scenario::Custom(args.improvement),
        named => named,
    };

    let mut settings = ForecastSettings::default();
    if args.dampen {
        settings = settings.with_dampening(Dampening::ByCurrentPosition);
    }
    let forecaster = Forecaster::new(settings)?;

    let records = DataLoader::load_merged(&args.gsc, &args.keywords)?;

    let mut request = ForecastRequest::new(records.clone(), scenario).with_horizons(args.horizons.clone());
    if let Some(as_of) = args.as_of {
        request = request.with_as_of(as_of);
    }

    let curve = forecaster.build_curve(&records);
    let report = forecaster.run_with_curve(&request, &curve)?;

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!(
        "Scenario: {}",
        scenario.label(&forecaster.settings().scenarios)
    );
    println!(
        "Keywords forecast: {}, skipped: {}, default CPC: {}, fallback curve buckets: {}",
        report.forecast_keywords(),
        report.skipped,
        report.default_cpc_keywords,
        report.fallback_buckets
    );
    for skipped in &report.skipped_records {
        println!("  skipped '{}': {}", skipped.query, skipped.reason);
    }

    for &horizon in &report.horizons {
        println!();
        println!("{} days", horizon);
        println!(
            "{:<32} {:>8} {:>8} {:>8} {:>10} {:>10}",
            "Keyword", "Current", "Proj.", "CTR", "Clicks", "Value"
        );
        for row in report.results_for(horizon) {
            println!(
                "{:<32} {:>8.1} {:>8.1} {:>8.4} {:>10.0} {:>10.2}",
                row.query,
                round_to(row.current_position, 1),
                round_to(row.projected_position, 1),
                round_to(row.projected_ctr, 4),
                round_to(row.projected_clicks, 0),
                round_to(row.projected_value, 2)
            );
        }

        if let Some(summary) = report.summary_for(horizon) {
            println!(
                "Total: {:.0} clicks ({:+.1}%), value {:.2}, top 10: {} ({:+})",
                summary.total_projected_clicks,
                summary.clicks_increase_pct(),
                summary.total_projected_value,
                summary.projected_top_keywords,
                summary.top_increase()
            );
        }
    }

    if args.opportunities {
        println!();
        println!("Top opportunities");
        let opportunities = find_opportunities(&records, &curve, &OpportunityFilter::default());
        for opportunity in opportunities.iter().take(10) {
            println!(
                "{:<32} pos {:>5.1} vol {:>8} score {:>10.1} +{:.0} clicks/month",
                opportunity.query,
                opportunity.current_position,
                opportunity.search_volume,
                opportunity.score,
                opportunity.click_increase
            );
        }
    }

    if let Some(investment) = args.investment {
        let roi = roi_potential(&forecaster, &records, ScenarioConfig::new(scenario), investment)?;
        println!();
        println!(
            "ROI: {:.1}% on {:.2}, annual value {:.2}, payback {:.1} months",
            roi.roi_pct, roi.investment, roi.annual_value, roi.payback_months
        );
    }

    Ok(())
}
