// This program walks through the crates of the workspace on a small keyword set
use seo_forecast_workspace::rank_math::{CtrCurve, Dampening, PositionProjector, Realization};
use seo_forecast_workspace::traffic_forecast::analysis::{find_opportunities, OpportunityFilter};
use seo_forecast_workspace::{describe, summarize, KeywordRecord, Scenario};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Exploring the SEO forecast libraries\n");

    let records = vec![
        KeywordRecord::new("seo tools", 8.5, 8100).with_clicks(1200, 25000),
        KeywordRecord::new("keyword research", 12.3, 5400).with_clicks(800, 18000),
        KeywordRecord::new("backlink analysis", 15.7, 2900).with_clicks(600, 12000),
        KeywordRecord::new("technical seo", 18.2, 1600).with_clicks(400, 8000),
    ];

    // Rank math
    println!("=== Rank Math ===");
    let curve = CtrCurve::default();
    for position in [1.0, 3.0, 10.0, 25.0] {
        println!("CTR at position {:>4}: {:.3}", position, curve.ctr_at(position));
    }

    let projector = PositionProjector::new(Realization::Linear, Dampening::None, &[90, 120, 360]);
    for horizon in [90, 120, 360] {
        println!(
            "Position 15 improved by 10 after {:>3} days: {:.1}",
            horizon,
            projector.project(15.0, 10.0, horizon)?
        );
    }

    // Traffic forecast
    println!("\n=== Traffic Forecast ===");
    for scenario in Scenario::NAMED {
        println!("{}", scenario);
        for summary in summarize(records.clone(), scenario)? {
            println!("  {}", describe(&summary));
        }
    }

    println!("\n=== Opportunities ===");
    for opportunity in find_opportunities(&records, &curve, &OpportunityFilter::default()) {
        println!(
            "{:<20} score {:>8.1}  +{:.0} clicks/month",
            opportunity.query, opportunity.score, opportunity.click_increase
        );
    }

    println!("\nDone exploring");
    Ok(())
}
