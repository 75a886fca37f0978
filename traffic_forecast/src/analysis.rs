//! Keyword portfolio analysis: opportunities, competitive standing, difficulty bands

use crate::keyword::KeywordRecord;
use crate::utils::safe_div;
use rank_math::CtrCurve;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, Statistics};

/// Filter for `find_opportunities`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpportunityFilter {
    /// Minimum monthly search volume
    pub min_volume: u64,
    /// Worst current position considered
    pub max_position: f64,
    /// Position used to estimate potential clicks
    pub target_position: f64,
}

impl Default for OpportunityFilter {
    fn default() -> Self {
        Self {
            min_volume: 100,
            max_position: 30.0,
            target_position: 3.0,
        }
    }
}

/// A keyword worth pushing up the rankings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub query: String,
    pub current_position: f64,
    pub search_volume: u64,
    pub difficulty: f64,
    /// volume x (1 / position) x ease, higher is better
    pub score: f64,
    /// Monthly clicks at the current position
    pub current_clicks: f64,
    /// Monthly clicks at the target position
    pub potential_clicks: f64,
    pub click_increase: f64,
}

/// Keywords with enough volume, ranked within `max_position` but not first,
/// sorted by opportunity score, best first
pub fn find_opportunities(
    records: &[KeywordRecord],
    curve: &CtrCurve,
    filter: &OpportunityFilter,
) -> Vec<Opportunity> {
    let target_ctr = curve.ctr_at(filter.target_position);

    let mut opportunities: Vec<Opportunity> = records
        .iter()
        .filter_map(|record| {
            let position = record.ranked_position()?;
            let volume = record.search_volume?;
            if volume < filter.min_volume || position > filter.max_position || position <= 1.0 {
                return None;
            }

            let ease = safe_div(100.0 - record.difficulty.clamp(0.0, 100.0), 100.0, 0.0);
            let score = volume as f64 * safe_div(1.0, position, 0.0) * ease;
            let current_clicks = volume as f64 * curve.ctr_at(position);
            let potential_clicks = volume as f64 * target_ctr;

            Some(Opportunity {
                query: record.query.clone(),
                current_position: position,
                search_volume: volume,
                difficulty: record.difficulty,
                score,
                current_clicks,
                potential_clicks,
                click_increase: potential_clicks - current_clicks,
            })
        })
        .collect();

    if opportunities.is_empty() {
        log::warn!("No opportunities found with the current filters");
    }

    opportunities.sort_by(|a, b| b.score.total_cmp(&a.score));
    opportunities
}

/// Where the keyword set stands today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveOverview {
    pub total_keywords: usize,
    pub keywords_top_3: usize,
    pub keywords_top_10: usize,
    pub keywords_top_20: usize,
    pub mean_position: f64,
    pub median_position: f64,
    pub mean_difficulty: f64,
    pub total_volume: u64,
    /// Search volume of keywords ranked in the top 10
    pub captured_volume: u64,
    /// Captured volume as a percentage of total volume
    pub market_share_pct: f64,
}

/// Summarize current rankings across all records
pub fn competitive_overview(records: &[KeywordRecord]) -> CompetitiveOverview {
    let positions: Vec<f64> = records.iter().filter_map(KeywordRecord::ranked_position).collect();
    let count_within = |limit: f64| positions.iter().filter(|&&p| p <= limit).count();

    let total_volume = saturating_sum(records.iter().filter_map(|r| r.search_volume));
    let captured_volume = saturating_sum(
        records
            .iter()
            .filter(|r| r.ranked_position().map_or(false, |p| p <= 10.0))
            .filter_map(|r| r.search_volume),
    );

    let (mean_position, median_position) = if positions.is_empty() {
        (0.0, 0.0)
    } else {
        (positions.iter().mean(), Data::new(positions.clone()).median())
    };

    let mean_difficulty = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|r| r.difficulty).mean()
    };

    CompetitiveOverview {
        total_keywords: records.len(),
        keywords_top_3: count_within(3.0),
        keywords_top_10: count_within(10.0),
        keywords_top_20: count_within(20.0),
        mean_position,
        median_position,
        mean_difficulty,
        total_volume,
        captured_volume,
        market_share_pct: safe_div(captured_volume as f64, total_volume as f64, 0.0) * 100.0,
    }
}

/// Keyword difficulty band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyTier {
    /// [0, 20]
    VeryEasy,
    /// (20, 40]
    Easy,
    /// (40, 60]
    Medium,
    /// (60, 80]
    Hard,
    /// (80, 100]
    VeryHard,
}

impl DifficultyTier {
    /// All tiers, easiest first
    pub const ALL: [DifficultyTier; 5] = [
        DifficultyTier::VeryEasy,
        DifficultyTier::Easy,
        DifficultyTier::Medium,
        DifficultyTier::Hard,
        DifficultyTier::VeryHard,
    ];

    /// Tier for a difficulty score, `None` outside [0, 100]
    pub fn from_difficulty(difficulty: f64) -> Option<Self> {
        match difficulty {
            d if !(0.0..=100.0).contains(&d) => None,
            d if d <= 20.0 => Some(DifficultyTier::VeryEasy),
            d if d <= 40.0 => Some(DifficultyTier::Easy),
            d if d <= 60.0 => Some(DifficultyTier::Medium),
            d if d <= 80.0 => Some(DifficultyTier::Hard),
            _ => Some(DifficultyTier::VeryHard),
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            DifficultyTier::VeryEasy => "Very Easy",
            DifficultyTier::Easy => "Easy",
            DifficultyTier::Medium => "Medium",
            DifficultyTier::Hard => "Hard",
            DifficultyTier::VeryHard => "Very Hard",
        }
    }
}

/// Rankings and volume within one difficulty tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyBand {
    pub tier: DifficultyTier,
    pub keywords: usize,
    /// Mean over keywords with a usable position, 0 when there are none
    pub mean_position: f64,
    pub mean_volume: f64,
    pub total_volume: u64,
}

/// Group records by difficulty tier, one band per tier including empty ones
pub fn difficulty_breakdown(records: &[KeywordRecord]) -> Vec<DifficultyBand> {
    DifficultyTier::ALL
        .iter()
        .map(|&tier| {
            let members: Vec<&KeywordRecord> = records
                .iter()
                .filter(|r| DifficultyTier::from_difficulty(r.difficulty) == Some(tier))
                .collect();

            let positions: Vec<f64> = members.iter().filter_map(|r| r.ranked_position()).collect();
            let volumes: Vec<f64> = members
                .iter()
                .filter_map(|r| r.search_volume)
                .map(|v| v as f64)
                .collect();

            DifficultyBand {
                tier,
                keywords: members.len(),
                mean_position: if positions.is_empty() { 0.0 } else { positions.iter().mean() },
                mean_volume: if volumes.is_empty() { 0.0 } else { volumes.iter().mean() },
                total_volume: saturating_sum(members.iter().filter_map(|r| r.search_volume)),
            }
        })
        .collect()
}

/// Volume total that stops at `u64::MAX`
fn saturating_sum<I: IntoIterator<Item = u64>>(volumes: I) -> u64 {
    volumes.into_iter().fold(0, u64::saturating_add)
}
