//! Loading search-console and keyword-research exports
//!
//! Both exports come from third-party tools with varying header names, so
//! columns are found through alias lists. The delimiter is detected from
//! the start of the file. Merging joins on the query text and keeps the
//! best-ranked row per query.

use crate::error::{ForecastError, Result};
use crate::keyword::KeywordRecord;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const QUERY_ALIASES: &[&str] = &["query", "queries", "search query", "search term", "top queries"];
const CLICKS_ALIASES: &[&str] = &["clicks", "total clicks"];
const IMPRESSIONS_ALIASES: &[&str] = &["impressions", "total impressions", "impr."];
const GSC_POSITION_ALIASES: &[&str] = &["avg. pos", "average position", "avg position", "position"];

const KEYWORD_ALIASES: &[&str] = &["keyword", "keywords", "query", "search term"];
const VOLUME_ALIASES: &[&str] = &["search volume", "volume", "vol"];
const DIFFICULTY_ALIASES: &[&str] = &["keyword difficulty", "difficulty", "kd", "kd %"];
const RESEARCH_POSITION_ALIASES: &[&str] = &["position", "current position", "rank"];
const URL_ALIASES: &[&str] = &["url", "landing page", "page"];

/// Difficulty assumed when the export has none
pub const DEFAULT_DIFFICULTY: f64 = 50.0;

/// One row of a search-console performance export
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConsoleRow {
    pub query: String,
    pub clicks: u64,
    pub impressions: u64,
    pub position: Option<f64>,
}

/// One row of a keyword-research export
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordResearchRow {
    pub keyword: String,
    pub search_volume: Option<u64>,
    pub difficulty: f64,
    pub position: Option<f64>,
    pub url: Option<String>,
}

/// Data loader for keyword exports
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a search-console export from a CSV file
    pub fn search_console_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<SearchConsoleRow>> {
        let content = fs::read_to_string(path)?;
        Self::search_console_from_str(&content)
    }

    /// Parse a search-console export held in memory
    pub fn search_console_from_str(content: &str) -> Result<Vec<SearchConsoleRow>> {
        let (headers, rows) = read_table(content)?;

        let query = require_column(&headers, QUERY_ALIASES, "query", "search console")?;
        let clicks = require_column(&headers, CLICKS_ALIASES, "clicks", "search console")?;
        let impressions =
            require_column(&headers, IMPRESSIONS_ALIASES, "impressions", "search console")?;
        let position = find_column(&headers, GSC_POSITION_ALIASES);

        let parsed: Vec<SearchConsoleRow> = rows
            .iter()
            .filter_map(|row| {
                let query = row.get(query)?.trim();
                if query.is_empty() {
                    return None;
                }

                Some(SearchConsoleRow {
                    query: query.to_string(),
                    clicks: parse_count(row.get(clicks)).unwrap_or(0),
                    impressions: parse_count(row.get(impressions)).unwrap_or(0),
                    position: position.and_then(|i| parse_number(row.get(i))),
                })
            })
            .collect();

        log::info!("Loaded {} search console rows", parsed.len());
        Ok(parsed)
    }

    /// Load a keyword-research export from a CSV file
    pub fn keyword_research_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<KeywordResearchRow>> {
        let content = fs::read_to_string(path)?;
        Self::keyword_research_from_str(&content)
    }

    /// Parse a keyword-research export held in memory
    pub fn keyword_research_from_str(content: &str) -> Result<Vec<KeywordResearchRow>> {
        let (headers, rows) = read_table(content)?;

        let keyword = require_column(&headers, KEYWORD_ALIASES, "keyword", "keyword research")?;
        let volume = require_column(&headers, VOLUME_ALIASES, "search volume", "keyword research")?;
        let difficulty = find_column(&headers, DIFFICULTY_ALIASES);
        let position = find_column(&headers, RESEARCH_POSITION_ALIASES);
        let url = find_column(&headers, URL_ALIASES);

        let parsed: Vec<KeywordResearchRow> = rows
            .iter()
            .filter_map(|row| {
                let keyword = row.get(keyword)?.trim();
                if keyword.is_empty() {
                    return None;
                }

                Some(KeywordResearchRow {
                    keyword: keyword.to_string(),
                    search_volume: parse_count(row.get(volume)),
                    difficulty: difficulty
                        .and_then(|i| parse_number(row.get(i)))
                        .map(|d| d.clamp(0.0, 100.0))
                        .unwrap_or(DEFAULT_DIFFICULTY),
                    position: position.and_then(|i| parse_number(row.get(i))),
                    url: url
                        .and_then(|i| row.get(i))
                        .map(str::trim)
                        .filter(|u| !u.is_empty())
                        .map(str::to_string),
                })
            })
            .collect();

        log::info!("Loaded {} keyword research rows", parsed.len());
        Ok(parsed)
    }

    /// Join both sources on the query text
    ///
    /// Only queries present in both sources are kept. A query listed more
    /// than once in the search-console export keeps its best-ranked row. The
    /// keyword-research position is preferred, the search-console position
    /// fills the gap. Duplicate queries keep the best-ranked row. Output is
    /// sorted by position, unranked records last.
    pub fn merge(gsc: &[SearchConsoleRow], research: &[KeywordResearchRow]) -> Vec<KeywordRecord> {
        let mut gsc_by_query: HashMap<String, &SearchConsoleRow> = HashMap::new();
        for row in gsc {
            gsc_by_query
                .entry(join_key(&row.query))
                .and_modify(|kept| {
                    if ranks_better(row.position, kept.position) {
                        *kept = row;
                    }
                })
                .or_insert(row);
        }

        let mut merged: Vec<KeywordRecord> = research
            .iter()
            .filter_map(|kw| {
                let row = gsc_by_query.get(&join_key(&kw.keyword))?;
                Some(KeywordRecord {
                    query: row.query.clone(),
                    current_position: kw.position.or(row.position),
                    search_volume: kw.search_volume,
                    difficulty: kw.difficulty,
                    clicks: row.clicks,
                    impressions: row.impressions,
                    observed_ctr: None,
                    url: kw.url.clone(),
                })
            })
            .collect();

        merged.sort_by(|a, b| compare_positions(a.current_position, b.current_position));

        let mut seen = std::collections::HashSet::new();
        merged.retain(|r| seen.insert(join_key(&r.query)));

        log::info!("Merged data: {} keywords", merged.len());
        merged
    }

    /// Load and merge both exports
    pub fn load_merged<P: AsRef<Path>, Q: AsRef<Path>>(gsc_path: P, research_path: Q) -> Result<Vec<KeywordRecord>> {
        let gsc = Self::search_console_from_csv(gsc_path)?;
        let research = Self::keyword_research_from_csv(research_path)?;
        let merged = Self::merge(&gsc, &research);

        if merged.is_empty() {
            return Err(ForecastError::DataError(
                "No keywords matched between the search console and keyword research data".to_string(),
            ));
        }

        Ok(merged)
    }
}

/// Semicolon when the sample holds more semicolons than commas
fn detect_delimiter(content: &str) -> u8 {
    let sample: String = content.chars().take(2000).collect();
    if sample.matches(';').count() > sample.matches(',').count() {
        b';'
    } else {
        b','
    }
}

fn read_table(content: &str) -> Result<(StringRecord, Vec<StringRecord>)> {
    let mut reader = ReaderBuilder::new()
        .delimiter(detect_delimiter(content))
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((headers, rows))
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    let lower: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    aliases
        .iter()
        .find_map(|alias| lower.iter().position(|h| h == alias))
}

fn require_column(headers: &StringRecord, aliases: &[&str], name: &str, source: &str) -> Result<usize> {
    find_column(headers, aliases).ok_or_else(|| {
        ForecastError::DataError(format!(
            "Missing required column '{}' in {} data, available columns: {:?}",
            name,
            source,
            headers.iter().collect::<Vec<_>>()
        ))
    })
}

fn parse_number(field: Option<&str>) -> Option<f64> {
    let text = field?.trim();
    if text.is_empty() {
        return None;
    }

    text.parse::<f64>()
        .or_else(|_| text.replace(',', "").parse::<f64>())
        .ok()
        .filter(|v| v.is_finite())
}

fn parse_count(field: Option<&str>) -> Option<u64> {
    parse_number(field)
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u64)
}

/// Finite positions first, best rank first
fn compare_positions(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.filter(|p| p.is_finite());
    let b = b.filter(|p| p.is_finite());
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn ranks_better(candidate: Option<f64>, kept: Option<f64>) -> bool {
    compare_positions(candidate, kept) == Ordering::Less
}

fn join_key(query: &str) -> String {
    query.trim().to_lowercase()
}
