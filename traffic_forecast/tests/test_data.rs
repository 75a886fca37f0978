use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;
use traffic_forecast::data::{DataLoader, KeywordResearchRow, SearchConsoleRow, DEFAULT_DIFFICULTY};
use traffic_forecast::ForecastError;

#[test]
fn test_search_console_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Top queries,Clicks,Impressions,CTR,Position").unwrap();
    writeln!(file, "seo tools,1200,25000,4.8%,8.5").unwrap();
    writeln!(file, "keyword research,800,18000,4.4%,12.3").unwrap();
    writeln!(file, ",5,10,50%,3").unwrap();

    let rows = DataLoader::search_console_from_csv(file.path()).unwrap();

    assert_eq!(
        rows,
        vec![
            SearchConsoleRow {
                query: "seo tools".to_string(),
                clicks: 1200,
                impressions: 25000,
                position: Some(8.5),
            },
            SearchConsoleRow {
                query: "keyword research".to_string(),
                clicks: 800,
                impressions: 18000,
                position: Some(12.3),
            },
        ]
    );
}

#[test]
fn test_semicolon_export_with_aliases() {
    let content = "Keyword;Volume;KD;Rank;Landing Page\n\
                   seo tools;8100;78;8;https://example.com/seo-tools\n\
                   backlink analysis;;;16;\n";

    let rows = DataLoader::keyword_research_from_str(content).unwrap();

    assert_eq!(
        rows,
        vec![
            KeywordResearchRow {
                keyword: "seo tools".to_string(),
                search_volume: Some(8100),
                difficulty: 78.0,
                position: Some(8.0),
                url: Some("https://example.com/seo-tools".to_string()),
            },
            KeywordResearchRow {
                keyword: "backlink analysis".to_string(),
                search_volume: None,
                difficulty: DEFAULT_DIFFICULTY,
                position: Some(16.0),
                url: None,
            },
        ]
    );
}

#[test]
fn test_missing_required_column() {
    let result = DataLoader::search_console_from_str("Query,Clicks\nseo tools,10\n");

    match result {
        Err(ForecastError::DataError(msg)) => assert!(msg.contains("impressions")),
        other => panic!("Expected DataError, got {:?}", other),
    }
}

#[test]
fn test_missing_file() {
    let result = DataLoader::search_console_from_csv("/nonexistent/gsc.csv");
    assert!(matches!(result, Err(ForecastError::IoError(_))));
}

#[test]
fn test_merge_joins_and_keeps_best_rank() {
    let gsc = vec![
        SearchConsoleRow {
            query: "SEO Tools".to_string(),
            clicks: 1200,
            impressions: 25000,
            position: Some(9.1),
        },
        SearchConsoleRow {
            query: "technical seo".to_string(),
            clicks: 400,
            impressions: 8000,
            position: Some(18.2),
        },
        SearchConsoleRow {
            query: "only in gsc".to_string(),
            clicks: 1,
            impressions: 10,
            position: Some(40.0),
        },
    ];
    let research = vec![
        KeywordResearchRow {
            keyword: "technical seo".to_string(),
            search_volume: Some(1600),
            difficulty: 68.0,
            position: None,
            url: None,
        },
        KeywordResearchRow {
            keyword: "seo tools".to_string(),
            search_volume: Some(8100),
            difficulty: 78.0,
            position: Some(11.0),
            url: Some("https://example.com/b".to_string()),
        },
        KeywordResearchRow {
            keyword: "seo tools".to_string(),
            search_volume: Some(8100),
            difficulty: 78.0,
            position: Some(8.0),
            url: Some("https://example.com/a".to_string()),
        },
    ];

    let merged = DataLoader::merge(&gsc, &research);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].query, "SEO Tools");
    assert_eq!(merged[0].current_position, Some(8.0));
    assert_eq!(merged[0].url.as_deref(), Some("https://example.com/a"));
    assert_eq!(merged[0].clicks, 1200);
    assert_eq!(merged[0].search_volume, Some(8100));

    // Research row without a position takes the search console position
    assert_eq!(merged[1].query, "technical seo");
    assert_eq!(merged[1].current_position, Some(18.2));
    assert_eq!(merged[1].impressions, 8000);
}

#[test]
fn test_load_merged_without_overlap() {
    let mut gsc = NamedTempFile::new().unwrap();
    writeln!(gsc, "Query,Clicks,Impressions,Position").unwrap();
    writeln!(gsc, "alpha,1,10,3").unwrap();

    let mut research = NamedTempFile::new().unwrap();
    writeln!(research, "Keyword,Search Volume,Keyword Difficulty,Position,URL").unwrap();
    writeln!(research, "beta,100,20,4,https://example.com").unwrap();

    let result = DataLoader::load_merged(gsc.path(), research.path());
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_merge_keeps_best_ranked_search_console_row() {
    let gsc = vec![
        SearchConsoleRow {
            query: "seo tools".to_string(),
            clicks: 10,
            impressions: 2000,
            position: Some(25.0),
        },
        SearchConsoleRow {
            query: "SEO tools".to_string(),
            clicks: 900,
            impressions: 12000,
            position: Some(4.0),
        },
        SearchConsoleRow {
            query: "seo tools".to_string(),
            clicks: 1,
            impressions: 50,
            position: None,
        },
    ];
    let research = vec![KeywordResearchRow {
        keyword: "seo tools".to_string(),
        search_volume: Some(8100),
        difficulty: 78.0,
        position: None,
        url: None,
    }];

    let merged = DataLoader::merge(&gsc, &research);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].current_position, Some(4.0));
    assert_eq!(merged[0].clicks, 900);
    assert_eq!(merged[0].impressions, 12000);
}
