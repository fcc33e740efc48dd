//! Basic tests for replydrift-engine

use replydrift_engine::*;
use std::io::Write;
use tempfile::NamedTempFile;

const AIRLINE: u64 = 56377143;
// 2021-03-01T12:00:00Z, a Monday
const MONDAY_NOON: i64 = 1_614_600_000_000;
const HOUR_MS: i64 = 3_600_000;

fn parse_score(text: &str) -> f64 {
    text.split_whitespace()
        .last()
        .and_then(|t| t.parse().ok())
        .unwrap_or(0.0)
}

fn numeric() -> FnScorer<fn(&str) -> f64> {
    FnScorer(parse_score as fn(&str) -> f64)
}

fn tweet(id: u64, user: u64, text: &str, ts: i64, reply_to: Option<u64>) -> String {
    serde_json::json!({
        "id": id,
        "text": text,
        "timestamp_ms": ts.to_string(),
        "created_at": "Mon Mar 01 12:00:00 +0000 2021",
        "in_reply_to_status_id": reply_to,
        "user": { "id": user },
    })
    .to_string()
}

fn dataset(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_pooled_average_over_trees() {
    let store: InMemoryStore = vec![
        Post::new(1u64, 1, "root 0", 0),
        Post::new(2u64, 2, "leaf 10", 1).reply_to(1u64),
        Post::new(10u64, 1, "root 0", 0),
        Post::new(11u64, 2, "leaf 0", 1).reply_to(10u64),
        Post::new(12u64, 2, "leaf 0", 1).reply_to(10u64),
        Post::new(13u64, 2, "leaf 0", 1).reply_to(10u64),
    ]
    .into_iter()
    .collect();
    let index = ReplyIndex::build(&store).unwrap();
    let trees: Vec<&ConversationTree> = index.trees().collect();

    let aggregator = SentimentAggregator::new(&store, numeric());
    // one tree of mean 10 and one of mean 0 pool to 10 / 4
    assert_eq!(aggregator.average_sentiment(&trees).unwrap(), 2.5);
}

#[test]
fn test_internal_reply_does_not_contribute() {
    let store: InMemoryStore = vec![
        Post::new(1u64, 1, "0", 0),
        Post::new(2u64, 2, "100", 1).reply_to(1u64),
        Post::new(3u64, 1, "5", 2).reply_to(2u64),
    ]
    .into_iter()
    .collect();
    let index = ReplyIndex::build(&store).unwrap();
    let trees: Vec<&ConversationTree> = index.trees().collect();

    let aggregator = SentimentAggregator::new(&store, numeric());
    assert_eq!(aggregator.average_sentiment(&trees).unwrap(), 5.0);
}

#[test]
fn test_empty_input_fails() {
    let store = InMemoryStore::new();
    let aggregator = SentimentAggregator::new(&store, numeric());
    let trees: Vec<ConversationTree> = Vec::new();
    let err = aggregator.average_sentiment(&trees).unwrap_err();
    assert!(err.is_empty_pool());
    assert!(err.to_string().contains("division by zero"));
}

#[test]
fn test_missing_root_record() {
    let store = InMemoryStore::new();
    let tree = ConversationTree::from_replies(1u64, [(2u64, 1u64)]).unwrap();
    let aggregator = SentimentAggregator::new(&store, numeric());
    let err = aggregator.average_sentiment(&[tree]).unwrap_err();
    assert!(matches!(err, EngineError::MissingRecord { id: PostId(1) }));
}

#[test]
fn test_monday_and_hour_buckets_from_dataset() {
    let file = dataset(&[
        // 12:00 UTC on Monday
        tweet(1, 7, "complaint 0", MONDAY_NOON, None),
        tweet(2, AIRLINE, "answer 1", MONDAY_NOON + 60_000, Some(1)),
        // 01:00 UTC on Monday
        tweet(10, 8, "question 0", MONDAY_NOON - 11 * HOUR_MS, None),
        tweet(11, AIRLINE, "answer -1", MONDAY_NOON - 11 * HOUR_MS + 1, Some(10)),
    ]);
    let (store, stats) = load_files(&[file.path()]).unwrap();
    assert_eq!(stats.loaded, 4);

    let config = AnalysisConfig::builder()
        .empty_buckets(EmptyBucketPolicy::Skip)
        .build()
        .unwrap();
    let index = ReplyIndex::build(&store).unwrap();
    let analyzer = Analyzer::builder()
        .config(config)
        .store(store)
        .source(index)
        .scorer(numeric())
        .build()
        .unwrap();

    let weekdays = analyzer
        .sentiment_by_weekday(AIRLINE, RootFilter::Both)
        .unwrap();
    assert_eq!(weekdays.average(Weekday::Monday), Some(0.0));
    assert_eq!(weekdays.skipped().count(), 6);

    let hours = analyzer.sentiment_by_hour(AIRLINE, RootFilter::Both).unwrap();
    let ten = hours.rows.iter().find(|row| row.label.hour() == 10).unwrap();
    let twenty_three = hours.rows.iter().find(|row| row.label.hour() == 23).unwrap();
    assert_eq!(ten.average, Some(1.0));
    assert_eq!(twenty_three.average, Some(-1.0));
}

#[test]
fn test_day_of_year_counts_posts() {
    let file = dataset(&[
        tweet(1, 7, "a", MONDAY_NOON, None),
        tweet(2, AIRLINE, "b", MONDAY_NOON + 1, Some(1)),
        tweet(3, 7, "c", MONDAY_NOON + 2, Some(2)),
        tweet(4, 7, "d", MONDAY_NOON + 3, Some(2)),
    ]);
    let (store, _) = load_files(&[file.path()]).unwrap();
    let analyzer = Analyzer::from_store(AnalysisConfig::default(), store).unwrap();

    let counts = analyzer
        .activity_by_day_of_year(AIRLINE, RootFilter::Both)
        .unwrap();
    let day = DayOfYear::from_ordinal(60, LeapDayPolicy::Fold).unwrap();
    assert_eq!(counts[&day], 4);
    assert_eq!(counts.values().sum::<u64>(), 4);
}

#[test]
fn test_default_policy_fails_on_empty_weekday() {
    let file = dataset(&[
        tweet(1, 7, "0", MONDAY_NOON, None),
        tweet(2, AIRLINE, "1", MONDAY_NOON + 1, Some(1)),
    ]);
    let (store, _) = load_files(&[file.path()]).unwrap();
    let index = ReplyIndex::build(&store).unwrap();
    let analyzer = Analyzer::builder()
        .store(store)
        .source(index)
        .scorer(numeric())
        .build()
        .unwrap();

    let err = analyzer
        .sentiment_by_weekday(AIRLINE, RootFilter::Both)
        .unwrap_err();
    assert!(err.is_empty_pool());
    assert!(err.to_string().contains("Tuesday"));
}

#[test]
fn test_lexicon_scorer_through_analyzer() {
    let file = dataset(&[
        tweet(1, 7, "my flight is delayed", MONDAY_NOON, None),
        tweet(2, AIRLINE, "sorry to hear that", MONDAY_NOON + 1, Some(1)),
        tweet(3, 7, "thanks, great help", MONDAY_NOON + 2, Some(2)),
    ]);
    let (store, _) = load_files(&[file.path()]).unwrap();
    let analyzer = Analyzer::from_store(AnalysisConfig::default(), store).unwrap();

    let report = analyzer
        .sentiment_by_account(&[AIRLINE], RootFilter::NoAirline)
        .unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].account.name, "KLM");
    assert_eq!(report[0].leaves, 1);
    assert!(report[0].average.unwrap() > 0.0);
}

#[test]
fn test_config_round_trip() {
    let config = AnalysisConfig::builder()
        .utc_offset_minutes(60)
        .hour_shift(3)
        .leap_day(LeapDayPolicy::Reject)
        .root_filter(RootFilter::NoAirline)
        .build()
        .unwrap();

    let toml = config.to_toml_string().unwrap();
    let parsed = AnalysisConfig::from_toml_str(&toml).unwrap();
    assert_eq!(parsed, config);
}
