//! Tests for LocalRepository.
//!
//! Covers query semantics (window bounds, ordering, weekday filtering),
//! artifact write-once behavior, CSV seeding, and concurrent access
//! patterns for the in-memory repository implementation.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use storewatch::api::{BusinessHourRule, Observation, ObservationStatus, StoreId};
use storewatch::db::config::DataConfig;
use storewatch::db::repositories::LocalRepository;
use storewatch::db::repository::{ArtifactRepository, RepositoryError, StoreDataRepository};

fn ts(h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 25, h, min, 0).unwrap()
}

fn observation(store: &str, timestamp: DateTime<Utc>, status: ObservationStatus) -> Observation {
    Observation {
        store_id: StoreId::new(store),
        timestamp_utc: timestamp,
        status,
    }
}

// =========================================================
// Query Semantics
// =========================================================

#[tokio::test]
async fn test_distinct_store_ids_sorted() {
    let repo = LocalRepository::new();
    repo.insert_observation(observation("zulu", ts(10, 0), ObservationStatus::Active));
    repo.insert_observation(observation("alpha", ts(10, 0), ObservationStatus::Active));
    repo.insert_observation(observation("mike", ts(10, 0), ObservationStatus::Active));

    let ids = repo.distinct_store_ids().await.unwrap();
    let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
    assert_eq!(names, vec!["alpha", "mike", "zulu"]);
}

#[tokio::test]
async fn test_max_timestamp_spans_all_stores() {
    let repo = LocalRepository::new();
    assert_eq!(repo.max_observation_timestamp().await.unwrap(), None);

    repo.insert_observation(observation("a", ts(10, 0), ObservationStatus::Active));
    repo.insert_observation(observation("b", ts(11, 30), ObservationStatus::Inactive));
    repo.insert_observation(observation("a", ts(9, 0), ObservationStatus::Active));

    assert_eq!(
        repo.max_observation_timestamp().await.unwrap(),
        Some(ts(11, 30))
    );
}

#[tokio::test]
async fn test_observations_window_is_inclusive_and_ordered() {
    let repo = LocalRepository::new();
    let store = StoreId::new("a");
    repo.insert_observation(observation("a", ts(9, 59), ObservationStatus::Active));
    repo.insert_observation(observation("a", ts(10, 0), ObservationStatus::Inactive));
    repo.insert_observation(observation("a", ts(11, 0), ObservationStatus::Active));
    repo.insert_observation(observation("a", ts(12, 0), ObservationStatus::Inactive));
    repo.insert_observation(observation("a", ts(12, 1), ObservationStatus::Active));

    let window = repo
        .observations_in_window(&store, ts(10, 0), ts(12, 0))
        .await
        .unwrap();
    let times: Vec<DateTime<Utc>> = window.iter().map(|o| o.timestamp_utc).collect();
    // Both boundary observations are included; results are ascending.
    assert_eq!(times, vec![ts(10, 0), ts(11, 0), ts(12, 0)]);
}

#[tokio::test]
async fn test_observations_for_unknown_store_is_empty() {
    let repo = LocalRepository::new();
    let window = repo
        .observations_in_window(&StoreId::new("ghost"), ts(0, 0), ts(23, 0))
        .await
        .unwrap();
    assert!(window.is_empty());
}

#[tokio::test]
async fn test_business_hours_filtered_by_weekday() {
    let repo = LocalRepository::new();
    let store = StoreId::new("a");
    for day in [0u8, 2, 2, 5] {
        repo.insert_business_hours(BusinessHourRule {
            store_id: store.clone(),
            day_of_week: day,
            start_time_local: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time_local: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        });
    }

    assert_eq!(
        repo.business_hours_for_weekday(&store, 2).await.unwrap().len(),
        2
    );
    assert_eq!(
        repo.business_hours_for_weekday(&store, 6).await.unwrap().len(),
        0
    );
}

#[tokio::test]
async fn test_timezone_assignment() {
    let repo = LocalRepository::new();
    let store = StoreId::new("a");
    assert_eq!(repo.timezone_for_store(&store).await.unwrap(), None);

    repo.set_timezone(store.clone(), "Asia/Kolkata".to_string());
    assert_eq!(
        repo.timezone_for_store(&store).await.unwrap(),
        Some("Asia/Kolkata".to_string())
    );
}

// =========================================================
// Artifact Storage
// =========================================================

#[tokio::test]
async fn test_artifact_roundtrip() {
    let repo = LocalRepository::new();
    assert_eq!(repo.fetch_artifact("r1").await.unwrap(), None);

    repo.store_artifact("r1", b"store_id\n".to_vec()).await.unwrap();
    assert_eq!(
        repo.fetch_artifact("r1").await.unwrap(),
        Some(b"store_id\n".to_vec())
    );
}

#[tokio::test]
async fn test_artifact_is_write_once() {
    let repo = LocalRepository::new();
    repo.store_artifact("r1", b"first".to_vec()).await.unwrap();

    let err = repo.store_artifact("r1", b"second".to_vec()).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict { .. }));
    // The original bytes are untouched.
    assert_eq!(
        repo.fetch_artifact("r1").await.unwrap(),
        Some(b"first".to_vec())
    );
}

// =========================================================
// Concurrent Access
// =========================================================

#[tokio::test]
async fn test_concurrent_inserts_across_stores() {
    let repo = Arc::new(LocalRepository::new());

    let mut handles = vec![];
    for i in 0..10 {
        let repo_clone = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            for minute in 0..30 {
                repo_clone.insert_observation(observation(
                    &format!("store_{}", i),
                    ts(10, minute),
                    ObservationStatus::Active,
                ));
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(repo.distinct_store_ids().await.unwrap().len(), 10);
    let window = repo
        .observations_in_window(&StoreId::new("store_3"), ts(10, 0), ts(10, 29))
        .await
        .unwrap();
    assert_eq!(window.len(), 30);
}

#[tokio::test]
async fn test_concurrent_reads_while_writing() {
    let repo = Arc::new(LocalRepository::new());
    repo.insert_observation(observation("a", ts(10, 0), ObservationStatus::Active));

    let writer = {
        let repo = Arc::clone(&repo);
        tokio::spawn(async move {
            for minute in 1..40 {
                repo.insert_observation(observation("a", ts(10, minute), ObservationStatus::Active));
            }
        })
    };
    let reader = {
        let repo = Arc::clone(&repo);
        tokio::spawn(async move {
            for _ in 0..40 {
                let window = repo
                    .observations_in_window(&StoreId::new("a"), ts(9, 0), ts(11, 0))
                    .await
                    .unwrap();
                assert!(!window.is_empty());
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
}

// =========================================================
// CSV Seeding
// =========================================================

fn seed_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("storewatch_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn seed_config(dir: &std::path::Path) -> DataConfig {
    let mut config = DataConfig::default();
    config.data.data_dir = dir.to_path_buf();
    config
}

#[tokio::test]
async fn test_from_config_loads_seed_files() {
    let dir = seed_dir("seed");
    std::fs::write(
        dir.join("store_status.csv"),
        "store_id,status,timestamp_utc\n\
         7,active,2023-01-25 10:05:00.123456 UTC\n\
         7,inactive,2023-01-25 11:05:00 UTC\n\
         9,active,2023-01-25 09:00:00 UTC\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("menu_hours.csv"),
        "store_id,dayOfWeek,start_time_local,end_time_local\n\
         7,2,09:00:00,17:00:00\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("timezones.csv"),
        "store_id,timezone_str\n7,America/Denver\n",
    )
    .unwrap();

    let repo = LocalRepository::from_config(&seed_config(&dir)).unwrap();

    let ids = repo.distinct_store_ids().await.unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(
        repo.timezone_for_store(&StoreId::new("7")).await.unwrap(),
        Some("America/Denver".to_string())
    );
    assert_eq!(
        repo.business_hours_for_weekday(&StoreId::new("7"), 2)
            .await
            .unwrap()
            .len(),
        1
    );
    let max = repo.max_observation_timestamp().await.unwrap().unwrap();
    assert_eq!(max, Utc.with_ymd_and_hms(2023, 1, 25, 11, 5, 0).unwrap());

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_from_config_tolerates_missing_files() {
    let dir = seed_dir("missing");
    let repo = LocalRepository::from_config(&seed_config(&dir)).unwrap();
    assert!(repo.distinct_store_ids().await.unwrap().is_empty());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_from_config_rejects_malformed_rows() {
    let dir = seed_dir("malformed");
    std::fs::write(
        dir.join("store_status.csv"),
        "store_id,status,timestamp_utc\n7,active,not-a-timestamp\n",
    )
    .unwrap();

    let result = LocalRepository::from_config(&seed_config(&dir));
    assert!(matches!(
        result,
        Err(RepositoryError::ValidationError { .. })
    ));
    std::fs::remove_dir_all(&dir).ok();
}
