//! Exam query tests.

use toolbox_tests::{MOST_RECENT_EXAM_ID, SAMPLE_EXAM_COUNT, TestServer};

fn ids(rows: &[toolbox_client::Record]) -> Vec<i64> {
    rows.iter()
        .map(|row| row["id"].as_i64().expect("id is an integer"))
        .collect()
}

#[tokio::test]
async fn test_list_and_count_agree() {
    let server = TestServer::start().await;

    let exams = server.client.list_exams().await.expect("Failed to list exams");
    let count = server.client.count_exams().await.expect("Failed to count exams");

    assert_eq!(exams.len() as i64, count);
    assert_eq!(count, SAMPLE_EXAM_COUNT);
}

#[tokio::test]
async fn test_paginate_window() {
    let server = TestServer::start().await;

    let page = server
        .client
        .paginate_exams(10, 20)
        .await
        .expect("Failed to paginate");
    assert_eq!(ids(&page), (21..=30).collect::<Vec<_>>());

    let past_end = server
        .client
        .paginate_exams(10, 100)
        .await
        .expect("Failed to paginate");
    assert!(past_end.is_empty());
}

#[tokio::test]
async fn test_pages_cover_all_exams() {
    let server = TestServer::start().await;

    let mut seen = Vec::new();
    for page in 0..4 {
        let rows = server
            .client
            .paginate_exams(8, page * 8)
            .await
            .expect("Failed to paginate");
        seen.extend(ids(&rows));
    }
    assert_eq!(seen, (1..=SAMPLE_EXAM_COUNT).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_last_twenty_variants_agree() {
    let server = TestServer::start().await;

    let built = server
        .client
        .last_twenty_exams()
        .await
        .expect("Failed to get last twenty");
    let by_sql = server
        .client
        .last_twenty_exams_by_sql()
        .await
        .expect("Failed to get last twenty by sql");

    assert_eq!(built, by_sql);
    assert_eq!(built.len(), 20);
    assert_eq!(built[0]["id"], MOST_RECENT_EXAM_ID);
    for row in &built {
        assert_eq!(row.len(), 4);
        assert!(row.contains_key("matricola"));
        assert!(!row.contains_key("voto"));
    }
}

#[tokio::test]
async fn test_last_exam_is_highest_id() {
    let server = TestServer::start().await;

    let last = server
        .client
        .last_exam()
        .await
        .expect("Failed to get last exam")
        .expect("There are exams");
    assert_eq!(last["id"], SAMPLE_EXAM_COUNT);
}

#[tokio::test]
async fn test_get_exam() {
    let server = TestServer::start().await;

    let exam = server
        .client
        .get_exam(5)
        .await
        .expect("Failed to get exam")
        .expect("Exam 5 exists");
    assert_eq!(exam["matricola"], "M00005");

    let missing = server.client.get_exam(999).await.expect("Failed to get exam");
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_empty_exam_table() {
    let server = TestServer::start_with(Default::default()).await;

    assert_eq!(server.client.count_exams().await.expect("Count failed"), 0);
    assert!(server.client.last_exam().await.expect("Last failed").is_none());
    assert!(
        server
            .client
            .last_twenty_exams()
            .await
            .expect("Last twenty failed")
            .is_empty()
    );
}
