//! Note CRUD tests.

use toolbox_client::{Error, NoteRequest};
use toolbox_tests::TestServer;

#[tokio::test]
async fn test_note_lifecycle() {
    let server = TestServer::start().await;
    let client = &server.client;

    // Create
    let created = client
        .create_note(&NoteRequest::new("prova", "corpo del messaggio di prova!"))
        .await
        .expect("Failed to create note");
    assert_eq!(created.title, "prova");

    // Read
    let fetched = client
        .get_note(created.id)
        .await
        .expect("Failed to get note")
        .expect("Note should exist");
    assert_eq!(fetched, created);

    // Update only the body
    let updated = client
        .update_note(created.id, &NoteRequest::body("nuovo corpo"))
        .await
        .expect("Failed to update note")
        .expect("Note should exist");
    assert_eq!(updated.title, "prova");
    assert_eq!(updated.body, "nuovo corpo");
    assert!(updated.updated_at >= created.updated_at);

    // Delete twice, both succeed
    client.delete_note(created.id).await.expect("First delete failed");
    client.delete_note(created.id).await.expect("Second delete failed");

    assert!(client.get_note(created.id).await.expect("Get failed").is_none());
}

#[tokio::test]
async fn test_create_note_rejects_short_title() {
    let server = TestServer::start().await;

    let result = server
        .client
        .create_note(&NoteRequest::new("ab", "body"))
        .await;
    match result {
        Err(Error::Validation(fields)) => {
            assert!(fields.contains_key("title"));
            assert!(!fields.contains_key("body"));
        }
        other => panic!("Expected validation error, got {:?}", other),
    }

    let notes = server.client.list_notes().await.expect("Failed to list notes");
    assert!(notes.is_empty());
}

#[tokio::test]
async fn test_create_note_requires_both_fields() {
    let server = TestServer::start().await;

    let result = server.client.create_note(&NoteRequest::default()).await;
    match result {
        Err(Error::Validation(fields)) => {
            assert_eq!(fields["title"][0], "can't be blank");
            assert_eq!(fields["body"], vec!["can't be blank".to_string()]);
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_missing_note() {
    let server = TestServer::start().await;

    let updated = server
        .client
        .update_note(4242, &NoteRequest::title("a valid title"))
        .await
        .expect("Update request failed");
    assert!(updated.is_none());
}

#[tokio::test]
async fn test_update_keeps_invalid_note_unchanged() {
    let server = TestServer::start().await;
    let client = &server.client;

    let created = client
        .create_note(&NoteRequest::new("original", "body"))
        .await
        .expect("Failed to create note");

    let result = client.update_note(created.id, &NoteRequest::title("x")).await;
    assert!(matches!(result, Err(Error::Validation(_))));

    let stored = client
        .get_note(created.id)
        .await
        .expect("Get failed")
        .expect("Note should exist");
    assert_eq!(stored.title, "original");
}

#[tokio::test]
async fn test_notes_listed_by_id() {
    let server = TestServer::start().await;
    let client = &server.client;

    let mut ids = Vec::new();
    for title in ["first", "second", "third"] {
        let note = client
            .create_note(&NoteRequest::new(title, "body"))
            .await
            .expect("Failed to create note");
        ids.push(note.id);
    }

    let listed: Vec<i64> = client
        .list_notes()
        .await
        .expect("Failed to list notes")
        .iter()
        .map(|note| note.id)
        .collect();
    assert_eq!(listed, ids);
}
