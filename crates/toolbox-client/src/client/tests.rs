//! Unit tests for client module.

use super::*;

// ============================================================================
// ClientConfig Tests
// ============================================================================

#[test]
fn test_client_config_default() {
    let config = ClientConfig::default();

    assert_eq!(config.base_url, "http://localhost:9393");
    assert_eq!(config.timeout, Duration::from_secs(30));
}

#[test]
fn test_client_config_clone() {
    let config = ClientConfig {
        base_url: "http://test.com".to_string(),
        timeout: Duration::from_secs(10),
    };

    let cloned = config.clone();
    assert_eq!(cloned.base_url, config.base_url);
    assert_eq!(cloned.timeout, config.timeout);
}

// ============================================================================
// ToolboxClient Creation Tests
// ============================================================================

#[test]
fn test_toolbox_client_new() {
    let client = ToolboxClient::new(ClientConfig::default());
    assert!(client.is_ok());
}

#[test]
fn test_toolbox_client_invalid_base_url() {
    let result = ToolboxClient::with_base_url("not a url");
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

#[test]
fn test_toolbox_client_cannot_be_a_base() {
    let result = ToolboxClient::with_base_url("mailto:admin@example.com");
    assert!(matches!(result, Err(Error::CannotBeABase(_))));
}

// ============================================================================
// URL Building Tests
// ============================================================================

#[test]
fn test_endpoint_root() {
    let client = ToolboxClient::with_base_url("http://localhost:9393").unwrap();
    assert_eq!(client.endpoint(&[]).unwrap().as_str(), "http://localhost:9393/");
}

#[test]
fn test_endpoint_segments() {
    let client = ToolboxClient::with_base_url("http://localhost:9393").unwrap();
    let url = client.endpoint(&["exams", "paginate", "10", "20"]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:9393/exams/paginate/10/20");
}

#[test]
fn test_endpoint_trailing_slash() {
    let client = ToolboxClient::with_base_url("http://localhost:9393/").unwrap();
    let url = client.endpoint(&["notes", "4"]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:9393/notes/4");
}

#[test]
fn test_endpoint_keeps_base_path() {
    let client = ToolboxClient::with_base_url("http://example.com/toolbox/").unwrap();
    let url = client.endpoint(&["exams-count"]).unwrap();
    assert_eq!(url.as_str(), "http://example.com/toolbox/exams-count");
}

#[test]
fn test_endpoint_encodes_slashes_in_filenames() {
    let client = ToolboxClient::with_base_url("http://localhost:9393").unwrap();
    let url = client.endpoint(&["download", "a/b.txt"]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:9393/download/a%2Fb.txt");
}

// ============================================================================
// Message Extraction Tests
// ============================================================================

#[test]
fn test_message_of_json_body() {
    assert_eq!(
        message_of(r#"{"message":"sorry, you are not authorized."}"#),
        "sorry, you are not authorized."
    );
}

#[test]
fn test_message_of_plain_body() {
    assert_eq!(message_of("Bad Gateway"), "Bad Gateway");
}
