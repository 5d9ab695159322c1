//! Unit tests for error module.

use super::*;

#[test]
fn test_api_error_display() {
    let error = Error::Api {
        status: 500,
        message: "Sorry there was a nasty error - DATABASE".to_string(),
    };

    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("nasty error"));
}

#[test]
fn test_unauthorized_error_display() {
    let error = Error::Unauthorized("sorry, you are not authorized.".to_string());

    let display = format!("{}", error);
    assert!(display.contains("Unauthorized"));
    assert!(display.contains("not authorized"));
}

#[test]
fn test_validation_error_display() {
    let mut fields = BTreeMap::new();
    fields.insert("title".to_string(), vec!["can't be blank".to_string()]);
    let error = Error::Validation(fields);

    let display = format!("{}", error);
    assert!(display.contains("title"));
    assert!(display.contains("can't be blank"));
}

#[test]
fn test_file_not_found_error_display() {
    let error = Error::FileNotFound("missing.txt".to_string());
    assert_eq!(format!("{}", error), "File not found: missing.txt");
}

#[test]
fn test_invalid_url_from_parse_error() {
    let error: Error = url::Url::parse("not a url").unwrap_err().into();
    assert!(matches!(error, Error::InvalidUrl(_)));
}

#[test]
fn test_error_debug() {
    let error = Error::Api {
        status: 400,
        message: "ERROR: invalid filename".to_string(),
    };

    let debug = format!("{:?}", error);
    assert!(debug.contains("Api"));
    assert!(debug.contains("400"));
}
