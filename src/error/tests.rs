//! Error type tests

#![allow(clippy::expect_used)]

use std::path::Path;

use miette::Diagnostic;

use super::*;

macro_rules! test_error_contains {
    ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
        #[test]
        fn $test_name() {
            let err = $err;
            let error_string = err.to_string();
            $(
                assert!(error_string.contains($contains),
                    "Error message should contain '{}', got: {}",
                    $contains,
                    error_string
                );
            )+
        }
    };
}

#[test]
fn test_component_not_found_lists_available() {
    let err = component_not_found("does-not-exist", ["button", "text"]);
    assert_eq!(
        err.to_string(),
        "Component 'does-not-exist' not found in the registry"
    );
    let help = err.help().map(|h| h.to_string()).unwrap_or_default();
    assert_eq!(help, "Available components: button, text");
}

#[test]
fn test_component_not_found_empty_registry() {
    let err = component_not_found("x", Vec::<String>::new());
    let help = err.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("(none)"));
}

#[test]
fn test_error_code() {
    let err = ComponentryError::CycleDetected {
        cycle: vec!["a".into(), "b".into(), "a".into()],
    };
    assert_eq!(
        err.code().map(|c| c.to_string()),
        Some("componentry::registry::cycle".to_string())
    );
}

test_error_contains!(
    test_cycle_message_shows_path,
    ComponentryError::CycleDetected {
        cycle: vec!["a".into(), "b".into(), "a".into()],
    },
    "a -> b -> a"
);

test_error_contains!(
    test_file_operation_message,
    file_operation("copy", Path::new("/tmp/x.tsx"), "No such file or directory"),
    "copy",
    "/tmp/x.tsx",
    "No such file"
);

test_error_contains!(
    test_network_message,
    ComponentryError::Network {
        url: "https://example.invalid/registry.json".into(),
        reason: "HTTP 503".into(),
    },
    "Failed to fetch",
    "HTTP 503"
);

test_error_contains!(
    test_invalid_project_message,
    invalid_project("no package.json found"),
    "Invalid project",
    "package.json"
);

#[test]
fn test_retryable_classification() {
    assert!(
        ComponentryError::Network {
            url: String::new(),
            reason: String::new()
        }
        .is_retryable()
    );
    assert!(file_operation("write", Path::new("a"), "denied").is_retryable());
    assert!(!component_not_found("a", ["b"]).is_retryable());
    assert!(!ComponentryError::CycleDetected { cycle: vec![] }.is_retryable());
    assert!(!invalid_project("x").is_retryable());
    assert!(!validation("bad").is_retryable());
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ComponentryError = io_err.into();
    assert!(matches!(err, ComponentryError::Io { .. }));
}
