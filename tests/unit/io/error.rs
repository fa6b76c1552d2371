//! Tests for error types including source chaining, message formatting and classification

#[cfg(test)]
mod tests {
    use fractal_observer::ObserverError;
    use fractal_observer::io::error::{WithPath, invalid_parameter};
    use std::error::Error;
    use std::path::{Path, PathBuf};

    // Tests error source chaining works correctly
    // Verified by breaking source chain
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = ObserverError::FileSystem {
            path: "/tmp/report.json".into(),
            operation: "write",
            source: io_error,
        };
        assert!(error.source().is_some());

        let error = ObserverError::Capture {
            reason: "timeout".to_owned(),
        };
        assert!(error.source().is_none());
    }

    // Tests missing input names the path
    // Verified by omitting the path from the message
    #[test]
    fn test_input_not_found_message() {
        let error = ObserverError::InputNotFound {
            path: PathBuf::from("missing.png"),
        };
        assert_eq!(error.to_string(), "File not found: missing.png");
    }

    // Tests InvalidParameter error contains all fields
    // Verified by omitting value from message
    #[test]
    fn test_invalid_parameter_error() {
        let error = invalid_parameter("max_cycles", &0, &"must be at least 1");
        let message = error.to_string();
        assert!(message.contains("max_cycles"));
        assert!(message.contains("'0'"));
        assert!(message.contains("must be at least 1"));
    }

    // Tests the taxonomy split between input and collaborator failures
    // Verified by classifying capture failures as input errors
    #[test]
    fn test_error_classes() {
        let missing = ObserverError::InputNotFound {
            path: PathBuf::from("x"),
        };
        let invalid = ObserverError::InvalidImage {
            reason: "empty".to_owned(),
        };
        let capture = ObserverError::Capture {
            reason: "timeout".to_owned(),
        };
        let oracle = ObserverError::Oracle {
            reason: "offline".to_owned(),
        };

        assert!(missing.is_input_error());
        assert!(invalid.is_input_error());
        assert!(!capture.is_input_error());
        assert!(capture.is_collaborator_failure());
        assert!(oracle.is_collaborator_failure());
        assert!(!missing.is_collaborator_failure());
    }

    // Tests path context is attached to I/O and JSON failures
    // Verified by discarding the path
    #[test]
    fn test_with_path() {
        let io_result: std::io::Result<()> = Err(std::io::Error::other("denied"));
        let Err(error) = io_result.with_path(Path::new("out/latest.json"), "write report") else {
            panic!("error should propagate");
        };
        let message = error.to_string();
        assert!(message.contains("write report"));
        assert!(message.contains("out/latest.json"));

        let json_result: Result<u32, _> = serde_json::from_str::<u32>("nope");
        let Err(error) = json_result.with_path(Path::new("config.json"), "parse config") else {
            panic!("error should propagate");
        };
        assert!(matches!(error, ObserverError::Serialization { .. }));
        assert!(error.source().is_some());
    }
}
