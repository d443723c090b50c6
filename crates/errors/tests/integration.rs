//! Integration tests for error types

#[cfg(test)]
mod tests {
    use pscaf_errors::*;

    #[test]
    fn test_error_conversion() {
        let net_err = NetworkError::Timeout {
            url: "https://example.com".into(),
        };
        let err: Error = net_err.into();
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn test_error_display() {
        let err = ScaffoldError::InvalidPatchUrl {
            url: "https://example.org/".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot derive a patch file name from https://example.org/"
        );
    }

    #[test]
    fn test_error_clone() {
        let err = ConfigError::MissingField {
            field: "extra.ne-platform-scaffold.version".into(),
        };
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::PermissionDenied,
                path: None,
                ..
            }
        ));
    }

    #[test]
    fn test_user_facing_codes() {
        let err: Error = ScaffoldError::ExtractionFailed {
            message: "tar: not in gzip format".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("scaffold.extraction_failed"));
        assert!(err.user_hint().is_some());
        assert!(!err.is_retryable());

        let err: Error = NetworkError::HttpError {
            status: 503,
            message: "Service Unavailable".into(),
        }
        .into();
        assert!(err.is_retryable());
    }
}
