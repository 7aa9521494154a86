use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to the user by the `pdfask` binary.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing API key or an unusable configuration file
    #[error("{0}")]
    Configuration(String),

    /// Bad user input: missing or unreadable PDF, empty question
    #[error("{0}")]
    Input(String),

    /// The model API failed or answered with something unusable
    #[error("Gemini API error: {message}")]
    ExternalService { message: String, transient: bool },

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn service(message: impl Into<String>) -> Self {
        Error::ExternalService {
            message: message.into(),
            transient: false,
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Error::ExternalService {
            message: message.into(),
            transient: true,
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::ExternalService {
                transient: true,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_service_errors_are_retryable() {
        assert!(Error::transient("503").is_transient());
        assert!(!Error::service("bad key").is_transient());
        assert!(!Error::Input("missing".into()).is_transient());
    }

    #[test]
    fn test_display_messages() {
        let err = Error::service("quota exceeded");
        assert_eq!(err.to_string(), "Gemini API error: quota exceeded");

        let err = Error::Io {
            path: PathBuf::from("/nope/answer.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("Failed to write /nope/answer.txt"));
    }
}
