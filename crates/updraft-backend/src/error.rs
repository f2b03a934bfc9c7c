use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    #[error(transparent)]
    VersionParse(#[from] crate::types::VersionParseError),

    #[error("Network error during {operation} ({stage}): {details}")]
    Network {
        operation: &'static str,
        stage: NetworkStage,
        details: String,
    },

    #[error("No published releases found")]
    NoReleases,

    #[error("IO error ({kind}): {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },

    #[error("Install failed during {phase}: {details}")]
    InstallFailed {
        phase: &'static str,
        details: String,
    },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStage {
    #[error("request")]
    Request,
    #[error("response parse")]
    ResponseParse,
}

impl UpdateError {
    pub fn network_request(operation: &'static str, details: impl Into<String>) -> Self {
        Self::Network {
            operation,
            stage: NetworkStage::Request,
            details: details.into(),
        }
    }

    pub fn network_request_from<E>(operation: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::network_request(operation, error.to_string())
    }

    pub fn network_parse(operation: &'static str, details: impl Into<String>) -> Self {
        Self::Network {
            operation,
            stage: NetworkStage::ResponseParse,
            details: details.into(),
        }
    }

    pub fn network_parse_from<E>(operation: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::network_parse(operation, error.to_string())
    }

    pub fn install_failed(phase: &'static str, details: impl Into<String>) -> Self {
        Self::InstallFailed {
            phase,
            details: details.into(),
        }
    }
}

impl From<std::io::Error> for UpdateError {
    fn from(err: std::io::Error) -> Self {
        UpdateError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
