use std::path::PathBuf;

/// Failures of the remote gallery API and its credential source.
#[derive(thiserror::Error, Debug)]
pub enum GalleryError {
    #[error("transport error on {method} {url}: {message}")]
    Transport {
        method: &'static str,
        url: String,
        message: String,
    },
    #[error("unauthorized: {method} {url}")]
    Unauthorized { method: &'static str, url: String },
    #[error("{method} {url} failed with status {status}")]
    RequestFailed {
        method: &'static str,
        url: String,
        status: u16,
    },
    #[error("invalid snapshot from {method} {url}: {source}")]
    Decode {
        method: &'static str,
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("credential error on {path}: {source}")]
    Credential {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification used by the sync state machine and notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Unauthorized,
    Request,
}

impl GalleryError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GalleryError::Transport { .. } => FailureKind::Transport,
            GalleryError::Unauthorized { .. } => FailureKind::Unauthorized,
            GalleryError::RequestFailed { .. }
            | GalleryError::Decode { .. }
            | GalleryError::Credential { .. } => FailureKind::Request,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == FailureKind::Unauthorized
    }

    /// HTTP status reported by the server, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            GalleryError::Unauthorized { .. } => Some(401),
            GalleryError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
