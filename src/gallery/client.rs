use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::credentials::{basic_auth_value, CredentialSource};
use crate::error::GalleryError;

use super::model::{Picture, PictureData, Snapshot, WireSnapshot};

/// Operations of the remote gallery endpoint. Every call returns the
/// server's full snapshot after the operation.
pub trait GalleryApi: Send + Sync {
    fn list(&self) -> Result<Snapshot, GalleryError>;

    fn create(&self, payload: &PictureData) -> Result<Snapshot, GalleryError>;

    fn update(&self, payload: &Picture) -> Result<Snapshot, GalleryError>;

    fn delete(&self, id: usize) -> Result<Snapshot, GalleryError>;
}

/// `GalleryApi` over HTTP, talking to `{gallery_url}/metadata`.
pub struct HttpGalleryClient {
    agent: ureq::Agent,
    gallery_url: String,
    credentials: Arc<dyn CredentialSource>,
}

impl HttpGalleryClient {
    pub fn new(
        gallery_url: &str,
        timeout: Duration,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            gallery_url: gallery_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn from_config(config: &Config, credentials: Arc<dyn CredentialSource>) -> Self {
        Self::new(
            &config.gallery_url(),
            Duration::from_secs(config.api.timeout_secs),
            credentials,
        )
    }

    fn metadata_url(&self) -> String {
        format!("{}/metadata", self.gallery_url)
    }

    fn authorization(&self) -> Result<String, GalleryError> {
        let token = self.credentials.token()?.unwrap_or_default();
        Ok(basic_auth_value(&token))
    }

    fn send(
        &self,
        method: &'static str,
        url: &str,
        request: ureq::Request,
        body: Option<serde_json::Value>,
    ) -> Result<Snapshot, GalleryError> {
        tracing::debug!(method, url, "gallery request");

        let result = match body {
            Some(body) => request
                .set("Content-Type", "application/json")
                .send_json(body),
            None => request.call(),
        };

        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                tracing::error!(method, url, status, "gallery request rejected");
                return Err(status_error(method, url, status));
            }
            Err(ureq::Error::Transport(transport)) => {
                tracing::error!(method, url, error = %transport, "gallery request failed");
                return Err(GalleryError::Transport {
                    method,
                    url: url.to_string(),
                    message: transport.to_string(),
                });
            }
        };

        let wire: WireSnapshot = response
            .into_json()
            .map_err(|source| GalleryError::Decode {
                method,
                url: url.to_string(),
                source,
            })?;
        let snapshot = Snapshot::from(wire);
        tracing::debug!(method, url, pictures = snapshot.len(), "gallery snapshot received");
        Ok(snapshot)
    }
}

/// Map a non-success status. 401 means the token was rejected; anything else
/// is reported with the status untouched.
fn status_error(method: &'static str, url: &str, status: u16) -> GalleryError {
    if status == 401 {
        GalleryError::Unauthorized {
            method,
            url: url.to_string(),
        }
    } else {
        GalleryError::RequestFailed {
            method,
            url: url.to_string(),
            status,
        }
    }
}

fn to_body<T: serde::Serialize>(
    method: &'static str,
    url: &str,
    payload: &T,
) -> Result<serde_json::Value, GalleryError> {
    serde_json::to_value(payload).map_err(|e| GalleryError::Decode {
        method,
        url: url.to_string(),
        source: e.into(),
    })
}

impl GalleryApi for HttpGalleryClient {
    fn list(&self) -> Result<Snapshot, GalleryError> {
        let url = self.metadata_url();
        let request = self.agent.get(&url);
        self.send("GET", &url, request, None)
    }

    fn create(&self, payload: &PictureData) -> Result<Snapshot, GalleryError> {
        let url = self.metadata_url();
        let body = to_body("POST", &url, payload)?;
        let request = self
            .agent
            .post(&url)
            .set("Authorization", &self.authorization()?);
        self.send("POST", &url, request, Some(body))
    }

    fn update(&self, payload: &Picture) -> Result<Snapshot, GalleryError> {
        let url = self.metadata_url();
        let body = to_body("PUT", &url, payload)?;
        let request = self
            .agent
            .put(&url)
            .set("Authorization", &self.authorization()?);
        self.send("PUT", &url, request, Some(body))
    }

    fn delete(&self, id: usize) -> Result<Snapshot, GalleryError> {
        let url = format!("{}/{}", self.metadata_url(), id);
        let request = self
            .agent
            .delete(&url)
            .set("Authorization", &self.authorization()?);
        self.send("DELETE", &url, request, None)
    }
}
