//! Minimal HTTP client for the metrics API: one snapshot read, two privileged writes.

use reqwest::{Certificate, Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::action::Action;
use crate::error::{ClientError, Result};
use crate::types::Snapshot;

pub const SNAPSHOT_PATH: &str = "api/all";
pub const API_KEY_HEADER: &str = "x-api-key";

/// Status and raw body of a privileged action reply; interpreted by
/// [`crate::action::classify`].
#[derive(Debug, Clone)]
pub struct RawReply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: &str, tls_ca: Option<&str>) -> Result<Self> {
        let base = normalize_base_url(base)?;
        let mut builder = Client::builder();
        if let Some(path) = tls_ca {
            builder = builder.add_root_certificate(load_ca(path)?);
        }
        Ok(Self {
            http: builder.build()?,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|source| ClientError::InvalidUrl {
            url: format!("{}{path}", self.base),
            source,
        })
    }

    // GET /api/all; the body is parsed whatever the status
    pub async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let url = self.endpoint(SNAPSHOT_PATH)?;
        debug!(%url, "fetching snapshot");
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        Snapshot::from_slice(&body).map_err(|source| ClientError::Decode { status, source })
    }

    // POST /api/{action} with the key header and no body
    pub async fn post_action(&self, action: Action, api_key: &str) -> Result<RawReply> {
        let url = self.endpoint(action.endpoint())?;
        debug!(%url, action = action.name(), "sending privileged action");
        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.bytes().await?.to_vec();
        Ok(RawReply { status, body })
    }
}

/// Accepts `host:port`, `http://host:port` or `https://host/prefix` and
/// returns a URL whose path ends in `/` so endpoints join beneath it.
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let mut url = Url::parse(&with_scheme).map_err(|source| ClientError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn load_ca(path: &str) -> Result<Certificate> {
    let pem = std::fs::read(path).map_err(|e| ClientError::TlsCa {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    Certificate::from_pem(&pem).map_err(|e| ClientError::TlsCa {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_http_scheme() {
        let u = normalize_base_url("raspberrypi.local:7070").unwrap();
        assert_eq!(u.as_str(), "http://raspberrypi.local:7070/");
    }

    #[test]
    fn prefix_keeps_its_path() {
        let u = normalize_base_url("https://pi.example.com/monitor").unwrap();
        assert_eq!(
            u.join(SNAPSHOT_PATH).unwrap().as_str(),
            "https://pi.example.com/monitor/api/all"
        );
    }

    #[test]
    fn query_and_fragment_are_dropped() {
        let u = normalize_base_url("http://10.0.0.2:7070/?x=1#top").unwrap();
        assert_eq!(u.as_str(), "http://10.0.0.2:7070/");
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(
            normalize_base_url("http://"),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn action_endpoints_resolve_under_base() {
        let c = ApiClient::new("http://127.0.0.1:7070", None).unwrap();
        assert_eq!(
            c.endpoint(Action::Shutdown.endpoint()).unwrap().as_str(),
            "http://127.0.0.1:7070/api/shutdown"
        );
        assert_eq!(
            c.endpoint(Action::Update.endpoint()).unwrap().as_str(),
            "http://127.0.0.1:7070/api/update"
        );
    }

    #[test]
    fn missing_ca_file_is_reported() {
        let err = ApiClient::new("http://127.0.0.1:7070", Some("/nonexistent/ca.pem")).unwrap_err();
        assert!(matches!(err, ClientError::TlsCa { .. }));
    }
}
