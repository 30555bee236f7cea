//! Blocking HTTP download of the registry CSV (no async runtime required).

use super::{parse_registry_csv, RegistryError, RegistryFetcher, RegistryRecord, RegistryResult};
use log::{info, warn};
use std::time::{Duration, Instant};

const USER_AGENT: &str = concat!("wellsync/", env!("CARGO_PKG_VERSION"));

/// Downloads the full registry snapshot on every `fetch`.
pub struct HttpRegistryFetcher {
    http: reqwest::blocking::Client,
    url: String,
}

impl HttpRegistryFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> RegistryResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

impl RegistryFetcher for HttpRegistryFetcher {
    fn source_kind(&self) -> &'static str {
        "http"
    }

    fn fetch(&self) -> RegistryResult<Vec<RegistryRecord>> {
        let started_at = Instant::now();
        let response = self.http.get(&self.url).send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "event=registry_download module=registry status=error http_status={} duration_ms={}",
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(RegistryError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes()?;
        info!(
            "event=registry_download module=registry status=ok bytes={} duration_ms={}",
            body.len(),
            started_at.elapsed().as_millis()
        );
        parse_registry_csv(&body)
    }
}
