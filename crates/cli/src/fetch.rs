// ABOUTME: Blocking HTTP collaborators for the launcher: results-page fetcher and shared client setup.
// ABOUTME: Non-success statuses become errors; the fetched body can be saved for selector debugging.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use shopscout_core::{Fetcher, ScoutError};
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the blocking client shared by the page fetcher and image store.
pub fn build_client(timeout: Duration) -> Result<Client, ScoutError> {
    Client::builder()
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| ScoutError::fetch("<client>", e))
}

/// Fetches results pages over HTTP.
pub struct HttpFetcher {
    client: Client,
    save_to: Option<PathBuf>,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            save_to: None,
        }
    }

    /// Writes every fetched body to `path`, overwriting earlier saves.
    pub fn save_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_to = Some(path.into());
        self
    }

    fn save_body(&self, body: &str) {
        let Some(path) = &self.save_to else {
            return;
        };
        match fs::write(path, body) {
            Ok(()) => debug!(path = %path.display(), bytes = body.len(), "saved results page"),
            Err(err) => warn!(path = %path.display(), %err, "could not save results page"),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, headers: &[(String, String)]) -> Result<String, ScoutError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().map_err(|e| ScoutError::fetch(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::status(url, status.as_u16()));
        }

        let body = response.text().map_err(|e| ScoutError::fetch(url, e))?;
        debug!(url, bytes = body.len(), "fetched results page");
        self.save_body(&body);
        Ok(body)
    }
}
