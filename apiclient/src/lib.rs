// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Client for the server HTTP API

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use url::Url;

pub mod functions_api;
pub mod jobs_api;
pub(crate) mod util;

/// The port used for localhost connections.
///
/// Also see server's listen configuration.
pub const LOCALHOST_PORT: u16 = 8080;

/// Errors that can occur when creating an API client.
#[derive(Error, Debug)]
pub enum ApiClientInitError {
    #[error("Invalid URL {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
}

/// ApiClient is a thin wrapper around the HTTP client.
///
/// It exposes a single function for each API endpoint. It holds no state
/// besides the connection pool and the server's base URL; cloning is cheap
/// and all clones share the pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

#[derive(Debug)]
struct ApiClientInner {
    http_client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for the server rooted at `url`.
    pub fn with_endpoint(url: &Url) -> Result<Self, ApiClientInitError> {
        info!(%url, "Creating API client");
        let http_client = reqwest::Client::builder().build()?;
        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http_client,
                base_url: url.clone(),
            }),
        })
    }

    /// Creates a client for a localhost server on the default port.
    pub fn localhost() -> Result<Self, ApiClientInitError> {
        let url_str = format!("http://localhost:{LOCALHOST_PORT}");
        let url: Url = url_str
            .parse()
            .map_err(|_| ApiClientInitError::InvalidUrl(url_str))?;
        Self::with_endpoint(&url)
    }

    pub(crate) fn http_client(&self) -> &reqwest::Client {
        &self.inner.http_client
    }

    pub(crate) fn endpoint(&self, path: &str) -> Url {
        let mut url = self.inner.base_url.clone();
        url.set_path(path);
        url
    }
}
