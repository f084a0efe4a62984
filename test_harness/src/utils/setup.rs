// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Test server setup with the fixture cloud code.

use std::{net::SocketAddr, time::Duration};

use async_trait::async_trait;
use nimbusapiclient::ApiClient;
use nimbusbackend::{
    CloudCodeService, CloudFunction, CloudJob, FunctionFailure, JobFailure,
};
use nimbuscommon::Params;
use serde_json::{Value, json};
use tokio::time::sleep;
use url::Url;

use super::spawn_app;

/// An in-process server loaded with the fixture cloud code, plus a client
/// connected to it.
pub struct TestServer {
    pub address: SocketAddr,
    pub client: ApiClient,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let address = spawn_app(fixture_service()).await;
        let url: Url = format!("http://{address}")
            .parse()
            .expect("invalid server address");
        let client = ApiClient::with_endpoint(&url).expect("failed to create client");
        Self { address, client }
    }
}

/// The cloud code the integration tests run against.
pub fn fixture_service() -> CloudCodeService {
    let mut service = CloudCodeService::new();
    service.register_function("bar", Bar);
    service.register_function("CloudFunctionUndefined", Undefined);
    service.register_job("CloudJob1", QuickJob);
    service.register_job("CloudJob2", LongJob);
    service.register_job("CloudJobFailing", FailingJob);
    service
}

/// Returns `"Foo"` for one specific parameter combination and fails for
/// everything else.
struct Bar;

#[async_trait]
impl CloudFunction for Bar {
    async fn invoke(&self, params: &Params) -> Result<Option<Value>, FunctionFailure> {
        if params.get("key1") == Some(&json!("value2"))
            && params.get("key2") == Some(&json!("value1"))
        {
            Ok(Some(json!("Foo")))
        } else {
            Err(FunctionFailure::new("bad stuff happened"))
        }
    }
}

/// Succeeds without returning a value.
struct Undefined;

#[async_trait]
impl CloudFunction for Undefined {
    async fn invoke(&self, _params: &Params) -> Result<Option<Value>, FunctionFailure> {
        Ok(None)
    }
}

/// Completes immediately.
struct QuickJob;

#[async_trait]
impl CloudJob for QuickJob {
    async fn run(&self, _params: &Params) -> Result<Option<String>, JobFailure> {
        Ok(None)
    }
}

/// Stays mid-execution long enough for a poll to observe it.
struct LongJob;

#[async_trait]
impl CloudJob for LongJob {
    async fn run(&self, _params: &Params) -> Result<Option<String>, JobFailure> {
        sleep(Duration::from_secs(1)).await;
        Ok(None)
    }
}

/// Always fails.
struct FailingJob;

#[async_trait]
impl CloudJob for FailingJob {
    async fn run(&self, _params: &Params) -> Result<Option<String>, JobFailure> {
        Err(JobFailure::new("cloud job failed"))
    }
}
