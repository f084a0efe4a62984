// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The cloud code service: the single state object the server exposes.

use std::sync::Arc;

use nimbuscommon::{CloudError, JobStatusId, JobStatusRecord, JobsData, Params};
use serde_json::Value;
use tracing::info;

use crate::{
    functions::{CloudFunction, FunctionRegistry},
    jobs::{CloudJob, JobRegistry, JobStatusStore, spawn_job},
};

/// Registries plus the job status store, tied together behind the four
/// operations the HTTP surface exposes.
#[derive(Default)]
pub struct CloudCodeService {
    functions: FunctionRegistry,
    jobs: JobRegistry,
    status_store: Arc<JobStatusStore>,
}

impl CloudCodeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a cloud function under `name`.
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        function: impl CloudFunction + 'static,
    ) {
        self.functions.register(name, function);
    }

    /// Registers a background job under `name`.
    pub fn register_job(&mut self, name: impl Into<String>, job: impl CloudJob + 'static) {
        self.jobs.register(name, job);
    }

    /// Invokes the named function and waits for its result.
    pub async fn run_function(
        &self,
        name: &str,
        params: &Params,
    ) -> Result<Option<Value>, CloudError> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| CloudError::invalid_function(name))?;
        function
            .invoke(params)
            .await
            .map_err(|failure| CloudError::script_failed(failure.message))
    }

    /// Accepts a job start request and returns the status handle without
    /// waiting for the job to finish.
    pub fn start_job(&self, name: &str, params: Params) -> Result<JobStatusId, CloudError> {
        let job = self.jobs.get(name).ok_or_else(CloudError::invalid_job)?;
        let record = JobStatusRecord::queued(name, params);
        let id = spawn_job(job.clone(), self.status_store.clone(), record);
        info!(%id, job_name = name, "started job");
        Ok(id)
    }

    /// Current snapshot of a job status record.
    pub fn job_status(&self, id: JobStatusId) -> Result<JobStatusRecord, CloudError> {
        self.status_store
            .get(id)
            .ok_or_else(CloudError::object_not_found)
    }

    /// All registered job definitions plus the names currently executing.
    pub fn jobs_data(&self) -> JobsData {
        JobsData {
            in_use: self.status_store.running_job_names(),
            jobs: self.jobs.names(),
        }
    }
}
