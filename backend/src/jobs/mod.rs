// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Background jobs: registry, status store, and the runner that drives a
//! started job through its status lifecycle.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use nimbuscommon::{JobStatus, JobStatusId, JobStatusRecord, Params};
use tracing::{error, info};

pub mod status_store;

pub use status_store::JobStatusStore;

/// A named long-running server-side task.
///
/// The returned string, if any, is recorded as the status message of the
/// succeeded record. A failure's message is recorded on the failed record.
#[async_trait]
pub trait CloudJob: Send + Sync {
    async fn run(&self, params: &Params) -> Result<Option<String>, JobFailure>;
}

/// Failure raised by a job body.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct JobFailure {
    pub message: String,
}

impl JobFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Name → job implementation. Populated at service construction, immutable
/// afterwards.
#[derive(Default)]
pub(crate) struct JobRegistry {
    jobs: HashMap<String, Arc<dyn CloudJob>>,
}

impl JobRegistry {
    pub(crate) fn register(&mut self, name: impl Into<String>, job: impl CloudJob + 'static) {
        self.jobs.insert(name.into(), Arc::new(job));
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Arc<dyn CloudJob>> {
        self.jobs.get(name)
    }

    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.jobs.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Accepts a start request: records the job as queued and spawns a task
/// driving it to a terminal status. Returns the handle immediately.
pub(crate) fn spawn_job(
    job: Arc<dyn CloudJob>,
    store: Arc<JobStatusStore>,
    record: JobStatusRecord,
) -> JobStatusId {
    let id = record.job_status_id;
    let job_name = record.job_name.clone();
    let params = record.params.clone();
    store.insert(record);

    tokio::spawn(async move {
        store.transition(id, JobStatus::Running, None);
        match job.run(&params).await {
            Ok(message) => {
                info!(%id, job_name, "job succeeded");
                store.transition(id, JobStatus::Succeeded, message);
            }
            Err(failure) => {
                error!(%id, job_name, message = failure.message, "job failed");
                store.transition(id, JobStatus::Failed, Some(failure.message));
            }
        }
    });

    id
}
