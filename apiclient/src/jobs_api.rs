// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! API client implementation for background jobs

use std::time::Duration;

use nimbuscommon::{
    CloudError, JobStatusId, JobStatusRecord, JobsData,
    params::{EntityRefError, Params, reject_entity_refs},
};
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::debug;

use crate::{ApiClient, util::{ResponseError, decode_response}};

/// Fixed sleep between two status polls.
pub const JOB_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, thiserror::Error)]
pub enum JobRequestError {
    /// Raised before any network attempt; see [`reject_entity_refs`].
    #[error(transparent)]
    EntityRef(#[from] EntityRefError),
    #[error(transparent)]
    Cloud(#[from] CloudError),
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error("Unexpected response with status {0}")]
    UnexpectedResponse(StatusCode),
}

impl From<ResponseError> for JobRequestError {
    fn from(error: ResponseError) -> Self {
        match error {
            ResponseError::Cloud(error) => Self::Cloud(error),
            ResponseError::Network(error) => Self::Network(error),
            ResponseError::UnexpectedResponse(status) => Self::UnexpectedResponse(status),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartJobResponse {
    job_status_id: JobStatusId,
}

impl ApiClient {
    /// Starts the named job fire-and-forget.
    ///
    /// Resolves with the status handle as soon as the server has accepted
    /// the job; it does not wait for completion.
    pub async fn start_job(
        &self,
        name: &str,
        params: &Params,
    ) -> Result<JobStatusId, JobRequestError> {
        reject_entity_refs(params)?;

        let url = self.endpoint(&format!("jobs/{name}"));
        let response = self.http_client().post(url).json(params).send().await?;
        let body: StartJobResponse = decode_response(response).await?;
        Ok(body.job_status_id)
    }

    /// Current snapshot of the job's status record. Does not block until the
    /// job is terminal; see [`ApiClient::wait_for_job`] for that.
    pub async fn job_status(&self, id: JobStatusId) -> Result<JobStatusRecord, JobRequestError> {
        let url = self.endpoint(&format!("jobs/status/{id}"));
        let response = self.http_client().get(url).send().await?;
        Ok(decode_response(response).await?)
    }

    /// All job definitions known to the server, plus the names currently
    /// mid-execution.
    pub async fn jobs_data(&self) -> Result<JobsData, JobRequestError> {
        let url = self.endpoint("jobs/data");
        let response = self.http_client().get(url).send().await?;
        Ok(decode_response(response).await?)
    }

    /// Polls the job status at a fixed interval until it is terminal and
    /// returns the terminal record.
    ///
    /// No backoff and no retry bound; a request error propagates out of the
    /// loop. "Not yet terminal" is a valid intermediate state, not an error.
    pub async fn wait_for_job(
        &self,
        id: JobStatusId,
    ) -> Result<JobStatusRecord, JobRequestError> {
        loop {
            let record = self.job_status(id).await?;
            if record.status.is_terminal() {
                return Ok(record);
            }
            debug!(%id, status = %record.status, "job not yet terminal");
            sleep(JOB_POLL_INTERVAL).await;
        }
    }
}
