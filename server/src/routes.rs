// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! HTTP handlers for the cloud code API.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use nimbusbackend::CloudCodeService;
use nimbuscommon::{CloudError, ErrorCode, JobStatusId, JobStatusRecord, JobsData, Params};
use serde::Serialize;
use serde_json::Value;

pub(crate) fn router(service: Arc<CloudCodeService>) -> Router {
    Router::new()
        .route("/functions/{name}", post(run_function))
        .route("/jobs/data", get(jobs_data))
        .route("/jobs/status/{id}", get(job_status))
        .route("/jobs/{name}", post(start_job))
        .with_state(service)
}

/// A failed call, encoded as `{"code": .., "error": ..}` with the HTTP
/// status derived from the error code.
struct ApiError(CloudError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.code {
            ErrorCode::ObjectNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(self.0)).into_response()
    }
}

impl From<CloudError> for ApiError {
    fn from(error: CloudError) -> Self {
        Self(error)
    }
}

#[derive(Serialize)]
struct FunctionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
}

async fn run_function(
    State(service): State<Arc<CloudCodeService>>,
    Path(name): Path<String>,
    Json(params): Json<Params>,
) -> Result<Json<FunctionResponse>, ApiError> {
    let result = service.run_function(&name, &params).await?;
    Ok(Json(FunctionResponse { result }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartJobResponse {
    job_status_id: JobStatusId,
}

async fn start_job(
    State(service): State<Arc<CloudCodeService>>,
    Path(name): Path<String>,
    Json(params): Json<Params>,
) -> Result<Json<StartJobResponse>, ApiError> {
    let job_status_id = service.start_job(&name, params)?;
    Ok(Json(StartJobResponse { job_status_id }))
}

async fn job_status(
    State(service): State<Arc<CloudCodeService>>,
    Path(id): Path<String>,
) -> Result<Json<JobStatusRecord>, ApiError> {
    // A handle that does not even parse is as unknown as a missing one.
    let id: JobStatusId = id.parse().map_err(|_| CloudError::object_not_found())?;
    Ok(Json(service.job_status(id)?))
}

async fn jobs_data(State(service): State<Arc<CloudCodeService>>) -> Json<JobsData> {
    Json(service.jobs_data())
}
