// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! End-to-end tests of the cloud function and job API against an in-process
//! server loaded with the fixture cloud code.

use nimbusapiclient::{
    ApiClient, functions_api::FunctionRequestError, jobs_api::{JOB_POLL_INTERVAL, JobRequestError},
};
use nimbuscommon::{
    EntityRef, ErrorCode, GeoPoint, JobStatus, JobStatusId, Params,
};
use nimbusserver_test_harness::utils::setup::TestServer;
use serde_json::json;
use tokio::time::sleep;
use url::Url;

fn params(pairs: &[(&str, &str)]) -> Params {
    let mut params = Params::new();
    for (key, value) in pairs {
        params.insert((*key).to_owned(), json!(value));
    }
    params
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn run_function() {
    let setup = TestServer::spawn().await;
    let result = setup
        .client
        .run_function("bar", &params(&[("key1", "value2"), ("key2", "value1")]))
        .await
        .unwrap();
    assert_eq!(result, Some(json!("Foo")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn run_function_failed() {
    let setup = TestServer::spawn().await;
    let error = setup
        .client
        .run_function("bar", &params(&[("key1", "value1"), ("key2", "value2")]))
        .await
        .unwrap_err();
    let FunctionRequestError::Cloud(error) = error else {
        panic!("expected a cloud error, got {error:?}");
    };
    assert_eq!(error.code, ErrorCode::ScriptFailed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn run_function_name_fail() {
    let setup = TestServer::spawn().await;
    let error = setup
        .client
        .run_function("unknown_function", &params(&[("key1", "value1")]))
        .await
        .unwrap_err();
    let FunctionRequestError::Cloud(error) = error else {
        panic!("expected a cloud error, got {error:?}");
    };
    assert_eq!(error.message, "Invalid function: \"unknown_function\"");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn run_function_with_geo_point_params_does_not_fail_validation() {
    let setup = TestServer::spawn().await;
    let mut params = Params::new();
    params.insert("key1".to_owned(), GeoPoint::new(50.0, 50.0).into());
    let error = setup
        .client
        .run_function("unknown_function", &params)
        .await
        .unwrap_err();
    let FunctionRequestError::Cloud(error) = error else {
        panic!("expected a cloud error, got {error:?}");
    };
    assert_eq!(error.message, "Invalid function: \"unknown_function\"");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn run_function_with_entity_ref_params_fails_locally() {
    // No server at all: the validation error must fire before any network
    // attempt, otherwise this would be a connect error.
    let url: Url = "http://127.0.0.1:9".parse().unwrap();
    let client = ApiClient::with_endpoint(&url).unwrap();

    let mut params = Params::new();
    params.insert(
        "key1".to_owned(),
        EntityRef::new("TestClass", "abc123").into(),
    );
    let error = client.run_function("bar", &params).await.unwrap_err();
    assert!(matches!(error, FunctionRequestError::EntityRef(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn run_function_with_undefined_result() {
    let setup = TestServer::spawn().await;
    let result = setup
        .client
        .run_function("CloudFunctionUndefined", &Params::new())
        .await
        .unwrap();
    assert_eq!(result, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn run_job() {
    let setup = TestServer::spawn().await;
    let params = params(&[("startedBy", "Monty Python")]);
    let id = setup.client.start_job("CloudJob1", &params).await.unwrap();

    // Poll by hand so the observed status sequence itself can be checked.
    let mut observed = Vec::new();
    let record = loop {
        let record = setup.client.job_status(id).await.unwrap();
        observed.push(record.status);
        if record.status.is_terminal() {
            break record;
        }
        sleep(JOB_POLL_INTERVAL).await;
    };

    assert_eq!(record.status, JobStatus::Succeeded);
    assert_eq!(record.params, params);
    // Non-terminal states only before the single terminal observation.
    let (terminal, non_terminal) = observed.split_last().unwrap();
    assert!(terminal.is_terminal());
    assert!(non_terminal.iter().all(|status| !status.is_terminal()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn run_long_job() {
    let setup = TestServer::spawn().await;
    let id = setup.client.start_job("CloudJob2", &Params::new()).await.unwrap();

    // The job sleeps, so the first snapshot cannot be terminal yet.
    let status = setup.client.job_status(id).await.unwrap().status;
    assert!(matches!(status, JobStatus::Queued | JobStatus::Running));

    let record = setup.client.wait_for_job(id).await.unwrap();
    assert_eq!(record.status, JobStatus::Succeeded);
    assert!(record.started_at.is_some());
    assert!(record.finished_at.is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn run_bad_job() {
    let setup = TestServer::spawn().await;
    let error = setup
        .client
        .start_job("bad_job", &Params::new())
        .await
        .unwrap_err();
    let JobRequestError::Cloud(error) = error else {
        panic!("expected a cloud error, got {error:?}");
    };
    assert_eq!(error.code, ErrorCode::ScriptFailed);
    assert_eq!(error.message, "Invalid job.");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn run_failing_job() {
    let setup = TestServer::spawn().await;
    let id = setup
        .client
        .start_job("CloudJobFailing", &Params::new())
        .await
        .unwrap();

    let mut observed = Vec::new();
    let record = loop {
        let record = setup.client.job_status(id).await.unwrap();
        observed.push(record.status);
        if record.status.is_terminal() {
            break record;
        }
        sleep(JOB_POLL_INTERVAL).await;
    };

    assert_eq!(record.status, JobStatus::Failed);
    assert_eq!(record.message.as_deref(), Some("cloud job failed"));
    assert!(observed.iter().all(|status| *status != JobStatus::Succeeded));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn get_jobs_data() {
    let setup = TestServer::spawn().await;
    let data = setup.client.jobs_data().await.unwrap();
    assert!(data.in_use.is_empty());
    assert_eq!(
        data.jobs,
        vec![
            "CloudJob1".to_owned(),
            "CloudJob2".to_owned(),
            "CloudJobFailing".to_owned(),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn invalid_job_status_id() {
    let setup = TestServer::spawn().await;
    let error = setup
        .client
        .job_status(JobStatusId::random())
        .await
        .unwrap_err();
    let JobRequestError::Cloud(error) = error else {
        panic!("expected a cloud error, got {error:?}");
    };
    assert_eq!(error.code, ErrorCode::ObjectNotFound);
    assert_eq!(error.message, "Object not found.");
}
