// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! API client implementation for cloud functions

use nimbuscommon::{
    CloudError,
    params::{EntityRefError, Params, reject_entity_refs},
};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::{ApiClient, util::{ResponseError, decode_response}};

#[derive(Debug, thiserror::Error)]
pub enum FunctionRequestError {
    #[error("Function name must not be empty")]
    EmptyFunctionName,
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

impl From<ResponseError> for FunctionRequestError {
    fn from(error: ResponseError) -> Self {
        match error {
            ResponseError::Cloud(error) => Self::Cloud(error),
            ResponseError::Network(error) => Self::Network(error),
            ResponseError::UnexpectedResponse(status) => Self::UnexpectedResponse(status),
        }
    }
}

/// Success body of a function call. An absent `result` member is the valid
/// encoding of a function that returned nothing.
#[derive(Debug, Deserialize)]
struct FunctionResponse {
    #[serde(default)]
    result: Option<Value>,
}

impl ApiClient {
    /// Invokes the named cloud function and resolves with its return value.
    ///
    /// `Ok(None)` means the function returned no value; errors reported by
    /// the server are surfaced verbatim as [`FunctionRequestError::Cloud`].
    /// Params containing entity references fail here before any request is
    /// sent.
    pub async fn run_function(
        &self,
        name: &str,
        params: &Params,
    ) -> Result<Option<Value>, FunctionRequestError> {
        if name.is_empty() {
            return Err(FunctionRequestError::EmptyFunctionName);
        }
        reject_entity_refs(params)?;

        let url = self.endpoint(&format!("functions/{name}"));
        let response = self.http_client().post(url).json(params).send().await?;
        let body: FunctionResponse = decode_response(response).await?;
        Ok(body.result)
    }
}

#[cfg(test)]
mod tests {
    use nimbuscommon::{EntityRef, ErrorCode, GeoPoint};
    use serde_json::json;
    use url::Url;

    use super::*;

    fn client_for(url: &str) -> ApiClient {
        ApiClient::with_endpoint(&Url::parse(url).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn decodes_result_value() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/functions/bar")
            .match_body(mockito::Matcher::Json(
                json!({"key1": "value2", "key2": "value1"}),
            ))
            .with_body(r#"{"result": "Foo"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut params = Params::new();
        params.insert("key1".to_owned(), json!("value2"));
        params.insert("key2".to_owned(), json!("value1"));
        let result = client.run_function("bar", &params).await.unwrap();

        assert_eq!(result, Some(json!("Foo")));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn absent_result_is_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/functions/CloudFunctionUndefined")
            .with_body("{}")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let result = client
            .run_function("CloudFunctionUndefined", &Params::new())
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn server_error_is_surfaced_verbatim() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/functions/unknown_function")
            .with_status(400)
            .with_body(r#"{"code": 142, "error": "Invalid function: \"unknown_function\""}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let mut params = Params::new();
        params.insert("key1".to_owned(), GeoPoint::new(50.0, 50.0).into());
        let error = client
            .run_function("unknown_function", &params)
            .await
            .unwrap_err();

        let FunctionRequestError::Cloud(error) = error else {
            panic!("expected a cloud error, got {error:?}");
        };
        assert_eq!(error.code, ErrorCode::InvalidFunction);
        assert_eq!(error.message, "Invalid function: \"unknown_function\"");
    }

    #[tokio::test]
    async fn entity_refs_fail_without_network() {
        // Nothing listens on this endpoint. If the client attempted the
        // request, the error would be a network error, not the validation
        // error.
        let client = client_for("http://127.0.0.1:9");
        let mut params = Params::new();
        params.insert("key1".to_owned(), EntityRef::new("TestClass", "id").into());

        let error = client.run_function("bar", &params).await.unwrap_err();
        assert!(matches!(error, FunctionRequestError::EntityRef(_)));
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let client = client_for("http://127.0.0.1:9");
        let error = client.run_function("", &Params::new()).await.unwrap_err();
        assert!(matches!(error, FunctionRequestError::EmptyFunctionName));
    }

    #[tokio::test]
    async fn undecodable_error_body_is_unexpected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/functions/bar")
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let error = client
            .run_function("bar", &Params::new())
            .await
            .unwrap_err();
        let FunctionRequestError::UnexpectedResponse(status) = error else {
            panic!("expected an unexpected-response error, got {error:?}");
        };
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
