// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use nimbuscommon::CloudError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Failure of a single request/response exchange, before it is mapped onto
/// the per-API error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ResponseError {
    #[error(transparent)]
    Cloud(#[from] CloudError),
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error("Unexpected response with status {0}")]
    UnexpectedResponse(StatusCode),
}

/// Decodes a success body, or maps a non-2xx response onto the structured
/// cloud error it carries.
pub(crate) async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ResponseError> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        match response.json::<CloudError>().await {
            Ok(error) => Err(ResponseError::Cloud(error)),
            Err(_) => Err(ResponseError::UnexpectedResponse(status)),
        }
    }
}
