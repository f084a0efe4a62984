// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error taxonomy shared by the server and the client.
//!
//! Every failed cloud call carries a [`CloudError`] on the wire as
//! `{"code": <u16>, "error": <message>}`. The numeric codes are stable; the
//! messages are free text owned by the failing side.

use serde::{Deserialize, Serialize};

/// Stable numeric error codes.
///
/// "Invalid function" is a distinct code rather than a `SCRIPT_FAILED`
/// variant distinguished only by message text, so that callers can match on
/// it structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum ErrorCode {
    InternalError,
    ObjectNotFound,
    ScriptFailed,
    InvalidFunction,
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::InternalError => 1,
            ErrorCode::ObjectNotFound => 101,
            ErrorCode::ScriptFailed => 141,
            ErrorCode::InvalidFunction => 142,
        }
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = UnknownErrorCode;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::InternalError),
            101 => Ok(Self::ObjectNotFound),
            141 => Ok(Self::ScriptFailed),
            142 => Ok(Self::InvalidFunction),
            _ => Err(UnknownErrorCode(code)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown error code {0}")]
pub struct UnknownErrorCode(pub u16);

/// A structured error reported by the server for a failed cloud call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} (code {code:?})")]
pub struct CloudError {
    pub code: ErrorCode,
    #[serde(rename = "error")]
    pub message: String,
}

impl CloudError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The error returned for a call to a function name the server does not
    /// know. The requested name is embedded verbatim.
    pub fn invalid_function(name: &str) -> Self {
        Self::new(
            ErrorCode::InvalidFunction,
            format!("Invalid function: \"{name}\""),
        )
    }

    /// The error returned for a start request naming an unknown job.
    pub fn invalid_job() -> Self {
        Self::new(ErrorCode::ScriptFailed, "Invalid job.")
    }

    /// The error returned for a status lookup with an unknown handle.
    pub fn object_not_found() -> Self {
        Self::new(ErrorCode::ObjectNotFound, "Object not found.")
    }

    pub fn script_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ScriptFailed, message)
    }
}
