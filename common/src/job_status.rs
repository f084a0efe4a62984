// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Job status records and their lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::params::Params;

/// Opaque handle identifying a started job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct JobStatusId(Uuid);

impl JobStatusId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for JobStatusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for JobStatusId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Execution state of a job.
///
/// Transitions run only forward: `Queued` or `Running` may become
/// `Succeeded` or `Failed`; the terminal states never change again.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Whether a record in `self` may move to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Queued => matches!(next, Self::Running | Self::Succeeded | Self::Failed),
            Self::Running => matches!(next, Self::Succeeded | Self::Failed),
            Self::Succeeded | Self::Failed => false,
        }
    }
}

/// Snapshot of a job's execution state as reported by the server.
///
/// Created when a start request is accepted, updated server-side as the job
/// executes, immutable once terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusRecord {
    pub job_status_id: JobStatusId,
    pub job_name: String,
    pub status: JobStatus,
    /// The original start parameters, preserved verbatim.
    pub params: Params,
    /// Message produced by the job body on its terminal transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobStatusRecord {
    /// A fresh record for an accepted start request.
    pub fn queued(job_name: impl Into<String>, params: Params) -> Self {
        Self {
            job_status_id: JobStatusId::random(),
            job_name: job_name.into(),
            status: JobStatus::Queued,
            params,
            message: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }
}

/// Response of the jobs-data listing.
///
/// `jobs` enumerates every job definition known to the server; `in_use` only
/// the names of jobs currently mid-execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobsData {
    pub in_use: Vec<String>,
    pub jobs: Vec<String>,
}
