// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Wire-level types shared between the server and the client: the cloud
//! error taxonomy, the parameter value model, and job status records.

pub mod error;
pub mod job_status;
pub mod params;

pub use error::{CloudError, ErrorCode};
pub use job_status::{JobStatus, JobStatusId, JobStatusRecord, JobsData};
pub use params::{EntityRef, EntityRefError, GeoPoint, Params, reject_entity_refs};
