// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Server-side cloud code logic: function and job registries, the in-memory
//! job status store, and the job runner. The server crate exposes this via
//! an HTTP API.

pub mod functions;
pub mod jobs;
pub mod service;
pub mod settings;

pub use functions::{CloudFunction, FunctionFailure};
pub use jobs::{CloudJob, JobFailure};
pub use service::CloudCodeService;
