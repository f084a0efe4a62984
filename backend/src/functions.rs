// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Cloud function registry.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use nimbuscommon::Params;
use serde_json::Value;

/// A named server-side procedure invoked with a parameter payload.
///
/// Returning `Ok(None)` is a valid success and reaches the caller as an
/// absent result, distinguishable from an error.
#[async_trait]
pub trait CloudFunction: Send + Sync {
    async fn invoke(&self, params: &Params) -> Result<Option<Value>, FunctionFailure>;
}

/// Failure raised by a cloud function body.
///
/// Reaches the caller as a script-failed error carrying this message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct FunctionFailure {
    pub message: String,
}

impl FunctionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Name → function implementation. Populated at service construction,
/// immutable afterwards.
#[derive(Default)]
pub(crate) struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn CloudFunction>>,
}

impl FunctionRegistry {
    pub(crate) fn register(
        &mut self,
        name: impl Into<String>,
        function: impl CloudFunction + 'static,
    ) {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Arc<dyn CloudFunction>> {
        self.functions.get(name)
    }
}
