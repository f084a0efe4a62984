// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Server that makes the cloud code implemented in the backend available to
//! clients via a REST API

use std::sync::Arc;

use axum::Router;
use nimbusbackend::CloudCodeService;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, enabled, info};

pub mod args;
pub mod configurations;
pub mod logging;
mod routes;


pub struct ServerRunParams {
    pub listener: TcpListener,
    pub service: CloudCodeService,
}

/// Configure and run the server application.
pub async fn run(
    ServerRunParams { listener, service }: ServerRunParams,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    info!(%addr, "Starting server");

    let router = router(Arc::new(service));
    axum::serve(listener, router).await
}

/// The HTTP surface over a cloud code service.
pub fn router(service: Arc<CloudCodeService>) -> Router {
    routes::router(service).layer(
        TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new()
                    .level(Level::INFO)
                    .include_headers(enabled!(Level::DEBUG)),
            )
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}
