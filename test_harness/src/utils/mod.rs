// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::net::SocketAddr;

pub mod setup;

use nimbusbackend::CloudCodeService;
use nimbusserver::{ServerRunParams, configurations::get_configuration_from_str, run};
use tokio::net::TcpListener;

use crate::init_test_tracing;

const BASE_CONFIG: &str = include_str!("../../../server/configuration/base.yaml");
const LOCAL_CONFIG: &str = include_str!("../../../server/configuration/local.yaml");

/// Spawns the server with the given cloud code on an ephemeral port and
/// returns its address.
pub(crate) async fn spawn_app(service: CloudCodeService) -> SocketAddr {
    init_test_tracing();

    // Load configuration
    let configuration = get_configuration_from_str(BASE_CONFIG, LOCAL_CONFIG)
        .expect("Could not load configuration.");

    // Port binding
    let mut listen = configuration.application.listen;
    listen.set_port(0); // Bind to a random port

    let listener = TcpListener::bind(listen)
        .await
        .expect("Failed to bind to random port.");
    let address = listener.local_addr().unwrap();

    // Execute the server in the background
    tokio::spawn(run(ServerRunParams { listener, service }));

    address
}
